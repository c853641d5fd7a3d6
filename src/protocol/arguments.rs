//! Call arguments sent with every API method

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::protocol::error::EventfulResult;

/// Argument names ending with this suffix carry file uploads
pub const FILE_SUFFIX: &str = "_file";

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Content of a file upload
#[derive(Debug, Clone, PartialEq)]
pub enum FilePayload {
    /// A file on disk, read when the request body is encoded
    Path(PathBuf),

    /// In-memory content
    Bytes {
        filename: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

impl FilePayload {
    /// Upload a file from disk
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Upload in-memory content under the given filename
    pub fn bytes(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the content type of an in-memory payload
    ///
    /// Path payloads are always sent as `application/octet-stream`.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        match self {
            FilePayload::Bytes { filename, data, .. } => FilePayload::Bytes {
                filename,
                content_type: Some(content_type.into()),
                data,
            },
            path => path,
        }
    }

    /// Resolve the payload into a filename, content type and content
    pub async fn load(&self) -> EventfulResult<LoadedFile> {
        match self {
            FilePayload::Path(path) => {
                let data = tokio::fs::read(path).await?;
                Ok(LoadedFile {
                    filename: file_name(path),
                    content_type: DEFAULT_FILE_CONTENT_TYPE.to_string(),
                    data: Bytes::from(data),
                })
            }
            FilePayload::Bytes {
                filename,
                content_type,
                data,
            } => Ok(LoadedFile {
                filename: filename.clone(),
                content_type: content_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_string()),
                data: data.clone(),
            }),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// A file payload that has been read and is ready to encode
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Value of a single call argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// One form field
    Scalar(String),

    /// One form field per element, all under the same name
    Repeated(Vec<String>),

    /// A file upload; forces multipart encoding
    File(FilePayload),

    /// Several file uploads under the same name; forces multipart encoding
    Files(Vec<FilePayload>),
}

impl ArgValue {
    /// Whether this value carries file uploads
    pub fn is_file(&self) -> bool {
        matches!(self, ArgValue::File(_) | ArgValue::Files(_))
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Scalar(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Scalar(value.to_string())
    }
}

impl From<&String> for ArgValue {
    fn from(value: &String) -> Self {
        ArgValue::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ArgValue {
                fn from(value: $ty) -> Self {
                    ArgValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, f64, bool);

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::Repeated(values)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(values: Vec<&str>) -> Self {
        ArgValue::Repeated(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArgValue {
    fn from(values: [&str; N]) -> Self {
        ArgValue::Repeated(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<FilePayload> for ArgValue {
    fn from(payload: FilePayload) -> Self {
        ArgValue::File(payload)
    }
}

impl From<Vec<FilePayload>> for ArgValue {
    fn from(payloads: Vec<FilePayload>) -> Self {
        ArgValue::Files(payloads)
    }
}

/// Ordered argument map for one API call
///
/// Names keep the position of their first insertion; inserting an existing name
/// replaces its value. Text inserted under a name ending in `_file` is stored
/// as file path uploads, one per value.
///
/// # Example
///
/// ```rust
/// use eventful_api::protocol::{ArgValue, CallArguments};
///
/// let args = CallArguments::new()
///     .with("keywords", "jazz")
///     .with("category", ["music", "festivals"])
///     .with("image_file", "/tmp/poster.jpg");
///
/// assert!(args.has_files());
/// assert!(matches!(args.get("category"), Some(ArgValue::Repeated(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments {
    entries: Vec<(String, ArgValue)>,
}

impl CallArguments {
    /// Create an empty argument map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, returning the map
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a file upload regardless of the argument name
    pub fn with_file(mut self, name: impl Into<String>, payload: FilePayload) -> Self {
        self.set(name.into(), ArgValue::File(payload));
        self
    }

    /// Add or replace an argument
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> &mut Self {
        let name = name.into();
        let value = match value.into() {
            ArgValue::Scalar(path) if name.ends_with(FILE_SUFFIX) => {
                ArgValue::File(FilePayload::path(path))
            }
            ArgValue::Repeated(paths) if name.ends_with(FILE_SUFFIX) => {
                ArgValue::Files(paths.into_iter().map(FilePayload::path).collect())
            }
            value => value,
        };
        self.set(name, value);
        self
    }

    fn set(&mut self, name: String, value: ArgValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up an argument by name
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Remove an argument, returning its value
    pub fn remove(&mut self, name: &str) -> Option<ArgValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over arguments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Text fields in order, with repeated values expanded to one pair each
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, value)| {
            let values: Vec<&str> = match value {
                ArgValue::Scalar(v) => vec![v.as_str()],
                ArgValue::Repeated(vs) => vs.iter().map(String::as_str).collect(),
                ArgValue::File(_) | ArgValue::Files(_) => Vec::new(),
            };
            values.into_iter().map(move |v| (name.as_str(), v))
        })
    }

    /// File uploads in order, with multiple uploads expanded to one pair each
    pub fn files(&self) -> impl Iterator<Item = (&str, &FilePayload)> {
        self.entries.iter().flat_map(|(name, value)| {
            let payloads: Vec<&FilePayload> = match value {
                ArgValue::File(payload) => vec![payload],
                ArgValue::Files(payloads) => payloads.iter().collect(),
                ArgValue::Scalar(_) | ArgValue::Repeated(_) => Vec::new(),
            };
            payloads.into_iter().map(move |payload| (name.as_str(), payload))
        })
    }

    /// Whether any argument is a file upload
    pub fn has_files(&self) -> bool {
        self.entries.iter().any(|(_, value)| value.is_file())
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CallArguments
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = CallArguments::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}
