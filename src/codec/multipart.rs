//! `multipart/form-data` bodies

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::protocol::LoadedFile;

/// Builder for a multipart form body
///
/// Parts are written in the order they are added.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    body: BytesMut,
}

impl MultipartBody {
    /// Start a body with a random boundary
    pub fn new() -> Self {
        Self::with_boundary(format!("eventful-{}", Uuid::new_v4().simple()))
    }

    /// Start a body with a fixed boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: BytesMut::new(),
        }
    }

    /// The boundary separating parts
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the `Content-Type` request header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quoted(name)
            )
            .as_bytes(),
        );
        self.body.put_slice(value.as_bytes());
        self.body.put_slice(b"\r\n");
        self
    }

    /// Append a file part
    pub fn file(mut self, name: &str, file: &LoadedFile) -> Self {
        self.open_part();
        self.body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quoted(name),
                escape_quoted(&file.filename)
            )
            .as_bytes(),
        );
        self.body
            .put_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        self.body.put_slice(&file.data);
        self.body.put_slice(b"\r\n");
        self
    }

    /// Close the body and return it with its content type
    pub fn finish(mut self) -> (String, Bytes) {
        self.body.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (self.content_type(), self.body.freeze())
    }

    fn open_part(&mut self) {
        self.body.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_file_parts() {
        let file = LoadedFile {
            filename: "photo.jpg".into(),
            content_type: "image/jpeg".into(),
            data: Bytes::from_static(b"JPEG"),
        };

        let (content_type, body) = MultipartBody::with_boundary("XyZ")
            .text("app_key", "key123")
            .file("photo_file", &file)
            .finish();

        assert_eq!(content_type, "multipart/form-data; boundary=XyZ");
        assert_eq!(
            body,
            Bytes::from(
                "--XyZ\r\n\
                 Content-Disposition: form-data; name=\"app_key\"\r\n\r\n\
                 key123\r\n\
                 --XyZ\r\n\
                 Content-Disposition: form-data; name=\"photo_file\"; filename=\"photo.jpg\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n\
                 JPEG\r\n\
                 --XyZ--\r\n"
            )
        );
    }

    #[test]
    fn test_random_boundaries_differ() {
        let a = MultipartBody::new();
        let b = MultipartBody::new();

        assert_ne!(a.boundary(), b.boundary());
        assert!(a.content_type().starts_with("multipart/form-data; boundary=eventful-"));
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let (_, body) = MultipartBody::with_boundary("b").text("we\"ird", "v").finish();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("name=\"we\\\"ird\""));
    }
}
