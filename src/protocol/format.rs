//! Response formats understood by the API

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::protocol::error::EventfulError;

/// Wire format requested from the API
///
/// The format is part of the request path (`{base}/{format}/{method}`) and also
/// selects how the response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// XML documents, served under `/rest`
    #[default]
    Rest,

    /// JSON objects, served under `/json`
    Json,
}

impl ResponseFormat {
    /// Path segment used in the request URL
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResponseFormat::Rest => "rest",
            ResponseFormat::Json => "json",
        }
    }

    /// Value for the `Accept` request header
    pub fn accept(&self) -> &'static str {
        match self {
            ResponseFormat::Rest => "text/xml",
            ResponseFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ResponseFormat {
    type Err = EventfulError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "xml" => Ok(ResponseFormat::Rest),
            "json" => Ok(ResponseFormat::Json),
            other => Err(EventfulError::InvalidArgument(format!(
                "Unsupported response format: {}",
                other
            ))),
        }
    }
}
