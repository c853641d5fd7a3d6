//! # Eventful API
//!
//! A Tower-based client for the Eventful REST API: search, read, create and
//! modify events, venues, performers and the rest of the Eventful catalogue.
//!
//! Every API method goes through one operation, [`EventfulClient::call`]. It
//! POSTs the arguments to `{base_url}/{format}/{method}`, signs the request with
//! OAuth 1.0a HMAC-SHA1 when credentials are configured, and decodes the XML or
//! JSON body. Errors reported by the API and non-200 statuses both surface as
//! [`EventfulError`].
//!
//! ## Features
//!
//! - **Typed arguments**: scalars, repeated values and file uploads, with
//!   multipart encoding chosen automatically
//! - **OAuth 1.0a**: signed requests for calls that need user authorization
//! - **Transport agnostic**: reqwest by default, any `Transport` for tests
//! - **Async**: built on tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use eventful_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = EventfulClient::http("my-app-key");
//!
//!     let args = CallArguments::new()
//!         .with("keywords", "jazz")
//!         .with("location", "New Orleans");
//!     let response = client.call("/events/search", args, ResponseFormat::Rest).await?;
//!
//!     println!("{}", response.raw_text());
//!     Ok(())
//! }
//! ```
//!
//! [`EventfulClient::call`]: client::EventfulClient::call
//! [`EventfulError`]: protocol::EventfulError

pub mod client;
pub mod codec;
pub mod layer;
pub mod protocol;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{ClientConfig, EventfulClient, EventfulClientBuilder},
        layer::OAuthCredentials,
        protocol::{
            ArgValue, CallArguments, Document, EventfulError, FilePayload, ResponseFormat,
            XmlElement,
        },
        service::ApiResponse,
    };
}
