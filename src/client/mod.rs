//! High-level client API for Eventful

pub mod api;
pub mod builder;
pub mod config;

pub use api::EventfulClient;
pub use builder::EventfulClientBuilder;
pub use config::{ClientConfig, OAuthEndpoints, DEFAULT_BASE_URL};
