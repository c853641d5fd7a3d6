//! Tower Layer implementations for Eventful API calls

pub mod oauth;

pub use oauth::{OAuthCredentials, OAuthLayer, OAuthService, OAuthSigner};
