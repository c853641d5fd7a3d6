//! Client configuration

use crate::{layer::OAuthCredentials, transport::http::DEFAULT_USER_AGENT};

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.eventful.com";

/// Endpoints of the OAuth 1.0a token exchange
///
/// The client never calls these itself; they are here for applications that
/// run the three-legged authorization flow to obtain access tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
}

impl OAuthEndpoints {
    /// URL to send the user to for authorizing a request token
    pub fn authorize_url_for(&self, request_token: &str) -> String {
        format!(
            "{}?oauth_token={}",
            self.authorize_url,
            urlencoding::encode(request_token)
        )
    }
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            request_token_url: "https://eventful.com/oauth/request_token".into(),
            authorize_url: "https://eventful.com/oauth/authorize".into(),
            access_token_url: "https://eventful.com/oauth/access_token".into(),
        }
    }
}

/// Configuration for an Eventful client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API
    pub base_url: String,

    /// Application key identifying the caller
    pub app_key: String,

    /// OAuth credentials; when set every call is signed
    pub oauth: Option<OAuthCredentials>,

    /// Emit diagnostic trace lines
    pub debug: bool,

    /// `User-Agent` header value
    pub user_agent: String,

    /// OAuth token exchange endpoints
    pub oauth_endpoints: OAuthEndpoints,
}

impl ClientConfig {
    /// Create a new client configuration for the production endpoint
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_key: app_key.into(),
            oauth: None,
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            oauth_endpoints: OAuthEndpoints::default(),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set OAuth credentials
    pub fn with_oauth(mut self, credentials: OAuthCredentials) -> Self {
        self.oauth = Some(credentials);
        self
    }

    /// Enable or disable diagnostic output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the OAuth token exchange endpoints
    pub fn with_oauth_endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.oauth_endpoints = endpoints;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
