//! Eventful service request types

use crate::{
    layer::OAuthCredentials,
    protocol::{normalize_method, CallArguments, EventfulError, EventfulResult, ResponseFormat},
    transport::http::DEFAULT_USER_AGENT,
};

/// A request to the Eventful service
///
/// One API method invocation with its arguments and the context needed to
/// build the HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Method name, e.g. `events/search`; surrounding slashes and spaces are ignored
    pub method: String,

    /// Arguments sent as form fields or file uploads
    pub arguments: CallArguments,

    /// Response format, also part of the URL
    pub format: ResponseFormat,

    /// Request context (endpoint, keys, signing)
    pub context: RequestContext,
}

impl ApiRequest {
    /// Create a new request
    pub fn new(
        method: impl Into<String>,
        arguments: CallArguments,
        format: ResponseFormat,
        context: RequestContext,
    ) -> Self {
        Self {
            method: method.into(),
            arguments,
            format,
            context,
        }
    }

    /// Full request URL: `{base_url}/{format}/{method}`
    ///
    /// # Errors
    ///
    /// Returns `EventfulError::InvalidArgument` if the method name is empty
    /// after trimming.
    pub fn url(&self) -> EventfulResult<String> {
        let method = normalize_method(&self.method);
        if method.is_empty() {
            return Err(EventfulError::InvalidArgument(
                "Method name cannot be empty".into(),
            ));
        }

        Ok(format!(
            "{}/{}/{}",
            self.context.base_url.trim_end_matches('/'),
            self.format.path_segment(),
            method
        ))
    }

    /// Whether this request will be OAuth-signed
    pub fn is_signed(&self) -> bool {
        self.context.oauth.is_some()
    }
}

/// Request context containing endpoint and credentials
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Base URL of the API
    pub base_url: String,

    /// Application key sent with every call
    pub app_key: String,

    /// OAuth credentials; `Some` switches the request into signed mode
    pub oauth: Option<OAuthCredentials>,

    /// `User-Agent` header value
    pub user_agent: String,

    /// Emit diagnostic trace lines for this request
    pub debug: bool,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(base_url: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            app_key: app_key.into(),
            oauth: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
        }
    }

    /// Set OAuth credentials
    pub fn with_oauth(mut self, credentials: OAuthCredentials) -> Self {
        self.oauth = Some(credentials);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable diagnostic output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
