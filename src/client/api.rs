//! High-level Eventful API client

use tower::ServiceExt;
use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    layer::OAuthCredentials,
    protocol::{CallArguments, EventfulError, ResponseFormat},
    service::{ApiRequest, ApiResponse, EventfulService, RequestContext},
    transport::HttpTransport,
};

/// High-level client for the Eventful API
///
/// This client wraps a Tower service and exposes the single `call` operation.
/// Configuration is fixed at construction apart from the debug flag and OAuth
/// credentials, which can be changed between calls.
///
/// # Example
///
/// ```rust,no_run
/// use eventful_api::prelude::*;
///
/// # async fn example() -> Result<(), EventfulError> {
/// let mut client = EventfulClient::http("my-app-key");
///
/// let args = CallArguments::new().with("keywords", "books").with("location", "San Diego");
/// let response = client.call("events/search", args, ResponseFormat::Rest).await?;
///
/// if let Some(root) = response.xml() {
///     println!("Found {} events", root.child_text("total_items").unwrap_or("0"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct EventfulClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> EventfulClient<S>
where
    S: Service<ApiRequest, Response = ApiResponse, Error = EventfulError>,
{
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Store OAuth credentials; every later call is signed
    ///
    /// Calling this again replaces the previous credentials.
    pub fn set_credentials(
        &mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) {
        self.config.oauth = Some(OAuthCredentials::new(
            consumer_key,
            consumer_secret,
            token,
            token_secret,
        ));
    }

    /// Drop OAuth credentials; later calls are unsigned
    pub fn clear_credentials(&mut self) {
        self.config.oauth = None;
    }

    /// Whether calls are OAuth-signed
    pub fn is_signed(&self) -> bool {
        self.config.oauth.is_some()
    }

    /// Turn on diagnostic trace lines
    ///
    /// Credentials in use, the request URL and the raw response body are
    /// logged at `info` level on the `eventful_api::debug` target. Requests
    /// and responses are unaffected.
    pub fn set_debug(&mut self) {
        self.config.debug = true;
    }

    /// Whether diagnostic output is enabled
    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    /// Build a request context from the client configuration
    fn build_context(&self) -> RequestContext {
        RequestContext {
            base_url: self.config.base_url.clone(),
            app_key: self.config.app_key.clone(),
            oauth: self.config.oauth.clone(),
            user_agent: self.config.user_agent.clone(),
            debug: self.config.debug,
        }
    }

    /// Call an API method
    ///
    /// # Arguments
    ///
    /// * `method` - Method name such as `events/search`; leading and trailing
    ///   slashes and whitespace are ignored
    /// * `arguments` - Arguments sent with the call
    /// * `format` - Response format, which also selects the URL prefix
    ///
    /// # Returns
    ///
    /// The parsed document along with the request URL and raw body
    ///
    /// # Errors
    ///
    /// - `EventfulError::HttpStatus` for any status other than 200
    /// - `EventfulError::Remote` when the API reports an error in the body
    /// - `EventfulError::Xml` / `EventfulError::Json` for unparseable bodies
    /// - `EventfulError::Transport` for network failures
    pub async fn call(
        &mut self,
        method: &str,
        arguments: CallArguments,
        format: ResponseFormat,
    ) -> Result<ApiResponse, EventfulError> {
        let request = ApiRequest::new(method, arguments, format, self.build_context());
        self.service.ready().await?.call(request).await
    }

    /// Call an API method, requesting XML
    pub async fn rest(
        &mut self,
        method: &str,
        arguments: CallArguments,
    ) -> Result<ApiResponse, EventfulError> {
        self.call(method, arguments, ResponseFormat::Rest).await
    }

    /// Call an API method, requesting JSON
    pub async fn json(
        &mut self,
        method: &str,
        arguments: CallArguments,
    ) -> Result<ApiResponse, EventfulError> {
        self.call(method, arguments, ResponseFormat::Json).await
    }
}

impl EventfulClient<EventfulService<HttpTransport>> {
    /// Create a client for the production API over HTTP
    ///
    /// No network activity happens until the first call.
    pub fn http(app_key: impl Into<String>) -> Self {
        Self::new(
            EventfulService::new(HttpTransport::new()),
            ClientConfig::new(app_key),
        )
    }

    /// Create a client for a different API endpoint over HTTP
    pub fn http_with_base_url(app_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::new(
            EventfulService::new(HttpTransport::new()),
            ClientConfig::new(app_key).with_base_url(base_url),
        )
    }
}

impl<S: Clone> Clone for EventfulClient<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            config: self.config.clone(),
        }
    }
}
