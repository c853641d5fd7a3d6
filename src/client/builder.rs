//! Client builder for constructing Eventful clients

use crate::{
    client::{ClientConfig, EventfulClient},
    layer::OAuthCredentials,
    protocol::EventfulError,
    service::EventfulService,
    transport::{HttpTransport, Transport},
};

/// Builder for constructing Eventful clients
///
/// # Example
///
/// ```rust,no_run
/// use eventful_api::prelude::*;
///
/// # async fn example() -> Result<(), EventfulError> {
/// let mut client = EventfulClientBuilder::new_http("my-app-key")
///     .with_base_url("https://api.eventful.com")
///     .with_oauth("consumer-key", "consumer-secret", "token", "token-secret")
///     .build()?;
///
/// let args = CallArguments::new()
///     .with("title", "Book signing")
///     .with("start_time", "2030-01-01 19:00:00");
/// let created = client.call("events/new", args, ResponseFormat::Json).await?;
/// println!("{}", created.raw_text());
/// # Ok(())
/// # }
/// ```
///
/// # Compiler Error
/// This will fail to compile if it is not clear to the compiler which type
/// implementing `Transport` is being used as the underlying transport.
///
/// ```compile_fail
/// let client = eventful_api::client::EventfulClientBuilder::new("key").build();
/// ```
pub struct EventfulClientBuilder<T: Transport> {
    config: ClientConfig,
    transport: Option<T>,
}

impl<T: Transport> EventfulClientBuilder<T> {
    /// Start a builder without a transport
    ///
    /// # Arguments
    ///
    /// * `app_key` - The application key issued for the caller
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(app_key),
            transport: None,
        }
    }

    /// Use a custom transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport implementation to use
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Sign every call with OAuth
    pub fn with_oauth(
        mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        self.config.oauth = Some(OAuthCredentials::new(
            consumer_key,
            consumer_secret,
            token,
            token_secret,
        ));
        self
    }

    /// Set OAuth credentials
    pub fn with_credentials(mut self, credentials: OAuthCredentials) -> Self {
        self.config.oauth = Some(credentials);
        self
    }

    /// Enable or disable diagnostic output
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Set the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<EventfulClient<EventfulService<T>>, EventfulError> {
        let transport = self.transport.ok_or_else(|| {
            EventfulError::Config(
                "Transport not configured. Call new_http() or with_transport()".into(),
            )
        })?;

        Ok(EventfulClient::new(EventfulService::new(transport), self.config))
    }
}

impl EventfulClientBuilder<HttpTransport> {
    /// Create a new client builder with the reqwest HTTP transport
    ///
    /// # Arguments
    ///
    /// * `app_key` - The application key issued for the caller
    pub fn new_http(app_key: impl Into<String>) -> Self {
        Self::new(app_key).with_transport(HttpTransport::new())
    }
}
