//! OAuth 1.0a request signing
//!
//! Signed requests carry an `Authorization: OAuth ...` header with an
//! HMAC-SHA1 signature over the request method, the normalized URL and the
//! sorted parameter set (RFC 5849, section 3.4).

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tower_layer::Layer;
use tower_service::Service;
use url::Url;
use uuid::Uuid;

use crate::{
    protocol::{EventfulError, EventfulResult},
    service::{ApiRequest, ApiResponse},
};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// OAuth consumer and access-token credentials
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl OAuthCredentials {
    /// Create a credential set
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// Percent-encode a value as RFC 3986 requires for OAuth
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Signs one request with a fixed nonce and timestamp
///
/// A fresh signer draws a random nonce and the current time; tests pin both
/// with [`OAuthSigner::with_nonce`] and [`OAuthSigner::with_timestamp`].
#[derive(Debug, Clone)]
pub struct OAuthSigner<'a> {
    credentials: &'a OAuthCredentials,
    nonce: String,
    timestamp: i64,
}

impl<'a> OAuthSigner<'a> {
    /// Create a signer with a random nonce and the current timestamp
    pub fn new(credentials: &'a OAuthCredentials) -> Self {
        Self {
            credentials,
            nonce: Uuid::new_v4().simple().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Use a fixed nonce
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    /// Use a fixed timestamp (seconds since the epoch)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The `oauth_*` protocol parameters, without the signature
    pub fn protocol_params(&self) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".into(), self.credentials.consumer_key.clone()),
            ("oauth_nonce".into(), self.nonce.clone()),
            ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
            ("oauth_timestamp".into(), self.timestamp.to_string()),
            ("oauth_token".into(), self.credentials.token.clone()),
            ("oauth_version".into(), OAUTH_VERSION.into()),
        ]
    }

    /// Build the signature base string
    ///
    /// Query parameters on `url` are folded into `params`; the URL itself is
    /// normalized to scheme, host, non-default port and path.
    pub fn base_string(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> EventfulResult<String> {
        let mut url = Url::parse(url)
            .map_err(|e| EventfulError::InvalidArgument(format!("Invalid URL {}: {}", url, e)))?;

        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.extend(
            url.query_pairs()
                .map(|(k, v)| (percent_encode(&k), percent_encode(&v))),
        );
        encoded.sort();

        url.set_query(None);
        url.set_fragment(None);

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!(
            "{}&{}&{}",
            method.to_ascii_uppercase(),
            percent_encode(url.as_str()),
            percent_encode(&param_string)
        ))
    }

    /// HMAC-SHA1 signature of a base string, base64 encoded
    pub fn signature(&self, base_string: &str) -> EventfulResult<String> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| EventfulError::Config(format!("Invalid signing key: {}", e)))?;
        mac.update(base_string.as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Sign a request and return the `Authorization` header value
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `url` - Full request URL
    /// * `extra_oauth` - Additional parameters that travel in the header and are signed
    /// * `body_params` - Form fields that are signed but stay in the body
    pub fn authorization(
        &self,
        method: &str,
        url: &str,
        extra_oauth: &[(String, String)],
        body_params: &[(String, String)],
    ) -> EventfulResult<String> {
        let mut header_params = self.protocol_params();
        header_params.extend(extra_oauth.iter().cloned());

        let mut signed = header_params.clone();
        signed.extend(body_params.iter().cloned());

        let base_string = self.base_string(method, url, &signed)?;
        let signature = self.signature(&base_string)?;
        tracing::trace!(base_string = %base_string, "Signed OAuth request");

        header_params.push(("oauth_signature".into(), signature));
        header_params.sort();

        let fields = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", fields))
    }
}

/// Layer that switches every request it sees into signed mode
#[derive(Clone, Debug)]
pub struct OAuthLayer {
    credentials: OAuthCredentials,
}

impl OAuthLayer {
    /// Create a new OAuth layer
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }
}

impl<S> Layer<S> for OAuthLayer {
    type Service = OAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OAuthService {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

/// Service that injects OAuth credentials into each request context
#[derive(Clone)]
pub struct OAuthService<S> {
    inner: S,
    credentials: OAuthCredentials,
}

impl<S> Service<ApiRequest> for OAuthService<S>
where
    S: Service<ApiRequest, Response = ApiResponse, Error = EventfulError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = ApiResponse;
    type Error = EventfulError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: ApiRequest) -> Self::Future {
        req.context.oauth = Some(self.credentials.clone());

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
