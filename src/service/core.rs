//! Core Eventful service implementation

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use tower_service::Service;

use crate::{
    codec::{codec_for, encode_form, form::FORM_CONTENT_TYPE, Codec, MultipartBody},
    layer::OAuthSigner,
    protocol::{ArgValue, CallArguments, EventfulError, EventfulResult, ResponseEnvelope},
    service::{ApiRequest, ApiResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Form field carrying the application key
pub const APP_KEY_FIELD: &str = "app_key";

/// Name the application key travels under in signed multipart requests
pub const OAUTH_APP_KEY_FIELD: &str = "oauth_app_key";

const DEBUG_TARGET: &str = "eventful_api::debug";

/// Core Eventful service that wraps a transport
///
/// Each call is one independent request/response cycle: build the POST body
/// (form or multipart), sign it when the context carries OAuth credentials,
/// execute it, reject non-200 statuses and decode the body with the codec for
/// the requested format.
pub struct EventfulService<T> {
    transport: T,
}

impl<T> EventfulService<T>
where
    T: Transport,
{
    /// Create a new Eventful service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Build a transport request from an API request
    async fn build_transport_request(req: &ApiRequest) -> EventfulResult<TransportRequest> {
        let url = req.url()?;
        let context = &req.context;
        let multipart = req.arguments.has_files();

        let transport_req = TransportRequest::new(url.clone(), "POST")
            .header("Accept", req.format.accept())
            .header("User-Agent", context.user_agent.clone());

        let Some(credentials) = &context.oauth else {
            let (content_type, body) = if multipart {
                encode_multipart(Some(&context.app_key), &req.arguments).await?
            } else {
                let fields = unsigned_fields(&context.app_key, &req.arguments);
                (
                    FORM_CONTENT_TYPE.to_string(),
                    encode_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
                )
            };

            return Ok(transport_req
                .header("Content-Type", content_type)
                .body(body));
        };

        if context.debug {
            tracing::info!(
                target: DEBUG_TARGET,
                consumer_key = %credentials.consumer_key,
                token = %credentials.token,
                app_key = %context.app_key,
                "Signing request with OAuth credentials"
            );
        }

        let signer = OAuthSigner::new(credentials);
        let (authorization, content_type, body) = if multipart {
            // Multipart bodies are not signed, so the key rides in the header.
            let extra = vec![(OAUTH_APP_KEY_FIELD.to_string(), context.app_key.clone())];
            let authorization = signer.authorization("POST", &url, &extra, &[])?;
            let (content_type, body) = encode_multipart(None, &req.arguments).await?;
            (authorization, content_type, body)
        } else {
            let fields = unsigned_fields(&context.app_key, &req.arguments);
            let authorization = signer.authorization("POST", &url, &[], &fields)?;
            let body = encode_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            (authorization, FORM_CONTENT_TYPE.to_string(), body)
        };

        Ok(transport_req
            .header("Authorization", authorization)
            .header("Content-Type", content_type)
            .body(body))
    }

    /// Parse a transport response into an API response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        request_uri: String,
    ) -> EventfulResult<ApiResponse> {
        if !transport_resp.is_ok() {
            let reason = transport_resp.reason.unwrap_or_default();
            tracing::debug!(
                status = transport_resp.status,
                %reason,
                url = %request_uri,
                body = %String::from_utf8_lossy(&transport_resp.body),
                "Request failed"
            );
            return Err(EventfulError::http_status(transport_resp.status, reason)
                .with_response(request_uri, transport_resp.body));
        }

        match codec.decode_response(&transport_resp.body)? {
            ResponseEnvelope::Success(document) => Ok(ApiResponse {
                document,
                request_uri,
                raw_body: transport_resp.body,
            }),
            ResponseEnvelope::RemoteError { code, description } => {
                tracing::debug!(
                    %code,
                    %description,
                    url = %request_uri,
                    body = %String::from_utf8_lossy(&transport_resp.body),
                    "API reported an error"
                );
                Err(EventfulError::remote(code, description)
                    .with_response(request_uri, transport_resp.body))
            }
        }
    }
}

/// `app_key` followed by every text field, repeated values expanded
fn unsigned_fields(app_key: &str, arguments: &CallArguments) -> Vec<(String, String)> {
    std::iter::once((APP_KEY_FIELD.to_string(), app_key.to_string()))
        .chain(
            arguments
                .text_fields()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        )
        .collect()
}

/// Encode arguments as multipart, in order, with an optional leading `app_key`
async fn encode_multipart(
    app_key: Option<&str>,
    arguments: &CallArguments,
) -> EventfulResult<(String, Bytes)> {
    let mut body = MultipartBody::new();

    if let Some(app_key) = app_key {
        body = body.text(APP_KEY_FIELD, app_key);
    }

    for (name, value) in arguments.iter() {
        body = match value {
            ArgValue::Scalar(value) => body.text(name, value),
            ArgValue::Repeated(values) => values
                .iter()
                .fold(body, |body, value| body.text(name, value)),
            ArgValue::File(payload) => body.file(name, &payload.load().await?),
            ArgValue::Files(payloads) => {
                let mut body = body;
                for payload in payloads {
                    body = body.file(name, &payload.load().await?);
                }
                body
            }
        };
    }

    Ok(body.finish())
}

impl<T> Service<ApiRequest> for EventfulService<T>
where
    T: Transport + Clone,
{
    type Response = ApiResponse;
    type Error = EventfulError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: ApiRequest) -> Self::Future {
        let transport = self.transport.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req).await?;
            let request_uri = transport_req.url.clone();
            let debug = req.context.debug;

            tracing::debug!(url = %request_uri, signed = req.is_signed(), "Calling Eventful API");
            if debug {
                tracing::info!(target: DEBUG_TARGET, url = %request_uri, "Request URI");
            }

            let transport_resp = transport.execute(transport_req).await?;

            if debug {
                tracing::info!(
                    target: DEBUG_TARGET,
                    status = transport_resp.status,
                    body = %String::from_utf8_lossy(&transport_resp.body),
                    "Response received"
                );
            }

            let codec = codec_for(req.format);
            Self::parse_transport_response(transport_resp, codec.as_ref(), request_uri)
        })
    }
}

impl<T> Clone for EventfulService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        codec::form::decode_form,
        layer::OAuthCredentials,
        protocol::{Document, FilePayload, ResponseFormat},
        service::RequestContext,
        transport::mock::MockTransport,
    };

    use super::*;

    const SEARCH_XML: &str = r#"<search><total_items>0</total_items></search>"#;

    fn context() -> RequestContext {
        RequestContext::new("https://api.eventful.com", "APPKEY")
    }

    fn signed_context() -> RequestContext {
        context().with_oauth(OAuthCredentials::new("ck", "cs", "tok", "ts"))
    }

    async fn call(
        transport: MockTransport,
        method: &str,
        arguments: CallArguments,
        format: ResponseFormat,
        context: RequestContext,
    ) -> EventfulResult<ApiResponse> {
        let mut service = EventfulService::new(transport);
        service
            .call(ApiRequest::new(method, arguments, format, context))
            .await
    }

    fn body_text(request: &TransportRequest) -> String {
        String::from_utf8(request.body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unsigned_form_request() {
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new()
            .with("keywords", "jazz")
            .with("category", vec!["a", "b"]);

        let response = call(
            transport.clone(),
            "/events/search",
            args,
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://api.eventful.com/rest/events/search");
        assert_eq!(request.header_value("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(request.header_value("Accept"), Some("text/xml"));
        assert!(request.header_value("Authorization").is_none());
        assert_eq!(
            decode_form(&request.body),
            vec![
                ("app_key".to_string(), "APPKEY".to_string()),
                ("keywords".to_string(), "jazz".to_string()),
                ("category".to_string(), "a".to_string()),
                ("category".to_string(), "b".to_string()),
            ]
        );

        assert_eq!(response.request_uri, "https://api.eventful.com/rest/events/search");
        assert_eq!(response.raw_text(), SEARCH_XML);
        assert_eq!(response.xml().unwrap().name, "search");
    }

    #[tokio::test]
    async fn test_method_spellings_produce_same_url() {
        for method in ["events/search", "/events/search", " events/search/ "] {
            let transport = MockTransport::ok(SEARCH_XML);
            call(
                transport.clone(),
                method,
                CallArguments::new(),
                ResponseFormat::Rest,
                context(),
            )
            .await
            .unwrap();

            assert_eq!(
                transport.last_request().url,
                "https://api.eventful.com/rest/events/search"
            );
        }
    }

    #[tokio::test]
    async fn test_empty_method_fails_before_sending() {
        let transport = MockTransport::ok(SEARCH_XML);

        let err = call(
            transport.clone(),
            "/",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EventfulError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unsigned_file_upload_is_multipart() {
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new()
            .with("id", "E0-001")
            .with_file("photo_file", FilePayload::bytes("photo.jpg", &b"JPEGDATA"[..]));

        call(
            transport.clone(),
            "images/new",
            args,
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        let content_type = request.header_value("Content-Type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = body_text(&request);
        assert!(body.contains("name=\"app_key\"\r\n\r\nAPPKEY\r\n"));
        assert!(body.contains("name=\"id\"\r\n\r\nE0-001\r\n"));
        assert!(body.contains("name=\"photo_file\"; filename=\"photo.jpg\""));
        assert!(body.contains("JPEGDATA"));
        assert!(!body.contains("name=\"photo_file\"\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_file_suffix_reads_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flyer.png");
        std::fs::write(&path, b"PNGDATA").unwrap();

        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new().with("image_file", path.to_string_lossy().to_string());

        call(
            transport.clone(),
            "images/new",
            args,
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap();

        let body = body_text(&transport.last_request());
        assert!(body.contains("filename=\"flyer.png\""));
        assert!(body.contains("PNGDATA"));
    }

    fn photo_paths(dir: &tempfile::TempDir) -> Vec<String> {
        ["a.jpg", "b.jpg"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, format!("DATA-{}", name)).unwrap();
                path.to_string_lossy().into_owned()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_repeated_file_suffix_uploads_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new().with("photos_file", photo_paths(&dir));

        call(
            transport.clone(),
            "images/new",
            args,
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        assert!(request
            .header_value("Content-Type")
            .unwrap()
            .starts_with("multipart/form-data"));

        let body = body_text(&request);
        assert!(body.contains("name=\"app_key\"\r\n\r\nAPPKEY\r\n"));
        assert!(body.contains("name=\"photos_file\"; filename=\"a.jpg\""));
        assert!(body.contains("name=\"photos_file\"; filename=\"b.jpg\""));
        assert!(body.contains("DATA-a.jpg"));
        assert!(body.contains("DATA-b.jpg"));
        assert!(!body.contains("name=\"photos_file\"\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_signed_repeated_file_suffix_renames_app_key() {
        let dir = tempfile::tempdir().unwrap();
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new().with("photos_file", photo_paths(&dir));

        call(
            transport.clone(),
            "images/new",
            args,
            ResponseFormat::Rest,
            signed_context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        let authorization = request.header_value("Authorization").unwrap();
        assert!(authorization.contains("oauth_app_key=\"APPKEY\""));
        assert!(request
            .header_value("Content-Type")
            .unwrap()
            .starts_with("multipart/form-data"));

        let body = body_text(&request);
        assert!(!body.contains("name=\"app_key\""));
        assert!(body.contains("filename=\"a.jpg\""));
        assert!(body.contains("filename=\"b.jpg\""));
    }

    #[tokio::test]
    async fn test_signed_form_request() {
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new().with("title", "Gig");

        call(
            transport.clone(),
            "events/new",
            args,
            ResponseFormat::Rest,
            signed_context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        let authorization = request.header_value("Authorization").unwrap();
        assert!(authorization.starts_with("OAuth "));
        assert!(authorization.contains("oauth_consumer_key=\"ck\""));
        assert!(authorization.contains("oauth_token=\"tok\""));
        assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(!authorization.contains("oauth_app_key"));

        assert_eq!(request.header_value("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            decode_form(&request.body),
            vec![
                ("app_key".to_string(), "APPKEY".to_string()),
                ("title".to_string(), "Gig".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_signed_file_upload_renames_app_key() {
        let transport = MockTransport::ok(SEARCH_XML);
        let args = CallArguments::new()
            .with("id", "E0-001")
            .with_file("photo_file", FilePayload::bytes("photo.jpg", &b"JPEGDATA"[..]));

        call(
            transport.clone(),
            "images/new",
            args,
            ResponseFormat::Rest,
            signed_context(),
        )
        .await
        .unwrap();

        let request = transport.last_request();
        let authorization = request.header_value("Authorization").unwrap();
        assert!(authorization.contains("oauth_app_key=\"APPKEY\""));

        assert!(request
            .header_value("Content-Type")
            .unwrap()
            .starts_with("multipart/form-data"));

        let body = body_text(&request);
        assert!(!body.contains("name=\"app_key\""));
        assert!(body.contains("name=\"photo_file\"; filename=\"photo.jpg\""));
        assert!(body.contains("name=\"id\"\r\n\r\nE0-001\r\n"));
    }

    #[tokio::test]
    async fn test_xml_remote_error() {
        let transport =
            MockTransport::ok(r#"<error string="E1"><description>bad thing</description></error>"#);

        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("E1"));
        assert!(message.contains("bad thing"));
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_json_remote_error() {
        let transport = MockTransport::ok(r#"{"error":1,"status":"E2","description":"bad thing"}"#);

        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Json,
            context(),
        )
        .await
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("E2"));
        assert!(message.contains("bad thing"));
    }

    #[tokio::test]
    async fn test_json_falsy_error_is_success() {
        let transport = MockTransport::ok(r#"{"error":0,"status":"ok","id":"E0-001"}"#);

        let response = call(
            transport.clone(),
            "events/get",
            CallArguments::new(),
            ResponseFormat::Json,
            context(),
        )
        .await
        .unwrap();

        assert_eq!(response.json().unwrap()["id"], "E0-001");
        let request = transport.last_request();
        assert_eq!(request.url, "https://api.eventful.com/json/events/get");
        assert_eq!(request.header_value("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_non_200_status_ignores_body() {
        let transport = MockTransport::new(|_| {
            TransportResponse::new(404)
                .reason("Not Found")
                .body(r#"<error string="E1"><description>bad thing</description></error>"#)
        });

        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(404));
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));
        assert!(!message.contains("bad thing"));
    }

    #[tokio::test]
    async fn test_errors_keep_request_uri_and_body() {
        let error_xml = r#"<error string="E1"><description>bad thing</description></error>"#;

        let transport = MockTransport::ok(error_xml);
        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        assert!(err.is_remote());
        assert_eq!(err.request_uri(), Some("https://api.eventful.com/rest/events/get"));
        assert_eq!(err.response_body().unwrap().as_ref(), error_xml.as_bytes());

        let transport = MockTransport::new(|_| {
            TransportResponse::new(500)
                .reason("Internal Server Error")
                .body("oops")
        });
        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Json,
            context(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.request_uri(), Some("https://api.eventful.com/json/events/get"));
        assert_eq!(err.response_body().unwrap().as_ref(), b"oops");
    }

    #[tokio::test]
    async fn test_other_success_codes_are_errors() {
        let transport = MockTransport::new(|_| TransportResponse::new(201).body(SEARCH_XML));

        let err = call(
            transport,
            "events/new",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(201));
    }

    #[tokio::test]
    async fn test_malformed_body_propagates_parse_error() {
        let transport = MockTransport::ok("<<<");

        let err = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EventfulError::Xml(_)));
    }

    #[tokio::test]
    async fn test_xml_success_document() {
        let transport = MockTransport::ok(r#"<event id="E0-001"><title>Gig</title></event>"#);

        let response = call(
            transport,
            "events/get",
            CallArguments::new(),
            ResponseFormat::Rest,
            context(),
        )
        .await
        .unwrap();

        match response.document {
            Document::Xml(root) => {
                assert_eq!(root.name, "event");
                assert_eq!(root.child_text("title"), Some("Gig"));
            }
            other => panic!("Expected XML document, got {:?}", other),
        }
    }
}
