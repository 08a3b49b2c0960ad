//! Network boundary for Heybox API calls.
//!
//! The bot only talks to the platform through [`Transport`]. The default
//! implementation wraps `reqwest::Client`; tests substitute an in-memory one.

use std::future::Future;
use std::time::Duration;

use anyhow::Context as _;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// A file part of a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name
    pub name: String,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// Transport-agnostic description of one API request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub json: Option<Value>,
    pub files: Vec<FilePart>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            json: None,
            files: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Value of the first header named `name`
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first query parameter named `name`
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code and undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Status in `200..300`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Executes requests against the platform.
///
/// Errors mean no response was obtained at all (connection refused, DNS,
/// timeout). Any HTTP status, including 4xx/5xx, is a successful call.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = anyhow::Result<HttpResponse>> + Send;
}

/// `reqwest`-backed transport
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { inner })
    }

    /// Wrap an existing client
    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            query,
            json,
            files,
        } = request;

        let mut builder = self.inner.request(method.clone(), &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &json {
            builder = builder.json(body);
        }
        if !files.is_empty() {
            let mut form = reqwest::multipart::Form::new();
            for file in files {
                let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
                if let Some(mime) = &file.mime {
                    part = part
                        .mime_str(mime)
                        .with_context(|| format!("Invalid mime type '{mime}'"))?;
                }
                form = form.part(file.name, part);
            }
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(%method, %url, status_code, body_len = body.len(), "Heybox HTTP response received");

        Ok(HttpResponse { status_code, body })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::post("https://example.com/send")
            .header("token", "abc")
            .query("chat_os_type", "bot")
            .json(json!({"msg": "hi"}));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header_value("TOKEN"), Some("abc"));
        assert_eq!(request.query_value("chat_os_type"), Some("bot"));
        assert_eq!(request.query_value("missing"), None);
        assert!(request.files.is_empty());
    }

    #[test]
    fn test_success_range() {
        let ok = |status_code| HttpResponse {
            status_code,
            body: Vec::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(299).is_success());
        assert!(!ok(300).is_success());
        assert!(!ok(404).is_success());
    }

    #[tokio::test]
    async fn test_reqwest_sends_query_headers_and_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("chat_os_type".into(), "bot".into()),
                Matcher::UrlEncoded("nonce".into(), "n1".into()),
            ]))
            .match_header("token", "secret")
            .match_body(Matcher::Json(json!({"msg": "hello"})))
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let request = HttpRequest::post(format!("{}/send", server.url()))
            .header("token", "secret")
            .query("chat_os_type", "bot")
            .query("nonce", "n1")
            .json(json!({"msg": "hello"}));

        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, br#"{"status":"ok"}"#.to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reqwest_returns_error_status_as_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/upload")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let request = HttpRequest::post(format!("{}/upload", server.url())).file(FilePart {
            name: "file".into(),
            filename: "a.png".into(),
            bytes: vec![1, 2, 3],
            mime: None,
        });

        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status_code, 403);
        assert_eq!(response.body, b"forbidden".to_vec());
    }

    #[tokio::test]
    async fn test_reqwest_connection_failure_is_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let result = transport
            .execute(HttpRequest::post("http://127.0.0.1:9/send"))
            .await;
        assert!(result.is_err());
    }
}
