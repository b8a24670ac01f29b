use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, instrument};

use crate::config::SparkPostConfig;
use crate::error::SparkPostError;
use crate::response::RawResponse;
use crate::types::Transmission;

/// Carries a serialized transmission to `SparkPost`.
///
/// Implementations make exactly one request per call and return the raw
/// status and body without interpreting them.
#[async_trait]
pub trait TransmissionTransport: Send + Sync + std::fmt::Debug {
    /// POST `transmission` authenticated with `api_key`.
    async fn send(
        &self,
        transmission: &Transmission,
        api_key: &str,
    ) -> Result<RawResponse, SparkPostError>;
}

/// HTTPS transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport for the endpoint described by `config`.
    ///
    /// A client-side timeout is only applied when `timeout_secs` is set.
    pub fn new(config: &SparkPostConfig) -> Result<Self, SparkPostError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SparkPostError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Use a caller-supplied `reqwest::Client`.
    pub fn with_client(config: &SparkPostConfig, client: Client) -> Self {
        Self {
            client,
            url: config.transmissions_url(),
        }
    }

    /// The Transmissions endpoint this transport posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TransmissionTransport for HttpTransport {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn send(
        &self,
        transmission: &Transmission,
        api_key: &str,
    ) -> Result<RawResponse, SparkPostError> {
        let body = serde_json::to_vec(transmission).map_err(|e| {
            SparkPostError::InvalidMessage(format!("failed to serialize transmission: {e}"))
        })?;

        debug!(bytes = body.len(), "posting transmission");

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "transmission request failed");
                SparkPostError::Http(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, "received SparkPost response");
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;
    use crate::types::{TransmissionAddress, TransmissionContent, TransmissionOptions};

    /// A one-shot HTTP server that records the request it receives.
    struct MockSparkPostServer {
        listener: tokio::net::TcpListener,
        base_url: String,
    }

    impl MockSparkPostServer {
        async fn start() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            let base_url = format!("http://127.0.0.1:{port}");
            Self { listener, base_url }
        }

        /// Accept one connection, answer with `status_code` and `body`, and
        /// return the raw request text.
        async fn respond_once(self, status_code: u16, body: &str) -> String {
            let (mut stream, _) = self.listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let response = format!(
                "HTTP/1.1 {status_code} OK\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        }
    }

    /// Read headers, then as many body bytes as `Content-Length` announces.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(data).unwrap()
    }

    fn transmission() -> Transmission {
        Transmission {
            recipients: Vec::new(),
            content: TransmissionContent {
                from: TransmissionAddress {
                    email: "shop@x.com".into(),
                    name: None,
                },
                reply_to: None,
                subject: "Hello".into(),
                html: None,
                text: "hi".into(),
            },
            options: TransmissionOptions {
                open_tracking: true,
                click_tracking: false,
                transactional: None,
                sandbox: None,
                skip_suppression: None,
                inline_css: None,
                ip_pool: None,
            },
            campaign_id: None,
            return_path: None,
        }
    }

    #[test]
    fn url_points_at_transmissions_endpoint() {
        let config = SparkPostConfig::new("key").with_api_base_url("http://localhost:9999");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url(), "http://localhost:9999/api/v1/transmissions");
    }

    #[tokio::test]
    async fn send_posts_json_with_bare_api_key() {
        let server = MockSparkPostServer::start().await;
        let config = SparkPostConfig::new("secret-key").with_api_base_url(&server.base_url);
        let transport = HttpTransport::new(&config).unwrap();

        let server_handle =
            tokio::spawn(async move { server.respond_once(200, r#"{"results":{"id":"1"}}"#).await });

        let raw = transport.send(&transmission(), "secret-key").await.unwrap();
        let request = server_handle.await.unwrap();

        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, r#"{"results":{"id":"1"}}"#);

        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /api/v1/transmissions HTTP/1.1\r\n"));
        assert!(lower.contains("\r\nauthorization: secret-key\r\n"));
        assert!(!lower.contains("bearer"));
        assert!(lower.contains("\r\ncontent-type: application/json\r\n"));

        let body = request.split_once("\r\n\r\n").unwrap().1;
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent, serde_json::to_value(transmission()).unwrap());
    }

    #[tokio::test]
    async fn send_returns_error_bodies_unchanged() {
        let server = MockSparkPostServer::start().await;
        let config = SparkPostConfig::new("key").with_api_base_url(&server.base_url);
        let transport = HttpTransport::new(&config).unwrap();

        let body = r#"{"errors":[{"message":"Unauthorized."}]}"#;
        let server_handle = tokio::spawn(async move { server.respond_once(401, body).await });

        let raw = transport.send(&transmission(), "key").await.unwrap();
        server_handle.await.unwrap();

        assert_eq!(raw.status, 401);
        assert_eq!(raw.body, body);
    }

    #[tokio::test]
    async fn connection_failure_is_http_error() {
        // Nothing listens on port 1.
        let config = SparkPostConfig::new("key").with_api_base_url("http://127.0.0.1:1");
        let transport = HttpTransport::new(&config).unwrap();

        let err = transport.send(&transmission(), "key").await.unwrap_err();
        assert!(matches!(err, SparkPostError::Http(_)));
    }
}
