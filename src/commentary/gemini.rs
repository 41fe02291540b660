//! Minimal `generateContent` client over hyper.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use super::GameEvent;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_OUTPUT_TOKENS: u32 = 60;
const TEMPERATURE: f32 = 0.9;

const SYSTEM_INSTRUCTION: &str = "You are Lumina, the upbeat AI operator of a neon cyber-snake \
game. You are energetic, supportive and a little strict, and you like kaomoji such as (*^ω^*), \
(ToT) or (Ò_Ó). Reply in under 25 words. React to the game event you are given.";

/// Failure talking to the commentary API.
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("invalid operator endpoint: {0}")]
    Endpoint(String),
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),
    #[error("tls setup failed: {0}")]
    Tls(#[from] rustls::Error),
    #[error("http error: {0}")]
    Http(#[from] hyper::Error),
    #[error("could not build request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("operator api returned {0}")]
    Status(StatusCode),
    #[error("malformed operator reply: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("operator request timed out")]
    Timeout,
}

/// Builds the user prompt for one event.
#[must_use]
pub fn prompt(event: GameEvent, score: u32, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "Event: {}. Current Score: {score}. Context: {context}",
            event.label()
        ),
        None => format!("Event: {}. Current Score: {score}.", event.label()),
    }
}

/// HTTP client for one model on one endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    endpoint: Uri,
    model: String,
    api_key: String,
    tls: TlsConnector,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client for `endpoint` (`http` or `https`, no path).
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, CommentaryError> {
        let endpoint: Uri = endpoint
            .parse()
            .map_err(|error| CommentaryError::Endpoint(format!("{endpoint}: {error}")))?;

        match endpoint.scheme_str() {
            Some("http" | "https") => {}
            _ => return Err(CommentaryError::Endpoint(endpoint.to_string())),
        }
        if endpoint.host().is_none() {
            return Err(CommentaryError::Endpoint(endpoint.to_string()));
        }

        Ok(Self {
            endpoint,
            model: model.into(),
            api_key: api_key.into(),
            tls: tls_connector()?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `prompt` and returns the reply text, trimmed. May be empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, CommentaryError> {
        let request = self.build_request(prompt)?;

        let response = tokio::time::timeout(self.timeout, self.send(request))
            .await
            .map_err(|_| CommentaryError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            return Err(CommentaryError::Status(status));
        }

        let body = tokio::time::timeout(self.timeout, response.into_body().collect())
            .await
            .map_err(|_| CommentaryError::Timeout)??
            .to_bytes();

        let reply: GenerateResponse = serde_json::from_slice(&body)?;
        Ok(reply.text())
    }

    fn build_request(&self, prompt: &str) -> Result<Request<Full<Bytes>>, CommentaryError> {
        let payload = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        };
        let body = serde_json::to_vec(&payload)?;

        let authority = self
            .endpoint
            .authority()
            .map(|authority| authority.as_str().to_owned())
            .unwrap_or_default();
        let path = format!("/v1beta/models/{}:generateContent", self.model);

        let request = Request::post(path)
            .header(HOST, authority)
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &self.api_key)
            .body(Full::new(Bytes::from(body)))?;

        Ok(request)
    }

    async fn send(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, CommentaryError> {
        let host = self
            .endpoint
            .host()
            .ok_or_else(|| CommentaryError::Endpoint(self.endpoint.to_string()))?;
        let https = self.endpoint.scheme_str() == Some("https");
        let port = self
            .endpoint
            .port_u16()
            .unwrap_or(if https { 443 } else { 80 });

        let tcp = TcpStream::connect((host, port)).await?;
        tcp.set_nodelay(true)?;

        if !https {
            return exchange(TokioIo::new(tcp), request).await;
        }

        let server_name = ServerName::try_from(host.to_owned())
            .map_err(|error| CommentaryError::Endpoint(format!("{host}: {error}")))?;
        let tls = self.tls.connect(server_name, tcp).await?;
        exchange(TokioIo::new(tls), request).await
    }
}

async fn exchange<T>(
    io: T,
    request: Request<Full<Bytes>>,
) -> Result<Response<Incoming>, CommentaryError>
where
    T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (mut sender, connection) = hyper::client::conn::http1::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(error) = connection.await {
            debug!(%error, "operator connection closed with error");
        }
    });

    Ok(sender.send_request(request).await?)
}

fn tls_connector() -> Result<TlsConnector, CommentaryError> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Debug, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_owned()
    }
}
