use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, FetchProgress, RequestId,
};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
            allowed_content_types: vec!["text/plain".to_string()],
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Downloads the raw feed body for one request.
#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        let limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    /// Rejects non-2xx answers, oversized declared bodies and foreign media types.
    /// Returns the Content-Type header, which the decoder needs for the charset.
    fn accept(&self, response: &reqwest::Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        match content_type.as_deref() {
            Some(header) if !self.is_text_feed(header) => Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: header.to_string(),
                },
                "unsupported content type",
            )),
            _ => Ok(content_type),
        }
    }

    fn is_text_feed(&self, content_type: &str) -> bool {
        let mime = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }

    fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        if actual <= self.settings.max_bytes {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        ))
    }

    async fn read_body(
        &self,
        response: reqwest::Response,
        report: impl Fn(u64),
    ) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        report(0);

        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
            report(body.len() as u64);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl FeedFetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        request_id: RequestId,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let content_type = self.accept(&response)?;
        let bytes = self
            .read_body(response, |bytes| {
                sink.emit(EngineEvent::Progress(FetchProgress { request_id, bytes }));
            })
            .await?;

        Ok(FetchOutput {
            metadata: FetchMetadata {
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
