//! Transport to the analysis backend.
//!
//! [`Backend`] is the seam the orchestrator talks to; [`HttpBackend`] is the
//! reqwest implementation of the two endpoints. A backend only moves bytes
//! and decodes JSON. Deciding whether a body means success is the
//! validator's job, so non-2xx answers with a JSON body are returned as
//! `Ok(body)`: the service reports its own failures as `{"error": ...}`
//! with a 4xx/5xx status.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::request::{AnalyzePayload, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("unexpected response from server (HTTP {status}): body is not JSON")]
    NotJson { status: u16 },
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/upload` with multipart field `file`.
    async fn upload(&self, file: &SelectedFile) -> Result<Value, TransportError>;
    /// `POST /api/analyze` with a JSON body.
    async fn analyze(&self, payload: &AnalyzePayload) -> Result<Value, TransportError>;
    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

pub struct HttpBackend {
    http: Client,
    upload_url: String,
    analyze_url: String,
}

impl HttpBackend {
    pub fn new(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            upload_url: cfg.upload_url(),
            analyze_url: cfg.analyze_url(),
        })
    }

    async fn decode(resp: reqwest::Response) -> Result<Value, TransportError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(map_reqwest)?;
        tracing::debug!(status = status.as_u16(), len = bytes.len(), "backend response");
        serde_json::from_slice(&bytes).map_err(|_| TransportError::NotJson {
            status: status.as_u16(),
        })
    }
}

fn map_reqwest(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Transport(e.to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, file: &SelectedFile) -> Result<Value, TransportError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.filename().to_string())
            .mime_str(file.content_type())
            .map_err(|e| TransportError::Transport(format!("building upload: {e}")))?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest)?;
        Self::decode(resp).await
    }

    async fn analyze(&self, payload: &AnalyzePayload) -> Result<Value, TransportError> {
        let resp = self
            .http
            .post(&self.analyze_url)
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest)?;
        Self::decode(resp).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
