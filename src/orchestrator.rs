//! Request orchestration: one submission in, one outcome out.
//!
//! Flow per submission:
//! 1) take a ticket (cancels whatever was in flight),
//! 2) validate input locally; on failure no network call is made,
//! 3) file mode only: upload, validate the upload body,
//! 4) analyze, validate the analysis body.
//!
//! Every backend call is bounded by the configured timeout. Nothing is
//! retried, and a failed analyze call does not undo an earlier upload.
//!
//! Only the newest ticket may produce a result. Taking a new ticket, or
//! calling [`Orchestrator::invalidate`] on a mode switch, makes any older
//! submission resolve to [`AnalysisFailure::Superseded`] right away; its
//! in-flight HTTP future is dropped.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::{Backend, HttpBackend, TransportError};
use crate::config::ClientConfig;
use crate::error::AnalysisFailure;
use crate::metrics;
use crate::request::{AnalysisRequest, AnalyzePayload, UserInput, DEFAULT_UPLOAD_TITLE};
use crate::response::{validate_analysis, validate_upload, AnalysisResponse};
use crate::view::ViewModel;

pub type Ticket = u64;

pub type DynBackend = Arc<dyn Backend>;

/// Result of one [`Orchestrator::submit`] call.
#[derive(Debug)]
pub struct Submission {
    pub ticket: Ticket,
    pub outcome: Result<AnalysisResponse, AnalysisFailure>,
}

impl Submission {
    pub fn into_view(self) -> Result<ViewModel, AnalysisFailure> {
        self.outcome.map(|resp| ViewModel::build(&resp))
    }
}

pub struct Orchestrator {
    backend: DynBackend,
    timeout: Duration,
    generation: watch::Sender<Ticket>,
}

impl Orchestrator {
    pub fn new(backend: DynBackend, timeout: Duration) -> Self {
        metrics::ensure_metrics_described();
        let (generation, _) = watch::channel(0);
        Self {
            backend,
            timeout,
            generation,
        }
    }

    /// Orchestrator over the real HTTP backend described by `cfg`.
    pub fn from_config(cfg: &ClientConfig) -> anyhow::Result<Self> {
        let backend = HttpBackend::new(cfg)?;
        Ok(Self::new(Arc::new(backend), cfg.timeout()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn current_ticket(&self) -> Ticket {
        *self.generation.borrow()
    }

    /// Take a fresh ticket. Any submission holding an older one is cancelled.
    pub fn issue_ticket(&self) -> Ticket {
        let mut ticket = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            ticket = *g;
        });
        ticket
    }

    /// Cancel whatever is in flight without starting anything (mode switch).
    pub fn invalidate(&self) -> Ticket {
        let t = self.issue_ticket();
        debug!(ticket = t, "in-flight submission invalidated");
        t
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current_ticket() == ticket
    }

    /// Take a ticket and run the submission under it.
    pub async fn submit(&self, input: UserInput) -> Submission {
        let ticket = self.issue_ticket();
        let outcome = self.run_ticket(ticket, input).await;
        Submission { ticket, outcome }
    }

    /// Run `input` under an already issued ticket, cancelling early if a
    /// newer ticket shows up.
    pub async fn run_ticket(
        &self,
        ticket: Ticket,
        input: UserInput,
    ) -> Result<AnalysisResponse, AnalysisFailure> {
        let mode = input.mode();
        metrics::record_request(mode);
        let started = Instant::now();

        let mut rx = self.generation.subscribe();
        let outcome = if *rx.borrow() != ticket {
            Err(AnalysisFailure::Superseded)
        } else {
            tokio::select! {
                biased;
                _ = superseded(&mut rx, ticket) => Err(AnalysisFailure::Superseded),
                out = self.run_input(input) => {
                    if self.is_current(ticket) { out } else { Err(AnalysisFailure::Superseded) }
                }
            }
        };

        let ms = started.elapsed().as_secs_f64() * 1_000.0;
        metrics::record_duration_ms(ms);
        match &outcome {
            Ok(_) => info!(ticket, mode = mode.as_str(), ms, "analysis complete"),
            Err(e) => {
                metrics::record_failure(e.kind());
                match e {
                    AnalysisFailure::Superseded => {
                        debug!(ticket, mode = mode.as_str(), "analysis superseded")
                    }
                    AnalysisFailure::Validation(v) => {
                        info!(ticket, mode = mode.as_str(), code = v.code(), "input rejected")
                    }
                    other => warn!(
                        ticket,
                        mode = mode.as_str(),
                        kind = other.kind(),
                        error = %other,
                        "analysis failed"
                    ),
                }
            }
        }
        outcome
    }

    async fn run_input(&self, input: UserInput) -> Result<AnalysisResponse, AnalysisFailure> {
        let request = AnalysisRequest::from_input(input)?;
        self.run(request).await
    }

    /// The plain flow for a validated request, without ticket handling.
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisFailure> {
        let payload = match request {
            AnalysisRequest::Url { url } => AnalyzePayload::url(url),
            AnalysisRequest::ManualText { title, text } => AnalyzePayload::manual(title, text),
            AnalysisRequest::File { file } => {
                metrics::record_upload();
                debug!(
                    backend = self.backend.name(),
                    filename = file.filename(),
                    bytes = file.len(),
                    "uploading file"
                );
                let body = self.call(self.backend.upload(&file)).await?;
                let uploaded = validate_upload(&body)?;
                let title = uploaded
                    .filename
                    .unwrap_or_else(|| DEFAULT_UPLOAD_TITLE.to_string());
                AnalyzePayload::manual(title, uploaded.text)
            }
        };

        let body = self.call(self.backend.analyze(&payload)).await?;
        validate_analysis(&body)
    }

    async fn call<F>(&self, fut: F) -> Result<Value, AnalysisFailure>
    where
        F: Future<Output = Result<Value, TransportError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Err(_) | Ok(Err(TransportError::Timeout)) => Err(AnalysisFailure::Timeout(self.timeout)),
            Ok(Err(e)) => Err(AnalysisFailure::Network(e.to_string())),
            Ok(Ok(body)) => Ok(body),
        }
    }
}

/// Resolves once the generation moves past `ticket`.
async fn superseded(rx: &mut watch::Receiver<Ticket>, ticket: Ticket) {
    loop {
        if *rx.borrow_and_update() != ticket {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender gone: nothing can supersede us any more.
            std::future::pending::<()>().await;
        }
    }
}
