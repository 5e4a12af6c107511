// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod sentiment;
pub mod session;
pub mod view;

// ---- Re-exports for stable public API ----
pub use crate::backend::{Backend, HttpBackend, TransportError};
pub use crate::config::{ClientConfig, Theme, ThemeStore};
pub use crate::error::{AnalysisFailure, ValidationError};
pub use crate::orchestrator::{Orchestrator, Submission, Ticket};
pub use crate::request::{AnalysisRequest, AnalyzePayload, InputMode, SelectedFile, UserInput};
pub use crate::response::{AnalysisResponse, UploadResult};
pub use crate::session::{Presentation, Session};
pub use crate::view::{render, SafeText, ViewModel};

use tracing::info;

/// One-shot helper: validate, submit, and build the view model in one go.
/// Returns the final session so callers can render whatever it presents.
///
/// ```ignore
/// let cfg = truth_lens::ClientConfig::load_default()?;
/// let orch = truth_lens::Orchestrator::from_config(&cfg)?;
/// let session = truth_lens::analyze_once(&orch, truth_lens::Session::new(), input).await;
/// ```
pub async fn analyze_once(orch: &Orchestrator, session: Session, input: UserInput) -> Session {
    let session = session.with_mode(input.mode());
    let ticket = orch.issue_ticket();
    let session = session.begin(ticket);
    let outcome = orch
        .run_ticket(ticket, input)
        .await
        .map(|resp| ViewModel::build(&resp));
    info!(ticket, ok = outcome.is_ok(), "submission settled");
    session.settle(ticket, outcome)
}
