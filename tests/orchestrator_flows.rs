// tests/orchestrator_flows.rs
//
// Orchestration scenarios against an in-memory backend.
// The backend counts calls, so "no network call" is checked directly.
//
// Covered:
// - local validation (URL, manual text, file) short-circuits before I/O
// - file mode: upload then analyze, upload failures, title fallback
// - analyze failures surface the backend message
// - timeout and cancel-and-replace

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use truth_lens::{
    analyze_once, AnalysisFailure, AnalyzePayload, Backend, Orchestrator, Presentation,
    SelectedFile, Session, TransportError, UserInput, ValidationError,
};

#[derive(Default)]
struct FakeBackend {
    upload_body: Option<Value>,
    analyze_body: Option<Value>,
    analyze_delay: Option<Duration>,
    uploads: AtomicUsize,
    analyzes: AtomicUsize,
    payloads: Mutex<Vec<Value>>,
}

impl FakeBackend {
    fn analyzing(body: Value) -> Self {
        Self {
            analyze_body: Some(body),
            ..Default::default()
        }
    }

    fn calls(&self) -> (usize, usize) {
        (
            self.uploads.load(Ordering::SeqCst),
            self.analyzes.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn upload(&self, _file: &SelectedFile) -> Result<Value, TransportError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.upload_body
            .clone()
            .ok_or_else(|| TransportError::Transport("connection refused".into()))
    }

    async fn analyze(&self, payload: &AnalyzePayload) -> Result<Value, TransportError> {
        self.analyzes.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::to_value(payload).unwrap());
        if let Some(d) = self.analyze_delay {
            tokio::time::sleep(d).await;
        }
        self.analyze_body
            .clone()
            .ok_or_else(|| TransportError::Transport("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn ok_body() -> Value {
    json!({
        "success": true,
        "title": "Budget session opens",
        "language": "en",
        "text": "Parliament met today.",
        "translated_text": null,
        "bias_analysis": { "bias": "Neutral", "polarity": 0.05, "subjectivity": 0.2, "confidence": 0.25 },
        "source_reliability": { "score": 92, "label": "Highly Reliable" },
        "political_leaning": { "BJP": 0.3 },
        "tone_breakdown": []
    })
}

fn orch(backend: Arc<FakeBackend>) -> Orchestrator {
    Orchestrator::new(backend, Duration::from_secs(5))
}

fn text_of_len(n: usize) -> String {
    "a".repeat(n)
}

#[tokio::test]
async fn text_of_49_chars_is_too_short_and_sends_nothing() {
    let backend = Arc::new(FakeBackend::analyzing(ok_body()));
    let o = orch(backend.clone());

    let s = o
        .submit(UserInput::Manual {
            title: "t".into(),
            text: text_of_len(49),
        })
        .await;

    assert_eq!(
        s.outcome.unwrap_err(),
        AnalysisFailure::Validation(ValidationError::TooShort)
    );
    assert_eq!(backend.calls(), (0, 0));
}

#[tokio::test]
async fn manual_text_sends_manual_payload_with_default_title() {
    let backend = Arc::new(FakeBackend::analyzing(ok_body()));
    let o = orch(backend.clone());
    let text = format!("  {}  ", text_of_len(50));

    let s = o
        .submit(UserInput::Manual {
            title: "   ".into(),
            text,
        })
        .await;
    assert!(s.outcome.is_ok());

    let payloads = backend.payloads.lock().unwrap().clone();
    assert_eq!(
        payloads,
        vec![json!({ "manual": true, "title": "Untitled Article", "text": text_of_len(50) })]
    );
}

#[tokio::test]
async fn url_mode_validates_then_sends_url_payload() {
    let backend = Arc::new(FakeBackend::analyzing(ok_body()));
    let o = orch(backend.clone());

    let bad = o.submit(UserInput::Url("not a url".into())).await;
    assert_eq!(
        bad.outcome.unwrap_err(),
        AnalysisFailure::Validation(ValidationError::BadUrl)
    );
    let empty = o.submit(UserInput::Url("   ".into())).await;
    assert_eq!(
        empty.outcome.unwrap_err(),
        AnalysisFailure::Validation(ValidationError::Empty)
    );
    assert_eq!(backend.calls(), (0, 0));

    let good = o
        .submit(UserInput::Url(" https://www.thehindu.com/news/a ".into()))
        .await;
    let resp = good.outcome.expect("accepted");
    assert_eq!(resp.title.as_deref(), Some("Budget session opens"));
    assert_eq!(
        backend.payloads.lock().unwrap()[0],
        json!({ "url": "https://www.thehindu.com/news/a" })
    );
}

#[tokio::test]
async fn rate_limited_response_surfaces_message_and_no_view() {
    let backend = Arc::new(FakeBackend::analyzing(
        json!({ "success": false, "error": "rate limited" }),
    ));
    let o = orch(backend);

    let session = analyze_once(&o, Session::new(), UserInput::Url("https://a.com/x".into())).await;
    assert_eq!(
        session.presentation(),
        &Presentation::Failed {
            message: "rate limited".into()
        }
    );
}

#[tokio::test]
async fn png_is_rejected_before_any_upload() {
    let backend = Arc::new(FakeBackend::analyzing(ok_body()));
    let o = orch(backend.clone());

    let err = SelectedFile::new("chart.png", "image/png", vec![0x89, b'P', b'N', b'G']).unwrap_err();
    assert_eq!(err, ValidationError::UnsupportedType);
    assert!(err.to_string().contains("only .txt or .pdf"));

    // Nothing got selected, so file mode has nothing to send.
    let session = Session::new();
    let s = o.submit(session.file_input()).await;
    assert_eq!(
        s.outcome.unwrap_err(),
        AnalysisFailure::Validation(ValidationError::NoFile)
    );
    assert_eq!(backend.calls(), (0, 0));
}

#[tokio::test]
async fn file_mode_uploads_then_analyzes_with_uploaded_text() {
    let backend = Arc::new(FakeBackend {
        upload_body: Some(json!({ "success": true, "filename": "speech.txt", "text": "Uploaded words." })),
        analyze_body: Some(ok_body()),
        ..Default::default()
    });
    let o = orch(backend.clone());
    let file = SelectedFile::new("speech.txt", "text/plain", b"Uploaded words.".to_vec()).unwrap();
    let session = Session::new().with_file(file);

    let s = o.submit(session.file_input()).await;
    assert!(s.outcome.is_ok());
    assert_eq!(backend.calls(), (1, 1));
    assert_eq!(
        backend.payloads.lock().unwrap()[0],
        json!({ "manual": true, "title": "speech.txt", "text": "Uploaded words." })
    );
}

#[tokio::test]
async fn upload_failure_stops_before_analyze() {
    let backend = Arc::new(FakeBackend {
        upload_body: Some(json!({ "error": "Invalid file type. Only .txt and .pdf files are allowed" })),
        analyze_body: Some(ok_body()),
        ..Default::default()
    });
    let o = orch(backend.clone());
    let file = SelectedFile::new("a.pdf", "application/pdf", b"%PDF".to_vec()).unwrap();

    let s = o.submit(UserInput::File(Some(file))).await;
    assert_eq!(
        s.outcome.unwrap_err(),
        AnalysisFailure::Upload("Invalid file type. Only .txt and .pdf files are allowed".into())
    );
    assert_eq!(backend.calls(), (1, 0));
}

#[tokio::test]
async fn analyze_failure_after_upload_is_analysis_error() {
    let backend = Arc::new(FakeBackend {
        upload_body: Some(json!({ "success": true, "filename": "a.txt", "text": "words" })),
        analyze_body: Some(json!({ "error": "Bias analysis failed: boom" })),
        ..Default::default()
    });
    let o = orch(backend.clone());
    let file = SelectedFile::new("a.txt", "text/plain", b"words".to_vec()).unwrap();

    let s = o.submit(UserInput::File(Some(file))).await;
    assert_eq!(
        s.outcome.unwrap_err(),
        AnalysisFailure::Analysis("Bias analysis failed: boom".into())
    );
    assert_eq!(backend.calls(), (1, 1));
}

#[tokio::test]
async fn transport_failure_is_network_error() {
    let backend = Arc::new(FakeBackend::default());
    let o = orch(backend);
    let s = o.submit(UserInput::Url("https://a.com".into())).await;
    match s.outcome {
        Err(AnalysisFailure::Network(msg)) => assert!(msg.contains("connection refused")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn slow_backend_times_out() {
    let backend = Arc::new(FakeBackend {
        analyze_body: Some(ok_body()),
        analyze_delay: Some(Duration::from_secs(10)),
        ..Default::default()
    });
    let o = Orchestrator::new(backend, Duration::from_millis(50));

    let s = o.submit(UserInput::Url("https://a.com".into())).await;
    assert_eq!(
        s.outcome.unwrap_err(),
        AnalysisFailure::Timeout(Duration::from_millis(50))
    );
}

#[tokio::test]
async fn newer_submission_cancels_the_pending_one() {
    let backend = Arc::new(FakeBackend {
        analyze_body: Some(ok_body()),
        analyze_delay: Some(Duration::from_millis(300)),
        ..Default::default()
    });
    let o = Arc::new(Orchestrator::new(backend, Duration::from_secs(5)));

    let first = {
        let o = o.clone();
        tokio::spawn(async move { o.submit(UserInput::Url("https://a.com/1".into())).await })
    };
    // Let the first one get in flight.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = o.submit(UserInput::Url("https://a.com/2".into())).await;

    let first = first.await.unwrap();
    assert_eq!(first.outcome.unwrap_err(), AnalysisFailure::Superseded);
    assert!(second.outcome.is_ok());
    assert!(o.is_current(second.ticket));
}

#[tokio::test]
async fn mode_switch_invalidates_pending_submission() {
    let backend = Arc::new(FakeBackend {
        analyze_body: Some(ok_body()),
        analyze_delay: Some(Duration::from_millis(300)),
        ..Default::default()
    });
    let o = Arc::new(Orchestrator::new(backend, Duration::from_secs(5)));

    let pending = {
        let o = o.clone();
        tokio::spawn(async move { o.submit(UserInput::Url("https://a.com".into())).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    o.invalidate();

    let s = pending.await.unwrap();
    assert!(s.outcome.unwrap_err().is_superseded());
}

#[tokio::test]
async fn successful_flow_ends_showing_view_model() {
    let backend = Arc::new(FakeBackend::analyzing(ok_body()));
    let o = orch(backend);

    let session = analyze_once(&o, Session::new(), UserInput::Url("https://a.com".into())).await;
    match session.presentation() {
        Presentation::Showing(vm) => assert_eq!(vm.title.as_str(), "Budget session opens"),
        other => panic!("unexpected {other:?}"),
    }
}
