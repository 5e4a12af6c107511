//! Telemetry for submissions. Without an installed recorder these are no-ops,
//! so the library never needs to know whether anyone is scraping.

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::request::InputMode;

/// One-time metrics registration (so series carry descriptions).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "analysis_requests_total",
            "Submissions started, by input mode."
        );
        describe_counter!(
            "analysis_failures_total",
            "Submissions that ended in a failure, by kind."
        );
        describe_counter!(
            "analysis_superseded_total",
            "Submissions cancelled by a newer one or a mode switch."
        );
        describe_counter!("analysis_uploads_total", "Files sent to the upload endpoint.");
        describe_histogram!(
            "analysis_duration_ms",
            "Wall time of a submission, validation to validated response."
        );
    });
}

pub fn record_request(mode: InputMode) {
    counter!("analysis_requests_total", "mode" => mode.as_str()).increment(1);
}

pub fn record_upload() {
    counter!("analysis_uploads_total").increment(1);
}

pub fn record_failure(kind: &'static str) {
    if kind == "superseded" {
        counter!("analysis_superseded_total").increment(1);
    } else {
        counter!("analysis_failures_total", "kind" => kind).increment(1);
    }
}

pub fn record_duration_ms(ms: f64) {
    histogram!("analysis_duration_ms").record(ms);
}
