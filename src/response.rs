//! Classifying backend bodies as accepted or failed.
//!
//! Policy: a body is accepted only if `success` is present and truthy.
//! Nothing below that is schema-checked; nested fields are read leniently
//! and a field of the wrong type simply reads as absent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AnalysisFailure;

pub const ANALYSIS_FALLBACK_MESSAGE: &str = "Analysis failed";
pub const UPLOAD_FALLBACK_MESSAGE: &str = "File upload failed";
pub const UPLOAD_NO_TEXT_MESSAGE: &str = "Could not extract text from file";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BiasAnalysis {
    pub bias: Option<String>,
    pub polarity: Option<f64>,
    pub subjectivity: Option<f64>,
    pub confidence: Option<f64>,
}

/// `score` is only `Some` when the backend sent a number; strings such as
/// `"N/A"` or `"Unknown"` read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceReliability {
    pub score: Option<f64>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToneEntry {
    pub sentence: String,
    pub polarity: Option<f64>,
    pub subjectivity: Option<f64>,
    pub mentions: Vec<String>,
    pub word_count: Option<u64>,
}

/// An accepted `/api/analyze` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub title: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
    pub translated_text: Option<String>,
    pub bias_analysis: BiasAnalysis,
    pub source_reliability: SourceReliability,
    /// Party name to score, in backend order. Non-numeric scores are dropped.
    pub political_leaning: Vec<(String, f64)>,
    pub tone_breakdown: Vec<ToneEntry>,
}

impl AnalysisResponse {
    /// Never fails; missing or mistyped fields read as empty.
    pub fn from_value(body: &Value) -> Self {
        let empty = Map::new();
        let obj = body.as_object().unwrap_or(&empty);

        let bias = obj.get("bias_analysis").and_then(Value::as_object);
        let reliability = obj.get("source_reliability").and_then(Value::as_object);

        let political_leaning = obj
            .get("political_leaning")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .filter_map(|(party, score)| score.as_f64().map(|s| (party.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();

        let tone_breakdown = obj
            .get("tone_breakdown")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(tone_entry).collect())
            .unwrap_or_default();

        Self {
            title: str_field(Some(obj), "title"),
            language: str_field(Some(obj), "language"),
            text: str_field(Some(obj), "text"),
            translated_text: str_field(Some(obj), "translated_text"),
            bias_analysis: BiasAnalysis {
                bias: str_field(bias, "bias"),
                polarity: num_field(bias, "polarity"),
                subjectivity: num_field(bias, "subjectivity"),
                confidence: num_field(bias, "confidence"),
            },
            source_reliability: SourceReliability {
                score: num_field(reliability, "score"),
                label: str_field(reliability, "label"),
            },
            political_leaning,
            tone_breakdown,
        }
    }
}

fn tone_entry(v: &Value) -> ToneEntry {
    let obj = v.as_object();
    ToneEntry {
        sentence: str_field(obj, "sentence").unwrap_or_default(),
        polarity: num_field(obj, "polarity"),
        subjectivity: num_field(obj, "subjectivity"),
        mentions: obj
            .and_then(|o| o.get("mentions"))
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        word_count: obj
            .and_then(|o| o.get("word_count"))
            .and_then(Value::as_u64),
    }
}

fn str_field(obj: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    obj?.get(key)?.as_str().map(str::to_string)
}

fn num_field(obj: Option<&Map<String, Value>>, key: &str) -> Option<f64> {
    obj?.get(key)?.as_f64().filter(|x| x.is_finite())
}

/// An accepted `/api/upload` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub filename: Option<String>,
    pub text: String,
}

/// JavaScript-style truthiness, which is what the backend contract was
/// written against.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0 && !x.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn succeeded(body: &Value) -> bool {
    body.get("success").is_some_and(is_truthy)
}

/// The backend's `error` string if it sent a non-empty one.
fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn validate_analysis(body: &Value) -> Result<AnalysisResponse, AnalysisFailure> {
    if !succeeded(body) {
        let msg = error_message(body).unwrap_or_else(|| ANALYSIS_FALLBACK_MESSAGE.to_string());
        return Err(AnalysisFailure::Analysis(msg));
    }
    Ok(AnalysisResponse::from_value(body))
}

pub fn validate_upload(body: &Value) -> Result<UploadResult, AnalysisFailure> {
    if !succeeded(body) {
        let msg = error_message(body).unwrap_or_else(|| UPLOAD_FALLBACK_MESSAGE.to_string());
        return Err(AnalysisFailure::Upload(msg));
    }
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AnalysisFailure::Upload(UPLOAD_NO_TEXT_MESSAGE.to_string()))?;
    let filename = body
        .get("filename")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(UploadResult {
        filename,
        text: text.to_string(),
    })
}
