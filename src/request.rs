//! Input side of a submission: raw user input, local validation, and the
//! JSON bodies sent to `/api/analyze`.
//!
//! Validation happens here, before any network I/O. A value of
//! [`AnalysisRequest`] is always valid; the only way to get one is
//! [`AnalysisRequest::from_input`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

pub const MIN_TEXT_CHARS: usize = 50;
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const ALLOWED_CONTENT_TYPES: [&str; 2] = ["text/plain", "application/pdf"];

pub const DEFAULT_MANUAL_TITLE: &str = "Untitled Article";
pub const DEFAULT_UPLOAD_TITLE: &str = "Uploaded Document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Url,
    Manual,
    File,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Url => "url",
            InputMode::Manual => "manual",
            InputMode::File => "file",
        }
    }
}

/// A file the user picked. Type and size are checked on construction, so
/// holding one means it may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let content_type = normalize_content_type(content_type);
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::UnsupportedType);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge);
        }
        Ok(Self {
            filename: filename.into(),
            content_type,
            bytes,
        })
    }

    /// Read a file from disk, guessing its content type from the extension.
    /// Type and size are checked before the contents are read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::UnsupportedType.into());
        }

        let meta = std::fs::metadata(path)
            .with_context(|| format!("reading metadata of {}", path.display()))?;
        if meta.len() > MAX_UPLOAD_BYTES as u64 {
            return Err(ValidationError::TooLarge.into());
        }

        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();

        Ok(Self::new(filename, &content_type, bytes)?)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Strip parameters (`; charset=...`) and lowercase.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// What the user typed or picked, before validation.
#[derive(Debug, Clone)]
pub enum UserInput {
    Url(String),
    Manual { title: String, text: String },
    /// File mode carries whatever file is currently selected, if any.
    File(Option<SelectedFile>),
}

impl UserInput {
    pub fn mode(&self) -> InputMode {
        match self {
            UserInput::Url(_) => InputMode::Url,
            UserInput::Manual { .. } => InputMode::Manual,
            UserInput::File(_) => InputMode::File,
        }
    }
}

/// A validated submission. Exactly one variant, always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Url { url: String },
    ManualText { title: String, text: String },
    File { file: SelectedFile },
}

impl AnalysisRequest {
    pub fn from_input(input: UserInput) -> Result<Self, ValidationError> {
        match input {
            UserInput::Url(raw) => Ok(AnalysisRequest::Url {
                url: validate_url(&raw)?,
            }),
            UserInput::Manual { title, text } => {
                let (title, text) = validate_manual(&title, &text)?;
                Ok(AnalysisRequest::ManualText { title, text })
            }
            UserInput::File(Some(file)) => Ok(AnalysisRequest::File { file }),
            UserInput::File(None) => Err(ValidationError::NoFile),
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            AnalysisRequest::Url { .. } => InputMode::Url,
            AnalysisRequest::ManualText { .. } => InputMode::Manual,
            AnalysisRequest::File { .. } => InputMode::File,
        }
    }
}

/// Trim and check that the input is an absolute http(s) URL with a host.
/// Returns the trimmed input as typed, not the normalized form.
pub fn validate_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    let parsed = Url::parse(trimmed).map_err(|_| ValidationError::BadUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ValidationError::BadUrl);
    }
    Ok(trimmed.to_string())
}

/// Trim title and text; a blank title becomes [`DEFAULT_MANUAL_TITLE`].
/// Length is counted in chars, not bytes.
pub fn validate_manual(title: &str, text: &str) -> Result<(String, String), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(ValidationError::TooShort);
    }
    let title = match title.trim() {
        "" => DEFAULT_MANUAL_TITLE,
        t => t,
    };
    Ok((title.to_string(), text.to_string()))
}

/// JSON body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyzePayload {
    Url {
        url: String,
    },
    Manual {
        manual: bool,
        title: String,
        text: String,
    },
}

impl AnalyzePayload {
    pub fn url(url: impl Into<String>) -> Self {
        AnalyzePayload::Url { url: url.into() }
    }

    pub fn manual(title: impl Into<String>, text: impl Into<String>) -> Self {
        AnalyzePayload::Manual {
            manual: true,
            title: title.into(),
            text: text.into(),
        }
    }
}
