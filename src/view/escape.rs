//! Markup-safe text.
//!
//! Free text from the backend (titles, article bodies, sentences, party
//! names, labels) only reaches the renderer as [`SafeText`], and the only way
//! to build one from arbitrary input is [`SafeText::escape`].

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SafeText(String);

impl SafeText {
    /// Escape `& < > " '` (and `/`) for use in element content or quoted
    /// attribute values.
    pub fn escape(raw: &str) -> Self {
        Self(html_escape::encode_safe(raw).into_owned())
    }

    /// For text produced by this crate that is known to contain no markup
    /// (numbers, fixed labels). Still escaped; kept separate for intent.
    pub fn from_static(s: &'static str) -> Self {
        Self::escape(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Back to plain text, e.g. for terminal output.
    pub fn unescape(&self) -> String {
        unescape(&self.0)
    }
}

impl std::fmt::Display for SafeText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized as plain text so JSON consumers never see entities.
impl Serialize for SafeText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.unescape())
    }
}

pub fn unescape(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}
