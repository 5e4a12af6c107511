//! View model: the read-only projection of an accepted analysis response.
//!
//! [`ViewModel::build`] cannot fail. Every optional or malformed field turns
//! into a placeholder block instead of aborting the whole view, and every
//! piece of backend text is escaped into [`SafeText`] on the way in.

pub mod escape;
pub mod render;

use serde::Serialize;

use crate::response::{AnalysisResponse, ToneEntry};
use crate::sentiment::{ReliabilityTier, Sentiment};

pub use escape::SafeText;

/// At most this many sentences are shown, in backend order.
pub const SENTENCE_LIMIT: usize = 10;

pub const RELIABILITY_PLACEHOLDER: &str = "Reliability score not available";
pub const POLITICAL_PLACEHOLDER: &str = "No political mentions detected";
const UNTITLED: &str = "Untitled Article";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasMetrics {
    pub label: SafeText,
    pub polarity: Option<f64>,
    pub subjectivity: Option<f64>,
    pub confidence: Option<f64>,
    pub tone: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReliabilityBlock {
    Available {
        score: u8,
        label: SafeText,
        tier: ReliabilityTier,
    },
    Unavailable {
        placeholder: SafeText,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyView {
    pub party: SafeText,
    pub score: f64,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PoliticalBlock {
    Entries { parties: Vec<PartyView> },
    NoMentions { placeholder: SafeText },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceView {
    pub text: SafeText,
    pub polarity: Option<f64>,
    pub subjectivity: Option<f64>,
    pub sentiment: Sentiment,
    /// Comma-joined entity mentions, when there are any.
    pub mentions: Option<SafeText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArticleText {
    Original {
        text: SafeText,
    },
    Translated {
        translated: SafeText,
        original: SafeText,
        show_translated: bool,
    },
}

impl ArticleText {
    /// Flip between translated and original. No-op without a translation.
    pub fn toggled(self) -> Self {
        match self {
            ArticleText::Translated {
                translated,
                original,
                show_translated,
            } => ArticleText::Translated {
                translated,
                original,
                show_translated: !show_translated,
            },
            other => other,
        }
    }

    /// The text currently on display.
    pub fn visible(&self) -> &SafeText {
        match self {
            ArticleText::Original { text } => text,
            ArticleText::Translated {
                translated,
                show_translated: true,
                ..
            } => translated,
            ArticleText::Translated { original, .. } => original,
        }
    }
}

/// The three numeric series a chart layer needs. Labels are plain text;
/// the renderer escapes them when embedding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// `[polarity, subjectivity]`
    pub bias: [f64; 2],
    pub political: Vec<(String, f64)>,
    /// 0 when no score is available.
    pub reliability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: SafeText,
    pub language: SafeText,
    pub metrics: BiasMetrics,
    pub reliability: ReliabilityBlock,
    pub political: PoliticalBlock,
    pub sentences: Vec<SentenceView>,
    pub article: ArticleText,
    pub charts: ChartSeries,
}

impl ViewModel {
    pub fn build(resp: &AnalysisResponse) -> Self {
        let title = resp
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);

        let language = resp
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("unknown");

        Self {
            title: SafeText::escape(title),
            language: SafeText::escape(&language.to_uppercase()),
            metrics: bias_metrics(resp),
            reliability: reliability_block(resp),
            political: political_block(resp),
            sentences: resp
                .tone_breakdown
                .iter()
                .take(SENTENCE_LIMIT)
                .map(sentence_view)
                .collect(),
            article: article_text(resp),
            charts: ChartSeries {
                bias: [
                    resp.bias_analysis.polarity.unwrap_or(0.0),
                    resp.bias_analysis.subjectivity.unwrap_or(0.0),
                ],
                political: resp.political_leaning.clone(),
                reliability: resp
                    .source_reliability
                    .score
                    .map(clamp_score)
                    .map(f64::from)
                    .unwrap_or(0.0),
            },
        }
    }
}

fn bias_metrics(resp: &AnalysisResponse) -> BiasMetrics {
    let b = &resp.bias_analysis;
    BiasMetrics {
        label: SafeText::escape(b.bias.as_deref().unwrap_or("Unknown")),
        polarity: b.polarity,
        subjectivity: b.subjectivity,
        confidence: b.confidence,
        tone: Sentiment::classify(b.polarity.unwrap_or(0.0)),
    }
}

fn reliability_block(resp: &AnalysisResponse) -> ReliabilityBlock {
    let r = &resp.source_reliability;
    let label = r.label.as_deref().map(str::trim).filter(|l| !l.is_empty());
    match r.score {
        Some(score) => ReliabilityBlock::Available {
            score: clamp_score(score),
            label: SafeText::escape(label.unwrap_or_default()),
            tier: ReliabilityTier::classify(score),
        },
        None => {
            let text = match label {
                Some(l) => format!("{RELIABILITY_PLACEHOLDER} ({l})"),
                None => RELIABILITY_PLACEHOLDER.to_string(),
            };
            ReliabilityBlock::Unavailable {
                placeholder: SafeText::escape(&text),
            }
        }
    }
}

fn political_block(resp: &AnalysisResponse) -> PoliticalBlock {
    if resp.political_leaning.is_empty() {
        return PoliticalBlock::NoMentions {
            placeholder: SafeText::from_static(POLITICAL_PLACEHOLDER),
        };
    }
    PoliticalBlock::Entries {
        parties: resp
            .political_leaning
            .iter()
            .map(|(party, score)| PartyView {
                party: SafeText::escape(party),
                score: *score,
                sentiment: Sentiment::classify(*score),
            })
            .collect(),
    }
}

fn sentence_view(entry: &ToneEntry) -> SentenceView {
    let mentions = entry
        .mentions
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>();
    SentenceView {
        text: SafeText::escape(&entry.sentence),
        polarity: entry.polarity,
        subjectivity: entry.subjectivity,
        sentiment: Sentiment::classify(entry.polarity.unwrap_or(0.0)),
        mentions: (!mentions.is_empty()).then(|| SafeText::escape(&mentions.join(", "))),
    }
}

fn article_text(resp: &AnalysisResponse) -> ArticleText {
    let original = SafeText::escape(resp.text.as_deref().unwrap_or_default());
    let translation = resp
        .translated_text
        .as_deref()
        .filter(|t| !t.trim().is_empty());
    let english = resp.language.as_deref().is_some_and(is_english);

    match translation {
        Some(t) if !english => ArticleText::Translated {
            translated: SafeText::escape(t),
            original,
            show_translated: true,
        },
        _ => ArticleText::Original { text: original },
    }
}

/// `en`, `EN`, `en-US`, `en_GB` all count as English.
pub fn is_english(lang: &str) -> bool {
    lang.trim()
        .split(['-', '_'])
        .next()
        .is_some_and(|primary| primary.eq_ignore_ascii_case("en"))
}

fn clamp_score(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
