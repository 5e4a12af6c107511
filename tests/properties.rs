// tests/properties.rs
//
// Property checks for the pure pieces: input validation, classifiers,
// the sentence cap and escaping.

use proptest::prelude::*;
use serde_json::{json, Value};

use truth_lens::request::{validate_manual, validate_url, MIN_TEXT_CHARS};
use truth_lens::response::AnalysisResponse;
use truth_lens::sentiment::{ReliabilityTier, Sentiment};
use truth_lens::view::SENTENCE_LIMIT;
use truth_lens::{SafeText, ValidationError, ViewModel};

proptest! {
    #[test]
    fn manual_text_accepted_iff_trimmed_len_at_least_min(
        body in "[a-zA-Zé ]{0,120}",
        pad in " {0,5}",
    ) {
        let text = format!("{pad}{body}{pad}");
        let chars = text.trim().chars().count();
        let out = validate_manual("", &text);
        if chars == 0 {
            prop_assert_eq!(out.unwrap_err(), ValidationError::EmptyText);
        } else if chars < MIN_TEXT_CHARS {
            prop_assert_eq!(out.unwrap_err(), ValidationError::TooShort);
        } else {
            let (_, t) = out.unwrap();
            prop_assert_eq!(t.chars().count(), chars);
        }
    }

    #[test]
    fn text_without_scheme_is_never_a_url(s in "[a-z0-9./]{1,40}") {
        prop_assert_eq!(validate_url(&s).unwrap_err(), ValidationError::BadUrl);
    }

    #[test]
    fn http_urls_with_host_are_accepted(host in "[a-z]{1,12}\\.(com|in|org)", path in "(/[a-z0-9]{1,8}){0,3}") {
        let url = format!("https://{host}{path}");
        prop_assert_eq!(validate_url(&format!(" {url} ")).unwrap(), url);
    }

    #[test]
    fn sentiment_thresholds(x in -1.0f64..=1.0) {
        let expected = if x > 0.2 {
            Sentiment::Positive
        } else if x < -0.2 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        prop_assert_eq!(Sentiment::classify(x), expected);
    }

    #[test]
    fn reliability_tiers(score in 0.0f64..=100.0) {
        let expected = if score >= 80.0 {
            ReliabilityTier::High
        } else if score >= 60.0 {
            ReliabilityTier::Medium
        } else {
            ReliabilityTier::Low
        };
        prop_assert_eq!(ReliabilityTier::classify(score), expected);
    }

    #[test]
    fn sentences_are_capped_and_ordered(n in 0usize..30) {
        let entries: Vec<Value> = (0..n)
            .map(|i| json!({ "sentence": format!("s{i}"), "polarity": 0.0 }))
            .collect();
        let resp = AnalysisResponse::from_value(&json!({ "tone_breakdown": entries }));
        let vm = ViewModel::build(&resp);
        prop_assert_eq!(vm.sentences.len(), n.min(SENTENCE_LIMIT));
        for (i, s) in vm.sentences.iter().enumerate() {
            prop_assert_eq!(s.text.as_str(), format!("s{i}"));
        }
    }

    #[test]
    fn escaped_text_has_no_markup_and_round_trips(raw in "\\PC{0,60}") {
        let safe = SafeText::escape(&raw);
        prop_assert!(!safe.as_str().contains('<'));
        prop_assert!(!safe.as_str().contains('>'));
        prop_assert!(!safe.as_str().contains('"'));
        prop_assert_eq!(safe.unescape(), raw);
    }
}

#[test]
fn boundary_lengths() {
    let at = "x".repeat(MIN_TEXT_CHARS);
    let below = "x".repeat(MIN_TEXT_CHARS - 1);
    assert!(validate_manual("", &at).is_ok());
    assert_eq!(validate_manual("", &below).unwrap_err(), ValidationError::TooShort);
    assert_eq!(Sentiment::classify(0.2), Sentiment::Neutral);
    assert_eq!(Sentiment::classify(-0.2), Sentiment::Neutral);
    assert_eq!(ReliabilityTier::classify(80.0), ReliabilityTier::High);
    assert_eq!(ReliabilityTier::classify(60.0), ReliabilityTier::Medium);
    assert_eq!(ReliabilityTier::classify(59.99), ReliabilityTier::Low);
}
