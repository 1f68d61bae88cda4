//! Coarse language identification.
//!
//! The detected language is informational only (it feeds locale hints).
//! [`WhatlangDetector`] uses `whatlang` trigram profiles; alternatives are
//! found by detecting again with the earlier winners excluded.

use log::debug;
use whatlang::{Detector, Lang};

/// Identifies the language of a text
pub trait LanguageDetector: Send + Sync {
    /// Up to `top_n` `(label, confidence)` pairs, most confident first
    fn detect(&self, text: &str, top_n: usize) -> Vec<(String, f64)>;

    /// The single most likely label, or an empty string when nothing matched
    fn best(&self, text: &str) -> String {
        self.detect(text, 1)
            .into_iter()
            .next()
            .map(|(label, _)| label)
            .unwrap_or_default()
    }
}

/// Trigram-based detector; labels are lowercase English language names
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

/// Lowercase English name of a language, e.g. `german`
pub fn label(lang: Lang) -> String {
    lang.eng_name().to_lowercase()
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str, top_n: usize) -> Vec<(String, f64)> {
        let mut excluded: Vec<Lang> = Vec::new();
        let mut results = Vec::new();
        while results.len() < top_n {
            let detector = if excluded.is_empty() {
                Detector::new()
            } else {
                Detector::with_denylist(excluded.clone())
            };
            let Some(info) = detector.detect(text) else {
                break;
            };
            if excluded.contains(&info.lang()) {
                break;
            }
            debug!(
                "Detected {:?} with confidence {:.2}",
                info.lang(),
                info.confidence()
            );
            results.push((label(info.lang()), info.confidence()));
            excluded.push(info.lang());
        }
        results
    }
}
