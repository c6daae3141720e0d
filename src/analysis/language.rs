//! Language resolution: explicit hint first, statistical detection second.

use super::types::{AnalysisRequest, Language};
use crate::config::AnalysisConfig;
use std::sync::OnceLock;
use whatlang::Detector;

/// Texts shorter than this (UTF-16 units) are not sent to the detector.
pub const MIN_DETECTION_LENGTH: usize = 20;

/// ISO 639-3 detector output mapped onto the supported set.
const LANGUAGE_TABLE: &[(&str, Language)] = &[
    ("swe", Language::Sv),
    ("nor", Language::No),
    ("nob", Language::No),
    ("nno", Language::No),
    ("dan", Language::Da),
    ("fin", Language::Fi),
    ("est", Language::Fi),
    ("eng", Language::En),
];

fn detector() -> &'static Detector {
    static DETECTOR: OnceLock<Detector> = OnceLock::new();
    DETECTOR.get_or_init(Detector::new)
}

/// Map an ISO 639-3 code to a supported language, if it has one.
pub fn map_detected_code(code: &str) -> Option<Language> {
    LANGUAGE_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, language)| *language)
}

/// Picks the language a request is analyzed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageResolver {
    default_language: Language,
    min_detection_length: usize,
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(Language::En, MIN_DETECTION_LENGTH)
    }
}

impl LanguageResolver {
    pub fn new(default_language: Language, min_detection_length: usize) -> Self {
        Self {
            default_language,
            min_detection_length,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.default_language, config.min_detection_length)
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Explicit language wins; otherwise detect from the text.
    pub fn resolve(&self, request: &AnalysisRequest) -> Language {
        match request.language {
            Some(language) => language,
            None => self.detect(&request.text),
        }
    }

    /// Detect the language of `text`, falling back to the default for short
    /// or unrecognised input.
    pub fn detect(&self, text: &str) -> Language {
        if super::types::utf16_len(text) < self.min_detection_length {
            return self.default_language;
        }

        let detected = detector()
            .detect(text)
            .and_then(|info| map_detected_code(info.lang().code()));

        tracing::debug!(
            detected = ?detected,
            fallback = %self.default_language,
            "Language detection"
        );

        detected.unwrap_or(self.default_language)
    }
}
