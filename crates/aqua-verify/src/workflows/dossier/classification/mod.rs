//! Document-type identification.
//!
//! A three-tier cascade: the sheet's own title-block marker, then a table of distinctive
//! phrases, then weighted keyword scoring over filename and content. The first tier that
//! produces a candidate accepted by the case family wins.

mod markers;
mod rules;

pub use markers::HEADER_SCAN_CHARS;

use super::domain::{CaseFamily, DocumentType};
use rules::{keyword_rule, FORM_FILENAME_MARKERS, STRONG_PHRASES};
use serde::{Deserialize, Serialize};

/// Below this score the keyword tier reports the document as unidentified.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.2;
/// Per-check divisor used to normalise keyword scores.
pub const DEFAULT_NORMALIZATION_PER_CHECK: f64 = 0.3;
/// Confidence reported by the header and strong-phrase tiers.
pub const DECISIVE_CONFIDENCE: f64 = 0.99;

const FILENAME_KEYWORD_WEIGHT: f64 = 0.4;
const CONTENT_KEYWORD_WEIGHT: f64 = 0.6;
const FILENAME_CODE_BONUS: f64 = 0.4;

/// Empirically tuned keyword-tier constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    pub min_confidence: f64,
    pub normalization_per_check: f64,
}

impl ClassifierThresholds {
    pub fn new(min_confidence: f64, normalization_per_check: f64) -> Self {
        let min_confidence = if min_confidence.is_finite() {
            min_confidence.clamp(0.0, 1.0)
        } else {
            DEFAULT_MIN_CONFIDENCE
        };
        let normalization_per_check =
            if normalization_per_check.is_finite() && normalization_per_check > 0.0 {
                normalization_per_check
            } else {
                DEFAULT_NORMALIZATION_PER_CHECK
            };

        Self {
            min_confidence,
            normalization_per_check,
        }
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE, DEFAULT_NORMALIZATION_PER_CHECK)
    }
}

/// Cascade tier that settled a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTier {
    HeaderMarker,
    StrongPhrase,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: DocumentType,
    pub confidence: f64,
    pub tier: ClassificationTier,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentClassifier {
    thresholds: ClassifierThresholds,
}

impl DocumentClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    pub fn classify(&self, filename: &str, text: &str, family: CaseFamily) -> Classification {
        // Filename alone never identifies a piece whose content is unreadable.
        if text.trim().is_empty() {
            return Classification {
                document_type: DocumentType::Autre,
                confidence: 0.0,
                tier: ClassificationTier::Keywords,
            };
        }

        if let Some(document_type) = markers::header_marker(text, family) {
            return Classification {
                document_type,
                confidence: DECISIVE_CONFIDENCE,
                tier: ClassificationTier::HeaderMarker,
            };
        }

        let filename_lower = filename.to_lowercase();
        let content_lower = text.to_lowercase();

        if !is_form_filename(&filename_lower) {
            if let Some(document_type) = strong_phrase(&content_lower, family) {
                return Classification {
                    document_type,
                    confidence: DECISIVE_CONFIDENCE,
                    tier: ClassificationTier::StrongPhrase,
                };
            }
        }

        self.score_keywords(&filename_lower, &content_lower, family)
    }

    fn score_keywords(
        &self,
        filename_lower: &str,
        content_lower: &str,
        family: CaseFamily,
    ) -> Classification {
        let mut best_match = DocumentType::Autre;
        let mut best_score = 0.0_f64;

        for document_type in DocumentType::ordered() {
            if !document_type.is_candidate_for(family) {
                continue;
            }
            let Some(rule) = keyword_rule(document_type) else {
                continue;
            };

            let mut score = 0.0;
            for keyword in rule.filename {
                if filename_lower.contains(keyword) {
                    score += FILENAME_KEYWORD_WEIGHT;
                }
            }
            for keyword in rule.content {
                if content_lower.contains(keyword) {
                    score += CONTENT_KEYWORD_WEIGHT;
                }
            }

            let checks = rule.checks() as f64;
            let mut normalized = (score / (checks * self.thresholds.normalization_per_check)).min(1.0);
            if filename_lower.contains(&document_type.code().to_lowercase()) {
                normalized = (normalized + FILENAME_CODE_BONUS).min(1.0);
            }

            if normalized > best_score {
                best_score = normalized;
                best_match = document_type;
            }
        }

        let confidence = best_score.clamp(0.0, 1.0);
        if confidence < self.thresholds.min_confidence {
            return Classification {
                document_type: DocumentType::Autre,
                confidence,
                tier: ClassificationTier::Keywords,
            };
        }

        Classification {
            document_type: best_match,
            confidence,
            tier: ClassificationTier::Keywords,
        }
    }
}

fn is_form_filename(filename_lower: &str) -> bool {
    FORM_FILENAME_MARKERS
        .iter()
        .any(|marker| filename_lower.contains(marker))
}

fn strong_phrase(content_lower: &str, family: CaseFamily) -> Option<DocumentType> {
    STRONG_PHRASES
        .iter()
        .filter(|(_, document_type)| document_type.is_candidate_for(family))
        .find(|(phrase, _)| content_lower.contains(phrase))
        .map(|(_, document_type)| *document_type)
}
