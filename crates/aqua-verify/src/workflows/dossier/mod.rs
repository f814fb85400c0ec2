//! Permit dossier analysis: piece identification, project attribute extraction, and
//! stormwater compliance rules for construction (PC) and subdivision (PA) permits.

pub mod classification;
pub mod compliance;
pub mod domain;
pub mod extraction;
pub mod manifest;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classification::{
    Classification, ClassificationTier, ClassifierThresholds, DocumentClassifier,
    DECISIVE_CONFIDENCE, DEFAULT_MIN_CONFIDENCE, DEFAULT_NORMALIZATION_PER_CHECK,
    HEADER_SCAN_CHARS,
};
pub use compliance::{ComplianceEngine, ProfileKind, ProfileRules, RulesConfig, RulesConfigError};
pub use domain::{
    AnalysisReport, CaseFamily, ComplianceIssue, Document, DocumentStatus, DocumentType,
    IssueCode, ProjectInfo, Severity, SourceDocument, UnknownCaseFamily,
};
pub use extraction::{
    ProjectInfoBuilder, ProjectInfoExtractor, MAX_ADDRESS_CHARS, SMALL_PROJECT_THRESHOLD_M2,
};
pub use manifest::{DossierManifest, ManifestEntry, ManifestImportError};
pub use router::{dossier_router, AnalyzeRequest};
pub use service::{conformity_score, DossierAnalyzer, DossierError, EXCERPT_CHARS};
