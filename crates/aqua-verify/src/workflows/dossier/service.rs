use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::classification::{ClassifierThresholds, DocumentClassifier};
use super::compliance::{ComplianceEngine, RulesConfig};
use super::domain::{
    AnalysisReport, CaseFamily, Document, DocumentStatus, DocumentType, SourceDocument,
};
use super::extraction::ProjectInfoExtractor;

/// Characters of text kept on each document for display.
pub const EXCERPT_CHARS: usize = 1000;

const UNVERIFIABLE_CONTENT_NOTE: &str =
    "Aucun texte exploitable : le contenu de la pièce n'a pas pu être vérifié.";

/// Pipeline composing classification, attribute extraction, and rule evaluation.
///
/// Holds only read-only state, so one instance can serve concurrent requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DossierAnalyzer {
    classifier: DocumentClassifier,
    extractor: ProjectInfoExtractor,
    engine: ComplianceEngine,
    default_family: CaseFamily,
}

impl DossierAnalyzer {
    pub fn new(thresholds: ClassifierThresholds, rules: Arc<RulesConfig>) -> Self {
        Self::with_components(
            DocumentClassifier::new(thresholds),
            ProjectInfoExtractor::new(),
            ComplianceEngine::new(rules),
        )
    }

    pub fn with_components(
        classifier: DocumentClassifier,
        extractor: ProjectInfoExtractor,
        engine: ComplianceEngine,
    ) -> Self {
        Self {
            classifier,
            extractor,
            engine,
            default_family: CaseFamily::default(),
        }
    }

    /// Family assumed when a request does not name one.
    pub fn with_default_family(mut self, family: CaseFamily) -> Self {
        self.default_family = family;
        self
    }

    pub fn default_family(&self) -> CaseFamily {
        self.default_family
    }

    pub fn classifier(&self) -> &DocumentClassifier {
        &self.classifier
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// Classify one source and attach its status and excerpt.
    pub fn classify_document(&self, source: &SourceDocument, family: CaseFamily) -> Document {
        let classification = self
            .classifier
            .classify(&source.filename, &source.text, family);
        debug!(
            filename = %source.filename,
            document_type = %classification.document_type,
            confidence = classification.confidence,
            tier = ?classification.tier,
            "document classified"
        );

        let readable = !source.text.trim().is_empty();
        let (status, issues) = if readable {
            (DocumentStatus::Conforming, Vec::new())
        } else {
            (
                DocumentStatus::NonConforming,
                vec![UNVERIFIABLE_CONTENT_NOTE.to_string()],
            )
        };

        Document {
            filename: source.filename.clone(),
            document_type: classification.document_type,
            status,
            confidence: classification.confidence,
            extracted_text: readable.then(|| source.text.chars().take(EXCERPT_CHARS).collect()),
            full_text: source.text.clone(),
            issues,
        }
    }

    /// Analyse a dossier. An empty dossier yields a report with every piece missing; callers
    /// that must refuse empty input use [`DossierAnalyzer::try_analyze`].
    pub fn analyze(&self, sources: &[SourceDocument], family: CaseFamily) -> AnalysisReport {
        let documents: Vec<Document> = sources
            .iter()
            .map(|source| self.classify_document(source, family))
            .collect();

        let detected: BTreeSet<DocumentType> = documents
            .iter()
            .map(|document| document.document_type)
            .filter(|document_type| *document_type != DocumentType::Autre)
            .collect();

        let required = family.required_documents();
        let missing_documents: Vec<String> = required
            .iter()
            .filter(|document_type| !detected.contains(document_type))
            .map(|document_type| document_type.code().to_string())
            .collect();

        let found_required = documents
            .iter()
            .filter(|document| required.contains(&document.document_type))
            .count();
        let conformity_score = conformity_score(found_required, required.len());

        let mut project_info = self.extractor.extract(&documents);
        let compliance_issues = self.engine.evaluate(&mut project_info, &detected, family);

        let total_documents = documents.len();
        let (conforming_documents, non_conforming_documents): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|document| document.status == DocumentStatus::Conforming);

        info!(
            case_type = %family,
            documents = total_documents,
            missing = missing_documents.len(),
            issues = compliance_issues.len(),
            score = conformity_score,
            "dossier analysed"
        );

        AnalysisReport {
            case_type: family,
            project_info,
            conforming_documents,
            non_conforming_documents,
            missing_documents,
            total_documents,
            conformity_score,
            compliance_issues,
        }
    }

    pub fn try_analyze(
        &self,
        sources: &[SourceDocument],
        family: CaseFamily,
    ) -> Result<AnalysisReport, DossierError> {
        if sources.is_empty() {
            return Err(DossierError::EmptyDossier);
        }
        Ok(self.analyze(sources, family))
    }
}

/// Share of required pieces found, as a percentage rounded to one decimal.
pub fn conformity_score(found_required: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    let raw = found_required as f64 / required as f64 * 100.0;
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Error raised at the dossier ingestion boundary.
#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    #[error("dossier contains no documents")]
    EmptyDossier,
    #[error(transparent)]
    UnknownCaseFamily(#[from] super::domain::UnknownCaseFamily),
}
