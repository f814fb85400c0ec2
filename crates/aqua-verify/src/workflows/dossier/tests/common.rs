use std::sync::Arc;

use crate::workflows::dossier::{
    ClassifierThresholds, ComplianceIssue, Document, DocumentStatus, DocumentType,
    DossierAnalyzer, RulesConfig, SourceDocument,
};

pub(super) const RULES_YAML: &str = r#"
profiles:
  base:
    required_fields: [surface_m2]
  small:
    required_fields: [surface_m2, impermeabilized_area_m2]
    required_documents: [PC2]
  big:
    required_fields: [impermeabilized_area_m2, discharge_flow_l_s]
    required_documents: [NOTE_CALCUL_DEA, TEST_PERMEABILITE]
"#;

pub(super) fn rules() -> Arc<RulesConfig> {
    Arc::new(RulesConfig::from_yaml(RULES_YAML).expect("fixture rules parse"))
}

pub(super) fn analyzer() -> DossierAnalyzer {
    DossierAnalyzer::new(ClassifierThresholds::default(), rules())
}

pub(super) fn source(filename: &str, text: &str) -> SourceDocument {
    SourceDocument::new(filename, text)
}

/// A document as the classifier would hand it to the extractor.
pub(super) fn classified(filename: &str, document_type: DocumentType, text: &str) -> Document {
    Document {
        filename: filename.to_string(),
        document_type,
        status: DocumentStatus::Conforming,
        confidence: 0.99,
        extracted_text: Some(text.to_string()),
        full_text: text.to_string(),
        issues: Vec::new(),
    }
}

pub(super) fn codes(issues: &[ComplianceIssue]) -> Vec<&str> {
    issues.iter().map(|issue| issue.code.as_str()).collect()
}

pub(super) fn cerfa_form() -> SourceDocument {
    source(
        "cerfa_13406.pdf",
        "Demande de permis de construire\n\
         CERFA 13406*07\n\
         Adresse du terrain : 12 rue des Lilas, 97400 Saint-Denis\n\
         Surfaces totales (m²) 120 85 205",
    )
}

/// Every PC piece with its title block, plus a 205 m² form: a complete small project.
pub(super) fn complete_small_dossier() -> Vec<SourceDocument> {
    vec![
        source(
            "pc1_situation.pdf",
            "PC1 PLAN DE SITUATION\nExtrait cadastral, section AB 123",
        ),
        source(
            "pc2_masse.pdf",
            "PC2 PLAN DE MASSE\nImplantation des constructions et des réseaux",
        ),
        source("pc3_coupe.pdf", "PC3 PLAN EN COUPE\nProfil du terrain naturel"),
        source("pc4_notice.pdf", "PC4 NOTICE DESCRIPTIVE\nPrésentation du projet"),
        source("pc5_facades.pdf", "PC5 FAÇADES ET TOITURES"),
        source("pc6_insertion.pdf", "PC6 DOCUMENT GRAPHIQUE D'INSERTION"),
        source("pc7_photo.pdf", "PC7 PHOTOGRAPHIE ENVIRONNEMENT PROCHE"),
        source("pc8_photo.pdf", "PC8 PHOTOGRAPHIE PAYSAGE LOINTAIN"),
        cerfa_form(),
    ]
}

/// A 350 m² project with its stormwater file but only three of the numbered pieces.
pub(super) fn big_project_dossier() -> Vec<SourceDocument> {
    vec![
        source(
            "pc2_masse.pdf",
            "PC2 PLAN DE MASSE\nImplantation des constructions et des réseaux",
        ),
        source("pc3_coupe.pdf", "PC3 PLAN EN COUPE\nProfil du terrain naturel"),
        source(
            "pc4_notice.pdf",
            "PC4 NOTICE DESCRIPTIVE\n\
             Surface de plancher : 350 m²\n\
             Surface imperméabilisée : 300 m²",
        ),
        source(
            "note_calcul_ep.pdf",
            "NOTE DE CALCUL - GESTION DES EAUX PLUVIALES\n\
             Volume de rétention : 9,5 m3\n\
             Débit de fuite : 2 l/s\n\
             Abattement de la pluie de 15 mm : oui\n\
             Pluie de 45 mm : non gérée à la parcelle",
        ),
        source(
            "essai_permeabilite.pdf",
            "ESSAI DE PERMÉABILITÉ (méthode Porchet)\n\
             Surface d'infiltration : 20 m²\n\
             Perméabilité mesurée : 10 mm/h",
        ),
    ]
}

pub(super) fn assert_close(actual: Option<f64>, expected: f64) {
    let value = actual.expect("value present");
    assert!(
        (value - expected).abs() < 1e-6,
        "expected {expected}, got {value}"
    );
}
