use std::collections::BTreeSet;

use super::super::domain::{
    CaseFamily, ComplianceIssue, DocumentType, IssueCode, ProjectInfo, Severity,
};
use super::config::{ProfileKind, ProfileRules};
use super::volume::{calculated_volume, minimum_volume};

fn issue(
    code: IssueCode,
    title: impl Into<String>,
    severity: Severity,
    message: impl Into<String>,
) -> ComplianceIssue {
    ComplianceIssue {
        code,
        title: title.into(),
        severity,
        message: message.into(),
        evidence: None,
        related_documents: Vec::new(),
    }
}

fn missing_piece(
    code: IssueCode,
    title: &str,
    severity: Severity,
    document_type: DocumentType,
    message: String,
) -> ComplianceIssue {
    ComplianceIssue {
        related_documents: vec![document_type.code().to_string()],
        ..issue(code, title, severity, message)
    }
}

pub(crate) fn evaluate_rules(
    project: &mut ProjectInfo,
    detected: &BTreeSet<DocumentType>,
    family: CaseFamily,
    kind: ProfileKind,
    profile: &ProfileRules,
) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();

    if project.surface_m2.is_none() {
        issues.push(issue(
            IssueCode::fixed("MISSING_SURFACE"),
            "Surface non renseignée",
            Severity::Warning,
            "La surface de plancher du projet n'a pas pu être déterminée.",
        ));
    }

    for critical in family.critical_documents() {
        if !detected.contains(&critical) {
            issues.push(missing_piece(
                IssueCode::critical_missing(critical),
                "Pièce critique manquante",
                Severity::Error,
                critical,
                format!(
                    "La pièce {} ({}) est indispensable à l'instruction du dossier.",
                    critical.code(),
                    critical.label()
                ),
            ));
        }
    }

    for code in &profile.required_documents {
        let code = code.trim();
        // Codes outside the taxonomy can never be detected.
        let present = DocumentType::from_code(code).is_some_and(|kind| detected.contains(&kind));
        if !present {
            issues.push(ComplianceIssue {
                related_documents: vec![code.to_string()],
                ..issue(
                    IssueCode::missing_document(code),
                    "Document requis manquant",
                    Severity::Warning,
                    format!("Le document {code} est requis pour ce type de projet."),
                )
            });
        }
    }

    for field in &profile.required_fields {
        let field = field.trim();
        if !project.field_is_set(field) {
            issues.push(issue(
                IssueCode::missing_field(field),
                "Information requise manquante",
                Severity::Warning,
                format!("L'information « {field} » n'a pas été trouvée dans le dossier."),
            ));
        }
    }

    let test_present = detected.iter().any(|kind| kind.is_infiltration_test())
        || project.has_infiltration_test == Some(true);
    project.calculated_volume_m3 = calculated_volume(project, test_present);

    match kind {
        ProfileKind::Small => small_project_rules(project, detected, family, &mut issues),
        ProfileKind::Big => big_project_rules(project, detected, family, &mut issues),
        ProfileKind::Base => {}
    }

    issues
}

fn small_project_rules(
    project: &ProjectInfo,
    detected: &BTreeSet<DocumentType>,
    family: CaseFamily,
    issues: &mut Vec<ComplianceIssue>,
) {
    if !detected.contains(&DocumentType::Cerfa) {
        issues.push(missing_piece(
            IssueCode::fixed("SMALL_MISSING_CERFA"),
            "Formulaire CERFA manquant",
            Severity::Error,
            DocumentType::Cerfa,
            "Le formulaire CERFA est obligatoire pour un projet de moins de 240 m².".to_string(),
        ));
    }

    let layout = family.site_layout();
    if !detected.contains(&layout) {
        issues.push(missing_piece(
            IssueCode(format!("SMALL_MISSING_{}", layout.code())),
            "Plan de masse manquant",
            Severity::Error,
            layout,
            format!(
                "Le {} ({}) doit localiser les ouvrages de gestion des eaux pluviales.",
                layout.label().to_lowercase(),
                layout.code()
            ),
        ));
    }

    if project.impermeabilized_area_m2.is_none() {
        issues.push(issue(
            IssueCode::fixed("MISSING_IMPERMEABILIZED_AREA"),
            "Surface imperméabilisée non renseignée",
            Severity::Warning,
            "La surface imperméabilisée est nécessaire au dimensionnement du stockage.",
        ));
    }

    check_retention_volume(project, issues);
}

fn big_project_rules(
    project: &ProjectInfo,
    detected: &BTreeSet<DocumentType>,
    family: CaseFamily,
    issues: &mut Vec<ComplianceIssue>,
) {
    let expected = [
        DocumentType::NoteCalculDea,
        family.site_layout(),
        DocumentType::TestPermeabilite,
    ];
    for piece in expected {
        if !detected.contains(&piece) {
            issues.push(missing_piece(
                IssueCode(format!("BIG_MISSING_{}", piece.code())),
                "Pièce technique manquante",
                Severity::Error,
                piece,
                format!(
                    "La pièce {} ({}) est exigée pour un projet de 240 m² ou plus.",
                    piece.code(),
                    piece.label()
                ),
            ));
        }
    }

    if project.retains_rain_15mm == Some(false) {
        issues.push(issue(
            IssueCode::fixed("RAIN_15MM_NOT_RETAINED"),
            "Pluie courante non gérée",
            Severity::Error,
            "Le dossier indique que la pluie de 15 mm n'est pas gérée à la parcelle.",
        ));
    }

    if project.retains_rain_45mm == Some(false) {
        issues.push(issue(
            IssueCode::fixed("RAIN_45MM_NOT_RETAINED"),
            "Pluie de référence non gérée",
            Severity::Error,
            "Le dossier indique que la pluie de 45 mm n'est pas gérée à la parcelle.",
        ));
    }

    check_retention_volume(project, issues);
}

fn check_retention_volume(project: &ProjectInfo, issues: &mut Vec<ComplianceIssue>) {
    let (Some(volume), Some(area)) = (
        project.calculated_volume_m3,
        project.impermeabilized_area_m2,
    ) else {
        return;
    };

    let minimum = minimum_volume(area);
    if volume < minimum {
        issues.push(ComplianceIssue {
            evidence: Some(format!(
                "volume calculé {volume:.2} m³ / minimum {minimum:.2} m³"
            )),
            ..issue(
                IssueCode::fixed("INSUFFICIENT_RETENTION_VOLUME"),
                "Volume de rétention insuffisant",
                Severity::Error,
                format!(
                    "Le volume calculé ({volume:.2} m³) est inférieur au minimum de {minimum:.2} m³ \
                     (15 mm sur la surface imperméabilisée)."
                ),
            )
        });
    }
}
