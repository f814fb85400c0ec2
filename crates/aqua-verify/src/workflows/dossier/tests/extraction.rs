use super::common::*;
use crate::workflows::dossier::{
    Document, DocumentType, ProjectInfo, ProjectInfoBuilder, ProjectInfoExtractor,
    MAX_ADDRESS_CHARS,
};

fn extract(documents: &[Document]) -> ProjectInfo {
    ProjectInfoExtractor::new().extract(documents)
}

#[test]
fn first_document_to_match_keeps_the_field() {
    let info = extract(&[
        classified(
            "pc4_notice.pdf",
            DocumentType::Pc4,
            "Adresse du projet : 4 chemin des Goyaves, Saint-Paul",
        ),
        classified(
            "avis_dea.pdf",
            DocumentType::AvisDea,
            "Adresse : 1 rue de la Direction de l'Eau, Saint-Denis",
        ),
    ]);
    assert_eq!(info.address.as_deref(), Some("4 chemin des Goyaves, Saint-Paul"));
}

#[test]
fn official_form_uses_the_totals_procedure() {
    let text = "Surface de plancher : 12 m² (annexe)\nSurfaces totales (m²) 120 85 205";

    let form = extract(&[classified("cerfa.pdf", DocumentType::Cerfa, text)]);
    assert_eq!(form.surface_m2, Some(205.0));

    let notice = extract(&[classified("notice.pdf", DocumentType::Pc4, text)]);
    assert_eq!(notice.surface_m2, Some(12.0));
}

#[test]
fn small_project_flag_follows_the_surface_threshold() {
    let small = extract(&[classified(
        "notice.pdf",
        DocumentType::Pc4,
        "Surface de plancher : 239,9 m²",
    )]);
    assert_eq!(small.is_small_project, Some(true));

    let big = extract(&[classified(
        "notice.pdf",
        DocumentType::Pc4,
        "Surface de plancher : 240 m²",
    )]);
    assert_eq!(big.is_small_project, Some(false));

    let unknown = extract(&[classified("notice.pdf", DocumentType::Pc4, "Sans chiffre")]);
    assert_eq!(unknown.surface_m2, None);
    assert_eq!(unknown.is_small_project, None);
}

#[test]
fn long_addresses_are_truncated() {
    let text = format!("Adresse du terrain : {}", "a".repeat(MAX_ADDRESS_CHARS + 50));
    let info = extract(&[classified("pc1.pdf", DocumentType::Pc1, &text)]);
    assert_eq!(
        info.address.map(|address| address.chars().count()),
        Some(MAX_ADDRESS_CHARS)
    );
}

#[test]
fn grouped_thousands_and_comma_decimals_are_parsed() {
    let info = extract(&[classified(
        "note.pdf",
        DocumentType::NoteCalculDea,
        "Surface imperméabilisée : 1\u{202F}250,5 m²\nVolume de stockage utile : 56,3 m³",
    )]);
    assert_close(info.impermeabilized_area_m2, 1250.5);
    assert_close(info.retention_volume_m3, 56.3);
}

#[test]
fn positive_rain_evidence_overrides_an_earlier_negative() {
    let negative_first = extract(&[
        classified("avis.pdf", DocumentType::AvisEp, "Pluie de 15 mm non retenue"),
        classified("note.pdf", DocumentType::NoteCalculDea, "Abattement de la pluie de 15 mm assuré"),
    ]);
    assert_eq!(negative_first.retains_rain_15mm, Some(true));

    let positive_first = extract(&[
        classified("note.pdf", DocumentType::NoteCalculDea, "Abattement de la pluie de 15 mm assuré"),
        classified("avis.pdf", DocumentType::AvisEp, "Pluie de 15 mm non retenue"),
    ]);
    assert_eq!(positive_first.retains_rain_15mm, Some(true));

    let negative_only = extract(&[classified(
        "avis.pdf",
        DocumentType::AvisEp,
        "Pluie de 15 mm non retenue",
    )]);
    assert_eq!(negative_only.retains_rain_15mm, Some(false));
    assert_eq!(negative_only.retains_rain_45mm, None);
}

#[test]
fn test_documents_count_as_infiltration_evidence_without_text() {
    let info = extract(&[classified("porchet.pdf", DocumentType::TestPermeabilite, "")]);
    assert_eq!(info.has_infiltration_test, Some(true));
    assert_eq!(info.mentions_infiltration, None);
}

#[test]
fn mentions_are_flagged_from_any_document() {
    let info = extract(&[
        classified("pc4.pdf", DocumentType::Pc4, "Gestion des eaux par infiltration"),
        classified("pc2.pdf", DocumentType::Pc2, "Bassin de stockage enterré"),
    ]);
    assert_eq!(info.mentions_infiltration, Some(true));
    assert_eq!(info.mentions_retention, Some(true));
    assert_eq!(info.has_infiltration_test, None);
}

#[test]
fn builder_writes_each_field_once() {
    let mut builder = ProjectInfoBuilder::new();
    builder
        .surface(Some(120.0))
        .surface(Some(900.0))
        .reference(None)
        .reference(Some("PC 974 411 24 A0012".to_string()))
        .reference(Some("autre".to_string()))
        .infiltration_test(true)
        .infiltration_test(false);

    let info = builder.finish();
    assert_eq!(info.surface_m2, Some(120.0));
    assert_eq!(info.is_small_project, Some(true));
    assert_eq!(info.reference.as_deref(), Some("PC 974 411 24 A0012"));
    assert_eq!(info.has_infiltration_test, Some(true));
    assert_eq!(info.calculated_volume_m3, None);
}
