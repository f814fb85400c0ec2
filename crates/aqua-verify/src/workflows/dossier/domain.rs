use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permit family a dossier is filed under. Determines candidate and required piece codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseFamily {
    /// Permis de construire.
    #[default]
    #[serde(rename = "PC")]
    Construction,
    /// Permis d'aménager.
    #[serde(rename = "PA")]
    Subdivision,
}

impl CaseFamily {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Construction => "PC",
            Self::Subdivision => "PA",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Construction => "Permis de construire",
            Self::Subdivision => "Permis d'aménager",
        }
    }

    /// Piece codes that make a dossier complete, in display order.
    pub const fn required_documents(self) -> &'static [DocumentType] {
        use DocumentType::*;
        match self {
            Self::Construction => &[Pc1, Pc2, Pc3, Pc4, Pc5, Pc6, Pc7, Pc8, Cerfa],
            Self::Subdivision => &[Pa1, Pa2, Pa3, Pa4, Pa5, Pa6, Pa7, Pa8, Cerfa],
        }
    }

    /// Cross-section and descriptive notice: a dossier cannot be instructed without them.
    pub const fn critical_documents(self) -> [DocumentType; 2] {
        match self {
            Self::Construction => [DocumentType::Pc3, DocumentType::Pc4],
            Self::Subdivision => [DocumentType::Pa5, DocumentType::Pa2],
        }
    }

    pub const fn site_layout(self) -> DocumentType {
        match self {
            Self::Construction => DocumentType::Pc2,
            Self::Subdivision => DocumentType::Pa4,
        }
    }
}

impl fmt::Display for CaseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCaseFamily(pub String);

impl fmt::Display for UnknownCaseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown case type '{}' (expected PC or PA)", self.0)
    }
}

impl std::error::Error for UnknownCaseFamily {}

impl FromStr for CaseFamily {
    type Err = UnknownCaseFamily;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PC" => Ok(Self::Construction),
            "PA" => Ok(Self::Subdivision),
            _ => Err(UnknownCaseFamily(value.to_string())),
        }
    }
}

/// Closed set of piece codes recognised in a dossier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "PC1")]
    Pc1,
    #[serde(rename = "PC2")]
    Pc2,
    #[serde(rename = "PC3")]
    Pc3,
    #[serde(rename = "PC4")]
    Pc4,
    #[serde(rename = "PC5")]
    Pc5,
    #[serde(rename = "PC6")]
    Pc6,
    #[serde(rename = "PC7")]
    Pc7,
    #[serde(rename = "PC8")]
    Pc8,
    #[serde(rename = "PA1")]
    Pa1,
    #[serde(rename = "PA2")]
    Pa2,
    #[serde(rename = "PA3")]
    Pa3,
    #[serde(rename = "PA4")]
    Pa4,
    #[serde(rename = "PA5")]
    Pa5,
    #[serde(rename = "PA6")]
    Pa6,
    #[serde(rename = "PA7")]
    Pa7,
    #[serde(rename = "PA8")]
    Pa8,
    #[serde(rename = "PA9")]
    Pa9,
    #[serde(rename = "CERFA")]
    Cerfa,
    #[serde(rename = "AVIS_EP")]
    AvisEp,
    #[serde(rename = "AVIS_DEA")]
    AvisDea,
    #[serde(rename = "PLAN_RUISSELLEMENT")]
    PlanRuissellement,
    #[serde(rename = "NOTE_CALCUL_DEA")]
    NoteCalculDea,
    #[serde(rename = "TEST_INFILTRATION")]
    TestInfiltration,
    #[serde(rename = "TEST_PERMEABILITE")]
    TestPermeabilite,
    #[serde(rename = "COUPE_BASSIN")]
    CoupeBassin,
    #[serde(rename = "AUTRE")]
    Autre,
}

impl DocumentType {
    pub const fn ordered() -> [Self; 26] {
        use DocumentType::*;
        [
            Pc1,
            Pc2,
            Pc3,
            Pc4,
            Pc5,
            Pc6,
            Pc7,
            Pc8,
            Pa1,
            Pa2,
            Pa3,
            Pa4,
            Pa5,
            Pa6,
            Pa7,
            Pa8,
            Pa9,
            Cerfa,
            AvisEp,
            AvisDea,
            PlanRuissellement,
            NoteCalculDea,
            TestInfiltration,
            TestPermeabilite,
            CoupeBassin,
            Autre,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Pc1 => "PC1",
            Self::Pc2 => "PC2",
            Self::Pc3 => "PC3",
            Self::Pc4 => "PC4",
            Self::Pc5 => "PC5",
            Self::Pc6 => "PC6",
            Self::Pc7 => "PC7",
            Self::Pc8 => "PC8",
            Self::Pa1 => "PA1",
            Self::Pa2 => "PA2",
            Self::Pa3 => "PA3",
            Self::Pa4 => "PA4",
            Self::Pa5 => "PA5",
            Self::Pa6 => "PA6",
            Self::Pa7 => "PA7",
            Self::Pa8 => "PA8",
            Self::Pa9 => "PA9",
            Self::Cerfa => "CERFA",
            Self::AvisEp => "AVIS_EP",
            Self::AvisDea => "AVIS_DEA",
            Self::PlanRuissellement => "PLAN_RUISSELLEMENT",
            Self::NoteCalculDea => "NOTE_CALCUL_DEA",
            Self::TestInfiltration => "TEST_INFILTRATION",
            Self::TestPermeabilite => "TEST_PERMEABILITE",
            Self::CoupeBassin => "COUPE_BASSIN",
            Self::Autre => "AUTRE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pc1 => "Plan de situation",
            Self::Pc2 => "Plan de masse",
            Self::Pc3 => "Plan en coupe",
            Self::Pc4 => "Notice descriptive",
            Self::Pc5 => "Plan des façades et toitures",
            Self::Pc6 => "Document graphique d'insertion",
            Self::Pc7 => "Photographie environnement proche",
            Self::Pc8 => "Photographie paysage lointain",
            Self::Pa1 => "Plan de situation (PA)",
            Self::Pa2 => "Notice du projet d'aménagement",
            Self::Pa3 => "Plan de l'état actuel",
            Self::Pa4 => "Plan de composition d'ensemble",
            Self::Pa5 => "Vues et coupes",
            Self::Pa6 => "Photographie environnement proche (PA)",
            Self::Pa7 => "Photographie paysage lointain (PA)",
            Self::Pa8 => "Programme et plans des travaux",
            Self::Pa9 => "Document graphique hypothétique",
            Self::Cerfa => "Formulaire CERFA",
            Self::AvisEp => "Avis eaux pluviales",
            Self::AvisDea => "Avis DEA",
            Self::PlanRuissellement => "Plan de ruissellement",
            Self::NoteCalculDea => "Note de calcul de dimensionnement",
            Self::TestInfiltration => "Test d'infiltration",
            Self::TestPermeabilite => "Test de perméabilité",
            Self::CoupeBassin => "Coupe du bassin",
            Self::Autre => "Document non identifié",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let wanted = code.trim();
        Self::ordered()
            .into_iter()
            .find(|candidate| candidate.code().eq_ignore_ascii_case(wanted))
    }

    /// Types eligible regardless of case family.
    pub const fn is_common(self) -> bool {
        matches!(
            self,
            Self::AvisEp
                | Self::AvisDea
                | Self::PlanRuissellement
                | Self::NoteCalculDea
                | Self::TestInfiltration
                | Self::TestPermeabilite
                | Self::CoupeBassin
        )
    }

    pub const fn is_infiltration_test(self) -> bool {
        matches!(self, Self::TestInfiltration | Self::TestPermeabilite)
    }

    /// Whether this type may be assigned to a document of the given family.
    pub const fn is_candidate_for(self, family: CaseFamily) -> bool {
        match self {
            Self::Pc1
            | Self::Pc2
            | Self::Pc3
            | Self::Pc4
            | Self::Pc5
            | Self::Pc6
            | Self::Pc7
            | Self::Pc8 => matches!(family, CaseFamily::Construction),
            Self::Pa1
            | Self::Pa2
            | Self::Pa3
            | Self::Pa4
            | Self::Pa5
            | Self::Pa6
            | Self::Pa7
            | Self::Pa8
            | Self::Pa9 => matches!(family, CaseFamily::Subdivision),
            Self::Cerfa => true,
            Self::Autre => false,
            _ => self.is_common(),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "conforme")]
    Conforming,
    #[serde(rename = "non_conforme")]
    NonConforming,
    #[serde(rename = "manquant")]
    Missing,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conforming => "Conforme",
            Self::NonConforming => "Non conforme",
            Self::Missing => "Manquant",
        }
    }
}

/// Raw input handed over by the text-extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub filename: String,
    #[serde(default)]
    pub text: String,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// A classified dossier piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip)]
    pub full_text: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Project attributes pulled from the dossier text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub surface_m2: Option<f64>,
    pub is_small_project: Option<bool>,
    pub address: Option<String>,
    pub reference: Option<String>,
    pub impermeabilized_area_m2: Option<f64>,
    pub retention_volume_m3: Option<f64>,
    pub discharge_flow_l_s: Option<f64>,
    pub mentions_infiltration: Option<bool>,
    pub mentions_retention: Option<bool>,
    pub infiltration_area_m2: Option<f64>,
    pub infiltration_rate_mm_h: Option<f64>,
    pub has_infiltration_test: Option<bool>,
    pub retains_rain_15mm: Option<bool>,
    pub retains_rain_45mm: Option<bool>,
    pub calculated_volume_m3: Option<f64>,
}

impl ProjectInfo {
    /// Names accepted in a profile's `required_fields`.
    pub const FIELD_NAMES: [&'static str; 15] = [
        "surface_m2",
        "is_small_project",
        "address",
        "reference",
        "impermeabilized_area_m2",
        "retention_volume_m3",
        "discharge_flow_l_s",
        "mentions_infiltration",
        "mentions_retention",
        "infiltration_area_m2",
        "infiltration_rate_mm_h",
        "has_infiltration_test",
        "retains_rain_15mm",
        "retains_rain_45mm",
        "calculated_volume_m3",
    ];

    /// Unknown field names report as unset.
    pub fn field_is_set(&self, name: &str) -> bool {
        match name.trim() {
            "surface_m2" => self.surface_m2.is_some(),
            "is_small_project" => self.is_small_project.is_some(),
            "address" => self.address.is_some(),
            "reference" => self.reference.is_some(),
            "impermeabilized_area_m2" => self.impermeabilized_area_m2.is_some(),
            "retention_volume_m3" => self.retention_volume_m3.is_some(),
            "discharge_flow_l_s" => self.discharge_flow_l_s.is_some(),
            "mentions_infiltration" => self.mentions_infiltration.is_some(),
            "mentions_retention" => self.mentions_retention.is_some(),
            "infiltration_area_m2" => self.infiltration_area_m2.is_some(),
            "infiltration_rate_mm_h" => self.infiltration_rate_mm_h.is_some(),
            "has_infiltration_test" => self.has_infiltration_test.is_some(),
            "retains_rain_15mm" => self.retains_rain_15mm.is_some(),
            "retains_rain_45mm" => self.retains_rain_45mm.is_some(),
            "calculated_volume_m3" => self.calculated_volume_m3.is_some(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Stable issue identifier.
///
/// Built-in rules use fixed codes; profile-driven rules derive codes from configuration with
/// the prefixes [`IssueCode::MISSING_DOC_PREFIX`], [`IssueCode::MISSING_FIELD_PREFIX`] and
/// [`IssueCode::CRITICAL_MISSING_PREFIX`], so the set is open at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueCode(pub String);

impl IssueCode {
    pub const MISSING_DOC_PREFIX: &'static str = "MISSING_DOC_";
    pub const MISSING_FIELD_PREFIX: &'static str = "MISSING_FIELD_";
    pub const CRITICAL_MISSING_PREFIX: &'static str = "CRITICAL_MISSING_";

    pub fn fixed(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn missing_document(code: &str) -> Self {
        Self(format!("{}{}", Self::MISSING_DOC_PREFIX, code))
    }

    pub fn missing_field(field: &str) -> Self {
        Self(format!(
            "{}{}",
            Self::MISSING_FIELD_PREFIX,
            field.to_uppercase()
        ))
    }

    pub fn critical_missing(document_type: DocumentType) -> Self {
        Self(format!(
            "{}{}",
            Self::CRITICAL_MISSING_PREFIX,
            document_type.code()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for IssueCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    pub code: IssueCode,
    pub title: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default)]
    pub related_documents: Vec<String>,
}

/// Outcome of one dossier analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub case_type: CaseFamily,
    pub project_info: ProjectInfo,
    pub conforming_documents: Vec<Document>,
    pub non_conforming_documents: Vec<Document>,
    pub missing_documents: Vec<String>,
    pub total_documents: usize,
    pub conformity_score: f64,
    pub compliance_issues: Vec<ComplianceIssue>,
}

impl AnalysisReport {
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.conforming_documents
            .iter()
            .chain(self.non_conforming_documents.iter())
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ComplianceIssue> {
        self.compliance_issues
            .iter()
            .filter(move |issue| issue.severity == severity)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_family_parses_codes_case_insensitively() {
        assert_eq!("pa".parse::<CaseFamily>(), Ok(CaseFamily::Subdivision));
        assert_eq!(" PC ".parse::<CaseFamily>(), Ok(CaseFamily::Construction));
        assert!("DP".parse::<CaseFamily>().is_err());
    }

    #[test]
    fn candidate_sets_do_not_overlap_across_families() {
        for document_type in DocumentType::ordered() {
            let in_pc = document_type.is_candidate_for(CaseFamily::Construction);
            let in_pa = document_type.is_candidate_for(CaseFamily::Subdivision);
            if document_type.code().starts_with("PC") {
                assert!(in_pc && !in_pa, "{document_type} leaks into PA");
            }
            if document_type.code().starts_with("PA") {
                assert!(in_pa && !in_pc, "{document_type} leaks into PC");
            }
            if document_type.is_common() || document_type == DocumentType::Cerfa {
                assert!(in_pc && in_pa);
            }
        }
        assert!(!DocumentType::Autre.is_candidate_for(CaseFamily::Construction));
    }

    #[test]
    fn document_type_serializes_as_piece_code() {
        let value = serde_json::to_value(DocumentType::NoteCalculDea).expect("serializes");
        assert_eq!(value, serde_json::json!("NOTE_CALCUL_DEA"));
        assert_eq!(
            DocumentType::from_code("pc3"),
            Some(DocumentType::Pc3),
            "codes resolve case-insensitively"
        );
    }

    #[test]
    fn unknown_profile_field_reads_as_unset() {
        let info = ProjectInfo {
            surface_m2: Some(120.0),
            ..ProjectInfo::default()
        };
        assert!(info.field_is_set("surface_m2"));
        assert!(!info.field_is_set("surfface_m2"));
        for name in ProjectInfo::FIELD_NAMES {
            assert_eq!(info.field_is_set(name), name == "surface_m2");
        }
    }

    #[test]
    fn issue_codes_follow_prefix_convention() {
        assert_eq!(
            IssueCode::missing_document("NOTE_CALCUL_DEA").as_str(),
            "MISSING_DOC_NOTE_CALCUL_DEA"
        );
        assert_eq!(
            IssueCode::missing_field("address").as_str(),
            "MISSING_FIELD_ADDRESS"
        );
        assert_eq!(
            IssueCode::critical_missing(DocumentType::Pc3).as_str(),
            "CRITICAL_MISSING_PC3"
        );
    }
}
