//! Project attribute extraction over the classified dossier.
//!
//! Documents are read in caller order and every field keeps the first value found. Flags
//! only move towards `true`: the rainfall-threshold flags may record explicit negative
//! evidence while unset, and later positive evidence overrides it.

mod form;
mod numeric;
mod patterns;

use super::domain::{Document, DocumentType, ProjectInfo};
use patterns::{first_number, first_text, rain_evidence, RainEvidence};
use tracing::trace;

/// Projects under this floor area are assessed against the "small" profile.
pub const SMALL_PROJECT_THRESHOLD_M2: f64 = 240.0;
/// Longest address kept on the snapshot, in characters.
pub const MAX_ADDRESS_CHARS: usize = 200;

/// Single-owner accumulator used during one extraction pass.
#[derive(Debug, Default)]
pub struct ProjectInfoBuilder {
    info: ProjectInfo,
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

impl ProjectInfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&mut self, surface_m2: Option<f64>) -> &mut Self {
        if self.info.surface_m2.is_none() {
            if let Some(surface) = surface_m2 {
                self.info.surface_m2 = Some(surface);
                self.info.is_small_project = Some(surface < SMALL_PROJECT_THRESHOLD_M2);
            }
        }
        self
    }

    pub fn address(&mut self, address: Option<String>) -> &mut Self {
        let truncated =
            address.map(|value| value.chars().take(MAX_ADDRESS_CHARS).collect::<String>());
        fill(&mut self.info.address, truncated);
        self
    }

    pub fn reference(&mut self, reference: Option<String>) -> &mut Self {
        fill(&mut self.info.reference, reference);
        self
    }

    pub fn impermeabilized_area(&mut self, area_m2: Option<f64>) -> &mut Self {
        fill(&mut self.info.impermeabilized_area_m2, area_m2);
        self
    }

    pub fn retention_volume(&mut self, volume_m3: Option<f64>) -> &mut Self {
        fill(&mut self.info.retention_volume_m3, volume_m3);
        self
    }

    pub fn discharge_flow(&mut self, flow_l_s: Option<f64>) -> &mut Self {
        fill(&mut self.info.discharge_flow_l_s, flow_l_s);
        self
    }

    pub fn infiltration_area(&mut self, area_m2: Option<f64>) -> &mut Self {
        fill(&mut self.info.infiltration_area_m2, area_m2);
        self
    }

    pub fn infiltration_rate(&mut self, rate_mm_h: Option<f64>) -> &mut Self {
        fill(&mut self.info.infiltration_rate_mm_h, rate_mm_h);
        self
    }

    pub fn infiltration_mentioned(&mut self, found: bool) -> &mut Self {
        if found {
            self.info.mentions_infiltration = Some(true);
        }
        self
    }

    pub fn retention_mentioned(&mut self, found: bool) -> &mut Self {
        if found {
            self.info.mentions_retention = Some(true);
        }
        self
    }

    pub fn infiltration_test(&mut self, found: bool) -> &mut Self {
        if found {
            self.info.has_infiltration_test = Some(true);
        }
        self
    }

    fn rain_15mm(&mut self, evidence: RainEvidence) -> &mut Self {
        apply_rain_evidence(&mut self.info.retains_rain_15mm, evidence);
        self
    }

    fn rain_45mm(&mut self, evidence: RainEvidence) -> &mut Self {
        apply_rain_evidence(&mut self.info.retains_rain_45mm, evidence);
        self
    }

    /// Freeze the accumulated attributes.
    pub fn finish(self) -> ProjectInfo {
        self.info
    }
}

fn apply_rain_evidence(slot: &mut Option<bool>, evidence: RainEvidence) {
    if evidence.positive {
        *slot = Some(true);
    } else if evidence.negative && slot.is_none() {
        *slot = Some(false);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectInfoExtractor;

impl ProjectInfoExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, documents: &[Document]) -> ProjectInfo {
        let mut builder = ProjectInfoBuilder::new();
        for document in documents {
            self.absorb(&mut builder, document);
        }
        builder.finish()
    }

    fn absorb(&self, builder: &mut ProjectInfoBuilder, document: &Document) {
        builder.infiltration_test(document.document_type.is_infiltration_test());

        let text = document.full_text.as_str();
        if text.trim().is_empty() {
            return;
        }
        trace!(filename = %document.filename, "extracting project attributes");

        let surface = if document.document_type == DocumentType::Cerfa {
            form::form_surface(text)
        } else {
            first_number(&patterns::SURFACE, text)
        };

        builder
            .surface(surface)
            .address(first_text(&patterns::ADDRESS, text))
            .reference(first_text(&patterns::REFERENCE, text))
            .impermeabilized_area(first_number(&patterns::IMPERMEABILIZED_AREA, text))
            .retention_volume(first_number(&patterns::RETENTION_VOLUME, text))
            .discharge_flow(first_number(&patterns::DISCHARGE_FLOW, text))
            .infiltration_area(first_number(&patterns::INFILTRATION_AREA, text))
            .infiltration_rate(first_number(&patterns::INFILTRATION_RATE, text))
            .infiltration_mentioned(patterns::INFILTRATION_MENTION.is_match(text))
            .retention_mentioned(patterns::RETENTION_MENTION.is_match(text))
            .infiltration_test(patterns::INFILTRATION_TEST.is_match(text))
            .rain_15mm(rain_evidence(&patterns::RAIN_15MM, text))
            .rain_45mm(rain_evidence(&patterns::RAIN_45MM, text));
    }
}
