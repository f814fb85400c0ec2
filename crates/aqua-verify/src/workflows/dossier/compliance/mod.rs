mod config;
mod rules;
mod volume;

pub use config::{ProfileKind, ProfileRules, RulesConfig, RulesConfigError};
pub use volume::{
    calculated_volume, minimum_volume, INFILTRATION_DRAWDOWN_FACTOR, MINIMUM_RETENTION_DEPTH_M,
    REFERENCE_RAIN_DEPTH_M,
};

use super::domain::{CaseFamily, ComplianceIssue, DocumentType, ProjectInfo};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Stateless evaluator applying the loaded rule profiles to one dossier at a time.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    rules: Arc<RulesConfig>,
}

impl ComplianceEngine {
    pub fn new(rules: Arc<RulesConfig>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Evaluate the dossier and write the calculated retention volume back onto `project`.
    ///
    /// Issues come out in a fixed order: surface, critical pieces, profile documents, profile
    /// fields, then the size-specific checks.
    pub fn evaluate(
        &self,
        project: &mut ProjectInfo,
        detected: &BTreeSet<DocumentType>,
        family: CaseFamily,
    ) -> Vec<ComplianceIssue> {
        let kind = ProfileKind::for_project(project.is_small_project);
        let profile = self.rules.profile(kind);
        rules::evaluate_rules(project, detected, family, kind, profile)
    }

    /// Same as [`ComplianceEngine::evaluate`] with an explicit profile.
    pub fn evaluate_profile(
        &self,
        project: &mut ProjectInfo,
        detected: &BTreeSet<DocumentType>,
        family: CaseFamily,
        profile: &ProfileRules,
    ) -> Vec<ComplianceIssue> {
        let kind = ProfileKind::for_project(project.is_small_project);
        rules::evaluate_rules(project, detected, family, kind, profile)
    }
}
