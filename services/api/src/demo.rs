use crate::infra::{
    build_analyzer, parse_case_type, sources_from_dir, sources_from_files, sources_from_manifest,
};
use aqua_verify::config::{AnalysisConfig, AppConfig, DEFAULT_RULES_PATH};
use aqua_verify::error::AppError;
use aqua_verify::workflows::dossier::{
    AnalysisReport, CaseFamily, Document, DossierAnalyzer, RulesConfig, RulesConfigError,
    Severity, SourceDocument,
};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_RULES: &str = include_str!("../../../config/rules.yml");

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyzeArgs {
    /// Extracted text files, one per dossier piece
    pub(crate) files: Vec<PathBuf>,
    /// Directory whose text files are all dossier pieces
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
    /// CSV manifest listing `filename,text_path` rows
    #[arg(long)]
    pub(crate) manifest: Option<PathBuf>,
    /// Permit family (PC or PA). Defaults to APP_DEFAULT_CASE_TYPE.
    #[arg(long, value_parser = parse_case_type)]
    pub(crate) case_type: Option<CaseFamily>,
    /// Rules file overriding APP_RULES_PATH
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Permit family of the sample dossier (PC or PA)
    #[arg(long, value_parser = parse_case_type)]
    pub(crate) case_type: Option<CaseFamily>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// Report stamped with the time it was produced.
#[derive(Debug, Serialize)]
pub(crate) struct ReportEnvelope<'a> {
    pub(crate) analyzed_at: DateTime<Utc>,
    pub(crate) report: &'a AnalysisReport,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        files,
        dir,
        manifest,
        case_type,
        rules,
        json,
    } = args;

    let config = AppConfig::load()?;
    let analyzer = build_analyzer(&config.analysis, rules.as_deref())?;

    let mut sources = sources_from_files(&files)?;
    if let Some(dir) = dir {
        sources.extend(sources_from_dir(&dir)?);
    }
    if let Some(manifest) = manifest {
        sources.extend(sources_from_manifest(&manifest)?);
    }

    let family = case_type.unwrap_or(analyzer.default_family());
    let report = analyzer.try_analyze(&sources, family)?;
    print_report(&report, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { case_type, json } = args;

    let analyzer = demo_analyzer()?;
    let family = case_type.unwrap_or_default();
    let report = analyzer.try_analyze(&sample_dossier(family), family)?;

    if !json {
        println!("Dossier verification demo ({})", family.label());
    }
    print_report(&report, json);
    Ok(())
}

fn demo_analyzer() -> Result<DossierAnalyzer, AppError> {
    let rules = RulesConfig::from_yaml(DEMO_RULES).map_err(|source| RulesConfigError::Parse {
        path: PathBuf::from(DEFAULT_RULES_PATH),
        source,
    })?;
    let config = AnalysisConfig::default();
    Ok(DossierAnalyzer::new(config.thresholds, Arc::new(rules)))
}

fn print_report(report: &AnalysisReport, json: bool) {
    if json {
        let envelope = ReportEnvelope {
            analyzed_at: Utc::now(),
            report,
        };
        match serde_json::to_string_pretty(&envelope) {
            Ok(payload) => println!("{payload}"),
            Err(err) => eprintln!("report serialisation failed: {err}"),
        }
    } else {
        print!("{}", format_report(report));
    }
}

/// Plain-text rendering of a report for terminal output.
pub(crate) fn format_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let info = &report.project_info;

    let _ = writeln!(
        out,
        "Case type: {} ({})",
        report.case_type,
        report.case_type.label()
    );
    let _ = writeln!(
        out,
        "Conformity score: {:.1}% ({} documents)",
        report.conformity_score, report.total_documents
    );

    let _ = writeln!(out, "\nProject");
    let _ = writeln!(out, "- Surface: {}", metric(info.surface_m2, "m²"));
    let size = match info.is_small_project {
        Some(true) => "small (< 240 m²)",
        Some(false) => "big (>= 240 m²)",
        None => "unknown",
    };
    let _ = writeln!(out, "- Size: {size}");
    if let Some(address) = &info.address {
        let _ = writeln!(out, "- Address: {address}");
    }
    if let Some(reference) = &info.reference {
        let _ = writeln!(out, "- Reference: {reference}");
    }
    let _ = writeln!(
        out,
        "- Impermeabilized area: {}",
        metric(info.impermeabilized_area_m2, "m²")
    );
    let _ = writeln!(
        out,
        "- Retention volume (declared): {}",
        metric(info.retention_volume_m3, "m³")
    );
    let _ = writeln!(
        out,
        "- Retention volume (calculated): {}",
        metric(info.calculated_volume_m3, "m³")
    );

    let _ = writeln!(out, "\nDocuments");
    for document in report.documents() {
        let _ = writeln!(out, "{}", document_line(document));
    }
    if report.total_documents == 0 {
        let _ = writeln!(out, "- none");
    }

    if report.is_complete() {
        let _ = writeln!(out, "\nMissing pieces: none");
    } else {
        let _ = writeln!(
            out,
            "\nMissing pieces: {}",
            report.missing_documents.join(", ")
        );
    }

    if report.compliance_issues.is_empty() {
        let _ = writeln!(out, "\nCompliance issues: none");
    } else {
        let errors = report.issues_with(Severity::Error).count();
        let _ = writeln!(
            out,
            "\nCompliance issues ({} total, {} blocking)",
            report.compliance_issues.len(),
            errors
        );
        for issue in &report.compliance_issues {
            let _ = writeln!(
                out,
                "- [{}] {}: {}",
                issue.severity.label(),
                issue.code,
                issue.message
            );
            if let Some(evidence) = &issue.evidence {
                let _ = writeln!(out, "    evidence: {evidence}");
            }
        }
    }

    out
}

fn document_line(document: &Document) -> String {
    let mut line = format!(
        "- {}: {} ({}), {}, confidence {:.2}",
        document.filename,
        document.document_type,
        document.document_type.label(),
        document.status.label(),
        document.confidence
    );
    for note in &document.issues {
        let _ = write!(line, "\n    {note}");
    }
    line
}

fn metric(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "not found".to_string(), |value| format!("{value:.2} {unit}"))
}

/// A small, complete dossier with a stormwater notice.
pub(crate) fn sample_dossier(family: CaseFamily) -> Vec<SourceDocument> {
    let code = family.code();
    let mut sources: Vec<SourceDocument> = family
        .required_documents()
        .iter()
        .filter(|piece| piece.code() != "CERFA")
        .map(|piece| {
            SourceDocument::new(
                format!("{}.txt", piece.code().to_lowercase()),
                format!(
                    "{} - {}\nPièce jointe au dossier de {}.",
                    piece.code(),
                    piece.label(),
                    family.label().to_lowercase()
                ),
            )
        })
        .collect();

    sources.push(SourceDocument::new(
        "cerfa_13406.txt",
        format!(
            "Demande de {} - formulaire cerfa n° 13406\n\
             Adresse du terrain : 12 rue des Lavandières, 38000 Grenoble\n\
             Référence cadastrale : AB 123\n\
             Surface de plancher créée : 180 m²",
            family.label().to_lowercase()
        ),
    ));
    sources.push(SourceDocument::new(
        format!("{}_notice_ep.txt", code.to_lowercase()),
        "Notice de gestion des eaux pluviales\n\
         Surface imperméabilisée : 200 m²\n\
         Volume de rétention : 2 m³ en cuve enterrée.",
    ));
    sources
}
