use aqua_verify::config::AnalysisConfig;
use aqua_verify::error::AppError;
use aqua_verify::workflows::dossier::{
    CaseFamily, DossierAnalyzer, DossierManifest, RulesConfig, SourceDocument,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the rules file once and wire the analysis pipeline.
pub(crate) fn build_analyzer(
    config: &AnalysisConfig,
    rules_override: Option<&Path>,
) -> Result<DossierAnalyzer, AppError> {
    let rules_path = rules_override.unwrap_or(&config.rules_path);
    let rules = RulesConfig::load(rules_path)?;
    Ok(DossierAnalyzer::new(config.thresholds, Arc::new(rules))
        .with_default_family(config.default_case_type))
}

pub(crate) fn parse_case_type(raw: &str) -> Result<CaseFamily, String> {
    raw.parse::<CaseFamily>().map_err(|err| err.to_string())
}

/// Read each path as a dossier piece named after its file name.
pub(crate) fn sources_from_files(paths: &[PathBuf]) -> Result<Vec<SourceDocument>, AppError> {
    paths
        .iter()
        .map(|path| -> Result<SourceDocument, AppError> {
            let text = std::fs::read_to_string(path)?;
            Ok(SourceDocument::new(display_name(path), text))
        })
        .collect()
}

/// Text files directly under `dir`, in file-name order.
pub(crate) fn sources_from_dir(dir: &Path) -> Result<Vec<SourceDocument>, AppError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_text_file(&path) {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-text entry");
        }
    }
    paths.sort();
    sources_from_files(&paths)
}

pub(crate) fn sources_from_manifest(path: &Path) -> Result<Vec<SourceDocument>, AppError> {
    let manifest = DossierManifest::from_path(path)?;
    Ok(manifest.load_sources()?)
}

fn is_text_file(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::TEXT)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_type_parser_reports_unknown_codes() {
        assert_eq!(parse_case_type("PA"), Ok(CaseFamily::Subdivision));
        let err = parse_case_type("DP").expect_err("DP is not a permit family");
        assert!(err.contains("DP"));
    }

    #[test]
    fn directory_import_keeps_text_files_in_name_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("pc2.txt"), "PC2 PLAN DE MASSE").expect("write");
        std::fs::write(dir.path().join("pc1.md"), "PC1 PLAN DE SITUATION").expect("write");
        std::fs::write(dir.path().join("scan.pdf"), [0x25, 0x50, 0x44, 0x46]).expect("write");
        std::fs::create_dir(dir.path().join("archive.txt")).expect("nested dir");

        let sources = sources_from_dir(dir.path()).expect("directory imports");
        let names: Vec<&str> = sources.iter().map(|source| source.filename.as_str()).collect();
        assert_eq!(names, vec!["pc1.md", "pc2.txt"]);
        assert_eq!(sources[1].text, "PC2 PLAN DE MASSE");
    }

    #[test]
    fn missing_files_surface_as_io_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = sources_from_files(&[dir.path().join("absent.txt")]);
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn analyzer_uses_configured_default_family() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AnalysisConfig {
            rules_path: dir.path().join("rules.yml"),
            default_case_type: CaseFamily::Subdivision,
            ..AnalysisConfig::default()
        };
        let analyzer = build_analyzer(&config, None).expect("missing rules tolerated");
        assert_eq!(analyzer.default_family(), CaseFamily::Subdivision);
        assert!(analyzer.engine().rules().profiles.is_empty());
    }
}
