//! CSV manifest listing the pieces of a dossier.
//!
//! Each row names the piece as filed (`filename`) and the plain-text file holding its
//! extracted content (`text_path`). Relative text paths resolve against the manifest's own
//! directory when loaded with [`DossierManifest::from_path`].

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::domain::SourceDocument;

#[derive(Debug, thiserror::Error)]
pub enum ManifestImportError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid manifest CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("manifest row {row} has an empty filename")]
    EmptyFilename { row: usize },
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    filename: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    text_path: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// One manifest line, before its text is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub filename: String,
    pub text_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DossierManifest {
    pub entries: Vec<ManifestEntry>,
}

impl DossierManifest {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ManifestImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ManifestImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_reader(file)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(manifest.resolved_against(base))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ManifestImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (index, row) in csv_reader.deserialize::<ManifestRow>().enumerate() {
            let row = row?;
            if row.filename.is_empty() {
                return Err(ManifestImportError::EmptyFilename { row: index + 1 });
            }
            entries.push(ManifestEntry {
                filename: row.filename,
                text_path: row.text_path.map(PathBuf::from),
            });
        }

        Ok(Self { entries })
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        for entry in &mut self.entries {
            if let Some(text_path) = entry.text_path.take() {
                entry.text_path = Some(if text_path.is_absolute() {
                    text_path
                } else {
                    base.join(text_path)
                });
            }
        }
        self
    }

    /// Read every referenced text file. Entries without a text path yield empty text.
    pub fn load_sources(&self) -> Result<Vec<SourceDocument>, ManifestImportError> {
        self.entries
            .iter()
            .map(|entry| -> Result<SourceDocument, ManifestImportError> {
                let text = match &entry.text_path {
                    Some(path) => {
                        std::fs::read_to_string(path).map_err(|source| ManifestImportError::Io {
                            path: path.clone(),
                            source,
                        })?
                    }
                    None => String::new(),
                };
                Ok(SourceDocument::new(entry.filename.clone(), text))
            })
            .collect()
    }
}
