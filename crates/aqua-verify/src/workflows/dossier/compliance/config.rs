use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rule bundle selected by project size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Small,
    Big,
    Base,
}

impl ProfileKind {
    pub fn for_project(is_small_project: Option<bool>) -> Self {
        match is_small_project {
            Some(true) => Self::Small,
            Some(false) => Self::Big,
            None => Self::Base,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Big => "big",
            Self::Base => "base",
        }
    }
}

/// Extra fields and pieces a profile expects. Absent or null keys read as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRules {
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_documents: Vec<String>,
}

static EMPTY_PROFILE: ProfileRules = ProfileRules {
    required_fields: Vec::new(),
    required_documents: Vec::new(),
};

/// Rules resource: `profiles -> {small|big|base} -> ProfileRules`.
///
/// Loaded once and shared read-only between evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default, deserialize_with = "profiles_without_nulls")]
    pub profiles: BTreeMap<String, ProfileRules>,
}

#[derive(Debug, thiserror::Error)]
pub enum RulesConfigError {
    #[error("failed to read rules file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rules file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl RulesConfig {
    /// Read the YAML rules file. A missing file yields an empty configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RulesConfigError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "rules file not found, using built-in rules only");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(RulesConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_yaml(&raw).map_err(|source| RulesConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), profiles = config.profiles.len(), "rules loaded");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        let blank = raw.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Profile for `kind`, falling back to `base` and then to an empty profile.
    pub fn profile(&self, kind: ProfileKind) -> &ProfileRules {
        self.profiles
            .get(kind.key())
            .or_else(|| self.profiles.get(ProfileKind::Base.key()))
            .unwrap_or(&EMPTY_PROFILE)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// A profile written as `~` behaves as if it were absent.
fn profiles_without_nulls<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, ProfileRules>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<ProfileRules>> = null_as_default(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, profile)| profile.map(|profile| (name, profile)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"
profiles:
  base:
    required_fields: [surface_m2]
  small:
    required_fields: ~
    required_documents: [PC2]
"#;

    #[test]
    fn absent_and_null_keys_read_as_empty() {
        let config = RulesConfig::from_yaml(RULES).expect("rules parse");
        let base = config.profile(ProfileKind::Base);
        assert_eq!(base.required_fields, vec!["surface_m2".to_string()]);
        assert!(base.required_documents.is_empty());

        let small = config.profile(ProfileKind::Small);
        assert!(small.required_fields.is_empty());
        assert_eq!(small.required_documents, vec!["PC2".to_string()]);
    }

    #[test]
    fn missing_profile_falls_back_to_base_then_empty() {
        let config = RulesConfig::from_yaml(RULES).expect("rules parse");
        assert_eq!(config.profile(ProfileKind::Big), config.profile(ProfileKind::Base));

        let empty = RulesConfig::default();
        assert_eq!(empty.profile(ProfileKind::Small), &ProfileRules::default());
    }

    #[test]
    fn null_profile_falls_back_to_base() {
        let config = RulesConfig::from_yaml(
            "profiles:\n  small: ~\n  base:\n    required_fields: [surface_m2]\n",
        )
        .expect("null profile tolerated");
        assert!(!config.profiles.contains_key("small"));
        assert_eq!(
            config.profile(ProfileKind::Small).required_fields,
            vec!["surface_m2".to_string()]
        );
    }

    #[test]
    fn blank_or_comment_only_documents_are_empty() {
        assert_eq!(RulesConfig::from_yaml("").expect("blank"), RulesConfig::default());
        assert_eq!(
            RulesConfig::from_yaml("# nothing yet\n").expect("comments"),
            RulesConfig::default()
        );
        assert_eq!(
            RulesConfig::from_yaml("profiles: ~").expect("null profiles"),
            RulesConfig::default()
        );
    }

    #[test]
    fn load_tolerates_missing_file_but_not_malformed_yaml() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.yml");
        assert_eq!(
            RulesConfig::load(&missing).expect("missing file tolerated"),
            RulesConfig::default()
        );

        let broken = dir.path().join("broken.yml");
        std::fs::write(&broken, "profiles: [unclosed").expect("write rules");
        assert!(matches!(
            RulesConfig::load(&broken),
            Err(RulesConfigError::Parse { .. })
        ));
    }

    #[test]
    fn profile_kind_tracks_small_project_flag() {
        assert_eq!(ProfileKind::for_project(Some(true)), ProfileKind::Small);
        assert_eq!(ProfileKind::for_project(Some(false)), ProfileKind::Big);
        assert_eq!(ProfileKind::for_project(None), ProfileKind::Base);
    }
}
