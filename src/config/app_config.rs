use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::adapters::android::zipalign_aligner::DEFAULT_BOUNDARY;
use crate::core::errors::{Result, ResignError};
use crate::core::models::inventory::ReferenceMatch;
use crate::core::models::key_role::KeyRole;

/// Configuration file looked up in the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "romsign.toml";

/// Top-level romsign configuration read from `romsign.toml`.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub align: AlignSection,
    #[serde(default)]
    pub matching: MatchingSection,
    #[serde(default)]
    pub references: ReferencesSection,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, `romsign.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) if !p.exists() => {
                return Err(ResignError::InvalidConfig {
                    detail: format!("{} not found", p.display()),
                });
            }
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| match e {
            ResignError::InvalidConfig { detail } => ResignError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ResignError::InvalidConfig {
            detail: format!("failed to parse: {e}"),
        })?;

        let boundary = config.align.boundary;
        if !boundary.is_power_of_two() || boundary > MAX_BOUNDARY {
            return Err(ResignError::InvalidConfig {
                detail: format!(
                    "align.boundary must be a power of two between 1 and {MAX_BOUNDARY}, got {boundary}"
                ),
            });
        }

        for (role, name) in config.references.overrides() {
            if name.trim().is_empty() {
                return Err(ResignError::InvalidConfig {
                    detail: format!("references.{role} must not be empty"),
                });
            }
        }

        Ok(config)
    }

    /// Reference package name for a role, honouring overrides.
    pub fn reference_for(&self, role: KeyRole) -> &str {
        self.references
            .get(role)
            .unwrap_or(role.default_reference())
    }
}

/// Largest alignment zipalign accepts (page alignment for shared libraries).
pub const MAX_BOUNDARY: u32 = 4096;

/// The `[tools]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    #[serde(default = "default_java")]
    pub java: PathBuf,
    #[serde(default = "default_keytool")]
    pub keytool: PathBuf,
    #[serde(default = "default_zipalign")]
    pub zipalign: PathBuf,
    /// SignApk jar. Chosen by Java version next to the binary when absent.
    pub signapk_jar: Option<PathBuf>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            java: default_java(),
            keytool: default_keytool(),
            zipalign: default_zipalign(),
            signapk_jar: None,
        }
    }
}

fn default_java() -> PathBuf {
    PathBuf::from("java")
}

fn default_keytool() -> PathBuf {
    PathBuf::from("keytool")
}

fn default_zipalign() -> PathBuf {
    PathBuf::from("zipalign")
}

/// The `[align]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignSection {
    #[serde(default = "default_boundary")]
    pub boundary: u32,
}

impl Default for AlignSection {
    fn default() -> Self {
        Self {
            boundary: default_boundary(),
        }
    }
}

fn default_boundary() -> u32 {
    DEFAULT_BOUNDARY
}

/// The `[matching]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingSection {
    #[serde(default)]
    pub reference: ReferenceMatch,
}

/// The `[references]` section: per-role reference package overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferencesSection {
    pub platform: Option<String>,
    pub shared: Option<String>,
    pub media: Option<String>,
    pub release: Option<String>,
}

impl ReferencesSection {
    pub fn get(&self, role: KeyRole) -> Option<&str> {
        match role {
            KeyRole::Platform => self.platform.as_deref(),
            KeyRole::Shared => self.shared.as_deref(),
            KeyRole::Media => self.media.as_deref(),
            KeyRole::Release => self.release.as_deref(),
        }
    }

    fn overrides(&self) -> impl Iterator<Item = (KeyRole, &str)> {
        KeyRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|name| (role, name)))
    }
}
