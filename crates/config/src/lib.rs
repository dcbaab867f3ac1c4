// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Publish manifest for the post-build hook.
//!
//! Every naming convention the hook relies on (where the version header
//! lives, which macro carries the version, how the published file is named)
//! has a default matching the AiO New Dawn project layout. A `firmpub.yaml`
//! in the project root can override any of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manifest file names probed by [`PublishConfig::discover`], in order.
pub const MANIFEST_FILE_NAMES: [&str; 2] = ["firmpub.yaml", "firmpub.yml"];

pub const DEFAULT_VERSION_HEADER: &str = "lib/aio_system/Version.h";
pub const DEFAULT_VERSION_MACRO: &str = "FIRMWARE_VERSION";
pub const DEFAULT_FALLBACK_VERSION: &str = "unknown";
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "hex";
pub const DEFAULT_OUTPUT_PREFIX: &str = "AiO_New_Dawn_v";

/// Default schema version for YAML manifests
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_version_header() -> PathBuf {
    PathBuf::from(DEFAULT_VERSION_HEADER)
}

fn default_version_macro() -> String {
    DEFAULT_VERSION_MACRO.to_string()
}

fn default_fallback_version() -> String {
    DEFAULT_FALLBACK_VERSION.to_string()
}

fn default_artifact_extension() -> String {
    DEFAULT_ARTIFACT_EXTENSION.to_string()
}

fn default_output_prefix() -> String {
    DEFAULT_OUTPUT_PREFIX.to_string()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported schema_version '{0}'. Supported versions: '1.x'")]
    UnsupportedSchema(String),
    #[error("Field '{0}' cannot be empty")]
    Empty(&'static str),
    #[error("Field '{field}' must not contain a path separator: '{value}'")]
    PathSeparator { field: &'static str, value: String },
    #[error("Field 'artifact_extension' must not start with '.': '{0}'")]
    LeadingDot(String),
}

/// Naming conventions used when publishing a build artifact.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Version header, relative to the project root unless absolute.
    #[serde(default = "default_version_header")]
    pub version_header: PathBuf,
    /// Name of the `#define` carrying the quoted version string.
    #[serde(default = "default_version_macro")]
    pub version_macro: String,
    #[serde(default = "default_fallback_version")]
    pub fallback_version: String,
    /// Extension of both the build artifact and the published copy, without the dot.
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    /// Directory receiving the published copy. Defaults to the project root.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            version_header: default_version_header(),
            version_macro: default_version_macro(),
            fallback_version: default_fallback_version(),
            artifact_extension: default_artifact_extension(),
            output_prefix: default_output_prefix(),
            output_dir: None,
        }
    }
}

impl PublishConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read publish manifest at {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid publish manifest {:?}", path))?;
        tracing::debug!("Loaded publish manifest from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map of defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse publish manifest YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Look for a manifest in the project root.
    pub fn discover<P: AsRef<Path>>(project_dir: P) -> Option<PathBuf> {
        let project_dir = project_dir.as_ref();
        MANIFEST_FILE_NAMES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let major = self.schema_version.trim().split('.').next().unwrap_or("");
        if major != "1" {
            return Err(ConfigError::UnsupportedSchema(self.schema_version.clone()));
        }

        if self.version_macro.trim().is_empty() {
            return Err(ConfigError::Empty("version_macro"));
        }
        if self.fallback_version.is_empty() {
            return Err(ConfigError::Empty("fallback_version"));
        }
        if self.artifact_extension.is_empty() {
            return Err(ConfigError::Empty("artifact_extension"));
        }
        if self.artifact_extension.starts_with('.') {
            return Err(ConfigError::LeadingDot(self.artifact_extension.clone()));
        }

        for (field, value) in [
            ("artifact_extension", &self.artifact_extension),
            ("output_prefix", &self.output_prefix),
            ("fallback_version", &self.fallback_version),
        ] {
            if has_path_separator(value) {
                return Err(ConfigError::PathSeparator {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn version_header_path<P: AsRef<Path>>(&self, project_dir: P) -> PathBuf {
        project_dir.as_ref().join(&self.version_header)
    }

    pub fn output_dir<P: AsRef<Path>>(&self, project_dir: P) -> PathBuf {
        match &self.output_dir {
            Some(dir) => project_dir.as_ref().join(dir),
            None => project_dir.as_ref().to_path_buf(),
        }
    }
}

fn has_path_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}
