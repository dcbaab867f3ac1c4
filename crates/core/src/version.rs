// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Firmware version lookup in a C header.

use firmpub_config::PublishConfig;
use regex::Regex;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirmwareVersion(String);

impl FirmwareVersion {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the first `#define <macro_name> "<value>"` in `content`.
///
/// Whitespace between the tokens may be any run of spaces, tabs or newlines.
/// An empty quoted value does not count as a match.
pub fn parse_version(content: &str, macro_name: &str) -> Option<FirmwareVersion> {
    let pattern = format!(r#"#define\s+{}\s+"([^"]+)""#, regex::escape(macro_name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| FirmwareVersion::new(m.as_str()))
}

/// Resolve the firmware version from `header`, falling back to
/// `config.fallback_version` when the file is unreadable or has no match.
pub fn resolve_version(header: &Path, config: &PublishConfig) -> FirmwareVersion {
    let fallback = FirmwareVersion::new(config.fallback_version.as_str());

    let content = match std::fs::read_to_string(header) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read version from {}: {}", header.display(), e);
            return fallback;
        }
    };

    match parse_version(&content, &config.version_macro) {
        Some(version) => {
            debug!("Resolved firmware version {} from {:?}", version, header);
            version
        }
        None => {
            debug!(
                "No {} definition in {:?}, using '{}'",
                config.version_macro, header, fallback
            );
            fallback
        }
    }
}
