// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The post-build publish step.
//!
//! [`publish`] runs the whole hook: resolve the version, work out where the
//! build artifact is and where its versioned copy goes, then copy. Nothing in
//! here returns an error to the caller. Every failure ends up as a log line
//! and a [`PublishOutcome`] variant, so a build that calls this hook can never
//! be failed by it.

use firmpub_config::PublishConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::artifact::{artifact_destination, artifact_source, copy_preserving, sha256_file};
use crate::version::{resolve_version, FirmwareVersion};

/// Inputs handed over by the build orchestrator.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    pub program_name: String,
    /// Overrides the manifest's version header when set.
    pub version_file: Option<PathBuf>,
}

impl PublishRequest {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        program_name: impl Into<String>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            build_dir: build_dir.into(),
            program_name: program_name.into(),
            version_file: None,
        }
    }

    pub fn with_version_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.version_file = Some(path.into());
        self
    }

    pub fn version_header(&self, config: &PublishConfig) -> PathBuf {
        version_header(&self.project_dir, self.version_file.as_deref(), config)
    }
}

/// The header to read the version from: an explicit file if one was given,
/// otherwise the manifest's `version_header` under the project root.
pub fn version_header(
    project_dir: &Path,
    version_file: Option<&Path>,
    config: &PublishConfig,
) -> PathBuf {
    match version_file {
        Some(path) => path.to_path_buf(),
        None => config.version_header_path(project_dir),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        version: FirmwareVersion,
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
        /// `None` if the copy could not be read back.
        sha256: Option<String>,
    },
    SourceMissing {
        version: FirmwareVersion,
        source: PathBuf,
    },
    CopyFailed {
        version: FirmwareVersion,
        source: PathBuf,
        destination: PathBuf,
        reason: String,
    },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }

    pub fn version(&self) -> &FirmwareVersion {
        match self {
            PublishOutcome::Published { version, .. }
            | PublishOutcome::SourceMissing { version, .. }
            | PublishOutcome::CopyFailed { version, .. } => version,
        }
    }
}

pub fn publish(request: &PublishRequest, config: &PublishConfig) -> PublishOutcome {
    let header = request.version_header(config);
    let version = resolve_version(&header, config);

    let source = artifact_source(
        &request.build_dir,
        &request.program_name,
        &config.artifact_extension,
    );
    let destination = artifact_destination(
        &config.output_dir(&request.project_dir),
        &config.output_prefix,
        &version,
        &config.artifact_extension,
    );

    if !source.exists() {
        warn!("Source hex file not found: {}", source.display());
        return PublishOutcome::SourceMissing { version, source };
    }

    match copy_preserving(&source, &destination) {
        Ok(bytes) => {
            info!(
                "Copied {} to {}",
                file_name(&source),
                file_name(&destination)
            );
            let sha256 = match sha256_file(&destination) {
                Ok(digest) => {
                    debug!("{} sha256={}", destination.display(), digest);
                    Some(digest)
                }
                Err(e) => {
                    warn!("Could not hash published artifact: {}", e);
                    None
                }
            };
            PublishOutcome::Published {
                version,
                source,
                destination,
                bytes,
                sha256,
            }
        }
        Err(e) => {
            error!("Error copying hex file: {}", e);
            PublishOutcome::CopyFailed {
                version,
                source,
                destination,
                reason: e.to_string(),
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
