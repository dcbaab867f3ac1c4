// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod artifact;
pub mod publish;
pub mod version;

use std::path::PathBuf;

pub use artifact::{artifact_destination, artifact_source, copy_preserving, sha256_file};
pub use publish::{publish, version_header, PublishOutcome, PublishRequest};
pub use version::{parse_version, resolve_version, FirmwareVersion};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0:?} and its destination are the same file")]
    SameFile(PathBuf),
}

pub type PublishResult<T> = Result<T, PublishError>;
