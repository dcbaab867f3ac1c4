// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{FirmwareVersion, PublishError, PublishResult};

/// `<build_dir>/<program_name>.<extension>`
pub fn artifact_source(build_dir: &Path, program_name: &str, extension: &str) -> PathBuf {
    build_dir.join(format!("{}.{}", program_name, extension))
}

/// `<output_dir>/<prefix><version>.<extension>`
pub fn artifact_destination(
    output_dir: &Path,
    prefix: &str,
    version: &FirmwareVersion,
    extension: &str,
) -> PathBuf {
    output_dir.join(format!("{}{}.{}", prefix, version, extension))
}

/// Copy `source` over `destination`, carrying permissions and access and
/// modification times along. Returns the number of bytes copied.
///
/// An existing destination is overwritten. Failing to restore timestamps is
/// only logged; the copy itself still counts as done.
pub fn copy_preserving(source: &Path, destination: &Path) -> PublishResult<u64> {
    if is_same_file(source, destination) {
        return Err(PublishError::SameFile(source.to_path_buf()));
    }

    let copy_err = |source_err: std::io::Error| PublishError::Copy {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: source_err,
    };

    // fs::copy already transfers the permission bits.
    let bytes = fs::copy(source, destination).map_err(copy_err)?;

    if let Err(e) = preserve_times(source, destination) {
        warn!(
            "Copied {:?} but could not preserve its timestamps: {}",
            destination, e
        );
    }

    debug!("Copied {} bytes {:?} -> {:?}", bytes, source, destination);
    Ok(bytes)
}

pub fn sha256_file(path: &Path) -> PublishResult<String> {
    let bytes = fs::read(path).map_err(|source| PublishError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Stamp `destination` with the access and modification times of `source`.
fn preserve_times(source: &Path, destination: &Path) -> std::io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    open_for_times(destination)?.set_times(times)
}

/// Same inode on the same device, so hard links count too.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// futimens only needs ownership, so a read-only copy can still be stamped.
#[cfg(unix)]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

#[cfg(not(unix))]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    fs::OpenOptions::new().write(true).open(path)
}
