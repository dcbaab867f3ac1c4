// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const IMAGE: &[u8] = b":10010000214601360121470136007EFE09D2190140\n:00000001FF\n";

#[allow(deprecated)]
fn firmpub() -> Command {
    let mut cmd = Command::cargo_bin("firmpub").expect("firmpub binary");
    cmd.env_remove("PROJECT_DIR")
        .env_remove("BUILD_DIR")
        .env_remove("PROGNAME");
    cmd
}

fn project(version: Option<&str>, with_artifact: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join(".pio/build/teensy41");
    fs::create_dir_all(&build).unwrap();

    if let Some(version) = version {
        let header_dir = dir.path().join("lib/aio_system");
        fs::create_dir_all(&header_dir).unwrap();
        fs::write(
            header_dir.join("Version.h"),
            format!("// AiO New Dawn firmware version\n#define FIRMWARE_VERSION \"{version}\" // note\n"),
        )
        .unwrap();
    }
    if with_artifact {
        fs::write(build.join("firmware.hex"), IMAGE).unwrap();
    }
    dir
}

fn build_dir(root: &Path) -> std::path::PathBuf {
    root.join(".pio/build/teensy41")
}

#[test]
fn test_publish_copies_versioned_hex() {
    let dir = project(Some("1.0.24-beta-NMEA"), true);

    firmpub()
        .arg("publish")
        .arg("--project-dir")
        .arg(dir.path())
        .arg("--build-dir")
        .arg(build_dir(dir.path()))
        .arg("--progname")
        .arg("firmware")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Copied firmware.hex to AiO_New_Dawn_v1.0.24-beta-NMEA.hex",
        ));

    let published = dir.path().join("AiO_New_Dawn_v1.0.24-beta-NMEA.hex");
    assert_eq!(fs::read(published).unwrap(), IMAGE);
}

#[test]
fn test_publish_reads_build_environment() {
    let dir = project(Some("6.7.2"), true);

    firmpub()
        .arg("publish")
        .env("PROJECT_DIR", dir.path())
        .env("BUILD_DIR", build_dir(dir.path()))
        .env("PROGNAME", "firmware")
        .assert()
        .success();

    assert!(dir.path().join("AiO_New_Dawn_v6.7.2.hex").exists());
}

#[test]
fn test_publish_missing_artifact_still_succeeds() {
    let dir = project(Some("6.7.2"), false);

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .assert()
        .success()
        .stderr(predicate::str::contains("Source hex file not found"));

    assert!(!dir.path().join("AiO_New_Dawn_v6.7.2.hex").exists());
}

#[test]
fn test_publish_without_header_uses_unknown() {
    let dir = project(None, true);

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .assert()
        .success()
        .stderr(predicate::str::contains("Could not read version from"));

    assert!(dir.path().join("AiO_New_Dawn_vunknown.hex").exists());
}

#[test]
fn test_publish_copy_error_still_succeeds() {
    let dir = project(Some("6.7.2"), true);
    fs::write(
        dir.path().join("firmpub.yaml"),
        "output_dir: \"missing/release\"\n",
    )
    .unwrap();

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error copying hex file"));
}

#[test]
fn test_invalid_manifest_falls_back_to_defaults() {
    let dir = project(Some("6.7.2"), true);
    let manifest = dir.path().join("broken.yaml");
    fs::write(&manifest, "schema_version: \"9.0\"\n").unwrap();

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .arg("--config")
        .arg(&manifest)
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring publish manifest"));

    assert!(dir.path().join("AiO_New_Dawn_v6.7.2.hex").exists());
}

#[test]
fn test_discovered_manifest_changes_prefix() {
    let dir = project(Some("6.7.2"), true);
    fs::write(dir.path().join("firmpub.yaml"), "output_prefix: \"Dawn-\"\n").unwrap();

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .assert()
        .success();

    assert!(dir.path().join("Dawn-6.7.2.hex").exists());
    assert!(!dir.path().join("AiO_New_Dawn_v6.7.2.hex").exists());
}

#[test]
fn test_version_prints_resolved_version() {
    let dir = project(Some("2.1.0"), false);

    firmpub()
        .arg("version")
        .arg("--project-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("2.1.0\n");
}

#[test]
fn test_version_and_publish_share_version_file() {
    let dir = project(Some("1.0.0"), true);
    let other = dir.path().join("Other.h");
    fs::write(&other, "#define FIRMWARE_VERSION \"3.0.0-rc2\"\n").unwrap();

    firmpub()
        .arg("version")
        .arg("-p")
        .arg(dir.path())
        .arg("--version-file")
        .arg(&other)
        .assert()
        .success()
        .stdout("3.0.0-rc2\n");

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .arg("-n")
        .arg("firmware")
        .arg("--version-file")
        .arg(&other)
        .assert()
        .success();

    assert!(dir.path().join("AiO_New_Dawn_v3.0.0-rc2.hex").exists());
}

#[test]
fn test_version_without_header_prints_fallback() {
    let dir = project(None, false);

    firmpub()
        .arg("version")
        .arg("-p")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("unknown\n");
}

#[test]
fn test_publish_requires_progname() {
    let dir = project(Some("6.7.2"), true);

    firmpub()
        .arg("publish")
        .arg("-p")
        .arg(dir.path())
        .arg("-b")
        .arg(build_dir(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--progname"));
}
