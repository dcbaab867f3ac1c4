// FirmPub - Firmware Artifact Publisher
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, warn};

use firmpub_config::PublishConfig;
use firmpub_core::{publish, resolve_version, version_header, PublishOutcome, PublishRequest};

const EXIT_OK: u8 = 0;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Publish a firmware build artifact under a versioned name",
    long_about = None
)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy <build-dir>/<progname>.hex to the project root with the firmware
    /// version in its name. Never fails the build.
    Publish(PublishArgs),

    /// Print the firmware version found in the version header.
    Version(VersionArgs),
}

#[derive(Args, Debug)]
struct ManifestArgs {
    /// Project root (where the versioned copy is written)
    #[arg(short, long, env = "PROJECT_DIR")]
    project_dir: PathBuf,

    /// Version header to read instead of the manifest's `version_header`
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Publish manifest (YAML). Defaults to firmpub.yaml in the project root.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PublishArgs {
    #[command(flatten)]
    manifest: ManifestArgs,

    /// Build output directory holding the artifact
    #[arg(short, long, env = "BUILD_DIR")]
    build_dir: PathBuf,

    /// Program name; the artifact is <progname>.<extension>
    #[arg(short = 'n', long, env = "PROGNAME")]
    progname: String,
}

#[derive(Args, Debug)]
struct VersionArgs {
    #[command(flatten)]
    manifest: ManifestArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `version` output stays machine-readable.
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Publish(args) => run_publish(args),
        Commands::Version(args) => match run_version(args) {
            Ok(()) => ExitCode::from(EXIT_OK),
            Err(e) => {
                error!("{:#}", e);
                ExitCode::from(EXIT_RUNTIME_ERROR)
            }
        },
    }
}

/// Load the publish manifest, falling back to the built-in conventions when
/// there is none or it cannot be used.
fn load_config(args: &ManifestArgs) -> PublishConfig {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => match PublishConfig::discover(&args.project_dir) {
            Some(path) => path,
            None => return PublishConfig::default(),
        },
    };

    match PublishConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring publish manifest, using defaults: {:#}", e);
            PublishConfig::default()
        }
    }
}

fn run_publish(args: PublishArgs) -> ExitCode {
    let config = load_config(&args.manifest);

    let mut request = PublishRequest::new(
        &args.manifest.project_dir,
        &args.build_dir,
        args.progname.as_str(),
    );
    if let Some(path) = &args.manifest.version_file {
        request = request.with_version_file(path);
    }

    match publish(&request, &config) {
        PublishOutcome::Published {
            destination,
            sha256,
            ..
        } => debug!(
            "Published {:?} (sha256 {})",
            destination,
            sha256.as_deref().unwrap_or("unavailable")
        ),
        other => debug!("Nothing published: {:?}", other),
    }

    // Publish outcomes never change the exit status.
    ExitCode::from(EXIT_OK)
}

fn run_version(args: VersionArgs) -> Result<()> {
    let config = load_config(&args.manifest);
    let header = version_header(
        &args.manifest.project_dir,
        args.manifest.version_file.as_deref(),
        &config,
    );
    let version = resolve_version(&header, &config);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", version).context("Failed to write version to stdout")?;
    Ok(())
}
