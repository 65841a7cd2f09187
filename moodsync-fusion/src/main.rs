//! moodsync-fusion - command-line front end for the mood fusion engine
//!
//! Reads mood observations from arguments or JSON, prints the fused result
//! as JSON on stdout. Logs go to stderr.

mod args;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moodsync_common::config::{load_config, DEFAULT_LOG_LEVEL};
use moodsync_fusion::{catalog, classifier, AffectivePoint, MoodFuser, MoodInput};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "moodsync-fusion",
    version,
    about = "Fuse mood observations into one valence/arousal estimate"
)]
struct Cli {
    /// Config file (overrides MOODSYNC_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true, env = "MOODSYNC_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuse moods given as MOOD[:CONFIDENCE[:WEIGHT[:SOURCE]]]
    Fuse {
        #[arg(value_parser = args::parse_mood_arg)]
        inputs: Vec<MoodInput>,
    },
    /// Fuse a JSON array of {mood, confidence, weight?, source?} objects
    FuseJson {
        /// File to read; stdin when omitted or "-"
        path: Option<PathBuf>,
    },
    /// Nearest catalog mood for a valence/arousal point
    #[command(allow_negative_numbers = true)]
    Classify { valence: f64, arousal: f64 },
    /// Canonical key for a mood token, alias or emoji
    Normalize { token: String },
    /// List the mood catalog
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_source) = load_config(cli.config.as_deref())?;

    // RUST_LOG first, then --log-level, then the config file
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting MoodSync Fusion (moodsync-fusion) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Configuration: {:?}", config_source);

    let fuser = MoodFuser::from_settings(&config.fusion)?;

    match cli.command {
        Command::Fuse { inputs } => print_json(&fuser.fuse(&inputs)),
        Command::FuseJson { path } => {
            let value = read_json(path)?;
            print_json(&fuser.fuse_json(&value))
        }
        Command::Classify { valence, arousal } => {
            print_json(&classifier::classify(&AffectivePoint::new(valence, arousal)))
        }
        Command::Normalize { token } => print_json(&serde_json::json!({
            "token": token,
            "canonical": catalog::normalize(&token),
            "valid": catalog::is_valid_mood(&token),
        })),
        Command::Catalog => print_json(catalog::entries()),
    }
}

fn read_json(path: Option<PathBuf>) -> Result<serde_json::Value> {
    let content = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(&p)
            .with_context(|| format!("Failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
