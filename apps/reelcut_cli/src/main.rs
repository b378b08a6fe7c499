//! Reelcut CLI
//!
//! Replays scripted editor input against a headless edit session and prints
//! what would have been submitted.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reelcut_core::{EditorConfig, FilterTag, Stage};
use reelcut_preview::{
    ChannelSink, EditorDriver, EditorEvent, Layout, PreviewError, SimulatedClock, TracingSurface,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "reelcut")]
#[command(about = "Headless short-form clip editor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON event script and print the submission
    Replay {
        /// Script file path
        script: PathBuf,

        /// Editor config JSON; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the simulated upload progress
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the default editor config as JSON
    Config,

    /// List the available filter presets
    Filters,
}

/// One scripted input, delivered `after_ms` after the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Step {
    #[serde(default)]
    after_ms: u64,
    event: EditorEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Script {
    #[serde(default)]
    layout: Layout,
    steps: Vec<Step>,
}

fn parse_script(data: &str) -> Result<Script> {
    let script: Script = serde_json::from_str(data).context("Invalid script")?;
    if script.steps.is_empty() {
        bail!("Script has no steps");
    }
    Ok(script)
}

fn load_script(path: &Path) -> Result<Script> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&data).with_context(|| format!("Failed to load {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

async fn replay(script: Script, config: EditorConfig, seed: Option<u64>) -> Result<()> {
    let (sink, submitted) = ChannelSink::new();
    let media = SimulatedClock::new();
    let surface = TracingSurface::new();
    let mut driver = match seed {
        Some(seed) => EditorDriver::with_seed(config, media, surface, sink, script.layout, seed),
        None => EditorDriver::new(config, media, surface, sink, script.layout),
    };

    let (tx, rx) = mpsc::channel(64);
    let steps = script.steps;
    let feeder = tokio::spawn(async move {
        for step in steps {
            if step.after_ms > 0 {
                tokio::time::sleep(Duration::from_millis(step.after_ms)).await;
            }
            if tx.send(step.event).await.is_err() {
                break;
            }
        }
    });

    let stage = driver.run(rx).await;
    feeder.abort();
    tracing::info!(
        ?stage,
        frames = driver.surface().frames(),
        "Replay finished"
    );

    if stage != Stage::Finished {
        println!("No submission (session ended while {:?})", stage);
        return Ok(());
    }
    let submission = submitted.await.map_err(|_| PreviewError::NotSubmitted)?;
    println!("{}", serde_json::to_string_pretty(&submission)?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            script,
            config,
            seed,
        } => {
            let config = load_config(config.as_deref())?;
            let script = load_script(&script)?;
            tracing::info!(steps = script.steps.len(), "Replaying script");
            replay(script, config, seed).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&EditorConfig::default())?);
        }
        Commands::Filters => {
            for filter in FilterTag::ALL {
                println!("{}", filter.name());
            }
        }
    }

    Ok(())
}
