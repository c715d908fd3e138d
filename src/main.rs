//! # Secret Rotator CLI
//!
//! Runs rotation steps against AWS Secrets Manager.
//!
//! ## Usage
//!
//! ```bash
//! # Run one step
//! secret-rotator rotate --secret-id app-config --token <version-id> --step createSecret
//!
//! # Run the step described by an orchestrator event (file or stdin)
//! secret-rotator event event.json
//! cat event.json | secret-rotator event -
//!
//! # Show which versions hold which stages
//! secret-rotator describe --secret-id app-config
//! ```
//!
//! Log verbosity comes from `LOG_LEVEL` (or `RUST_LOG`), format from `LOG_FORMAT`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secret_rotator::config::RotatorConfig;
use secret_rotator::observability::{self, metrics};
use secret_rotator::provider::{AwsSecretsManager, SecretStoreProvider};
use secret_rotator::rotation::{RotationCoordinator, RotationRequest};
use std::io::Read;
use tracing::info;

/// Secret rotation handler for AWS Secrets Manager
#[derive(Parser)]
#[command(name = "secret-rotator", version)]
#[command(about = "Rotate the field encryption key of an application secret", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// AWS region (defaults to the region from the environment / profile)
    #[arg(short, long, global = true)]
    region: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single rotation step
    Rotate {
        /// Secret name or ARN
        #[arg(long)]
        secret_id: String,

        /// Client request token (version id of the candidate)
        #[arg(long)]
        token: String,

        /// Step name: createSecret, setSecret, testSecret, or finishSecret
        #[arg(long)]
        step: String,
    },
    /// Run the step described by an orchestrator event document
    Event {
        /// Path to the event JSON, or '-' for stdin
        #[arg(default_value = "-")]
        path: String,
    },
    /// Print the version -> stages map of a secret
    Describe {
        /// Secret name or ARN
        #[arg(long)]
        secret_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RotatorConfig::from_env();
    observability::init_logging(&config)?;
    metrics::register_metrics()?;

    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    let provider = AwsSecretsManager::new(cli.region.as_deref()).await;

    match cli.command {
        Commands::Rotate {
            secret_id,
            token,
            step,
        } => run_step(provider, RotationRequest::new(secret_id, token, step)).await,
        Commands::Event { path } => {
            let request = read_event(&path)?;
            run_step(provider, request).await
        }
        Commands::Describe { secret_id } => {
            let versions = provider
                .describe_version_stages(&secret_id)
                .await
                .with_context(|| format!("Failed to describe secret {secret_id}"))?;
            println!("{}", serde_json::to_string_pretty(&versions)?);
            Ok(())
        }
    }
}

async fn run_step<P: SecretStoreProvider>(provider: P, request: RotationRequest) -> Result<()> {
    let coordinator = RotationCoordinator::new(provider);
    match coordinator.rotate(&request).await {
        Ok(outcome) => {
            info!(
                step = %request.step,
                outcome = outcome.as_str(),
                "Rotation step succeeded"
            );
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!(
            "Rotation step '{}' failed for {}",
            request.step, request.secret_id
        ))),
    }
}

fn read_event(path: &str) -> Result<RotationRequest> {
    let raw = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read event file {path}"))?
    };

    serde_json::from_str(&raw).context("Event is not a valid rotation request")
}
