//! Anonymizer CLI
//!
//! Reads a document from a file or stdin, runs it through the pattern
//! detector and prints JSON on stdout. Logs go to stderr.

mod config;

use anonymizer::detectors::{BlockingDetector, PatternDetector, PatternKind};
use anonymizer::{AnonymizationRequest, AnonymizationResult, Anonymizer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "anonymize")]
#[command(about = "Replace sensitive entities in text with reversible placeholders")]
struct Cli {
    /// Token budget per detector call (overrides ANONYMIZER_MAX_TOKENS)
    #[arg(long, global = true)]
    max_tokens: Option<usize>,

    /// Concurrent detector calls (overrides ANONYMIZER_DETECTION_CONCURRENCY)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Anonymize a document and print the result with its map
    Run {
        /// Labels to detect, comma separated
        #[arg(long, value_delimiter = ',', default_value = "email,phone,ssn,credit_card,ip_address")]
        labels: Vec<String>,

        /// Minimum detection score
        #[arg(long, default_value_t = 0.5)]
        threshold: f32,

        /// Words to leave in place, comma separated
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Print the fragments a document would be sent to the detector in
    Chunk {
        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Restore the original text from a previously printed result
    Restore {
        /// Result JSON file (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// List the labels the pattern detector understands
    Labels,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,anonymizer=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?.anonymizer;
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(concurrency) = cli.concurrency {
        config.detection_concurrency = concurrency;
    }

    let detector = BlockingDetector::new(PatternDetector::new());
    let anonymizer = Anonymizer::new(detector, config).context("Invalid anonymizer configuration")?;

    match cli.command {
        Commands::Run {
            labels,
            threshold,
            exclude,
            input,
        } => {
            let text = read_input(input).await?;
            let request = AnonymizationRequest::new(text, labels, threshold).with_exclude(exclude);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling");
                    on_signal.cancel();
                }
            });

            let result = anonymizer.anonymize_with_cancel(&request, cancel).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Chunk { input } => {
            let text = read_input(input).await?;
            let fragments = anonymizer.chunker().chunk_blocking(&text).await?;
            println!("{}", serde_json::to_string_pretty(&fragments)?);
        }
        Commands::Restore { input } => {
            let raw = read_input(input).await?;
            let result: AnonymizationResult =
                serde_json::from_str(&raw).context("Input is not an anonymization result")?;
            print!("{}", result.restore());
        }
        Commands::Labels => {
            for kind in PatternKind::ALL {
                println!("{}", kind.name());
            }
        }
    }

    Ok(())
}

async fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
