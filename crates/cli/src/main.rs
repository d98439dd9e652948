//! Cardio CLI
//!
//! Asks for ten clinical measurements, runs every configured heart disease
//! model on them and prints each model's prediction.

mod commands;
mod config;
mod output;

use anyhow::Result;
use cardio_lib::{FeatureSchema, StructuredLogger};
use clap::{Parser, Subcommand};
use crate::config::{AppConfig, LogFormat};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Heart disease prediction
#[derive(Parser)]
#[command(name = "cardio")]
#[command(author, version, about = "Heart disease prediction from clinical measurements", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./cardio.toml when present)
    #[arg(long, short, global = true, env = "CARDIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing the model files
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Refuse to predict with fewer loaded models than this
    #[arg(long, global = true)]
    pub min_models: Option<usize>,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect answers and predict with every model (default)
    Predict {
        /// Read answers from a JSON file instead of prompting
        #[arg(long, short)]
        answers: Option<PathBuf>,

        /// Print Prometheus metrics after the results
        #[arg(long)]
        dump_metrics: bool,
    },

    /// Show the feature schema
    Schema,

    /// Load the configured models and show their status
    Models,
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.models_dir {
        config.models_dir = dir;
    }
    if let Some(min_models) = cli.min_models {
        config.min_models = min_models;
    }

    init_tracing(cli.verbose, config.log_format);

    let schema = FeatureSchema::heart_disease();
    let logger = StructuredLogger::new(schema.version());
    logger.log_startup(APP_VERSION, &config.models_dir.display().to_string());

    let command = cli.command.unwrap_or(Commands::Predict {
        answers: None,
        dump_metrics: false,
    });

    match command {
        Commands::Predict {
            answers,
            dump_metrics,
        } => commands::predict::run(
            &config,
            &schema,
            &logger,
            commands::predict::PredictOptions {
                answers: answers.as_deref(),
                dump_metrics,
                format: cli.format,
            },
        )?,
        Commands::Schema => commands::schema::show(&schema, cli.format),
        Commands::Models => commands::models::show(&config, &schema, &logger, cli.format),
    }

    Ok(())
}
