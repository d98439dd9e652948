//! Collect answers, run every model and print the predictions

use anyhow::{Context, Result};
use cardio_lib::{
    encode,
    input::{self, TerminalPrompt},
    presenter::render_line,
    Answers, FeatureSchema, LoadFailure, ModelRegistry, PredictionOutcome, PredictionReport,
    PredictionRunner, ServiceMetrics, StructuredLogger,
};
use std::io::{self, Write};
use std::path::Path;

use super::load_registry;
use crate::config::AppConfig;
use crate::output::{color_label, print_heading, print_info, print_json, print_warning, OutputFormat};

/// Options for a single prediction run
pub struct PredictOptions<'a> {
    pub answers: Option<&'a Path>,
    pub dump_metrics: bool,
    pub format: OutputFormat,
}

/// Run one submission end to end
pub fn run(
    config: &AppConfig,
    schema: &FeatureSchema,
    logger: &StructuredLogger,
    options: PredictOptions<'_>,
) -> Result<()> {
    let registry = load_registry(config, schema, logger);

    if options.format == OutputFormat::Table {
        print_heading("Heart Disease Prediction");
        print_load_warnings(config, &registry);
    }

    let answers = match options.answers {
        Some(path) => read_answers(path)?,
        None => prompt_answers(schema, options.format)?,
    };

    let vector = match encode(schema, &answers) {
        Ok(vector) => vector,
        Err(e) => {
            logger.log_submission_rejected(&e.to_string());
            ServiceMetrics::new().inc_submissions_rejected();
            return Err(e).context("Submission rejected");
        }
    };

    let runner = PredictionRunner::new(logger.clone()).with_min_models(config.min_models);
    let outcome = runner.run(&registry, &vector)?;

    match options.format {
        OutputFormat::Json => {
            let report =
                PredictionReport::new(schema.version(), vector.values(), &outcome, registry.failures());
            print_json(&report);
        }
        OutputFormat::Table => print_outcome(&outcome),
    }

    if options.dump_metrics {
        print!("{}", ServiceMetrics::new().render());
    }

    Ok(())
}

fn read_answers(path: &Path) -> Result<Answers> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse answers file {}", path.display()))
}

fn prompt_answers(schema: &FeatureSchema, format: OutputFormat) -> Result<Answers> {
    // Keep stdout clean for JSON output
    let writer: Box<dyn Write> = match format {
        OutputFormat::Table => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };
    let mut prompt = TerminalPrompt::new(io::stdin().lock(), writer);
    Ok(input::collect(schema, &mut prompt)?)
}

fn print_load_warnings(config: &AppConfig, registry: &ModelRegistry) {
    for failure in registry.failures() {
        match &failure.reason {
            LoadFailure::NotFound => print_warning(&format!(
                "Model file for '{}' not found in {}",
                failure.identifier,
                config.models_dir.display()
            )),
            LoadFailure::DeserializationFailed(message) => print_warning(&format!(
                "Error loading model '{}': {}",
                failure.identifier, message
            )),
        }
    }
    if registry.is_empty() {
        print_warning("No models loaded; predictions will be empty");
    }
    println!();
}

fn print_outcome(outcome: &PredictionOutcome) {
    println!();
    print_heading("Prediction Results:");
    for (identifier, label) in outcome.result.iter() {
        println!("{}", color_label(&render_line(identifier, label), label));
    }
    for failure in &outcome.failures {
        print_warning(&format!(
            "Model '{}' could not predict: {}",
            failure.identifier, failure.message
        ));
    }
    if !outcome.result.is_empty() {
        println!();
        print_info(&format!(
            "{} of {} models predict presence",
            outcome.result.presence_count(),
            outcome.result.len()
        ));
    }
}
