//! Output formatting utilities

use cardio_lib::{Label, RegistryStatus};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text and tables (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize output: {}", e)),
    }
}

/// Print a section heading
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a line by the label it reports
pub fn color_label(line: &str, label: Label) -> String {
    match label {
        Label::Presence => line.red().bold().to_string(),
        Label::Absence => line.green().to_string(),
    }
}

/// Color registry status
pub fn color_status(status: RegistryStatus) -> String {
    match status {
        RegistryStatus::Healthy => "healthy".green().to_string(),
        RegistryStatus::Degraded => "degraded".yellow().to_string(),
        RegistryStatus::Unhealthy => "unhealthy".red().to_string(),
    }
}

/// Plain name of a registry status, for logs
pub fn status_name(status: RegistryStatus) -> &'static str {
    match status {
        RegistryStatus::Healthy => "healthy",
        RegistryStatus::Degraded => "degraded",
        RegistryStatus::Unhealthy => "unhealthy",
    }
}
