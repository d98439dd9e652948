//! Input collection from the user interface
//!
//! The schema decides which widget is requested for each feature: a numeric
//! entry defaulting to 0, or a single choice from the option list defaulting
//! to the first option.

use crate::error::InputError;
use crate::models::{Answers, FeatureValue};
use crate::schema::{FeatureKind, FeatureSchema, FeatureSpec};
use std::io::{BufRead, Write};

/// Default for numeric widgets
pub const DEFAULT_NUMBER: f64 = 0.0;

/// Source of raw answers, one call per feature
pub trait InputSource {
    /// Ask for a number
    fn number(&mut self, spec: &FeatureSpec) -> Result<f64, InputError>;

    /// Ask for one of `options`
    fn choose(&mut self, spec: &FeatureSpec, options: &[String]) -> Result<String, InputError>;
}

/// Gather one answer per feature in schema order
pub fn collect<S: InputSource + ?Sized>(
    schema: &FeatureSchema,
    source: &mut S,
) -> Result<Answers, InputError> {
    let mut answers = Answers::new();
    for spec in schema {
        let value = match &spec.kind {
            FeatureKind::Number => FeatureValue::Number(source.number(spec)?),
            FeatureKind::Category(options) => FeatureValue::Choice(source.choose(spec, options)?),
        };
        answers.insert(spec.name.clone(), value);
    }
    Ok(answers)
}

/// Line-based prompts over any reader/writer pair
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn read_line(&mut self, feature: &str) -> Result<String, InputError> {
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Closed(feature.to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> InputSource for TerminalPrompt<R, W> {
    fn number(&mut self, spec: &FeatureSpec) -> Result<f64, InputError> {
        loop {
            write!(self.writer, "{} [{}]: ", spec.prompt, DEFAULT_NUMBER)?;
            let line = self.read_line(&spec.name)?;
            if line.is_empty() {
                return Ok(DEFAULT_NUMBER);
            }
            match line.parse::<f64>() {
                Ok(n) if n.is_finite() => return Ok(n),
                _ => writeln!(self.writer, "  '{}' is not a number, try again", line)?,
            }
        }
    }

    fn choose(&mut self, spec: &FeatureSpec, options: &[String]) -> Result<String, InputError> {
        loop {
            writeln!(self.writer, "{}", spec.prompt)?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.writer, "  {}) {}", i + 1, option)?;
            }
            write!(self.writer, "Choice [1]: ")?;
            let line = self.read_line(&spec.name)?;

            if line.is_empty() {
                if let Some(first) = options.first() {
                    return Ok(first.clone());
                }
            } else if let Some(option) = options.iter().find(|o| **o == line) {
                return Ok(option.clone());
            } else if let Some(option) = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i))
            {
                return Ok(option.clone());
            }
            writeln!(self.writer, "  '{}' is not one of the options, try again", line)?;
        }
    }
}
