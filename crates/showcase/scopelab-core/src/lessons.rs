//! Lesson utilities behind the "functions and scope" demo buttons.

use serde::{Deserialize, Serialize};

use crate::error::ScopelabError;
use crate::Result;

pub const DEFAULT_GREETING: &str = "Hello";
pub const EMPTY_INPUT_ERROR: &str = "Input cannot be empty";

fn check_dimension(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScopelabError::invalid_input(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}

/// Area of a `width` x `height` rectangle.
pub fn rectangle_area(width: f64, height: f64) -> Result<f64> {
    Ok(check_dimension("width", width)? * check_dimension("height", height)?)
}

pub fn circle_area(radius: f64) -> Result<f64> {
    let r = check_dimension("radius", radius)?;
    Ok(std::f64::consts::PI * r * r)
}

/// `"<greeting>, <name>!"`; a blank name greets a stranger.
pub fn greet(name: &str, greeting: Option<&str>) -> String {
    let greeting = greeting
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GREETING);
    let name = name.trim();
    let name = if name.is_empty() { "stranger" } else { name };
    format!("{greeting}, {name}!")
}

/// Counter with a private count, constructed per use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(count: i64) -> Self {
        Self { count }
    }

    pub fn increment(&mut self) -> i64 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn decrement(&mut self) -> i64 {
        self.count = self.count.saturating_sub(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedInput {
    pub original: String,
    /// Length in characters.
    pub length: usize,
    pub words: usize,
    pub uppercase: String,
    pub lowercase: String,
    pub reversed: String,
}

/// Structured outcome of input validation; failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<ProcessedInput>,
}

impl ProcessResult {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

pub fn validate_and_process_input(input: &str, max_length: usize) -> ProcessResult {
    if input.trim().is_empty() {
        return ProcessResult::failure(EMPTY_INPUT_ERROR);
    }
    let length = input.chars().count();
    if length > max_length {
        return ProcessResult::failure(format!(
            "Input exceeds maximum length of {max_length} characters"
        ));
    }
    ProcessResult {
        success: true,
        error: None,
        data: Some(ProcessedInput {
            original: input.to_string(),
            length,
            words: input.split_whitespace().count(),
            uppercase: input.to_uppercase(),
            lowercase: input.to_lowercase(),
            reversed: input.chars().rev().collect(),
        }),
    }
}
