//! Log line formatting: `<icon> [HH:MM:SS] <message>`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl Severity {
    /// Parse a severity tag. Unknown tags fall back to `Info`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    #[inline]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "ℹ️",
            Self::Success => "✅",
            Self::Error => "❌",
            Self::Warning => "⚠️",
        }
    }
}

impl From<&str> for Severity {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// Pure form: render `message` at the given local time-of-day.
pub fn format_at(message: &str, severity: Severity, at: NaiveTime) -> String {
    format!(
        "{} [{}] {}",
        severity.icon(),
        at.format("%H:%M:%S"),
        message
    )
}

/// Render `message` stamped with the clock's current local time.
pub fn format_message(message: &str, severity: Severity, clock: &dyn Clock) -> String {
    format_at(message, severity, clock.now().time())
}
