//! Severity classification of raw compiler and linker output.
//!
//! Drivers hand back free-form info logs with no structure we can rely on,
//! so the severity is a best-effort keyword match over the whole blob. A
//! multi-line log is kept as one entry and never split per line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub text: String,
}

impl DiagnosticEntry {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    /// Builds an entry whose severity comes from [`classify`].
    pub fn classified(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            severity: classify(&text),
            text,
        }
    }
}

/// "error" anywhere wins, then "warn", otherwise the text is informational.
/// Both keywords match case-insensitively.
pub fn classify(text: &str) -> Severity {
    let lowered = text.to_lowercase();
    if lowered.contains("error") {
        Severity::Error
    } else if lowered.contains("warn") {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Strips the trailing NULs and whitespace some drivers append to info logs.
/// An all-blank log counts as no diagnostic at all.
pub fn normalize_log(raw: &str) -> Option<&str> {
    let trimmed = raw.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.trim_start().is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
