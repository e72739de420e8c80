//! Side-channel diagnostics.
//!
//! Recoverable problems (unknown flags, unresolved sub-projects, failed
//! dependency discovery) never abort generation. They are recorded here and,
//! unless the sink is silent, echoed to stderr with the usual markers.

use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    silent: bool,
}

impl Diagnostics {
    /// Sink that echoes every entry to stderr.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that only records. Used by tests and library callers.
    pub fn silent() -> Self {
        Self {
            entries: Vec::new(),
            silent: true,
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.push(Severity::Note, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        if !self.silent {
            match severity {
                Severity::Note => eprintln!("   {} {}", "ℹ".blue(), message),
                Severity::Warning => eprintln!("   {} {}", "⚠".yellow(), message),
                Severity::Error => eprintln!("{} {}", "x".red(), message),
            }
        }
        self.entries.push(Diagnostic { severity, message });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any recorded message mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|d| d.message.contains(needle))
    }
}
