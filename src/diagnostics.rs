//! Structured progress and parameter-echo diagnostics.
//!
//! The reader never formats messages into shared buffers. Each event is a
//! [`Diagnostic`] with a severity, a fixed message and ordered key/value
//! fields, handed to whatever [`DiagnosticSink`] the caller injects.

use std::fmt;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Error,
}

/// One diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Diagnostic {
    pub fn normal(message: &'static str) -> Self {
        Self {
            severity: Severity::Normal,
            message,
            fields: Vec::new(),
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            severity: Severity::Error,
            message,
            fields: Vec::new(),
        }
    }

    /// Appends a key/value field.
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// Returns the value of the first field named `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Normal => log::info!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub events: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events with the given message, in emission order.
    pub fn find<'a>(&'a self, message: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.events.iter().filter(move |d| d.message == message)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.events.push(diagnostic);
    }
}
