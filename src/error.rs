//! Error types for SCI ingestion.
//!
//! Every failure is fatal to the ingestion call. Arrays already written stay
//! in their partially populated state, so callers must discard the whole
//! field set when they see any of these.

use crate::boundary::Section;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SciError>;

#[derive(Debug, Error)]
pub enum SciError {
    #[error("cannot open input file {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read failure at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header at line {line}: {message}")]
    MalformedHeader { line: usize, message: String },

    #[error("malformed grid widths at line {line}: {message}")]
    MalformedGrid { line: usize, message: String },

    #[error("malformed {section} record at line {line}: {message}")]
    MalformedRecord {
        section: Section,
        line: usize,
        message: String,
    },

    #[error(
        "{section} region at line {line} leaves the grid on axis {axis}: [{start}, {end}] not within [0, {max}]"
    )]
    RegionOutOfBounds {
        section: Section,
        line: usize,
        axis: char,
        start: i64,
        end: i64,
        max: i64,
    },

    #[error("malformed settings at line {line}: {message}")]
    MalformedSettings { line: usize, message: String },

    #[error("cannot allocate {len} entries for {what}")]
    AllocationFailure { what: &'static str, len: i64 },

    #[error("mask file {} is missing: {source}", path.display())]
    MissingMaskFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed mask file at token {position}: {message}")]
    MalformedMask { position: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl SciError {
    pub(crate) fn record(section: Section, line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            section,
            line,
            message: message.into(),
        }
    }
}
