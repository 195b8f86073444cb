pub mod boundary;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod ingest;
pub mod io;

// Prelude
pub use boundary::{BcRegistry, BoundaryCell, BoundaryIndexTable, Section, ThermalCondition};
pub use config::IngestConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, MemorySink, Severity};
pub use error::{Result, SciError};
pub use grid::fields::{CellFlag, FieldArrays};
pub use grid::{Axis, Grid, GridHeader};
pub use ingest::{SciMesh, ingest};
