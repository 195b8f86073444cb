//! End-to-end ingestion: primary file, mask, classification.

use crate::boundary::{BcRegistry, BoundaryIndexTable};
use crate::classify::mark_cells;
use crate::config::IngestConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::Result;
use crate::grid::Grid;
use crate::grid::fields::FieldArrays;
use crate::io::cursor::LineCursor;
use crate::io::header::read_header_file;
use crate::io::mask::read_mask;
use crate::io::sci::read_sci_input;
use crate::io::settings::SolverSettings;
use serde::{Deserialize, Serialize};

/// Everything produced by one ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SciMesh {
    pub grid: Grid,
    pub fields: FieldArrays,
    pub table: BoundaryIndexTable,
    pub registry: BcRegistry,
    pub wall_properties: [i32; 6],
    pub declared_bc_count: i32,
    pub settings: Option<SolverSettings>,
}

/// Runs the whole pipeline described by `config`.
///
/// Reads the header, sizes the arrays, reads the primary file and the mask,
/// then classifies the cells. On failure one error diagnostic is emitted
/// before the error is returned. Nothing produced up to that point is
/// handed back.
///
/// # Arguments
/// * `config` - Input paths and options
/// * `sink` - Receives the diagnostics of every stage
///
/// # Returns
/// The grid, field arrays, boundary index table and registry
///
/// # Example
/// ```no_run
/// use sci_mesh::{IngestConfig, MemorySink, ingest};
///
/// let mut sink = MemorySink::new();
/// let mesh = ingest(&IngestConfig::new("room.cfd"), &mut sink).unwrap();
/// println!("{} boundary cells", mesh.table.len());
/// ```
pub fn ingest(config: &IngestConfig, sink: &mut dyn DiagnosticSink) -> Result<SciMesh> {
    match run(config, sink) {
        Ok(mesh) => Ok(mesh),
        Err(e) => {
            sink.emit(Diagnostic::error("ingestion failed").with("error", &e));
            Err(e)
        }
    }
}

fn run(config: &IngestConfig, sink: &mut dyn DiagnosticSink) -> Result<SciMesh> {
    config.validate()?;
    let path = config.parameter_file.as_path();
    sink.emit(Diagnostic::normal("reading input file").with("path", path.display()));

    let header = read_header_file(path)?;
    let grid = Grid::from_header(&header)?;
    let mut fields = FieldArrays::allocate(&grid)?;
    let mut table = BoundaryIndexTable::new();
    let mut registry = BcRegistry::new();

    let mut cursor = LineCursor::open(path)?;
    let summary = read_sci_input(
        &mut cursor,
        &grid,
        &mut fields,
        &mut table,
        &mut registry,
        config.read_settings,
        sink,
    )?;
    drop(cursor);
    sink.emit(Diagnostic::normal("input file read").with("path", path.display()));

    read_mask(&config.mask_path(), &grid, &mut fields.flags, &mut table, sink)?;
    mark_cells(&grid, &mut fields.flags);
    log::debug!(
        "ingested {} cells, {} boundary rows, {} conditions",
        grid.len(),
        table.len(),
        registry.len()
    );

    Ok(SciMesh {
        grid,
        fields,
        table,
        registry,
        wall_properties: summary.wall_properties,
        declared_bc_count: summary.declared_bc_count,
        settings: summary.settings,
    })
}
