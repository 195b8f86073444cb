//! JSON export of an ingested mesh.
//!
//! The JSON mirrors [`SciMesh`] field by field: grid, dense field arrays,
//! boundary index table, registry and the pass-through values.

use crate::ingest::SciMesh;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes `mesh` to `path` as pretty-printed JSON.
///
/// # Arguments
/// * `path` - Path to the output file
/// * `mesh` - The ingested mesh to serialize
///
/// # Example
/// ```no_run
/// use sci_mesh::io::write_mesh_json;
/// use sci_mesh::{IngestConfig, LogSink, ingest};
/// use std::path::Path;
///
/// let mesh = ingest(&IngestConfig::new("room.cfd"), &mut LogSink).unwrap();
/// write_mesh_json(Path::new("room.json"), &mesh).unwrap();
/// ```
pub fn write_mesh_json(path: &Path, mesh: &SciMesh) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, mesh)
        .with_context(|| format!("Failed to serialize mesh to: {}", path.display()))?;

    Ok(())
}

/// Reads a mesh previously written by [`write_mesh_json`].
///
/// # Arguments
/// * `path` - Path to the input file
///
/// # Returns
/// The deserialized mesh
pub fn read_mesh_json(path: &Path) -> Result<SciMesh> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mesh: SciMesh = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize mesh from: {}", path.display()))?;

    Ok(mesh)
}

/// Serializes `mesh` to a JSON string.
pub fn to_mesh_json_string(mesh: &SciMesh) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(mesh)?)
}
