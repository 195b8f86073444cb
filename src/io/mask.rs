//! Secondary solid mask (`zeroone.dat`).
//!
//! One integer per physical cell, `k` outermost and `i` innermost. The file
//! is conventionally wrapped at 25 values per line, but line breaks carry no
//! meaning here: the content is read as a plain token stream.

use super::cursor::LineCursor;
use crate::boundary::{BoundaryCell, BoundaryIndexTable};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, SciError};
use crate::grid::Grid;
use crate::grid::fields::{CellFlag, FlagFields};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads the mask at `path` and marks every cell tagged `1` as solid.
///
/// Values are read in `k`, `j`, `i` order over the physical cells. Every
/// solid cell also gets a table row with no thermal kind and no id.
///
/// # Arguments
/// * `path` - Path to the mask file
/// * `grid` - Grid the flag arrays were sized for
/// * `flags` - Flag arrays to mark
/// * `table` - Boundary index table to append to
/// * `sink` - Receives start, finish and open-failure diagnostics
///
/// # Returns
/// The number of cells marked
pub fn read_mask(
    path: &Path,
    grid: &Grid,
    flags: &mut FlagFields,
    table: &mut BoundaryIndexTable,
    sink: &mut dyn DiagnosticSink,
) -> Result<usize> {
    let file = File::open(path).map_err(|source| {
        sink.emit(Diagnostic::error("cannot open mask file").with("path", path.display()));
        SciError::MissingMaskFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    sink.emit(Diagnostic::normal("mask read started").with("path", path.display()));
    let marked = read_mask_from(BufReader::new(file), grid, flags, table)?;
    sink.emit(Diagnostic::normal("mask read finished").with("solid_cells", marked));
    Ok(marked)
}

/// Same as [`read_mask`] but over any buffered reader.
pub fn read_mask_from<R: BufRead>(
    reader: R,
    grid: &Grid,
    flags: &mut FlagFields,
    table: &mut BoundaryIndexTable,
) -> Result<usize> {
    let mut cursor = LineCursor::new(reader);
    let mut position = 0;
    let mut marked = 0;

    for k in 1..=grid.kmax {
        for j in 1..=grid.jmax {
            for i in 1..=grid.imax {
                position += 1;
                let token = cursor.next_token()?.ok_or_else(|| SciError::MalformedMask {
                    position,
                    message: format!(
                        "file ended before cell ({i}, {j}, {k}); expected {} values",
                        grid.imax * grid.jmax * grid.kmax
                    ),
                })?;
                let mark: i32 = token.parse().map_err(|_| SciError::MalformedMask {
                    position,
                    message: format!("not an integer: {token:?}"),
                })?;
                if mark == 1 {
                    flags.flag_p[grid.index(i, j, k)] = CellFlag::Solid;
                    table.push(BoundaryCell {
                        i,
                        j,
                        k,
                        thermal: None,
                        bc_id: None,
                    });
                    marked += 1;
                }
            }
        }
    }
    log::debug!("mask marked {marked} solid cells out of {position}");
    Ok(marked)
}
