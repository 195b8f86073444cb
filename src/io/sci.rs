//! Primary SCI parameter file.
//!
//! Layout, in order:
//!
//! ```text
//! Lx Ly Lz
//! imax jmax kmax
//! <imax x-widths> <jmax y-widths> <kmax z-widths>
//! west east south north bottom top      wall properties
//! nb_bc
//! <inlet> <outlet> <block> <wall> <source> sections
//! <settings trailer>
//! ```

use super::cursor::{FieldError, LineCursor, LineFields};
use super::header::read_header;
use super::settings::{SolverSettings, read_settings};
use crate::boundary::{BcRegistry, BoundaryIndexTable, BoundaryWriter, read_sections};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, SciError};
use crate::grid::Grid;
use crate::grid::coordinates::{GridWidths, build_coordinates};
use crate::grid::fields::FieldArrays;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Values read from the primary file that are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SciSummary {
    /// West, east, south, north, bottom and top wall kinds.
    pub wall_properties: [i32; 6],
    /// Boundary-condition total declared by the file.
    pub declared_bc_count: i32,
    pub settings: Option<SolverSettings>,
}

/// Reads the primary file into arrays sized for `grid`.
///
/// The header is read again and must describe the same grid the arrays
/// were allocated for.
///
/// # Arguments
/// * `cursor` - Cursor positioned at the start of the file
/// * `grid` - Grid the arrays were sized for
/// * `fields` - Coordinate, flag and boundary-value arrays to fill
/// * `table` - Boundary index table to append to
/// * `registry` - Registry that receives one entry per record
/// * `with_settings` - Whether to parse the settings trailer
/// * `sink` - Receives the diagnostics of every stage
///
/// # Returns
/// The pass-through values that are not stored in the arrays
pub fn read_sci_input<R: BufRead>(
    cursor: &mut LineCursor<R>,
    grid: &Grid,
    fields: &mut FieldArrays,
    table: &mut BoundaryIndexTable,
    registry: &mut BcRegistry,
    with_settings: bool,
    sink: &mut dyn DiagnosticSink,
) -> Result<SciSummary> {
    let header = read_header(cursor)?;
    let matches = header.imax as i64 == grid.imax as i64
        && header.jmax as i64 == grid.jmax as i64
        && header.kmax as i64 == grid.kmax as i64;
    if !matches {
        return Err(SciError::MalformedHeader {
            line: cursor.line(),
            message: format!(
                "cell counts {} {} {} differ from the allocated grid {} {} {}",
                header.imax, header.jmax, header.kmax, grid.imax, grid.jmax, grid.kmax
            ),
        });
    }

    let widths = GridWidths::read(cursor, grid)?;
    build_coordinates(grid, &widths, &mut fields.coordinates);
    drop(widths);

    let wall_properties = read_wall_properties(cursor)?;
    sink.emit(
        Diagnostic::normal("wall properties")
            .with("west", wall_properties[0])
            .with("east", wall_properties[1])
            .with("south", wall_properties[2])
            .with("north", wall_properties[3])
            .with("bottom", wall_properties[4])
            .with("top", wall_properties[5]),
    );

    let declared_bc_count = read_bc_total(cursor)?;
    sink.emit(Diagnostic::normal("boundary condition total").with("nb_bc", declared_bc_count));

    let mut writer = BoundaryWriter::new(grid, fields, table, registry);
    read_sections(cursor, &mut writer, sink)?;

    let registered = writer.registry().len();
    if registered as i64 != i64::from(declared_bc_count) {
        log::warn!("file declares {declared_bc_count} boundary conditions but {registered} were read");
        sink.emit(
            Diagnostic::normal("boundary condition count mismatch")
                .with("declared", declared_bc_count)
                .with("registered", registered),
        );
    }

    let settings = if with_settings {
        read_settings(cursor, sink)?
    } else {
        None
    };

    Ok(SciSummary {
        wall_properties,
        declared_bc_count,
        settings,
    })
}

fn read_wall_properties<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<[i32; 6]> {
    let line = cursor
        .next_nonblank_line()?
        .ok_or_else(|| SciError::MalformedHeader {
            line: cursor.line() + 1,
            message: "file ended before the wall property line".into(),
        })?;
    let parse = |line: &str| -> std::result::Result<[i32; 6], FieldError> {
        let mut f = LineFields::new(line);
        Ok([
            f.int("west wall")?,
            f.int("east wall")?,
            f.int("south wall")?,
            f.int("north wall")?,
            f.int("bottom wall")?,
            f.int("top wall")?,
        ])
    };
    parse(&line).map_err(|e| SciError::MalformedHeader {
        line: cursor.line(),
        message: e.to_string(),
    })
}

fn read_bc_total<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<i32> {
    let line = cursor.next_line()?.ok_or_else(|| SciError::MalformedHeader {
        line: cursor.line() + 1,
        message: "file ended before the boundary condition total".into(),
    })?;
    LineFields::new(&line)
        .int("nb_bc")
        .map_err(|e| SciError::MalformedHeader {
            line: cursor.line(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::grid::fields::CellFlag;
    use std::io::Cursor;

    const MESH_ONLY: &str = "\
10 1 1
2 1 1
5 5
1
1

0 0 0 0 0 0
2
1
in 1 1 1 0 1 1 20 0 1 0 0
0
1
box 2 1 1 1 1 1 1 30
0
0
";

    struct Run {
        grid: Grid,
        fields: FieldArrays,
        table: BoundaryIndexTable,
        registry: BcRegistry,
        sink: MemorySink,
    }

    fn run(text: &str, grid: Grid, with_settings: bool) -> (Run, Result<SciSummary>) {
        let mut r = Run {
            fields: FieldArrays::allocate(&grid).unwrap(),
            grid,
            table: BoundaryIndexTable::new(),
            registry: BcRegistry::new(),
            sink: MemorySink::new(),
        };
        let result = read_sci_input(
            &mut LineCursor::new(Cursor::new(text)),
            &r.grid,
            &mut r.fields,
            &mut r.table,
            &mut r.registry,
            with_settings,
            &mut r.sink,
        );
        (r, result)
    }

    fn grid_2x1x1() -> Grid {
        Grid::new(2, 1, 1, [10.0, 1.0, 1.0])
    }

    #[test]
    fn test_reads_mesh_only_file() {
        let (r, result) = run(MESH_ONLY, grid_2x1x1(), true);
        let summary = result.unwrap();
        assert_eq!(summary.wall_properties, [0; 6]);
        assert_eq!(summary.declared_bc_count, 2);
        assert_eq!(summary.settings, None);

        let gx = &r.fields.coordinates.face_x;
        assert_eq!(gx[r.grid.index(1, 0, 0)], 5.0);
        assert_eq!(gx[r.grid.index(3, 0, 0)], 10.0);

        assert_eq!(r.fields.flags.flag_p[r.grid.index(0, 1, 1)], CellFlag::Fluid);
        assert_eq!(r.fields.flags.flag_p[r.grid.index(2, 1, 1)], CellFlag::Solid);
        assert_eq!(r.registry.len(), 2);
        assert_eq!(r.sink.find("boundary condition count mismatch").count(), 0);
    }

    #[test]
    fn test_bc_total_mismatch_only_warns() {
        let text = MESH_ONLY.replace("0 0 0 0 0 0\n2\n", "0 0 0 0 0 0\n5\n");
        let (r, result) = run(&text, grid_2x1x1(), false);
        assert!(result.is_ok());
        let d = r.sink.find("boundary condition count mismatch").next().unwrap();
        assert_eq!(d.field("declared"), Some("5"));
        assert_eq!(d.field("registered"), Some("2"));
    }

    #[test]
    fn test_header_must_match_allocation() {
        let (_, result) = run(MESH_ONLY, Grid::new(3, 1, 1, [10.0, 1.0, 1.0]), false);
        assert!(matches!(result, Err(SciError::MalformedHeader { line: 2, .. })));
    }

    #[test]
    fn test_short_wall_property_line() {
        let text = MESH_ONLY.replace("0 0 0 0 0 0", "0 0 0");
        let (_, result) = run(&text, grid_2x1x1(), false);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("north wall"), "{err}");
    }

    #[test]
    fn test_settings_can_be_skipped() {
        let text = format!("{MESH_ONLY}garbage that is never read\n");
        let (_, result) = run(&text, grid_2x1x1(), false);
        assert_eq!(result.unwrap().settings, None);

        let (_, result) = run(&text, grid_2x1x1(), true);
        assert!(matches!(result, Err(SciError::MalformedSettings { .. })));
    }
}
