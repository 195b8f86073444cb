//! Header reader: domain extents and cell counts.

use super::cursor::{LineCursor, LineFields};
use crate::error::{Result, SciError};
use crate::grid::GridHeader;
use std::io::BufRead;
use std::path::Path;

/// Reads the two header lines (`Lx Ly Lz`, then `imax jmax kmax`).
///
/// Counts are returned as read; nothing checks that they are positive.
pub fn read_header<R: BufRead>(cursor: &mut LineCursor<R>) -> Result<GridHeader> {
    let extents = header_line(cursor, "domain extents")?;
    let mut f = LineFields::new(&extents);
    let malformed = |message: String| SciError::MalformedHeader {
        line: cursor.line(),
        message,
    };
    let lx = f.real("Lx").map_err(|e| malformed(e.to_string()))?;
    let ly = f.real("Ly").map_err(|e| malformed(e.to_string()))?;
    let lz = f.real("Lz").map_err(|e| malformed(e.to_string()))?;

    let counts = header_line(cursor, "cell counts")?;
    let mut f = LineFields::new(&counts);
    let malformed = |message: String| SciError::MalformedHeader {
        line: cursor.line(),
        message,
    };
    let imax = f.int("imax").map_err(|e| malformed(e.to_string()))?;
    let jmax = f.int("jmax").map_err(|e| malformed(e.to_string()))?;
    let kmax = f.int("kmax").map_err(|e| malformed(e.to_string()))?;

    Ok(GridHeader {
        lx,
        ly,
        lz,
        imax,
        jmax,
        kmax,
    })
}

/// Opens `path` and reads only its header.
///
/// Callers use this to size their field arrays before the full read.
pub fn read_header_file(path: &Path) -> Result<GridHeader> {
    let mut cursor = LineCursor::open(path)?;
    read_header(&mut cursor)
}

fn header_line<R: BufRead>(cursor: &mut LineCursor<R>, what: &str) -> Result<String> {
    cursor.next_line()?.ok_or_else(|| SciError::MalformedHeader {
        line: cursor.line() + 1,
        message: format!("file ended before the {what} line"),
    })
}
