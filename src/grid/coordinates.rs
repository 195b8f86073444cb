//! Face and center coordinates from non-uniform cell widths.
//!
//! Faces are cumulative sums of the widths, starting at `0` for the low ghost
//! cell. Every face index `>= max` is forced to the domain extent, which
//! absorbs rounding in the accumulated sum. Centers average adjacent faces
//! for `1..=max` and are clamped to `0` and to the extent at the two ghost
//! indices.

use super::fields::CoordinateFields;
use super::{Axis, Grid};
use crate::error::{Result, SciError};
use crate::io::cursor::LineCursor;
use std::io::BufRead;

/// Physical cell widths along each axis (`imax`, `jmax`, `kmax` entries).
///
/// Transient: only lives while coordinates are built.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWidths {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl GridWidths {
    /// Reads the three width sequences that follow the header.
    ///
    /// Each sequence is a token stream of exactly `max` reals, possibly
    /// spread over several lines. Whatever remains on the line holding the
    /// last width is discarded before the next sequence starts.
    pub fn read<R: BufRead>(cursor: &mut LineCursor<R>, grid: &Grid) -> Result<Self> {
        Ok(Self {
            x: read_axis(cursor, grid.max(Axis::X), Axis::X)?,
            y: read_axis(cursor, grid.max(Axis::Y), Axis::Y)?,
            z: read_axis(cursor, grid.max(Axis::Z), Axis::Z)?,
        })
    }

    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

fn read_axis<R: BufRead>(cursor: &mut LineCursor<R>, count: usize, axis: Axis) -> Result<Vec<f64>> {
    let mut widths = Vec::new();
    widths
        .try_reserve_exact(count)
        .map_err(|_| SciError::AllocationFailure {
            what: "cell widths",
            len: count as i64,
        })?;

    for n in 0..count {
        let token = cursor.next_token()?.ok_or_else(|| SciError::MalformedGrid {
            line: cursor.line(),
            message: format!(
                "file ended after {n} of {count} widths along {}",
                axis.index_name()
            ),
        })?;
        let width = token.parse::<f64>().map_err(|_| SciError::MalformedGrid {
            line: cursor.line(),
            message: format!("width {} along {} is not a number: {token:?}", n + 1, axis.index_name()),
        })?;
        widths.push(width);
    }
    if count > 0 {
        cursor.discard_rest_of_line();
    }
    Ok(widths)
}

/// Face coordinates for one axis, indices `0..=max+1`.
pub fn axis_faces(widths: &[f64], extent: f64) -> Vec<f64> {
    let max = widths.len();
    let mut faces = Vec::with_capacity(max + 2);
    let mut position = 0.0;
    for i in 0..=max + 1 {
        if (1..=max).contains(&i) {
            position += widths[i - 1];
        }
        if i >= max {
            position = extent;
        }
        faces.push(position);
    }
    faces
}

/// Center coordinates for one axis from its faces.
pub fn axis_centers(faces: &[f64], extent: f64) -> Vec<f64> {
    let max = faces.len().saturating_sub(2);
    (0..faces.len())
        .map(|i| {
            if i < 1 {
                0.0
            } else if i > max {
                extent
            } else {
                0.5 * (faces[i] + faces[i - 1])
            }
        })
        .collect()
}

/// Writes face and center coordinates of all three axes into `coords`.
pub fn build_coordinates(grid: &Grid, widths: &GridWidths, coords: &mut CoordinateFields) {
    let [fx, fy, fz] = Axis::ALL.map(|axis| axis_faces(widths.axis(axis), grid.extent(axis)));
    let cx = axis_centers(&fx, grid.lx);
    let cy = axis_centers(&fy, grid.ly);
    let cz = axis_centers(&fz, grid.lz);

    for (i, j, k) in grid.all_cells() {
        let idx = grid.index(i, j, k);
        coords.face_x[idx] = fx[i];
        coords.face_y[idx] = fy[j];
        coords.face_z[idx] = fz[k];
        coords.center_x[idx] = cx[i];
        coords.center_y[idx] = cy[j];
        coords.center_z[idx] = cz[k];
    }
}
