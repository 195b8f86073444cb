//! Rectilinear grid with a one-cell ghost layer on every side.
//!
//! Physical cells run over `1..=imax`, `1..=jmax`, `1..=kmax`; indices `0`
//! and `max + 1` are the ghost layer. A cell is addressed by the flattened
//! index `i + j*(imax+2) + k*(imax+2)*(jmax+2)`.

pub mod coordinates;
pub mod fields;

use crate::error::{Result, SciError};
use serde::{Deserialize, Serialize};

/// Grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index letter used in diagnostics (`i`, `j`, `k`).
    pub fn index_name(self) -> char {
        match self {
            Axis::X => 'i',
            Axis::Y => 'j',
            Axis::Z => 'k',
        }
    }
}

/// Raw header values, exactly as read.
///
/// Counts are not validated here: a negative count only surfaces once
/// something tries to size arrays from it (see [`Grid::from_header`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub imax: i32,
    pub jmax: i32,
    pub kmax: i32,
}

/// Cell counts and domain extents of a grid whose arrays can be sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub imax: usize,
    pub jmax: usize,
    pub kmax: usize,
}

impl Grid {
    pub fn new(imax: usize, jmax: usize, kmax: usize, extents: [f64; 3]) -> Self {
        Self {
            lx: extents[0],
            ly: extents[1],
            lz: extents[2],
            imax,
            jmax,
            kmax,
        }
    }

    /// Turns raw header values into a sizeable grid.
    ///
    /// Fails with [`SciError::AllocationFailure`] when a count is negative or
    /// the padded cell count overflows. That includes `-1`, even though its
    /// padded size of one cell could be allocated: a grid whose low and high
    /// ghost layers coincide has no well-defined boundary regions.
    pub fn from_header(header: &GridHeader) -> Result<Self> {
        let count = |raw: i32, what: &'static str| {
            usize::try_from(raw).map_err(|_| SciError::AllocationFailure {
                what,
                len: i64::from(raw) + 2,
            })
        };
        let grid = Self {
            lx: header.lx,
            ly: header.ly,
            lz: header.lz,
            imax: count(header.imax, "x cells")?,
            jmax: count(header.jmax, "y cells")?,
            kmax: count(header.kmax, "z cells")?,
        };
        grid.checked_len().ok_or(SciError::AllocationFailure {
            what: "grid cells",
            len: i64::MAX,
        })?;
        Ok(grid)
    }

    fn checked_len(&self) -> Option<usize> {
        (self.imax.checked_add(2)?)
            .checked_mul(self.jmax.checked_add(2)?)?
            .checked_mul(self.kmax.checked_add(2)?)
    }

    /// Number of physical cells along `axis`.
    pub fn max(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.imax,
            Axis::Y => self.jmax,
            Axis::Z => self.kmax,
        }
    }

    /// Domain length along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.lx,
            Axis::Y => self.ly,
            Axis::Z => self.lz,
        }
    }

    /// Number of cells along `axis` including both ghost cells.
    pub fn padded(&self, axis: Axis) -> usize {
        self.max(axis) + 2
    }

    /// Total number of cells including the ghost layer.
    pub fn len(&self) -> usize {
        self.padded(Axis::X) * self.padded(Axis::Y) * self.padded(Axis::Z)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened index of cell `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        let ni = self.imax + 2;
        let nj = self.jmax + 2;
        i + j * ni + k * ni * nj
    }

    /// Every cell of the padded domain, `i` outermost and `k` innermost.
    pub fn all_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        scan(0, self.imax + 1, 0, self.jmax + 1, 0, self.kmax + 1)
    }

    /// Every physical (non-ghost) cell, `i` outermost and `k` innermost.
    pub fn physical_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        scan(1, self.imax, 1, self.jmax, 1, self.kmax)
    }
}

fn scan(
    i0: usize,
    i1: usize,
    j0: usize,
    j1: usize,
    k0: usize,
    k1: usize,
) -> impl Iterator<Item = (usize, usize, usize)> {
    (i0..=i1).flat_map(move |i| (j0..=j1).flat_map(move |j| (k0..=k1).map(move |k| (i, j, k))))
}
