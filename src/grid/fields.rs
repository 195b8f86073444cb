//! Caller-owned field arrays over the padded grid.
//!
//! The reader writes into these arrays but never decides when they are
//! created or dropped. [`FieldArrays::allocate`] is the allocator a caller
//! would normally use before starting an ingestion.

use super::Grid;
use crate::error::{Result, SciError};
use serde::{Deserialize, Serialize};

/// Classification of one cell (or one staggered face).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFlag {
    /// Not visited by any boundary pass yet.
    #[default]
    Unset,
    Fluid,
    Solid,
    Outlet,
}

impl CellFlag {
    /// Numeric code used by the solver (`-1`, `0`, `1`, `2`).
    pub fn code(self) -> i32 {
        match self {
            CellFlag::Unset => -1,
            CellFlag::Fluid => 0,
            CellFlag::Solid => 1,
            CellFlag::Outlet => 2,
        }
    }

    /// Whether some pass has already assigned this cell a role.
    pub fn is_claimed(self) -> bool {
        self != CellFlag::Unset
    }
}

/// Face and center coordinates, dense over the padded grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFields {
    pub face_x: Vec<f64>,
    pub face_y: Vec<f64>,
    pub face_z: Vec<f64>,
    pub center_x: Vec<f64>,
    pub center_y: Vec<f64>,
    pub center_z: Vec<f64>,
}

/// Cell-center flags plus the three staggered face flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagFields {
    pub flag_p: Vec<CellFlag>,
    pub flag_u: Vec<CellFlag>,
    pub flag_v: Vec<CellFlag>,
    pub flag_w: Vec<CellFlag>,
}

/// Boundary scalars, written only at cells that receive boundary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryValues {
    pub temperature: Vec<f64>,
    pub heat_flux: Vec<f64>,
    pub velocity_x: Vec<f64>,
    pub velocity_y: Vec<f64>,
    pub velocity_z: Vec<f64>,
}

/// All long-lived arrays the reader populates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldArrays {
    pub coordinates: CoordinateFields,
    pub flags: FlagFields,
    pub boundary: BoundaryValues,
}

impl FieldArrays {
    /// Allocates zeroed real arrays and `Unset` flags for every cell of `grid`.
    pub fn allocate(grid: &Grid) -> Result<Self> {
        let n = grid.len();
        let reals = || zeroed(n);
        let flags = || -> Result<Vec<CellFlag>> {
            let mut v = Vec::new();
            v.try_reserve_exact(n).map_err(|_| SciError::AllocationFailure {
                what: "cell flags",
                len: n as i64,
            })?;
            v.resize(n, CellFlag::Unset);
            Ok(v)
        };

        Ok(Self {
            coordinates: CoordinateFields {
                face_x: reals()?,
                face_y: reals()?,
                face_z: reals()?,
                center_x: reals()?,
                center_y: reals()?,
                center_z: reals()?,
            },
            flags: FlagFields {
                flag_p: flags()?,
                flag_u: flags()?,
                flag_v: flags()?,
                flag_w: flags()?,
            },
            boundary: BoundaryValues {
                temperature: reals()?,
                heat_flux: reals()?,
                velocity_x: reals()?,
                velocity_y: reals()?,
                velocity_z: reals()?,
            },
        })
    }

    /// Number of cells the arrays cover.
    pub fn len(&self) -> usize {
        self.flags.flag_p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FlagFields {
    /// Numeric codes of a flag array, in cell order.
    pub fn codes(flags: &[CellFlag]) -> Vec<i32> {
        flags.iter().map(|f| f.code()).collect()
    }

    /// Number of cell-center flags that are not `Unset`.
    pub fn claimed_count(&self) -> usize {
        self.flag_p.iter().filter(|f| f.is_claimed()).count()
    }
}

fn zeroed(n: usize) -> Result<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|_| SciError::AllocationFailure {
            what: "real field",
            len: n as i64,
        })?;
    v.resize(n, 0.0);
    Ok(v)
}
