//! Region extent normalization.
//!
//! A record line encodes its region as `(SI, SJ, SK, EI, EJ, EK)`. The three
//! boundary categories disagree on what the `E*` values mean and on how a
//! start of `1` is widened into the ghost layer, so each category has its
//! own [`ExtentFamily`]. Using the wrong family shifts cells by one layer.

use crate::grid::{Axis, Grid};
use serde::{Deserialize, Serialize};

/// Raw region encoding as read from a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtents {
    pub si: i64,
    pub sj: i64,
    pub sk: i64,
    pub ei: i64,
    pub ej: i64,
    pub ek: i64,
}

impl RawExtents {
    pub fn new(start: [i64; 3], end: [i64; 3]) -> Self {
        Self {
            si: start[0],
            sj: start[1],
            sk: start[2],
            ei: end[0],
            ej: end[1],
            ek: end[2],
        }
    }
}

/// Inclusive index range along one axis; empty when `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: i64,
    pub end: i64,
}

impl IndexRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }
}

/// Normalized region: one inclusive range per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub i: IndexRange,
    pub j: IndexRange,
    pub k: IndexRange,
}

impl Region {
    pub fn axis(&self, axis: Axis) -> IndexRange {
        match axis {
            Axis::X => self.i,
            Axis::Y => self.j,
            Axis::Z => self.k,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty() || self.j.is_empty() || self.k.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.i.len() * self.j.len() * self.k.len()
    }

    /// First axis whose range leaves the padded domain of `grid`.
    ///
    /// An empty region never leaves the domain.
    pub fn outside(&self, grid: &Grid) -> Option<Axis> {
        if self.is_empty() {
            return None;
        }
        Axis::ALL.into_iter().find(|&axis| {
            let r = self.axis(axis);
            r.start < 0 || r.end > grid.max(axis) as i64 + 1
        })
    }

    /// Cells of the region, `i` outermost and `k` innermost.
    ///
    /// Only meaningful once [`outside`](Self::outside) returned `None`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let (i, j, k) = (self.i, self.j, self.k);
        (i.start..=i.end).flat_map(move |ii| {
            (j.start..=j.end).flat_map(move |jj| {
                (k.start..=k.end).map(move |kk| (ii as usize, jj as usize, kk as usize))
            })
        })
    }
}

/// Extent encodings used by the boundary categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtentFamily {
    /// Inlets and outlets.
    ///
    /// The axis with a zero `E` is the face normal: it keeps its start
    /// (`1` becomes `0`) as both ends. The other two `E` are lengths and
    /// become `S + E - 1`. The three zero tests run one after the other, each
    /// seeing the values left by the previous one.
    Opening,
    /// Internal solid blocks.
    ///
    /// Per axis: a start of `1` becomes `0` and the end stays at the raw
    /// length, plus one when it reaches the last interior index. Any other
    /// start gives `S + E - 1`.
    Block,
    /// Walls.
    ///
    /// Per axis: a start of `1` becomes `0` and the end stays at the raw
    /// length, plus one when it reaches the last interior index. Any other
    /// start gives `S + E`.
    Wall,
}

impl ExtentFamily {
    pub fn normalize(self, raw: RawExtents, grid: &Grid) -> Region {
        match self {
            ExtentFamily::Opening => normalize_opening(raw),
            ExtentFamily::Block => {
                let [i, j, k] = per_axis(raw, grid, |s, e, max| {
                    if s == 1 {
                        let s = 0;
                        if e >= max {
                            IndexRange::new(s, e + s + 1)
                        } else {
                            IndexRange::new(s, e + s)
                        }
                    } else {
                        IndexRange::new(s, e + s - 1)
                    }
                });
                Region { i, j, k }
            }
            ExtentFamily::Wall => {
                let [i, j, k] = per_axis(raw, grid, |s, e, max| {
                    if s == 1 {
                        if e >= max {
                            IndexRange::new(0, e + 1)
                        } else {
                            IndexRange::new(0, e)
                        }
                    } else {
                        IndexRange::new(s, e + s)
                    }
                });
                Region { i, j, k }
            }
        }
    }
}

fn per_axis(
    raw: RawExtents,
    grid: &Grid,
    rule: impl Fn(i64, i64, i64) -> IndexRange,
) -> [IndexRange; 3] {
    [
        rule(raw.si, raw.ei, grid.imax as i64),
        rule(raw.sj, raw.ej, grid.jmax as i64),
        rule(raw.sk, raw.ek, grid.kmax as i64),
    ]
}

fn normalize_opening(raw: RawExtents) -> Region {
    let RawExtents {
        mut si,
        mut sj,
        mut sk,
        mut ei,
        mut ej,
        mut ek,
    } = raw;

    if ei == 0 {
        if si == 1 {
            si = 0;
        }
        ei += si;
        ej = sj + ej - 1;
        ek = sk + ek - 1;
    }
    if ej == 0 {
        if sj == 1 {
            sj = 0;
        }
        ei = si + ei - 1;
        ej += sj;
        ek = sk + ek - 1;
    }
    if ek == 0 {
        if sk == 1 {
            sk = 0;
        }
        ei = si + ei - 1;
        ej = sj + ej - 1;
        ek += sk;
    }

    Region {
        i: IndexRange::new(si, ei),
        j: IndexRange::new(sj, ej),
        k: IndexRange::new(sk, ek),
    }
}
