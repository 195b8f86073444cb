//! Named boundary-condition registry and the flat boundary index table.
//!
//! Both only ever grow. Table order is the order in which the solver later
//! applies per-cell boundary updates, so rows are never reordered.

use super::Section;
use serde::{Deserialize, Serialize};

/// Thermal condition attached to a block or wall record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalCondition {
    HeatFlux,
    Temperature,
    /// Any other code; kept in the table but writes no field.
    Unrecognized(i32),
}

impl ThermalCondition {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ThermalCondition::HeatFlux,
            1 => ThermalCondition::Temperature,
            other => ThermalCondition::Unrecognized(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ThermalCondition::HeatFlux => 0,
            ThermalCondition::Temperature => 1,
            ThermalCondition::Unrecognized(code) => code,
        }
    }
}

/// One row of the boundary index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCell {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    /// Present for block and wall cells only.
    pub thermal: Option<ThermalCondition>,
    /// Absent for cells marked by the mask file.
    pub bc_id: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryIndexTable {
    rows: Vec<BoundaryCell>,
}

impl BoundaryIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: BoundaryCell) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[BoundaryCell] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundaryCell> {
        self.rows.iter()
    }

    /// Rows that belong to boundary condition `id`, in table order.
    pub fn rows_for(&self, id: usize) -> impl Iterator<Item = &BoundaryCell> {
        self.rows.iter().filter(move |r| r.bc_id == Some(id))
    }

    /// Column layout consumed by the solver: `[i, j, k, thermal, id]`,
    /// with `-1` where a row carries no thermal kind or id.
    pub fn to_columns(&self) -> [Vec<i32>; 5] {
        let mut columns: [Vec<i32>; 5] = Default::default();
        for column in columns.iter_mut() {
            column.reserve_exact(self.rows.len());
        }
        for row in &self.rows {
            columns[0].push(row.i as i32);
            columns[1].push(row.j as i32);
            columns[2].push(row.k as i32);
            columns[3].push(row.thermal.map_or(-1, ThermalCondition::code));
            columns[4].push(row.bc_id.map_or(-1, |id| id as i32));
        }
        columns
    }
}

impl<'a> IntoIterator for &'a BoundaryIndexTable {
    type Item = &'a BoundaryCell;
    type IntoIter = std::slice::Iter<'a, BoundaryCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A registered boundary condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCondition {
    pub id: usize,
    pub name: String,
    pub section: Section,
}

/// Registry of boundary-condition names.
///
/// Ids are handed out sequentially from `0`, shared by every section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BcRegistry {
    entries: Vec<NamedCondition>,
}

impl BcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` and returns its id.
    pub fn register(&mut self, name: &str, section: Section) -> usize {
        let id = self.entries.len();
        self.entries.push(NamedCondition {
            id,
            name: name.to_owned(),
            section,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&NamedCondition> {
        self.entries.get(id)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    pub fn entries(&self) -> &[NamedCondition] {
        &self.entries
    }
}
