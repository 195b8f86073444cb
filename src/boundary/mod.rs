//! Boundary-condition sections of the SCI input.
//!
//! # Architecture
//!
//! ```text
//! record line ──► RawExtents ──► ExtentFamily::normalize() ──► Region
//!                                                                │
//!                   flags / boundary values / index table ◄── BoundaryWriter
//! ```

pub mod extent;
pub mod registry;
pub mod sections;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use extent::{ExtentFamily, IndexRange, RawExtents, Region};
pub use registry::{BcRegistry, BoundaryCell, BoundaryIndexTable, NamedCondition, ThermalCondition};
pub use sections::{BoundaryWriter, OpeningRecord, SourceRecord, ThermalRecord, read_sections};

/// The five boundary sections, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Inlet,
    Outlet,
    Block,
    Wall,
    Source,
}

impl Section {
    pub const ORDER: [Section; 5] = [
        Section::Inlet,
        Section::Outlet,
        Section::Block,
        Section::Wall,
        Section::Source,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Inlet => "inlet",
            Section::Outlet => "outlet",
            Section::Block => "block",
            Section::Wall => "wall",
            Section::Source => "source",
        }
    }

    /// Extent encoding used by this section's records.
    ///
    /// Source records are read but never placed on the grid.
    pub fn family(self) -> Option<ExtentFamily> {
        match self {
            Section::Inlet | Section::Outlet => Some(ExtentFamily::Opening),
            Section::Block => Some(ExtentFamily::Block),
            Section::Wall => Some(ExtentFamily::Wall),
            Section::Source => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
