//! File I/O for SCI inputs.
//!
//! This module reads the primary parameter file and the solid mask, and
//! writes ingested meshes as JSON.

pub mod cursor;
pub mod export;
pub mod header;
pub mod mask;
pub mod sci;
pub mod settings;

pub use cursor::LineCursor;
pub use export::{read_mesh_json, to_mesh_json_string, write_mesh_json};
pub use header::{read_header, read_header_file};
pub use mask::{read_mask, read_mask_from};
pub use sci::{SciSummary, read_sci_input};
pub use settings::{PhysicalProperties, SolverSettings, TimeSettings, read_settings};
