//! Boundary section parser.
//!
//! Sections come in a fixed order (inlet, outlet, block, wall, source), each
//! introduced by a count line. Every record registers one named condition.
//! Inlet, outlet and block records overwrite whatever their region already
//! holds; wall records only touch cells that are still `Unset`, which makes
//! walls the lowest-priority category regardless of where they appear.
//!
//! The source section has no record lines of its own: a positive count is
//! followed by a scan of the count line itself, so the registered name is
//! the count token and the settings trailer starts on the very next line.

use super::extent::{RawExtents, Region};
use super::registry::{BcRegistry, BoundaryCell, BoundaryIndexTable, ThermalCondition};
use super::Section;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, SciError};
use crate::grid::fields::{CellFlag, FieldArrays};
use crate::grid::Grid;
use crate::io::cursor::{FieldError, LineCursor, LineFields};
use std::io::BufRead;

/// Inlet or outlet record: `name SI SJ SK EI EJ EK T Xi U V W`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningRecord {
    pub name: String,
    pub extents: RawExtents,
    pub temperature: f64,
    /// Read and echoed, not written anywhere.
    pub mass_fraction: f64,
    pub velocity: [f64; 3],
}

/// Block or wall record: `name SI SJ SK EI EJ EK kind value`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalRecord {
    pub name: String,
    pub extents: RawExtents,
    pub thermal: ThermalCondition,
    pub value: f64,
}

/// Contaminant source record: `name SI SJ SK EI EJ EK Xi_dot`.
///
/// Extents and rate are `None` when the line stops short of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub name: String,
    pub extents: Option<RawExtents>,
    pub mass_rate: Option<f64>,
}

fn extents(f: &mut LineFields<'_>) -> std::result::Result<RawExtents, FieldError> {
    let si = f.int("SI")?;
    let sj = f.int("SJ")?;
    let sk = f.int("SK")?;
    let ei = f.int("EI")?;
    let ej = f.int("EJ")?;
    let ek = f.int("EK")?;
    Ok(RawExtents::new(
        [si.into(), sj.into(), sk.into()],
        [ei.into(), ej.into(), ek.into()],
    ))
}

impl OpeningRecord {
    pub fn parse(line: &str) -> std::result::Result<Self, FieldError> {
        let mut f = LineFields::new(line);
        Ok(Self {
            name: f.text("name")?.to_owned(),
            extents: extents(&mut f)?,
            temperature: f.real("T")?,
            mass_fraction: f.real("Xi")?,
            velocity: [f.real("U")?, f.real("V")?, f.real("W")?],
        })
    }
}

impl ThermalRecord {
    pub fn parse(line: &str) -> std::result::Result<Self, FieldError> {
        let mut f = LineFields::new(line);
        Ok(Self {
            name: f.text("name")?.to_owned(),
            extents: extents(&mut f)?,
            thermal: ThermalCondition::from_code(f.int("thermal kind")?),
            value: f.real("thermal value")?,
        })
    }
}

impl SourceRecord {
    /// Scans as far as the line allows. Only the name is required; the
    /// first missing or mistyped field ends the scan.
    pub fn scan(line: &str) -> std::result::Result<Self, FieldError> {
        let mut f = LineFields::new(line);
        let name = f.text("name")?.to_owned();
        let Ok(extents) = extents(&mut f) else {
            return Ok(Self {
                name,
                extents: None,
                mass_rate: None,
            });
        };
        Ok(Self {
            name,
            extents: Some(extents),
            mass_rate: f.real("Xi_dot").ok(),
        })
    }
}

/// Applies parsed records to the caller's arrays.
pub struct BoundaryWriter<'a> {
    grid: &'a Grid,
    fields: &'a mut FieldArrays,
    table: &'a mut BoundaryIndexTable,
    registry: &'a mut BcRegistry,
}

impl<'a> BoundaryWriter<'a> {
    pub fn new(
        grid: &'a Grid,
        fields: &'a mut FieldArrays,
        table: &'a mut BoundaryIndexTable,
        registry: &'a mut BcRegistry,
    ) -> Self {
        Self {
            grid,
            fields,
            table,
            registry,
        }
    }

    pub fn registry(&self) -> &BcRegistry {
        self.registry
    }

    pub fn table(&self) -> &BoundaryIndexTable {
        self.table
    }

    /// Places an inlet or outlet record. Returns the registered id.
    ///
    /// Both write temperature and all three velocity components; outlets
    /// are not treated differently.
    pub fn opening(&mut self, section: Section, record: &OpeningRecord, line: usize) -> Result<usize> {
        let id = self.registry.register(&record.name, section);
        let flag = match section {
            Section::Outlet => CellFlag::Outlet,
            _ => CellFlag::Fluid,
        };
        let region = self.region(section, record.extents, line)?;
        let values = &mut self.fields.boundary;
        for (i, j, k) in region.cells() {
            let idx = self.grid.index(i, j, k);
            self.table.push(BoundaryCell {
                i,
                j,
                k,
                thermal: None,
                bc_id: Some(id),
            });
            values.temperature[idx] = record.temperature;
            values.velocity_x[idx] = record.velocity[0];
            values.velocity_y[idx] = record.velocity[1];
            values.velocity_z[idx] = record.velocity[2];
            self.fields.flags.flag_p[idx] = flag;
        }
        Ok(id)
    }

    /// Places a block or wall record. Returns the registered id.
    ///
    /// Wall records skip every cell some earlier record already claimed.
    pub fn solid(&mut self, section: Section, record: &ThermalRecord, line: usize) -> Result<usize> {
        let id = self.registry.register(&record.name, section);
        let region = self.region(section, record.extents, line)?;
        let first_write_only = section == Section::Wall;
        for (i, j, k) in region.cells() {
            let idx = self.grid.index(i, j, k);
            if first_write_only && self.fields.flags.flag_p[idx].is_claimed() {
                continue;
            }
            self.table.push(BoundaryCell {
                i,
                j,
                k,
                thermal: Some(record.thermal),
                bc_id: Some(id),
            });
            self.fields.flags.flag_p[idx] = CellFlag::Solid;
            match record.thermal {
                ThermalCondition::Temperature => self.fields.boundary.temperature[idx] = record.value,
                ThermalCondition::HeatFlux => self.fields.boundary.heat_flux[idx] = record.value,
                ThermalCondition::Unrecognized(_) => {}
            }
        }
        Ok(id)
    }

    /// Registers a source record. Nothing is written to the grid.
    pub fn source(&mut self, record: &SourceRecord) -> usize {
        self.registry.register(&record.name, Section::Source)
    }

    fn region(&self, section: Section, raw: RawExtents, line: usize) -> Result<Region> {
        let family = section
            .family()
            .ok_or_else(|| SciError::record(section, line, "section has no grid region"))?;
        let region = family.normalize(raw, self.grid);
        if let Some(axis) = region.outside(self.grid) {
            let range = region.axis(axis);
            return Err(SciError::RegionOutOfBounds {
                section,
                line,
                axis: axis.index_name(),
                start: range.start,
                end: range.end,
                max: self.grid.max(axis) as i64 + 1,
            });
        }
        log::debug!("{section} region {region:?} covers {} cells", region.cell_count());
        Ok(region)
    }
}

/// Reads the five boundary sections from `cursor` into `writer`.
pub fn read_sections<R: BufRead>(
    cursor: &mut LineCursor<R>,
    writer: &mut BoundaryWriter<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    for section in Section::ORDER {
        let (count_line, count) = read_count(cursor, section)?;
        sink.emit(
            Diagnostic::normal("boundary section")
                .with("section", section)
                .with("count", count),
        );

        if section == Section::Source {
            if count > 0 {
                let line_no = cursor.line();
                let record = SourceRecord::scan(&count_line)
                    .map_err(|e| SciError::record(section, line_no, e.to_string()))?;
                let id = writer.source(&record);
                sink.emit(registered(id, &record.name));
                let mut values = Diagnostic::normal("source values");
                if let Some(rate) = record.mass_rate {
                    values = values.with("xi_dot", rate);
                }
                sink.emit(values);
            }
            continue;
        }

        for _ in 0..count.max(0) {
            let line = record_line(cursor, section)?;
            let line_no = cursor.line();
            let bad = |e: FieldError| SciError::record(section, line_no, e.to_string());
            match section {
                Section::Inlet | Section::Outlet => {
                    let record = OpeningRecord::parse(&line).map_err(bad)?;
                    let id = writer.opening(section, &record, line_no)?;
                    sink.emit(registered(id, &record.name));
                    sink.emit(
                        Diagnostic::normal("opening values")
                            .with("u", record.velocity[0])
                            .with("v", record.velocity[1])
                            .with("w", record.velocity[2])
                            .with("t", record.temperature)
                            .with("xi", record.mass_fraction),
                    );
                }
                // Block or wall.
                _ => {
                    let record = ThermalRecord::parse(&line).map_err(bad)?;
                    let id = writer.solid(section, &record, line_no)?;
                    sink.emit(registered(id, &record.name));
                    sink.emit(
                        Diagnostic::normal("thermal values")
                            .with("kind", record.thermal.code())
                            .with("value", record.value),
                    );
                }
            }
        }
        log::debug!(
            "boundary table holds {} rows after the {section} section",
            writer.table().len()
        );
    }
    Ok(())
}

fn registered(id: usize, name: &str) -> Diagnostic {
    Diagnostic::normal("boundary condition")
        .with("id", id)
        .with("name", name)
}

/// Reads a count line. The line itself is handed back for the source scan.
fn read_count<R: BufRead>(cursor: &mut LineCursor<R>, section: Section) -> Result<(String, i32)> {
    let line = record_line(cursor, section)?;
    let count = LineFields::new(&line)
        .int("count")
        .map_err(|e| SciError::record(section, cursor.line(), e.to_string()))?;
    Ok((line, count))
}

fn record_line<R: BufRead>(cursor: &mut LineCursor<R>, section: Section) -> Result<String> {
    cursor
        .next_line()?
        .ok_or_else(|| SciError::record(section, cursor.line() + 1, "file ended inside the section"))
}
