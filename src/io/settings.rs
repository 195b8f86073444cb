//! Solver settings trailer that follows the boundary sections.
//!
//! Most of it is legacy configuration the reader does not use. The restart
//! flag, the physical properties and the time settings are parsed and
//! handed back to the caller, which owns their storage.

use super::cursor::{FieldError, LineCursor, LineFields};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, SciError};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Unused lines before the restart flag: maximum iteration, convergence
/// rate, turbulence model, initial/minimum/maximum values, fts value,
/// under-relaxation, reference point, monitoring point.
const LINES_BEFORE_RESTART: usize = 10;

/// Unused lines between the restart flag and the property line: print
/// frequency, pressure variable, steady state/buoyancy.
const LINES_BEFORE_PROPERTIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    pub rho: f64,
    pub nu: f64,
    pub cond: f64,
    pub gravity: [f64; 3],
    pub beta: f64,
    /// Read but not used by the solver.
    pub trefmax: f64,
    pub cp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSettings {
    pub t_start: f64,
    pub dt: f64,
    pub step_total: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Whether to resume from an earlier run's output.
    pub restart: bool,
    pub properties: PhysicalProperties,
    pub time: TimeSettings,
}

/// Reads the settings trailer.
///
/// Returns `None` when the input ends right where the trailer would start.
/// Once any trailer line exists, every line up to the time settings must be
/// present. The closing Prandtl line is optional.
pub fn read_settings<R: BufRead>(
    cursor: &mut LineCursor<R>,
    sink: &mut dyn DiagnosticSink,
) -> Result<Option<SolverSettings>> {
    if cursor.next_line()?.is_none() {
        return Ok(None);
    }
    skip(cursor, LINES_BEFORE_RESTART - 1, "restart flag")?;

    let line = required(cursor, "restart flag")?;
    let restart = LineFields::new(&line)
        .int("restart flag")
        .map_err(|e| malformed(cursor.line(), e))?;
    sink.emit(Diagnostic::normal("restart setting").with("read_old_ffd_file", restart));

    skip(cursor, LINES_BEFORE_PROPERTIES, "physical properties")?;

    let line = required(cursor, "physical properties")?;
    let properties = parse_properties(&line).map_err(|e| malformed(cursor.line(), e))?;
    sink.emit(
        Diagnostic::normal("physical properties")
            .with("rho", properties.rho)
            .with("nu", properties.nu)
            .with("cond", properties.cond)
            .with("gravx", properties.gravity[0])
            .with("gravy", properties.gravity[1])
            .with("gravz", properties.gravity[2])
            .with("beta", properties.beta)
            .with("cp", properties.cp),
    );

    let line = required(cursor, "time settings")?;
    let time = parse_time(&line).map_err(|e| malformed(cursor.line(), e))?;
    sink.emit(
        Diagnostic::normal("time settings")
            .with("t_start", time.t_start)
            .with("dt", time.dt)
            .with("step_total", time.step_total),
    );

    if cursor.next_line()?.is_none() {
        log::debug!("settings trailer has no prandtl line");
    }

    Ok(Some(SolverSettings {
        restart: restart != 0,
        properties,
        time,
    }))
}

fn parse_properties(line: &str) -> std::result::Result<PhysicalProperties, FieldError> {
    let mut f = LineFields::new(line);
    Ok(PhysicalProperties {
        rho: f.real("rho")?,
        nu: f.real("nu")?,
        cond: f.real("cond")?,
        gravity: [f.real("gravx")?, f.real("gravy")?, f.real("gravz")?],
        beta: f.real("beta")?,
        trefmax: f.real("trefmax")?,
        cp: f.real("Cp")?,
    })
}

fn parse_time(line: &str) -> std::result::Result<TimeSettings, FieldError> {
    let mut f = LineFields::new(line);
    Ok(TimeSettings {
        t_start: f.real("t_start")?,
        dt: f.real("dt")?,
        step_total: f.int("step_total")?,
    })
}

fn skip<R: BufRead>(cursor: &mut LineCursor<R>, n: usize, before: &str) -> Result<()> {
    for _ in 0..n {
        required(cursor, before)?;
    }
    Ok(())
}

fn required<R: BufRead>(cursor: &mut LineCursor<R>, what: &str) -> Result<String> {
    cursor
        .next_line()?
        .ok_or_else(|| SciError::MalformedSettings {
            line: cursor.line() + 1,
            message: format!("file ended before the {what} line"),
        })
}

fn malformed(line: usize, e: FieldError) -> SciError {
    SciError::MalformedSettings {
        line,
        message: e.to_string(),
    }
}
