use anyhow::Result;
use sci_mesh::grid::fields::FlagFields;
use sci_mesh::io::{read_mesh_json, write_mesh_json};
use sci_mesh::{CellFlag, IngestConfig, MemorySink, SciMesh, Section, ThermalCondition, ingest};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// 3 x 2 x 1 room: inlet on the west face, outlet on the east face, a desk
// column through the middle, walls closing every other ghost cell. The
// source section is a bare count, so the source is registered as "1".
const ROOM: &str = "\
3.0 2.0 1.0
3 2 1
1.0 1.0 1.0
1.0 1.0
1.0

1 1 1 1 1 1
9
1
supply 1 1 1 0 2 1 20 0 0.5 0 0
1
exhaust 4 1 1 0 1 1 22 0 0.5 0 0
1
desk 2 2 1 1 1 1 0 50
5
floor 1 1 1 3 2 0 1 18
ceiling 1 1 2 3 2 0 1 18
south 1 1 1 3 0 1 1 18
north 1 3 1 3 0 1 1 18
east 4 1 1 0 2 1 1 18
1
100
1e-6
0
0 0 0
0 0 0
1 1 1
0
0.5
0 0 0
1 1 1
0
10
0
0
1.2 1.5e-5 0.025 0 0 -9.81 0.0034 30 1005
0 0.1 500
0.71
";

// k, j, i order: (2,1,1) and (1,2,1) are solid.
const MASK: &str = "0 1 0 1 0 0\n";

fn write_case(dir: &Path) -> Result<IngestConfig> {
    let path = dir.join("room.cfd");
    fs::write(&path, ROOM)?;
    fs::write(dir.join("zeroone.dat"), MASK)?;
    Ok(IngestConfig::new(path))
}

fn flag(mesh: &SciMesh, i: usize, j: usize, k: usize) -> CellFlag {
    mesh.fields.flags.flag_p[mesh.grid.index(i, j, k)]
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn test_coordinates() -> Result<()> {
    let dir = tempdir()?;
    let mesh = ingest(&write_case(dir.path())?, &mut MemorySink::new())?;
    let g = &mesh.grid;
    let c = &mesh.fields.coordinates;

    let face_x: Vec<f64> = (0..=4).map(|i| c.face_x[g.index(i, 1, 1)]).collect();
    let center_x: Vec<f64> = (0..=4).map(|i| c.center_x[g.index(i, 2, 0)]).collect();
    assert_eq!(face_x, vec![0.0, 1.0, 2.0, 3.0, 3.0]);
    assert_eq!(center_x, vec![0.0, 0.5, 1.5, 2.5, 3.0]);

    for i in 1..=3 {
        let idx = g.index(i, 1, 1);
        let prev = g.index(i - 1, 1, 1);
        assert!(approx(c.center_x[idx], 0.5 * (c.face_x[idx] + c.face_x[prev])));
    }
    assert_eq!(c.face_y[g.index(0, 3, 0)], 2.0);
    assert_eq!(c.face_z[g.index(0, 0, 2)], 1.0);
    assert_eq!(c.center_z[g.index(3, 1, 1)], 0.5);
    Ok(())
}

#[test]
fn test_flags_and_values() -> Result<()> {
    let dir = tempdir()?;
    let mesh = ingest(&write_case(dir.path())?, &mut MemorySink::new())?;
    let g = &mesh.grid;
    let b = &mesh.fields.boundary;

    assert_eq!(flag(&mesh, 0, 1, 1), CellFlag::Fluid);
    assert_eq!(flag(&mesh, 0, 2, 1), CellFlag::Fluid);
    assert_eq!(flag(&mesh, 4, 1, 1), CellFlag::Outlet);
    assert_eq!(flag(&mesh, 2, 2, 1), CellFlag::Solid);
    assert_eq!(flag(&mesh, 4, 2, 1), CellFlag::Solid);

    assert_eq!(b.temperature[g.index(0, 1, 1)], 20.0);
    assert_eq!(b.velocity_x[g.index(0, 2, 1)], 0.5);
    assert_eq!(b.temperature[g.index(4, 1, 1)], 22.0);
    assert_eq!(b.velocity_x[g.index(4, 1, 1)], 0.5);
    assert_eq!(b.heat_flux[g.index(2, 2, 1)], 50.0);
    assert_eq!(b.temperature[g.index(1, 1, 0)], 18.0);

    // The floor covers the desk's bottom cell but never overwrites it.
    assert_eq!(b.heat_flux[g.index(2, 2, 0)], 50.0);
    assert_eq!(b.temperature[g.index(2, 2, 0)], 0.0);
    Ok(())
}

#[test]
fn test_mask_and_classification() -> Result<()> {
    let dir = tempdir()?;
    let mesh = ingest(&write_case(dir.path())?, &mut MemorySink::new())?;
    let g = &mesh.grid;
    let f = &mesh.fields.flags;

    assert_eq!(flag(&mesh, 2, 1, 1), CellFlag::Solid);
    assert_eq!(flag(&mesh, 1, 2, 1), CellFlag::Solid);
    // Enclosed once the mask ran.
    assert_eq!(flag(&mesh, 1, 1, 1), CellFlag::Solid);
    // Two-cell pocket: a single pass leaves both unset.
    assert_eq!(flag(&mesh, 3, 1, 1), CellFlag::Unset);
    assert_eq!(flag(&mesh, 3, 2, 1), CellFlag::Unset);

    // Inlet face: the solid cell behind it is scanned later and wins.
    assert_eq!(f.flag_u[g.index(0, 1, 1)], CellFlag::Solid);
    // The outlet writes the face below it even though that cell is unset.
    assert_eq!(f.flag_u[g.index(3, 1, 1)], CellFlag::Outlet);
    assert_eq!(f.flag_v[g.index(3, 1, 1)], CellFlag::Unset);

    let codes = FlagFields::codes(&f.flag_p);
    let row: Vec<i32> = (0..=4).map(|i| codes[g.index(i, 1, 1)]).collect();
    assert_eq!(row, vec![0, 1, 1, -1, 2]);
    Ok(())
}

#[test]
fn test_table_order_and_registry() -> Result<()> {
    let dir = tempdir()?;
    let mut sink = MemorySink::new();
    let mesh = ingest(&write_case(dir.path())?, &mut sink)?;

    let names: Vec<&str> = mesh
        .registry
        .entries()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["supply", "exhaust", "desk", "floor", "ceiling", "south", "north", "east", "1"]
    );
    assert_eq!(mesh.registry.get(8).unwrap().section, Section::Source);
    assert_eq!(mesh.declared_bc_count, 9);
    assert_eq!(mesh.wall_properties, [1; 6]);

    let rows = mesh.table.rows();
    assert_eq!(rows.len(), 2 + 1 + 3 + 19 + 19 + 5 + 5 + 1 + 2);
    let first: Vec<_> = rows[..6].iter().map(|r| (r.i, r.j, r.k, r.bc_id)).collect();
    assert_eq!(
        first,
        vec![
            (0, 1, 1, Some(0)),
            (0, 2, 1, Some(0)),
            (4, 1, 1, Some(1)),
            (2, 2, 0, Some(2)),
            (2, 2, 1, Some(2)),
            (2, 2, 2, Some(2)),
        ]
    );
    assert_eq!(rows[3].thermal, Some(ThermalCondition::HeatFlux));
    assert_eq!(mesh.table.rows_for(7).count(), 1);
    assert!(!mesh.table.rows_for(3).any(|r| (r.i, r.j, r.k) == (2, 2, 0)));

    let tail: Vec<_> = rows[rows.len() - 2..].iter().map(|r| (r.i, r.j, r.k)).collect();
    assert_eq!(tail, vec![(2, 1, 1), (1, 2, 1)]);

    let [_, _, _, thermal, ids] = mesh.table.to_columns();
    assert_eq!(&thermal[..4], &[-1, -1, -1, 0]);
    assert_eq!(ids[ids.len() - 1], -1);

    assert_eq!(sink.errors().count(), 0);
    assert_eq!(sink.find("boundary condition count mismatch").count(), 0);
    assert_eq!(sink.find("boundary section").count(), 5);
    Ok(())
}

#[test]
fn test_no_cell_listed_twice_by_one_section() -> Result<()> {
    let dir = tempdir()?;
    let mesh = ingest(&write_case(dir.path())?, &mut MemorySink::new())?;

    let mut seen = HashSet::new();
    for row in mesh.table.rows() {
        // Mask rows carry no id and are keyed as their own group.
        let section = row.bc_id.and_then(|id| mesh.registry.get(id)).map(|c| c.section);
        assert!(
            seen.insert((section, row.i, row.j, row.k)),
            "{section:?} lists ({}, {}, {}) twice",
            row.i,
            row.j,
            row.k
        );
    }
    assert_eq!(seen.len(), mesh.table.len());
    Ok(())
}

#[test]
fn test_settings_pass_through() -> Result<()> {
    let dir = tempdir()?;
    let mesh = ingest(&write_case(dir.path())?, &mut MemorySink::new())?;
    let settings = mesh.settings.expect("settings trailer present");
    assert!(!settings.restart);
    assert_eq!(settings.properties.cp, 1005.0);
    assert_eq!(settings.time.step_total, 500);

    let mut config = write_case(dir.path())?;
    config.read_settings = false;
    let mesh = ingest(&config, &mut MemorySink::new())?;
    assert!(mesh.settings.is_none());
    Ok(())
}

#[test]
fn test_config_file_and_json_export() -> Result<()> {
    let dir = tempdir()?;
    write_case(dir.path())?;
    let config_path = dir.path().join("ingest.toml");
    fs::write(
        &config_path,
        format!(
            "parameter_file = {:?}\nmask_file = \"zeroone.dat\"\n",
            dir.path().join("room.cfd").display().to_string()
        ),
    )?;

    let config = IngestConfig::from_file(&config_path)?;
    let mesh = ingest(&config, &mut MemorySink::new())?;

    let out = dir.path().join("room.json");
    write_mesh_json(&out, &mesh)?;
    let loaded = read_mesh_json(&out)?;
    assert_eq!(loaded.grid, mesh.grid);
    assert_eq!(loaded.table, mesh.table);
    assert_eq!(loaded.registry, mesh.registry);
    assert_eq!(loaded.fields.flags, mesh.fields.flags);
    assert_eq!(loaded.fields.coordinates.center_x, mesh.fields.coordinates.center_x);
    Ok(())
}

#[test]
fn test_bad_record_aborts_ingestion() -> Result<()> {
    let dir = tempdir()?;
    let config = write_case(dir.path())?;
    let broken = ROOM.replace("desk 2 2 1 1 1 1 0 50", "desk 2 2 1 1 1 1 zero 50");
    fs::write(&config.parameter_file, broken)?;

    let mut sink = MemorySink::new();
    let err = ingest(&config, &mut sink).unwrap_err();
    assert!(err.to_string().contains("block record at line 14"), "{err}");
    assert_eq!(sink.errors().count(), 1);
    Ok(())
}
