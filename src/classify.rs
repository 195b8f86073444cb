//! Cell classification after every boundary pass has run.
//!
//! Two steps:
//!
//! 1. The eight ghost corners become solid, then one scan over the physical
//!    cells marks an `Unset` cell solid when all six neighbors are claimed.
//!    The scan writes in place and is not repeated, so a pocket of two or
//!    more unset cells stays unset.
//! 2. Every cell copies its flag onto the three staggered face arrays, at
//!    its own index and at the one below it along the matching axis. Cells
//!    are visited `i` outer, `k` inner, so on a face shared by two claimed
//!    cells the later (high-side) cell wins. `Unset` cells write nothing.

use crate::grid::Grid;
use crate::grid::fields::{CellFlag, FlagFields};

/// Runs both classification steps on `flags`.
pub fn mark_cells(grid: &Grid, flags: &mut FlagFields) {
    let enclosed = seed_and_propagate(grid, &mut flags.flag_p);
    log::debug!("marked {enclosed} enclosed cells solid");
    derive_face_flags(grid, flags);
}

/// Step 1. Returns how many interior cells were turned solid.
pub fn seed_and_propagate(grid: &Grid, flag_p: &mut [CellFlag]) -> usize {
    let (hi, hj, hk) = (grid.imax + 1, grid.jmax + 1, grid.kmax + 1);
    for i in [0, hi] {
        for j in [0, hj] {
            for k in [0, hk] {
                flag_p[grid.index(i, j, k)] = CellFlag::Solid;
            }
        }
    }

    let mut enclosed = 0;
    for (i, j, k) in grid.physical_cells() {
        let idx = grid.index(i, j, k);
        if flag_p[idx].is_claimed() {
            continue;
        }
        let neighbors = [
            grid.index(i - 1, j, k),
            grid.index(i + 1, j, k),
            grid.index(i, j - 1, k),
            grid.index(i, j + 1, k),
            grid.index(i, j, k - 1),
            grid.index(i, j, k + 1),
        ];
        if neighbors.iter().all(|&n| flag_p[n].is_claimed()) {
            flag_p[idx] = CellFlag::Solid;
            enclosed += 1;
        }
    }
    enclosed
}

/// Step 2: staggered `u`, `v`, `w` flags from the cell-center flags.
pub fn derive_face_flags(grid: &Grid, flags: &mut FlagFields) {
    let FlagFields {
        flag_p,
        flag_u,
        flag_v,
        flag_w,
    } = flags;

    for (i, j, k) in grid.all_cells() {
        let idx = grid.index(i, j, k);
        let flag = flag_p[idx];
        if !flag.is_claimed() {
            continue;
        }
        flag_u[idx] = flag;
        flag_v[idx] = flag;
        flag_w[idx] = flag;
        if i != 0 {
            flag_u[grid.index(i - 1, j, k)] = flag;
        }
        if j != 0 {
            flag_v[grid.index(i, j - 1, k)] = flag;
        }
        if k != 0 {
            flag_w[grid.index(i, j, k - 1)] = flag;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::fields::FieldArrays;

    fn setup(imax: usize, jmax: usize, kmax: usize) -> (Grid, FlagFields) {
        let grid = Grid::new(imax, jmax, kmax, [1.0, 1.0, 1.0]);
        let flags = FieldArrays::allocate(&grid).unwrap().flags;
        (grid, flags)
    }

    fn fill_ghost_layer(grid: &Grid, flags: &mut FlagFields, flag: CellFlag) {
        for (i, j, k) in grid.all_cells() {
            let ghost = i == 0
                || j == 0
                || k == 0
                || i == grid.imax + 1
                || j == grid.jmax + 1
                || k == grid.kmax + 1;
            if ghost {
                flags.flag_p[grid.index(i, j, k)] = flag;
            }
        }
    }

    #[test]
    fn test_corners_are_seeded() {
        let (grid, mut flags) = setup(2, 3, 4);
        seed_and_propagate(&grid, &mut flags.flag_p);
        for &(i, j, k) in &[(0, 0, 0), (3, 0, 0), (0, 4, 5), (3, 4, 5)] {
            assert_eq!(flags.flag_p[grid.index(i, j, k)], CellFlag::Solid);
        }
        // Edge cells between corners are not touched.
        assert_eq!(flags.flag_p[grid.index(1, 0, 0)], CellFlag::Unset);
    }

    #[test]
    fn test_single_enclosed_cell_becomes_solid() {
        let (grid, mut flags) = setup(1, 1, 1);
        fill_ghost_layer(&grid, &mut flags, CellFlag::Fluid);
        let n = seed_and_propagate(&grid, &mut flags.flag_p);
        assert_eq!(n, 1);
        assert_eq!(flags.flag_p[grid.index(1, 1, 1)], CellFlag::Solid);
    }

    #[test]
    fn test_two_cell_pocket_stays_unset() {
        // Known limitation: one pass only.
        let (grid, mut flags) = setup(2, 1, 1);
        fill_ghost_layer(&grid, &mut flags, CellFlag::Solid);
        let n = seed_and_propagate(&grid, &mut flags.flag_p);
        assert_eq!(n, 0);
        assert_eq!(flags.flag_p[grid.index(1, 1, 1)], CellFlag::Unset);
        assert_eq!(flags.flag_p[grid.index(2, 1, 1)], CellFlag::Unset);
    }

    #[test]
    fn test_cells_next_to_a_claimed_cell_flip() {
        let (grid, mut flags) = setup(3, 1, 1);
        fill_ghost_layer(&grid, &mut flags, CellFlag::Solid);
        flags.flag_p[grid.index(2, 1, 1)] = CellFlag::Fluid;
        let n = seed_and_propagate(&grid, &mut flags.flag_p);
        assert_eq!(n, 2);
        assert_eq!(flags.flag_p[grid.index(1, 1, 1)], CellFlag::Solid);
        assert_eq!(flags.flag_p[grid.index(2, 1, 1)], CellFlag::Fluid);
        assert_eq!(flags.flag_p[grid.index(3, 1, 1)], CellFlag::Solid);
    }

    #[test]
    fn test_face_flags_copy_down_one_index() {
        let (grid, mut flags) = setup(3, 1, 1);
        flags.flag_p[grid.index(2, 1, 1)] = CellFlag::Outlet;
        derive_face_flags(&grid, &mut flags);

        assert_eq!(flags.flag_u[grid.index(2, 1, 1)], CellFlag::Outlet);
        assert_eq!(flags.flag_u[grid.index(1, 1, 1)], CellFlag::Outlet);
        assert_eq!(flags.flag_v[grid.index(2, 0, 1)], CellFlag::Outlet);
        assert_eq!(flags.flag_w[grid.index(2, 1, 0)], CellFlag::Outlet);
        // Nothing above, nothing on other axes' lower neighbors.
        assert_eq!(flags.flag_u[grid.index(3, 1, 1)], CellFlag::Unset);
        assert_eq!(flags.flag_v[grid.index(1, 1, 1)], CellFlag::Unset);
    }

    #[test]
    fn test_high_side_cell_wins_shared_face() {
        let (grid, mut flags) = setup(2, 1, 1);
        flags.flag_p[grid.index(1, 1, 1)] = CellFlag::Fluid;
        flags.flag_p[grid.index(2, 1, 1)] = CellFlag::Solid;
        derive_face_flags(&grid, &mut flags);
        assert_eq!(flags.flag_u[grid.index(1, 1, 1)], CellFlag::Solid);
        assert_eq!(flags.flag_u[grid.index(0, 1, 1)], CellFlag::Fluid);

        let (grid, mut flags) = setup(2, 1, 1);
        flags.flag_p[grid.index(1, 1, 1)] = CellFlag::Solid;
        flags.flag_p[grid.index(2, 1, 1)] = CellFlag::Fluid;
        derive_face_flags(&grid, &mut flags);
        assert_eq!(flags.flag_u[grid.index(1, 1, 1)], CellFlag::Fluid);
    }

    #[test]
    fn test_unset_high_side_keeps_low_side_flag() {
        let (grid, mut flags) = setup(2, 1, 1);
        flags.flag_p[grid.index(1, 1, 1)] = CellFlag::Solid;
        derive_face_flags(&grid, &mut flags);
        assert_eq!(flags.flag_u[grid.index(1, 1, 1)], CellFlag::Solid);
        assert_eq!(flags.flag_u[grid.index(2, 1, 1)], CellFlag::Unset);
    }

    #[test]
    fn test_mark_cells_closed_box() {
        let (grid, mut flags) = setup(1, 1, 1);
        fill_ghost_layer(&grid, &mut flags, CellFlag::Solid);
        mark_cells(&grid, &mut flags);
        assert!(flags.flag_u.iter().all(|f| *f == CellFlag::Solid));
        assert!(flags.flag_w.iter().all(|f| *f == CellFlag::Solid));
    }
}
