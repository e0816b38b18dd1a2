//! Tests for the placement grid and its uniqueness guarantees

#[cfg(test)]
mod tests {
    use tilestitch::SolverError;
    use tilestitch::spatial::{PlacementGrid, PlacementOutcome};

    // Tests a fresh grid is entirely empty
    #[test]
    fn test_new_grid_is_empty() {
        let grid = PlacementGrid::new(3, 2, 6);

        assert_eq!((grid.cols(), grid.rows()), (3, 2));
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.empty_cells().len(), 6);
        assert_eq!(grid.unplaced_tiles(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(grid.get(2, 1), None);
    }

    // Tests a filled cell is never overwritten
    // Verified by assigning the cell before the occupancy check
    #[test]
    fn test_occupied_cell_is_kept() {
        let mut grid = PlacementGrid::new(2, 2, 4);

        assert_eq!(grid.place(0, 0, 1).ok(), Some(PlacementOutcome::Placed));
        assert_eq!(grid.place(0, 0, 2).ok(), Some(PlacementOutcome::CellOccupied));
        assert_eq!(grid.get(0, 0), Some(1));
        assert!(!grid.is_placed(2));
    }

    // Tests a tile never lands in two cells
    // Verified by skipping the placed-bit check
    #[test]
    fn test_tile_placed_once() {
        let mut grid = PlacementGrid::new(2, 2, 4);

        assert_eq!(grid.place(1, 0, 3).ok(), Some(PlacementOutcome::Placed));
        assert_eq!(grid.place(0, 1, 3).ok(), Some(PlacementOutcome::AlreadyPlaced));
        assert_eq!(grid.position_of(3), Some((1, 0)));
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.filled_count(), 1);
    }

    // Tests out-of-grid cells and unknown tiles are rejected
    // Verified by clamping the cell coordinate
    #[test]
    fn test_out_of_range_placement() {
        let mut grid = PlacementGrid::new(2, 2, 4);

        assert!(matches!(
            grid.place(2, 0, 0),
            Err(SolverError::OutOfRange { .. })
        ));
        assert!(matches!(
            grid.place(0, 0, 4),
            Err(SolverError::OutOfRange { .. })
        ));
        assert!(!grid.in_bounds(0, 2));
    }

    // Tests iteration is row-major with (col, row) addressing
    // Verified by iterating column-major
    #[test]
    fn test_iteration_order() {
        let mut grid = PlacementGrid::new(2, 2, 4);
        let _ = grid.place(1, 0, 0);
        let _ = grid.place(0, 1, 2);

        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(
            cells,
            vec![((0, 0), None), ((1, 0), Some(0)), ((0, 1), Some(2)), ((1, 1), None)]
        );
        assert_eq!(grid.empty_cells(), vec![(0, 0), (1, 1)]);
        assert_eq!(grid.unplaced_tiles(), vec![1, 3]);
    }
}
