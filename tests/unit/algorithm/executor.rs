//! Tests for solver configuration and pipeline orchestration

#[cfg(test)]
mod tests {
    use crate::fixtures::{continuity_image, solid_tiles};
    use tilestitch::SolverError;
    use tilestitch::algorithm::executor::{
        PlacementAccuracy, SolveReport, SolverConfig, analyze, solve,
    };
    use tilestitch::algorithm::matching::UnresolvedLink;
    use tilestitch::algorithm::reconstruction::SeedPolicy;
    use tilestitch::spatial::{Direction, PlacementGrid, TileGrid};

    fn config(segment_size: u32) -> SolverConfig {
        SolverConfig {
            segment_size,
            ..SolverConfig::default()
        }
    }

    // Tests defaults match the documented solver parameters
    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();

        assert_eq!(config.segment_size, 40);
        assert_eq!(config.candidate_capacity, 5);
        assert_eq!(config.match_depth, 5);
        assert_eq!(config.link_threshold, None);
        assert_eq!(config.seed_policy, SeedPolicy::BestCoverage);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    // Tests inconsistent parameters are rejected
    // Verified by allowing a match depth beyond the candidate lists
    #[test]
    fn test_config_validation() {
        let deep = SolverConfig {
            candidate_capacity: 3,
            match_depth: 4,
            ..SolverConfig::default()
        };
        let empty = SolverConfig {
            candidate_capacity: 0,
            ..SolverConfig::default()
        };

        for invalid in [deep, empty, config(0)] {
            assert!(matches!(
                invalid.validate(),
                Err(SolverError::InvalidParameter { .. })
            ));
        }
    }

    // Tests an indivisible image fails before any scoring
    #[test]
    fn test_analyze_rejects_indivisible_image() {
        let image = continuity_image(2, 2, 5);

        assert!(matches!(
            analyze(&image, &config(4), None),
            Err(SolverError::Configuration { .. })
        ));
    }

    // Tests a seamless image is reassembled exactly
    // Verified by seeding from the highest tile id on ties
    #[test]
    fn test_solve_seamless_image() {
        let image = continuity_image(3, 3, 4);
        let Ok(analysis) = analyze(&image, &config(4), None) else {
            unreachable!("a 12x12 image divides into 4px tiles");
        };
        let Ok(solution) = solve(&analysis, &config(4)) else {
            unreachable!("solving a valid analysis succeeds");
        };

        assert_eq!(solution.report.accuracy.correct, 9);
        assert_eq!(solution.report.gap, None);
        assert_eq!(solution.report.seed, 0);
        assert!(solution.links.is_symmetric());
        assert!(solution.report.isolated.is_empty());
        for tile in analysis.grid.tiles() {
            assert_eq!(solution.placement.position_of(tile.id), Some((tile.x, tile.y)));
        }
    }

    // Tests a single tile solves to itself with every direction isolated
    #[test]
    fn test_solve_single_tile() {
        let image = continuity_image(1, 1, 6);
        let Ok(analysis) = analyze(&image, &config(6), None) else {
            unreachable!("a 6x6 image is one 6px tile");
        };
        let Ok(solution) = solve(&analysis, &config(6)) else {
            unreachable!("solving a valid analysis succeeds");
        };

        assert_eq!(solution.report.isolated.len(), 4);
        assert_eq!(solution.report.unresolved.len(), 4);
        assert_eq!(solution.placement.get(0, 0), Some(0));
        assert_eq!(solution.report.gap, None);
    }

    // Tests identical inputs always give identical outcomes
    // Verified by resolving tiles in hash-map order
    #[test]
    fn test_solve_is_deterministic() {
        let image = solid_tiles(3, 3, 4, |_, _| [90, 90, 90]);
        let sequential = SolverConfig {
            parallel: false,
            ..config(4)
        };
        let first = analyze(&image, &config(4), None);
        let second = analyze(&image, &sequential, None);
        assert!(first.is_ok());
        assert_eq!(first.as_ref().ok(), second.as_ref().ok());

        let Ok(analysis) = first else {
            unreachable!("a 12x12 image divides into 4px tiles");
        };
        let runs: Vec<_> = (0..2)
            .filter_map(|_| solve(&analysis, &config(4)).ok())
            .collect();
        let [a, b] = runs.as_slice() else {
            unreachable!("both solves succeed");
        };
        assert_eq!(a.links, b.links);
        assert_eq!(a.placement, b.placement);
        assert!(a.links.is_symmetric());
    }

    // Tests accuracy ignores tiles placed away from their origin
    // Verified by counting every filled cell as correct
    #[test]
    fn test_accuracy_of_swapped_tiles() {
        let Ok(grid) = TileGrid::new(12, 4, 4) else {
            unreachable!("12x4 divides into 4px tiles");
        };
        let mut placement = PlacementGrid::new(3, 1, 3);
        let _ = placement.place(0, 0, 1);
        let _ = placement.place(1, 0, 0);
        let _ = placement.place(2, 0, 2);

        let accuracy = PlacementAccuracy::measure(&grid, &placement);
        assert_eq!((accuracy.correct, accuracy.total), (1, 3));
    }

    // Tests accuracy counts only tiles sitting in their origin cell
    #[test]
    fn test_placement_accuracy() {
        let Ok(grid) = TileGrid::new(8, 4, 4) else {
            unreachable!("8x4 divides into 4px tiles");
        };
        let mut placement = PlacementGrid::new(2, 1, 2);
        let _ = placement.place(0, 0, 0);

        let accuracy = PlacementAccuracy::measure(&grid, &placement);
        assert_eq!((accuracy.correct, accuracy.total), (1, 2));
        assert!((accuracy.ratio() - 0.5).abs() < f64::EPSILON);

        let empty = PlacementAccuracy {
            correct: 0,
            total: 0,
        };
        assert!(empty.ratio().abs() < f64::EPSILON);
    }

    // Tests unresolved directions are tallied per direction
    #[test]
    fn test_unresolved_by_direction() {
        let unresolved = [
            (0, Direction::North),
            (0, Direction::West),
            (1, Direction::North),
        ]
        .map(|(tile, direction)| UnresolvedLink { tile, direction })
        .to_vec();
        let report = SolveReport {
            isolated: Vec::new(),
            unresolved,
            gap: None,
            seed: 0,
            accuracy: PlacementAccuracy {
                correct: 2,
                total: 2,
            },
        };

        assert_eq!(
            report.unresolved_by_direction(),
            [
                (Direction::North, 2),
                (Direction::East, 0),
                (Direction::South, 0),
                (Direction::West, 1),
            ]
        );
    }
}
