//! Pipeline orchestration from pixels to placement
//!
//! [`analyze`] runs the tile grid builder and the pairwise affinity pass,
//! producing the frozen [`Analysis`] that can be persisted and reused.
//! [`solve`] resolves links and reconstructs the layout from an analysis.

use indicatif::ProgressBar;
use log::{debug, info, warn};

use crate::algorithm::matching::{ConfirmedLinks, MutualMatcher, UnresolvedLink};
use crate::algorithm::reconstruction::{GridReconstructor, ReconstructionGap, SeedPolicy};
use crate::analysis::pixels::PixelSource;
use crate::analysis::ranking::{CandidateTable, IsolatedTile, rank_candidates};
use crate::io::configuration::{
    DEFAULT_CANDIDATE_CAPACITY, DEFAULT_MATCH_DEPTH, DEFAULT_SEGMENT_SIZE,
};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::{Direction, PlacementGrid, TileGrid};

/// Solver parameters controlling ranking, matching and seeding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Edge length of a tile in pixels
    pub segment_size: u32,
    /// Candidates kept per tile and direction
    pub candidate_capacity: usize,
    /// Depth of the mutual-rank priority ordering
    pub match_depth: usize,
    /// Highest score a confirmed link may have
    pub link_threshold: Option<u64>,
    /// Seed selection for reconstruction
    pub seed_policy: SeedPolicy,
    /// Shard the affinity pass across threads
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            candidate_capacity: DEFAULT_CANDIDATE_CAPACITY,
            match_depth: DEFAULT_MATCH_DEPTH,
            link_threshold: None,
            seed_policy: SeedPolicy::default(),
            parallel: true,
        }
    }
}

impl SolverConfig {
    /// Check parameter consistency
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if:
    /// - `segment_size`, `candidate_capacity` or `match_depth` is zero
    /// - `match_depth` exceeds `candidate_capacity`
    pub fn validate(&self) -> Result<()> {
        if self.segment_size == 0 {
            return Err(invalid_parameter(
                "segment_size",
                &self.segment_size,
                &"must be positive",
            ));
        }
        if self.candidate_capacity == 0 {
            return Err(invalid_parameter(
                "candidate_capacity",
                &self.candidate_capacity,
                &"must keep at least one candidate",
            ));
        }
        if self.match_depth == 0 || self.match_depth > self.candidate_capacity {
            return Err(invalid_parameter(
                "match_depth",
                &self.match_depth,
                &format!("must be between 1 and {}", self.candidate_capacity),
            ));
        }
        Ok(())
    }
}

/// Tile grid plus frozen candidate lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    /// Tiles cut from the source
    pub grid: TileGrid,
    /// Ranked neighbor candidates per tile and direction
    pub candidates: CandidateTable,
}

impl Analysis {
    /// Every `(tile, direction)` that received no candidate
    pub fn isolated_tiles(&self) -> Vec<IsolatedTile> {
        self.candidates.isolated_tiles()
    }
}

/// Cells whose placed tile is the one originally cut from them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementAccuracy {
    /// Correctly placed tiles
    pub correct: usize,
    /// Total cells
    pub total: usize,
}

impl PlacementAccuracy {
    /// Compare a placement against the tiles' origin coordinates
    pub fn measure(grid: &TileGrid, placement: &PlacementGrid) -> Self {
        let correct = grid
            .tiles()
            .iter()
            .filter(|tile| placement.position_of(tile.id) == Some((tile.x, tile.y)))
            .count();
        Self {
            correct,
            total: grid.len(),
        }
    }

    /// Correct fraction in `[0, 1]`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Non-fatal outcomes of a solve
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveReport {
    /// Tiles without any candidate in some direction
    pub isolated: Vec<IsolatedTile>,
    /// Directions left without a confirmed link
    pub unresolved: Vec<UnresolvedLink>,
    /// Cells left empty by reconstruction
    pub gap: Option<ReconstructionGap>,
    /// Seed tile placed at `(0, 0)`
    pub seed: usize,
    /// Agreement of the placement with the original layout
    pub accuracy: PlacementAccuracy,
}

impl SolveReport {
    /// Unresolved directions per direction, in `Direction::ALL` order
    pub fn unresolved_by_direction(&self) -> [(Direction, usize); 4] {
        let mut counts = [0usize; 4];
        for link in &self.unresolved {
            if let Some(count) = counts.get_mut(link.direction.index()) {
                *count += 1;
            }
        }
        Direction::ALL.map(|direction| {
            (
                direction,
                counts.get(direction.index()).copied().unwrap_or_default(),
            )
        })
    }
}

/// Confirmed links, final layout and report
#[derive(Clone, Debug)]
pub struct Solution {
    /// Symmetric neighbor links
    pub links: ConfirmedLinks,
    /// Reconstructed layout
    pub placement: PlacementGrid,
    /// Warnings and outcomes
    pub report: SolveReport,
}

/// Build the tile grid and run the pairwise affinity pass
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The image cannot be divided into `segment_size` tiles
/// - Pixel access fails during the pass
pub fn analyze<P: PixelSource + ?Sized>(
    source: &P,
    config: &SolverConfig,
    progress: Option<&ProgressBar>,
) -> Result<Analysis> {
    config.validate()?;
    let (width, height) = source.dimensions();
    let grid = TileGrid::new(width, height, config.segment_size)?;
    info!(
        "scoring {} tiles ({}x{} of {}px)",
        grid.len(),
        grid.segments_wide(),
        grid.segments_tall(),
        grid.segment_size()
    );

    let candidates = rank_candidates(
        source,
        &grid,
        config.candidate_capacity,
        config.parallel,
        progress,
    )?;
    Ok(Analysis { grid, candidates })
}

/// Resolve links and reconstruct a layout from a finished analysis
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The candidate table references tiles outside the grid
/// - An explicit seed tile does not exist
pub fn solve(analysis: &Analysis, config: &SolverConfig) -> Result<Solution> {
    config.validate()?;
    let isolated = analysis.isolated_tiles();
    for entry in &isolated {
        warn!(
            "tile {} has no {} candidates; it cannot be linked that way",
            entry.tile, entry.direction
        );
    }

    let links = MutualMatcher::new(config.match_depth)?
        .with_max_score(config.link_threshold)
        .resolve(&analysis.candidates)?;
    let unresolved = links.unresolved();
    info!(
        "confirmed {} links, {} directions unresolved",
        links.confirmed_count(),
        unresolved.len()
    );

    let reconstruction =
        GridReconstructor::new(config.seed_policy).reconstruct(&analysis.grid, &links)?;
    if let Some(gap) = &reconstruction.gap {
        warn!(
            "{} cells left empty, {} tiles unplaced",
            gap.len(),
            gap.unplaced_tiles.len()
        );
    }

    let accuracy = PlacementAccuracy::measure(&analysis.grid, &reconstruction.placement);
    debug!(
        "{} of {} tiles in their original cell",
        accuracy.correct, accuracy.total
    );

    Ok(Solution {
        links,
        placement: reconstruction.placement,
        report: SolveReport {
            isolated,
            unresolved,
            gap: reconstruction.gap,
            seed: reconstruction.seed,
            accuracy,
        },
    })
}
