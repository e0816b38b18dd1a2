//! Placement of tiles by walking confirmed links
//!
//! A reconstruction runs in three phases from a seed anchored at `(0, 0)`:
//!
//! 1. Column walk: follow South links down column 0.
//! 2. Row walks: from every filled column-0 cell, follow East links.
//! 3. Gap fill: repeatedly give an empty cell the unplaced tile linked from
//!    a filled neighbor cell, then walk east from it, until nothing changes.
//!
//! Every walk stops on a missing link, the grid edge, a filled cell, or a
//! tile that already sits elsewhere. Nothing is ever overwritten; cells no
//! link reaches stay empty and are reported as a gap.

use log::debug;

use crate::algorithm::matching::ConfirmedLinks;
use crate::io::error::{Result, out_of_range};
use crate::spatial::{Direction, PlacementGrid, PlacementOutcome, TileGrid};

/// Why a walk ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStop {
    /// The current tile has no link in the walk direction
    MissingLink,
    /// The next cell lies outside the grid
    OutOfBounds,
    /// The next cell already holds a tile
    CellOccupied,
    /// The linked tile already sits in another cell
    AlreadyPlaced,
}

/// How the walk's first tile is chosen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Trial every tile and keep the one that places the most cells
    ///
    /// Ties prefer the layout with more linked adjacent cells, then tiles
    /// with neither a north nor a west link, then the lowest id.
    #[default]
    BestCoverage,
    /// Start from a specific tile
    Explicit(usize),
}

/// Cells left empty after reconstruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconstructionGap {
    /// Empty cells as `(col, row)`
    pub empty_cells: Vec<(usize, usize)>,
    /// Tiles that were never placed
    pub unplaced_tiles: Vec<usize>,
}

impl ReconstructionGap {
    /// Number of unfilled cells
    pub const fn len(&self) -> usize {
        self.empty_cells.len()
    }

    /// Whether every cell was filled
    pub const fn is_empty(&self) -> bool {
        self.empty_cells.is_empty()
    }
}

/// Output of a reconstruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    /// Placed layout
    pub placement: PlacementGrid,
    /// Seed tile placed at `(0, 0)`
    pub seed: usize,
    /// Unfilled cells, if any
    pub gap: Option<ReconstructionGap>,
}

/// Builds a placement grid from confirmed links
#[derive(Clone, Copy, Debug, Default)]
pub struct GridReconstructor {
    seed_policy: SeedPolicy,
}

impl GridReconstructor {
    /// Reconstructor with the given seed policy
    pub const fn new(seed_policy: SeedPolicy) -> Self {
        Self { seed_policy }
    }

    /// Place tiles into a grid shaped like `grid`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `links` does not cover the same number of tiles as `grid`
    /// - An explicit seed is not a tile of `grid`
    pub fn reconstruct(&self, grid: &TileGrid, links: &ConfirmedLinks) -> Result<Reconstruction> {
        if links.len() != grid.len() {
            return Err(out_of_range("link table size", &links.len(), &grid.len()));
        }

        let seed = match self.seed_policy {
            SeedPolicy::Explicit(tile) => grid.tile(tile)?.id,
            SeedPolicy::BestCoverage => select_seed(grid, links)?,
        };
        let placement = walk_from(grid, links, seed)?;

        let empty_cells = placement.empty_cells();
        let gap = (!empty_cells.is_empty()).then(|| ReconstructionGap {
            empty_cells,
            unplaced_tiles: placement.unplaced_tiles(),
        });

        Ok(Reconstruction {
            placement,
            seed,
            gap,
        })
    }
}

fn is_corner_candidate(links: &ConfirmedLinks, tile: usize) -> bool {
    links.get(tile, Direction::North).is_none() && links.get(tile, Direction::West).is_none()
}

/// Adjacent filled cell pairs whose tiles are linked to each other
pub fn placement_agreement(placement: &PlacementGrid, links: &ConfirmedLinks) -> usize {
    placement
        .iter()
        .filter_map(|(cell, tile)| tile.map(|tile| (cell, tile)))
        .map(|(cell, tile)| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter(|&direction| {
                    step(placement, cell, direction)
                        .and_then(|(col, row)| placement.get(col, row))
                        .is_some_and(|neighbor| links.get(tile, direction) == Some(neighbor))
                })
                .count()
        })
        .sum()
}

// Trial walk from every tile; the first seed with the best
// (coverage, agreement, corner) key wins
fn select_seed(grid: &TileGrid, links: &ConfirmedLinks) -> Result<usize> {
    let mut best: Option<((usize, usize, bool), usize)> = None;
    for tile in grid.tiles() {
        let trial = walk_from(grid, links, tile.id)?;
        let key = (
            trial.filled_count(),
            placement_agreement(&trial, links),
            is_corner_candidate(links, tile.id),
        );
        if best.is_none_or(|(best_key, _)| key > best_key) {
            best = Some((key, tile.id));
        }
    }
    let ((coverage, agreement, corner), seed) =
        best.ok_or_else(|| out_of_range("tile id", &0, &grid.len()))?;
    debug!(
        "seed tile {seed} covers {coverage} cells with {agreement} linked adjacencies (corner candidate: {corner})"
    );
    Ok(seed)
}

fn walk_from(grid: &TileGrid, links: &ConfirmedLinks, seed: usize) -> Result<PlacementGrid> {
    let mut placement = PlacementGrid::new(grid.segments_wide(), grid.segments_tall(), grid.len());
    placement.place(0, 0, seed)?;

    walk(&mut placement, links, (0, 0), Direction::South)?;
    for row in 0..placement.rows() {
        if placement.get(0, row).is_some() {
            walk(&mut placement, links, (0, row), Direction::East)?;
        }
    }
    fill_gaps(&mut placement, links)?;

    Ok(placement)
}

fn step(placement: &PlacementGrid, cell: (usize, usize), direction: Direction) -> Option<(usize, usize)> {
    let (dx, dy) = direction.offset();
    let col = cell.0.checked_add_signed(dx)?;
    let row = cell.1.checked_add_signed(dy)?;
    placement.in_bounds(col, row).then_some((col, row))
}

/// Follow `direction` links from the tile at `start` until a stop condition
///
/// # Errors
///
/// Returns an out-of-range error if `start` is outside the grid or a link
/// references a tile the grid was not sized for
pub fn walk(
    placement: &mut PlacementGrid,
    links: &ConfirmedLinks,
    start: (usize, usize),
    direction: Direction,
) -> Result<WalkStop> {
    let mut cell = start;
    let mut current = placement
        .get(start.0, start.1)
        .ok_or_else(|| out_of_range("walk start", &start, &(placement.cols(), placement.rows())))?;

    loop {
        let Some(next) = links.get(current, direction) else {
            return Ok(WalkStop::MissingLink);
        };
        let Some(target) = step(placement, cell, direction) else {
            return Ok(WalkStop::OutOfBounds);
        };
        match placement.place(target.0, target.1, next)? {
            PlacementOutcome::Placed => {
                cell = target;
                current = next;
            }
            PlacementOutcome::CellOccupied => return Ok(WalkStop::CellOccupied),
            PlacementOutcome::AlreadyPlaced => return Ok(WalkStop::AlreadyPlaced),
        }
    }
}

// Tile an empty cell can take from its filled neighbors
fn linked_candidate(
    placement: &PlacementGrid,
    links: &ConfirmedLinks,
    cell: (usize, usize),
) -> Option<usize> {
    // Look from the empty cell toward each neighbor; the neighbor's link
    // pointing back at us names the tile
    [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ]
    .into_iter()
    .find_map(|toward| {
        let (col, row) = step(placement, cell, toward)?;
        let neighbor = placement.get(col, row)?;
        links
            .get(neighbor, toward.opposite())
            .filter(|&tile| !placement.is_placed(tile))
    })
}

fn fill_gaps(placement: &mut PlacementGrid, links: &ConfirmedLinks) -> Result<()> {
    loop {
        let mut progressed = false;
        for (col, row) in placement.empty_cells() {
            if placement.get(col, row).is_some() {
                continue;
            }
            let Some(tile) = linked_candidate(placement, links, (col, row)) else {
                continue;
            };
            if placement.place(col, row, tile)? == PlacementOutcome::Placed {
                progressed = true;
                walk(placement, links, (col, row), Direction::East)?;
            }
        }
        if !progressed {
            return Ok(());
        }
    }
}
