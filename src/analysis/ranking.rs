//! Bounded candidate ranking over the pairwise affinity pass
//!
//! Every ordered pair of distinct tiles is scored in all four directions and
//! offered to the owning tile's ranker, which keeps the `capacity` lowest
//! scores per direction. Each tile's ranking is an independent work unit, so
//! the outer loop shards across threads and the per-tile results are merged
//! into a frozen [`CandidateTable`] in id order.

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::affinity::TileEdges;
use crate::analysis::pixels::PixelSource;
use crate::io::error::{Result, SolverError, invalid_parameter, out_of_range};
use crate::spatial::{Direction, PerDirection, TileGrid};

/// A proposed neighbor with its affinity score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateNeighbor {
    /// Candidate tile id
    pub id: usize,
    /// Edge dissimilarity, lower is better
    pub score: u64,
}

/// Candidates for one tile and direction, ascending by score
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateList {
    entries: Vec<CandidateNeighbor>,
}

impl CandidateList {
    /// Offer a candidate to a list bounded at `capacity`
    ///
    /// The candidate is kept when the list has room or it beats the current
    /// worst entry. Sorting is stable, so equal scores keep offer order.
    /// Returns whether the candidate was inserted.
    pub fn consider(&mut self, candidate: CandidateNeighbor, capacity: usize) -> bool {
        let has_room = self.entries.len() < capacity;
        let beats_worst = self
            .entries
            .last()
            .is_some_and(|worst| candidate.score < worst.score);
        if !has_room && !beats_worst {
            return false;
        }

        self.entries.push(candidate);
        self.entries.sort_by_key(|entry| entry.score);
        self.entries.truncate(capacity);
        true
    }

    /// Entries in rank order
    pub fn entries(&self) -> &[CandidateNeighbor] {
        &self.entries
    }

    /// Entry at a rank, best first
    pub fn get(&self, rank: usize) -> Option<&CandidateNeighbor> {
        self.entries.get(rank)
    }

    /// Best candidate, if any
    pub fn best(&self) -> Option<&CandidateNeighbor> {
        self.entries.first()
    }

    /// Rank of a tile id within the list
    pub fn rank_of(&self, id: usize) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate was recorded
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four candidate lists of one tile
pub type TileCandidates = PerDirection<CandidateList>;

/// Accumulates candidates for a single owning tile
#[derive(Debug)]
pub struct CandidateRanker {
    owner: usize,
    capacity: usize,
    lists: TileCandidates,
}

impl CandidateRanker {
    /// Start an empty ranking for `owner`
    pub fn new(owner: usize, capacity: usize) -> Self {
        Self {
            owner,
            capacity,
            lists: TileCandidates::default(),
        }
    }

    /// Offer `candidate` with `score` as the owner's `direction` neighbor
    ///
    /// # Errors
    ///
    /// Returns a self-comparison error if `candidate` is the owning tile
    pub fn consider(&mut self, direction: Direction, candidate: usize, score: u64) -> Result<bool> {
        if candidate == self.owner {
            return Err(SolverError::SelfComparison { tile: self.owner });
        }
        Ok(self.lists.get_mut(direction).consider(
            CandidateNeighbor {
                id: candidate,
                score,
            },
            self.capacity,
        ))
    }

    /// Freeze the accumulated lists
    pub fn snapshot(self) -> TileCandidates {
        self.lists
    }
}

/// A tile that ended the pass with no candidate in some direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsolatedTile {
    /// Tile id
    pub tile: usize,
    /// Direction without any candidate
    pub direction: Direction,
}

/// Frozen candidate lists for every tile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateTable {
    capacity: usize,
    rows: Vec<TileCandidates>,
}

impl CandidateTable {
    /// Assemble a table from per-tile results in id order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any list exceeds `capacity` or is not sorted ascending
    /// - Any entry references its own tile or an id outside the table
    pub fn from_rows(capacity: usize, rows: Vec<TileCandidates>) -> Result<Self> {
        let tile_count = rows.len();
        for (tile, candidates) in rows.iter().enumerate() {
            for direction in Direction::ALL {
                let list = candidates.get(direction);
                if list.len() > capacity {
                    return Err(invalid_parameter(
                        "candidates",
                        &format!("tile {tile} {direction}: {} entries", list.len()),
                        &format!("exceeds capacity {capacity}"),
                    ));
                }
                if list.entries().windows(2).any(|w| match w {
                    [a, b] => a.score > b.score,
                    _ => false,
                }) {
                    return Err(invalid_parameter(
                        "candidates",
                        &format!("tile {tile} {direction}"),
                        &"entries are not sorted by score",
                    ));
                }
                for entry in list.entries() {
                    if entry.id == tile {
                        return Err(SolverError::SelfComparison { tile });
                    }
                    if entry.id >= tile_count {
                        return Err(out_of_range("candidate id", &entry.id, &tile_count));
                    }
                }
            }
        }
        Ok(Self { capacity, rows })
    }

    /// Maximum entries per list
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tiles covered
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table covers no tiles
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All lists of one tile
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for unknown tile ids
    pub fn tile(&self, tile: usize) -> Result<&TileCandidates> {
        self.rows
            .get(tile)
            .ok_or_else(|| out_of_range("tile id", &tile, &self.rows.len()))
    }

    /// One tile's list for a direction
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for unknown tile ids
    pub fn list(&self, tile: usize, direction: Direction) -> Result<&CandidateList> {
        self.tile(tile).map(|lists| lists.get(direction))
    }

    /// Per-tile lists in id order
    pub fn rows(&self) -> &[TileCandidates] {
        &self.rows
    }

    /// Every `(tile, direction)` whose list is empty
    pub fn isolated_tiles(&self) -> Vec<IsolatedTile> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(tile, lists)| {
                Direction::ALL
                    .into_iter()
                    .filter(|&direction| lists.get(direction).is_empty())
                    .map(move |direction| IsolatedTile { tile, direction })
            })
            .collect()
    }
}

/// Rank every other tile as a neighbor of `current`
///
/// # Errors
///
/// Returns an error if `edges` does not cover `current`
pub fn rank_tile(edges: &[TileEdges], current: usize, capacity: usize) -> Result<TileCandidates> {
    let own = edges
        .get(current)
        .ok_or_else(|| out_of_range("tile id", &current, &edges.len()))?;
    let mut ranker = CandidateRanker::new(current, capacity);

    for (test, other) in edges.iter().enumerate() {
        if test == current {
            continue;
        }
        // A good match in one direction says nothing about the others
        for direction in Direction::ALL {
            ranker.consider(direction, test, own.score_against(other, direction))?;
        }
    }

    Ok(ranker.snapshot())
}

/// Run the full pairwise affinity pass
///
/// `progress`, when given, is advanced once per ranked tile.
///
/// # Errors
///
/// Returns an error if:
/// - `capacity` is zero
/// - A tile's pixels cannot be read from `source`
pub fn rank_candidates<P: PixelSource + ?Sized>(
    source: &P,
    grid: &TileGrid,
    capacity: usize,
    parallel: bool,
    progress: Option<&ProgressBar>,
) -> Result<CandidateTable> {
    if capacity == 0 {
        return Err(invalid_parameter(
            "candidate_capacity",
            &capacity,
            &"must keep at least one candidate",
        ));
    }

    let edges = (0..grid.len())
        .map(|tile| TileEdges::extract(source, grid, tile))
        .collect::<Result<Vec<_>>>()?;

    let rank = |current: usize| {
        let lists = rank_tile(&edges, current, capacity);
        if let Some(bar) = progress {
            bar.inc(1);
        }
        lists
    };

    let rows = if parallel {
        (0..grid.len())
            .into_par_iter()
            .map(rank)
            .collect::<Result<Vec<_>>>()?
    } else {
        (0..grid.len()).map(rank).collect::<Result<Vec<_>>>()?
    };

    CandidateTable::from_rows(capacity, rows)
}
