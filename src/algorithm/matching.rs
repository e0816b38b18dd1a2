//! Mutual best-match resolution of candidate lists into confirmed links
//!
//! A link between tile `t` and candidate `c` in direction `d` is confirmed
//! when `c` sits at rank `i` of `t`'s `d` list and `t` sits at rank `j` of
//! `c`'s opposite list. Rank pairs `(i, j)` are tried in a fixed priority
//! order; each pair is a resolution round over all tiles (ascending id) and
//! directions (north, east, south, west), so every agreement at a better
//! pair is confirmed before any agreement at a worse one. Confirmed links are
//! written to both endpoints at once and are never revisited.

use log::debug;

use crate::analysis::ranking::CandidateTable;
use crate::io::error::{Result, SolverError, invalid_parameter, out_of_range};
use crate::spatial::{Direction, PerDirection};

/// Ranks at which a tile and its candidate must list each other
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RankPair {
    /// Rank of the candidate in the tile's own list
    pub own: usize,
    /// Rank of the tile in the candidate's opposite list
    pub reciprocal: usize,
}

/// Rank pairs over a `depth` x `depth` grid, closest to mutual top rank first
///
/// Ordered by the worse of the two ranks, then the better one, then with the
/// tile's own rank lower first. Depth 5 yields
/// `(0,0) (0,1) (1,0) (1,1) (0,2) (2,0) (1,2) (2,1) (2,2) (0,3) ...`.
pub fn priority_order(depth: usize) -> Vec<RankPair> {
    let mut order: Vec<RankPair> = (0..depth)
        .flat_map(|own| (0..depth).map(move |reciprocal| RankPair { own, reciprocal }))
        .collect();
    order.sort_by_key(|pair| {
        (
            pair.own.max(pair.reciprocal),
            pair.own.min(pair.reciprocal),
            pair.own > pair.reciprocal,
        )
    });
    order
}

/// Confirmed neighbors of one tile
pub type TileLinks = PerDirection<Option<usize>>;

/// A direction left without a confirmed neighbor
///
/// Expected for tiles on the puzzle border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnresolvedLink {
    /// Tile id
    pub tile: usize,
    /// Direction without a link
    pub direction: Direction,
}

/// Symmetric neighbor links for every tile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedLinks {
    links: Vec<TileLinks>,
}

impl ConfirmedLinks {
    /// No links for `tile_count` tiles
    pub fn new(tile_count: usize) -> Self {
        Self {
            links: vec![TileLinks::default(); tile_count],
        }
    }

    /// Number of tiles covered
    pub const fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no tiles are covered
    pub const fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Confirmed neighbor of `tile` in `direction`
    pub fn get(&self, tile: usize, direction: Direction) -> Option<usize> {
        self.links.get(tile).and_then(|links| *links.get(direction))
    }

    /// All links of one tile
    pub fn tile(&self, tile: usize) -> Option<&TileLinks> {
        self.links.get(tile)
    }

    /// Link `tile` to `neighbor` in `direction` and `neighbor` back to `tile`
    ///
    /// Returns `false` without changes when either side is already linked.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown or both are the same tile
    pub fn confirm(&mut self, tile: usize, direction: Direction, neighbor: usize) -> Result<bool> {
        if tile == neighbor {
            return Err(SolverError::SelfComparison { tile });
        }
        let tile_count = self.links.len();
        for id in [tile, neighbor] {
            if id >= tile_count {
                return Err(out_of_range("tile id", &id, &tile_count));
            }
        }
        if self.get(tile, direction).is_some()
            || self.get(neighbor, direction.opposite()).is_some()
        {
            return Ok(false);
        }

        if let Some(links) = self.links.get_mut(tile) {
            *links.get_mut(direction) = Some(neighbor);
        }
        if let Some(links) = self.links.get_mut(neighbor) {
            *links.get_mut(direction.opposite()) = Some(tile);
        }
        Ok(true)
    }

    /// Number of confirmed links, each counted once
    pub fn confirmed_count(&self) -> usize {
        // Each link is stored on both endpoints
        self.links
            .iter()
            .map(|links| {
                Direction::ALL
                    .into_iter()
                    .filter(|&direction| links.get(direction).is_some())
                    .count()
            })
            .sum::<usize>()
            / 2
    }

    /// Whether every link has its mirror on the other endpoint
    pub fn is_symmetric(&self) -> bool {
        self.links.iter().enumerate().all(|(tile, links)| {
            Direction::ALL.into_iter().all(|direction| {
                links.get(direction).is_none_or(|neighbor| {
                    self.get(neighbor, direction.opposite()) == Some(tile)
                })
            })
        })
    }

    /// Every `(tile, direction)` without a link, in id then direction order
    pub fn unresolved(&self) -> Vec<UnresolvedLink> {
        self.links
            .iter()
            .enumerate()
            .flat_map(|(tile, links)| {
                Direction::ALL
                    .into_iter()
                    .filter(|&direction| links.get(direction).is_none())
                    .map(move |direction| UnresolvedLink { tile, direction })
            })
            .collect()
    }
}

/// Resolves frozen candidate lists into confirmed links
#[derive(Clone, Debug)]
pub struct MutualMatcher {
    order: Vec<RankPair>,
    max_score: Option<u64>,
}

impl MutualMatcher {
    /// Matcher using the default priority order of `depth`
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if `depth` is zero
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(invalid_parameter(
                "match_depth",
                &depth,
                &"must try at least the top rank",
            ));
        }
        Ok(Self::with_order(priority_order(depth)))
    }

    /// Matcher using an explicit priority order
    pub const fn with_order(order: Vec<RankPair>) -> Self {
        Self {
            order,
            max_score: None,
        }
    }

    /// Refuse links whose score exceeds `max_score`
    #[must_use]
    pub const fn with_max_score(mut self, max_score: Option<u64>) -> Self {
        self.max_score = max_score;
        self
    }

    /// Rank pairs in the order they are tried
    pub fn order(&self) -> &[RankPair] {
        &self.order
    }

    fn within_threshold(&self, score: u64) -> bool {
        self.max_score.is_none_or(|max| score <= max)
    }

    /// Confirm links for every tile and direction the order can resolve
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if a candidate references a tile the
    /// table does not cover
    pub fn resolve(&self, table: &CandidateTable) -> Result<ConfirmedLinks> {
        let mut links = ConfirmedLinks::new(table.len());

        for pair in &self.order {
            let mut confirmed = 0usize;
            for tile in 0..table.len() {
                for direction in Direction::ALL {
                    if links.get(tile, direction).is_some() {
                        continue;
                    }
                    let Some(candidate) = table.list(tile, direction)?.get(pair.own) else {
                        continue;
                    };
                    if !self.within_threshold(candidate.score) {
                        continue;
                    }
                    let back = table.list(candidate.id, direction.opposite())?;
                    let mutual = back.rank_of(tile) == Some(pair.reciprocal)
                        && back
                            .get(pair.reciprocal)
                            .is_some_and(|entry| self.within_threshold(entry.score));
                    if mutual && links.confirm(tile, direction, candidate.id)? {
                        confirmed += 1;
                    }
                }
            }
            if confirmed > 0 {
                debug!(
                    "rank pair ({}, {}) confirmed {confirmed} links",
                    pair.own, pair.reciprocal
                );
            }
        }

        Ok(links)
    }
}
