//! Edge affinity scoring between tiles
//!
//! The score of `(a, b, direction)` compares the `direction` edge of tile `a`
//! with the opposite edge of tile `b`, pixel by pixel along the shared line,
//! summing absolute R, G and B differences. Lower means more similar; two
//! pixel-identical edges score exactly zero.

use crate::analysis::pixels::{Color, PixelSource};
use crate::io::error::{Result, SolverError};
use crate::spatial::{Direction, PerDirection, TileGrid};

/// The four boundary strips of one tile
///
/// Rows run west to east, columns north to south, so index `i` of opposing
/// strips always refers to the same position along the shared line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileEdges {
    strips: PerDirection<Vec<Color>>,
}

impl TileEdges {
    /// Read the boundary pixels of a tile from the source image
    ///
    /// # Errors
    ///
    /// Returns an error if the tile id is outside the grid or its block
    /// extends past the image
    pub fn extract<P: PixelSource + ?Sized>(
        source: &P,
        grid: &TileGrid,
        tile: usize,
    ) -> Result<Self> {
        let size = grid.segment_size();
        let (left, top) = grid.tile(tile)?.pixel_origin(size);
        let (right, bottom) = (left + size - 1, top + size - 1);

        let row = |y: u32| -> Result<Vec<Color>> {
            (0..size).map(|i| source.pixel(left + i, y)).collect()
        };
        let column = |x: u32| -> Result<Vec<Color>> {
            (0..size).map(|i| source.pixel(x, top + i)).collect()
        };

        Ok(Self {
            strips: PerDirection {
                north: row(top)?,
                east: column(right)?,
                south: row(bottom)?,
                west: column(left)?,
            },
        })
    }

    /// Pixels along one edge
    pub fn strip(&self, direction: Direction) -> &[Color] {
        self.strips.get(direction)
    }

    /// Affinity of this tile's `direction` edge against `other`'s opposite edge
    pub fn score_against(&self, other: &Self, direction: Direction) -> u64 {
        strip_distance(self.strip(direction), other.strip(direction.opposite()))
    }
}

/// Sum of RGB distances between two aligned edge strips
pub fn strip_distance(a: &[Color], b: &[Color]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(pa, pb)| u64::from(pa.rgb_distance(*pb)))
        .sum()
}

/// Score the `direction` edge of `tile_a` against the opposite edge of `tile_b`
///
/// Reads pixels straight from the source; the ranking pass uses
/// [`TileEdges`] to read each tile once instead.
///
/// # Errors
///
/// Returns an error if:
/// - `tile_a` and `tile_b` are the same tile
/// - Either id is outside the grid
/// - A sampled pixel lies outside the image
pub fn edge_score<P: PixelSource + ?Sized>(
    source: &P,
    grid: &TileGrid,
    tile_a: usize,
    tile_b: usize,
    direction: Direction,
) -> Result<u64> {
    if tile_a == tile_b {
        return Err(SolverError::SelfComparison { tile: tile_a });
    }

    let size = grid.segment_size();
    let (ax, ay) = grid.tile(tile_a)?.pixel_origin(size);
    let (bx, by) = grid.tile(tile_b)?.pixel_origin(size);
    let last = size - 1;

    let mut score = 0u64;
    for i in 0..size {
        let (pa, pb) = match direction {
            Direction::North => ((ax + i, ay), (bx + i, by + last)),
            Direction::East => ((ax + last, ay + i), (bx, by + i)),
            Direction::South => ((ax + i, ay + last), (bx + i, by)),
            Direction::West => ((ax, ay + i), (bx + last, by + i)),
        };
        let color_a = source.pixel(pa.0, pa.1)?;
        let color_b = source.pixel(pb.0, pb.1)?;
        score += u64::from(color_a.rgb_distance(color_b));
    }

    Ok(score)
}
