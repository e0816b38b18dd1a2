//! Tile grid construction and id/coordinate conversion
//!
//! Partitions an image into equally sized square tiles laid out row-major.
//! Every tile keeps the grid coordinate it was cut from; that origin is
//! provenance for accuracy reporting only and never feeds reconstruction.

use crate::io::configuration::MAX_SEGMENT_SIZE;
use crate::io::error::{Result, configuration_error, out_of_range};
use crate::spatial::direction::Direction;

/// One square block of the source image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Row-major identity, `y * segments_wide + x`
    pub id: usize,
    /// Origin column in the source grid
    pub x: usize,
    /// Origin row in the source grid
    pub y: usize,
}

impl Tile {
    /// Top-left pixel of the tile's block in the source image
    pub const fn pixel_origin(&self, segment_size: u32) -> (u32, u32) {
        (self.x as u32 * segment_size, self.y as u32 * segment_size)
    }
}

/// Immutable set of tiles cut from one image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    segment_size: u32,
    segments_wide: usize,
    segments_tall: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Partition a `width` x `height` image into `segment_size` tiles
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - `segment_size` is zero or larger than `MAX_SEGMENT_SIZE`
    /// - Either dimension is not evenly divisible by `segment_size`
    /// - The resulting grid would contain no tiles
    pub fn new(width: u32, height: u32, segment_size: u32) -> Result<Self> {
        if segment_size == 0 || segment_size > MAX_SEGMENT_SIZE {
            return Err(configuration_error(&format!(
                "segment size {segment_size} must be between 1 and {MAX_SEGMENT_SIZE}"
            )));
        }
        if !width.is_multiple_of(segment_size) || !height.is_multiple_of(segment_size) {
            return Err(configuration_error(&format!(
                "image {width}x{height} is not divisible into {segment_size}px tiles"
            )));
        }

        let segments_wide = (width / segment_size) as usize;
        let segments_tall = (height / segment_size) as usize;
        if segments_wide == 0 || segments_tall == 0 {
            return Err(configuration_error(&format!(
                "image {width}x{height} contains no tiles"
            )));
        }

        let mut tiles = Vec::with_capacity(segments_wide * segments_tall);
        for y in 0..segments_tall {
            for x in 0..segments_wide {
                tiles.push(Tile {
                    id: y * segments_wide + x,
                    x,
                    y,
                });
            }
        }

        Ok(Self {
            segment_size,
            segments_wide,
            segments_tall,
            tiles,
        })
    }

    /// Edge length of every tile in pixels
    pub const fn segment_size(&self) -> u32 {
        self.segment_size
    }

    /// Number of tile columns
    pub const fn segments_wide(&self) -> usize {
        self.segments_wide
    }

    /// Number of tile rows
    pub const fn segments_tall(&self) -> usize {
        self.segments_tall
    }

    /// Total number of tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid has no tiles (never true for a constructed grid)
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in id order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile by id
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for ids outside the grid
    pub fn tile(&self, id: usize) -> Result<&Tile> {
        self.tiles
            .get(id)
            .ok_or_else(|| out_of_range("tile id", &id, &self.tiles.len()))
    }

    /// Row-major id of the tile originating at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error when `(x, y)` lies outside the grid
    pub fn coordinates_to_id(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.segments_wide || y >= self.segments_tall {
            return Err(out_of_range(
                "grid coordinate",
                &(x, y),
                &(self.segments_wide, self.segments_tall),
            ));
        }
        Ok(y * self.segments_wide + x)
    }

    /// Origin coordinate `(x, y)` of a tile id
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for ids outside the grid
    pub fn id_to_coordinates(&self, id: usize) -> Result<(usize, usize)> {
        if id >= self.tiles.len() {
            return Err(out_of_range("tile id", &id, &self.tiles.len()));
        }
        Ok((id % self.segments_wide, id / self.segments_wide))
    }

    /// The true neighbor of a tile in the source grid, if any
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error for ids outside the grid
    pub fn neighbor_id(&self, id: usize, direction: Direction) -> Result<Option<usize>> {
        let (x, y) = self.id_to_coordinates(id)?;
        let (dx, dy) = direction.offset();
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            return Ok(None);
        };
        if nx >= self.segments_wide || ny >= self.segments_tall {
            return Ok(None);
        }
        self.coordinates_to_id(nx, ny).map(Some)
    }
}
