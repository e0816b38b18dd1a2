//! Reassembly of shuffled square-tile jigsaw images from edge affinities
//!
//! The image is cut into a known grid of equally sized tiles. Every ordered
//! pair of tiles is scored by how well their touching edges agree, the best
//! few candidates per tile and direction are kept, mutual best matches are
//! confirmed as neighbor links, and the links are walked to lay the tiles
//! back out on a grid.

#![forbid(unsafe_code)]

/// Link resolution, grid reconstruction, and pipeline orchestration
pub mod algorithm;
/// Pixel access, edge scoring, and candidate ranking
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Tiles, directions, and placement grids
pub mod spatial;

pub use io::error::{Result, SolverError};
