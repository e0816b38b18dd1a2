//! Spatial data structures for tiles and layouts
//!
//! This module contains spatial-related functionality including:
//! - Cardinal directions and per-direction storage
//! - Tile grid construction and id/coordinate conversion
//! - The placement grid produced by reconstruction

/// Cardinal directions and per-direction containers
pub mod direction;
/// Placement grid for reconstructed layouts
pub mod placement;
/// Tile grid partitioning and coordinate bijections
pub mod tiles;

pub use direction::{Direction, PerDirection};
pub use placement::{PlacementGrid, PlacementOutcome};
pub use tiles::{Tile, TileGrid};
