//! Cardinal directions shared by scoring, ranking, and linking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which edge of a tile is matched against a neighbor's opposite edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Top edge
    North,
    /// Right edge
    East,
    /// Bottom edge
    South,
    /// Left edge
    West,
}

impl Direction {
    /// All directions in resolution order
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The edge a neighbor in this direction touches
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Stable index into per-direction storage
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Grid step `(dx, dy)` toward the neighbor, y growing southward
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// One value per direction, indexed by [`Direction`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDirection<T> {
    /// Value for the top edge
    pub north: T,
    /// Value for the right edge
    pub east: T,
    /// Value for the bottom edge
    pub south: T,
    /// Value for the left edge
    pub west: T,
}

impl<T> PerDirection<T> {
    /// Build from a function of the direction
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            north: f(Direction::North),
            east: f(Direction::East),
            south: f(Direction::South),
            west: f(Direction::West),
        }
    }

    /// Borrow the value for a direction
    pub const fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    /// Mutably borrow the value for a direction
    pub const fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }
}
