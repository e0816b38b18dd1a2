//! Solver constants and runtime configuration defaults

// Tile geometry
/// Edge length of a square tile in pixels
pub const DEFAULT_SEGMENT_SIZE: u32 = 40;

// Safety limit to prevent degenerate grids
/// Maximum allowed segment size in pixels
pub const MAX_SEGMENT_SIZE: u32 = 4096;

// Candidate ranking
/// Number of best candidates kept per tile and direction
pub const DEFAULT_CANDIDATE_CAPACITY: usize = 5;

/// Depth of the mutual-rank priority ordering (depth² rank pairs)
pub const DEFAULT_MATCH_DEPTH: usize = 5;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to reconstructed image filenames
pub const OUTPUT_SUFFIX: &str = "_solved";
/// Suffix and extension of persisted analysis files
pub const ANALYSIS_SUFFIX: &str = "_analysis.json";
/// Fill color for cells no tile was placed into
pub const GAP_COLOR: [u8; 4] = [255, 0, 0, 255];
