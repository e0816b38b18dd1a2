/// Pipeline orchestration from pixels to placement
pub mod executor;
/// Mutual best-match resolution into confirmed links
pub mod matching;
/// Placement walks over confirmed links
pub mod reconstruction;
