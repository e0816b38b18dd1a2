/// Edge affinity scoring between tile boundaries
pub mod affinity;
/// Pixel access capability over decoded images
pub mod pixels;
/// Bounded candidate ranking and the pairwise affinity pass
pub mod ranking;
