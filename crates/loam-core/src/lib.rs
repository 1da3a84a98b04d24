pub mod bitset;
pub mod extent;
pub mod grid2;

pub use bitset::AtomicBitset;
pub use extent::Extent2i;
pub use grid2::Grid2;

// Re-exports.
pub use approx;
pub use glam;
pub use static_assertions;
