//! The loam terrain data model.
//!
//! # Heights
//!
//! Ground elevation is a 2D grid of quantized heights. Each cell stores a signed integer `truncate(height * compression
//! factor)`; with the default factor of 100, heights carry two decimal digits. The grid also has an informational altitude
//! ceiling (`size_z`) that is never used as a storage axis.
//!
//! # Patches
//!
//! The grid is partitioned into [`PATCH_SIZE`] x [`PATCH_SIZE`] patches. Any write that changes a stored value marks the
//! containing patch dirty. Dirty flags live in a [`DirtyPatches`] that can be shared with another thread which drains them on a
//! fixed polling interval to build network updates.
//!
//! # Persistence
//!
//! A [`HeightGrid`] can be stored as a [`TerrainBlob`] in one of two binary layouts, selected by grid size and identified by a
//! [`FormatTag`]. It can also be written as one of two XML documents, distinguished by their root element. Both binary layouts
//! must stay byte-compatible with terrain that was stored long ago, so their layouts are fixed.

mod codec;
mod dirty;
mod format;
mod height_grid;
mod snapshot;

pub use codec::*;
pub use dirty::*;
pub use format::*;
pub use height_grid::*;
pub use snapshot::*;

pub use loam_core as core;
pub use loam_core::glam;

/// Edge length of the square unit of change tracking.
pub const PATCH_SIZE: u32 = 16;

/// The edge length of every region before variable region sizes existed. Grids of exactly this size are persisted in the legacy
/// layouts.
pub const LEGACY_REGION_SIZE: u32 = 256;

pub const DEFAULT_COMPRESSION_FACTOR: f32 = 100.0;

/// The height used when nobody specified one.
pub const DEFAULT_TERRAIN_HEIGHT: f64 = 21.0;

pub const DEFAULT_ALTITUDE: u32 = 4096;
