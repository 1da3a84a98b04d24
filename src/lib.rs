//! Region terrain for a virtual-world server.
//!
//! A [`Surface`] wraps a [`HeightGrid`](loam_map::HeightGrid) with a bounds-forgiving API: reads outside the region return
//! zero and writes outside the region are ignored. On top of that sit the region-level editing operations: merging another
//! region's terrain with a displacement and rotation, and spherical [`PaintEffect`]s driven by a [`PaintMask`].

mod brushes;
mod config;
mod merge;
mod surface;

pub use brushes::*;
pub use config::SurfaceConfig;
pub use merge::MERGE_SMOOTHING_THRESHOLD;
pub use surface::Surface;

pub use loam_core as core;
pub use loam_map as map;
