//! Shaped terrain edits.
//!
//! A [`PaintEffect`] mutates a [`Surface`] in place around a center point. Which cells it may touch is decided by the caller
//! with a [`PaintMask`], usually computed from land ownership and permissions.

mod mask;
mod raise_sphere;
mod revert_sphere;

pub use mask::PaintMask;
pub use raise_sphere::RaiseSphere;
pub use revert_sphere::{RevertSphere, REVERT_CONVERGENCE};

use crate::Surface;

use loam_core::glam::DVec3;

pub trait PaintEffect {
    /// Applies one tick of the effect centered on `center`. Only cells where `mask` is set are modified.
    ///
    /// What `strength` and `duration` mean is up to the effect.
    fn apply(
        &self,
        surface: &mut Surface,
        mask: &PaintMask,
        center: DVec3,
        strength: f64,
        duration: f64,
    );
}
