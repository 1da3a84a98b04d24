use super::{PaintEffect, PaintMask};
use crate::Surface;

use loam_core::glam::DVec3;

/// Fraction of the remaining gap to the reference closed per unit of falloff, per application.
pub const REVERT_CONVERGENCE: f64 = 0.03;

/// Pulls heights back toward a reference surface, usually the last saved terrain.
///
/// `strength` is the radius in cells. A cell at distance `d` moves toward the reference by a weight of
/// `(strength² - d²) * REVERT_CONVERGENCE`, capped at one, so repeated application converges on the reference.
/// A non-positive `duration` makes the whole application a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RevertSphere<'a> {
    reference: &'a Surface,
}

impl<'a> RevertSphere<'a> {
    pub fn new(reference: &'a Surface) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> &'a Surface {
        self.reference
    }
}

impl PaintEffect for RevertSphere<'_> {
    fn apply(
        &self,
        surface: &mut Surface,
        mask: &PaintMask,
        center: DVec3,
        strength: f64,
        duration: f64,
    ) {
        if !(duration > 0.0) {
            return;
        }

        let center = center.truncate();
        let radius_squared = strength * strength;
        for p in surface.extent().iter2() {
            if !mask.is_allowed(p) {
                continue;
            }
            let z = radius_squared - p.as_dvec2().distance_squared(center);
            if z <= 0.0 {
                continue;
            }
            let weight = (z * REVERT_CONVERGENCE).clamp(0.0, 1.0);
            let current = surface.get(p.x, p.y);
            let target = self.reference.get(p.x, p.y);
            surface.set(p.x, p.y, current * (1.0 - weight) + target * weight);
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use approx::assert_relative_eq;
    use loam_core::glam::IVec2;

    fn uniform(size: u32, height: f64) -> Surface {
        let mut surface = Surface::with_size(size, size);
        for p in surface.extent().iter2() {
            surface.set(p.x, p.y, height);
        }
        surface.clear_all_dirty();
        surface
    }

    #[test]
    fn convergence_constant_is_fixed() {
        assert_eq!(REVERT_CONVERGENCE, 0.03);
    }

    #[test]
    fn non_positive_duration_changes_nothing() {
        let reference = uniform(32, 10.0);
        let mut surface = Surface::with_size(32, 32);
        let mask = PaintMask::all(&surface);
        let revert = RevertSphere::new(&reference);

        for duration in [0.0, -1.0, f64::NAN] {
            revert.apply(&mut surface, &mask, DVec3::new(16.0, 16.0, 0.0), 8.0, duration);
        }

        assert_eq!(surface, Surface::with_size(32, 32));
        assert_eq!(surface.dirty_patches().dirty_count(), 0);
    }

    #[test]
    fn blends_inside_the_radius_only() {
        let reference = uniform(32, 10.0);
        let mut surface = Surface::with_size(32, 32);
        let mask = PaintMask::all(&surface);

        RevertSphere::new(&reference).apply(
            &mut surface,
            &mask,
            DVec3::new(16.0, 16.0, 0.0),
            3.0,
            1.0,
        );

        // z = 9 at the center. Quantization may land one step low.
        assert_relative_eq!(surface.get(16, 16), 2.7, epsilon = 0.02);
        // z = 8 one cell over.
        assert_relative_eq!(surface.get(17, 16), 2.4, epsilon = 0.02);
        // Exactly on the radius.
        assert_eq!(surface.get(19, 16), 0.0);
        assert_eq!(surface.get(0, 0), 0.0);
    }

    #[test]
    fn masked_cells_are_untouched() {
        let reference = uniform(32, 10.0);
        let mut surface = Surface::with_size(32, 32);
        let mut mask = PaintMask::all(&surface);
        mask.allow(IVec2::new(16, 16), false);

        RevertSphere::new(&reference).apply(
            &mut surface,
            &mask,
            DVec3::new(16.0, 16.0, 0.0),
            3.0,
            1.0,
        );

        assert_eq!(surface.get(16, 16), 0.0);
        assert!(surface.get(16, 17) > 0.0);
    }

    #[test]
    fn repeated_application_converges() {
        let reference = uniform(32, 10.0);
        let mut surface = Surface::flat(32, 32);
        let mask = PaintMask::all(&surface);
        let revert = RevertSphere::new(&reference);

        for _ in 0..100 {
            revert.apply(&mut surface, &mask, DVec3::new(16.0, 16.0, 0.0), 3.0, 1.0);
        }

        assert!((surface.get(16, 16) - 10.0).abs() < 0.1);
        assert_relative_eq!(surface.get(16, 19), 21.0);
    }

    #[test]
    fn large_radius_snaps_to_the_reference() {
        let reference = uniform(32, 10.0);
        let mut surface = Surface::flat(32, 32);
        let mask = PaintMask::all(&surface);

        RevertSphere::new(&reference).apply(
            &mut surface,
            &mask,
            DVec3::new(16.0, 16.0, 0.0),
            64.0,
            1.0,
        );

        assert_eq!(surface, reference);
    }
}
