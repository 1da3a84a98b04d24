use super::{PaintEffect, PaintMask};
use crate::Surface;

use loam_core::glam::{DVec3, IVec2};
use loam_core::Extent2i;
use std::f64::consts::PI;

/// Raises a smooth dome.
///
/// `strength` is the base-2 logarithm of the radius, which is rounded to whole cells. A cell at distance `d` from the center
/// rises by `duration * cos(d * PI / (2 * radius))`, so the center rises by exactly `duration` and the rim not at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct RaiseSphere;

impl RaiseSphere {
    pub fn radius(strength: f64) -> i32 {
        (strength.exp2() + 0.5) as i32
    }
}

impl PaintEffect for RaiseSphere {
    fn apply(
        &self,
        surface: &mut Surface,
        mask: &PaintMask,
        center: DVec3,
        strength: f64,
        duration: f64,
    ) {
        let radius = Self::radius(strength);
        if radius <= 0 {
            return;
        }

        let center = center.truncate();
        let r = f64::from(radius);
        // Clipped before the cast so that huge radii and far-away centers cannot overflow.
        let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
        let min = IVec2::new(
            (center.x - r + 0.5).clamp(-1.0, w) as i32,
            (center.y - r + 0.5).clamp(-1.0, h) as i32,
        );
        let max = IVec2::new(
            (center.x + r + 0.5).clamp(-1.0, w) as i32,
            (center.y + r + 0.5).clamp(-1.0, h) as i32,
        );
        let extent = Extent2i::from_min_and_max(min, max).intersection(&surface.extent());

        for p in extent.iter2() {
            if !mask.is_allowed(p) {
                continue;
            }
            let d = p.as_dvec2().distance(center);
            let z = (d * PI / (2.0 * r)).cos();
            if z > 0.0 {
                surface.set(p.x, p.y, surface.get(p.x, p.y) + z * duration);
            }
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

    #[test]
    fn radius_doubles_with_strength() {
        assert_eq!(RaiseSphere::radius(0.0), 1);
        assert_eq!(RaiseSphere::radius(1.0), 2);
        assert_eq!(RaiseSphere::radius(3.0), 8);
        assert_eq!(RaiseSphere::radius(-2.0), 0);
    }

    #[test]
    fn center_rises_by_duration() {
        let mut surface = Surface::flat(32, 32);
        let mask = PaintMask::all(&surface);

        RaiseSphere.apply(&mut surface, &mask, DVec3::new(10.0, 12.0, 0.0), 1.0, 0.5);

        assert_relative_eq!(surface.get(10, 12), 21.5);
        // Distance 1 of radius 2.
        assert_relative_eq!(surface.get(11, 12), 21.35);
        // Past the radius.
        assert_relative_eq!(surface.get(13, 12), 21.0);
        assert_relative_eq!(surface.get(10, 15), 21.0);
        assert_relative_eq!(surface.get(12, 14), 21.0);
        assert!(surface.is_tainted(10, 12));
    }

    #[test]
    fn masked_cells_are_untouched() {
        let mut surface = Surface::with_size(32, 32);
        let mut mask = PaintMask::all(&surface);
        mask.allow(IVec2::new(5, 5), false);

        RaiseSphere.apply(&mut surface, &mask, DVec3::new(5.0, 5.0, 0.0), 2.0, 1.0);

        assert_eq!(surface.get(5, 5), 0.0);
        assert!(surface.get(6, 5) > 0.0);
    }

    #[test]
    fn dome_is_clipped_at_the_edge() {
        let mut surface = Surface::with_size(16, 16);
        let mask = PaintMask::all(&surface);

        RaiseSphere.apply(&mut surface, &mask, DVec3::new(0.0, 15.0, 0.0), 2.0, 2.0);

        assert_relative_eq!(surface.get(0, 15), 2.0);
        assert!(surface.get(2, 13) > 0.0);
        assert_eq!(surface.get(15, 0), 0.0);
    }

    #[test]
    fn tiny_strength_does_nothing() {
        let mut surface = Surface::flat(16, 16);
        let before = surface.copy();
        let mask = PaintMask::all(&surface);

        RaiseSphere.apply(&mut surface, &mask, DVec3::new(8.0, 8.0, 0.0), -3.0, 1.0);

        assert_eq!(surface, before);
    }

    #[test]
    fn huge_strength_covers_the_surface() {
        let mut surface = Surface::flat(16, 16);
        let mask = PaintMask::all(&surface);

        RaiseSphere.apply(&mut surface, &mask, DVec3::new(8.0, 8.0, 0.0), 31.0, 1.0);
        RaiseSphere.apply(&mut surface, &mask, DVec3::new(8.0, 8.0, 0.0), 1000.0, 1.0);

        assert_relative_eq!(surface.get(8, 8), 23.0);
        assert!(surface.get(0, 0) > 22.0);
        assert!(surface.get(15, 15) > 22.0);
    }

    #[test]
    fn far_away_center_does_nothing() {
        let mut surface = Surface::flat(16, 16);
        let before = surface.copy();
        let mask = PaintMask::all(&surface);

        for c in [1.0e12, -1.0e12, f64::INFINITY, f64::NAN] {
            RaiseSphere.apply(&mut surface, &mask, DVec3::new(c, c, 0.0), 2.0, 1.0);
            RaiseSphere.apply(&mut surface, &mask, DVec3::new(c, 8.0, 0.0), 2.0, 1.0);
        }

        assert_eq!(surface, before);
    }
}
