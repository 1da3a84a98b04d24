use crate::Surface;

use loam_core::glam::{IVec2, Vec2, Vec3};
use loam_core::Extent2i;

/// A rotated merge snaps neighbors of a target cell to the new height when they differ from it by more than this.
pub const MERGE_SMOOTHING_THRESHOLD: f64 = 1.0;

/// Neighbors within this many cells (per axis) of a rotated target are smoothed.
const SMOOTHING_RADIUS: i32 = 2;

impl Surface {
    /// Writes `source` into this surface, offset by `displacement` and rotated by `rotation` radians about `pivot`.
    ///
    /// Every source cell keeps its height plus `displacement.z`. Horizontal displacement is truncated to whole cells. Targets
    /// outside this surface are dropped.
    ///
    /// A rotated cell rarely lands exactly on a lattice point, which would leave single-cell spikes and pits behind. So around
    /// each rotated target, any cell in the surrounding 5x5 neighborhood that differs from the new height by more than
    /// [`MERGE_SMOOTHING_THRESHOLD`] is snapped to it.
    ///
    /// Not transactional. Take a [`Surface::copy`] first if the merge may need to be undone.
    pub fn merge(&mut self, source: &Surface, displacement: Vec3, rotation: f32, pivot: Vec2) {
        log::debug!(
            "Merging terrain. In=<{},{}> Disp={} Rot={} Pivot={} Out=<{},{}>",
            source.width(),
            source.height(),
            displacement,
            rotation,
            pivot,
            self.width(),
            self.height()
        );

        let offset = IVec2::new(displacement.x as i32, displacement.y as i32);
        let rise = f64::from(displacement.z);

        if rotation == 0.0 {
            for p in source.extent().iter2() {
                let target = displace(p, offset);
                self.set(target.x, target.y, source.get(p.x, p.y) + rise);
            }
            return;
        }

        let bounds = self.extent();
        let (sin, cos) = rotation.sin_cos();
        for p in source.extent().iter2() {
            let from_pivot = p.as_vec2() - pivot;
            let rotated = IVec2::new(
                (pivot.x + from_pivot.x * cos - from_pivot.y * sin) as i32,
                (pivot.y + from_pivot.x * sin + from_pivot.y * cos) as i32,
            );
            let target = displace(rotated, offset);
            if bounds.contains(target) {
                self.smooth_into(target, source.get(p.x, p.y) + rise);
            }
        }
    }

    fn smooth_into(&mut self, target: IVec2, new_height: f64) {
        let neighborhood = Extent2i::from_min_and_max(
            target - IVec2::splat(SMOOTHING_RADIUS),
            target + IVec2::splat(SMOOTHING_RADIUS),
        )
        .intersection(&self.extent());

        for p in neighborhood.iter2() {
            if p == target || (self.get(p.x, p.y) - new_height).abs() > MERGE_SMOOTHING_THRESHOLD {
                self.set(p.x, p.y, new_height);
            }
        }
    }
}

/// Saturates instead of overflowing. Saturated coordinates are never inside a surface.
fn displace(p: IVec2, offset: IVec2) -> IVec2 {
    IVec2::new(p.x.saturating_add(offset.x), p.y.saturating_add(offset.y))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
