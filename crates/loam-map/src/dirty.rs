use crate::PATCH_SIZE;

use loam_core::glam::UVec2;
use loam_core::AtomicBitset;

/// One dirty flag per [`PATCH_SIZE`]-square patch of a height grid.
///
/// Flags can be raised and cleared through a shared reference, so one writer and one drainer can hold the same `DirtyPatches`
/// (usually through an `Arc`) on different threads. A write that races with a clearing read of the same patch may go unnoticed
/// until the next write to that patch; callers are expected to drain on a fixed polling interval.
#[derive(Debug)]
pub struct DirtyPatches {
    bits: AtomicBitset,
    patches_x: u32,
    patches_y: u32,
}

impl DirtyPatches {
    /// All flags start clear. `size_x` and `size_y` are given in cells.
    pub fn new(size_x: u32, size_y: u32) -> Self {
        let patches_x = (size_x + PATCH_SIZE - 1) / PATCH_SIZE;
        let patches_y = (size_y + PATCH_SIZE - 1) / PATCH_SIZE;
        Self {
            bits: AtomicBitset::new((patches_x * patches_y) as usize),
            patches_x,
            patches_y,
        }
    }

    /// The number of patches along X and Y.
    pub fn patch_dims(&self) -> [u32; 2] {
        [self.patches_x, self.patches_y]
    }

    #[inline]
    pub fn mark_cell(&self, x: u32, y: u32) {
        self.bits.set(self.cell_index(x, y));
    }

    /// Returns `true` if the patch containing cell `(x, y)` changed since it was last cleared. If `clear_on_read`, the flag is
    /// atomically cleared.
    #[inline]
    pub fn is_dirty_at(&self, x: u32, y: u32, clear_on_read: bool) -> bool {
        let i = self.cell_index(x, y);
        if clear_on_read {
            self.bits.take(i)
        } else {
            self.bits.get(i)
        }
    }

    pub fn mark_all(&self) {
        self.bits.fill(true);
    }

    pub fn clear_all(&self) {
        self.bits.fill(false);
    }

    pub fn dirty_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Clears every flag, returning the patch coordinates of those that were set.
    pub fn drain(&self) -> Vec<UVec2> {
        let mut patches = Vec::new();
        self.bits.drain(|i| {
            let i = i as u32;
            patches.push(UVec2::new(i % self.patches_x, i / self.patches_x));
        });
        patches
    }

    #[inline]
    fn cell_index(&self, x: u32, y: u32) -> usize {
        ((y / PATCH_SIZE) * self.patches_x + x / PATCH_SIZE) as usize
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

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn cells_share_their_patch_flag() {
        let dirty = DirtyPatches::new(64, 32);
        assert_eq!(dirty.patch_dims(), [4, 2]);

        dirty.mark_cell(17, 3);
        assert!(dirty.is_dirty_at(31, 15, false));
        assert!(!dirty.is_dirty_at(32, 15, false));
        assert!(!dirty.is_dirty_at(17, 16, false));

        assert!(dirty.is_dirty_at(16, 0, true));
        assert!(!dirty.is_dirty_at(16, 0, true));
    }

    #[test]
    fn drain_reports_patch_coordinates() {
        let dirty = DirtyPatches::new(64, 64);
        dirty.mark_cell(0, 0);
        dirty.mark_cell(63, 63);
        dirty.mark_cell(20, 40);
        assert_eq!(
            dirty.drain(),
            vec![UVec2::new(0, 0), UVec2::new(1, 2), UVec2::new(3, 3)]
        );
        assert_eq!(dirty.dirty_count(), 0);
    }

    #[test]
    fn concurrent_drain_never_double_reports() {
        let dirty = Arc::new(DirtyPatches::new(256, 256));
        let reported = AtomicUsize::new(0);

        crossbeam::scope(|s| {
            s.spawn(|_| {
                for x in 0..256 {
                    dirty.mark_cell(x, 0);
                }
            });
            s.spawn(|_| {
                for _ in 0..100 {
                    reported.fetch_add(dirty.drain().len(), Ordering::Relaxed);
                }
            });
        })
        .unwrap();

        // Whatever the interleaving, each of the 16 patches in row 0 is reported at most once per raise, and any flag still
        // set was raised after the drainer's last look.
        let total = reported.load(Ordering::Relaxed) + dirty.drain().len();
        assert!(total >= 16, "{}", total);
        assert!(total <= 256, "{}", total);
    }
}
