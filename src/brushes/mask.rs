use crate::Surface;

use loam_core::glam::IVec2;
use loam_core::Grid2;

/// The cells a [`PaintEffect`](crate::PaintEffect) is allowed to modify. Cells outside the mask are never allowed.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintMask {
    allowed: Grid2<bool>,
}

impl PaintMask {
    /// Allows every cell of `surface`.
    pub fn all(surface: &Surface) -> Self {
        Self::filled(surface, true)
    }

    /// Allows nothing; enable cells with [`PaintMask::allow`].
    pub fn none(surface: &Surface) -> Self {
        Self::filled(surface, false)
    }

    fn filled(surface: &Surface, allowed: bool) -> Self {
        Self {
            allowed: Grid2::fill(
                [surface.width() as u32, surface.height() as u32],
                allowed,
            ),
        }
    }

    pub fn from_grid(allowed: Grid2<bool>) -> Self {
        Self { allowed }
    }

    #[inline]
    pub fn is_allowed(&self, p: IVec2) -> bool {
        self.allowed
            .get([i64::from(p.x), i64::from(p.y)])
            .copied()
            .unwrap_or(false)
    }

    /// Out-of-range cells are ignored.
    pub fn allow(&mut self, p: IVec2, allowed: bool) {
        if self.allowed.contains([i64::from(p.x), i64::from(p.y)]) {
            self.allowed[[p.x as u32, p.y as u32]] = allowed;
        }
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed.values().iter().filter(|&&a| a).count()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
