use crate::{
    CodecError, DirtyPatches, DEFAULT_ALTITUDE, DEFAULT_COMPRESSION_FACTOR,
    DEFAULT_TERRAIN_HEIGHT, PATCH_SIZE,
};

use loam_core::Grid2;
use std::sync::Arc;

/// Converts a real height into its stored integer: `truncate(height * compression_factor)`.
#[inline]
pub fn quantize(height: f64, compression_factor: f32) -> i32 {
    (height * f64::from(compression_factor)).trunc() as i32
}

/// Recovers the stored integer behind a height that was persisted as a real number.
///
/// Persisted heights are `stored / compression_factor`, written either at full precision or widened from single precision.
/// Multiplying back can land a hair below the integer (`0.29 * 100 = 28.999...`), so a height that is exactly the image of the
/// nearest integer maps to that integer. Anything else truncates like [`quantize`].
#[inline]
pub fn recover_stored(height: f64, compression_factor: f32) -> i32 {
    let cf = f64::from(compression_factor);
    let scaled = height * cf;
    let nearest = scaled.round();
    let image = nearest / cf;
    if image == height || f64::from(image as f32) == height {
        nearest as i32
    } else {
        scaled.trunc() as i32
    }
}

/// Like [`recover_stored`], for heights persisted in single precision.
#[inline]
pub fn recover_stored_single(height: f32, compression_factor: f32) -> i32 {
    let cf = f64::from(compression_factor);
    let scaled = f64::from(height) * cf;
    let nearest = scaled.round();
    if (nearest / cf) as f32 == height {
        nearest as i32
    } else {
        scaled.trunc() as i32
    }
}

#[inline]
pub fn dequantize(stored: i32, compression_factor: f32) -> f64 {
    f64::from(stored) / f64::from(compression_factor)
}

/// # Height Grid
///
/// Quantized ground heights for a `size_x` by `size_y` region, plus one dirty flag per patch.
///
/// Coordinates are not bounds-checked here beyond what slice indexing does; that is the job of the surface facade.
#[derive(Debug)]
pub struct HeightGrid {
    size_z: u32,
    compression_factor: f32,
    heights: Grid2<i32>,
    dirty: Arc<DirtyPatches>,
}

impl HeightGrid {
    /// A grid of zero heights with no dirty patches.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self::with_compression_factor(size_x, size_y, size_z, DEFAULT_COMPRESSION_FACTOR)
    }

    pub fn with_compression_factor(
        size_x: u32,
        size_y: u32,
        size_z: u32,
        compression_factor: f32,
    ) -> Self {
        debug_assert!(size_x % PATCH_SIZE == 0 && size_y % PATCH_SIZE == 0);
        debug_assert!(compression_factor > 0.0);
        Self {
            size_z,
            compression_factor,
            heights: Grid2::fill([size_x, size_y], 0),
            dirty: Arc::new(DirtyPatches::new(size_x, size_y)),
        }
    }

    /// Quantizes every cell of a double-precision grid. Non-finite heights are stored as zero.
    pub fn from_doubles(doubles: &Grid2<f64>) -> Self {
        let [size_x, size_y] = doubles.dims();
        let mut grid = Self::new(size_x, size_y, DEFAULT_ALTITUDE);
        for (stored, &h) in grid.heights.values_mut().iter_mut().zip(doubles.values()) {
            if h.is_finite() {
                *stored = quantize(h, DEFAULT_COMPRESSION_FACTOR);
            }
        }
        grid
    }

    /// Rebuilds a grid from the output of [`HeightGrid::compressed_map`].
    pub fn from_compressed_map(
        map: &[i32],
        compression_factor: f32,
        size_x: u32,
        size_y: u32,
        size_z: u32,
    ) -> Result<Self, CodecError> {
        let needed = size_x as usize * size_y as usize;
        if map.len() < needed {
            return Err(CodecError::Truncated {
                layout: "compressed map",
                needed,
                available: map.len(),
            });
        }
        let mut grid = Self::with_compression_factor(size_x, size_y, size_z, compression_factor);
        let mut values = map.iter();
        for x in 0..size_x {
            for y in 0..size_y {
                if let Some(&v) = values.next() {
                    grid.heights[[x, y]] = v;
                }
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn size_x(&self) -> u32 {
        self.heights.size_x()
    }

    #[inline]
    pub fn size_y(&self) -> u32 {
        self.heights.size_y()
    }

    /// Informational altitude ceiling.
    #[inline]
    pub fn size_z(&self) -> u32 {
        self.size_z
    }

    #[inline]
    pub fn compression_factor(&self) -> f32 {
        self.compression_factor
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        dequantize(self.heights[[x, y]], self.compression_factor)
    }

    /// Stores `height`, marking its patch dirty if the stored value changed. Non-finite heights are dropped.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, height: f64) {
        if height.is_finite() {
            self.set_stored(x, y, quantize(height, self.compression_factor));
        }
    }

    #[inline]
    pub fn stored(&self, x: u32, y: u32) -> i32 {
        self.heights[[x, y]]
    }

    #[inline]
    pub fn set_stored(&mut self, x: u32, y: u32, stored: i32) {
        let cell = &mut self.heights[[x, y]];
        if *cell != stored {
            *cell = stored;
            self.dirty.mark_cell(x, y);
        }
    }

    /// See [`DirtyPatches::is_dirty_at`].
    #[inline]
    pub fn is_patch_dirty(&self, x: u32, y: u32, clear_on_read: bool) -> bool {
        self.dirty.is_dirty_at(x, y, clear_on_read)
    }

    /// Checks and clears the dirty flag of the patch containing `(x, y)`.
    #[inline]
    pub fn is_tainted_at(&self, x: u32, y: u32) -> bool {
        self.is_patch_dirty(x, y, true)
    }

    pub fn mark_all_dirty(&self) {
        self.dirty.mark_all();
    }

    pub fn clear_all_dirty(&self) {
        self.dirty.clear_all();
    }

    /// A handle to the dirty flags that stays valid for the life of this grid. Clones of the grid get their own flags.
    pub fn dirty_patches(&self) -> Arc<DirtyPatches> {
        Arc::clone(&self.dirty)
    }

    /// Takes the contents of `other`, clearing all dirty flags.
    ///
    /// When the dimensions match, the existing [`DirtyPatches`] object is kept, so handles returned by
    /// [`HeightGrid::dirty_patches`] stay attached to this grid.
    pub fn replace_with(&mut self, other: HeightGrid) {
        let HeightGrid {
            size_z,
            compression_factor,
            heights,
            dirty,
        } = other;
        if heights.dims() != self.heights.dims() {
            self.dirty = dirty;
        }
        self.size_z = size_z;
        self.compression_factor = compression_factor;
        self.heights = heights;
        self.dirty.clear_all();
    }

    /// Sets every cell to `height` without touching the dirty flags. Non-finite heights are dropped.
    pub fn fill(&mut self, height: f64) {
        if height.is_finite() {
            self.heights
                .set_all(quantize(height, self.compression_factor));
        }
    }

    /// Flattens the grid to [`DEFAULT_TERRAIN_HEIGHT`].
    pub fn clear_land(&mut self) {
        self.fill(DEFAULT_TERRAIN_HEIGHT);
    }

    /// Stored heights with X in the outer loop.
    pub fn compressed_map(&self) -> Vec<i32> {
        let mut map = Vec::with_capacity(self.heights.values().len());
        for x in 0..self.size_x() {
            for y in 0..self.size_y() {
                map.push(self.heights[[x, y]]);
            }
        }
        map
    }

    /// Real heights in single precision, `index = y * size_x + x`.
    pub fn floats_serialized(&self) -> Vec<f32> {
        // Grid2 is already laid out with X varying fastest.
        self.heights
            .values()
            .iter()
            .map(|&s| dequantize(s, self.compression_factor) as f32)
            .collect()
    }

    pub fn doubles(&self) -> Grid2<f64> {
        Grid2::from_fn(self.heights.dims(), |p| {
            dequantize(self.heights[p], self.compression_factor)
        })
    }

    pub(crate) fn heights(&self) -> &Grid2<i32> {
        &self.heights
    }
}

impl Clone for HeightGrid {
    /// Copies the heights only. The clone starts with every patch clean.
    fn clone(&self) -> Self {
        Self {
            size_z: self.size_z,
            compression_factor: self.compression_factor,
            heights: self.heights.clone(),
            dirty: Arc::new(DirtyPatches::new(self.size_x(), self.size_y())),
        }
    }
}

impl PartialEq for HeightGrid {
    /// Dirty flags are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.size_z == other.size_z
            && self.compression_factor == other.compression_factor
            && self.heights == other.heights
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
