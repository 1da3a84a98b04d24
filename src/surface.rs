use crate::SurfaceConfig;

use loam_core::glam::IVec2;
use loam_core::{Extent2i, Grid2};
use loam_map::{
    decode_blob, decode_xml, encode_blob, encode_blob_into, encode_xml, CodecError,
    CompressedHeights, DirtyPatches, FormatTag, HeightGrid, TerrainBlob, DEFAULT_ALTITUDE,
};
use std::sync::Arc;

/// The terrain of one region, addressed with signed cell coordinates.
///
/// Reads outside `[0, width) x [0, height)` return zero and writes there are ignored, so bounding-box math that strays past the
/// region edge is harmless. Non-finite heights are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    grid: HeightGrid,
}

impl Surface {
    pub fn from_grid(grid: HeightGrid) -> Self {
        Self { grid }
    }

    /// All heights zero.
    pub fn with_size(size_x: u32, size_y: u32) -> Self {
        Self::from_grid(HeightGrid::new(size_x, size_y, DEFAULT_ALTITUDE))
    }

    /// All heights at [`DEFAULT_TERRAIN_HEIGHT`](loam_map::DEFAULT_TERRAIN_HEIGHT).
    pub fn flat(size_x: u32, size_y: u32) -> Self {
        let mut grid = HeightGrid::new(size_x, size_y, DEFAULT_ALTITUDE);
        grid.clear_land();
        Self::from_grid(grid)
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        let mut grid = HeightGrid::with_compression_factor(
            config.size_x,
            config.size_y,
            config.altitude,
            config.compression_factor,
        );
        grid.fill(config.default_height);
        Self::from_grid(grid)
    }

    /// Fits a double-precision grid of any size into a `size_x` by `size_y` surface. Cells the source does not cover are left
    /// at [`DEFAULT_TERRAIN_HEIGHT`](loam_map::DEFAULT_TERRAIN_HEIGHT).
    pub fn from_doubles(heights: &Grid2<f64>, size_x: u32, size_y: u32, altitude: u32) -> Self {
        let mut grid = HeightGrid::new(size_x, size_y, altitude);
        grid.clear_land();
        let [src_x, src_y] = heights.dims();
        for x in 0..src_x.min(size_x) {
            for y in 0..src_y.min(size_y) {
                grid.set(x, y, heights[[x, y]]);
            }
        }
        grid.clear_all_dirty();
        Self::from_grid(grid)
    }

    /// See [`decode_blob`].
    pub fn from_blob(
        size_x: u32,
        size_y: u32,
        size_z: u32,
        format_code: i32,
        bytes: &[u8],
    ) -> Result<Self, CodecError> {
        decode_blob(size_x, size_y, size_z, format_code, bytes).map(Self::from_grid)
    }

    pub fn from_snapshot(snapshot: &CompressedHeights) -> Result<Self, CodecError> {
        snapshot.decompress().map(Self::from_grid)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.size_x() as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.size_y() as i32
    }

    #[inline]
    pub fn altitude(&self) -> u32 {
        self.grid.size_z()
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    pub fn into_grid(self) -> HeightGrid {
        self.grid
    }

    /// The cells of this surface as an extent.
    pub fn extent(&self) -> Extent2i {
        Extent2i::from_min_and_shape(IVec2::ZERO, IVec2::new(self.width(), self.height()))
    }

    #[inline]
    fn cell(&self, x: i32, y: i32) -> Option<[u32; 2]> {
        (x >= 0 && y >= 0 && x < self.width() && y < self.height()).then(|| [x as u32, y as u32])
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f64 {
        match self.cell(x, y) {
            Some([x, y]) => self.grid.get(x, y),
            None => 0.0,
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, height: f64) {
        if let Some([x, y]) = self.cell(x, y) {
            self.grid.set(x, y, height);
        }
    }

    /// Height of the cell containing a world-space point. The vertical coordinate is ignored.
    pub fn height_at_xyz(&self, x: f32, y: f32, _z: f32) -> f64 {
        if !(x >= 0.0 && y >= 0.0 && x < self.width() as f32 && y < self.height() as f32) {
            return 0.0;
        }
        self.get(x as i32, y as i32)
    }

    /// Checks and clears the dirty flag of the patch containing `(x, y)`. Outside the surface nothing is ever dirty.
    pub fn is_tainted(&self, x: i32, y: i32) -> bool {
        self.is_patch_dirty(x, y, true)
    }

    pub fn is_patch_dirty(&self, x: i32, y: i32, clear_on_read: bool) -> bool {
        match self.cell(x, y) {
            Some([x, y]) => self.grid.is_patch_dirty(x, y, clear_on_read),
            None => false,
        }
    }

    pub fn mark_all_dirty(&self) {
        self.grid.mark_all_dirty();
    }

    pub fn clear_all_dirty(&self) {
        self.grid.clear_all_dirty();
    }

    /// A handle for draining dirty patches from another thread. It stays attached across loads that keep the surface size.
    pub fn dirty_patches(&self) -> Arc<DirtyPatches> {
        self.grid.dirty_patches()
    }

    /// An independent deep copy. The copy starts with no dirty patches.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn compressed_map(&self) -> Vec<i32> {
        self.grid.compressed_map()
    }

    pub fn floats_serialized(&self) -> Vec<f32> {
        self.grid.floats_serialized()
    }

    pub fn to_blob(&self) -> TerrainBlob {
        encode_blob(&self.grid)
    }

    /// Encodes into a caller-owned buffer so it can be reused across saves.
    pub fn to_blob_into(&self, out: &mut Vec<u8>) -> FormatTag {
        encode_blob_into(&self.grid, out)
    }

    /// Replaces the terrain with a stored blob, keeping the current size. On error the surface is untouched.
    pub fn load_blob(&mut self, format_code: i32, bytes: &[u8]) -> Result<(), CodecError> {
        let decoded = decode_blob(
            self.grid.size_x(),
            self.grid.size_y(),
            self.grid.size_z(),
            format_code,
            bytes,
        )?;
        self.grid.replace_with(decoded);
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String, CodecError> {
        encode_xml(&self.grid)
    }

    /// Replaces the terrain with an XML document. A versioned document may change the surface size. On error the surface is
    /// untouched.
    pub fn load_xml_str(&mut self, doc: &str) -> Result<(), CodecError> {
        let decoded = decode_xml(
            self.grid.size_x(),
            self.grid.size_y(),
            self.grid.size_z(),
            doc,
        )?;
        self.grid.replace_with(decoded);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<CompressedHeights, CodecError> {
        self.grid.compress()
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

impl From<HeightGrid> for Surface {
    fn from(grid: HeightGrid) -> Self {
        Self::from_grid(grid)
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
    use loam_map::{DEFAULT_TERRAIN_HEIGHT, LEGACY_REGION_SIZE, PATCH_SIZE};

    #[test]
    fn out_of_bounds_reads_are_zero_and_writes_are_ignored() {
        let mut surface = Surface::flat(32, 48);
        assert_eq!(surface.get(-1, 0), 0.0);
        assert_eq!(surface.get(32, 0), 0.0);
        assert_eq!(surface.get(0, 48), 0.0);
        assert_eq!(surface.get(0, -7), 0.0);

        let before = surface.copy();
        surface.set(-1, 0, 5.0);
        surface.set(32, 0, 5.0);
        surface.set(0, i32::MAX, 5.0);
        assert_eq!(surface, before);
        assert_eq!(surface.dirty_patches().dirty_count(), 0);
    }

    #[test]
    fn set_quantizes_and_dirties_once() {
        let mut surface = Surface::with_size(32, 32);
        surface.set(17, 3, 1.23456);
        assert_relative_eq!(surface.get(17, 3), 1.23);

        assert!(surface.is_patch_dirty(17, 3, false));
        assert!(surface.is_patch_dirty(31, 15, false));
        assert!(!surface.is_patch_dirty(3, 3, false));

        assert!(surface.is_tainted(17, 3));
        assert!(!surface.is_tainted(17, 3));

        surface.set(17, 3, 1.23456);
        assert!(!surface.is_tainted(17, 3));
        assert!(!surface.is_tainted(-1, 3));
    }

    #[test]
    fn non_finite_writes_are_dropped() {
        let mut surface = Surface::flat(16, 16);
        surface.set(1, 1, f64::NAN);
        surface.set(2, 2, f64::INFINITY);
        surface.set(3, 3, f64::NEG_INFINITY);
        assert_relative_eq!(surface.get(1, 1), DEFAULT_TERRAIN_HEIGHT);
        assert_relative_eq!(surface.get(2, 2), DEFAULT_TERRAIN_HEIGHT);
        assert_relative_eq!(surface.get(3, 3), DEFAULT_TERRAIN_HEIGHT);
        assert!(!surface.is_tainted(1, 1));
    }

    #[test]
    fn height_at_xyz_truncates_coordinates() {
        let mut surface = Surface::with_size(16, 16);
        surface.set(3, 4, 9.5);
        assert_relative_eq!(surface.height_at_xyz(3.9, 4.2, 100.0), 9.5);
        assert_eq!(surface.height_at_xyz(-0.5, 4.2, 0.0), 0.0);
        assert_eq!(surface.height_at_xyz(16.0, 4.2, 0.0), 0.0);
        assert_eq!(surface.height_at_xyz(f32::NAN, 4.2, 0.0), 0.0);
    }

    #[test]
    fn copy_is_independent() {
        let mut original = Surface::flat(32, 32);
        original.set(0, 0, 1.0);
        let mut copy = original.copy();
        assert_eq!(copy, original);
        assert!(!copy.is_tainted(0, 0));

        copy.set(0, 0, 2.0);
        assert_relative_eq!(original.get(0, 0), 1.0);
        assert_relative_eq!(copy.get(0, 0), 2.0);
    }

    #[test]
    fn from_config_uses_every_field() {
        let surface = Surface::from_config(&SurfaceConfig {
            size_x: 64,
            size_y: 32,
            altitude: 1000,
            compression_factor: 10.0,
            default_height: 3.75,
        });
        assert_eq!((surface.width(), surface.height(), surface.altitude()), (64, 32, 1000));
        assert_eq!(surface.grid().compression_factor(), 10.0);
        assert_relative_eq!(surface.get(63, 31), 3.7);
        assert_eq!(surface.dirty_patches().dirty_count(), 0);

        let default = Surface::default();
        assert_eq!(default.width(), LEGACY_REGION_SIZE as i32);
        assert_relative_eq!(default.get(0, 0), DEFAULT_TERRAIN_HEIGHT);
    }

    #[test]
    fn from_doubles_pads_and_crops() {
        let doubles = Grid2::from_fn([8, 40], |[x, y]| (x + y) as f64);
        let surface = Surface::from_doubles(&doubles, 16, 32, 512);
        assert_eq!(surface.altitude(), 512);
        assert_relative_eq!(surface.get(7, 31), 38.0);
        assert_relative_eq!(surface.get(8, 0), DEFAULT_TERRAIN_HEIGHT);
        assert_eq!(surface.dirty_patches().dirty_count(), 0);
    }

    #[test]
    fn blob_round_trip_for_both_layouts() {
        for size in [LEGACY_REGION_SIZE, 2 * PATCH_SIZE] {
            let mut surface = Surface::with_size(size, size);
            surface.set(1, 2, 12.34);
            surface.set(size as i32 - 1, 0, -3.5);
            let blob = surface.to_blob();

            let restored =
                Surface::from_blob(size, size, DEFAULT_ALTITUDE, blob.tag.code(), &blob.bytes)
                    .unwrap();
            assert_eq!(restored, surface);
            assert_eq!(restored.to_blob(), blob);
        }
    }

    #[test]
    fn load_blob_keeps_dirty_handle() {
        let mut source = Surface::with_size(32, 32);
        source.set(4, 4, 8.0);
        let blob = source.to_blob();

        let mut surface = Surface::with_size(32, 32);
        let handle = surface.dirty_patches();
        surface.set(20, 20, 1.0);
        surface.load_blob(blob.tag.code(), &blob.bytes).unwrap();

        assert_relative_eq!(surface.get(4, 4), 8.0);
        assert_eq!(handle.dirty_count(), 0);
        surface.set(4, 4, 9.0);
        assert_eq!(handle.drain(), vec![loam_core::glam::UVec2::new(0, 0)]);
    }

    #[test]
    fn failed_load_leaves_surface_untouched() {
        let mut surface = Surface::flat(32, 32);
        surface.set(5, 5, 7.0);
        let before = surface.copy();

        assert!(surface
            .load_blob(FormatTag::Compressed2D.code(), &[0; 10])
            .is_err());
        assert!(surface.load_blob(FormatTag::Legacy256.code(), &[0; 64]).is_err());
        assert!(surface.load_xml_str("<Nope/>").is_err());
        assert_eq!(surface, before);
    }

    #[test]
    fn xml_round_trip_through_surface() {
        let mut surface = Surface::with_size(48, 16);
        surface.set(47, 15, 2.5);
        let doc = surface.to_xml_string().unwrap();

        let mut loaded = Surface::default();
        loaded.load_xml_str(&doc).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (48, 16));
        assert_eq!(loaded, surface);
    }

    #[test]
    fn snapshot_restores_heights() {
        let mut surface = Surface::flat(64, 64);
        surface.set(10, 60, 100.25);
        let snapshot = surface.snapshot().unwrap();
        surface.set(10, 60, 0.0);

        let restored = Surface::from_snapshot(&snapshot).unwrap();
        assert_relative_eq!(restored.get(10, 60), 100.25);
        assert_relative_eq!(restored.get(0, 0), DEFAULT_TERRAIN_HEIGHT);
    }

    #[test]
    fn decode_pads_with_the_fixed_default_height() {
        let mut small = Surface::with_size(16, 16);
        small.set(3, 3, 4.0);
        let blob = small.to_blob();

        let mut surface = Surface::from_config(&SurfaceConfig {
            size_x: 32,
            size_y: 32,
            default_height: 5.0,
            ..Default::default()
        });
        surface.load_blob(blob.tag.code(), &blob.bytes).unwrap();

        assert_relative_eq!(surface.get(3, 3), 4.0);
        assert_relative_eq!(surface.get(20, 20), DEFAULT_TERRAIN_HEIGHT);
    }
}
