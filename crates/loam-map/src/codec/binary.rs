//! The two binary layouts. Both are little-endian and must never change.

use super::CodecError;
use crate::{recover_stored, FormatTag, HeightGrid, LEGACY_REGION_SIZE};

use bytemuck::{bytes_of, pod_read_unaligned, Pod, Zeroable};
use loam_core::static_assertions::const_assert_eq;
use std::mem;

const LEGACY_CELL_COUNT: usize = (LEGACY_REGION_SIZE * LEGACY_REGION_SIZE) as usize;

/// Written in place of an exact zero so that old readers, which treat a literal zero as "no data", keep the cell.
const LEGACY_ZERO_HEIGHT: f64 = 4.9406564584124654e-324;

pub const COMPRESSED_HEADER_SIZE: usize = 16;

/// The leading 16 bytes of a [`FormatTag::Compressed2D`] blob.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct CompressedHeader {
    pub format_code: i32,
    pub size_x: i32,
    pub size_y: i32,
    /// Truncated to an integer on write.
    pub compression_factor: i32,
}

const_assert_eq!(mem::size_of::<CompressedHeader>(), COMPRESSED_HEADER_SIZE);

impl CompressedHeader {
    pub fn for_grid(grid: &HeightGrid) -> Self {
        Self {
            format_code: FormatTag::Compressed2D.code(),
            size_x: grid.size_x() as i32,
            size_y: grid.size_y() as i32,
            compression_factor: grid.compression_factor() as i32,
        }
    }

    pub fn read(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < COMPRESSED_HEADER_SIZE {
            return Err(CodecError::Truncated {
                layout: "compressed header",
                needed: COMPRESSED_HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let raw: Self = pod_read_unaligned(&bytes[..COMPRESSED_HEADER_SIZE]);
        let header = raw.map_fields(i32::from_le);
        if header.size_x < 0 || header.size_y < 0 {
            return Err(CodecError::InvalidDimensions {
                size_x: header.size_x.into(),
                size_y: header.size_y.into(),
            });
        }
        if header.compression_factor <= 0 {
            return Err(CodecError::InvalidCompressionFactor(
                header.compression_factor,
            ));
        }
        Ok(header)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(bytes_of(&self.map_fields(i32::to_le)));
    }

    /// Bytes of height data that follow the header.
    pub fn payload_len(&self) -> usize {
        self.size_x as usize * self.size_y as usize * mem::size_of::<i16>()
    }

    fn map_fields(self, f: impl Fn(i32) -> i32) -> Self {
        Self {
            format_code: f(self.format_code),
            size_x: f(self.size_x),
            size_y: f(self.size_y),
            compression_factor: f(self.compression_factor),
        }
    }
}

/// `f64` heights for exactly [`LEGACY_REGION_SIZE`] squared cells, X in the outer loop. Cells outside of `grid` are written as
/// zero.
pub fn encode_legacy(grid: &HeightGrid) -> Vec<u8> {
    let mut out = Vec::new();
    encode_legacy_into(grid, &mut out);
    out
}

pub fn encode_legacy_into(grid: &HeightGrid, out: &mut Vec<u8>) {
    out.reserve(LEGACY_CELL_COUNT * mem::size_of::<f64>());
    for x in 0..LEGACY_REGION_SIZE {
        for y in 0..LEGACY_REGION_SIZE {
            let mut height = if x < grid.size_x() && y < grid.size_y() {
                grid.get(x, y)
            } else {
                0.0
            };
            if height == 0.0 {
                height = LEGACY_ZERO_HEIGHT;
            }
            out.extend_from_slice(&height.to_le_bytes());
        }
    }
}

/// Reads a [`FormatTag::Legacy256`] blob into a fresh `size_x` by `size_y` grid.
pub fn decode_legacy(
    size_x: u32,
    size_y: u32,
    size_z: u32,
    bytes: &[u8],
) -> Result<HeightGrid, CodecError> {
    let available = bytes.len() / mem::size_of::<f64>();
    if available < LEGACY_CELL_COUNT {
        return Err(CodecError::Truncated {
            layout: "legacy",
            needed: LEGACY_CELL_COUNT,
            available,
        });
    }
    if size_x > LEGACY_REGION_SIZE || size_y > LEGACY_REGION_SIZE {
        log::debug!(
            "Legacy blob covers only {}x{} of a {}x{} region",
            LEGACY_REGION_SIZE,
            LEGACY_REGION_SIZE,
            size_x,
            size_y
        );
    }

    let mut grid = HeightGrid::new(size_x, size_y, size_z);
    grid.clear_land();

    let cf = grid.compression_factor();
    let cells = bytes
        .chunks_exact(mem::size_of::<f64>())
        .take(LEGACY_CELL_COUNT);
    for (i, cell) in cells.enumerate() {
        // X is the outer loop.
        let x = i as u32 / LEGACY_REGION_SIZE;
        let y = i as u32 % LEGACY_REGION_SIZE;
        let height = f64::from_le_bytes(cell.try_into().unwrap_or_default());
        if x < size_x && y < size_y && height.is_finite() {
            grid.set_stored(x, y, recover_stored(height, cf));
        }
    }
    if size_x < LEGACY_REGION_SIZE || size_y < LEGACY_REGION_SIZE {
        log::warn!(
            "Dropped legacy terrain outside of the {}x{} region",
            size_x,
            size_y
        );
    }

    grid.clear_all_dirty();
    Ok(grid)
}

/// A [`CompressedHeader`] followed by the stored heights as `i16`, Y in the outer loop.
pub fn encode_compressed(grid: &HeightGrid) -> Vec<u8> {
    let mut out = Vec::new();
    encode_compressed_into(grid, &mut out);
    out
}

pub fn encode_compressed_into(grid: &HeightGrid, out: &mut Vec<u8>) {
    let header = CompressedHeader::for_grid(grid);
    out.reserve(COMPRESSED_HEADER_SIZE + header.payload_len());
    header.write(out);
    // Grid2 is already laid out with Y in the outer loop.
    for &stored in grid.heights().values() {
        // Wraps. At factor 100, heights outside of +-327.67 do not survive.
        out.extend_from_slice(&(stored as i16).to_le_bytes());
    }
}

/// Reads a [`FormatTag::Compressed2D`] blob into a fresh `size_x` by `size_y` grid. The grid takes the blob's compression factor.
pub fn decode_compressed(
    size_x: u32,
    size_y: u32,
    size_z: u32,
    bytes: &[u8],
) -> Result<HeightGrid, CodecError> {
    let header = CompressedHeader::read(bytes)?;
    let payload = &bytes[COMPRESSED_HEADER_SIZE..];
    if payload.len() < header.payload_len() {
        return Err(CodecError::Truncated {
            layout: "compressed",
            needed: header.payload_len() / mem::size_of::<i16>(),
            available: payload.len() / mem::size_of::<i16>(),
        });
    }

    let mut grid = HeightGrid::with_compression_factor(
        size_x,
        size_y,
        size_z,
        header.compression_factor as f32,
    );
    grid.clear_land();

    let (blob_x, blob_y) = (header.size_x as u32, header.size_y as u32);
    let cells = payload
        .chunks_exact(mem::size_of::<i16>())
        .take(blob_x as usize * blob_y as usize);
    for (i, cell) in cells.enumerate() {
        // Y is the outer loop.
        let x = i as u32 % blob_x;
        let y = i as u32 / blob_x;
        let stored = i16::from_le_bytes(cell.try_into().unwrap_or_default());
        if x < size_x && y < size_y {
            grid.set_stored(x, y, i32::from(stored));
        }
    }
    if blob_x > size_x || blob_y > size_y {
        log::warn!(
            "Dropped compressed terrain outside of the {}x{} region",
            size_x,
            size_y
        );
    }

    grid.clear_all_dirty();
    log::info!(
        "Read compressed 2D heightmap. Heightmap size=<{},{}>. Region size=<{},{}>. CompFact={}",
        blob_x,
        blob_y,
        size_x,
        size_y,
        header.compression_factor
    );
    Ok(grid)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
