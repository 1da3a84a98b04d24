mod binary;
mod error;
mod text;

pub use binary::*;
pub use error::CodecError;
pub use text::*;

use crate::{FormatTag, HeightGrid, TerrainBlob, LEGACY_REGION_SIZE};

/// Encodes `grid` for storage. Grids of exactly the legacy region size use [`FormatTag::Legacy256`]; all others use
/// [`FormatTag::Compressed2D`].
pub fn encode_blob(grid: &HeightGrid) -> TerrainBlob {
    let mut bytes = Vec::new();
    let tag = encode_blob_into(grid, &mut bytes);
    TerrainBlob { tag, bytes }
}

/// Like [`encode_blob`], but writes into a caller-owned buffer (which is cleared first) so the allocation can be reused.
pub fn encode_blob_into(grid: &HeightGrid, out: &mut Vec<u8>) -> FormatTag {
    out.clear();
    if is_legacy_size(grid) {
        encode_legacy_into(grid, out);
        FormatTag::Legacy256
    } else {
        encode_compressed_into(grid, out);
        FormatTag::Compressed2D
    }
}

/// Builds a `size_x` by `size_y` grid from a stored blob.
///
/// The blob may have been written for a region of a different size. Cells it does not cover are left at
/// [`DEFAULT_TERRAIN_HEIGHT`](crate::DEFAULT_TERRAIN_HEIGHT), and cells outside the new size are dropped. The returned grid has
/// no dirty patches.
pub fn decode_blob(
    size_x: u32,
    size_y: u32,
    size_z: u32,
    format_code: i32,
    bytes: &[u8],
) -> Result<HeightGrid, CodecError> {
    let grid = match FormatTag::from_code(format_code) {
        FormatTag::Compressed2D => {
            let grid = decode_compressed(size_x, size_y, size_z, bytes)?;
            log::debug!(
                "Created height grid from compressed 2D blob. Size=<{},{}>",
                size_x,
                size_y
            );
            grid
        }
        _ => {
            let grid = decode_legacy(size_x, size_y, size_z, bytes)?;
            log::debug!(
                "Created height grid from legacy blob. Size=<{},{}>",
                size_x,
                size_y
            );
            grid
        }
    };
    Ok(grid)
}

fn is_legacy_size(grid: &HeightGrid) -> bool {
    grid.size_x() == LEGACY_REGION_SIZE && grid.size_y() == LEGACY_REGION_SIZE
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
