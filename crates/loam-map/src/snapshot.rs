use crate::{decode_compressed, encode_compressed, CodecError, CompressedHeader, HeightGrid};

use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use std::io::{self, Write};

/// An LZ4-framed copy of a grid in the compressed binary layout. Cheap to keep around as a revert reference or undo point.
///
/// The compression factor is stored as an integer, like any compressed blob.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompressedHeights {
    size_z: u32,
    bytes: Box<[u8]>,
}

impl HeightGrid {
    pub fn compress(&self) -> Result<CompressedHeights, CodecError> {
        let mut encoder = FrameEncoder::new(Vec::new());
        encoder.write_all(&encode_compressed(self))?;
        Ok(CompressedHeights {
            size_z: self.size_z(),
            bytes: encoder.finish()?.into_boxed_slice(),
        })
    }
}

impl CompressedHeights {
    pub fn decompress(&self) -> Result<HeightGrid, CodecError> {
        let mut decoder = FrameDecoder::new(&*self.bytes);
        let mut blob = Vec::new();
        io::copy(&mut decoder, &mut blob)?;
        let header = CompressedHeader::read(&blob)?;
        decode_compressed(
            header.size_x as u32,
            header.size_y as u32,
            self.size_z,
            &blob,
        )
    }

    pub fn compressed_len(&self) -> usize {
        self.bytes.len()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
