//! The two XML documents. The root element tells them apart: `TerrainMap` for the legacy layout, `TerrainMap2` for the
//! versioned one.

use super::CodecError;
use crate::{recover_stored_single, HeightGrid, LEGACY_REGION_SIZE, PATCH_SIZE};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::mem;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const LEGACY_ROOT: &[u8] = b"TerrainMap";
const VERSIONED_ROOT: &[u8] = b"TerrainMap2";
const PACKAGE_VERSION: i32 = 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextLayout {
    /// Base64 of little-endian `f32` heights, Y in the outer loop. Carries no dimensions.
    Legacy,
    /// Explicit dimensions and compression factor plus every stored height.
    Versioned,
}

impl TextLayout {
    /// [`TextLayout::Legacy`] iff the grid is exactly the legacy region size.
    pub fn for_grid(grid: &HeightGrid) -> Self {
        if grid.size_x() == LEGACY_REGION_SIZE && grid.size_y() == LEGACY_REGION_SIZE {
            Self::Legacy
        } else {
            Self::Versioned
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename = "TerrainMap")]
struct LegacyDocument {
    #[serde(rename = "base64Binary")]
    base64_binary: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename = "TerrainMap2")]
struct VersionedDocument {
    #[serde(rename = "TerrainChannelXMLPackage")]
    package: TerrainPackage,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TerrainPackage {
    version: i32,
    size_x: i32,
    size_y: i32,
    size_z: i32,
    compression_factor: f32,
    map: IntArray,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct IntArray {
    #[serde(rename = "int", default)]
    values: Vec<i32>,
}

pub fn encode_xml(grid: &HeightGrid) -> Result<String, CodecError> {
    let body = match TextLayout::for_grid(grid) {
        TextLayout::Legacy => {
            let floats = grid.floats_serialized();
            let mut bytes = Vec::with_capacity(floats.len() * mem::size_of::<f32>());
            for h in floats {
                bytes.extend_from_slice(&h.to_le_bytes());
            }
            quick_xml::se::to_string(&LegacyDocument {
                base64_binary: STANDARD.encode(bytes),
            })?
        }
        TextLayout::Versioned => quick_xml::se::to_string(&VersionedDocument {
            package: TerrainPackage {
                version: PACKAGE_VERSION,
                size_x: grid.size_x() as i32,
                size_y: grid.size_y() as i32,
                size_z: grid.size_z() as i32,
                compression_factor: grid.compression_factor(),
                map: IntArray {
                    values: grid.compressed_map(),
                },
            },
        })?,
    };
    Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Looks at the root element name without parsing the rest of the document.
pub fn detect_text_layout(doc: &str) -> Result<TextLayout, CodecError> {
    let mut reader = Reader::from_str(doc);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let name = e.local_name();
                return if name.as_ref() == LEGACY_ROOT {
                    Ok(TextLayout::Legacy)
                } else if name.as_ref() == VERSIONED_ROOT {
                    Ok(TextLayout::Versioned)
                } else {
                    Err(CodecError::UnknownDocument(
                        String::from_utf8_lossy(name.as_ref()).into_owned(),
                    ))
                };
            }
            Event::Eof => return Err(CodecError::UnknownDocument(String::new())),
            _ => {}
        }
    }
}

/// Decodes either document. A legacy document is read into a fresh `size_x` by `size_y` grid; a versioned document brings its
/// own dimensions. The returned grid has no dirty patches.
pub fn decode_xml(
    size_x: u32,
    size_y: u32,
    size_z: u32,
    doc: &str,
) -> Result<HeightGrid, CodecError> {
    match detect_text_layout(doc)? {
        TextLayout::Legacy => decode_legacy_xml(size_x, size_y, size_z, doc),
        TextLayout::Versioned => decode_versioned_xml(doc),
    }
}

/// Non-finite heights in the document leave their cell at zero.
pub fn decode_legacy_xml(
    size_x: u32,
    size_y: u32,
    size_z: u32,
    doc: &str,
) -> Result<HeightGrid, CodecError> {
    let document: LegacyDocument = quick_xml::de::from_str(strip_declaration(doc))?;
    let encoded: String = document
        .base64_binary
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(encoded)?;

    let needed = size_x as usize * size_y as usize;
    let available = bytes.len() / mem::size_of::<f32>();
    if available < needed {
        return Err(CodecError::Truncated {
            layout: "legacy XML",
            needed,
            available,
        });
    }

    let mut grid = HeightGrid::new(size_x, size_y, size_z);
    let cf = grid.compression_factor();
    let cells = bytes.chunks_exact(mem::size_of::<f32>()).take(needed);
    for (i, cell) in cells.enumerate() {
        // Y is the outer loop.
        let x = i as u32 % size_x;
        let y = i as u32 / size_x;
        let height = f32::from_le_bytes(cell.try_into().unwrap_or_default());
        if height.is_finite() {
            grid.set_stored(x, y, recover_stored_single(height, cf));
        }
    }
    grid.clear_all_dirty();
    Ok(grid)
}

pub fn decode_versioned_xml(doc: &str) -> Result<HeightGrid, CodecError> {
    let VersionedDocument { package } = quick_xml::de::from_str(strip_declaration(doc))?;
    if package.version != PACKAGE_VERSION {
        log::warn!(
            "Reading terrain package version {} as version {}",
            package.version,
            PACKAGE_VERSION
        );
    }

    let valid_dim = |d: i32| d >= 0 && d as u32 % PATCH_SIZE == 0;
    if !valid_dim(package.size_x) || !valid_dim(package.size_y) {
        return Err(CodecError::InvalidDimensions {
            size_x: package.size_x.into(),
            size_y: package.size_y.into(),
        });
    }
    if !(package.compression_factor.is_finite() && package.compression_factor > 0.0) {
        return Err(CodecError::InvalidCompressionFactor(
            package.compression_factor as i32,
        ));
    }

    HeightGrid::from_compressed_map(
        &package.map.values,
        package.compression_factor,
        package.size_x as u32,
        package.size_y as u32,
        package.size_z.max(0) as u32,
    )
}

fn strip_declaration(doc: &str) -> &str {
    let trimmed = doc.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    trimmed
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
