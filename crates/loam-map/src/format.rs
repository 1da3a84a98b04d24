/// Identifies the layout of a persisted terrain blob. Stored next to the blob as a plain integer.
///
/// Some old storage backends wrote a timestamp into the same field. Any code that is not exactly
/// [`FormatTag::Compressed2D`] is therefore read as [`FormatTag::Legacy256`], including the [`FormatTag::RevisionHigh`]
/// sentinel and everything above it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(i32)]
pub enum FormatTag {
    /// `f64[256][256]`, X in the outer loop.
    Legacy256 = 11,
    /// A 16-byte header followed by `i16[size_y][size_x]` stored heights.
    Compressed2D = 27,
    /// Codes above this value are timestamps left behind by an old backend.
    RevisionHigh = 1234,
}

impl FormatTag {
    pub fn from_code(code: i32) -> Self {
        if code == Self::Compressed2D.code() {
            Self::Compressed2D
        } else {
            Self::Legacy256
        }
    }

    pub const fn code(self) -> i32 {
        self as i32
    }

    /// The layout that a blob with this tag is decoded as.
    pub fn decoded_as(self) -> Self {
        Self::from_code(self.code())
    }
}

/// A persisted grid: the layout tag together with the bytes in that layout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TerrainBlob {
    pub tag: FormatTag,
    pub bytes: Vec<u8>,
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
