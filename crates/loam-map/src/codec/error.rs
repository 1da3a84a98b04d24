use thiserror::Error;

/// Failure to turn persisted bytes or text back into a height grid.
///
/// Decoding is all-or-nothing; when one of these is returned, no grid was modified.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{layout} data is truncated: needed {needed} values, found {available}")]
    Truncated {
        layout: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid grid dimensions: {size_x}x{size_y}")]
    InvalidDimensions { size_x: i64, size_y: i64 },

    #[error("Invalid compression factor: {0}")]
    InvalidCompressionFactor(i32),

    #[error("Unrecognized terrain document root: {0:?}")]
    UnknownDocument(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML schema error: {0}")]
    XmlSchema(#[from] quick_xml::DeError),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("LZ4 error: {0}")]
    Lz4(#[from] lz4_flex::frame::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
