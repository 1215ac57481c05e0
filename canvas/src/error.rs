//! Error types surfaced by the canvas crate.
//!
//! Nothing in the interaction core is fatal. These errors describe input the
//! core refused (persisted strings it could not parse) or failures a host
//! collaborator reports back (image decoding); the editor turns both into
//! logged no-ops.

/// A persisted or user-supplied string did not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown mode: {0}")]
    Mode(String),
    #[error("unknown direction: {0}")]
    Direction(String),
    #[error("unknown image fit mode: {0}")]
    FitMode(String),
    #[error("invalid color (expected #rrggbb): {0}")]
    Color(String),
}

/// Image decoding failed in the host. The pending write is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    /// The blob's bytes could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(String),
    /// The blob's media type is not an image format the host understands.
    #[error("unsupported image type: {0}")]
    Unsupported(String),
}
