//! Error types for `chipdat`

use thiserror::Error;

/// The error type for `chipdat` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(std::io::Error),

    /// The input ended in the middle of a header, layer, or field.
    #[error("unexpected end of input")]
    Truncated,

    // ==================== Pack Errors ====================
    /// The file does not start with the DAT magic bytes.
    #[error("invalid DAT magic: expected AC AA 02 00, found {0:02X?}")]
    InvalidDatMagic([u8; 4]),

    /// The pack holds more levels than the 2-byte level count can express.
    #[error("pack contains too many levels: {count} (max 65535)")]
    TooManyLevels {
        /// The number of levels in the pack.
        count: usize,
    },

    // ==================== Level Errors ====================
    /// A level body did not span the byte count its size header declared.
    #[error("level at index {index} declares {declared} bytes but its body spans {actual}")]
    LevelSizeMismatch {
        /// Position of the level in the file (0-based).
        index: usize,
        /// Byte count from the level's size header.
        declared: u16,
        /// Bytes the decoder actually consumed for the level body.
        actual: usize,
    },

    /// A level's encoded form exceeds the 2-byte size header.
    #[error("level encodes to {bytes} bytes, over the 65535-byte limit")]
    LevelTooLarge {
        /// The computed encoded size of the level.
        bytes: usize,
    },

    // ==================== Layer Errors ====================
    /// A layer did not expand to exactly 1024 cells.
    #[error("layer decoded to {cells} cells, expected 1024")]
    LayerCellCount {
        /// The number of cells the layer data expanded to.
        cells: usize,
    },

    // ==================== Optional Field Errors ====================
    /// A TLV entry does not fit the optional-field block's remaining byte budget.
    #[error("optional field entry needs {needed} bytes but only {remaining} remain in the block")]
    FieldBlockFraming {
        /// Bytes the next piece of the entry requires.
        needed: usize,
        /// Bytes left in the block's declared total.
        remaining: usize,
    },

    /// A TLV type identifier that is not part of the DAT format.
    #[error("unsupported optional field type: {type_id}")]
    UnsupportedFieldType {
        /// The type identifier found on the wire.
        type_id: u8,
    },

    /// A field payload length does not match the field's record structure.
    #[error("field type {type_id} payload of {len} bytes is not a multiple of its {stride}-byte record")]
    MisalignedFieldPayload {
        /// The field's type identifier.
        type_id: u8,
        /// The payload length found on the wire.
        len: usize,
        /// The per-record byte stride the payload must be a multiple of.
        stride: usize,
    },

    /// A string field payload is missing its trailing NUL terminator.
    #[error("field type {type_id} string payload is missing its NUL terminator")]
    UnterminatedString {
        /// The field's type identifier.
        type_id: u8,
    },

    /// A field payload is too long for the one-byte TLV length.
    #[error("field payload of {len} bytes exceeds the 255-byte TLV limit")]
    FieldPayloadTooLarge {
        /// The payload length in bytes.
        len: usize,
    },

    /// Plain (unencoded) password fields exist only in legacy files and cannot be written.
    #[error("plain password fields cannot be encoded; use an encoded password")]
    PlainPasswordEncode,

    // ==================== Construction Errors ====================
    /// A value or list exceeded the limits of its field.
    #[error("{what} {value} out of range ({min}..={max} allowed)")]
    BoundsViolation {
        /// What was out of bounds (e.g. "coordinate x", "map title length").
        what: &'static str,
        /// The offending value or length.
        value: usize,
        /// Smallest allowed value.
        min: usize,
        /// Largest allowed value.
        max: usize,
    },

    /// Strings in DAT fields must be ASCII.
    #[error("{what} contains non-ASCII characters")]
    NotAscii {
        /// What held the non-ASCII text.
        what: &'static str,
    },

    // ==================== Conversion Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// A short read from a byte buffer means the file was truncated, not that the
// OS failed; keep the two cases distinguishable.
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(err)
        }
    }
}

/// A specialized Result type for `chipdat` operations.
pub type Result<T> = std::result::Result<T, Error>;
