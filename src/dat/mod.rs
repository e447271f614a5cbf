//! Chip's Challenge `.dat` level pack format
//!
//! Binary container holding an ordered sequence of levels. Each level is a
//! pair of 32x32 tile layers plus a block of optional TLV metadata fields
//! (title, passwords, hints, button wiring, monster order). All multi-byte
//! integers are little-endian.

mod field;
mod layer;
mod reader;
mod writer;

pub use field::{
    CloneControl, CloneControls, Coord, EncodedPassword, Field, MapHint, MapTitle,
    MonsterMovement, PlainPassword, RawField, TrapControl, TrapControls,
};
pub use layer::Layer;
pub use reader::{DecodeOptions, parse_pack_bytes, parse_pack_bytes_with, read_pack};
pub use writer::{level_byte_size, optional_fields_byte_size, serialize_pack, write_pack};

use serde::{Deserialize, Serialize};

/// DAT file magic bytes.
pub const DAT_MAGIC: [u8; 4] = [0xAC, 0xAA, 0x02, 0x00];

/// Sentinel byte that starts a `(count, value)` run in layer data.
pub const RLE_SENTINEL: u8 = 0xFF;

/// Cells in one map layer (32x32 grid, row-major).
pub const LAYER_CELLS: usize = 1024;

/// Cells per map row.
pub const MAP_WIDTH: usize = 32;

/// Expected value of the reserved per-level "map detail" word.
pub const MAP_DETAIL: u16 = 1;

/// Largest payload a one-byte TLV length can frame.
pub const MAX_FIELD_PAYLOAD: usize = 255;

/// Fixed per-level byte overhead inside the level's declared size: the four
/// 2-byte header words after the size word, the two 2-byte layer length
/// prefixes, and the 2-byte optional-field total.
pub const LEVEL_FIXED_BYTES: usize = 14;

/// A single level: two tile layers plus ordered optional metadata fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Logical sequence number stored in the file. Not required to match the
    /// level's position in the pack.
    pub number: u16,
    /// Time limit in seconds; 0 means untimed.
    pub time: u16,
    /// Number of computer chips to collect.
    pub num_chips: u16,
    /// The main layer.
    pub upper_layer: Layer,
    /// The layer beneath it, allowing objects under other objects.
    pub lower_layer: Layer,
    /// Optional metadata fields, in wire order. Order is significant and is
    /// preserved by the codec.
    pub fields: Vec<Field>,
}

impl Level {
    /// The level's title, if it carries a title field.
    pub fn title(&self) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            Field::Title(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// The level's hint text, if it carries a hint field.
    pub fn hint(&self) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            Field::Hint(h) => Some(h.as_str()),
            _ => None,
        })
    }
}

/// An ordered pack of levels, as stored in one DAT file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPack {
    pub levels: Vec<Level>,
}

impl LevelPack {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Number of levels in the pack.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Append a level to the end of the pack.
    pub fn add_level(&mut self, level: Level) {
        self.levels.push(level);
    }
}
