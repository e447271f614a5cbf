//! # chipdat
//!
//! A pure-Rust library for reading and writing Chip's Challenge `.dat`
//! level packs.
//!
//! ## What's in a pack
//!
//! - **Levels** - two 32x32 tile layers plus a time limit and chip count
//! - **Optional fields** - title, passwords, hint, trap and clone machine
//!   wiring, monster movement order
//! - **Run-length layers** - compressed layer data is expanded on read;
//!   layers are always written uncompressed
//!
//! ## Quick Start
//!
//! ### Reading a pack
//!
//! ```no_run
//! use chipdat::dat;
//!
//! let pack = dat::read_pack("CHIPS.DAT")?;
//! println!("{} levels", pack.level_count());
//!
//! for level in &pack.levels {
//!     println!("{:>3} {}", level.number, level.title().unwrap_or("(untitled)"));
//! }
//! # Ok::<(), chipdat::Error>(())
//! ```
//!
//! ### Building a pack from scratch
//!
//! ```
//! use chipdat::dat::{Field, Layer, Level, LevelPack, MapTitle, serialize_pack};
//!
//! let level = Level {
//!     number: 1,
//!     time: 100,
//!     num_chips: 11,
//!     upper_layer: Layer::filled(0),
//!     lower_layer: Layer::filled(0),
//!     fields: vec![Field::Title(MapTitle::new("LESSON 1")?)],
//! };
//!
//! let mut pack = LevelPack::new();
//! pack.add_level(level);
//!
//! let bytes = serialize_pack(&pack)?;
//! assert_eq!(bytes.len(), 2081);
//! # Ok::<(), chipdat::Error>(())
//! ```
//!
//! ### Converting to and from JSON
//!
//! ```no_run
//! use chipdat::converter::convert_dat_to_json;
//!
//! convert_dat_to_json("CHIPS.DAT", "chips.json")?;
//! # Ok::<(), chipdat::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `chipdat` command-line binary

pub mod converter;
pub mod dat;
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::dat::{
        Coord, DecodeOptions, Field, Layer, Level, LevelPack, parse_pack_bytes, read_pack,
        serialize_pack, write_pack,
    };

    pub use crate::converter;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
