//! `.dat` level pack reading and parsing

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

use super::{DAT_MAGIC, Field, Layer, Level, LevelPack, MAP_DETAIL, RawField};

/// Knobs for tolerating nonstandard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Keep optional fields with unrecognized type identifiers as
    /// [`Field::Unknown`] instead of failing the whole pack. Their payload
    /// bytes pass through a rewrite untouched.
    pub keep_unknown_fields: bool,
}

/// Read a .dat level pack from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
/// Returns [`Error::InvalidDatMagic`] if the file does not start with the
/// DAT magic bytes, and the other decode errors for malformed level data.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::InvalidDatMagic`]: crate::Error::InvalidDatMagic
pub fn read_pack<P: AsRef<Path>>(path: P) -> Result<LevelPack> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_pack_bytes(&buffer)
}

/// Parse .dat data from bytes, rejecting unknown optional field types
///
/// # Errors
///
/// Returns [`Error::InvalidDatMagic`] if the data does not start with the
/// DAT magic bytes.
/// Returns [`Error::Truncated`] if the data ends inside a header, layer, or
/// field.
///
/// [`Error::InvalidDatMagic`]: crate::Error::InvalidDatMagic
/// [`Error::Truncated`]: crate::Error::Truncated
pub fn parse_pack_bytes(data: &[u8]) -> Result<LevelPack> {
    parse_pack_bytes_with(data, DecodeOptions::default())
}

/// Parse .dat data from bytes with explicit decode options
///
/// # Errors
///
/// Same as [`parse_pack_bytes`], except that unknown optional field types
/// become [`Field::Unknown`] entries when
/// [`DecodeOptions::keep_unknown_fields`] is set.
pub fn parse_pack_bytes_with(data: &[u8], options: DecodeOptions) -> Result<LevelPack> {
    let mut cursor = Cursor::new(data);

    // Read header (6 bytes): magic then level count
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != DAT_MAGIC {
        return Err(Error::InvalidDatMagic(magic));
    }

    let level_count = cursor.read_u16::<LittleEndian>()?;
    tracing::debug!("Reading level pack with {} levels", level_count);

    let mut levels = Vec::with_capacity(usize::from(level_count));
    for index in 0..usize::from(level_count) {
        levels.push(read_level(&mut cursor, index, options)?);
    }

    let position = cursor.position() as usize;
    if position < data.len() {
        tracing::debug!(
            "Ignoring {} bytes after the last level",
            data.len() - position
        );
    }

    Ok(LevelPack { levels })
}

fn read_level(cursor: &mut Cursor<&[u8]>, index: usize, options: DecodeOptions) -> Result<Level> {
    // The size word covers everything after itself up to the end of the
    // optional field block.
    let declared = cursor.read_u16::<LittleEndian>()?;
    let body_start = cursor.position();

    let number = cursor.read_u16::<LittleEndian>()?;
    let time = cursor.read_u16::<LittleEndian>()?;
    let num_chips = cursor.read_u16::<LittleEndian>()?;

    // Reserved word, 1 in every known file
    let map_detail = cursor.read_u16::<LittleEndian>()?;
    if map_detail != MAP_DETAIL {
        tracing::warn!(
            "Level {}: map detail word is {}, expected {}",
            number,
            map_detail,
            MAP_DETAIL
        );
    }

    let upper_layer = read_layer(cursor)?;
    let lower_layer = read_layer(cursor)?;
    let fields = read_fields(cursor, options)?;

    let actual = (cursor.position() - body_start) as usize;
    if actual != usize::from(declared) {
        return Err(Error::LevelSizeMismatch {
            index,
            declared,
            actual,
        });
    }

    Ok(Level {
        number,
        time,
        num_chips,
        upper_layer,
        lower_layer,
        fields,
    })
}

fn read_layer(cursor: &mut Cursor<&[u8]>) -> Result<Layer> {
    let byte_count = cursor.read_u16::<LittleEndian>()?;
    let mut encoded = vec![0u8; usize::from(byte_count)];
    cursor.read_exact(&mut encoded)?;
    Layer::decode(&encoded)
}

fn read_fields(cursor: &mut Cursor<&[u8]>, options: DecodeOptions) -> Result<Vec<Field>> {
    let mut remaining = usize::from(cursor.read_u16::<LittleEndian>()?);
    let mut fields = Vec::new();

    // Walk (type, length, payload) entries until the declared total is spent.
    while remaining > 0 {
        if remaining < 2 {
            return Err(Error::FieldBlockFraming {
                needed: 2,
                remaining,
            });
        }
        let type_id = cursor.read_u8()?;
        let byte_count = usize::from(cursor.read_u8()?);
        remaining -= 2;

        if byte_count > remaining {
            return Err(Error::FieldBlockFraming {
                needed: byte_count,
                remaining,
            });
        }
        let mut payload = vec![0u8; byte_count];
        cursor.read_exact(&mut payload)?;
        remaining -= byte_count;

        match Field::from_bytes(type_id, &payload) {
            Ok(field) => fields.push(field),
            Err(Error::UnsupportedFieldType { type_id }) if options.keep_unknown_fields => {
                tracing::warn!(
                    "Keeping unknown optional field type {} ({} bytes)",
                    type_id,
                    byte_count
                );
                fields.push(Field::Unknown(RawField {
                    type_id,
                    data: payload,
                }));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(fields)
}
