//! `.dat` level pack writing

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};

use super::{
    DAT_MAGIC, Field, LAYER_CELLS, LEVEL_FIXED_BYTES, Layer, Level, LevelPack, MAP_DETAIL,
    MAX_FIELD_PAYLOAD,
};

/// Encoded size in bytes of a level's body, as its size header declares it.
///
/// Layers are written uncompressed, so this is the fixed overhead plus two
/// full layers plus the optional field block.
pub fn level_byte_size(level: &Level) -> usize {
    LEVEL_FIXED_BYTES + 2 * LAYER_CELLS + optional_fields_byte_size(&level.fields)
}

/// Encoded size in bytes of an optional field block, entry headers included.
pub fn optional_fields_byte_size(fields: &[Field]) -> usize {
    fields.iter().map(|field| field.byte_len() + 2).sum()
}

/// Serialize a level pack to DAT bytes
///
/// # Errors
///
/// Returns [`Error::TooManyLevels`] if the pack holds more levels than the
/// 2-byte count can express, [`Error::PlainPasswordEncode`] if a level still
/// carries a clear-text password, and [`Error::FieldPayloadTooLarge`] if a
/// field payload exceeds the one-byte TLV length.
///
/// [`Error::TooManyLevels`]: crate::Error::TooManyLevels
/// [`Error::PlainPasswordEncode`]: crate::Error::PlainPasswordEncode
/// [`Error::FieldPayloadTooLarge`]: crate::Error::FieldPayloadTooLarge
pub fn serialize_pack(pack: &LevelPack) -> Result<Vec<u8>> {
    let level_count = u16::try_from(pack.levels.len()).map_err(|_| Error::TooManyLevels {
        count: pack.levels.len(),
    })?;

    let mut out = Vec::new();
    out.extend_from_slice(&DAT_MAGIC);
    out.write_u16::<LittleEndian>(level_count)?;
    for level in &pack.levels {
        write_level(&mut out, level)?;
    }
    Ok(out)
}

/// Write a level pack to disk as a .dat file
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written, plus the errors of
/// [`serialize_pack`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_pack<P: AsRef<Path>>(path: P, pack: &LevelPack) -> Result<()> {
    let bytes = serialize_pack(pack)?;
    tracing::debug!(
        "Writing {} levels ({} bytes) to {}",
        pack.level_count(),
        bytes.len(),
        path.as_ref().display()
    );
    fs::write(path, bytes)?;
    Ok(())
}

fn write_level(out: &mut Vec<u8>, level: &Level) -> Result<()> {
    let size = level_byte_size(level);
    let declared = u16::try_from(size).map_err(|_| Error::LevelTooLarge { bytes: size })?;

    if level.upper_layer.contains_sentinel() || level.lower_layer.contains_sentinel() {
        tracing::warn!(
            "Level {}: a layer cell holds 255, which reads back as a run marker",
            level.number
        );
    }

    out.write_u16::<LittleEndian>(declared)?;
    out.write_u16::<LittleEndian>(level.number)?;
    out.write_u16::<LittleEndian>(level.time)?;
    out.write_u16::<LittleEndian>(level.num_chips)?;
    out.write_u16::<LittleEndian>(MAP_DETAIL)?;
    write_layer(out, &level.upper_layer)?;
    write_layer(out, &level.lower_layer)?;
    write_fields(out, &level.fields)
}

// Layers are written uncompressed behind their 2-byte length prefix; the
// run-length form is only ever consumed, never produced.
fn write_layer(out: &mut Vec<u8>, layer: &Layer) -> Result<()> {
    out.write_u16::<LittleEndian>(layer.cells().len() as u16)?;
    out.extend_from_slice(layer.cells());
    Ok(())
}

fn write_fields(out: &mut Vec<u8>, fields: &[Field]) -> Result<()> {
    let total = optional_fields_byte_size(fields);
    out.write_u16::<LittleEndian>(total as u16)?;

    for field in fields {
        if matches!(field, Field::PlainPassword(_)) {
            return Err(Error::PlainPasswordEncode);
        }
        let len = field.byte_len();
        if len > MAX_FIELD_PAYLOAD {
            return Err(Error::FieldPayloadTooLarge { len });
        }
        out.write_u8(field.type_id())?;
        out.write_u8(len as u8)?;
        out.extend_from_slice(&field.byte_data());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::{
        Coord, EncodedPassword, MapHint, MapTitle, MonsterMovement, PlainPassword, RawField,
        TrapControl, TrapControls, parse_pack_bytes,
    };

    fn test_level(number: u16, fields: Vec<Field>) -> Level {
        Level {
            number,
            time: 100,
            num_chips: 11,
            upper_layer: Layer::filled(0),
            lower_layer: Layer::filled(0),
            fields,
        }
    }

    #[test]
    fn test_empty_pack_is_header_only() {
        let bytes = serialize_pack(&LevelPack::new()).unwrap();
        assert_eq!(bytes, vec![0xAC, 0xAA, 0x02, 0x00, 0, 0]);
    }

    #[test]
    fn test_size_headers_follow_the_formula() {
        let fields = vec![
            Field::Title(MapTitle::new("Test").unwrap()),
            Field::Hint(MapHint::new("Go right").unwrap()),
            Field::TrapControls(
                TrapControls::new(vec![TrapControl {
                    button: Coord::new(1, 2).unwrap(),
                    trap: Coord::new(3, 4).unwrap(),
                }])
                .unwrap(),
            ),
        ];
        let level = test_level(1, fields);

        // Title 4+1, hint 8+1, one trap link 10, each behind a 2-byte
        // entry header.
        assert_eq!(optional_fields_byte_size(&level.fields), 30);
        assert_eq!(level_byte_size(&level), 14 + 1024 + 1024 + 30);

        let mut pack = LevelPack::new();
        pack.add_level(level);
        let bytes = serialize_pack(&pack).unwrap();

        // File is the 6-byte pack header, the size word, then the body.
        assert_eq!(bytes.len(), 6 + 2 + 2092);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 2092);
        // Both layer length prefixes declare a full uncompressed grid.
        assert_eq!(u16::from_le_bytes([bytes[16], bytes[17]]), 1024);
        assert_eq!(u16::from_le_bytes([bytes[1042], bytes[1043]]), 1024);
        // The optional field total covers the three entries.
        assert_eq!(u16::from_le_bytes([bytes[2068], bytes[2069]]), 30);
    }

    #[test]
    fn test_serialized_pack_parses_back() {
        let fields = vec![
            Field::Title(MapTitle::new("LESSON 1").unwrap()),
            Field::EncodedPassword(EncodedPassword::new(vec![0x99, 0x98, 0x97, 0x96]).unwrap()),
            Field::MonsterMovement(
                MonsterMovement::new(vec![Coord::new(7, 7).unwrap()]).unwrap(),
            ),
        ];
        let mut level = test_level(1, fields);
        level.upper_layer.set_tile(Coord::new(5, 5).unwrap(), 110);

        let mut pack = LevelPack::new();
        pack.add_level(level);
        pack.add_level(test_level(2, Vec::new()));

        let bytes = serialize_pack(&pack).unwrap();
        assert_eq!(parse_pack_bytes(&bytes).unwrap(), pack);
    }

    #[test]
    fn test_plain_password_is_refused() {
        let fields = vec![Field::PlainPassword(PlainPassword::new("BDHP").unwrap())];
        let mut pack = LevelPack::new();
        pack.add_level(test_level(1, fields));
        assert!(matches!(
            serialize_pack(&pack),
            Err(Error::PlainPasswordEncode)
        ));
    }

    #[test]
    fn test_oversized_field_payload_is_refused() {
        // 128 monsters are constructible but need a 256-byte payload, one
        // more than the TLV length byte can frame.
        let monsters = vec![Coord::new(0, 0).unwrap(); 128];
        let fields = vec![Field::MonsterMovement(MonsterMovement::new(monsters).unwrap())];
        let mut pack = LevelPack::new();
        pack.add_level(test_level(1, fields));
        assert!(matches!(
            serialize_pack(&pack),
            Err(Error::FieldPayloadTooLarge { len: 256 })
        ));
    }

    #[test]
    fn test_oversized_level_is_refused() {
        // 250 raw entries of 255 bytes push the level size past 16 bits.
        let raw = Field::Unknown(RawField {
            type_id: 9,
            data: vec![0; 255],
        });
        let mut pack = LevelPack::new();
        pack.add_level(test_level(1, vec![raw; 250]));
        assert!(matches!(
            serialize_pack(&pack),
            Err(Error::LevelTooLarge { bytes: 66312 })
        ));
    }

    #[test]
    fn test_too_many_levels_is_refused() {
        let pack = LevelPack {
            levels: vec![test_level(1, Vec::new()); 65536],
        };
        assert!(matches!(
            serialize_pack(&pack),
            Err(Error::TooManyLevels { count: 65536 })
        ));
    }

    #[test]
    fn test_sentinel_cells_still_encode() {
        let mut level = test_level(1, Vec::new());
        level.lower_layer.set_tile(Coord::new(0, 0).unwrap(), 255);
        let mut pack = LevelPack::new();
        pack.add_level(level);
        assert!(serialize_pack(&pack).is_ok());
    }
}
