//! Level pack conversion between the binary DAT form and editable JSON
//!
//! The JSON form is a direct rendering of [`LevelPack`]: layers are arrays
//! of 1024 tile codes, fields are tagged objects like `{"title": "..."}`.
//! Parsing JSON enforces the same bounds as the binary decoder, so a pack
//! that loads from either form always encodes back to a valid file.

use std::fs;
use std::path::Path;

use crate::dat::{self, DecodeOptions, LevelPack};
use crate::error::Result;

/// Convert a .dat file to pretty-printed JSON
///
/// # Errors
/// Returns the decode errors of [`dat::read_pack`] and [`Error::Io`] if the
/// destination cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn convert_dat_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_dat_to_json_with(source, dest, DecodeOptions::default())
}

/// Convert a .dat file to pretty-printed JSON with explicit decode options
pub fn convert_dat_to_json_with<P: AsRef<Path>>(
    source: P,
    dest: P,
    options: DecodeOptions,
) -> Result<()> {
    tracing::info!(
        "Converting DAT→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    let data = fs::read(&source)?;
    let pack = dat::parse_pack_bytes_with(&data, options)?;
    fs::write(&dest, pack_to_json(&pack)?)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a JSON level pack to a .dat file
///
/// # Errors
/// Returns [`Error::Json`] if the JSON does not describe a valid pack, and
/// the encode errors of [`dat::write_pack`].
///
/// [`Error::Json`]: crate::Error::Json
pub fn convert_json_to_dat<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    tracing::info!(
        "Converting JSON→DAT: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    let json = fs::read_to_string(&source)?;
    let pack = pack_from_json(&json)?;
    dat::write_pack(&dest, &pack)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Render a level pack as pretty-printed JSON
pub fn pack_to_json(pack: &LevelPack) -> Result<String> {
    Ok(serde_json::to_string_pretty(pack)?)
}

/// Parse a level pack from JSON, applying the same bounds as the binary
/// decoder
pub fn pack_from_json(json: &str) -> Result<LevelPack> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::{Coord, Field, Layer, Level, MapTitle, MonsterMovement};
    use crate::error::Error;

    fn sample_pack() -> LevelPack {
        let mut upper = Layer::filled(0);
        upper.set_tile(Coord::new(16, 16).unwrap(), 2);
        let level = Level {
            number: 1,
            time: 60,
            num_chips: 4,
            upper_layer: upper,
            lower_layer: Layer::filled(0),
            fields: vec![
                Field::Title(MapTitle::new("Test").unwrap()),
                Field::MonsterMovement(
                    MonsterMovement::new(vec![Coord::new(3, 4).unwrap()]).unwrap(),
                ),
            ],
        };
        let mut pack = LevelPack::new();
        pack.add_level(level);
        pack
    }

    #[test]
    fn test_json_roundtrip_preserves_pack() {
        let pack = sample_pack();
        let json = pack_to_json(&pack).unwrap();
        assert_eq!(pack_from_json(&json).unwrap(), pack);
    }

    #[test]
    fn test_json_uses_tagged_fields() {
        let json = pack_to_json(&sample_pack()).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"monster_movement\""));
    }

    #[test]
    fn test_json_cannot_bypass_field_bounds() {
        let pack = sample_pack();
        let json = serde_json::to_string(&pack).unwrap();
        let oversized = json.replace("\"title\":\"Test\"", &format!("\"title\":\"{}\"", "X".repeat(64)));
        assert!(matches!(pack_from_json(&oversized), Err(Error::Json(_))));
    }

    #[test]
    fn test_json_cannot_bypass_layer_size() {
        let json = r#"{"levels":[{"number":1,"time":0,"num_chips":0,"upper_layer":[0,0],"lower_layer":[],"fields":[]}]}"#;
        assert!(matches!(pack_from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_empty_pack_parses() {
        let pack = pack_from_json(r#"{"levels":[]}"#).unwrap();
        assert_eq!(pack.level_count(), 0);
    }
}
