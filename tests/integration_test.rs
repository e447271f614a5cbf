use chipdat::converter;
use chipdat::dat::{
    CloneControl, CloneControls, EncodedPassword, MapHint, MapTitle, MonsterMovement, RawField,
    TrapControl, TrapControls, parse_pack_bytes_with,
};
use chipdat::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

// One level exercising every encodable field kind.
fn full_level() -> Level {
    let mut upper = Layer::filled(0);
    upper.set_tile(Coord::new(13, 6).unwrap(), 110);
    let mut lower = Layer::filled(0);
    lower.set_tile(Coord::new(13, 7).unwrap(), 21);

    let fields = vec![
        Field::Title(MapTitle::new("GLADIATOR").unwrap()),
        Field::TrapControls(
            TrapControls::new(vec![TrapControl {
                button: Coord::new(3, 3).unwrap(),
                trap: Coord::new(4, 4).unwrap(),
            }])
            .unwrap(),
        ),
        Field::CloneControls(
            CloneControls::new(vec![CloneControl {
                button: Coord::new(5, 5).unwrap(),
                machine: Coord::new(6, 6).unwrap(),
            }])
            .unwrap(),
        ),
        Field::EncodedPassword(EncodedPassword::new(vec![0x95, 0x92, 0x90, 0x91]).unwrap()),
        Field::Hint(MapHint::new("Watch out for the ball").unwrap()),
        Field::MonsterMovement(
            MonsterMovement::new(vec![Coord::new(13, 6).unwrap(), Coord::new(13, 7).unwrap()])
                .unwrap(),
        ),
    ];

    Level {
        number: 1,
        time: 150,
        num_chips: 3,
        upper_layer: upper,
        lower_layer: lower,
        fields,
    }
}

// A single-level pack with both layers run-length compressed: four full runs
// of zeros, then the literal cells 110, 0, 0, 0.
fn compressed_pack_bytes() -> Vec<u8> {
    let mut layer = Vec::new();
    for _ in 0..4 {
        layer.extend_from_slice(&[255, 255, 0]);
    }
    layer.extend_from_slice(&[110, 0, 0, 0]);

    let size = 8 + 2 * (2 + layer.len()) + 2;
    let mut bytes = vec![0xAC, 0xAA, 0x02, 0x00, 1, 0];
    bytes.extend_from_slice(&(size as u16).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // number
    bytes.extend_from_slice(&0u16.to_le_bytes()); // time
    bytes.extend_from_slice(&0u16.to_le_bytes()); // chips
    bytes.extend_from_slice(&1u16.to_le_bytes()); // map detail
    for _ in 0..2 {
        bytes.extend_from_slice(&(layer.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&layer);
    }
    bytes.extend_from_slice(&0u16.to_le_bytes()); // no optional fields
    bytes
}

#[test]
fn test_dat_roundtrip_preserves_every_field_kind() {
    let mut pack = LevelPack::new();
    pack.add_level(full_level());

    let bytes = serialize_pack(&pack).unwrap();
    assert_eq!(parse_pack_bytes(&bytes).unwrap(), pack);
}

#[test]
fn test_disk_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.dat");

    let mut pack = LevelPack::new();
    pack.add_level(full_level());
    write_pack(&path, &pack).unwrap();

    assert_eq!(read_pack(&path).unwrap(), pack);
}

#[test]
fn test_json_conversion_roundtrip() {
    let dir = tempdir().unwrap();
    let dat_path = dir.path().join("pack.dat");
    let json_path = dir.path().join("pack.json");
    let back_path = dir.path().join("back.dat");

    let mut pack = LevelPack::new();
    pack.add_level(full_level());
    write_pack(&dat_path, &pack).unwrap();

    converter::convert_dat_to_json(&dat_path, &json_path).unwrap();
    converter::convert_json_to_dat(&json_path, &back_path).unwrap();

    assert_eq!(read_pack(&back_path).unwrap(), pack);
}

#[test]
fn test_compressed_input_is_rewritten_uncompressed() {
    let compressed = compressed_pack_bytes();
    let pack = parse_pack_bytes(&compressed).unwrap();
    assert_eq!(pack.levels[0].upper_layer.cells()[1020], 110);

    let rewritten = serialize_pack(&pack).unwrap();
    assert!(rewritten.len() > compressed.len());
    // Pack header, size word, fixed level body, two full uncompressed grids.
    assert_eq!(rewritten.len(), 6 + 2 + 14 + 2048);
    assert_eq!(parse_pack_bytes(&rewritten).unwrap(), pack);
}

#[test]
fn test_unknown_fields_survive_a_lenient_rewrite() {
    let mut level = full_level();
    level.fields.push(Field::Unknown(RawField {
        type_id: 9,
        data: vec![1, 2, 3],
    }));
    let mut pack = LevelPack::new();
    pack.add_level(level);

    let bytes = serialize_pack(&pack).unwrap();
    assert!(matches!(
        parse_pack_bytes(&bytes),
        Err(Error::UnsupportedFieldType { type_id: 9 })
    ));

    let options = DecodeOptions {
        keep_unknown_fields: true,
    };
    assert_eq!(parse_pack_bytes_with(&bytes, options).unwrap(), pack);
}
