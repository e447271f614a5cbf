//! Optional level metadata fields and the small value types inside them
//!
//! Every field kind knows its wire type identifier, how to render its
//! payload to bytes, and how to rebuild itself from a raw payload. Bounds
//! are enforced at construction; a value that exists is a value that fits
//! the format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A position on the 32x32 map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Largest valid value for either axis.
    pub const MAX: u8 = 31;

    pub fn new(x: u8, y: u8) -> Result<Self> {
        if x > Self::MAX {
            return Err(Error::BoundsViolation {
                what: "coordinate x",
                value: usize::from(x),
                min: 0,
                max: usize::from(Self::MAX),
            });
        }
        if y > Self::MAX {
            return Err(Error::BoundsViolation {
                what: "coordinate y",
                value: usize::from(y),
                min: 0,
                max: usize::from(Self::MAX),
            });
        }
        Ok(Self { x, y })
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }
}

impl TryFrom<(u8, u8)> for Coord {
    type Error = Error;

    fn try_from((x, y): (u8, u8)) -> Result<Self> {
        Self::new(x, y)
    }
}

impl From<Coord> for (u8, u8) {
    fn from(coord: Coord) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A brown button wired to a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapControl {
    /// Location of the brown button.
    pub button: Coord,
    /// Location of the trap it opens.
    pub trap: Coord,
}

/// A red button wired to a cloning machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneControl {
    /// Location of the red button.
    pub button: Coord,
    /// Location of the cloning machine it fires.
    pub machine: Coord,
}

/// Level title, at most 63 ASCII characters (wire type 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MapTitle(String);

impl MapTitle {
    pub const TYPE_ID: u8 = 3;
    pub const MAX_LEN: usize = 63;

    pub fn new(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if !title.is_ascii() {
            return Err(Error::NotAscii { what: "map title" });
        }
        if title.len() > Self::MAX_LEN {
            return Err(Error::BoundsViolation {
                what: "map title length",
                value: title.len(),
                min: 0,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        Self::new(string_payload(Self::TYPE_ID, payload, "map title")?)
    }

    /// The title followed by its NUL terminator.
    pub fn byte_data(&self) -> Vec<u8> {
        string_bytes(&self.0)
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() + 1
    }
}

/// Brown button / trap wiring, at most 25 links (wire type 4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrapControl>", into = "Vec<TrapControl>")]
pub struct TrapControls(Vec<TrapControl>);

impl TrapControls {
    pub const TYPE_ID: u8 = 4;
    pub const MAX_ENTRIES: usize = 25;
    /// Wire bytes per link: four 2-byte coordinates plus two zero padding
    /// bytes the format requires for traps.
    const WIRE_STRIDE: usize = 10;

    pub fn new(controls: Vec<TrapControl>) -> Result<Self> {
        if controls.len() > Self::MAX_ENTRIES {
            return Err(Error::BoundsViolation {
                what: "trap control count",
                value: controls.len(),
                min: 0,
                max: Self::MAX_ENTRIES,
            });
        }
        Ok(Self(controls))
    }

    pub fn controls(&self) -> &[TrapControl] {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        check_stride(Self::TYPE_ID, payload, Self::WIRE_STRIDE)?;
        let mut controls = Vec::with_capacity(payload.len() / Self::WIRE_STRIDE);
        for record in payload.chunks_exact(Self::WIRE_STRIDE) {
            controls.push(TrapControl {
                button: wire_coord(le16(record, 0), le16(record, 2))?,
                trap: wire_coord(le16(record, 4), le16(record, 6))?,
            });
        }
        Self::new(controls)
    }

    pub fn byte_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for control in &self.0 {
            push_coord16(&mut bytes, control.button);
            push_coord16(&mut bytes, control.trap);
            // Trailing zero word per trap entry; the format demands it.
            bytes.extend_from_slice(&[0, 0]);
        }
        bytes
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() * Self::WIRE_STRIDE
    }
}

/// Red button / cloning machine wiring, at most 31 links (wire type 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CloneControl>", into = "Vec<CloneControl>")]
pub struct CloneControls(Vec<CloneControl>);

impl CloneControls {
    pub const TYPE_ID: u8 = 5;
    pub const MAX_ENTRIES: usize = 31;
    /// Wire bytes per link: four 2-byte coordinates, no padding.
    const WIRE_STRIDE: usize = 8;

    pub fn new(controls: Vec<CloneControl>) -> Result<Self> {
        if controls.len() > Self::MAX_ENTRIES {
            return Err(Error::BoundsViolation {
                what: "cloning machine count",
                value: controls.len(),
                min: 0,
                max: Self::MAX_ENTRIES,
            });
        }
        Ok(Self(controls))
    }

    pub fn controls(&self) -> &[CloneControl] {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        check_stride(Self::TYPE_ID, payload, Self::WIRE_STRIDE)?;
        let mut controls = Vec::with_capacity(payload.len() / Self::WIRE_STRIDE);
        for record in payload.chunks_exact(Self::WIRE_STRIDE) {
            controls.push(CloneControl {
                button: wire_coord(le16(record, 0), le16(record, 2))?,
                machine: wire_coord(le16(record, 4), le16(record, 6))?,
            });
        }
        Self::new(controls)
    }

    pub fn byte_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for control in &self.0 {
            push_coord16(&mut bytes, control.button);
            push_coord16(&mut bytes, control.machine);
        }
        bytes
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() * Self::WIRE_STRIDE
    }
}

/// Password in its encoded on-disk form, 4 to 9 bytes (wire type 6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct EncodedPassword(Vec<u8>);

impl EncodedPassword {
    pub const TYPE_ID: u8 = 6;
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 9;

    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < Self::MIN_LEN || bytes.len() > Self::MAX_LEN {
            return Err(Error::BoundsViolation {
                what: "encoded password length",
                value: bytes.len(),
                min: Self::MIN_LEN,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        let Some((&0, body)) = payload.split_last() else {
            return Err(Error::UnterminatedString {
                type_id: Self::TYPE_ID,
            });
        };
        Self::new(body.to_vec())
    }

    pub fn byte_data(&self) -> Vec<u8> {
        let mut bytes = self.0.clone();
        bytes.push(0);
        bytes
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() + 1
    }
}

/// Hint text, at most 127 ASCII characters (wire type 7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MapHint(String);

impl MapHint {
    pub const TYPE_ID: u8 = 7;
    pub const MAX_LEN: usize = 127;

    pub fn new(hint: impl Into<String>) -> Result<Self> {
        let hint = hint.into();
        if !hint.is_ascii() {
            return Err(Error::NotAscii { what: "hint" });
        }
        if hint.len() > Self::MAX_LEN {
            return Err(Error::BoundsViolation {
                what: "hint length",
                value: hint.len(),
                min: 0,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(hint))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        Self::new(string_payload(Self::TYPE_ID, payload, "hint")?)
    }

    pub fn byte_data(&self) -> Vec<u8> {
        string_bytes(&self.0)
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() + 1
    }
}

/// Password in clear text, 4 to 9 ASCII characters (wire type 8).
///
/// Found in some legacy files but never written by this crate; the encoder
/// rejects levels carrying it. Use [`EncodedPassword`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlainPassword(String);

impl PlainPassword {
    pub const TYPE_ID: u8 = 8;
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 9;

    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if !password.is_ascii() {
            return Err(Error::NotAscii {
                what: "plain password",
            });
        }
        if password.len() < Self::MIN_LEN || password.len() > Self::MAX_LEN {
            return Err(Error::BoundsViolation {
                what: "plain password length",
                value: password.len(),
                min: Self::MIN_LEN,
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        Self::new(string_payload(Self::TYPE_ID, payload, "plain password")?)
    }

    pub fn byte_data(&self) -> Vec<u8> {
        string_bytes(&self.0)
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() + 1
    }
}

/// Initial monster positions in movement order, at most 128 (wire type 10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct MonsterMovement(Vec<Coord>);

impl MonsterMovement {
    pub const TYPE_ID: u8 = 10;
    pub const MAX_ENTRIES: usize = 128;
    /// Wire bytes per monster: one byte per axis, unlike the 2-byte control
    /// coordinates.
    const WIRE_STRIDE: usize = 2;

    pub fn new(monsters: Vec<Coord>) -> Result<Self> {
        if monsters.len() > Self::MAX_ENTRIES {
            return Err(Error::BoundsViolation {
                what: "monster count",
                value: monsters.len(),
                min: 0,
                max: Self::MAX_ENTRIES,
            });
        }
        Ok(Self(monsters))
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    fn from_bytes(payload: &[u8]) -> Result<Self> {
        check_stride(Self::TYPE_ID, payload, Self::WIRE_STRIDE)?;
        let mut monsters = Vec::with_capacity(payload.len() / Self::WIRE_STRIDE);
        for record in payload.chunks_exact(Self::WIRE_STRIDE) {
            monsters.push(Coord::new(record[0], record[1])?);
        }
        Self::new(monsters)
    }

    pub fn byte_data(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for coord in &self.0 {
            bytes.push(coord.x());
            bytes.push(coord.y());
        }
        bytes
    }

    pub fn byte_len(&self) -> usize {
        self.0.len() * Self::WIRE_STRIDE
    }
}

/// An optional field of a type this crate does not model.
///
/// Only produced when decoding with
/// [`DecodeOptions::keep_unknown_fields`](crate::dat::DecodeOptions); the
/// payload passes through encode untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    /// The wire type identifier.
    pub type_id: u8,
    /// The raw payload bytes.
    pub data: Vec<u8>,
}

/// One optional metadata entry of a level.
///
/// The wire form is `(type: 1 byte, length: 1 byte, payload)`; the variants
/// cover every type identifier the DAT format defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Level title (type 3).
    Title(MapTitle),
    /// Brown button / trap wiring (type 4).
    TrapControls(TrapControls),
    /// Red button / cloning machine wiring (type 5).
    CloneControls(CloneControls),
    /// Password, encoded (type 6).
    EncodedPassword(EncodedPassword),
    /// Hint text (type 7).
    Hint(MapHint),
    /// Password in clear text (type 8, decode-only).
    PlainPassword(PlainPassword),
    /// Monster start positions (type 10).
    MonsterMovement(MonsterMovement),
    /// Unrecognized type, raw payload (lenient decode only).
    Unknown(RawField),
}

impl Field {
    /// The wire type identifier of this field.
    pub fn type_id(&self) -> u8 {
        match self {
            Field::Title(_) => MapTitle::TYPE_ID,
            Field::TrapControls(_) => TrapControls::TYPE_ID,
            Field::CloneControls(_) => CloneControls::TYPE_ID,
            Field::EncodedPassword(_) => EncodedPassword::TYPE_ID,
            Field::Hint(_) => MapHint::TYPE_ID,
            Field::PlainPassword(_) => PlainPassword::TYPE_ID,
            Field::MonsterMovement(_) => MonsterMovement::TYPE_ID,
            Field::Unknown(raw) => raw.type_id,
        }
    }

    /// The field payload as it appears on the wire, without the two-byte
    /// `(type, length)` entry header.
    pub fn byte_data(&self) -> Vec<u8> {
        match self {
            Field::Title(title) => title.byte_data(),
            Field::TrapControls(controls) => controls.byte_data(),
            Field::CloneControls(controls) => controls.byte_data(),
            Field::EncodedPassword(password) => password.byte_data(),
            Field::Hint(hint) => hint.byte_data(),
            Field::PlainPassword(password) => password.byte_data(),
            Field::MonsterMovement(monsters) => monsters.byte_data(),
            Field::Unknown(raw) => raw.data.clone(),
        }
    }

    /// Length of [`byte_data`](Self::byte_data) without building it.
    pub fn byte_len(&self) -> usize {
        match self {
            Field::Title(title) => title.byte_len(),
            Field::TrapControls(controls) => controls.byte_len(),
            Field::CloneControls(controls) => controls.byte_len(),
            Field::EncodedPassword(password) => password.byte_len(),
            Field::Hint(hint) => hint.byte_len(),
            Field::PlainPassword(password) => password.byte_len(),
            Field::MonsterMovement(monsters) => monsters.byte_len(),
            Field::Unknown(raw) => raw.data.len(),
        }
    }

    /// Rebuild a field from its declared type identifier and payload.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFieldType`] for a type identifier outside
    /// the format, and a bounds/payload error if the payload does not form a
    /// valid field of the declared type.
    pub fn from_bytes(type_id: u8, payload: &[u8]) -> Result<Self> {
        match type_id {
            MapTitle::TYPE_ID => Ok(Field::Title(MapTitle::from_bytes(payload)?)),
            TrapControls::TYPE_ID => Ok(Field::TrapControls(TrapControls::from_bytes(payload)?)),
            CloneControls::TYPE_ID => {
                Ok(Field::CloneControls(CloneControls::from_bytes(payload)?))
            }
            EncodedPassword::TYPE_ID => {
                Ok(Field::EncodedPassword(EncodedPassword::from_bytes(payload)?))
            }
            MapHint::TYPE_ID => Ok(Field::Hint(MapHint::from_bytes(payload)?)),
            PlainPassword::TYPE_ID => {
                Ok(Field::PlainPassword(PlainPassword::from_bytes(payload)?))
            }
            MonsterMovement::TYPE_ID => {
                Ok(Field::MonsterMovement(MonsterMovement::from_bytes(payload)?))
            }
            _ => Err(Error::UnsupportedFieldType { type_id }),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title(title) => write!(f, "title: \"{}\"", title.as_str()),
            Field::TrapControls(controls) => {
                write!(f, "trap controls:")?;
                for control in controls.controls() {
                    write!(f, " button{}->trap{}", control.button, control.trap)?;
                }
                Ok(())
            }
            Field::CloneControls(controls) => {
                write!(f, "clone controls:")?;
                for control in controls.controls() {
                    write!(f, " button{}->machine{}", control.button, control.machine)?;
                }
                Ok(())
            }
            Field::EncodedPassword(password) => {
                write!(f, "encoded password: {:?}", password.bytes())
            }
            Field::Hint(hint) => write!(f, "hint: \"{}\"", hint.as_str()),
            Field::PlainPassword(password) => write!(f, "password: \"{}\"", password.as_str()),
            Field::MonsterMovement(monsters) => {
                write!(f, "monster movement:")?;
                for coord in monsters.coords() {
                    write!(f, " {coord}")?;
                }
                Ok(())
            }
            Field::Unknown(raw) => {
                write!(f, "unknown field (type {}, {} bytes)", raw.type_id, raw.data.len())
            }
        }
    }
}

impl TryFrom<String> for MapTitle {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MapTitle> for String {
    fn from(title: MapTitle) -> Self {
        title.0
    }
}

impl TryFrom<String> for MapHint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MapHint> for String {
    fn from(hint: MapHint) -> Self {
        hint.0
    }
}

impl TryFrom<String> for PlainPassword {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PlainPassword> for String {
    fn from(password: PlainPassword) -> Self {
        password.0
    }
}

impl TryFrom<Vec<u8>> for EncodedPassword {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EncodedPassword> for Vec<u8> {
    fn from(password: EncodedPassword) -> Self {
        password.0
    }
}

impl TryFrom<Vec<TrapControl>> for TrapControls {
    type Error = Error;

    fn try_from(value: Vec<TrapControl>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TrapControls> for Vec<TrapControl> {
    fn from(controls: TrapControls) -> Self {
        controls.0
    }
}

impl TryFrom<Vec<CloneControl>> for CloneControls {
    type Error = Error;

    fn try_from(value: Vec<CloneControl>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CloneControls> for Vec<CloneControl> {
    fn from(controls: CloneControls) -> Self {
        controls.0
    }
}

impl TryFrom<Vec<Coord>> for MonsterMovement {
    type Error = Error;

    fn try_from(value: Vec<Coord>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MonsterMovement> for Vec<Coord> {
    fn from(monsters: MonsterMovement) -> Self {
        monsters.0
    }
}

/// Read a little-endian u16 at `at`. Callers index into stride-checked
/// chunks, so the two bytes are always present.
fn le16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn push_coord16(bytes: &mut Vec<u8>, coord: Coord) {
    bytes.extend_from_slice(&u16::from(coord.x()).to_le_bytes());
    bytes.extend_from_slice(&u16::from(coord.y()).to_le_bytes());
}

/// Narrow a wire u16 back into a grid coordinate pair.
fn wire_coord(x: u16, y: u16) -> Result<Coord> {
    let axis = |what: &'static str, value: u16| -> Result<u8> {
        if value > u16::from(Coord::MAX) {
            return Err(Error::BoundsViolation {
                what,
                value: usize::from(value),
                min: 0,
                max: usize::from(Coord::MAX),
            });
        }
        Ok(value as u8)
    };
    Coord::new(axis("coordinate x", x)?, axis("coordinate y", y)?)
}

fn check_stride(type_id: u8, payload: &[u8], stride: usize) -> Result<()> {
    if payload.len() % stride != 0 {
        return Err(Error::MisalignedFieldPayload {
            type_id,
            len: payload.len(),
            stride,
        });
    }
    Ok(())
}

/// Strip the NUL terminator from a string payload and decode it as ASCII.
fn string_payload(type_id: u8, payload: &[u8], what: &'static str) -> Result<String> {
    let Some((&0, body)) = payload.split_last() else {
        return Err(Error::UnterminatedString { type_id });
    };
    if !body.is_ascii() {
        return Err(Error::NotAscii { what });
    }
    Ok(String::from_utf8_lossy(body).into_owned())
}

fn string_bytes(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    bytes
}
