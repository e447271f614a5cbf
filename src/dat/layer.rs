//! Map layer storage and the run-length layer codec
//!
//! A layer is always exactly 32x32 tile codes, stored row-major. On disk a
//! layer may be run-length compressed: the byte 255 marks a `(count, tile)`
//! pair, any other byte is a literal tile. Decoding expands runs; encoding
//! writes the cells verbatim, matching the tooling this format grew up with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{Coord, LAYER_CELLS, MAP_WIDTH, RLE_SENTINEL};

/// One 32x32 grid of tile codes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Layer(Box<[u8; LAYER_CELLS]>);

impl Layer {
    /// A layer with every cell set to `tile`.
    pub fn filled(tile: u8) -> Self {
        Self(Box::new([tile; LAYER_CELLS]))
    }

    /// Build a layer from exactly [`LAYER_CELLS`] row-major cells.
    ///
    /// # Errors
    /// Returns [`Error::LayerCellCount`] for any other length.
    pub fn from_cells(cells: Vec<u8>) -> Result<Self> {
        let count = cells.len();
        let cells: Box<[u8; LAYER_CELLS]> = cells
            .into_boxed_slice()
            .try_into()
            .map_err(|_| Error::LayerCellCount { cells: count })?;
        Ok(Self(cells))
    }

    /// Expand a possibly run-length-compressed wire payload.
    ///
    /// # Errors
    /// Returns [`Error::Truncated`] when a 255 marker is not followed by its
    /// count and tile bytes, and [`Error::LayerCellCount`] when the expansion
    /// does not come out to exactly [`LAYER_CELLS`] cells.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let mut cells = Vec::with_capacity(LAYER_CELLS);
        let mut bytes = encoded.iter().copied();
        while let Some(byte) = bytes.next() {
            if byte == RLE_SENTINEL {
                let count = bytes.next().ok_or(Error::Truncated)?;
                let tile = bytes.next().ok_or(Error::Truncated)?;
                cells.resize(cells.len() + usize::from(count), tile);
            } else {
                cells.push(byte);
            }
        }
        Self::from_cells(cells)
    }

    /// The cells in row-major order, `y * 32 + x`.
    pub fn cells(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn tile(&self, coord: Coord) -> u8 {
        self.0[cell_index(coord)]
    }

    pub fn set_tile(&mut self, coord: Coord, tile: u8) {
        self.0[cell_index(coord)] = tile;
    }

    /// Whether any cell holds the value 255.
    ///
    /// Such a layer still encodes, but a reader treats the byte as a
    /// run marker, so the file will not decode back to the same grid.
    pub fn contains_sentinel(&self) -> bool {
        self.0.contains(&RLE_SENTINEL)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer({} cells)", self.0.len())
    }
}

impl TryFrom<Vec<u8>> for Layer {
    type Error = Error;

    fn try_from(cells: Vec<u8>) -> Result<Self> {
        Self::from_cells(cells)
    }
}

impl From<Layer> for Vec<u8> {
    fn from(layer: Layer) -> Self {
        layer.0.to_vec()
    }
}

fn cell_index(coord: Coord) -> usize {
    usize::from(coord.y()) * MAP_WIDTH + usize::from(coord.x())
}
