//! Single level display command

use std::fmt::Write as _;
use std::path::Path;

use anyhow::bail;

use crate::dat::{self, Layer, MAP_WIDTH};

pub fn execute(path: &Path, number: u16, lower: bool) -> anyhow::Result<()> {
    let pack = dat::read_pack(path)?;
    let Some(level) = pack.levels.iter().find(|level| level.number == number) else {
        bail!("no level numbered {number} in {}", path.display());
    };

    println!(
        "Level {}: {}",
        level.number,
        level.title().unwrap_or("(untitled)")
    );
    println!("  time {}  chips {}", level.time, level.num_chips);
    for field in &level.fields {
        println!("  {field}");
    }

    println!("{} layer:", if lower { "lower" } else { "upper" });
    let layer = if lower {
        &level.lower_layer
    } else {
        &level.upper_layer
    };
    print_layer(layer)?;

    Ok(())
}

// 32 rows of hex tile codes, one byte per cell.
fn print_layer(layer: &Layer) -> anyhow::Result<()> {
    for row in layer.cells().chunks(MAP_WIDTH) {
        let mut line = String::new();
        for tile in row {
            write!(line, "{tile:02X} ")?;
        }
        println!("  {}", line.trim_end());
    }
    Ok(())
}
