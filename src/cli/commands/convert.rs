//! File format conversion command

use std::path::Path;

use anyhow::{Context, bail};

use crate::converter;
use crate::dat::DecodeOptions;

pub fn execute(source: &Path, destination: &Path, keep_unknown: bool) -> anyhow::Result<()> {
    let from = extension_of(source)?;
    let to = extension_of(destination)?;

    match (from.as_str(), to.as_str()) {
        ("dat" | "ccl", "json") => {
            let options = DecodeOptions {
                keep_unknown_fields: keep_unknown,
            };
            converter::convert_dat_to_json_with(source, destination, options)?;
        }
        ("json", "dat" | "ccl") => {
            converter::convert_json_to_dat(source, destination)?;
        }
        (from, to) => bail!("cannot convert .{from} to .{to}; expected .dat/.ccl and .json"),
    }

    Ok(())
}

fn extension_of(path: &Path) -> anyhow::Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .with_context(|| format!("{} has no extension to infer a format from", path.display()))
}
