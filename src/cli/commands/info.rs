//! Level pack summary command

use std::path::Path;

use crate::dat;

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let pack = dat::read_pack(path)?;
    println!("{}: {} levels", path.display(), pack.level_count());

    for level in &pack.levels {
        let title = level.title().unwrap_or("(untitled)");
        println!(
            "  {:>3}  {title:<40}  time {:>4}  chips {:>4}  fields {}",
            level.number,
            level.time,
            level.num_chips,
            level.fields.len()
        );
    }

    Ok(())
}
