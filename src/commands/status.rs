use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use std::path::Path;

use crate::{git, manifest::SplitManifest};

pub fn run(split_repo: &Path) -> Result<()> {
    let manifest = SplitManifest::load(split_repo)?;

    if manifest.modules.is_empty() {
        println!("No split modules recorded yet. Run {} first.", "hordesplit split".bold());
        return Ok(());
    }

    println!(
        "{} {} split module(s) under '{}'",
        "→".blue().bold(),
        manifest.modules.len().to_string().yellow(),
        split_repo.display().to_string().cyan()
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Module").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Directory").add_attribute(Attribute::Bold),
            Cell::new("Git").add_attribute(Attribute::Bold),
        ]);

    for module in &manifest.modules {
        let dir = split_repo.join(&module.canonical);
        let git_cell = if git::is_repository(&dir) { "✓" } else { "—" };
        table.add_row(vec![
            Cell::new(&module.name),
            Cell::new(module.kind.to_string()),
            Cell::new(&module.canonical),
            Cell::new(git_cell),
        ]);
    }

    println!("{table}");
    Ok(())
}
