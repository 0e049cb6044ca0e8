use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use crate::doctor;

pub fn run(split_repo: &Path) -> Result<()> {
    let report = doctor::run(split_repo)?;

    if report.all_ok() {
        println!("{} No issues found.", "✓".green().bold());
        return Ok(());
    }

    for issue in &report.issues {
        println!("{} {}", "!".yellow().bold(), issue);
    }
    bail!("{} issue(s) found", report.issues.len());
}
