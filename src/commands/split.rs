use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::SplitOptions, manifest::SplitManifest, reconcile, splitter};

/// Entry point for `hordesplit split`: invoke the external split tool
/// for every module of the monolithic tree, then reconcile the output
/// into canonical per-module repositories.
pub fn run(opts: &SplitOptions) -> Result<()> {
    let modules = splitter::enumerate_modules(&opts.original)?;
    if modules.is_empty() {
        bail!("No splittable modules found under '{}'", opts.original.display());
    }

    println!(
        "{} Splitting {} module(s) from '{}' into '{}'",
        "→".blue().bold(),
        modules.len().to_string().yellow(),
        opts.original.display().to_string().cyan(),
        opts.split_repo.display().to_string().cyan()
    );

    let pb = ProgressBar::new(modules.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} modules {msg}")
            .unwrap(),
    );

    let split_report = splitter::run_all(&opts.command, &opts.tmp, &modules);
    pb.finish_with_message("done");

    for failure in &split_report.failures {
        println!("{} {}", "!".yellow().bold(), failure);
    }

    std::fs::create_dir_all(&opts.split_repo)?;
    let rec_report = reconcile::reconcile(&opts.tmp, &opts.split_repo, opts.force)?;

    for moved in &rec_report.moved {
        println!("{} {} → {}", "✓".green(), moved.id.cyan(), moved.canonical.cyan());
    }
    for failure in &rec_report.failures {
        println!("{} {}", "!".yellow().bold(), failure);
    }

    SplitManifest::record(&rec_report.moved).save(&opts.split_repo)?;

    let failed = split_report.failures.len() + rec_report.failures.len();
    if failed > 0 {
        bail!("{} module(s) failed — see messages above", failed);
    }

    println!(
        "\n{} {} module(s) ready under '{}'. Run {} to assemble a composite.",
        "✓".green().bold(),
        rec_report.moved.len().to_string().yellow(),
        opts.split_repo.display(),
        "hordesplit create".bold()
    );

    Ok(())
}
