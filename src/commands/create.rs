use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;

use crate::{assemble, config::CreateOptions, git};

/// Entry point for `hordesplit create`: build a fresh composite
/// repository from already-split module repositories via git subtree.
pub fn run(opts: &CreateOptions, yes: bool) -> Result<()> {
    if opts.monolithic.exists() {
        let overwrite = yes
            || Confirm::new()
                .with_prompt(format!(
                    "'{}' already exists — overwrite?",
                    opts.monolithic.display()
                ))
                .default(false)
                .interact()?;
        if !overwrite {
            bail!("Aborted.");
        }
        std::fs::remove_dir_all(&opts.monolithic)?;
    }

    if !git::subtree_available() {
        bail!("`git subtree` is not available — install the git contrib tools first");
    }

    // Preflight every module before touching the destination.
    for module in &opts.modules {
        let source = opts.split_repo.join(module);
        if !source.is_dir() {
            bail!(
                "No split repository for '{}' at '{}'. Run {} first.",
                module,
                source.display(),
                "hordesplit split".bold()
            );
        }
    }

    assemble::init_composite(&opts.monolithic)?;
    println!(
        "{} Initialised composite repository at '{}'",
        "✓".green().bold(),
        opts.monolithic.display().to_string().cyan()
    );

    for module in &opts.modules {
        println!("{} Merging '{}' via subtree", "→".blue().bold(), module.cyan());
        assemble::add_module(&opts.monolithic, &opts.split_repo, module, &opts.branch)?;
        println!(
            "{} '{}' merged — branch '{}' tracks the subtree",
            "✓".green(),
            module.cyan(),
            module.yellow()
        );
    }

    println!(
        "\n{} Composite repository ready with {} module(s).",
        "✓".green().bold(),
        opts.modules.len().to_string().yellow()
    );

    Ok(())
}
