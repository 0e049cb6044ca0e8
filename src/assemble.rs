//! Subtree assembly of a composite repository from split modules.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::{config::CreateOptions, git};

/// Create the composite repository and seed it with one commit so the
/// subtree operations have something to attach to.
pub fn init_composite(monolithic: &Path) -> Result<()> {
    std::fs::create_dir_all(monolithic)
        .with_context(|| format!("Could not create '{}'", monolithic.display()))?;
    git::init_repo(monolithic)?;
    std::fs::write(monolithic.join("first.txt"), "")
        .context("Could not write seed file")?;
    git::commit_all(monolithic, "First commit.")?;
    Ok(())
}

/// Wire one split module into the composite: add its repository as a
/// named remote, squash-merge its `branch` under a path prefix equal
/// to the module name, then split that prefix back out into a branch
/// named after the module so future updates can be tracked.
pub fn add_module(monolithic: &Path, split_repo: &Path, module: &str, branch: &str) -> Result<()> {
    let source = split_repo.join(module);
    if !source.is_dir() {
        bail!("No split repository for '{}' at '{}'", module, source.display());
    }

    git::add_remote_fetch(monolithic, module, &source)?;
    git::subtree_add(monolithic, module, module, branch)?;
    git::subtree_split(monolithic, module, module)?;
    Ok(())
}

/// Full assembly run: init plus seed commit, then each module in
/// order. Modules are independent of one another; they only require
/// the seed commit to exist first.
pub fn run(opts: &CreateOptions) -> Result<()> {
    init_composite(&opts.monolithic)?;
    for module in &opts.modules {
        add_module(&opts.monolithic, &opts.split_repo, module, &opts.branch)?;
    }
    Ok(())
}
