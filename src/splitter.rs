//! Splitter invoker: runs the external split tool once per module of
//! the monolithic tree.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::catalog;

/// One module of the monolithic tree scheduled for splitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSource {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of a full invoker run. A failed module does not abort the
/// batch; failures are collected and reported at the end.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub succeeded: Vec<String>,
    pub failures: Vec<String>,
}

impl SplitReport {
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Enumerate the modules to split: every known application present in
/// the original tree, plus every package directory under `framework/`
/// that is not in the ignore set.
pub fn enumerate_modules(original: &Path) -> Result<Vec<ModuleSource>> {
    let mut modules = Vec::new();

    for app in catalog::APPLICATIONS {
        let path = original.join(app);
        if path.is_dir() {
            modules.push(ModuleSource {
                name: (*app).to_string(),
                path,
            });
        }
    }

    let framework = original.join("framework");
    if framework.is_dir() {
        for entry in std::fs::read_dir(&framework)
            .with_context(|| format!("Could not read '{}'", framework.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if catalog::FRAMEWORK_IGNORE.contains(&name.as_str()) {
                continue;
            }
            modules.push(ModuleSource {
                name,
                path: entry.path(),
            });
        }
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(modules)
}

/// Invoke the external split command for a single module. The tool is
/// called with an argument list, never a shell string.
pub fn invoke_split(command: &Path, module: &ModuleSource, tmp: &Path) -> Result<()> {
    let status = Command::new(command)
        .arg("-c")
        .arg(&module.path)
        .arg("-t")
        .arg(tmp)
        .arg("-o")
        .arg(tmp)
        .status()
        .with_context(|| format!("Failed to run split command for '{}'", module.name))?;

    if !status.success() {
        bail!("Split command exited with {} for module '{}'", status, module.name);
    }
    Ok(())
}

/// Run the external splitter over every module, sequentially. Each
/// invocation blocks until the external process exits; a failed module
/// is recorded and the remaining modules are still attempted.
pub fn run_all(command: &Path, tmp: &Path, modules: &[ModuleSource]) -> SplitReport {
    let mut report = SplitReport::default();

    for module in modules {
        match invoke_split(command, module, tmp) {
            Ok(()) => report.succeeded.push(module.name.clone()),
            Err(e) => report.failures.push(format!("{}: {:#}", module.name, e)),
        }
    }

    report
}
