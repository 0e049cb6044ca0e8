use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

use crate::{git, manifest::SplitManifest};

/// Result of a doctor run: a list of human-readable issues found.
#[derive(Debug)]
pub struct DoctorReport {
    pub issues: Vec<String>,
}

impl DoctorReport {
    pub fn all_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate the split manifest against what is actually on disk.
pub fn run(split_repo: &Path) -> Result<DoctorReport> {
    let manifest = SplitManifest::load(split_repo)?;
    let mut issues = Vec::new();

    let mut seen: HashSet<&str> = HashSet::new();
    for module in &manifest.modules {
        if !seen.insert(module.canonical.as_str()) {
            issues.push(format!(
                "Canonical name '{}' appears more than once in the manifest.",
                module.canonical
            ));
        }

        let dir = split_repo.join(&module.canonical);
        if !dir.is_dir() {
            issues.push(format!(
                "Split repository '{}' is missing at '{}'.",
                module.canonical,
                dir.display()
            ));
            continue;
        }
        if !git::is_repository(&dir) {
            issues.push(format!("'{}' is not a git repository.", dir.display()));
        }
        if dir.join("split").is_dir() {
            issues.push(format!(
                "'{}' still contains an unflattened 'split' payload directory.",
                dir.display()
            ));
        }
    }

    Ok(DoctorReport { issues })
}
