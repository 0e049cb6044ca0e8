use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{catalog, reconcile::Reconciled};

pub const MANIFEST_FILE: &str = ".hordesplit.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Application,
    Library,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Application => write!(f, "application"),
            ModuleKind::Library => write!(f, "library"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Identifier as emitted by the split tool.
    pub name: String,
    /// Directory name under the split-repo root.
    pub canonical: String,
    pub kind: ModuleKind,
}

/// Record of what a `split` run produced, written into the split-repo
/// root so `status`, `doctor` and `create` can find the modules later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitManifest {
    pub modules: Vec<ModuleRecord>,
}

impl SplitManifest {
    /// Build a manifest from a reconciliation pass.
    pub fn record(moved: &[Reconciled]) -> Self {
        let modules = moved
            .iter()
            .map(|m| ModuleRecord {
                name: m.id.clone(),
                canonical: m.canonical.clone(),
                kind: if catalog::is_application(&m.id) {
                    ModuleKind::Application
                } else {
                    ModuleKind::Library
                },
            })
            .collect();
        Self { modules }
    }

    pub fn load(split_repo: &Path) -> Result<Self> {
        let path = split_repo.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Could not read {}. Run `hordesplit split` first.", MANIFEST_FILE)
        })?;
        serde_json::from_str(&content).context("Failed to parse .hordesplit.json")
    }

    pub fn save(&self, split_repo: &Path) -> Result<()> {
        let path = split_repo.join(MANIFEST_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn path(split_repo: &Path) -> PathBuf {
        split_repo.join(MANIFEST_FILE)
    }
}
