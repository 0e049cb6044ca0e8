use std::path::PathBuf;

use crate::catalog;

/// Options for the `split` action, built once from the CLI flags and
/// passed by reference into each stage. No ambient global state.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Path to the external split tool (horde-git-split).
    pub command: PathBuf,
    /// The legacy monolithic repository.
    pub original: PathBuf,
    /// Destination root for the split module repositories.
    pub split_repo: PathBuf,
    /// Working directory the split tool writes its output into.
    pub tmp: PathBuf,
    /// Overwrite canonical directories that already exist.
    pub force: bool,
}

impl SplitOptions {
    pub fn new(
        command: PathBuf,
        original: PathBuf,
        split_repo: PathBuf,
        tmp: Option<PathBuf>,
        force: bool,
    ) -> Self {
        Self {
            command,
            original,
            split_repo,
            tmp: tmp.unwrap_or_else(std::env::temp_dir),
            force,
        }
    }
}

/// Options for the `create` action.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Location of the new composite repository.
    pub monolithic: PathBuf,
    /// Directory containing the reconciled split repositories.
    pub split_repo: PathBuf,
    /// Modules to merge into the composite, in order.
    pub modules: Vec<String>,
    /// Branch to track in each module repository.
    pub branch: String,
}

impl CreateOptions {
    pub fn new(
        monolithic: PathBuf,
        split_repo: PathBuf,
        modules: Vec<String>,
        branch: String,
    ) -> Self {
        let modules = if modules.is_empty() {
            vec![catalog::SEED_MODULE.to_string()]
        } else {
            modules
        };
        Self {
            monolithic,
            split_repo,
            modules,
            branch,
        }
    }
}
