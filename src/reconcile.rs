//! Split-output reconciliation.
//!
//! The external split tool drops one `<digits>_<identifier>` directory
//! per module into the temp directory, with the actual repository
//! payload nested one level down in a `split/` subdirectory. This
//! module relocates each of those to its canonical path under the
//! split-repo root and flattens the nested layout.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::catalog;

/// One successfully reconciled module.
#[derive(Debug, Clone)]
pub struct Reconciled {
    /// Identifier extracted from the temp directory name.
    pub id: String,
    /// Directory name under the split-repo root.
    pub canonical: String,
}

/// Outcome of a reconciliation pass. Failed entries do not abort the
/// batch; they are collected and reported at the end.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub moved: Vec<Reconciled>,
    pub failures: Vec<String>,
}

impl ReconcileReport {
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract the module identifier from a temp directory name of the
/// form `<digits>_<identifier>`. The numeric prefix is an ordering
/// artifact of the split tool and is discarded. Returns `None` for
/// names that do not follow the convention.
pub fn split_entry_id(name: &str) -> Option<&str> {
    let digits_end = name.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }

    let rest = name[digits_end..].strip_prefix('_')?;
    let id_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if id_end == 0 {
        None
    } else {
        Some(&rest[..id_end])
    }
}

/// Reconcile every split output directory found in `tmp` into
/// `dest_root`.
///
/// Entries that are not directories, or whose names do not match the
/// split tool's output convention, are skipped without error. Each
/// matching entry is independent of the others: a failed entry is
/// recorded in the report and the remaining entries are still
/// processed.
pub fn reconcile(tmp: &Path, dest_root: &Path, force: bool) -> Result<ReconcileReport> {
    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(tmp)
        .with_context(|| format!("Could not read temp directory '{}'", tmp.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        entries.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
    }
    // Enumeration order is filesystem-dependent; sort so output is
    // reproducible. Entries carry no ordering dependency between them.
    entries.sort();

    let mut report = ReconcileReport::default();
    for (name, path) in entries {
        let Some(id) = split_entry_id(&name) else { continue };
        match reconcile_entry(&path, id, dest_root, force) {
            Ok(canonical) => report.moved.push(Reconciled {
                id: id.to_string(),
                canonical,
            }),
            Err(e) => report.failures.push(format!("{}: {:#}", name, e)),
        }
    }

    Ok(report)
}

/// Relocate a single split output directory to its canonical path and
/// flatten the nested payload. Returns the canonical name.
pub fn reconcile_entry(src: &Path, id: &str, dest_root: &Path, force: bool) -> Result<String> {
    if !src.exists() {
        bail!("Source '{}' not found", src.display());
    }

    let canonical = catalog::canonical_name(id);
    let dest = dest_root.join(&canonical);

    if dest.exists() {
        if !force {
            bail!(
                "Destination '{}' already exists — rerun with --force to overwrite",
                dest.display()
            );
        }
        std::fs::remove_dir_all(&dest)
            .with_context(|| format!("Could not remove existing '{}'", dest.display()))?;
    }

    move_dir(src, &dest)?;
    flatten_payload(&dest)?;
    Ok(canonical)
}

/// Move a directory tree. Tries a plain rename first; when that fails
/// (typically a cross-device move, e.g. from a RAM disk to physical
/// disk) falls back to copying the tree and removing the source.
pub fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        bail!("Source '{}' not found", src.display());
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create '{}'", parent.display()))?;
    }

    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Could not create '{}'", target.display()))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("Could not copy to '{}'", target.display()))?;
        }
    }

    std::fs::remove_dir_all(src)
        .with_context(|| format!("Could not remove source '{}'", src.display()))?;
    Ok(())
}

/// Lift the split tool's nested `split/` payload up into `dir`, then
/// remove the emptied payload directory. A missing payload directory
/// means the split tool's output is incomplete and is an error.
fn flatten_payload(dir: &Path) -> Result<()> {
    let payload = dir.join("split");
    if !payload.is_dir() {
        bail!(
            "No 'split' payload directory inside '{}' — split tool output is incomplete",
            dir.display()
        );
    }

    for entry in std::fs::read_dir(&payload)? {
        let entry = entry?;
        let target = dir.join(entry.file_name());
        std::fs::rename(entry.path(), &target).with_context(|| {
            format!(
                "Could not lift '{}' out of the payload directory",
                entry.file_name().to_string_lossy()
            )
        })?;
    }

    std::fs::remove_dir(&payload)
        .with_context(|| format!("Could not remove '{}'", payload.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── helpers ──────────────────────────────────────────────────────────────

    /// Lay out a fake split tool output directory: `<tmp>/<name>/split/`
    /// containing the given files.
    fn make_split_output(tmp: &Path, name: &str, files: &[(&str, &str)]) {
        let payload = tmp.join(name).join("split");
        std::fs::create_dir_all(&payload).unwrap();
        for (rel, content) in files {
            let path = payload.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
    }

    // ── split_entry_id ────────────────────────────────────────────────────

    #[test]
    fn test_split_entry_id_extracts_identifier() {
        assert_eq!(split_entry_id("000_Core"), Some("Core"));
        assert_eq!(split_entry_id("001_imp"), Some("imp"));
        assert_eq!(split_entry_id("42_ActiveSync"), Some("ActiveSync"));
    }

    #[test]
    fn test_split_entry_id_keeps_underscores_in_identifier() {
        assert_eq!(split_entry_id("000_Horde_Core"), Some("Horde_Core"));
    }

    #[test]
    fn test_split_entry_id_stops_at_non_word_character() {
        assert_eq!(split_entry_id("000_Core-old"), Some("Core"));
    }

    #[test]
    fn test_split_entry_id_rejects_unconventional_names() {
        assert_eq!(split_entry_id("Core"), None, "no numeric prefix");
        assert_eq!(split_entry_id("000"), None, "no identifier");
        assert_eq!(split_entry_id("000_"), None, "empty identifier");
        assert_eq!(split_entry_id("000Core"), None, "no separator");
        assert_eq!(split_entry_id("_Core"), None, "empty numeric prefix");
        assert_eq!(split_entry_id(""), None);
    }

    // ── move_dir ──────────────────────────────────────────────────────────

    #[test]
    fn test_move_dir_relocates_tree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("a.txt"), "a").unwrap();
        std::fs::write(src.join("nested/b.txt"), "b").unwrap();

        let dest = dir.path().join("dest");
        move_dir(&src, &dest).unwrap();

        assert!(!src.exists(), "source should be gone after move");
        assert_eq!(std::fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(dest.join("nested/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_move_dir_missing_source_returns_error() {
        let dir = TempDir::new().unwrap();
        let result = move_dir(&dir.path().join("gone"), &dir.path().join("dest"));
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("not found"), "Got: {}", msg);
    }

    // ── reconcile ─────────────────────────────────────────────────────────

    #[test]
    fn test_reconcile_moves_and_flattens_library_and_application() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_split_output(tmp.path(), "000_Horde_Core", &[("package.xml", "<core/>")]);
        make_split_output(tmp.path(), "001_imp", &[("index.php", "<?php")]);

        let report = reconcile(tmp.path(), dest.path(), false).unwrap();
        assert!(report.all_ok(), "failures: {:?}", report.failures);
        assert_eq!(report.moved.len(), 2);

        // Library keeps its baked-in namespace tag; application keeps its bare name.
        let core = dest.path().join("Horde_Core");
        let imp = dest.path().join("imp");
        assert_eq!(std::fs::read_to_string(core.join("package.xml")).unwrap(), "<core/>");
        assert_eq!(std::fs::read_to_string(imp.join("index.php")).unwrap(), "<?php");

        // The payload directory must be flattened away, not left behind.
        assert!(!core.join("split").exists());
        assert!(!imp.join("split").exists());

        // The temp entries are consumed by the move.
        assert!(!tmp.path().join("000_Horde_Core").exists());
        assert!(!tmp.path().join("001_imp").exists());
    }

    #[test]
    fn test_reconcile_prefixes_untagged_library() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_split_output(tmp.path(), "003_Util", &[("README", "util")]);

        let report = reconcile(tmp.path(), dest.path(), false).unwrap();
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.moved[0].canonical, "Horde_Util");
        assert!(dest.path().join("Horde_Util/README").exists());
    }

    #[test]
    fn test_reconcile_flattens_nested_payload_directories() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_split_output(
            tmp.path(),
            "000_Util",
            &[("lib/Util.php", "<?php"), ("doc/CHANGES", "1.0")],
        );

        reconcile(tmp.path(), dest.path(), false).unwrap();
        let util = dest.path().join("Horde_Util");
        assert!(util.join("lib/Util.php").exists());
        assert!(util.join("doc/CHANGES").exists());
        assert!(!util.join("split").exists());
    }

    #[test]
    fn test_reconcile_skips_unconventional_entries_without_error() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("scratch")).unwrap();
        std::fs::write(tmp.path().join("123_notadir"), "plain file").unwrap();
        make_split_output(tmp.path(), "000_Util", &[("README", "util")]);

        let report = reconcile(tmp.path(), dest.path(), false).unwrap();
        assert!(report.all_ok());
        assert_eq!(report.moved.len(), 1, "only the conventional entry moves");
        assert!(tmp.path().join("scratch").exists(), "skipped entries are untouched");
        assert!(tmp.path().join("123_notadir").exists());
    }

    #[test]
    fn test_reconcile_missing_payload_is_a_recorded_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        // No split/ inside — the tool's output is incomplete.
        std::fs::create_dir_all(tmp.path().join("000_Broken")).unwrap();
        make_split_output(tmp.path(), "001_Util", &[("README", "util")]);

        let report = reconcile(tmp.path(), dest.path(), false).unwrap();
        assert_eq!(report.failures.len(), 1, "failures: {:?}", report.failures);
        assert!(report.failures[0].contains("000_Broken"));
        assert!(report.failures[0].contains("split"));
        // The healthy entry is still processed.
        assert_eq!(report.moved.len(), 1);
        assert!(dest.path().join("Horde_Util").exists());
    }

    #[test]
    fn test_reconcile_collision_without_force_is_a_recorded_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::fs::create_dir_all(dest.path().join("Horde_Util")).unwrap();
        std::fs::write(dest.path().join("Horde_Util/keep.txt"), "old").unwrap();
        make_split_output(tmp.path(), "000_Util", &[("README", "new")]);

        let report = reconcile(tmp.path(), dest.path(), false).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("already exists"));
        // The pre-existing destination is untouched.
        assert!(dest.path().join("Horde_Util/keep.txt").exists());
        assert!(!dest.path().join("Horde_Util/README").exists());
        // The source entry is not consumed either.
        assert!(tmp.path().join("000_Util").exists());
    }

    #[test]
    fn test_reconcile_collision_with_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::fs::create_dir_all(dest.path().join("Horde_Util")).unwrap();
        std::fs::write(dest.path().join("Horde_Util/keep.txt"), "old").unwrap();
        make_split_output(tmp.path(), "000_Util", &[("README", "new")]);

        let report = reconcile(tmp.path(), dest.path(), true).unwrap();
        assert!(report.all_ok(), "failures: {:?}", report.failures);
        assert!(!dest.path().join("Horde_Util/keep.txt").exists());
        assert_eq!(
            std::fs::read_to_string(dest.path().join("Horde_Util/README")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_reconcile_missing_temp_directory_returns_error() {
        let dir = TempDir::new().unwrap();
        let result = reconcile(&dir.path().join("gone"), dir.path(), false);
        assert!(result.is_err());
    }

    /// Reconciliation is not idempotent: once an entry has been moved,
    /// a second attempt on the same entry must report the source as
    /// missing instead of quietly doing nothing to the destination.
    #[test]
    fn test_second_reconcile_of_same_entry_reports_source_missing() {
        let tmp = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        make_split_output(tmp.path(), "000_Util", &[("README", "util")]);

        let src = tmp.path().join("000_Util");
        reconcile_entry(&src, "Util", dest.path(), false).unwrap();

        let result = reconcile_entry(&src, "Util", dest.path(), true);
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("not found"), "Got: {}", msg);
        // The destination from the first run is intact.
        assert!(dest.path().join("Horde_Util/README").exists());
    }
}
