use anyhow::{bail, Context, Result};
use git2::Repository;
use std::path::Path;
use std::process::Command;

/// Initialise a fresh git repository at `root`.
pub fn init_repo(root: &Path) -> Result<()> {
    let status = Command::new("git")
        .args(["-C", root.to_str().unwrap(), "init"])
        .status()
        .context("Failed to run `git init`")?;

    if !status.success() {
        bail!("Failed to initialise repository at '{}'", root.display());
    }
    Ok(())
}

/// Stage all files and create a commit.
pub fn commit_all(root: &Path, message: &str) -> Result<()> {
    let add_out = Command::new("git")
        .args(["-C", root.to_str().unwrap(), "add", "-A"])
        .output()?;
    if !add_out.status.success() {
        bail!("git add failed: {}", String::from_utf8_lossy(&add_out.stderr).trim());
    }

    let commit_out = Command::new("git")
        .args(["-C", root.to_str().unwrap(), "commit", "-m", message])
        .output()?;
    if !commit_out.status.success() {
        let stderr = String::from_utf8_lossy(&commit_out.stderr);
        let stdout = String::from_utf8_lossy(&commit_out.stdout);
        // git prints "nothing to commit" on stdout, not stderr
        let detail = if stdout.contains("nothing to commit") || stderr.contains("nothing to commit") {
            "nothing to commit, working tree clean".to_string()
        } else {
            format!("{}{}", stderr.trim(), stdout.trim())
        };
        bail!("git commit failed: {}", detail);
    }
    Ok(())
}

/// Register a module repository as a named remote and fetch it.
pub fn add_remote_fetch(root: &Path, name: &str, source: &Path) -> Result<()> {
    let status = Command::new("git")
        .args([
            "-C",
            root.to_str().unwrap(),
            "remote",
            "add",
            "-f",
            name,
            source.to_str().unwrap(),
        ])
        .status()
        .context("Failed to run `git remote add`")?;

    if !status.success() {
        bail!("Failed to add remote '{}' for '{}'", name, source.display());
    }
    Ok(())
}

/// Squash-merge a remote's branch into the repository under `prefix`.
pub fn subtree_add(root: &Path, prefix: &str, remote: &str, branch: &str) -> Result<()> {
    let status = Command::new("git")
        .args([
            "-C",
            root.to_str().unwrap(),
            "subtree",
            "add",
            &format!("--prefix={}", prefix),
            remote,
            branch,
            "--squash",
        ])
        .status()
        .context("Failed to run `git subtree add`")?;

    if !status.success() {
        bail!("git subtree add failed for prefix '{}'", prefix);
    }
    Ok(())
}

/// Split the history under `prefix` back out into `branch` so future
/// incremental updates can be tracked.
pub fn subtree_split(root: &Path, prefix: &str, branch: &str) -> Result<()> {
    let status = Command::new("git")
        .args([
            "-C",
            root.to_str().unwrap(),
            "subtree",
            "split",
            &format!("--prefix={}", prefix),
            "--annotate=(split)",
            "--branch",
            branch,
        ])
        .status()
        .context("Failed to run `git subtree split`")?;

    if !status.success() {
        bail!("git subtree split failed for prefix '{}'", prefix);
    }
    Ok(())
}

/// Whether the git installation ships the subtree contrib command.
pub fn subtree_available() -> bool {
    Command::new("git")
        .args(["subtree", "-h"])
        .output()
        .map(|o| !String::from_utf8_lossy(&o.stderr).contains("is not a git command"))
        .unwrap_or(false)
}

/// Whether `path` is the work directory of a git repository.
pub fn is_repository(path: &Path) -> bool {
    Repository::open(path).is_ok()
}

/// Whether a local branch exists in the repository at `root`.
pub fn branch_exists(root: &Path, name: &str) -> Result<bool> {
    let repo = Repository::open(root)
        .with_context(|| format!("Could not open repository at '{}'", root.display()))?;
    Ok(repo.find_branch(name, git2::BranchType::Local).is_ok())
}

/// Count the commits reachable from HEAD.
/// Uses `git rev-list --count HEAD`.
pub fn commit_count(root: &Path) -> Result<u64> {
    let output = Command::new("git")
        .args(["-C", root.to_str().unwrap(), "rev-list", "--count", "HEAD"])
        .output()
        .context("Failed to run git rev-list")?;

    if !output.status.success() {
        bail!(
            "git rev-list failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let count_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    count_str
        .parse::<u64>()
        .context("Failed to parse rev-list count")
}
