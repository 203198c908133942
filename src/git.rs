use crate::changes::{Change, ChangeStatus};
use crate::error::{Error, Result};
use crate::prompt::DetailSource;
use git2::{DiffFindOptions, DiffFormat, DiffOptions, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".").map_err(|_| Error::NotARepository)?;
        Ok(Self { repo })
    }

    #[cfg(test)]
    pub(crate) fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Working tree root; falls back to the current directory for bare repos.
    pub fn root(&self) -> PathBuf {
        self.repo
            .workdir()
            .map(|p| p.to_path_buf())
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn head_tree(&self) -> Option<git2::Tree<'_>> {
        self.repo
            .revparse_single("HEAD")
            .ok()
            .and_then(|o| o.peel_to_tree().ok())
    }

    /// HEAD-to-index changes in diff order. Empty when nothing is staged.
    pub fn staged_changes(&self) -> Result<Vec<Change>> {
        let head_tree = self.head_tree();

        let mut diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let changes = diff
            .deltas()
            .filter_map(|delta| {
                let path = delta_path(&delta)?;
                Some(Change::new(ChangeStatus::from_delta(delta.status()), path))
            })
            .collect();

        Ok(changes)
    }

    /// Staged patch text for a single path, as `git diff --cached <path>`.
    pub fn staged_diff(&self, path: &str) -> Result<String> {
        let head_tree = self.head_tree();

        let mut opts = DiffOptions::new();
        opts.pathspec(path).disable_pathspec_match(true);

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(text)
    }

    /// Current on-disk content, relative to the repository root.
    pub fn file_content(&self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.root().join(path))?)
    }

    pub fn config_string(&self, key: &str) -> Option<String> {
        let value = self.repo.config().ok()?.get_string(key).ok()?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl DetailSource for GitRepo {
    fn staged_diff(&self, path: &str) -> Result<String> {
        GitRepo::staged_diff(self, path)
    }

    fn file_content(&self, path: &str) -> Result<String> {
        GitRepo::file_content(self, path)
    }
}

fn delta_path(delta: &git2::DiffDelta<'_>) -> Option<String> {
    delta
        .new_file()
        .path()
        .or_else(|| delta.old_file().path())
        .map(|p| p.to_string_lossy().to_string())
}

/// Runs `git commit -m <message>` inside `workdir` so hooks and signing apply.
pub fn commit_with_git_cli(workdir: &Path, message: &str) -> Result<()> {
    debug!(workdir = %workdir.display(), "running git commit");
    let output = std::process::Command::new("git")
        .current_dir(workdir)
        .arg("commit")
        .arg("-m")
        .arg(message)
        .output()
        .map_err(|e| Error::CommitFailed(format!("Failed to run git commit: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let msg = if !stderr.trim().is_empty() {
            stderr.trim().to_string()
        } else if !stdout.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            "Git commit failed".to_string()
        };
        return Err(Error::CommitFailed(msg));
    }

    Ok(())
}
