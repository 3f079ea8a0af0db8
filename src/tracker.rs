use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::{ChangeKind, ChangeRecord};

/// Trait defining the change-tracking collaborator queried by the command.
///
/// Implementations are read-only views over version-control state: this
/// crate never commits, stages, or mutates anything through them.
pub trait ChangeTracker {
    /// The active change set, in tracker-defined order.
    ///
    /// # Errors
    ///
    /// Returns an error if the change set cannot be queried
    fn changes(&self) -> Result<Vec<ChangeRecord>>;

    /// Paths present on disk but not yet under version control,
    /// in tracker-defined order.
    ///
    /// # Errors
    ///
    /// Returns an error if the untracked set cannot be queried
    fn untracked(&self) -> Result<Vec<PathBuf>>;

    /// Both collections at once. Backends that materialize them from a
    /// single query should override this to avoid querying twice.
    ///
    /// # Errors
    ///
    /// Returns an error if either collection cannot be queried
    fn snapshot(&self) -> Result<ChangeSnapshot> {
        Ok(ChangeSnapshot {
            changes: self.changes()?,
            untracked: self.untracked()?,
        })
    }
}

/// The active change set and the untracked paths from one status query.
#[derive(Debug, Default)]
pub struct ChangeSnapshot {
    pub changes: Vec<ChangeRecord>,
    pub untracked: Vec<PathBuf>,
}

/// Change tracker backed by the local Git CLI, reading `git status`.
pub struct GitStatusTracker {
    repo_path: PathBuf,
}

impl GitStatusTracker {
    /// Creates a new `GitStatusTracker` for the repository at `repo_path`
    #[must_use]
    pub const fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    #[instrument(skip(self), fields(args = ?args, repo_path = %self.repo_path.display()))]
    fn run_git_command(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            debug!(error = %error, "Git command failed");
            return Err(Error::GitCommandError(error.to_string()));
        }

        let result = String::from_utf8(output.stdout)
            .map_err(|e| Error::GitCommandError(e.to_string()))?;

        debug!(
            output_length = result.len(),
            "Git command completed successfully"
        );
        Ok(result)
    }

    fn status_entries(&self) -> Result<Vec<StatusEntry>> {
        // `-z` separates records with NUL and disables the C-style quoting
        // git otherwise applies to paths with non-ASCII bytes, so every
        // path comes back verbatim.
        let output = self.run_git_command(&[
            "status",
            "--porcelain",
            "-z",
            "--no-renames",
            "--untracked-files=all",
        ])?;

        Ok(output
            .split('\0')
            .filter_map(|record| self.parse_status_record(record))
            .collect())
    }

    /// Parse one porcelain record (`XY path`). Records that do not follow
    /// the format are skipped rather than treated as errors.
    fn parse_status_record(&self, record: &str) -> Option<StatusEntry> {
        if record.len() < 4 {
            return None;
        }
        let (status, path_str) = (&record[..2], &record[3..]);
        let path = self.repo_path.join(path_str);

        if status == "??" {
            return Some(StatusEntry::Untracked(path));
        }

        // Index column wins when set; the worktree column covers unstaged
        // edits like ` M`.
        let code = status
            .chars()
            .find(|c| *c != ' ')?;
        let kind = match code {
            'A' => ChangeKind::Added,
            'D' => ChangeKind::Deleted,
            'R' | 'C' => ChangeKind::Moved,
            _ => ChangeKind::Modified,
        };
        Some(StatusEntry::Changed(ChangeRecord::new(kind, path)))
    }
}

enum StatusEntry {
    Changed(ChangeRecord),
    Untracked(PathBuf),
}

impl ChangeTracker for GitStatusTracker {
    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn changes(&self) -> Result<Vec<ChangeRecord>> {
        let changes: Vec<ChangeRecord> = self
            .status_entries()?
            .into_iter()
            .filter_map(|entry| match entry {
                StatusEntry::Changed(record) => Some(record),
                StatusEntry::Untracked(_) => None,
            })
            .collect();

        debug!(count = changes.len(), "Collected pending changes");
        Ok(changes)
    }

    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn untracked(&self) -> Result<Vec<PathBuf>> {
        let untracked: Vec<PathBuf> = self
            .status_entries()?
            .into_iter()
            .filter_map(|entry| match entry {
                StatusEntry::Untracked(path) => Some(path),
                StatusEntry::Changed(_) => None,
            })
            .collect();

        debug!(count = untracked.len(), "Collected untracked files");
        Ok(untracked)
    }

    #[instrument(skip(self), fields(repo_path = %self.repo_path.display()))]
    fn snapshot(&self) -> Result<ChangeSnapshot> {
        let mut snapshot = ChangeSnapshot::default();
        for entry in self.status_entries()? {
            match entry {
                StatusEntry::Changed(record) => snapshot.changes.push(record),
                StatusEntry::Untracked(path) => snapshot.untracked.push(path),
            }
        }

        debug!(
            changes = snapshot.changes.len(),
            untracked = snapshot.untracked.len(),
            "Collected status snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn tracker() -> GitStatusTracker {
        GitStatusTracker::new(PathBuf::from("/repo"))
    }

    #[test]
    fn parses_staged_added_entry() {
        let entry = tracker().parse_status_record("A  new.txt").unwrap();
        match entry {
            StatusEntry::Changed(record) => {
                assert_eq!(record.kind, ChangeKind::Added);
                assert_eq!(record.path.as_deref(), Some(Path::new("/repo/new.txt")));
            }
            StatusEntry::Untracked(_) => panic!("should be a change record"),
        }
    }

    #[test]
    fn parses_unstaged_modification() {
        let entry = tracker().parse_status_record(" M src/lib.rs").unwrap();
        match entry {
            StatusEntry::Changed(record) => assert_eq!(record.kind, ChangeKind::Modified),
            StatusEntry::Untracked(_) => panic!("should be a change record"),
        }
    }

    #[test]
    fn parses_untracked_entry() {
        let entry = tracker().parse_status_record("?? notes.md").unwrap();
        match entry {
            StatusEntry::Untracked(path) => assert_eq!(path, Path::new("/repo/notes.md")),
            StatusEntry::Changed(_) => panic!("should be untracked"),
        }
    }

    #[test]
    fn parses_deleted_and_renamed_kinds() {
        let deleted = tracker().parse_status_record("D  gone.txt").unwrap();
        assert!(matches!(
            deleted,
            StatusEntry::Changed(ChangeRecord {
                kind: ChangeKind::Deleted,
                ..
            })
        ));

        let moved = tracker().parse_status_record("R  a.txt").unwrap();
        assert!(matches!(
            moved,
            StatusEntry::Changed(ChangeRecord {
                kind: ChangeKind::Moved,
                ..
            })
        ));
    }

    #[test]
    fn skips_malformed_records() {
        assert!(tracker().parse_status_record("").is_none());
        assert!(tracker().parse_status_record("M").is_none());
    }

    #[test]
    fn keeps_non_ascii_paths_verbatim() {
        // `-z` output carries raw paths, so no unquoting is needed here.
        let entry = tracker().parse_status_record("?? ä.txt").unwrap();
        match entry {
            StatusEntry::Untracked(path) => assert_eq!(path, Path::new("/repo/ä.txt")),
            StatusEntry::Changed(_) => panic!("should be untracked"),
        }
    }

    #[test]
    fn preserves_index_column_over_worktree() {
        // `AM`: added in the index, then edited again in the worktree.
        let entry = tracker().parse_status_record("AM new.txt").unwrap();
        assert!(matches!(
            entry,
            StatusEntry::Changed(ChangeRecord {
                kind: ChangeKind::Added,
                ..
            })
        ));
    }
}
