pub use command::OpenChangedFiles;
pub use editor::{FileOpener, SpawnEditor};
pub use error::{Error, Result};
pub use tracker::{ChangeSnapshot, ChangeTracker, GitStatusTracker};
pub use types::{ChangeKind, ChangeRecord, FileHandle, OpenSummary, Project, ProjectState};

use std::path::Path;

pub mod command;
pub mod editor;
mod error;
pub mod tracker;
mod types;

/// Creates an open-changed-files command for the Git repository at
/// `repo_path`, using the editor configured in the environment
/// (`$VISUAL`, then `$EDITOR`).
///
/// # Errors
///
/// Returns an error if no editor is configured in the environment.
pub fn from_repo(repo_path: &Path) -> Result<OpenChangedFiles<GitStatusTracker, SpawnEditor>> {
    let tracker = GitStatusTracker::new(repo_path.to_path_buf());
    let editor = SpawnEditor::from_env()?;
    Ok(OpenChangedFiles::new(tracker, editor))
}

/// Same as [`from_repo`] but with an explicit editor invocation pattern,
/// e.g. `"code --goto $FILE"`.
pub fn from_repo_with_editor(
    repo_path: &Path,
    editor_pattern: &str,
) -> OpenChangedFiles<GitStatusTracker, SpawnEditor> {
    let tracker = GitStatusTracker::new(repo_path.to_path_buf());
    let editor = SpawnEditor::new(editor_pattern);
    OpenChangedFiles::new(tracker, editor)
}
