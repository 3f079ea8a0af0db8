use std::path::Path;
use std::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::FileHandle;

/// Trait defining the editor collaborator the command hands files to.
///
/// `focus` asks the editor to give the opened file input focus. The command
/// never consumes a payload from the opener; failures are logged and
/// dropped by the caller.
pub trait FileOpener {
    /// Open `file` in the editor, optionally focusing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the open request could not be issued
    fn open(&self, file: &FileHandle, focus: bool) -> Result<()>;
}

/// File opener that spawns an external editor process and does not wait
/// for it, so repeated opens do not block one another.
pub struct SpawnEditor {
    /// Invocation tokens; `$FILE` inside a token is replaced with the
    /// file path at open time.
    tokens: Vec<String>,
}

impl SpawnEditor {
    /// Creates an opener from an explicit invocation pattern,
    /// e.g. `"code --goto $FILE"`. A pattern without `$FILE` gets the
    /// path appended as the last argument.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let mut tokens: Vec<String> = pattern
            .into()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if !tokens.iter().any(|token| token.contains("$FILE")) {
            tokens.push("$FILE".to_string());
        }
        Self { tokens }
    }

    /// Creates an opener from the environment: `$VISUAL` wins over
    /// `$EDITOR`, matching the usual Unix convention.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoEditor` if neither variable is set
    pub fn from_env() -> Result<Self> {
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .map_err(|_| Error::NoEditor)?;
        if editor.trim().is_empty() {
            return Err(Error::NoEditor);
        }
        debug!(editor = %editor, "Editor detected from environment");
        Ok(Self::new(editor))
    }

    /// The argv this opener would spawn for `path`. Substitution happens
    /// per token, so a path containing whitespace stays one argument.
    fn argv(&self, path: &Path) -> Vec<String> {
        let file = path.display().to_string();
        self.tokens
            .iter()
            .map(|token| token.replace("$FILE", &file))
            .collect()
    }
}

impl FileOpener for SpawnEditor {
    #[instrument(skip(self), fields(file = %file.path().display(), focus = focus))]
    fn open(&self, file: &FileHandle, focus: bool) -> Result<()> {
        // Arguments are never passed through a shell, but reject paths
        // that smell like injection attempts anyway.
        if sanitize_path(file.path()).is_none() {
            return Err(Error::EditorError(format!(
                "path rejected: {}",
                file.path().display()
            )));
        }

        let argv = self.argv(file.path());
        let Some((cmd, args)) = argv.split_first() else {
            return Err(Error::NoEditor);
        };

        // Spawn without waiting; a spawned editor takes focus on its own.
        Command::new(cmd)
            .args(args)
            .spawn()
            .map_err(|e| Error::EditorError(e.to_string()))?;

        debug!("Editor spawned");
        Ok(())
    }
}

/// Reject paths with traversal segments, NUL bytes, or shell
/// metacharacters before they reach a spawned command line.
fn sanitize_path(path: &Path) -> Option<&Path> {
    let raw = path.to_str()?;
    if raw.contains("..") || raw.contains('\0') {
        return None;
    }

    let dangerous_chars = ['|', '&', ';', '$', '`', '(', ')', '{', '}', '<', '>'];
    if raw.chars().any(|c| dangerous_chars.contains(&c)) {
        return None;
    }

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_substitutes_file_placeholder() {
        let opener = SpawnEditor::new("code --goto $FILE");
        let argv = opener.argv(Path::new("/work/src/lib.rs"));
        assert_eq!(argv, vec!["code", "--goto", "/work/src/lib.rs"]);
    }

    #[test]
    fn pattern_without_placeholder_appends_path() {
        let opener = SpawnEditor::new("nvim");
        let argv = opener.argv(Path::new("/work/src/lib.rs"));
        assert_eq!(argv, vec!["nvim", "/work/src/lib.rs"]);
    }

    #[test]
    fn path_with_spaces_stays_one_argument() {
        let opener = SpawnEditor::new("code --goto $FILE");
        let argv = opener.argv(Path::new("/work/my notes/draft 2.txt"));
        assert_eq!(argv, vec!["code", "--goto", "/work/my notes/draft 2.txt"]);
    }

    #[test]
    fn placeholder_substitutes_inside_a_token() {
        let opener = SpawnEditor::new("vim +1 $FILE");
        let argv = opener.argv(Path::new("/work/a b.txt"));
        assert_eq!(argv, vec!["vim", "+1", "/work/a b.txt"]);
    }

    #[test]
    fn sanitize_accepts_plain_paths() {
        assert!(sanitize_path(Path::new("/path/to/file.rs")).is_some());
        assert!(sanitize_path(Path::new("src/main.rs")).is_some());
    }

    #[test]
    fn sanitize_rejects_traversal() {
        assert!(sanitize_path(Path::new("../../etc/passwd")).is_none());
        assert!(sanitize_path(Path::new("/path/../secret")).is_none());
    }

    #[test]
    fn sanitize_rejects_shell_metacharacters() {
        assert!(sanitize_path(Path::new("file.rs; rm -rf /")).is_none());
        assert!(sanitize_path(Path::new("$(whoami).rs")).is_none());
        assert!(sanitize_path(Path::new("`id`.rs")).is_none());
        assert!(sanitize_path(Path::new("file|cat")).is_none());
    }

    #[test]
    fn from_env_requires_an_editor_variable() {
        // Only assert the error shape when neither variable is set; CI
        // environments may legitimately export EDITOR.
        if std::env::var("VISUAL").is_err() && std::env::var("EDITOR").is_err() {
            assert!(matches!(SpawnEditor::from_env(), Err(Error::NoEditor)));
        }
    }
}
