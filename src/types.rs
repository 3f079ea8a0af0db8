use serde::Serialize;
use std::path::{Path, PathBuf};

/// The kind of a pending change as reported by the change tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Moved,
}

/// One pending, uncommitted change. The path is absent when the tracker
/// knows about the change but the underlying file is already gone.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub path: Option<PathBuf>,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
        }
    }

    /// Whether this record points at something that can be opened.
    /// Deleted and moved-away entries have nothing to show in an editor.
    #[must_use]
    pub fn is_openable(&self) -> bool {
        matches!(self.kind, ChangeKind::Added | ChangeKind::Modified)
    }

    /// Resolve this record to a live file handle, if the path still exists.
    #[must_use]
    pub fn resolve(&self) -> Option<FileHandle> {
        self.path.as_deref().and_then(FileHandle::resolve)
    }
}

/// An opaque reference to a file that was live on disk at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    /// Resolve a path to a handle. Returns `None` when the path no longer
    /// names a regular file; such entries are skipped, not errors.
    #[must_use]
    pub fn resolve(path: &Path) -> Option<Self> {
        if path.is_file() {
            Some(Self(path.to_path_buf()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Lifecycle state of a project context. Only `Ready` projects are acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    Initializing,
    Ready,
    Disposed,
}

/// The workspace context a command invocation runs against.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    state: ProjectState,
}

impl Project {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, state: ProjectState) -> Self {
        Self {
            root: root.into(),
            state,
        }
    }

    /// A project rooted at `root` that is fully initialized.
    #[must_use]
    pub fn ready(root: impl Into<PathBuf>) -> Self {
        Self::new(root, ProjectState::Ready)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn state(&self) -> ProjectState {
        self.state
    }

    /// Present, initialized, and not torn down.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state == ProjectState::Ready
    }
}

/// What a single command invocation did. Opener calls are fire-and-forget;
/// this only records counts and the paths handed over, for reporting.
#[derive(Debug, Default, Serialize)]
pub struct OpenSummary {
    /// Paths passed to the editor, in open order.
    pub opened: Vec<PathBuf>,
    /// Entries dropped because their path no longer resolved to a live file.
    pub unresolved: usize,
    /// Entries whose open request failed; never surfaced as an error.
    pub failed: usize,
}

impl OpenSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opened.is_empty() && self.unresolved == 0 && self.failed == 0
    }
}
