use crate::editor::FileOpener;
use crate::tracker::{ChangeSnapshot, ChangeTracker};
use crate::types::{FileHandle, OpenSummary, Project};
use tracing::{debug, instrument};

/// The open-changed-files command over injected collaborators.
///
/// Holds a change tracker and a file opener; both are queried per
/// invocation, never cached. The command owns no mutable state, so a shared
/// reference can be used concurrently when the collaborators allow it.
pub struct OpenChangedFiles<T, O> {
    tracker: T,
    opener: O,
}

impl<T: ChangeTracker, O: FileOpener> OpenChangedFiles<T, O> {
    #[must_use]
    pub const fn new(tracker: T, opener: O) -> Self {
        Self { tracker, opener }
    }

    /// Whether the command has anything to do: the project is present and
    /// ready, and the tracker reports at least one added/modified change or
    /// one untracked file.
    ///
    /// Side-effect free and safe to call from a worker thread, so hosts can
    /// evaluate it off their interaction thread. Tracker failures count as
    /// "nothing to open" rather than propagating.
    #[instrument(skip(self, project))]
    pub fn is_enabled(&self, project: Option<&Project>) -> bool {
        let Some(project) = project else {
            return false;
        };
        if !project.is_available() {
            debug!(state = ?project.state(), "Project not available");
            return false;
        }

        match self.tracker.snapshot() {
            Ok(snapshot) => {
                snapshot.changes.iter().any(|record| record.is_openable())
                    || !snapshot.untracked.is_empty()
            }
            Err(error) => {
                debug!(%error, "Status query failed, treating as empty");
                false
            }
        }
    }

    /// Open every added/modified change, then every untracked file, each
    /// with focus. Order within each group is the tracker's. Entries whose
    /// path no longer resolves are skipped, as are open requests the editor
    /// rejects; neither is an error. An absent or unavailable project makes
    /// the whole invocation a no-op.
    #[instrument(skip(self, project))]
    pub fn run(&self, project: Option<&Project>) -> OpenSummary {
        let mut summary = OpenSummary::default();

        let Some(project) = project else {
            return summary;
        };
        if !project.is_available() {
            debug!(state = ?project.state(), "Project not available, skipping");
            return summary;
        }
        debug!(root = %project.root().display(), "Opening changed files");

        // One status query feeds both groups.
        let snapshot = self.tracker.snapshot().unwrap_or_else(|error| {
            debug!(%error, "Status query failed, nothing to open");
            ChangeSnapshot::default()
        });

        for record in snapshot.changes {
            if !record.is_openable() {
                continue;
            }
            match record.resolve() {
                Some(handle) => self.open_one(&mut summary, &handle),
                None => summary.unresolved += 1,
            }
        }

        for path in snapshot.untracked {
            match FileHandle::resolve(&path) {
                Some(handle) => self.open_one(&mut summary, &handle),
                None => summary.unresolved += 1,
            }
        }

        debug!(
            opened = summary.opened.len(),
            unresolved = summary.unresolved,
            failed = summary.failed,
            "Open pass complete"
        );
        summary
    }

    fn open_one(&self, summary: &mut OpenSummary, handle: &FileHandle) {
        match self.opener.open(handle, true) {
            Ok(()) => summary.opened.push(handle.path().to_path_buf()),
            Err(error) => {
                debug!(file = %handle.path().display(), %error, "Open request failed");
                summary.failed += 1;
            }
        }
    }
}
