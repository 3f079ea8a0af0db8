#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Git command failed: {0}")]
    GitCommandError(String),

    #[error("Editor command failed: {0}")]
    EditorError(String),

    #[error("No editor configured: set $VISUAL or $EDITOR, or pass one explicitly")]
    NoEditor,

    #[error("Serialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
