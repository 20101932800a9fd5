//! Error types shared across the workspace

use thiserror::Error;

/// Workspace-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by collaborator backends and configuration.
///
/// The `status` on the collaborator variants carries the HTTP status the
/// upstream service reported, when there was one. The server crate surfaces
/// it in the error body it returns to the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("transcription failed: {message}")]
    Transcription { status: Option<u16>, message: String },

    #[error("generation failed: {message}")]
    Generation { status: Option<u16>, message: String },

    #[error("missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Upstream HTTP status, if the failure came with one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Transcription { status, .. } | Error::Generation { status, .. } => *status,
            _ => None,
        }
    }
}
