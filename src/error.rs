use thiserror::Error;

/// Phase of a sync operation, used to make failure messages distinct enough
/// to identify what was running when the error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Validation,
    Fetch,
    Execute,
    Persist,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncPhase::Validation => write!(f, "validation"),
            SyncPhase::Fetch => write!(f, "fetch"),
            SyncPhase::Execute => write!(f, "execute"),
            SyncPhase::Persist => write!(f, "persist"),
        }
    }
}

/// Error taxonomy for sync operations.
///
/// Every variant is local to a single operation; none of them should
/// terminate the process. Operations return `anyhow::Result`, so callers
/// that need the class (tests, the CLI error reporter) downcast to this
/// type.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or rejected credentials. Fatal to the requested operation,
    /// never retried automatically.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The file is not under the managed artifact tree, or has no remote
    /// record backing it.
    #[error("Not a managed resource: {0}")]
    Mapping(String),

    /// A remote call failed during the named phase.
    #[error("Remote request failed during {phase}: {message}")]
    RemoteUnavailable { phase: SyncPhase, message: String },

    /// Publish was attempted for a kind that version-gates publication, but
    /// no version token could be resolved.
    #[error("Unable to determine remote version to publish {0}")]
    VersionUnavailable(String),

    /// Delete events carry exactly one file; batches are refused before any
    /// remote call is made.
    #[error("Multiple file deletion is not supported ({0} files in one event)")]
    UnsupportedBatch(usize),
}

impl SyncError {
    pub fn remote(phase: SyncPhase, message: impl Into<String>) -> Self {
        SyncError::RemoteUnavailable {
            phase,
            message: message.into(),
        }
    }
}
