//! The sync orchestrator: push, pull, publish, create, delete, bootstrap.
//!
//! Every operation runs to completion against a [`SyncSession`] before the
//! next one starts; the session owns the metadata store, so there is no
//! shared mutable state between operations. Suspension points are exactly
//! the user prompts and the remote calls. An implementation driving
//! operations concurrently must hold a per-resource-key lock around the
//! whole fetch -> decide -> execute -> persist sequence.

mod bootstrap;
mod create;
mod delete;
mod publish;
mod pull;
mod push;
mod status;

pub use bootstrap::sync_all;
pub use create::create_file;
pub use delete::delete_files;
pub use publish::publish_file;
pub use pull::pull_file;
pub use push::push_file;
pub use status::show_status;

use anyhow::Result;
use std::path::Path;

use crate::classify::{classify, FileDetails};
use crate::config::Workspace;
use crate::error::{SyncError, SyncPhase};
use crate::prompt::UserPrompt;
use crate::remote::RemoteClient;
use crate::state::{InstanceStore, ResourceRecord};

/// Terminal outcome of a single sync operation. Failures are reported as
/// errors instead of a fourth variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Succeeded,
    /// Nothing to do, e.g. remote content already matches local.
    Skipped,
    /// The user declined at a decision point.
    Cancelled,
}

/// Everything one sync operation needs: the workspace paths, the metadata
/// store, the remote client, and the prompt seam. Threaded explicitly
/// through every operation so sessions can be constructed in isolation for
/// tests.
pub struct SyncSession<'a> {
    pub workspace: Workspace,
    pub store: InstanceStore,
    pub remote: &'a dyn RemoteClient,
    pub prompt: &'a dyn UserPrompt,
}

impl<'a> SyncSession<'a> {
    /// Open a session over an already-initialized workspace.
    pub fn open(
        workspace: Workspace,
        remote: &'a dyn RemoteClient,
        prompt: &'a dyn UserPrompt,
    ) -> Result<Self> {
        let store = InstanceStore::load(&workspace.instance_file())?;
        Ok(SyncSession {
            workspace,
            store,
            remote,
            prompt,
        })
    }

    /// Check credentials against the remote before any mutating call.
    pub(crate) fn validate(&self) -> Result<()> {
        self.remote
            .verify_token()
            .map_err(remote_err(SyncPhase::Validation))
    }

    /// Classify a path, or report it as unmanaged.
    pub(crate) fn details_for(&self, path: &Path) -> Result<FileDetails> {
        classify(&path.to_string_lossy()).ok_or_else(|| {
            SyncError::Mapping(format!(
                "{} is not under the managed webengine tree",
                path.display()
            ))
            .into()
        })
    }

    /// The record backing a key, or a mapping error for untracked files.
    pub(crate) fn tracked(&self, details: &FileDetails) -> Result<ResourceRecord> {
        self.store
            .get(details.kind, &details.key)
            .cloned()
            .ok_or_else(|| {
                SyncError::Mapping(format!(
                    "{} has no remote record; cannot sync to the instance",
                    details.key
                ))
                .into()
            })
    }

    /// Persist the store, classifying failures into the persist phase.
    pub(crate) fn persist(&self) -> Result<()> {
        self.store
            .persist()
            .map_err(|e| SyncError::remote(SyncPhase::Persist, e.to_string()).into())
    }
}

/// Remote systems in this domain reject fully empty payloads; a lone space
/// stands in for empty content.
pub(crate) fn payload_code(content: &str) -> String {
    if content.is_empty() {
        " ".to_string()
    } else {
        content.to_string()
    }
}

/// Wrap a remote-call failure into the taxonomy for `phase`, keeping an
/// already-classified [`SyncError`] (e.g. an auth rejection) as is.
pub(crate) fn remote_err(phase: SyncPhase) -> impl FnOnce(anyhow::Error) -> anyhow::Error {
    move |e| match e.downcast::<SyncError>() {
        Ok(classified) => classified.into(),
        Err(raw) => SyncError::remote(phase, format!("{raw:#}")).into(),
    }
}
