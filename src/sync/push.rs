use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::conflict;
use crate::diff;
use crate::error::SyncPhase;
use crate::prompt::PushConflictChoice;
use crate::remote::{ResourcePayload, Variant};

use super::{payload_code, remote_err, SyncOutcome, SyncSession};

/// Push local content to the remote draft copy of a tracked resource.
///
/// Untracked files are never implicitly pushed. If the remote copy is
/// byte-identical the push is a no-op; if the remote moved after our last
/// sync the user chooses between overwriting, viewing a diff (which aborts
/// the push), and cancelling.
pub fn push_file(session: &mut SyncSession, path: &Path, content: &str) -> Result<SyncOutcome> {
    let details = session.details_for(path)?;
    let record = session.tracked(&details)?;
    session.validate()?;

    let remote = session
        .remote
        .fetch(details.kind, &record.id, Variant::Draft)
        .map_err(remote_err(SyncPhase::Fetch))?;

    if remote.code == content {
        println!("{}", "No changes to sync.".dimmed());
        return Ok(SyncOutcome::Skipped);
    }

    if conflict::classify(remote.updated_at.as_deref(), &record).is_ahead() {
        match session.prompt.push_conflict(&details.key)? {
            PushConflictChoice::OverwriteRemote => {}
            PushConflictChoice::ShowDiff => {
                // The diff replaces the push; the user re-invokes once they
                // have decided.
                diff::print(&details.key, &remote.code, content);
                return Ok(SyncOutcome::Cancelled);
            }
            PushConflictChoice::Cancel => return Ok(SyncOutcome::Cancelled),
        }
    }

    let payload = ResourcePayload {
        filename: details.key.clone(),
        subtype: record.subtype.clone(),
        code: payload_code(content),
    };
    let updated_at = session
        .remote
        .update(details.kind, &record.id, &payload)
        .map_err(remote_err(SyncPhase::Execute))?;

    session
        .store
        .stamp_synced(details.kind, &details.key, updated_at);
    session.persist()?;

    println!(
        "  {} {} to {}",
        "Saved".green(),
        details.kind,
        record.id.cyan()
    );
    crate::logger::log_to_file(&format!("push {} ({})", details.key, record.id)).ok();

    Ok(SyncOutcome::Succeeded)
}
