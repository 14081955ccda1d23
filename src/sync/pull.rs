use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::error::SyncPhase;
use crate::remote::Variant;

use super::{remote_err, SyncOutcome, SyncSession};

/// Pull the remote copy of a tracked resource over the local file.
///
/// Pull performs no conflict negotiation: its entire purpose is to discard
/// local state, so it always asks for a destructive-overwrite confirmation
/// and then replaces the file bytes unconditionally.
pub fn pull_file(
    session: &mut SyncSession,
    path: &Path,
    variant: Variant,
    dirty: bool,
) -> Result<SyncOutcome> {
    let details = session.details_for(path)?;
    let record = session.tracked(&details)?;

    let published = variant == Variant::Live;
    if !session.prompt.confirm_pull(&details.key, published, dirty)? {
        return Ok(SyncOutcome::Cancelled);
    }

    session.validate()?;

    let remote = session
        .remote
        .fetch(details.kind, &record.id, variant)
        .map_err(remote_err(SyncPhase::Fetch))?;

    session
        .workspace
        .write_artifact(details.kind, &details.key, &remote.code)?;
    session
        .store
        .stamp_synced(details.kind, &details.key, remote.updated_at);
    session.persist()?;

    if published {
        println!(
            "  {} published (live) {} from the instance",
            "Pulled".green(),
            details.key.cyan()
        );
    } else {
        println!(
            "  {} latest {} from the instance",
            "Pulled".green(),
            details.key.cyan()
        );
    }
    crate::logger::log_to_file(&format!(
        "pull{} {} ({})",
        if published { " live" } else { "" },
        details.key,
        record.id
    ))
    .ok();

    Ok(SyncOutcome::Succeeded)
}
