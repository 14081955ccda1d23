use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::diff;
use crate::error::{SyncError, SyncPhase};
use crate::prompt::LiveDiffChoice;
use crate::remote::Variant;

use super::{push_file, remote_err, SyncOutcome, SyncSession};

/// Publish a tracked resource: sync the draft content, then promote it to
/// the live variant.
///
/// The content sync reuses the push protocol; if it is cancelled or fails,
/// nothing is published. Kinds that version-gate publication re-fetch the
/// freshly updated resource to obtain the version token and fail explicitly
/// when none is available.
pub fn publish_file(session: &mut SyncSession, path: &Path, content: &str) -> Result<SyncOutcome> {
    let details = session.details_for(path)?;
    let record = session.tracked(&details)?;
    session.validate()?;

    // Offer a look at what the live version currently serves before
    // replacing it.
    match session.remote.fetch(details.kind, &record.id, Variant::Live) {
        Ok(live) => {
            if live.code != content {
                match session.prompt.live_differs(&details.key)? {
                    LiveDiffChoice::ShowDiff => {
                        diff::print(&details.key, &live.code, content);
                    }
                    LiveDiffChoice::Continue => {}
                    LiveDiffChoice::Cancel => return Ok(SyncOutcome::Cancelled),
                }
            }
        }
        Err(e) => {
            log::warn!("Unable to fetch live snapshot for {}: {e:#}", details.key);
            if !session.prompt.publish_without_live(&details.key)? {
                return Ok(SyncOutcome::Cancelled);
            }
        }
    }

    if !session.prompt.confirm_publish(&details.key)? {
        return Ok(SyncOutcome::Cancelled);
    }

    // Content sync first; Skipped (identical content) still publishes.
    match push_file(session, path, content)? {
        SyncOutcome::Succeeded | SyncOutcome::Skipped => {}
        SyncOutcome::Cancelled => return Ok(SyncOutcome::Cancelled),
    }

    // Re-fetch the now-updated resource for the version token the publish
    // call needs.
    let snapshot = session
        .remote
        .fetch(details.kind, &record.id, Variant::Draft)
        .map_err(remote_err(SyncPhase::Fetch))?;

    let version = if details.kind.requires_version_token() {
        match snapshot.version.as_deref() {
            Some(version) => Some(version),
            None => return Err(SyncError::VersionUnavailable(details.key.clone()).into()),
        }
    } else {
        None
    };

    session
        .remote
        .publish(details.kind, &record.id, version)
        .map_err(remote_err(SyncPhase::Execute))?;

    println!(
        "  {} {} {}",
        "Published".green().bold(),
        details.kind,
        details.key.cyan()
    );
    crate::logger::log_to_file(&format!("publish {} ({})", details.key, record.id)).ok();

    Ok(SyncOutcome::Succeeded)
}
