use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::error::{SyncError, SyncPhase};

use super::{remote_err, SyncOutcome, SyncSession};

/// Delete the remote resource backing a removed local file.
///
/// Exactly one file per delete operation: batches are refused before any
/// remote call, so a refused event performs zero deletions.
pub fn delete_files(session: &mut SyncSession, paths: &[PathBuf]) -> Result<SyncOutcome> {
    if paths.len() > 1 {
        return Err(SyncError::UnsupportedBatch(paths.len()).into());
    }
    let Some(path) = paths.first() else {
        return Ok(SyncOutcome::Skipped);
    };

    let details = session.details_for(path)?;
    let record = session.tracked(&details)?;
    session.validate()?;

    session
        .remote
        .delete(details.kind, &record.id)
        .map_err(remote_err(SyncPhase::Execute))?;

    session.store.remove(details.kind, &details.key);
    session.persist()?;

    println!(
        "  {} {} {}",
        "Deleted".green(),
        details.kind,
        record.id.cyan()
    );
    crate::logger::log_to_file(&format!("delete {} ({})", details.key, record.id)).ok();

    Ok(SyncOutcome::Succeeded)
}
