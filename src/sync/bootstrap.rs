use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;

use crate::classify::ResourceKind;
use crate::error::SyncPhase;
use crate::state::ResourceRecord;

use super::{remote_err, SyncOutcome, SyncSession};

/// Bootstrap the local artifact tree from the remote instance.
///
/// Lists every kind, keeps the draft-status resources, writes their code
/// under the artifact root, and rebuilds the record maps from scratch. Each
/// record's `lastSyncedAt` is seeded from the newest timestamp the remote
/// reported, so a pull or push immediately after a bootstrap starts from a
/// clean slate.
pub fn sync_all(session: &mut SyncSession) -> Result<SyncOutcome> {
    session.validate()?;
    session.workspace.ensure_folders()?;

    for kind in ResourceKind::all() {
        let listings = session
            .remote
            .list(kind)
            .map_err(remote_err(SyncPhase::Fetch))?;

        let mut records = BTreeMap::new();
        for listing in listings.into_iter().filter(|l| l.is_draft()) {
            session.workspace.write_artifact(
                kind,
                &listing.filename,
                listing.code.as_deref().unwrap_or(""),
            )?;
            let last_synced_at = listing.sync_stamp();
            records.insert(
                listing.filename,
                ResourceRecord {
                    id: listing.id,
                    subtype: listing.subtype,
                    created_at: listing.created_at,
                    updated_at: listing.updated_at,
                    last_synced_at,
                },
            );
        }

        println!("  {} {} {}s", "Synced".green(), records.len(), kind);
        session.store.replace_map(kind, records);
    }

    session.persist()?;
    println!("{}", "File sync is completed.".green().bold());
    crate::logger::log_to_file("sync-all completed").ok();

    Ok(SyncOutcome::Succeeded)
}
