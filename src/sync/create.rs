use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::error::SyncPhase;
use crate::remote::ResourcePayload;
use crate::state::ResourceRecord;

use super::{payload_code, remote_err, SyncOutcome, SyncSession};

/// Register a newly appeared local file with the remote instance.
///
/// The resource subtype follows the extension: stylesheets get
/// `text/<ext>`, scripts `text/javascript`, extensionless views the
/// `snippet` subtype, and anything else the generic page-view subtype.
/// Empty files are sent with a placeholder body, since the remote rejects
/// fully empty payloads.
pub fn create_file(session: &mut SyncSession, path: &Path, content: &str) -> Result<SyncOutcome> {
    let details = session.details_for(path)?;

    if session.store.get(details.kind, &details.key).is_some() {
        println!(
            "  {} {} is already tracked",
            "Skipping:".yellow(),
            details.key
        );
        return Ok(SyncOutcome::Skipped);
    }

    session.validate()?;

    let subtype = details.kind.create_subtype(details.extension.as_deref());
    let payload = ResourcePayload {
        filename: details.key.clone(),
        subtype: subtype.clone(),
        code: payload_code(content),
    };

    let created = session
        .remote
        .create(details.kind, &payload)
        .map_err(remote_err(SyncPhase::Execute))?;

    // No lastSyncedAt yet: this record was created by this very call, so
    // the next push or pull proceeds without a conflict prompt.
    let record = ResourceRecord {
        id: created.id.clone(),
        subtype: if created.subtype.is_empty() {
            subtype
        } else {
            created.subtype
        },
        created_at: created.created_at,
        updated_at: created.updated_at,
        last_synced_at: None,
    };
    session.store.put(details.kind, &details.key, record);
    session.persist()?;

    println!(
        "  {} {} as {}",
        "Created".green(),
        details.kind,
        created.id.cyan()
    );
    crate::logger::log_to_file(&format!("create {} ({})", details.key, created.id)).ok();

    Ok(SyncOutcome::Succeeded)
}
