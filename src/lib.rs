//! # webengine-sync
//!
//! A command-line tool for synchronizing a local tree of webengine
//! artifacts (page templates, stylesheets, scripts) with a remote
//! content-management instance that stores the authoritative, versioned
//! copies.
//!
//! ## Overview
//!
//! The workspace keeps its artifacts under a `webengine/` root with
//! `views/`, `styles/` and `scripts/` subdirectories, and records which
//! remote resource backs each file in a `webengine.json` instance file.
//! Every operation works on a single targeted file: push local content to
//! the draft copy, pull the draft or published copy over the local file,
//! publish, create, or delete. Before a push the tool compares the remote
//! modification time against the last recorded sync and asks before
//! overwriting newer remote work.
//!
//! ## Architecture
//!
//! - Path classification and kind dispatch ([`classify`])
//! - Persisted instance state ([`state`], [`config`], [`settings`])
//! - Remote client seam ([`remote`])
//! - Divergence detection ([`conflict`], [`diff`])
//! - User decision points ([`prompt`])
//! - The operation state machines ([`sync`])

/// Resource classification: canonical keys, resource kinds, and the
/// kind-to-subtype dispatch table. Pure functions, no I/O.
pub mod classify;

/// Platform config-directory paths and managed-workspace discovery.
pub mod config;

/// Conflict detection: classifies the remote copy as unchanged, ahead of
/// the last local sync, or unknown when the remote timestamp is unusable.
pub mod conflict;

/// Unified remote-vs-local diffs shown at conflict and publish prompts.
pub mod diff;

/// The per-operation error taxonomy.
pub mod error;

/// Logging to console (RUST_LOG) and a rotating file in the config dir.
pub mod logger;

/// User decision prompts, behind a trait so operations can suspend on a
/// terminal prompt or a scripted test double.
pub mod prompt;

/// The abstract remote resource client and its HTTP implementation.
pub mod remote;

/// User settings (token, save/delete sync toggles, API origin).
pub mod settings;

/// The sync metadata store: per-kind key -> record maps persisted to the
/// workspace instance file after every mutation.
pub mod state;

/// The sync orchestrator: push, pull, publish, create, delete, bootstrap
/// and status, each running over an explicit session context.
pub mod sync;
