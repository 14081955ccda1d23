use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::ResourceKind;

/// Last-known remote facts for one synced resource.
///
/// A record exists for a key iff a remote resource has been created for it;
/// absence means the key is untracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Opaque remote identifier, assigned by the remote system on create.
    pub id: String,

    /// Remote-defined type string (e.g. "text/css", "snippet").
    #[serde(rename = "type")]
    pub subtype: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last known remote modification time, as reported by the remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Timestamp of the last local<->remote exchange for this key, set by
    /// the orchestrator after every successful push or pull. A freshly
    /// created record has none yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<String>,
}

/// Per-kind key -> record maps. BTreeMap keeps the persisted file diffable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceMaps {
    #[serde(default)]
    pub view: BTreeMap<String, ResourceRecord>,
    #[serde(default)]
    pub stylesheet: BTreeMap<String, ResourceRecord>,
    #[serde(default)]
    pub script: BTreeMap<String, ResourceRecord>,
}

/// Persisted instance state: which remote instance this workspace tracks and
/// the record maps for all three resource kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfig {
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub resources: ResourceMaps,
}

/// The sync metadata store: an [`InstanceConfig`] bound to its on-disk file.
///
/// Mutations happen in memory; callers invoke [`InstanceStore::persist`]
/// after each mutating operation (write-after-mutate, not write-on-exit, so
/// state survives a crash).
#[derive(Debug)]
pub struct InstanceStore {
    path: PathBuf,
    pub config: InstanceConfig,
}

impl InstanceStore {
    /// Load the store from an existing instance file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!(
                "No instance file at {}. Run 'webengine-sync init' first.",
                path.display()
            ));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read instance file: {}", path.display()))?;
        let config: InstanceConfig =
            serde_json::from_str(&content).context("Failed to parse instance file")?;

        Ok(InstanceStore {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Create a fresh store for a newly initialized workspace.
    pub fn create(path: &Path, instance_id: &str) -> Result<Self> {
        let store = InstanceStore {
            path: path.to_path_buf(),
            config: InstanceConfig {
                instance_id: instance_id.to_string(),
                resources: ResourceMaps::default(),
            },
        };
        store.persist()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map(&self, kind: ResourceKind) -> &BTreeMap<String, ResourceRecord> {
        match kind {
            ResourceKind::View => &self.config.resources.view,
            ResourceKind::Stylesheet => &self.config.resources.stylesheet,
            ResourceKind::Script => &self.config.resources.script,
        }
    }

    fn map_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<String, ResourceRecord> {
        match kind {
            ResourceKind::View => &mut self.config.resources.view,
            ResourceKind::Stylesheet => &mut self.config.resources.stylesheet,
            ResourceKind::Script => &mut self.config.resources.script,
        }
    }

    pub fn get(&self, kind: ResourceKind, key: &str) -> Option<&ResourceRecord> {
        self.map(kind).get(key)
    }

    pub fn put(&mut self, kind: ResourceKind, key: &str, record: ResourceRecord) {
        self.map_mut(kind).insert(key.to_string(), record);
    }

    pub fn remove(&mut self, kind: ResourceKind, key: &str) -> Option<ResourceRecord> {
        self.map_mut(kind).remove(key)
    }

    /// Replace the whole map for one kind (used by the bootstrap sync).
    pub fn replace_map(&mut self, kind: ResourceKind, records: BTreeMap<String, ResourceRecord>) {
        *self.map_mut(kind) = records;
    }

    pub fn record_count(&self, kind: ResourceKind) -> usize {
        self.map(kind).len()
    }

    pub fn records(&self, kind: ResourceKind) -> impl Iterator<Item = (&String, &ResourceRecord)> {
        self.map(kind).iter()
    }

    /// Update the sync stamp for a key after a successful push or pull.
    ///
    /// `updated_at` is the timestamp the remote reported for the exchange;
    /// when the remote call did not return one, the current time is recorded
    /// instead so the record never loses its sync history.
    pub fn stamp_synced(&mut self, kind: ResourceKind, key: &str, updated_at: Option<String>) {
        if let Some(record) = self.map_mut(kind).get_mut(key) {
            let stamp = updated_at
                .clone()
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
            record.last_synced_at = Some(stamp);
            if updated_at.is_some() {
                record.updated_at = updated_at;
            }
        }
    }

    /// Write the full state file. Idempotent and safe to call redundantly.
    ///
    /// A store with no instance identifier is incomplete; persisting it is a
    /// no-op rather than an error, preserving whatever was last durably
    /// written.
    pub fn persist(&self) -> Result<()> {
        if self.config.instance_id.is_empty() {
            log::warn!("Skipping persist: instance id missing from config");
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.config).context("Failed to serialize instance state")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write instance file: {}", self.path.display()))?;

        Ok(())
    }
}
