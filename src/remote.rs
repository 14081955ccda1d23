use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::classify::ResourceKind;
use crate::error::SyncError;

/// Which remote variant of a resource to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The unpublished working copy (the default).
    Draft,
    /// The publicly served, published version.
    Live,
}

/// Ephemeral snapshot of one remote resource, fetched per operation and
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub code: String,
    pub updated_at: Option<String>,
    /// Version token required to publish kinds that version-gate
    /// publication.
    pub version: Option<String>,
}

/// Body for create and update calls.
#[derive(Debug, Clone, Serialize)]
pub struct ResourcePayload {
    pub filename: String,
    #[serde(rename = "type")]
    pub subtype: String,
    pub code: String,
}

/// Remote facts returned by a create call.
#[derive(Debug, Clone)]
pub struct CreatedResource {
    pub id: String,
    pub subtype: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One entry from a kind listing, used by the bootstrap sync.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteListing {
    #[serde(alias = "ZUID", alias = "zuid")]
    pub id: String,
    #[serde(alias = "fileName")]
    pub filename: String,
    #[serde(rename = "type", default)]
    pub subtype: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(alias = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl RemoteListing {
    /// Initial `lastSyncedAt` seed for a bootstrapped record: the newest
    /// timestamp the remote reported, falling back to the creation time.
    pub fn sync_stamp(&self) -> Option<String> {
        self.updated_at.clone().or_else(|| self.created_at.clone())
    }

    /// Draft-status resources are the ones the local tree mirrors.
    pub fn is_draft(&self) -> bool {
        self.status == "dev"
    }
}

/// Abstract client for the remote CMS instance. The orchestrator only ever
/// talks to this trait; tests swap in an in-memory implementation.
pub trait RemoteClient {
    /// Check that the configured credentials are accepted by the remote.
    fn verify_token(&self) -> Result<()>;

    /// List all resources of one kind.
    fn list(&self, kind: ResourceKind) -> Result<Vec<RemoteListing>>;

    /// Fetch the current snapshot of one resource.
    fn fetch(&self, kind: ResourceKind, id: &str, variant: Variant) -> Result<RemoteSnapshot>;

    /// Create a resource; the remote assigns the identifier.
    fn create(&self, kind: ResourceKind, payload: &ResourcePayload) -> Result<CreatedResource>;

    /// Update a resource's content. Returns the remote's `updatedAt` when
    /// the API reports one.
    fn update(&self, kind: ResourceKind, id: &str, payload: &ResourcePayload)
        -> Result<Option<String>>;

    /// Delete a resource.
    fn delete(&self, kind: ResourceKind, id: &str) -> Result<()>;

    /// Publish a resource. `version` is required for kinds that version-gate
    /// publication; scripts publish by identifier alone.
    fn publish(&self, kind: ResourceKind, id: &str, version: Option<&str>) -> Result<()>;
}

/// Default API origin pattern. `{instance}` is replaced with the instance
/// identifier; a different origin can be set in the user settings.
pub const DEFAULT_API_ORIGIN: &str = "https://{instance}.api.webengine.io/v1/web";

/// Collection endpoint for each resource kind.
fn endpoint(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::View => "views",
        ResourceKind::Stylesheet => "stylesheets",
        ResourceKind::Script => "scripts",
    }
}

/// Response envelope used by the remote API. `error` is populated instead
/// of (or alongside) `data` on failure.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Wire shape of a single-resource response. The field casing varies by
/// resource kind and API version, hence the aliases.
#[derive(Debug, Deserialize)]
struct SnapshotWire {
    #[serde(default)]
    code: Option<String>,
    #[serde(alias = "updatedAt", default)]
    updated_at: Option<String>,
    #[serde(alias = "version_num", alias = "versionNumber", default)]
    version: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedWire {
    #[serde(alias = "ZUID", alias = "zuid")]
    id: String,
    #[serde(rename = "type", default)]
    subtype: String,
    #[serde(alias = "createdAt", default)]
    created_at: Option<String>,
    #[serde(alias = "updatedAt", default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatedWire {
    #[serde(alias = "updatedAt", default)]
    updated_at: Option<String>,
}

/// Version tokens arrive as strings or bare numbers depending on the kind.
fn normalize_version(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<SnapshotWire> for RemoteSnapshot {
    fn from(wire: SnapshotWire) -> Self {
        RemoteSnapshot {
            code: wire.code.unwrap_or_default(),
            updated_at: wire.updated_at,
            version: normalize_version(wire.version),
        }
    }
}

/// HTTP implementation of [`RemoteClient`] against the instance REST API.
pub struct HttpRemoteClient {
    http: reqwest::blocking::Client,
    base: String,
    token: String,
}

impl HttpRemoteClient {
    pub fn new(instance_id: &str, token: &str, api_origin: Option<&str>) -> Result<Self> {
        let base = api_origin
            .unwrap_or(DEFAULT_API_ORIGIN)
            .replace("{instance}", instance_id);
        let http = reqwest::blocking::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpRemoteClient {
            http,
            base,
            token: token.to_string(),
        })
    }

    fn url(&self, kind: ResourceKind, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base, endpoint(kind), id),
            None => format!("{}/{}", self.base, endpoint(kind)),
        }
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .send()
            .context("Remote request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SyncError::Auth(
                "Invalid or expired developer token provided.".to_string(),
            )
            .into());
        }

        let body = response.text().context("Failed to read remote response")?;
        if !status.is_success() {
            return Err(anyhow!("Remote returned {status}: {body}"));
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).context("Failed to parse remote response")?;
        if let Some(error) = envelope.error {
            let message = error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string());
            return Err(anyhow!("Remote reported an error: {message}"));
        }
        envelope
            .data
            .ok_or_else(|| anyhow!("Remote response carried no data"))
    }

    fn send_unit(&self, request: reqwest::blocking::RequestBuilder) -> Result<()> {
        // Some calls return an empty or irrelevant data payload.
        let _: serde_json::Value = self.send(request)?;
        Ok(())
    }
}

impl RemoteClient for HttpRemoteClient {
    fn verify_token(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(SyncError::Auth("Access token not found.".to_string()).into());
        }
        let url = self.url(ResourceKind::View, None);
        let _: serde_json::Value = self.send(self.http.get(url))?;
        Ok(())
    }

    fn list(&self, kind: ResourceKind) -> Result<Vec<RemoteListing>> {
        let url = self.url(kind, None);
        log::debug!("Listing {kind}s from {url}");
        self.send(self.http.get(url))
    }

    fn fetch(&self, kind: ResourceKind, id: &str, variant: Variant) -> Result<RemoteSnapshot> {
        let mut url = self.url(kind, Some(id));
        if variant == Variant::Live {
            url.push_str("?status=live");
        }
        log::debug!("Fetching {kind} {id} from {url}");
        let wire: SnapshotWire = self.send(self.http.get(url))?;
        Ok(wire.into())
    }

    fn create(&self, kind: ResourceKind, payload: &ResourcePayload) -> Result<CreatedResource> {
        let url = self.url(kind, None);
        log::info!("Creating {kind} {} at {url}", payload.filename);
        let wire: CreatedWire = self.send(self.http.post(url).json(payload))?;
        Ok(CreatedResource {
            id: wire.id,
            subtype: wire.subtype,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }

    fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        payload: &ResourcePayload,
    ) -> Result<Option<String>> {
        let url = self.url(kind, Some(id));
        log::info!("Updating {kind} {id}");
        // The view endpoint only accepts the code field on update.
        let wire: UpdatedWire = match kind {
            ResourceKind::View => {
                self.send(self.http.put(url).json(&json!({ "code": payload.code })))?
            }
            _ => self.send(self.http.put(url).json(payload))?,
        };
        Ok(wire.updated_at)
    }

    fn delete(&self, kind: ResourceKind, id: &str) -> Result<()> {
        let url = self.url(kind, Some(id));
        log::info!("Deleting {kind} {id}");
        self.send_unit(self.http.delete(url))
    }

    fn publish(&self, kind: ResourceKind, id: &str, version: Option<&str>) -> Result<()> {
        let url = format!("{}?action=publish", self.url(kind, Some(id)));
        log::info!("Publishing {kind} {id}");
        match (kind.requires_version_token(), version) {
            (true, Some(version)) => {
                self.send_unit(self.http.put(url).json(&json!({ "version": version })))
            }
            (true, None) => Err(anyhow!("publish for {kind} requires a version token")),
            (false, _) => self.send_unit(self.http.put(url).json(&json!({}))),
        }
    }
}
