//! Request payloads sent by the resource modules.
//!
//! # Design
//! Optional fields the panel treats as "not given" are skipped when `None`.
//! Fields the panel expects to be present even when empty (server details,
//! transfers) serialize `None` as JSON `null` instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTarget {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSanction {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpTarget {
    pub ip: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpBan {
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Whisper {
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhitelistStatus {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateLocation {
    pub shortcode: String,
    pub description: String,
}

/// Partial location update; only the fields present are changed. An empty
/// string counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditLocation {
    #[serde(skip_serializing_if = "is_blank")]
    pub shortcode: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl EditLocation {
    pub fn is_empty(&self) -> bool {
        is_blank(&self.shortcode) && is_blank(&self.description)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Move a server to another node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferServer {
    pub node_id: u64,
    pub allocation_id: u64,
    pub additional_allocations: Option<Vec<u64>>,
    #[serde(default)]
    pub force: bool,
}

/// Build configuration changes for one server.
///
/// `limits` and `feature_limits` are always sent, possibly as empty objects;
/// every other field only when set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerBuild {
    /// Primary allocation.
    #[serde(rename = "allocation", skip_serializing_if = "Option::is_none")]
    pub allocation_id: Option<u64>,
    #[serde(default)]
    pub limits: BuildLimits,
    #[serde(default)]
    pub feature_limits: FeatureLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_allocations: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_allocations: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oom_disabled: Option<bool>,
}

/// Container limits. Memory and disk are in MB, 0 means unlimited; swap -1
/// means unlimited; cpu is a percentage of one core (400 = four cores); io
/// is a block IO weight between 10 and 1000.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backups: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerDetails {
    pub name: String,
    /// Owning user id.
    pub user: u64,
    pub external_id: Option<String>,
    pub description: Option<String>,
}
