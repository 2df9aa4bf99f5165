//! DNS Sync Types
//!
//! Core types for network members, DNS change records and sync results.

use serde::{Deserialize, Serialize};

/// TTL applied to every published record, in seconds
pub const RECORD_TTL: i64 = 60;

/// Comment attached to every submitted change batch
pub const BATCH_COMMENT: &str = "Managed by zerotier-dns-sync";

/// A ZeroTier network member reduced to what DNS needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// ZeroTier member id (diagnostics only)
    pub id: String,
    /// Display name, used as the host label
    pub name: String,
    /// First managed IP assignment
    pub address: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Members in the order the directory returned them
pub type MemberList = Vec<Member>;

/// Route 53 change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Upsert,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Upsert => write!(f, "UPSERT"),
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
        }
    }
}

/// One record mutation derived from a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub action: ChangeAction,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    pub ttl: i64,
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} (ttl {})",
            self.action, self.hostname, self.record_type, self.value, self.ttl
        )
    }
}

/// Records submitted together in one provider call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub changes: Vec<ChangeRecord>,
}

impl ChangeBatch {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// What happened to a change batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Sent to the provider and accepted
    Submitted,
    /// Nothing to send
    Empty,
    /// Publishing was skipped on request
    DryRun,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStatus::Submitted => write!(f, "submitted"),
            PublishStatus::Empty => write!(f, "empty"),
            PublishStatus::DryRun => write!(f, "dry_run"),
        }
    }
}

/// Outcome of a publish call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub status: PublishStatus,
    /// Provider change id, e.g. `/change/C2682N5HXP0BZ4`
    pub change_id: Option<String>,
    /// Provider status, e.g. `PENDING` or `INSYNC`
    pub provider_status: Option<String>,
    pub submitted_at: Option<String>,
    /// Number of records in the batch
    pub changes: usize,
}

impl PublishResult {
    /// Result for a batch that was never sent
    pub fn not_sent(status: PublishStatus, changes: usize) -> Self {
        Self {
            status,
            change_id: None,
            provider_status: None,
            submitted_at: None,
            changes,
        }
    }
}

/// Summary of one sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub network_id: String,
    pub hosted_zone_id: String,
    pub members: MemberList,
    pub batch: ChangeBatch,
    pub result: PublishResult,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
