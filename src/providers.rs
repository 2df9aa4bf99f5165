//! Capability traits for the two remote collaborators
//!
//! The sync run only talks to these traits, so the ZeroTier and Route 53
//! clients can be swapped for in-memory fakes.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::types::{ChangeBatch, MemberList, PublishResult};

/// Source of network members
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// List every member of a network, in directory order
    async fn fetch_members(&self, network_id: &str) -> Result<MemberList, SyncError>;
}

/// Sink for DNS change batches
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Apply a whole batch to a hosted zone in one request
    async fn publish(&self, batch: &ChangeBatch, hosted_zone_id: &str) -> Result<PublishResult, SyncError>;
}
