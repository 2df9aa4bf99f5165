//! Member → DNS Sync Orchestrator
//!
//! Runs the fetch, project and publish stages in order, once.

use tracing::{error, info};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::projector::build_change_batch;
use crate::providers::{MemberDirectory, RecordPublisher};
use crate::types::{ChangeBatch, MemberList, PublishResult, PublishStatus, SyncReport};

/// One-shot sync of a ZeroTier network into a hosted zone
pub struct MemberDnsSync {
    directory: Box<dyn MemberDirectory>,
    publisher: Box<dyn RecordPublisher>,
    config: SyncConfig,
    dry_run: bool,
}

impl MemberDnsSync {
    pub fn new(
        directory: Box<dyn MemberDirectory>,
        publisher: Box<dyn RecordPublisher>,
        config: SyncConfig,
    ) -> Self {
        Self {
            directory,
            publisher,
            config,
            dry_run: false,
        }
    }

    /// Build the batch but never call the publisher
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fetch members and project them into a change batch
    ///
    /// Nothing is published; the batch can be shown before [`publish`](Self::publish).
    pub async fn prepare(&self) -> Result<PreparedSync, SyncError> {
        let started_at = chrono::Utc::now();

        info!(
            network_id = %self.config.network_id,
            hosted_zone_id = %self.config.hosted_zone_id,
            domain = %self.config.domain_suffix,
            "Starting member DNS sync"
        );

        let members = self
            .directory
            .fetch_members(&self.config.network_id)
            .await
            .inspect_err(|e| error!(error = %e, "Member fetch failed"))?;

        let batch = build_change_batch(&members, &self.config.domain_suffix);
        info!(records = batch.len(), "Built change batch");
        for change in &batch.changes {
            info!(hostname = %change.hostname, value = %change.value, ttl = change.ttl, "Prepared {}", change.action);
        }

        Ok(PreparedSync {
            members,
            batch,
            started_at,
        })
    }

    /// Submit a prepared batch, or skip it in dry-run mode
    pub async fn publish(&self, prepared: PreparedSync) -> Result<SyncReport, SyncError> {
        let PreparedSync {
            members,
            batch,
            started_at,
        } = prepared;

        let result = if self.dry_run {
            info!("DRY RUN - would submit {} records", batch.len());
            PublishResult::not_sent(PublishStatus::DryRun, batch.len())
        } else {
            self.publisher
                .publish(&batch, &self.config.hosted_zone_id)
                .await
                .inspect_err(|e| error!(error = %e, "Publish failed"))?
        };

        info!(status = %result.status, changes = result.changes, "Member DNS sync complete");

        Ok(SyncReport {
            network_id: self.config.network_id.clone(),
            hosted_zone_id: self.config.hosted_zone_id.clone(),
            members,
            batch,
            result,
            timestamp: started_at,
        })
    }

    /// Fetch members, project them and publish the batch
    ///
    /// A fetch failure returns before anything is published.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let prepared = self.prepare().await?;
        self.publish(prepared).await
    }
}

/// Members and their change batch, not yet published
#[derive(Debug, Clone)]
pub struct PreparedSync {
    pub members: MemberList,
    pub batch: ChangeBatch,
    started_at: chrono::DateTime<chrono::Utc>,
}
