//! Route 53 Publisher
//!
//! Submits a change batch to a hosted zone with a single
//! `ChangeResourceRecordSets` call. Credentials and region come from the
//! standard AWS provider chain.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_route53::config::retry::RetryConfig;
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_route53::primitives::DateTimeFormat;
use aws_sdk_route53::types::{self as r53, RrType};
use aws_sdk_route53::Client;
use tracing::{debug, error, info};

use crate::error::SyncError;
use crate::providers::RecordPublisher;
use crate::types::{ChangeAction, ChangeBatch, PublishResult, PublishStatus, RecordType};

const SERVICE: &str = "Route 53";

/// Provider error codes that mean the credentials themselves are bad
const AUTH_ERROR_CODES: &[&str] = &[
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "UnrecognizedClientException",
];

/// Route 53 change batch publisher
pub struct Route53Publisher {
    client: Client,
}

impl Route53Publisher {
    /// Build a publisher from a service config
    ///
    /// Retries are always turned off so a batch is submitted exactly once.
    pub fn from_conf(config: aws_sdk_route53::Config) -> Self {
        let config = config
            .to_builder()
            .retry_config(RetryConfig::disabled())
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }

    /// Build a client from the AWS environment, optionally pinning the region
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        debug!(region = ?sdk_config.region(), "Initialized Route 53 client");

        Self::from_conf(aws_sdk_route53::Config::new(&sdk_config))
    }
}

#[async_trait]
impl RecordPublisher for Route53Publisher {
    async fn publish(&self, batch: &ChangeBatch, hosted_zone_id: &str) -> Result<PublishResult, SyncError> {
        if batch.is_empty() {
            info!(hosted_zone_id = %hosted_zone_id, "Change batch is empty, nothing to submit");
            return Ok(PublishResult::not_sent(PublishStatus::Empty, 0));
        }

        let change_batch = to_route53_batch(batch)?;

        info!(
            hosted_zone_id = %hosted_zone_id,
            changes = batch.len(),
            "Submitting change batch to Route 53"
        );

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(hosted_zone_id)
            .change_batch(change_batch)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %DisplayErrorContext(&e), "Route 53 request failed");

                let (code, message) = match e.as_service_error() {
                    Some(se) => (
                        se.code().map(str::to_string),
                        format!(
                            "{}: {}",
                            se.code().unwrap_or("Unknown"),
                            se.message().unwrap_or("no message")
                        ),
                    ),
                    None => (None, DisplayErrorContext(&e).to_string()),
                };

                error!(code = ?code, error = %message, "Route 53 rejected change batch");
                classify_provider_error(code.as_deref(), message)
            })?;

        let change_info = output
            .change_info()
            .ok_or_else(|| SyncError::Publish("Route 53 response had no change info".to_string()))?;

        let result = PublishResult {
            status: PublishStatus::Submitted,
            change_id: Some(change_info.id().to_string()),
            provider_status: Some(change_info.status().as_str().to_string()),
            submitted_at: change_info.submitted_at().fmt(DateTimeFormat::DateTime).ok(),
            changes: batch.len(),
        };

        info!(
            change_id = ?result.change_id,
            status = ?result.provider_status,
            "Change batch accepted"
        );

        Ok(result)
    }
}

/// Convert a change batch into its Route 53 request form
pub fn to_route53_batch(batch: &ChangeBatch) -> Result<r53::ChangeBatch, SyncError> {
    let mut changes = Vec::with_capacity(batch.len());

    for record in &batch.changes {
        let value = r53::ResourceRecord::builder()
            .value(&record.value)
            .build()
            .map_err(build_error)?;

        let record_set = r53::ResourceRecordSet::builder()
            .name(&record.hostname)
            .r#type(match record.record_type {
                RecordType::A => RrType::A,
            })
            .ttl(record.ttl)
            .resource_records(value)
            .build()
            .map_err(build_error)?;

        let change = r53::Change::builder()
            .action(match record.action {
                ChangeAction::Upsert => r53::ChangeAction::Upsert,
            })
            .resource_record_set(record_set)
            .build()
            .map_err(build_error)?;

        changes.push(change);
    }

    r53::ChangeBatch::builder()
        .set_comment(batch.comment.clone())
        .set_changes(Some(changes))
        .build()
        .map_err(build_error)
}

fn build_error(e: BuildError) -> SyncError {
    SyncError::Publish(format!("Invalid change batch: {}", e))
}

/// Map a provider error onto the sync error taxonomy
pub fn classify_provider_error(code: Option<&str>, message: String) -> SyncError {
    match code {
        Some(code) if AUTH_ERROR_CODES.contains(&code) => SyncError::Auth {
            service: SERVICE,
            message,
        },
        _ => SyncError::Publish(message),
    }
}
