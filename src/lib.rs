//! ZeroTier → Route 53 DNS Sync
//!
//! Fetches the members of a ZeroTier network and upserts one `A` record per
//! member into a Route 53 hosted zone.

pub mod config;
pub mod error;
pub mod projector;
pub mod providers;
pub mod route53;
pub mod sync;
pub mod types;
pub mod zerotier;

pub use config::{ConfigError, RawConfig, SyncConfig};
pub use error::SyncError;
pub use projector::build_change_batch;
pub use providers::{MemberDirectory, RecordPublisher};
pub use route53::Route53Publisher;
pub use sync::{MemberDnsSync, PreparedSync};
pub use types::{ChangeBatch, ChangeRecord, Member, MemberList, PublishResult, SyncReport};
pub use zerotier::{MissingAddressPolicy, ZeroTierClient};
