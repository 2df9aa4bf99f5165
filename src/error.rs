//! Errors that can occur during a sync run

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the directory, projector and publisher stages
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration is incomplete
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Credentials were rejected or missing
    #[error("{service} authentication failed: {message}")]
    Auth {
        service: &'static str,
        message: String,
    },

    /// Listing network members failed
    #[error("Failed to fetch network members: {0}")]
    Fetch(String),

    /// A member has no assigned address
    #[error("Member {id} ({name}) has no assigned address")]
    MalformedMember { id: String, name: String },

    /// Submitting the change batch failed
    #[error("Failed to publish change batch: {0}")]
    Publish(String),
}
