//! ZeroTier Central API Client
//!
//! Lists the members of a network over the Central REST API and reduces each
//! one to a name and its first assigned address.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::providers::MemberDirectory;
use crate::types::{Member, MemberList};

pub const ZEROTIER_API_BASE: &str = "https://api.zerotier.com/api/v1";

const SERVICE: &str = "ZeroTier Central";

/// What to do with a member that has no IP assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MissingAddressPolicy {
    /// Leave the member out and log a warning
    #[default]
    Skip,
    /// Fail the whole fetch
    Reject,
}

// ============================================================
// API Response Types
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZtMember {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: Option<ZtMemberConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZtMemberConfig {
    #[serde(default)]
    ip_assignments: Option<Vec<String>>,
}

// ============================================================
// Client Implementation
// ============================================================

/// ZeroTier Central client
pub struct ZeroTierClient {
    http_client: Client,
    api_token: String,
    base_url: String,
    missing_address: MissingAddressPolicy,
}

impl ZeroTierClient {
    /// Create a client against a specific API base URL
    pub fn with_base_url(api_token: String, base_url: impl Into<String>) -> Result<Self, SyncError> {
        if api_token.trim().is_empty() {
            return Err(SyncError::Auth {
                service: SERVICE,
                message: "API token is empty".to_string(),
            });
        }

        let http_client = Client::builder()
            .user_agent(concat!("zerotier-dns-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SyncError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            missing_address: MissingAddressPolicy::default(),
        })
    }

    /// Set the policy for members without an assigned address
    pub fn missing_address_policy(mut self, policy: MissingAddressPolicy) -> Self {
        self.missing_address = policy;
        self
    }

    async fn list_members(&self, network_id: &str) -> Result<Vec<ZtMember>, SyncError> {
        let url = format!("{}/network/{}/member", self.base_url, network_id);
        debug!(url = %url, "Listing network members");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| SyncError::Fetch(format!("Failed to call ZeroTier Central: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(SyncError::Auth {
                service: SERVICE,
                message: format!("{} {}", status, text).trim().to_string(),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SyncError::Fetch(format!(
                "ZeroTier Central error {}: {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SyncError::Fetch(format!("Failed to parse member list: {}", e)))
    }

    fn resolve_members(&self, raw: Vec<ZtMember>) -> Result<MemberList, SyncError> {
        let mut members = Vec::with_capacity(raw.len());

        for member in raw {
            let name = member.name.unwrap_or_default();
            let addresses = member
                .config
                .and_then(|c| c.ip_assignments)
                .unwrap_or_default();

            info!(
                member_id = %member.id,
                name = %name,
                addresses = ?addresses,
                "Discovered network member"
            );

            let Some(address) = addresses.into_iter().next() else {
                match self.missing_address {
                    MissingAddressPolicy::Skip => {
                        warn!(member_id = %member.id, name = %name, "Member has no assigned address, skipping");
                        continue;
                    }
                    MissingAddressPolicy::Reject => {
                        return Err(SyncError::MalformedMember { id: member.id, name });
                    }
                }
            };

            members.push(Member {
                id: member.id,
                name,
                address,
            });
        }

        Ok(members)
    }
}

#[async_trait]
impl MemberDirectory for ZeroTierClient {
    async fn fetch_members(&self, network_id: &str) -> Result<MemberList, SyncError> {
        let raw = self.list_members(network_id).await?;
        let fetched = raw.len();
        let members = self.resolve_members(raw)?;

        info!(
            network_id = %network_id,
            fetched = fetched,
            usable = members.len(),
            "Fetched network members"
        );

        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const NETWORK: &str = "8056c2e21c000001";

    fn member_path() -> String {
        format!("/api/v1/network/{}/member", NETWORK)
    }

    fn client(server: &MockServer) -> ZeroTierClient {
        ZeroTierClient::with_base_url("test-token".to_string(), server.url("/api/v1")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_members_in_api_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(member_path())
                    .header("authorization", "Bearer test-token");
                then.status(200).json_body(json!([
                    {
                        "id": "8056c2e21c000001-aaaaaaaaaa",
                        "name": "laptop1",
                        "config": { "ipAssignments": ["10.0.0.5", "10.0.0.6"] }
                    },
                    {
                        "id": "8056c2e21c000001-bbbbbbbbbb",
                        "name": "nas",
                        "config": { "ipAssignments": ["10.0.0.9"] }
                    }
                ]));
            })
            .await;

        let members = client(&server).fetch_members(NETWORK).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            members,
            vec![
                Member::new("8056c2e21c000001-aaaaaaaaaa", "laptop1", "10.0.0.5"),
                Member::new("8056c2e21c000001-bbbbbbbbbb", "nas", "10.0.0.9"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_network() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(200).json_body(json!([]));
            })
            .await;

        let members = client(&server).fetch_members(NETWORK).await.unwrap();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(401).body("invalid token");
            })
            .await;

        let err = client(&server).fetch_members(NETWORK).await.unwrap_err();

        match err {
            SyncError::Auth { service, message } => {
                assert_eq!(service, "ZeroTier Central");
                assert!(message.contains("invalid token"));
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(500).body("boom");
            })
            .await;

        let err = client(&server).fetch_members(NETWORK).await.unwrap_err();

        assert!(matches!(err, SyncError::Fetch(ref m) if m.contains("500") && m.contains("boom")));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(200).body("not json");
            })
            .await;

        let err = client(&server).fetch_members(NETWORK).await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_member_without_address_is_skipped_by_default() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(200).json_body(json!([
                    { "id": "n-1", "name": "printer", "config": { "ipAssignments": [] } },
                    { "id": "n-2", "name": "phone", "config": {} },
                    { "id": "n-3", "name": "laptop1", "config": { "ipAssignments": ["10.0.0.5"] } }
                ]));
            })
            .await;

        let members = client(&server).fetch_members(NETWORK).await.unwrap();

        assert_eq!(members, vec![Member::new("n-3", "laptop1", "10.0.0.5")]);
    }

    #[tokio::test]
    async fn test_member_without_address_rejected_under_reject_policy() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(200).json_body(json!([
                    { "id": "n-3", "name": "laptop1", "config": { "ipAssignments": ["10.0.0.5"] } },
                    { "id": "n-1", "name": "printer", "config": { "ipAssignments": [] } }
                ]));
            })
            .await;

        let err = client(&server)
            .missing_address_policy(MissingAddressPolicy::Reject)
            .fetch_members(NETWORK)
            .await
            .unwrap_err();

        match err {
            SyncError::MalformedMember { id, name } => {
                assert_eq!(id, "n-1");
                assert_eq!(name, "printer");
            }
            other => panic!("expected malformed member, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_name_becomes_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(member_path());
                then.status(200).json_body(json!([
                    { "id": "n-4", "name": null, "config": { "ipAssignments": ["10.0.0.8"] } }
                ]));
            })
            .await;

        let members = client(&server).fetch_members(NETWORK).await.unwrap();
        assert_eq!(members[0].name, "");
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = ZeroTierClient::with_base_url("  ".to_string(), ZEROTIER_API_BASE).err().unwrap();
        assert!(matches!(err, SyncError::Auth { .. }));
    }
}
