//! Member → DNS record projection

use crate::types::{ChangeAction, ChangeBatch, ChangeRecord, Member, RecordType, BATCH_COMMENT, RECORD_TTL};

/// Build one UPSERT A record per member, in member order
///
/// The hostname is `name + "." + domain_suffix` verbatim.
pub fn build_change_batch(members: &[Member], domain_suffix: &str) -> ChangeBatch {
    let changes = members
        .iter()
        .map(|member| ChangeRecord {
            action: ChangeAction::Upsert,
            hostname: format!("{}.{}", member.name, domain_suffix),
            record_type: RecordType::A,
            value: member.address.clone(),
            ttl: RECORD_TTL,
        })
        .collect();

    ChangeBatch {
        comment: Some(BATCH_COMMENT.to_string()),
        changes,
    }
}
