//! Logical key layout for persisted governance state.
//!
//! Each key starts with a one-byte prefix. Keys embedding a proposal id use
//! its big-endian bytes so a prefix scan visits proposals in numeric order and
//! voters in address order.

use crate::member::MemberMetadata;
use civic_types::{MemberAddress, MembershipStatus, ProposalId};

pub const MEMBER_PREFIX: u8 = 0x01;
pub const MEMBER_METADATA_PREFIX: u8 = 0x02;
pub const MEMBER_COUNT_KEY: &[u8] = &[0x03];
pub const MEMBER_STATUS_COUNT_PREFIX: u8 = 0x04;
pub const DEMOCRACY_SETTINGS_KEY: &[u8] = &[0x05];
pub const VOTE_TO_DELETE_PREFIX: u8 = 0x06;
pub const VOTE_PREFIX: u8 = 0x07;

fn with_prefix(prefix: u8, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.push(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

pub fn member_key(address: &MemberAddress) -> Vec<u8> {
    with_prefix(MEMBER_PREFIX, &[address.as_str().as_bytes()])
}

/// `(address, kind)`; a zero byte separates the two since addresses never contain one.
pub fn member_metadata_key(address: &MemberAddress, kind: MemberMetadata) -> Vec<u8> {
    with_prefix(
        MEMBER_METADATA_PREFIX,
        &[address.as_str().as_bytes(), &[0], kind.key().as_bytes()],
    )
}

pub fn member_status_count_key(status: MembershipStatus) -> Vec<u8> {
    vec![MEMBER_STATUS_COUNT_PREFIX, status.code()]
}

/// Prefix shared by every ballot on `proposal`.
pub fn votes_prefix(proposal: ProposalId) -> Vec<u8> {
    with_prefix(VOTE_PREFIX, &[&proposal.to_be_bytes()])
}

pub fn vote_key(proposal: ProposalId, voter: &MemberAddress) -> Vec<u8> {
    with_prefix(
        VOTE_PREFIX,
        &[&proposal.to_be_bytes(), voter.as_str().as_bytes()],
    )
}

/// Prefix shared by every deletion marker on `proposal`.
pub fn votes_to_delete_prefix(proposal: ProposalId) -> Vec<u8> {
    with_prefix(VOTE_TO_DELETE_PREFIX, &[&proposal.to_be_bytes()])
}

pub fn vote_to_delete_key(proposal: ProposalId, voter: &MemberAddress) -> Vec<u8> {
    with_prefix(
        VOTE_TO_DELETE_PREFIX,
        &[&proposal.to_be_bytes(), voter.as_str().as_bytes()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_do_not_collide_across_kinds() {
        let addr = MemberAddress::new("civ_alice");
        let id = ProposalId::new(7);
        let keys = [
            member_key(&addr),
            member_metadata_key(&addr, MemberMetadata::Nickname),
            MEMBER_COUNT_KEY.to_vec(),
            member_status_count_key(MembershipStatus::Electorate),
            DEMOCRACY_SETTINGS_KEY.to_vec(),
            vote_key(id, &addr),
            vote_to_delete_key(id, &addr),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn vote_keys_sort_by_proposal_then_voter() {
        let a = MemberAddress::new("civ_a");
        let b = MemberAddress::new("civ_b");
        assert!(vote_key(ProposalId::new(1), &b) < vote_key(ProposalId::new(2), &a));
        assert!(vote_key(ProposalId::new(1), &a) < vote_key(ProposalId::new(1), &b));
        assert!(vote_key(ProposalId::new(1), &a).starts_with(&votes_prefix(ProposalId::new(1))));
    }
}
