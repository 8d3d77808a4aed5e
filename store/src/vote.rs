//! Read access to ballots held by the host vote store.

use crate::StoreError;
use civic_types::{MemberAddress, ProposalId, Vote};

/// Source of ballots for a proposal.
///
/// Ballot removal is owned by the host: the tally only marks ballots, and a
/// later sweep on the host side deletes what was marked.
pub trait VoteSource {
    /// All ballots cast on `proposal`, ascending by voter address.
    fn votes(&self, proposal: ProposalId) -> Result<Vec<Vote>, StoreError>;

    /// Record that `voter`'s ballot on `proposal` has been processed and may be removed.
    fn mark_for_deletion(&self, proposal: ProposalId, voter: &MemberAddress)
        -> Result<(), StoreError>;
}
