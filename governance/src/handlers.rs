//! Execution of approved membership proposals.
//!
//! Each handler validates the whole request before its first write, so a
//! rejected proposal leaves no partial change behind.

use crate::error::GovernanceError;
use crate::guardians::GuardianSet;
use crate::proposal::{
    AddGuardiansProposal, MembershipProposal, RemoveGuardiansProposal,
    UpdateTotalVotingWeightProposal,
};
use crate::registry::MembershipRegistry;
use civic_store::{EventSink, MembershipEvent};
use civic_types::{Decimal, MemberAddress, MembershipStatus};
use std::collections::BTreeSet;

#[derive(Clone, Copy)]
pub struct ProposalLifecycleHandlers<'a> {
    registry: MembershipRegistry<'a>,
    guardians: GuardianSet<'a>,
    events: &'a dyn EventSink,
}

impl<'a> ProposalLifecycleHandlers<'a> {
    pub fn new(
        registry: MembershipRegistry<'a>,
        guardians: GuardianSet<'a>,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            registry,
            guardians,
            events,
        }
    }

    pub fn apply(&self, proposal: &MembershipProposal) -> Result<(), GovernanceError> {
        tracing::debug!(kind = proposal.proposal_type(), title = proposal.title(), "applying proposal");
        match proposal {
            MembershipProposal::AddGuardians(p) => self.add_guardians(p).map(|_| ()),
            MembershipProposal::RemoveGuardians(p) => self.remove_guardians(p).map(|_| ()),
            MembershipProposal::UpdateTotalVotingWeight(p) => self.update_total_voting_weight(p),
        }
    }

    /// Returns the addresses that became guardians.
    pub fn add_guardians(
        &self,
        proposal: &AddGuardiansProposal,
    ) -> Result<Vec<MemberAddress>, GovernanceError> {
        self.authorize_creator(&proposal.creator)?;
        let candidates = parse_batch(&proposal.guardians_to_add, "add")?;

        for candidate in &candidates {
            let member = self.registry.get(candidate)?.ok_or_else(|| {
                GovernanceError::NotFound(format!("no member at this address: {candidate}"))
            })?;
            if member.status != MembershipStatus::Electorate {
                return Err(GovernanceError::Unauthorized(format!(
                    "member is not active: {candidate}"
                )));
            }
            if member.is_guardian {
                return Err(GovernanceError::Unauthorized(format!(
                    "member is already a guardian: {candidate}"
                )));
            }
        }

        self.guardians.attach(&candidates)?;
        tracing::info!(count = candidates.len(), "guardians added");
        self.events.emit(MembershipEvent::GuardiansAdded {
            guardians: candidates.clone(),
        });
        Ok(candidates)
    }

    /// Returns the addresses that stopped being guardians.
    pub fn remove_guardians(
        &self,
        proposal: &RemoveGuardiansProposal,
    ) -> Result<Vec<MemberAddress>, GovernanceError> {
        self.authorize_creator(&proposal.creator)?;
        let candidates = parse_batch(&proposal.guardians_to_remove, "remove")?;

        for candidate in &candidates {
            if !self.registry.is_member(candidate)? {
                return Err(GovernanceError::NotFound(format!(
                    "no member at this address: {candidate}"
                )));
            }
            if !self.guardians.is_guardian(candidate)? {
                return Err(GovernanceError::InvalidRequest(format!(
                    "member is not a guardian: {candidate}"
                )));
            }
        }
        let remaining = self
            .guardians
            .guardians()?
            .iter()
            .filter(|g| !candidates.contains(g))
            .count();
        if remaining == 0 {
            return Err(GovernanceError::InvalidRequest(
                "cannot remove every guardian".to_string(),
            ));
        }

        self.guardians.detach(&candidates)?;
        tracing::info!(count = candidates.len(), remaining, "guardians removed");
        self.events.emit(MembershipEvent::GuardiansRemoved {
            guardians: candidates.clone(),
        });
        Ok(candidates)
    }

    pub fn update_total_voting_weight(
        &self,
        proposal: &UpdateTotalVotingWeightProposal,
    ) -> Result<(), GovernanceError> {
        self.authorize_creator(&proposal.creator)?;
        let new: Decimal = proposal.new_total_voting_weight;
        let previous = self.guardians.set_total_voting_weight(new)?;

        tracing::info!(previous = %previous, new = %new, "total voting weight updated");
        self.events
            .emit(MembershipEvent::TotalVotingWeightChanged { previous, new });
        Ok(())
    }

    /// Only guardians may author membership proposals.
    fn authorize_creator(&self, creator: &str) -> Result<MemberAddress, GovernanceError> {
        let creator = MemberAddress::parse(creator)
            .map_err(|e| GovernanceError::InvalidAddress(format!("invalid creator address: {e}")))?;
        if !self.guardians.is_guardian(&creator)? {
            return Err(GovernanceError::Unauthorized(format!(
                "creator is not a guardian: {creator}"
            )));
        }
        Ok(creator)
    }
}

/// Parse a non-empty batch of distinct addresses.
fn parse_batch(raw: &[String], action: &str) -> Result<Vec<MemberAddress>, GovernanceError> {
    if raw.is_empty() {
        return Err(GovernanceError::InvalidRequest(format!(
            "no guardians to {action}"
        )));
    }
    let mut seen = BTreeSet::new();
    let mut parsed = Vec::with_capacity(raw.len());
    for addr in raw {
        if addr.is_empty() {
            return Err(GovernanceError::InvalidAddress(
                "empty guardian address".to_string(),
            ));
        }
        let address = MemberAddress::parse(addr).map_err(|e| {
            GovernanceError::InvalidAddress(format!("invalid guardian address: {e}"))
        })?;
        if !seen.insert(address.clone()) {
            return Err(GovernanceError::InvalidRequest(format!(
                "duplicate guardian address: {address}"
            )));
        }
        parsed.push(address);
    }
    Ok(parsed)
}
