//! Vote collection: classify ballots into per-tier, per-option counts.
//!
//! Collection is best effort: a ballot from a non-member, an ineligible
//! member or with an invalid weighting is logged and discarded, and the
//! remaining ballots are still counted. Only collaborator failures abort.

use crate::error::GovernanceError;
use crate::registry::MembershipRegistry;
use civic_store::{Member, VoteSource};
use civic_types::{Decimal, MemberAddress, ProposalId, Vote, VoteOption, WeightedVoteOption};
use std::collections::BTreeMap;

/// Raw ballot counts of one tier, keyed by option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCounts(BTreeMap<VoteOption, u64>);

impl TierCounts {
    /// Every recognized option at zero.
    pub fn new() -> Self {
        Self(VoteOption::RECOGNIZED.iter().map(|o| (*o, 0)).collect())
    }

    pub fn get(&self, option: VoteOption) -> u64 {
        self.0.get(&option).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, option: VoteOption) {
        *self.0.entry(option).or_insert(0) += 1;
    }

    /// Ballots counted in this tier.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, n)| n).sum()
    }

    /// Ballots counted in this tier that were not abstentions.
    pub fn non_abstain(&self) -> u64 {
        self.total() - self.get(VoteOption::Abstain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoteOption, u64)> + '_ {
        self.0.iter().map(|(o, c)| (*o, *c))
    }
}

impl Default for TierCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[(VoteOption, u64); N]> for TierCounts {
    fn from(entries: [(VoteOption, u64); N]) -> Self {
        let mut counts = Self::new();
        for (option, n) in entries {
            counts.0.insert(option, n);
        }
        counts
    }
}

/// A ballot that was not counted, and why.
#[derive(Debug)]
pub struct DiscardedBallot {
    pub voter: MemberAddress,
    pub reason: GovernanceError,
}

/// Outcome of collecting every ballot on a proposal.
#[derive(Debug, Default)]
pub struct CollectionReport {
    pub guardians: TierCounts,
    pub members: TierCounts,
    pub discarded: Vec<DiscardedBallot>,
}

impl CollectionReport {
    pub fn counted(&self) -> u64 {
        self.guardians.total() + self.members.total()
    }
}

#[derive(Clone, Copy)]
pub struct VoteCollector<'a> {
    registry: MembershipRegistry<'a>,
    votes: &'a dyn VoteSource,
}

impl<'a> VoteCollector<'a> {
    pub fn new(registry: MembershipRegistry<'a>, votes: &'a dyn VoteSource) -> Self {
        Self { registry, votes }
    }

    /// Count every ballot on `proposal` in ascending voter order.
    ///
    /// Each ballot, counted or not, is marked for deletion by the vote store.
    pub fn collect(&self, proposal: ProposalId) -> Result<CollectionReport, GovernanceError> {
        let mut ballots = self.votes.votes(proposal)?;
        ballots.sort_by(|a, b| a.voter.cmp(&b.voter));

        let mut report = CollectionReport::default();
        let mut previous: Option<MemberAddress> = None;
        for ballot in &ballots {
            let duplicate = previous.as_ref() == Some(&ballot.voter);
            let outcome = if duplicate {
                Err(GovernanceError::MalformedVote(
                    "voter already has a ballot on this proposal".to_string(),
                ))
            } else {
                self.classify(proposal, ballot)
            };

            match outcome {
                Ok((choice, true)) => report.guardians.increment(choice),
                Ok((choice, false)) => report.members.increment(choice),
                Err(e @ GovernanceError::Store(_)) => return Err(e),
                Err(reason) => {
                    tracing::warn!(
                        proposal = %proposal,
                        voter = %ballot.voter,
                        error = %reason,
                        "discarding ballot"
                    );
                    report.discarded.push(DiscardedBallot {
                        voter: ballot.voter.clone(),
                        reason,
                    });
                }
            }

            self.votes.mark_for_deletion(proposal, &ballot.voter)?;
            previous = Some(ballot.voter.clone());
        }

        tracing::debug!(
            proposal = %proposal,
            counted = report.counted(),
            discarded = report.discarded.len(),
            "ballots collected"
        );
        Ok(report)
    }

    /// Returns the chosen option and whether the voter is a guardian.
    fn classify(
        &self,
        proposal: ProposalId,
        ballot: &Vote,
    ) -> Result<(VoteOption, bool), GovernanceError> {
        if ballot.proposal_id != proposal {
            return Err(GovernanceError::MalformedVote(format!(
                "ballot is for proposal {}",
                ballot.proposal_id
            )));
        }
        let member: Member = self
            .registry
            .get(&ballot.voter)?
            .ok_or_else(|| GovernanceError::NotFound(ballot.voter.to_string()))?;
        if !member.status.can_vote() {
            return Err(GovernanceError::Unauthorized(format!(
                "member is not eligible to vote: status {}",
                member.status
            )));
        }
        let choice = single_choice(&ballot.options)?;
        Ok((choice, member.is_guardian))
    }
}

/// The option a valid ballot chose.
///
/// Valid means every weight is exactly 0 or 1 and the weights sum to exactly 1.
/// Split ballots are rejected outright, never partially counted.
pub fn single_choice(options: &[WeightedVoteOption]) -> Result<VoteOption, GovernanceError> {
    let mut total = Decimal::ZERO;
    let mut choice = None;
    for entry in options {
        if entry.weight == Decimal::ONE {
            choice = Some(entry.option);
        } else if !entry.weight.is_zero() {
            return Err(GovernanceError::MalformedVote(format!(
                "option {}'s weight is invalid: {}",
                entry.option, entry.weight
            )));
        }
        total += entry.weight;
    }
    if total != Decimal::ONE {
        return Err(GovernanceError::MalformedVote(format!(
            "total weighting must be exactly 1, got {total}"
        )));
    }
    match choice {
        Some(option) if option.is_recognized() => Ok(option),
        _ => Err(GovernanceError::MalformedVote(
            "ballot has no recognized choice".to_string(),
        )),
    }
}
