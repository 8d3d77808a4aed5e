//! Ballots as delivered by the host vote store.

use crate::address::MemberAddress;
use crate::proposal::ProposalId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ballot choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    /// No choice; never counted.
    Unspecified,
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

impl VoteOption {
    /// The options a tally counts, in reporting order.
    pub const RECOGNIZED: [VoteOption; 4] = [Self::Yes, Self::Abstain, Self::No, Self::NoWithVeto];

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "unspecified",
            Self::Yes => "yes",
            Self::Abstain => "abstain",
            Self::No => "no",
            Self::NoWithVeto => "no_with_veto",
        };
        f.write_str(name)
    }
}

/// One `(choice, weight)` pair of a ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedVoteOption {
    pub option: VoteOption,
    pub weight: Decimal,
}

impl WeightedVoteOption {
    pub fn new(option: VoteOption, weight: Decimal) -> Self {
        Self { option, weight }
    }
}

/// A ballot cast on a proposal. Read-only input to the tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: ProposalId,
    pub voter: MemberAddress,
    pub options: Vec<WeightedVoteOption>,
}

impl Vote {
    /// A single-choice ballot: `option` at full weight.
    pub fn single(proposal_id: ProposalId, voter: MemberAddress, option: VoteOption) -> Self {
        Self {
            proposal_id,
            voter,
            options: vec![WeightedVoteOption::new(option, Decimal::ONE)],
        }
    }

    /// A ballot with arbitrary weights, as submitted.
    pub fn weighted(
        proposal_id: ProposalId,
        voter: MemberAddress,
        options: Vec<WeightedVoteOption>,
    ) -> Self {
        Self {
            proposal_id,
            voter,
            options,
        }
    }
}
