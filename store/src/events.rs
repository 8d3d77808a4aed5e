//! Structured notifications emitted by the governance core.

use civic_types::{Decimal, MemberAddress, MembershipStatus};
use serde::{Deserialize, Serialize};

/// A state change worth telling the outside world about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    MemberEnrolled {
        member: MemberAddress,
    },
    MemberStatusChanged {
        member: MemberAddress,
        previous_status: MembershipStatus,
        status: MembershipStatus,
        /// Address (or `genesis`) that initiated the change.
        operator: String,
    },
    MemberApproved {
        member: MemberAddress,
        approver: MemberAddress,
    },
    GuardiansAdded {
        guardians: Vec<MemberAddress>,
    },
    GuardiansRemoved {
        guardians: Vec<MemberAddress>,
    },
    TotalVotingWeightChanged {
        previous: Decimal,
        new: Decimal,
    },
}

impl MembershipEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MemberEnrolled { .. } => "member_enrolled",
            Self::MemberStatusChanged { .. } => "member_status_changed",
            Self::MemberApproved { .. } => "member_approved",
            Self::GuardiansAdded { .. } => "guardians_added",
            Self::GuardiansRemoved { .. } => "guardians_removed",
            Self::TotalVotingWeightChanged { .. } => "total_voting_weight_changed",
        }
    }
}

/// Receiver of [`MembershipEvent`]s.
pub trait EventSink {
    fn emit(&self, event: MembershipEvent);
}
