//! Membership status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The membership status of an enrolled address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    /// No status has been assigned.
    Unset,
    /// Enrolled; waiting for a guardian to approve.
    PendingApproval,
    /// Approved; may vote.
    Electorate,
}

impl MembershipStatus {
    /// All statuses, in counter-key order.
    pub const ALL: [MembershipStatus; 3] = [Self::Unset, Self::PendingApproval, Self::Electorate];

    /// Whether the fixed transition table allows moving from `self` to `next`.
    ///
    /// Only `Unset → PendingApproval` and `PendingApproval → Electorate` exist.
    pub fn can_transition_to(&self, next: MembershipStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unset, Self::PendingApproval) | (Self::PendingApproval, Self::Electorate)
        )
    }

    /// Whether a member with this status may vote.
    pub fn can_vote(&self) -> bool {
        matches!(self, Self::Electorate)
    }

    /// Stable one-byte code used in storage keys.
    pub fn code(&self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::PendingApproval => 1,
            Self::Electorate => 2,
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unset => "unset",
            Self::PendingApproval => "pending_approval",
            Self::Electorate => "electorate",
        };
        f.write_str(name)
    }
}
