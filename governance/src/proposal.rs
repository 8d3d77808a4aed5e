//! Membership proposals and their stateless validation.

use crate::error::GovernanceError;
use civic_types::decimal::is_positive_fraction;
use civic_types::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PROPOSAL_TYPE_ADD_GUARDIANS: &str = "AddGuardians";
pub const PROPOSAL_TYPE_REMOVE_GUARDIANS: &str = "RemoveGuardians";
pub const PROPOSAL_TYPE_UPDATE_TOTAL_VOTING_WEIGHT: &str = "UpdateTotalVotingWeight";

/// Promote Electorate members to guardians.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddGuardiansProposal {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub guardians_to_add: Vec<String>,
}

/// Demote guardians back to ordinary members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveGuardiansProposal {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub guardians_to_remove: Vec<String>,
}

/// Change the guardian tier's share of total voting power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTotalVotingWeightProposal {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub new_total_voting_weight: Decimal,
}

/// Every proposal kind this module executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipProposal {
    AddGuardians(AddGuardiansProposal),
    RemoveGuardians(RemoveGuardiansProposal),
    UpdateTotalVotingWeight(UpdateTotalVotingWeightProposal),
}

impl MembershipProposal {
    pub fn proposal_type(&self) -> &'static str {
        match self {
            Self::AddGuardians(_) => PROPOSAL_TYPE_ADD_GUARDIANS,
            Self::RemoveGuardians(_) => PROPOSAL_TYPE_REMOVE_GUARDIANS,
            Self::UpdateTotalVotingWeight(_) => PROPOSAL_TYPE_UPDATE_TOTAL_VOTING_WEIGHT,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::AddGuardians(p) => &p.title,
            Self::RemoveGuardians(p) => &p.title,
            Self::UpdateTotalVotingWeight(p) => &p.title,
        }
    }

    pub fn creator(&self) -> &str {
        match self {
            Self::AddGuardians(p) => &p.creator,
            Self::RemoveGuardians(p) => &p.creator,
            Self::UpdateTotalVotingWeight(p) => &p.creator,
        }
    }

    /// Checks that need no state: run at submission, before any vote.
    pub fn validate_basic(&self) -> Result<(), GovernanceError> {
        if self.creator().is_empty() {
            return Err(GovernanceError::InvalidAddress(
                "creator address cannot be empty".to_string(),
            ));
        }
        match self {
            Self::AddGuardians(p) if p.guardians_to_add.is_empty() => Err(
                GovernanceError::InvalidRequest("no guardians to add".to_string()),
            ),
            Self::RemoveGuardians(p) if p.guardians_to_remove.is_empty() => Err(
                GovernanceError::InvalidRequest("no guardians to remove".to_string()),
            ),
            Self::UpdateTotalVotingWeight(p) if !is_positive_fraction(p.new_total_voting_weight) => {
                Err(GovernanceError::InvalidRequest(format!(
                    "total voting weight must be within (0, 1], got {}",
                    p.new_total_voting_weight
                )))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AddGuardiansProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Add Guardians Proposal:")?;
        writeln!(f, "  Title:              {}", self.title)?;
        writeln!(f, "  Description:        {}", self.description)?;
        writeln!(f, "  Guardians to Add:   {}", self.guardians_to_add.join(", "))
    }
}

impl fmt::Display for RemoveGuardiansProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Remove Guardians Proposal:")?;
        writeln!(f, "  Title:               {}", self.title)?;
        writeln!(f, "  Description:         {}", self.description)?;
        writeln!(f, "  Guardians to Remove: {}", self.guardians_to_remove.join(", "))
    }
}

impl fmt::Display for UpdateTotalVotingWeightProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Update Total Voting Weight Proposal:")?;
        writeln!(f, "  Title:                   {}", self.title)?;
        writeln!(f, "  Description:             {}", self.description)?;
        writeln!(f, "  New Total Voting Weight: {}", self.new_total_voting_weight)
    }
}

impl fmt::Display for MembershipProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddGuardians(p) => fmt::Display::fmt(p, f),
            Self::RemoveGuardians(p) => fmt::Display::fmt(p, f),
            Self::UpdateTotalVotingWeight(p) => fmt::Display::fmt(p, f),
        }
    }
}
