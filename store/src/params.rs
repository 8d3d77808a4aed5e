//! Governance parameter lookup.

use crate::StoreError;
use civic_types::{ProposalId, TallyParams};

/// Supplies the tally parameters that apply to a proposal.
pub trait GovParamsProvider {
    fn tally_params(&self, proposal: ProposalId) -> Result<TallyParams, StoreError>;
}

/// A fixed parameter set applies to every proposal.
impl GovParamsProvider for TallyParams {
    fn tally_params(&self, _proposal: ProposalId) -> Result<TallyParams, StoreError> {
        Ok(self.clone())
    }
}
