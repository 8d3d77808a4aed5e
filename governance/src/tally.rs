//! Tally engine: turns ballots into a pass / fail / veto decision.
//!
//! Decision order: quorum, abstain-only, veto, approval. Every comparison is
//! made on truncated fixed-precision decimals; the integer tally result is
//! derived afterwards purely for reporting.

use crate::collector::{CollectionReport, TierCounts, VoteCollector};
use crate::error::GovernanceError;
use crate::guardians::GuardianSet;
use crate::power::{VotingPower, VotingPowerAllocator};
use crate::registry::MembershipRegistry;
use civic_store::{GovParamsProvider, VoteSource};
use civic_types::decimal::{decimal_places, mul_int, mul_trunc, quo_int_trunc, scale_to_integer};
use civic_types::{Decimal, MembershipStatus, ProposalId, TallyParams, VoteOption};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a tally ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyDecision {
    QuorumNotMet,
    AllAbstained,
    Vetoed,
    Rejected,
    Passed,
}

impl fmt::Display for TallyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QuorumNotMet => "quorum_not_met",
            Self::AllAbstained => "all_abstained",
            Self::Vetoed => "vetoed",
            Self::Rejected => "rejected",
            Self::Passed => "passed",
        };
        f.write_str(name)
    }
}

/// Integer-scaled weighted power per option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub yes: u128,
    pub abstain: u128,
    pub no: u128,
    pub no_with_veto: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyOutcome {
    pub passes: bool,
    pub burn_deposit: bool,
    pub result: TallyResult,
    pub decision: TallyDecision,
    /// Combined weighted power per option, before scaling.
    pub combined: BTreeMap<VoteOption, Decimal>,
    pub total_power: Decimal,
}

#[derive(Clone, Copy)]
pub struct TallyEngine<'a> {
    registry: MembershipRegistry<'a>,
    guardians: GuardianSet<'a>,
    votes: &'a dyn VoteSource,
    params: &'a dyn GovParamsProvider,
}

impl<'a> TallyEngine<'a> {
    pub fn new(
        registry: MembershipRegistry<'a>,
        guardians: GuardianSet<'a>,
        votes: &'a dyn VoteSource,
        params: &'a dyn GovParamsProvider,
    ) -> Self {
        Self {
            registry,
            guardians,
            votes,
            params,
        }
    }

    /// Tally every ballot cast on `proposal`.
    pub fn tally(&self, proposal: ProposalId) -> Result<TallyOutcome, GovernanceError> {
        let num_electorate = self.registry.status_count(MembershipStatus::Electorate)?;
        let num_guardians = self.guardians.guardians()?.len() as u64;
        let weight = self.guardians.total_voting_weight()?;
        let power = VotingPowerAllocator::allocate(num_electorate, num_guardians, weight)?;

        let report = VoteCollector::new(self.registry, self.votes).collect(proposal)?;
        let params = self.params.tally_params(proposal)?;
        let outcome = decide(power, &report, &params)?;

        tracing::info!(
            proposal = %proposal,
            decision = %outcome.decision,
            passes = outcome.passes,
            burn_deposit = outcome.burn_deposit,
            total_power = %outcome.total_power,
            "proposal tallied"
        );
        Ok(outcome)
    }
}

/// Apply the decision procedure to collected counts.
pub fn decide(
    power: VotingPower,
    report: &CollectionReport,
    params: &TallyParams,
) -> Result<TallyOutcome, GovernanceError> {
    let guardians = &report.guardians;
    let members = &report.members;

    let mut combined = BTreeMap::new();
    let mut total_power = Decimal::ZERO;
    for option in VoteOption::RECOGNIZED {
        let weighted = mul_int(power.guardian, guardians.get(option))?
            + mul_int(power.member, members.get(option))?;
        total_power += weighted;
        combined.insert(option, weighted);
    }
    let result = scale_results(&combined)?;
    let outcome = |decision: TallyDecision, passes: bool, burn_deposit: bool| TallyOutcome {
        passes,
        burn_deposit,
        result,
        decision,
        combined: combined.clone(),
        total_power,
    };

    if total_power < params.quorum {
        return Ok(outcome(
            TallyDecision::QuorumNotMet,
            false,
            params.burn_vote_quorum,
        ));
    }

    let abstain = combined
        .get(&VoteOption::Abstain)
        .copied()
        .unwrap_or(Decimal::ZERO);
    if (total_power - abstain).is_zero() {
        return Ok(outcome(TallyDecision::AllAbstained, false, false));
    }

    let veto = tier_veto(guardians, power.guardian)? + tier_veto(members, power.member)?;
    if veto > params.veto_threshold {
        tracing::debug!(veto = %veto, threshold = %params.veto_threshold, "veto threshold exceeded");
        return Ok(outcome(TallyDecision::Vetoed, false, params.burn_vote_veto));
    }

    let yes = tier_yes(guardians, power.guardian)? + tier_yes(members, power.member)?;
    tracing::debug!(yes = %yes, threshold = %params.threshold, "weighted yes fraction");
    if yes > params.threshold {
        return Ok(outcome(TallyDecision::Passed, true, false));
    }
    Ok(outcome(TallyDecision::Rejected, false, false))
}

/// `NoWithVeto / (total - abstain) * power`, zero for a tier with no non-abstain ballots.
fn tier_veto(counts: &TierCounts, power: Decimal) -> Result<Decimal, GovernanceError> {
    let non_abstain = counts.non_abstain();
    if counts.total() == 0 || non_abstain == 0 {
        return Ok(Decimal::ZERO);
    }
    let fraction = quo_int_trunc(Decimal::from(counts.get(VoteOption::NoWithVeto)), non_abstain)?;
    Ok(mul_trunc(fraction, power)?)
}

/// `Yes / total * power`, zero for a tier with no ballots.
fn tier_yes(counts: &TierCounts, power: Decimal) -> Result<Decimal, GovernanceError> {
    let total = counts.total();
    if total == 0 {
        return Ok(Decimal::ZERO);
    }
    let fraction = quo_int_trunc(Decimal::from(counts.get(VoteOption::Yes)), total)?;
    Ok(mul_trunc(fraction, power)?)
}

/// Scale every value by `10^d`, `d` being the most significant fractional
/// digits among them, and truncate to integers. Proportions are preserved.
pub fn scale_results(combined: &BTreeMap<VoteOption, Decimal>) -> Result<TallyResult, GovernanceError> {
    let places = combined.values().copied().map(decimal_places).max().unwrap_or(0);
    let scaled = |option: VoteOption| -> Result<u128, GovernanceError> {
        let value = combined.get(&option).copied().unwrap_or(Decimal::ZERO);
        Ok(scale_to_integer(value, places)?)
    };
    Ok(TallyResult {
        yes: scaled(VoteOption::Yes)?,
        abstain: scaled(VoteOption::Abstain)?,
        no: scaled(VoteOption::No)?,
        no_with_veto: scaled(VoteOption::NoWithVeto)?,
    })
}
