//! Membership engine: the operations the surrounding governance subsystem calls.
//!
//! The engine owns no state. It borrows the host's stores for the duration
//! of one state transition and wires the registry, guardian set, collector,
//! tally and proposal handlers together over them.

use crate::error::GovernanceError;
use crate::genesis::GenesisConfig;
use crate::guardians::GuardianSet;
use crate::handlers::ProposalLifecycleHandlers;
use crate::proposal::{
    AddGuardiansProposal, MembershipProposal, RemoveGuardiansProposal,
    UpdateTotalVotingWeightProposal,
};
use crate::registry::MembershipRegistry;
use crate::tally::{TallyEngine, TallyOutcome};
use civic_store::{
    EventSink, GovParamsProvider, GuardianSettingsStore, Member, MembershipEvent, MembershipStore,
    VoteSource,
};
use civic_types::{MemberAddress, MembershipStatus, ProposalId};

/// Actor recorded on status changes made while applying genesis.
pub const GENESIS_OPERATOR: &str = "genesis";

#[derive(Clone, Copy)]
pub struct MembershipEngine<'a> {
    settings: &'a dyn GuardianSettingsStore,
    votes: &'a dyn VoteSource,
    params: &'a dyn GovParamsProvider,
    events: &'a dyn EventSink,
    registry: MembershipRegistry<'a>,
}

impl<'a> MembershipEngine<'a> {
    pub fn new(
        membership: &'a dyn MembershipStore,
        settings: &'a dyn GuardianSettingsStore,
        votes: &'a dyn VoteSource,
        params: &'a dyn GovParamsProvider,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            settings,
            votes,
            params,
            events,
            registry: MembershipRegistry::new(membership, events),
        }
    }

    /// Build an engine over a single backend implementing every store trait.
    pub fn with_store<S>(
        store: &'a S,
        params: &'a dyn GovParamsProvider,
        events: &'a dyn EventSink,
    ) -> Self
    where
        S: MembershipStore + GuardianSettingsStore + VoteSource,
    {
        Self::new(store, store, store, params, events)
    }

    pub fn registry(&self) -> MembershipRegistry<'a> {
        self.registry
    }

    pub fn guardians(&self) -> GuardianSet<'a> {
        GuardianSet::new(self.registry, self.settings)
    }

    fn handlers(&self) -> ProposalLifecycleHandlers<'a> {
        ProposalLifecycleHandlers::new(self.registry, self.guardians(), self.events)
    }

    /// Enroll a new address as `PendingApproval`, optionally with a nickname.
    pub fn enroll(
        &self,
        address: &str,
        nickname: Option<&str>,
    ) -> Result<Member, GovernanceError> {
        let address = MemberAddress::parse(address)?;
        let member = self.registry.enroll(&address)?;
        if let Some(nickname) = nickname.filter(|n| !n.is_empty()) {
            self.registry.set_nickname(&address, nickname)?;
        }
        Ok(member)
    }

    /// A guardian admits a pending member to the electorate.
    pub fn approve(&self, approver: &str, member: &str) -> Result<Member, GovernanceError> {
        let approver = MemberAddress::parse(approver)?;
        let member = MemberAddress::parse(member)?;
        if !self.guardians().is_guardian(&approver)? {
            return Err(GovernanceError::Unauthorized(format!(
                "approver is not a guardian: {approver}"
            )));
        }

        let approved =
            self.registry
                .transition_status(&member, MembershipStatus::Electorate, approver.as_str())?;
        self.events.emit(MembershipEvent::MemberApproved {
            member,
            approver,
        });
        Ok(approved)
    }

    pub fn tally(&self, proposal: ProposalId) -> Result<TallyOutcome, GovernanceError> {
        TallyEngine::new(self.registry, self.guardians(), self.votes, self.params).tally(proposal)
    }

    pub fn apply_proposal(&self, proposal: &MembershipProposal) -> Result<(), GovernanceError> {
        self.handlers().apply(proposal)
    }

    pub fn apply_add_guardians_proposal(
        &self,
        proposal: &AddGuardiansProposal,
    ) -> Result<Vec<MemberAddress>, GovernanceError> {
        self.handlers().add_guardians(proposal)
    }

    pub fn apply_remove_guardians_proposal(
        &self,
        proposal: &RemoveGuardiansProposal,
    ) -> Result<Vec<MemberAddress>, GovernanceError> {
        self.handlers().remove_guardians(proposal)
    }

    pub fn apply_update_weight_proposal(
        &self,
        proposal: &UpdateTotalVotingWeightProposal,
    ) -> Result<(), GovernanceError> {
        self.handlers().update_total_voting_weight(proposal)
    }

    /// Seed the electorate, guardians and weight budget. Runs once.
    pub fn init_genesis(&self, config: &GenesisConfig) -> Result<(), GovernanceError> {
        config.validate()?;
        let guardians = self.guardians();
        if guardians.is_initialized()? {
            return Err(GovernanceError::InvalidRequest(
                "genesis has already been applied".to_string(),
            ));
        }
        guardians.initialize(config.total_voting_weight)?;

        let mut founding = Vec::with_capacity(config.guardians.len());
        for entry in config.guardians.iter().chain(&config.members) {
            let member = self.enroll(&entry.address, entry.nickname.as_deref())?;
            self.registry.transition_status(
                &member.address,
                MembershipStatus::Electorate,
                GENESIS_OPERATOR,
            )?;
            if founding.len() < config.guardians.len() {
                founding.push(member.address);
            }
        }
        guardians.attach(&founding)?;

        tracing::info!(
            guardians = founding.len(),
            members = config.members.len(),
            total_voting_weight = %config.total_voting_weight,
            "genesis applied"
        );
        Ok(())
    }
}
