//! Two-tier membership governance.
//!
//! A permissioned electorate is split into guardians and ordinary members.
//! Each tier holds a fixed share of voting power; guardians share the
//! configured total voting weight and members share the rest.
//!
//! Tallying runs: quorum → abstain-only → veto → approval, on decimals
//! truncated at 18 fractional digits so every replica reaches the same
//! decision. Ballots are visited in address order.

pub mod collector;
pub mod engine;
pub mod error;
pub mod events;
pub mod genesis;
pub mod guardians;
pub mod handlers;
pub mod power;
pub mod proposal;
pub mod registry;
pub mod tally;

pub use collector::{CollectionReport, DiscardedBallot, TierCounts, VoteCollector};
pub use engine::{MembershipEngine, GENESIS_OPERATOR};
pub use error::GovernanceError;
pub use events::TracingEventSink;
pub use genesis::{GenesisConfig, GenesisMember};
pub use guardians::GuardianSet;
pub use handlers::ProposalLifecycleHandlers;
pub use power::{VotingPower, VotingPowerAllocator};
pub use proposal::{
    AddGuardiansProposal, MembershipProposal, RemoveGuardiansProposal,
    UpdateTotalVotingWeightProposal,
};
pub use registry::MembershipRegistry;
pub use tally::{TallyDecision, TallyEngine, TallyOutcome, TallyResult};
