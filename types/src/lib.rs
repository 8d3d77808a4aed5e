//! Fundamental types for the civic membership workspace.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! member addresses, proposal ids, the membership status state machine, ballots,
//! tally parameters and the deterministic decimal helpers.

pub mod address;
pub mod decimal;
pub mod error;
pub mod params;
pub mod proposal;
pub mod state;
pub mod vote;

pub use address::MemberAddress;
pub use error::CivicError;
pub use params::TallyParams;
pub use proposal::ProposalId;
pub use rust_decimal::Decimal;
pub use state::MembershipStatus;
pub use vote::{Vote, VoteOption, WeightedVoteOption};
