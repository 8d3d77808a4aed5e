//! Abstract storage and collaborator traits for civic membership governance.
//!
//! Every backend (the host chain's key-value store, in-memory for testing)
//! implements these traits. The governance core depends only on the traits.

pub mod error;
pub mod events;
pub mod keys;
pub mod member;
pub mod params;
pub mod settings;
pub mod vote;

pub use error::StoreError;
pub use events::{EventSink, MembershipEvent};
pub use member::{Member, MemberMetadata, MembershipStore};
pub use params::GovParamsProvider;
pub use settings::{DemocracySettings, GuardianSettingsStore};
pub use vote::VoteSource;
