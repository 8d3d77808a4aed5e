//! The democracy settings singleton.

use crate::StoreError;
use civic_types::{Decimal, MemberAddress};
use serde::{Deserialize, Serialize};

/// Guardian bookkeeping and the guardian tier's weight budget.
///
/// `guardians` is a cached projection of the per-member guardian flags and is
/// always written together with them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemocracySettings {
    /// Guardians in the order they were added.
    pub guardians: Vec<MemberAddress>,
    /// Fraction `(0, 1]` of voting power held by the guardian tier.
    pub total_voting_weight: Decimal,
}

impl DemocracySettings {
    pub fn new(total_voting_weight: Decimal) -> Self {
        Self {
            guardians: Vec::new(),
            total_voting_weight,
        }
    }

    pub fn contains(&self, address: &MemberAddress) -> bool {
        self.guardians.iter().any(|g| g == address)
    }
}

pub trait GuardianSettingsStore {
    /// `None` until genesis has written the singleton.
    fn get_settings(&self) -> Result<Option<DemocracySettings>, StoreError>;
    fn put_settings(&self, settings: &DemocracySettings) -> Result<(), StoreError>;
}
