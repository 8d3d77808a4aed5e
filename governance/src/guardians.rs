//! Guardian set: the Electorate members holding the guardian tier's weight budget.
//!
//! The per-member guardian flag is authoritative. The list kept in
//! [`DemocracySettings`] is a projection of it and is re-checked on every read.

use crate::error::GovernanceError;
use crate::registry::MembershipRegistry;
use civic_store::{DemocracySettings, GuardianSettingsStore};
use civic_types::decimal::is_positive_fraction;
use civic_types::{Decimal, MemberAddress, MembershipStatus};

#[derive(Clone, Copy)]
pub struct GuardianSet<'a> {
    registry: MembershipRegistry<'a>,
    settings: &'a dyn GuardianSettingsStore,
}

impl<'a> GuardianSet<'a> {
    pub fn new(registry: MembershipRegistry<'a>, settings: &'a dyn GuardianSettingsStore) -> Self {
        Self { registry, settings }
    }

    /// The settings singleton. Missing settings mean genesis never ran.
    pub fn settings(&self) -> Result<DemocracySettings, GovernanceError> {
        self.settings.get_settings()?.ok_or_else(|| {
            GovernanceError::ConfigurationInvariantViolation(
                "democracy settings have not been initialized".to_string(),
            )
        })
    }

    pub fn is_initialized(&self) -> Result<bool, GovernanceError> {
        Ok(self.settings.get_settings()?.is_some())
    }

    /// Write the initial settings singleton with an empty guardian list.
    pub fn initialize(&self, total_voting_weight: Decimal) -> Result<(), GovernanceError> {
        validate_weight(total_voting_weight)?;
        self.settings
            .put_settings(&DemocracySettings::new(total_voting_weight))?;
        Ok(())
    }

    /// Whether `address` is an Electorate member carrying the guardian flag.
    pub fn is_guardian(&self, address: &MemberAddress) -> Result<bool, GovernanceError> {
        Ok(self
            .registry
            .get(address)?
            .is_some_and(|m| m.is_guardian && m.status == MembershipStatus::Electorate))
    }

    /// Guardians in insertion order, keeping only entries the member records confirm.
    pub fn guardians(&self) -> Result<Vec<MemberAddress>, GovernanceError> {
        let mut confirmed = Vec::new();
        for address in self.settings()?.guardians {
            if self.is_guardian(&address)? {
                confirmed.push(address);
            } else {
                tracing::warn!(guardian = %address, "guardian list entry not backed by member record");
            }
        }
        Ok(confirmed)
    }

    pub fn total_voting_weight(&self) -> Result<Decimal, GovernanceError> {
        Ok(self.settings()?.total_voting_weight)
    }

    /// Replace the weight budget; returns the previous value.
    pub fn set_total_voting_weight(&self, weight: Decimal) -> Result<Decimal, GovernanceError> {
        validate_weight(weight)?;
        let mut settings = self.settings()?;
        let previous = settings.total_voting_weight;
        settings.total_voting_weight = weight;
        self.settings.put_settings(&settings)?;
        Ok(previous)
    }

    /// Flag each address as guardian and append it to the cached list.
    ///
    /// Callers validate the batch first; this only writes.
    pub fn attach(&self, addresses: &[MemberAddress]) -> Result<(), GovernanceError> {
        let mut settings = self.settings()?;
        for address in addresses {
            self.registry.set_guardian_flag(address, true)?;
        }
        for address in addresses {
            if !settings.contains(address) {
                settings.guardians.push(address.clone());
            }
        }
        self.settings.put_settings(&settings)?;
        Ok(())
    }

    /// Clear the guardian flag of each address and drop it from the cached list.
    pub fn detach(&self, addresses: &[MemberAddress]) -> Result<(), GovernanceError> {
        let mut settings = self.settings()?;
        for address in addresses {
            self.registry.set_guardian_flag(address, false)?;
        }
        settings.guardians.retain(|g| !addresses.contains(g));
        self.settings.put_settings(&settings)?;
        Ok(())
    }

    /// Rewrite the cached list so it matches the member records.
    ///
    /// Returns the entries that were dropped.
    pub fn reconcile(&self) -> Result<Vec<MemberAddress>, GovernanceError> {
        let mut settings = self.settings()?;
        let confirmed = self.guardians()?;
        let dropped: Vec<MemberAddress> = settings
            .guardians
            .iter()
            .filter(|g| !confirmed.contains(g))
            .cloned()
            .collect();
        if !dropped.is_empty() {
            settings.guardians = confirmed;
            self.settings.put_settings(&settings)?;
            tracing::info!(dropped = dropped.len(), "guardian list reconciled");
        }
        Ok(dropped)
    }
}

fn validate_weight(weight: Decimal) -> Result<(), GovernanceError> {
    if !is_positive_fraction(weight) {
        return Err(GovernanceError::InvalidRequest(format!(
            "total voting weight must be within (0, 1], got {weight}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_nullables::{NullEventSink, NullStore};
    use rust_decimal_macros::dec;

    fn addr(name: &str) -> MemberAddress {
        MemberAddress::new(format!("civ_{name}"))
    }

    fn electorate(registry: &MembershipRegistry<'_>, name: &str) -> MemberAddress {
        let a = addr(name);
        registry.enroll(&a).unwrap();
        registry
            .transition_status(&a, MembershipStatus::Electorate, "genesis")
            .unwrap();
        a
    }

    #[test]
    fn uninitialized_settings_are_a_configuration_error() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let set = GuardianSet::new(MembershipRegistry::new(&store, &events), &store);
        assert!(set.settings().unwrap_err().is_fatal());
        assert!(!set.is_initialized().unwrap());
    }

    #[test]
    fn attach_and_detach_keep_flags_and_list_together() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        let set = GuardianSet::new(registry, &store);
        set.initialize(dec!(0.5)).unwrap();
        let a = electorate(&registry, "a");
        let b = electorate(&registry, "b");

        set.attach(&[a.clone(), b.clone()]).unwrap();
        assert!(set.is_guardian(&a).unwrap());
        assert_eq!(set.guardians().unwrap(), vec![a.clone(), b.clone()]);

        set.detach(&[a.clone()]).unwrap();
        assert!(!set.is_guardian(&a).unwrap());
        assert_eq!(set.guardians().unwrap(), vec![b]);
    }

    #[test]
    fn flag_without_electorate_status_is_not_a_guardian() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        let set = GuardianSet::new(registry, &store);
        set.initialize(dec!(0.5)).unwrap();
        let p = addr("pending");
        registry.enroll(&p).unwrap();
        set.attach(&[p.clone()]).unwrap();

        assert!(!set.is_guardian(&p).unwrap());
        assert!(set.guardians().unwrap().is_empty());
        assert_eq!(set.reconcile().unwrap(), vec![p]);
        assert!(set.settings().unwrap().guardians.is_empty());
    }

    #[test]
    fn weight_setter_validates_range() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let set = GuardianSet::new(MembershipRegistry::new(&store, &events), &store);
        set.initialize(dec!(0.5)).unwrap();

        assert_eq!(set.set_total_voting_weight(dec!(0.4)).unwrap(), dec!(0.5));
        assert_eq!(set.total_voting_weight().unwrap(), dec!(0.4));
        assert!(matches!(
            set.set_total_voting_weight(Decimal::ZERO),
            Err(GovernanceError::InvalidRequest(_))
        ));
        assert!(matches!(
            set.set_total_voting_weight(dec!(1.01)),
            Err(GovernanceError::InvalidRequest(_))
        ));
        assert!(set.set_total_voting_weight(Decimal::ONE).is_ok());
        assert!(matches!(
            set.initialize(dec!(2)),
            Err(GovernanceError::InvalidRequest(_))
        ));
    }
}
