//! Membership registry: per-address records and the aggregate counters.
//!
//! Every status change updates the member record and both affected status
//! counters in the same call, so `Σ status_count == member_count` holds
//! after each operation.

use crate::error::GovernanceError;
use civic_store::{EventSink, Member, MemberMetadata, MembershipEvent, MembershipStore};
use civic_types::{MemberAddress, MembershipStatus};

#[derive(Clone, Copy)]
pub struct MembershipRegistry<'a> {
    store: &'a dyn MembershipStore,
    events: &'a dyn EventSink,
}

impl<'a> MembershipRegistry<'a> {
    pub fn new(store: &'a dyn MembershipStore, events: &'a dyn EventSink) -> Self {
        Self { store, events }
    }

    /// Fetch a member. A guardian flag without Electorate status reads as false.
    pub fn get(&self, address: &MemberAddress) -> Result<Option<Member>, GovernanceError> {
        Ok(self.store.get_member(address)?.map(Member::normalized))
    }

    /// Fetch a member that must exist.
    pub fn require(&self, address: &MemberAddress) -> Result<Member, GovernanceError> {
        self.get(address)?
            .ok_or_else(|| GovernanceError::NotFound(address.to_string()))
    }

    pub fn is_member(&self, address: &MemberAddress) -> Result<bool, GovernanceError> {
        Ok(self.store.has_member(address)?)
    }

    /// Create a `PendingApproval` record for a new address.
    pub fn enroll(&self, address: &MemberAddress) -> Result<Member, GovernanceError> {
        if self.is_member(address)? {
            return Err(GovernanceError::AlreadyEnrolled(address.to_string()));
        }

        let member = Member::pending(address.clone());
        let total = increment(self.store.member_count()?, "member count")?;
        let pending = increment(self.store.status_count(member.status)?, "pending count")?;

        self.store.put_member(&member)?;
        self.store.set_member_count(total)?;
        self.store.set_status_count(member.status, pending)?;

        tracing::info!(member = %address, "member enrolled");
        self.events.emit(MembershipEvent::MemberEnrolled {
            member: address.clone(),
        });
        Ok(member)
    }

    pub fn set_nickname(&self, address: &MemberAddress, nickname: &str) -> Result<(), GovernanceError> {
        if !self.is_member(address)? {
            return Err(GovernanceError::NotFound(address.to_string()));
        }
        self.store
            .put_metadata(address, MemberMetadata::Nickname, nickname)?;
        Ok(())
    }

    pub fn nickname(&self, address: &MemberAddress) -> Result<Option<String>, GovernanceError> {
        Ok(self.store.get_metadata(address, MemberMetadata::Nickname)?)
    }

    /// Move a member along the status transition table.
    ///
    /// `operator` is recorded on the emitted event as the initiating actor.
    pub fn transition_status(
        &self,
        address: &MemberAddress,
        status: MembershipStatus,
        operator: &str,
    ) -> Result<Member, GovernanceError> {
        let mut member = self.require(address)?;
        let previous = member.status;
        if !previous.can_transition_to(status) {
            return Err(GovernanceError::InvalidStateTransition {
                from: previous,
                to: status,
            });
        }

        let old_count = self.store.status_count(previous)?.checked_sub(1).ok_or_else(|| {
            GovernanceError::ConfigurationInvariantViolation(format!(
                "{previous} count is zero while {address} holds it"
            ))
        })?;
        let new_count = increment(self.store.status_count(status)?, "status count")?;

        member.status = status;
        self.store.put_member(&member)?;
        self.store.set_status_count(previous, old_count)?;
        self.store.set_status_count(status, new_count)?;

        tracing::info!(
            member = %address,
            from = %previous,
            to = %status,
            operator,
            "membership status changed"
        );
        self.events.emit(MembershipEvent::MemberStatusChanged {
            member: address.clone(),
            previous_status: previous,
            status,
            operator: operator.to_string(),
        });
        Ok(member)
    }

    /// Set or clear the guardian flag. Callers enforce the Electorate precondition.
    pub fn set_guardian_flag(
        &self,
        address: &MemberAddress,
        is_guardian: bool,
    ) -> Result<(), GovernanceError> {
        let mut member = self
            .store
            .get_member(address)?
            .ok_or_else(|| GovernanceError::NotFound(address.to_string()))?;
        member.is_guardian = is_guardian;
        self.store.put_member(&member)?;
        tracing::debug!(member = %address, is_guardian, "guardian flag updated");
        Ok(())
    }

    pub fn member_count(&self) -> Result<u64, GovernanceError> {
        Ok(self.store.member_count()?)
    }

    pub fn status_count(&self, status: MembershipStatus) -> Result<u64, GovernanceError> {
        Ok(self.store.status_count(status)?)
    }

    /// Verify that the per-status counters add up to the member count.
    pub fn check_counts(&self) -> Result<(), GovernanceError> {
        let mut sum: u64 = 0;
        for status in MembershipStatus::ALL {
            sum = sum.saturating_add(self.status_count(status)?);
        }
        let total = self.member_count()?;
        if sum != total {
            return Err(GovernanceError::ConfigurationInvariantViolation(format!(
                "status counts sum to {sum} but member count is {total}"
            )));
        }
        Ok(())
    }
}

fn increment(count: u64, what: &str) -> Result<u64, GovernanceError> {
    count.checked_add(1).ok_or_else(|| {
        GovernanceError::ConfigurationInvariantViolation(format!("{what} overflow"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_nullables::{NullEventSink, NullStore};

    fn addr(name: &str) -> MemberAddress {
        MemberAddress::new(format!("civ_{name}"))
    }

    #[test]
    fn enroll_creates_pending_record_and_bumps_counts() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);

        let member = registry.enroll(&addr("alice")).unwrap();
        assert_eq!(member.status, MembershipStatus::PendingApproval);
        assert!(!member.is_guardian);
        assert_eq!(registry.member_count().unwrap(), 1);
        assert_eq!(registry.status_count(MembershipStatus::PendingApproval).unwrap(), 1);
        assert_eq!(events.names(), vec!["member_enrolled"]);
        registry.check_counts().unwrap();
    }

    #[test]
    fn enroll_twice_fails() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        registry.enroll(&addr("alice")).unwrap();
        assert!(matches!(
            registry.enroll(&addr("alice")),
            Err(GovernanceError::AlreadyEnrolled(_))
        ));
        assert_eq!(registry.member_count().unwrap(), 1);
    }

    #[test]
    fn approval_moves_counts() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        registry.enroll(&addr("alice")).unwrap();
        registry.enroll(&addr("bob")).unwrap();

        let member = registry
            .transition_status(&addr("alice"), MembershipStatus::Electorate, "civ_g")
            .unwrap();
        assert_eq!(member.status, MembershipStatus::Electorate);
        assert_eq!(registry.status_count(MembershipStatus::PendingApproval).unwrap(), 1);
        assert_eq!(registry.status_count(MembershipStatus::Electorate).unwrap(), 1);
        registry.check_counts().unwrap();

        let last = events.events().pop().unwrap();
        assert_eq!(
            last,
            MembershipEvent::MemberStatusChanged {
                member: addr("alice"),
                previous_status: MembershipStatus::PendingApproval,
                status: MembershipStatus::Electorate,
                operator: "civ_g".to_string(),
            }
        );
    }

    #[test]
    fn disallowed_transitions_leave_state_untouched() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        registry.enroll(&addr("alice")).unwrap();
        registry
            .transition_status(&addr("alice"), MembershipStatus::Electorate, "op")
            .unwrap();

        let err = registry
            .transition_status(&addr("alice"), MembershipStatus::PendingApproval, "op")
            .unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InvalidStateTransition {
                from: MembershipStatus::Electorate,
                to: MembershipStatus::PendingApproval,
            }
        ));
        assert_eq!(registry.status_count(MembershipStatus::Electorate).unwrap(), 1);
        registry.check_counts().unwrap();
    }

    #[test]
    fn unset_record_can_only_go_to_pending() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        let a = addr("legacy");
        store
            .put_member(&Member {
                address: a.clone(),
                status: MembershipStatus::Unset,
                is_guardian: false,
            })
            .unwrap();
        store.set_member_count(1).unwrap();
        store.set_status_count(MembershipStatus::Unset, 1).unwrap();

        assert!(matches!(
            registry.transition_status(&a, MembershipStatus::Electorate, "op"),
            Err(GovernanceError::InvalidStateTransition { .. })
        ));
        registry
            .transition_status(&a, MembershipStatus::PendingApproval, "op")
            .unwrap();
        registry.check_counts().unwrap();
    }

    #[test]
    fn transition_of_unknown_member_is_not_found() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        assert!(matches!(
            registry.transition_status(&addr("ghost"), MembershipStatus::Electorate, "op"),
            Err(GovernanceError::NotFound(_))
        ));
    }

    #[test]
    fn stale_guardian_flag_is_normalized_on_read() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        registry.enroll(&addr("alice")).unwrap();
        registry.set_guardian_flag(&addr("alice"), true).unwrap();

        assert!(!registry.get(&addr("alice")).unwrap().unwrap().is_guardian);
        // The raw record still carries the flag.
        assert!(store.get_member(&addr("alice")).unwrap().unwrap().is_guardian);
    }

    #[test]
    fn guardian_flag_requires_record() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        assert!(matches!(
            registry.set_guardian_flag(&addr("ghost"), true),
            Err(GovernanceError::NotFound(_))
        ));
    }

    #[test]
    fn nickname_roundtrip() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        assert!(matches!(
            registry.set_nickname(&addr("alice"), "Al"),
            Err(GovernanceError::NotFound(_))
        ));
        registry.enroll(&addr("alice")).unwrap();
        registry.set_nickname(&addr("alice"), "Al").unwrap();
        assert_eq!(registry.nickname(&addr("alice")).unwrap().as_deref(), Some("Al"));
        assert_eq!(registry.nickname(&addr("bob")).unwrap(), None);
    }

    #[test]
    fn drifted_counter_is_fatal() {
        let store = NullStore::new();
        let events = NullEventSink::new();
        let registry = MembershipRegistry::new(&store, &events);
        registry.enroll(&addr("alice")).unwrap();
        store.set_status_count(MembershipStatus::PendingApproval, 0).unwrap();

        let err = registry
            .transition_status(&addr("alice"), MembershipStatus::Electorate, "op")
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(registry.check_counts().unwrap_err().is_fatal());
    }
}
