//! Voting power allocation between the guardian and member tiers.
//!
//! The guardian tier shares `total_weight`, the member tier shares the rest.
//! Within a tier every ballot carries identical power.

use crate::error::GovernanceError;
use civic_types::decimal::{is_fraction, quo_int_trunc};
use civic_types::Decimal;

/// Per-ballot power of each tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VotingPower {
    /// Power of one non-guardian Electorate ballot.
    pub member: Decimal,
    /// Power of one guardian ballot.
    pub guardian: Decimal,
}

pub struct VotingPowerAllocator;

impl VotingPowerAllocator {
    /// Split the voting power between `num_guardians` guardians and the
    /// remaining `num_electorate - num_guardians` members.
    ///
    /// # Panics
    /// Panics if `total_weight` is outside `[0, 1]`. The weight only reaches
    /// storage through the validated setter, so this means corrupted state.
    pub fn allocate(
        num_electorate: u64,
        num_guardians: u64,
        total_weight: Decimal,
    ) -> Result<VotingPower, GovernanceError> {
        assert!(
            is_fraction(total_weight),
            "invalid total voting weight - must be between 0 and 1, got {total_weight}"
        );

        if num_guardians == 0 {
            return Err(GovernanceError::ConfigurationInvariantViolation(
                "no guardians to receive the guardian weight budget".to_string(),
            ));
        }
        let num_members = num_electorate.checked_sub(num_guardians).ok_or_else(|| {
            GovernanceError::ConfigurationInvariantViolation(format!(
                "{num_guardians} guardians but only {num_electorate} electorate members"
            ))
        })?;

        let member = if num_members == 0 {
            Decimal::ZERO
        } else {
            quo_int_trunc(Decimal::ONE - total_weight, num_members)?
        };
        let guardian = quo_int_trunc(total_weight, num_guardians)?;

        Ok(VotingPower { member, guardian })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn splits_budget_between_tiers() {
        let power = VotingPowerAllocator::allocate(10, 2, dec!(0.4)).unwrap();
        assert_eq!(power.guardian, dec!(0.2));
        assert_eq!(power.member, dec!(0.075));
    }

    #[test]
    fn worked_example_powers() {
        let power = VotingPowerAllocator::allocate(10, 2, dec!(0.5)).unwrap();
        assert_eq!(power.guardian, dec!(0.25));
        assert_eq!(power.member, dec!(0.0625));
    }

    #[test]
    fn all_guardians_leaves_members_with_nothing() {
        let power = VotingPowerAllocator::allocate(3, 3, dec!(0.6)).unwrap();
        assert_eq!(power.member, Decimal::ZERO);
        assert_eq!(power.guardian, dec!(0.2));
    }

    #[test]
    fn uneven_split_truncates() {
        let power = VotingPowerAllocator::allocate(4, 3, Decimal::ONE).unwrap();
        assert_eq!(power.guardian, dec!(0.333333333333333333));
        assert_eq!(power.member, Decimal::ZERO);
    }

    #[test]
    fn zero_guardians_is_a_configuration_error() {
        let err = VotingPowerAllocator::allocate(5, 0, dec!(0.5)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn more_guardians_than_electorate_is_a_configuration_error() {
        let err = VotingPowerAllocator::allocate(1, 2, dec!(0.5)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    #[should_panic(expected = "invalid total voting weight")]
    fn weight_above_one_panics() {
        let _ = VotingPowerAllocator::allocate(10, 2, dec!(1.5));
    }
}
