//! Tally parameters supplied by the host governance subsystem.
//!
//! All fractions are decimals in `[0, 1]` of the total voting power.

use crate::decimal::is_fraction;
use crate::error::CivicError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters that decide whether a tallied proposal passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyParams {
    /// Minimum total weighted power that must be cast.
    #[serde(default = "default_quorum")]
    pub quorum: Decimal,

    /// Weighted yes fraction that must be exceeded to pass.
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,

    /// Weighted no-with-veto fraction above which the proposal is vetoed.
    #[serde(default = "default_veto_threshold")]
    pub veto_threshold: Decimal,

    /// Burn the deposit when quorum is not reached.
    #[serde(default)]
    pub burn_vote_quorum: bool,

    /// Burn the deposit when the proposal is vetoed.
    #[serde(default)]
    pub burn_vote_veto: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_quorum() -> Decimal {
    Decimal::new(334, 3)
}

fn default_threshold() -> Decimal {
    Decimal::new(5, 1)
}

fn default_veto_threshold() -> Decimal {
    Decimal::new(334, 3)
}

impl TallyParams {
    /// Check that every fraction lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), CivicError> {
        for (name, value) in [
            ("quorum", self.quorum),
            ("threshold", self.threshold),
            ("veto_threshold", self.veto_threshold),
        ] {
            if !is_fraction(value) {
                return Err(CivicError::InvalidParams(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for TallyParams {
    fn default() -> Self {
        Self {
            quorum: default_quorum(),
            threshold: default_threshold(),
            veto_threshold: default_veto_threshold(),
            burn_vote_quorum: false,
            burn_vote_veto: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_are_valid() {
        let params = TallyParams::default();
        assert_eq!(params.quorum, dec!(0.334));
        assert_eq!(params.threshold, dec!(0.5));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_fraction_above_one() {
        let params = TallyParams {
            threshold: dec!(1.5),
            ..TallyParams::default()
        };
        assert!(matches!(params.validate(), Err(CivicError::InvalidParams(_))));
    }
}
