//! Genesis configuration with TOML file support.
//!
//! A [`GenesisConfig`] seeds the electorate, the initial guardians and the
//! guardian weight budget. It is applied once by
//! [`MembershipEngine::init_genesis`](crate::MembershipEngine::init_genesis).

use crate::error::GovernanceError;
use civic_types::decimal::is_positive_fraction;
use civic_types::{Decimal, MemberAddress, TallyParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Initial membership state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Fraction `(0, 1]` of voting power held by the guardian tier.
    #[serde(default = "default_total_voting_weight")]
    pub total_voting_weight: Decimal,

    /// Founding guardians. At least one is required.
    #[serde(default)]
    pub guardians: Vec<GenesisMember>,

    /// Ordinary Electorate members present at genesis.
    #[serde(default)]
    pub members: Vec<GenesisMember>,

    #[serde(default)]
    pub tally: TallyParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisMember {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl GenesisMember {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }
}

fn default_total_voting_weight() -> Decimal {
    Decimal::new(5, 1)
}

impl GenesisConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, GovernanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Reject configurations that would start the chain in a broken state.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if !is_positive_fraction(self.total_voting_weight) {
            return Err(GovernanceError::Config(format!(
                "total_voting_weight must be within (0, 1], got {}",
                self.total_voting_weight
            )));
        }
        if self.guardians.is_empty() {
            return Err(GovernanceError::Config(
                "at least one guardian is required".to_string(),
            ));
        }
        self.tally
            .validate()
            .map_err(|e| GovernanceError::Config(e.to_string()))?;

        let mut seen = BTreeSet::new();
        for entry in self.guardians.iter().chain(&self.members) {
            let address = MemberAddress::parse(&entry.address)
                .map_err(|e| GovernanceError::Config(e.to_string()))?;
            if !seen.insert(address) {
                return Err(GovernanceError::Config(format!(
                    "address listed twice: {}",
                    entry.address
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
        total_voting_weight = "0.4"

        [[guardians]]
        address = "civ_alice"
        nickname = "Alice"

        [[guardians]]
        address = "civ_bob"

        [[members]]
        address = "civ_carol"

        [tally]
        quorum = "0.25"
        burn_vote_veto = true
    "#;

    #[test]
    fn parses_sample() {
        let config = GenesisConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.total_voting_weight, dec!(0.4));
        assert_eq!(config.guardians.len(), 2);
        assert_eq!(config.guardians[0].nickname.as_deref(), Some("Alice"));
        assert_eq!(config.guardians[1].nickname, None);
        assert_eq!(config.members, vec![GenesisMember::new("civ_carol")]);
        assert_eq!(config.tally.quorum, dec!(0.25));
        assert_eq!(config.tally.threshold, dec!(0.5)); // default
        assert!(config.tally.burn_vote_veto);
        config.validate().unwrap();
    }

    #[test]
    fn round_trips_through_toml() {
        let config = GenesisConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(GenesisConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn validate_rejects_broken_configs() {
        let base = GenesisConfig::from_toml_str(SAMPLE).unwrap();

        let mut c = base.clone();
        c.total_voting_weight = Decimal::ZERO;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.guardians.clear();
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.members.push(GenesisMember::new("civ_alice"));
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.members.push(GenesisMember::new("Carol"));
        assert!(c.validate().is_err());

        let mut c = base;
        c.tally.veto_threshold = dec!(1.2);
        assert!(matches!(c.validate(), Err(GovernanceError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = GenesisConfig::from_toml_file("/nonexistent/genesis.toml");
        assert!(matches!(result, Err(GovernanceError::Config(_))));
    }
}
