use civic_store::StoreError;
use civic_types::{CivicError, MembershipStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("member not found: {0}")]
    NotFound(String),

    #[error("account {0} has already been enrolled")]
    AlreadyEnrolled(String),

    #[error("membership status transition {from} -> {to} is not allowed")]
    InvalidStateTransition {
        from: MembershipStatus,
        to: MembershipStatus,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed vote: {0}")]
    MalformedVote(String),

    #[error("configuration invariant violated: {0}")]
    ConfigurationInvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl GovernanceError {
    /// Whether the error means state this crate relies on is already broken.
    ///
    /// The host must abort instead of continuing with the current state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationInvariantViolation(_) | Self::Store(StoreError::Corruption(_))
        )
    }
}

impl From<CivicError> for GovernanceError {
    fn from(e: CivicError) -> Self {
        match e {
            CivicError::InvalidAddress(addr) => Self::InvalidAddress(addr),
            CivicError::Arithmetic(msg) => Self::ConfigurationInvariantViolation(msg),
            CivicError::InvalidDecimal(msg) | CivicError::InvalidParams(msg) => {
                Self::InvalidRequest(msg)
            }
        }
    }
}
