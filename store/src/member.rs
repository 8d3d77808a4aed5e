//! Member records and the membership storage trait.

use crate::StoreError;
use civic_types::{MemberAddress, MembershipStatus};
use serde::{Deserialize, Serialize};

/// A stored membership record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub address: MemberAddress,
    pub status: MembershipStatus,
    /// Only meaningful while `status` is `Electorate`.
    pub is_guardian: bool,
}

impl Member {
    /// A freshly enrolled record.
    pub fn pending(address: MemberAddress) -> Self {
        Self {
            address,
            status: MembershipStatus::PendingApproval,
            is_guardian: false,
        }
    }

    /// Drop a guardian flag that is not backed by Electorate status.
    pub fn normalized(mut self) -> Self {
        self.is_guardian = self.is_guardian && self.status == MembershipStatus::Electorate;
        self
    }
}

/// Kinds of free-form metadata attached to a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberMetadata {
    Nickname,
}

impl MemberMetadata {
    /// Key segment identifying this metadata kind.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Nickname => "nickname",
        }
    }
}

/// Storage for member records, aggregate counters and metadata.
pub trait MembershipStore {
    fn get_member(&self, address: &MemberAddress) -> Result<Option<Member>, StoreError>;
    fn put_member(&self, member: &Member) -> Result<(), StoreError>;

    fn has_member(&self, address: &MemberAddress) -> Result<bool, StoreError> {
        self.get_member(address).map(|m| m.is_some())
    }

    /// Total number of enrolled members (absent key reads as zero).
    fn member_count(&self) -> Result<u64, StoreError>;
    fn set_member_count(&self, count: u64) -> Result<(), StoreError>;

    /// Number of members currently holding `status` (absent key reads as zero).
    fn status_count(&self, status: MembershipStatus) -> Result<u64, StoreError>;
    fn set_status_count(&self, status: MembershipStatus, count: u64) -> Result<(), StoreError>;

    fn get_metadata(
        &self,
        address: &MemberAddress,
        kind: MemberMetadata,
    ) -> Result<Option<String>, StoreError>;
    fn put_metadata(
        &self,
        address: &MemberAddress,
        kind: MemberMetadata,
        value: &str,
    ) -> Result<(), StoreError>;
}
