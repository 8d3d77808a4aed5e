//! Nullable store: an in-memory ordered key-value map for testing.
//!
//! Records are bincode-encoded under the logical keys of `civic_store::keys`,
//! counters are big-endian `u64`s and metadata is raw UTF-8, the same layout a
//! host-chain key-value backend uses.

use civic_store::keys;
use civic_store::{
    DemocracySettings, GuardianSettingsStore, Member, MemberMetadata, MembershipStore, StoreError,
    VoteSource,
};
use civic_types::{MemberAddress, MembershipStatus, ProposalId, Vote};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory implementation of every governance storage trait.
pub struct NullStore {
    kv: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            kv: Mutex::new(BTreeMap::new()),
        }
    }

    fn kv(&self) -> Result<MutexGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>, StoreError> {
        self.kv
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.kv()?.get(key).cloned())
    }

    fn put_raw(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.kv()?.insert(key, value);
        Ok(())
    }

    fn get_decoded<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        self.get_raw(key)?
            .map(|bytes| {
                bincode::deserialize(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    fn put_encoded<T: Serialize>(&self, key: Vec<u8>, value: &T) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.put_raw(key, bytes)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        Ok(self
            .kv()?
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_counter(&self, key: &[u8]) -> Result<u64, StoreError> {
        match self.get_raw(key)? {
            None => Ok(0),
            Some(bytes) => {
                let array: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!("counter has {} bytes", bytes.len()))
                })?;
                Ok(u64::from_be_bytes(array))
            }
        }
    }

    /// Store a ballot as the host vote store would.
    pub fn cast_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        self.put_encoded(keys::vote_key(vote.proposal_id, &vote.voter), vote)
    }

    /// Voters whose ballots on `proposal` are marked for deletion, in address order.
    pub fn pending_deletions(&self, proposal: ProposalId) -> Result<Vec<MemberAddress>, StoreError> {
        self.scan_prefix(&keys::votes_to_delete_prefix(proposal))?
            .into_iter()
            .map(|(_, v)| {
                bincode::deserialize(&v).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    /// Second phase of vote deletion: remove every marked ballot and its marker.
    ///
    /// Returns the number of ballots removed.
    pub fn sweep_deleted_votes(&self, proposal: ProposalId) -> Result<usize, StoreError> {
        let voters = self.pending_deletions(proposal)?;
        let mut kv = self.kv()?;
        let mut removed = 0;
        for voter in &voters {
            if kv.remove(&keys::vote_key(proposal, voter)).is_some() {
                removed += 1;
            }
            kv.remove(&keys::vote_to_delete_key(proposal, voter));
        }
        Ok(removed)
    }

    /// Number of raw entries held.
    pub fn len(&self) -> usize {
        self.kv().map(|kv| kv.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipStore for NullStore {
    fn get_member(&self, address: &MemberAddress) -> Result<Option<Member>, StoreError> {
        self.get_decoded(&keys::member_key(address))
    }

    fn put_member(&self, member: &Member) -> Result<(), StoreError> {
        self.put_encoded(keys::member_key(&member.address), member)
    }

    fn has_member(&self, address: &MemberAddress) -> Result<bool, StoreError> {
        Ok(self.kv()?.contains_key(&keys::member_key(address)))
    }

    fn member_count(&self) -> Result<u64, StoreError> {
        self.get_counter(keys::MEMBER_COUNT_KEY)
    }

    fn set_member_count(&self, count: u64) -> Result<(), StoreError> {
        self.put_raw(keys::MEMBER_COUNT_KEY.to_vec(), count.to_be_bytes().to_vec())
    }

    fn status_count(&self, status: MembershipStatus) -> Result<u64, StoreError> {
        self.get_counter(&keys::member_status_count_key(status))
    }

    fn set_status_count(&self, status: MembershipStatus, count: u64) -> Result<(), StoreError> {
        self.put_raw(
            keys::member_status_count_key(status),
            count.to_be_bytes().to_vec(),
        )
    }

    fn get_metadata(
        &self,
        address: &MemberAddress,
        kind: MemberMetadata,
    ) -> Result<Option<String>, StoreError> {
        self.get_raw(&keys::member_metadata_key(address, kind))?
            .map(|bytes| String::from_utf8(bytes).map_err(|e| StoreError::Corruption(e.to_string())))
            .transpose()
    }

    fn put_metadata(
        &self,
        address: &MemberAddress,
        kind: MemberMetadata,
        value: &str,
    ) -> Result<(), StoreError> {
        self.put_raw(
            keys::member_metadata_key(address, kind),
            value.as_bytes().to_vec(),
        )
    }
}

impl GuardianSettingsStore for NullStore {
    fn get_settings(&self) -> Result<Option<DemocracySettings>, StoreError> {
        self.get_decoded(keys::DEMOCRACY_SETTINGS_KEY)
    }

    fn put_settings(&self, settings: &DemocracySettings) -> Result<(), StoreError> {
        self.put_encoded(keys::DEMOCRACY_SETTINGS_KEY.to_vec(), settings)
    }
}

impl VoteSource for NullStore {
    fn votes(&self, proposal: ProposalId) -> Result<Vec<Vote>, StoreError> {
        self.scan_prefix(&keys::votes_prefix(proposal))?
            .into_iter()
            .map(|(_, v)| {
                bincode::deserialize(&v).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    fn mark_for_deletion(
        &self,
        proposal: ProposalId,
        voter: &MemberAddress,
    ) -> Result<(), StoreError> {
        self.put_encoded(keys::vote_to_delete_key(proposal, voter), voter)
    }
}
