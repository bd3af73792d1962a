use crate::error::{GateError, StoreError};
use crate::store::KeyValueStore;

/// Holds the map credential. Everything else stays locked until one is known.
pub struct ApiKeyGate<K> {
    store: K,
    key: String,
    credential: Option<String>,
}

impl<K: KeyValueStore> ApiKeyGate<K> {
    /// Opens the gate with whatever credential was saved previously.
    pub fn load(store: K, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        let credential = store
            .get(&key)?
            .map(|saved| saved.trim().to_string())
            .filter(|saved| !saved.is_empty());
        if credential.is_some() {
            log::debug!("found saved credential under {}", key);
        }
        Ok(Self {
            store,
            key,
            credential,
        })
    }

    pub fn is_unlocked(&self) -> bool {
        self.credential.is_some()
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Whether the input would be accepted by [Self::submit].
    pub fn can_submit(input: &str) -> bool {
        !input.trim().is_empty()
    }

    /// Saves the trimmed credential and unlocks the gate.
    /// Nothing is checked beyond it being non-empty.
    pub fn submit(&mut self, input: &str) -> Result<&str, GateError> {
        let credential = input.trim();
        if credential.is_empty() {
            return Err(GateError::EmptyCredential);
        }
        self.store.set(&self.key, credential)?;
        log::info!("credential saved");
        Ok(self.credential.insert(credential.to_string()).as_str())
    }

    /// Deletes the saved credential and locks the gate again.
    pub fn forget(&mut self) -> Result<(), StoreError> {
        self.store.remove(&self.key)?;
        self.credential = None;
        Ok(())
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn locked_without_saved_credential() {
        let gate = ApiKeyGate::load(MemoryStore::new(), "k").unwrap();
        assert!(!gate.is_unlocked());
        assert_eq!(gate.credential(), None);
    }

    #[test]
    fn unlocked_by_saved_credential() {
        let mut store = MemoryStore::new();
        store.set("k", "abc").unwrap();
        let gate = ApiKeyGate::load(store, "k").unwrap();
        assert_eq!(gate.credential(), Some("abc"));
    }

    #[test]
    fn submit_trims_and_persists() {
        let mut gate = ApiKeyGate::load(MemoryStore::new(), "k").unwrap();
        assert_eq!(gate.submit("  abc \n").unwrap(), "abc");
        assert!(gate.is_unlocked());
        assert_eq!(gate.store().get("k").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn blank_submission_is_refused() {
        let mut gate = ApiKeyGate::load(MemoryStore::new(), "k").unwrap();
        assert!(!ApiKeyGate::<MemoryStore>::can_submit("   "));
        assert!(matches!(gate.submit("   "), Err(GateError::EmptyCredential)));
        assert!(!gate.is_unlocked());
        assert_eq!(gate.store().get("k").unwrap(), None);
    }

    #[test]
    fn forget_relocks() {
        let mut gate = ApiKeyGate::load(MemoryStore::new(), "k").unwrap();
        gate.submit("abc").unwrap();
        gate.forget().unwrap();
        assert!(!gate.is_unlocked());
        assert_eq!(gate.store().get("k").unwrap(), None);
    }
}
