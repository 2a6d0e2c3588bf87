//! Key-value substrate
//!
//! The durable flat string store every collection is written to. The
//! contract is deliberately small: `get`, `set` and `remove` on whole string
//! values, synchronous, with no transactions and no partial writes.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::error::SubstrateError;

/// A flat string-to-string store
pub trait Substrate {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, SubstrateError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), SubstrateError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), SubstrateError>;
}

/// In-memory substrate
///
/// Optionally enforces a byte quota over all keys and values, the way a
/// browser's local storage refuses writes once its budget is used up.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemorySubstrate {
    /// Create an empty, unbounded substrate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty substrate that holds at most `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes used by everything except `skip_key`
    fn used_bytes_excluding(&self, skip_key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != skip_key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Substrate for MemorySubstrate {
    fn get(&self, key: &str) -> Result<Option<String>, SubstrateError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SubstrateError> {
        if let Some(quota) = self.quota {
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(self.used_bytes_excluding(key));
            if needed > available {
                return Err(SubstrateError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SubstrateError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: Substrate + ?Sized> Substrate for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, SubstrateError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SubstrateError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SubstrateError> {
        (**self).remove(key)
    }
}
