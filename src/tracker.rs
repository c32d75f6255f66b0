//! Reference/address bookkeeping for one encode or decode pass.
//!
//! Every reference-kind instance (string, symbol, sequence, record, null
//! ones included) gets the next free address the first time the pass meets
//! it. Addresses are handed out in depth-first, first-encounter order on both
//! sides, so the writer's numbering and the reader's arena line up without
//! any table being transmitted.
//!
//! The write side keys instances by the address of their shared cell and
//! keeps a clone of each one alive, so a cell cannot be freed and its
//! address reused by a different instance while the pass is running.

use crate::{Error, Result, Value};
use std::collections::HashMap;

/// Outcome of offering a value to [`WriteTracker::track`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tracked {
    /// First sighting: the value was assigned this address and must be written in full.
    New(u64),
    /// Already written at this address: emit a reference instead.
    Existing(u64),
}

/// Serialize-side identity table.
#[derive(Default)]
pub struct WriteTracker {
    addresses: HashMap<usize, u64>,
    retained: Vec<Value>,
}

impl WriteTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `value` up by identity, assigning the next address if unseen.
    ///
    /// Returns `None` for value kinds, which are never tracked.
    pub fn track(&mut self, value: &Value) -> Option<Tracked> {
        let identity = value.identity()?;
        if let Some(&address) = self.addresses.get(&identity) {
            return Some(Tracked::Existing(address));
        }
        let address = self.retained.len() as u64;
        self.addresses.insert(identity, address);
        self.retained.push(value.clone());
        Some(Tracked::New(address))
    }

    /// Number of addresses handed out so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

/// Deserialize-side arena: address `n` is the `n`th registered instance.
#[derive(Default)]
pub struct ReadTracker {
    slots: Vec<Value>,
}

impl ReadTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at the next address and returns that address.
    pub fn register(&mut self, value: Value) -> u64 {
        self.slots.push(value);
        (self.slots.len() - 1) as u64
    }

    /// Returns an alias of the instance registered at `address`.
    ///
    /// # Errors
    ///
    /// [`Error::DanglingReference`] if nothing has been registered there yet.
    pub fn resolve(&self, address: u64, offset: u64) -> Result<Value> {
        usize::try_from(address)
            .ok()
            .and_then(|index| self.slots.get(index))
            .cloned()
            .ok_or(Error::DanglingReference { offset, address })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SequenceValue, StringValue};

    #[test]
    fn test_write_tracker_assigns_in_order() {
        let mut tracker = WriteTracker::new();
        let a = Value::from("a");
        let b = Value::Sequence(SequenceValue::empty());

        assert_eq!(tracker.track(&a), Some(Tracked::New(0)));
        assert_eq!(tracker.track(&b), Some(Tracked::New(1)));
        assert_eq!(tracker.track(&a.clone()), Some(Tracked::Existing(0)));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_equal_content_is_not_identity() {
        let mut tracker = WriteTracker::new();
        assert_eq!(tracker.track(&Value::from("x")), Some(Tracked::New(0)));
        assert_eq!(tracker.track(&Value::from("x")), Some(Tracked::New(1)));
    }

    #[test]
    fn test_value_kinds_are_untracked() {
        let mut tracker = WriteTracker::new();
        assert_eq!(tracker.track(&Value::from(1)), None);
        assert_eq!(tracker.track(&Value::from(vec![1u8])), None);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_null_reference_kinds_are_tracked() {
        let mut tracker = WriteTracker::new();
        let null = Value::String(StringValue::null());
        assert_eq!(tracker.track(&null), Some(Tracked::New(0)));
        assert_eq!(tracker.track(&null), Some(Tracked::Existing(0)));
    }

    #[test]
    fn test_read_tracker_resolves_aliases() {
        let mut tracker = ReadTracker::new();
        let seq = Value::Sequence(SequenceValue::empty());
        assert_eq!(tracker.register(seq.clone()), 0);
        assert!(tracker.resolve(0, 0).unwrap().ptr_eq(&seq));

        let err = tracker.resolve(1, 7).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingReference {
                offset: 7,
                address: 1
            }
        ));
    }
}
