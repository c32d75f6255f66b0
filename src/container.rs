//! Mutable shared containers: [`SequenceValue`] and [`RecordValue`].
//!
//! A container handle is an `Rc<RefCell<_>>`: cloning the handle aliases the
//! same instance, and a container may hold itself directly or through other
//! containers. Such cycles keep themselves alive until broken, e.g. with
//! [`SequenceValue::clear`] or [`RecordValue::clear`].
//!
//! Every container is in one of three states: null (no list/map at all),
//! empty, or populated. Mutating a null container first materialises an
//! empty one.
//!
//! ```rust
//! use binval::{RecordValue, Value};
//!
//! let node = RecordValue::empty();
//! node.set("name", Value::from("root"));
//! node.set("self", Value::Record(node.clone()));
//!
//! let inner = node.get("self").unwrap();
//! assert!(inner.ptr_eq(&Value::Record(node.clone())));
//! node.clear();
//! ```

use crate::map::{PropertyMap, PropertyName};
use crate::{AttributeSet, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::thread::LocalKey;

thread_local! {
    static DEBUG_ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a container as "being visited" on a per-thread stack for as long as
/// the guard lives. Used to stop recursive walks that cannot carry state
/// (`Debug`, serde `Serialize`) from following a cycle.
pub(crate) struct VisitGuard {
    stack: &'static LocalKey<RefCell<Vec<usize>>>,
}

impl VisitGuard {
    /// Returns `None` if `identity` is already on the stack.
    pub(crate) fn enter(
        stack: &'static LocalKey<RefCell<Vec<usize>>>,
        identity: usize,
    ) -> Option<VisitGuard> {
        stack.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&identity) {
                None
            } else {
                active.push(identity);
                Some(VisitGuard { stack })
            }
        })
    }
}

impl Drop for VisitGuard {
    fn drop(&mut self) {
        self.stack.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

#[derive(Default)]
pub(crate) struct SequenceCell {
    pub(crate) items: Option<Vec<Value>>,
    pub(crate) attributes: AttributeSet,
}

/// An insertion-ordered, mutable, shared list of values.
///
/// # Examples
///
/// ```rust
/// use binval::{SequenceValue, Value};
///
/// let seq = SequenceValue::of([Value::from(1), Value::from(2)]);
/// seq.push(Value::from(3));
/// assert_eq!(seq.len(), 3);
/// assert_eq!(seq.get(2), Some(Value::from(3)));
///
/// let alias = seq.clone();
/// alias.remove(0);
/// assert_eq!(seq.len(), 2);
/// ```
#[derive(Clone)]
pub struct SequenceValue(Rc<RefCell<SequenceCell>>);

impl SequenceValue {
    pub fn null() -> Self {
        Self::from_cell(SequenceCell::default())
    }

    pub fn empty() -> Self {
        Self::of(Vec::new())
    }

    pub fn of<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::from_cell(SequenceCell {
            items: Some(items.into_iter().collect()),
            attributes: AttributeSet::new(),
        })
    }

    fn from_cell(cell: SequenceCell) -> Self {
        SequenceValue(Rc::new(RefCell::new(cell)))
    }

    /// Sets the attributes in place and returns the same instance.
    #[must_use]
    pub fn with_attributes(self, attributes: AttributeSet) -> Self {
        self.set_attributes(attributes);
        self
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.borrow().items.is_none()
    }

    /// Number of items; zero for a null sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().items.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().items.as_ref()?.get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().items.get_or_insert_with(Vec::new).push(value);
    }

    /// Inserts at `index`, shifting later items.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&self, index: usize, value: Value) {
        self.0
            .borrow_mut()
            .items
            .get_or_insert_with(Vec::new)
            .insert(index, value);
    }

    /// Replaces the item at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the sequence untouched when out of bounds.
    pub fn replace(&self, index: usize, value: Value) -> Option<Value> {
        let mut cell = self.0.borrow_mut();
        let slot = cell.items.as_mut()?.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut cell = self.0.borrow_mut();
        let items = cell.items.as_mut()?;
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Removes every item. A null sequence stays null.
    pub fn clear(&self) {
        if let Some(items) = self.0.borrow_mut().items.as_mut() {
            items.clear();
        }
    }

    /// Turns the sequence null, dropping its items.
    pub fn set_null(&self) {
        self.0.borrow_mut().items = None;
    }

    /// A snapshot of the items; empty for a null sequence.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().items.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn attributes(&self) -> AttributeSet {
        self.0.borrow().attributes.clone()
    }

    pub fn set_attributes(&self, attributes: AttributeSet) {
        self.0.borrow_mut().attributes = attributes;
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn cell(&self) -> std::cell::Ref<'_, SequenceCell> {
        self.0.borrow()
    }
}

impl fmt::Debug for SequenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = VisitGuard::enter(&DEBUG_ACTIVE, self.identity()) else {
            return f.write_str("<cycle>");
        };
        let cell = self.0.borrow();
        if !cell.attributes.is_empty() {
            write!(f, "[{}] ", cell.attributes)?;
        }
        match &cell.items {
            Some(items) => f.debug_list().entries(items).finish(),
            None => f.write_str("null"),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordCell {
    pub(crate) properties: Option<PropertyMap>,
    pub(crate) attributes: AttributeSet,
}

/// An insertion-ordered, mutable, shared map from property names to values.
///
/// # Examples
///
/// ```rust
/// use binval::{RecordValue, Value};
///
/// let user = RecordValue::empty();
/// user.set("name", Value::from("Alice"));
/// user.set("age", Value::from(30));
/// user.set("name", Value::from("Bob"));
///
/// assert_eq!(user.len(), 2);
/// assert_eq!(user.get("name"), Some(Value::from("Bob")));
/// ```
#[derive(Clone)]
pub struct RecordValue(Rc<RefCell<RecordCell>>);

impl RecordValue {
    pub fn null() -> Self {
        Self::from_cell(RecordCell::default())
    }

    pub fn empty() -> Self {
        Self::from_cell(RecordCell {
            properties: Some(PropertyMap::new()),
            attributes: AttributeSet::new(),
        })
    }

    pub fn of<N, I>(properties: I) -> Self
    where
        N: Into<PropertyName>,
        I: IntoIterator<Item = (N, Value)>,
    {
        let record = Self::empty();
        for (name, value) in properties {
            record.set(name, value);
        }
        record
    }

    fn from_cell(cell: RecordCell) -> Self {
        RecordValue(Rc::new(RefCell::new(cell)))
    }

    #[must_use]
    pub fn with_attributes(self, attributes: AttributeSet) -> Self {
        self.set_attributes(attributes);
        self
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.borrow().properties.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().properties.as_ref().map_or(0, PropertyMap::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigns a property, returning the value it replaced.
    pub fn set(&self, name: impl Into<PropertyName>, value: Value) -> Option<Value> {
        self.0
            .borrow_mut()
            .properties
            .get_or_insert_with(PropertyMap::new)
            .insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().properties.as_ref()?.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0
            .borrow()
            .properties
            .as_ref()
            .is_some_and(|p| p.contains(name))
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.borrow_mut().properties.as_mut()?.remove(name)
    }

    /// Removes every property. A null record stays null.
    pub fn clear(&self) {
        if let Some(properties) = self.0.borrow_mut().properties.as_mut() {
            properties.clear();
        }
    }

    pub fn set_null(&self) {
        self.0.borrow_mut().properties = None;
    }

    /// Property names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<PropertyName> {
        self.0
            .borrow()
            .properties
            .as_ref()
            .map(|p| p.names().cloned().collect())
            .unwrap_or_default()
    }

    /// A snapshot of the properties in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(PropertyName, Value)> {
        self.0
            .borrow()
            .properties
            .as_ref()
            .map(|p| p.iter().map(|(n, v)| (n.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn attributes(&self) -> AttributeSet {
        self.0.borrow().attributes.clone()
    }

    pub fn set_attributes(&self, attributes: AttributeSet) {
        self.0.borrow_mut().attributes = attributes;
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn cell(&self) -> std::cell::Ref<'_, RecordCell> {
        self.0.borrow()
    }
}

impl fmt::Debug for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(_guard) = VisitGuard::enter(&DEBUG_ACTIVE, self.identity()) else {
            return f.write_str("<cycle>");
        };
        let cell = self.0.borrow();
        if !cell.attributes.is_empty() {
            write!(f, "[{}] ", cell.attributes)?;
        }
        match &cell.properties {
            Some(properties) => f
                .debug_map()
                .entries(properties.iter().map(|(name, value)| (name.as_str(), value)))
                .finish(),
            None => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tri_state() {
        let null = SequenceValue::null();
        let empty = SequenceValue::empty();
        assert!(null.is_null());
        assert!(!empty.is_null());
        assert_eq!(null.len(), 0);
        assert!(empty.is_empty());

        null.push(Value::from(1));
        assert!(!null.is_null());
        assert_eq!(null.len(), 1);

        let record = RecordValue::null();
        assert!(record.is_null());
        record.set("a", Value::from(true));
        assert!(!record.is_null());
        record.set_null();
        assert!(record.is_null());
        assert!(record.get("a").is_none());
    }

    #[test]
    fn test_sequence_mutation() {
        let seq = SequenceValue::of([Value::from(1), Value::from(3)]);
        seq.insert(1, Value::from(2));
        assert_eq!(seq.items(), vec![Value::from(1), Value::from(2), Value::from(3)]);

        assert_eq!(seq.replace(0, Value::from(10)), Some(Value::from(1)));
        assert_eq!(seq.replace(9, Value::from(0)), None);
        assert_eq!(seq.remove(5), None);
        assert_eq!(seq.remove(2), Some(Value::from(3)));
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_aliases_share_state() {
        let record = RecordValue::empty();
        let alias = record.clone();
        alias.set("x", Value::from(1));
        assert_eq!(record.get("x"), Some(Value::from(1)));
        assert!(record.ptr_eq(&alias));
        assert!(!record.ptr_eq(&RecordValue::empty()));
    }

    #[test]
    fn test_debug_stops_at_cycles() {
        let seq = SequenceValue::empty();
        seq.push(Value::from(1));
        seq.push(Value::Sequence(seq.clone()));
        assert_eq!(format!("{:?}", seq), "[Integer(1), Sequence(<cycle>)]");
        seq.clear();

        let record = RecordValue::empty();
        record.set("me", Value::Record(record.clone()));
        assert_eq!(format!("{:?}", record), "{\"me\": Record(<cycle>)}");
        record.clear();
    }

    #[test]
    fn test_visit_guard_releases() {
        thread_local! {
            static STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
        }
        {
            let _outer = VisitGuard::enter(&STACK, 1).unwrap();
            assert!(VisitGuard::enter(&STACK, 1).is_none());
            let _inner = VisitGuard::enter(&STACK, 2).unwrap();
        }
        assert!(VisitGuard::enter(&STACK, 1).is_some());
    }
}
