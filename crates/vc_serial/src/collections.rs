//! Insertion-ordered hash containers and the fixed hasher used across the crate.
//!
//! [`OrderedSet`] and [`OrderedMap`] keep entries in a dense `Vec` and index them
//! through a [`HashTable`] of positions, so iteration follows first-insertion order
//! and lookups stay O(1).

use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};

use foldhash::fast::{FixedState, FoldHasher};
use hashbrown::HashTable;

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x4D1F_2B93_C6A7_08E5);

/// Fixed hash state based on `foldhash` with a constant seed.
///
/// Hash results only depend on the input, which keeps container layout and
/// therefore test output stable between runs.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// OrderedSet

/// A hash set that iterates in first-insertion order.
///
/// Inserting a value that is already present leaves the set unchanged.
/// Two sets are equal when they hold equal values in the same order.
///
/// # Examples
///
/// ```
/// use vc_serial::collections::OrderedSet;
///
/// let set: OrderedSet<&str> = ["a", "b", "c", "c", "a"].into_iter().collect();
///
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&"b"));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
/// ```
#[derive(Clone)]
pub struct OrderedSet<T> {
    entries: Vec<T>,
    table: HashTable<usize>,
}

impl<T> OrderedSet<T> {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            table: HashTable::new(),
        }
    }

    /// Creates an empty set with room for `capacity` values.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in insertion order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Returns the values as a slice, in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }
}

impl<T: Hash + Eq> OrderedSet<T> {
    /// Inserts a value, returning `false` if an equal value was already present.
    pub fn insert(&mut self, value: T) -> bool {
        let hash = FixedHashState.hash_one(&value);
        let entries = &self.entries;
        if self
            .table
            .find(hash, |&index| entries[index] == value)
            .is_some()
        {
            return false;
        }
        let index = self.entries.len();
        let entries = &self.entries;
        self.table
            .insert_unique(hash, index, |&index| FixedHashState.hash_one(&entries[index]));
        self.entries.push(value);
        true
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        let hash = FixedHashState.hash_one(value);
        self.table
            .find(hash, |&index| self.entries[index] == *value)
            .is_some()
    }
}

impl<T> Default for OrderedSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for OrderedSet<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq> Eq for OrderedSet<T> {}

impl<T: Hash> Hash for OrderedSet<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.iter()).finish()
    }
}

impl<T: Hash + Eq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// -----------------------------------------------------------------------------
// OrderedMap

/// A hash map that iterates in first-insertion order of its keys.
///
/// Inserting an existing key replaces the value in place: the entry keeps its
/// original position and the previous value is returned.
/// Two maps are equal when they hold equal entries in the same order.
///
/// # Examples
///
/// ```
/// use vc_serial::collections::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// assert_eq!(map.insert("x", 1), None);
/// assert_eq!(map.insert("y", 2), None);
/// assert_eq!(map.insert("x", 3), Some(1));
///
/// assert_eq!(map.get(&"x"), Some(&3));
/// assert_eq!(map.iter().collect::<Vec<_>>(), [(&"x", &3), (&"y", &2)]);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    table: HashTable<usize>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            table: HashTable::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates over values in key insertion order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    /// Inserts an entry.
    ///
    /// Returns the replaced value if `key` was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = FixedHashState.hash_one(&key);
        let entries = &self.entries;
        if let Some(&index) = self.table.find(hash, |&index| entries[index].0 == key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }
        let index = self.entries.len();
        let entries = &self.entries;
        self.table
            .insert_unique(hash, index, |&index| FixedHashState.hash_one(&entries[index].0));
        self.entries.push((key, value));
        None
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = FixedHashState.hash_one(key);
        self.table
            .find(hash, |&index| self.entries[index].0 == *key)
            .map(|&index| &self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash, V: Hash> Hash for OrderedMap<K, V> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = alloc::vec::IntoIter<(K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
