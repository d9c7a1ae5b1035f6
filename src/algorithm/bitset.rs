use bitvec::prelude::*;
use std::fmt;

use crate::analysis::variants::VariantKey;

/// Fixed-size bitset over variant keys
///
/// Bit `0` stands for [`VariantKey::EMPTY`]; variant keys index their own
/// bit directly. Used for slot domains and compatibility sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariantSet {
    bits: BitVec,
}

impl VariantSet {
    /// Create a set with room for `universe` keys and no members
    pub fn new(universe: usize) -> Self {
        Self {
            bits: bitvec![0; universe],
        }
    }

    /// Create a set containing every key below `universe`
    pub fn all(universe: usize) -> Self {
        Self {
            bits: bitvec![1; universe],
        }
    }

    /// Build from an iterator of keys
    pub fn from_keys(universe: usize, keys: impl IntoIterator<Item = VariantKey>) -> Self {
        let mut set = Self::new(universe);
        for key in keys {
            set.insert(key);
        }
        set
    }

    /// Number of keys the set can hold
    pub fn universe(&self) -> usize {
        self.bits.len()
    }

    /// Insert a key; keys outside the universe are ignored
    pub fn insert(&mut self, key: VariantKey) {
        if key.index() < self.bits.len() {
            self.bits.set(key.index(), true);
        }
    }

    /// Remove a key, returning whether it was present
    pub fn remove(&mut self, key: VariantKey) -> bool {
        let present = self.contains(key);
        if present {
            self.bits.set(key.index(), false);
        }
        present
    }

    /// Test key membership
    pub fn contains(&self, key: VariantKey) -> bool {
        self.bits.get(key.index()).as_deref() == Some(&true)
    }

    /// Intersect this set with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Add every member of another set
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Remove every member of another set
    pub fn subtract(&mut self, other: &Self) {
        for index in other.bits.iter_ones() {
            if index < self.bits.len() {
                self.bits.set(index, false);
            }
        }
    }

    /// Create a new set containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Whether the two sets share a member
    pub fn intersects(&self, other: &Self) -> bool {
        self.bits
            .iter_ones()
            .any(|index| other.bits.get(index).as_deref() == Some(&true))
    }

    /// Test if no keys are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count keys in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether any member is a real tile rather than the empty marker
    pub fn has_tile(&self) -> bool {
        self.bits.iter_ones().any(|index| index != VariantKey::EMPTY.index())
    }

    /// The only member, if the set has exactly one
    pub fn single(&self) -> Option<VariantKey> {
        let mut members = self.iter();
        let first = members.next()?;
        members.next().is_none().then_some(first)
    }

    /// Members in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = VariantKey> + '_ {
        self.bits
            .iter_ones()
            .filter_map(|index| u16::try_from(index).ok().map(VariantKey))
    }

    /// Extract all keys as a vector
    pub fn to_vec(&self) -> Vec<VariantKey> {
        self.iter().collect()
    }
}

impl fmt::Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<u16> = self.iter().map(|key| key.0).collect();
        write!(f, "VariantSet({} variants: {keys:?})", self.count())
    }
}
