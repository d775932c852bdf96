//! Ordered collections of identified hashes.

use crate::core::hasher::PerceptualHash;
use crate::error::CompareError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An ordered sequence of `(identifier, hash)` pairs.
///
/// Identifiers are unique; hash values may repeat. Insertion order is
/// preserved and is the tie-break order for every search.
#[derive(Debug, Clone)]
pub struct HashCollection<I> {
    entries: Vec<(I, PerceptualHash)>,
    /// Identifier to position in `entries`
    index: HashMap<I, usize>,
}

impl<I> HashCollection<I>
where
    I: Eq + Hash + Clone + Debug,
{
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty collection with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Build a collection from pairs, rejecting the first repeated identifier
    pub fn try_from_pairs(
        pairs: impl IntoIterator<Item = (I, PerceptualHash)>,
    ) -> Result<Self, CompareError> {
        let mut collection = Self::new();
        for (id, hash) in pairs {
            collection.insert(id, hash)?;
        }
        Ok(collection)
    }

    /// Append an entry
    pub fn insert(&mut self, id: I, hash: PerceptualHash) -> Result<(), CompareError> {
        if self.index.contains_key(&id) {
            return Err(CompareError::DuplicateIdentifier {
                id: format!("{:?}", id),
            });
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, hash));
        Ok(())
    }

    pub fn contains(&self, id: &I) -> bool {
        self.index.contains_key(id)
    }

    /// Look up the hash stored for an identifier
    pub fn get(&self, id: &I) -> Option<PerceptualHash> {
        self.index.get(id).map(|&position| self.entries[position].1)
    }
}

impl<I> HashCollection<I> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn as_slice(&self) -> &[(I, PerceptualHash)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&I, PerceptualHash)> + '_ {
        self.entries.iter().map(|(id, hash)| (id, *hash))
    }
}

impl<I> Default for HashCollection<I>
where
    I: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
