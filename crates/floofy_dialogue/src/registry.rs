// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered, id-keyed collections of named records.
//!
//! [`Registry`] is the storage behind every collection in the crate: the
//! participants, entries and choices inside a dialogue, the dialogues inside
//! a manager, and the flat choice registry. It keeps insertion order, hands
//! out ids from a monotonic [`IdAllocator`], and offers both a permissive
//! insert (names may repeat) and a unique-name insert.

use crate::id::{Id, IdAllocator};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// An entity that can live in a [`Registry`]
pub trait Record {
    /// Typed identifier of this record kind
    type Key: Copy + Eq + Hash + fmt::Debug + From<Id> + Into<Id>;

    /// The record's identifier
    fn key(&self) -> Self::Key;

    /// Replace the identifier (used when adopting a record whose id is taken)
    fn rekey(&mut self, key: Self::Key);

    /// Secondary lookup name
    fn name(&self) -> &str;
}

impl<T: Record> Record for Box<T> {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        (**self).key()
    }

    fn rekey(&mut self, key: Self::Key) {
        (**self).rekey(key);
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Insertion-ordered collection keyed by record id
#[derive(Debug, Clone)]
pub struct Registry<T: Record> {
    items: IndexMap<T::Key, T>,
    ids: IdAllocator,
}

impl<T: Record> Registry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id the next insert will receive
    pub fn next_key(&self) -> T::Key {
        T::Key::from(self.ids.peek())
    }

    /// Allocate an id and insert the record built from it. Never replaces
    /// an existing record.
    pub fn insert_with(&mut self, make: impl FnOnce(T::Key) -> T) -> &mut T {
        let key = self.fresh_key();
        let (index, _) = self.items.insert_full(key, make(key));
        &mut self.items[index]
    }

    fn fresh_key(&mut self) -> T::Key {
        loop {
            let key = T::Key::from(self.ids.allocate());
            if !self.items.contains_key(&key) {
                return key;
            }
        }
    }

    /// Like [`insert_with`](Self::insert_with), but refuses a name that is
    /// already present
    pub fn insert_unique_with(&mut self, name: &str, make: impl FnOnce(T::Key) -> T) -> Option<&mut T> {
        if self.contains_name(name) {
            return None;
        }
        Some(self.insert_with(make))
    }

    /// Insert a record that already carries its id, advancing the allocator
    /// past it. Gives the record back if the id is taken or above [`Id::MAX`].
    pub fn insert_keyed(&mut self, item: T) -> Result<&mut T, T> {
        let key = item.key();
        let id: Id = key.into();
        if !id.in_range() || self.items.contains_key(&key) {
            return Err(item);
        }
        self.ids.observe(id);
        let (index, _) = self.items.insert_full(key, item);
        Ok(&mut self.items[index])
    }

    /// Re-insert a detached record under the unique-name rule. A clashing or
    /// out-of-range id is replaced with a fresh one. Gives the record back on
    /// a name clash.
    pub fn adopt(&mut self, mut item: T) -> Result<&mut T, T> {
        if self.contains_name(item.name()) {
            return Err(item);
        }
        let id: Id = item.key().into();
        if !id.in_range() || self.items.contains_key(&item.key()) {
            let key = self.fresh_key();
            item.rekey(key);
        } else {
            self.ids.observe(id);
        }
        let (index, _) = self.items.insert_full(item.key(), item);
        Ok(&mut self.items[index])
    }

    /// Whether any record carries this name
    pub fn contains_name(&self, name: &str) -> bool {
        self.items.values().any(|item| item.name() == name)
    }

    /// Look up by id
    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.items.get(&key)
    }

    /// Look up by id, mutably
    pub fn get_mut(&mut self, key: T::Key) -> Option<&mut T> {
        self.items.get_mut(&key)
    }

    /// Look up by position
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.items.get_index(index).map(|(_, item)| item)
    }

    /// Look up by position, mutably
    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_index_mut(index).map(|(_, item)| item)
    }

    /// First record with this name
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.items.values().find(|item| item.name() == name)
    }

    /// First record with this name, mutably
    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.values_mut().find(|item| item.name() == name)
    }

    /// Position of a record
    pub fn position(&self, key: T::Key) -> Option<usize> {
        self.items.get_index_of(&key)
    }

    /// Remove by id, keeping the order of the rest
    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        self.items.shift_remove(&key)
    }

    /// Remove by position, keeping the order of the rest
    pub fn remove_index(&mut self, index: usize) -> Option<T> {
        self.items.shift_remove_index(index).map(|(_, item)| item)
    }

    /// Remove the first record with this name
    pub fn remove_first_named(&mut self, name: &str) -> Option<T> {
        let key = self.find_by_name(name)?.key();
        self.remove(key)
    }

    /// Remove every record with this name
    pub fn remove_all_named(&mut self, name: &str) -> Vec<T> {
        let keys: Vec<T::Key> = self
            .items
            .values()
            .filter(|item| item.name() == name)
            .map(Record::key)
            .collect();
        keys.into_iter().filter_map(|key| self.remove(key)).collect()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    /// Records in insertion order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Ids in insertion order
    pub fn keys(&self) -> impl Iterator<Item = T::Key> + '_ {
        self.items.keys().copied()
    }
}

impl<T: Record> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
