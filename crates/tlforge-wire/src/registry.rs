//! Write-once map from constructor tag to a decoder entry.
//!
//! Populated during initialization through [`RegistryBuilder`], then frozen
//! into an immutable [`Registry`] that can be shared across threads.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::deserializer::Deserializer;
use crate::error::{DecodeError, RegistryError};
use crate::traits::DecodeFn;

#[derive(Debug)]
pub struct RegistryBuilder<T> {
    entries: HashMap<u32, T>,
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> RegistryBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `tag`. Tags are never overwritten.
    pub fn register(&mut self, tag: u32, entry: T) -> Result<(), RegistryError> {
        match self.entries.entry(tag) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateTag { tag }),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    pub fn build(self) -> Registry<T> {
        tracing::debug!(entries = self.entries.len(), "constructor registry frozen");
        Registry {
            entries: self.entries,
        }
    }
}

/// Immutable tag table.
#[derive(Debug)]
pub struct Registry<T> {
    entries: HashMap<u32, T>,
}

impl<T> Registry<T> {
    pub fn resolve(&self, tag: u32) -> Result<&T, DecodeError> {
        self.entries
            .get(&tag)
            .ok_or(DecodeError::UnknownConstructor { tag })
    }

    pub fn get(&self, tag: u32) -> Option<&T> {
        self.entries.get(&tag)
    }

    pub fn contains(&self, tag: u32) -> bool {
        self.entries.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(tag, entry)| (*tag, entry))
    }

    /// Reads exactly the 4-byte tag and resolves it.
    ///
    /// On an unknown tag nothing past the tag has been consumed.
    pub fn read_and_resolve(&self, d: &mut Deserializer<'_>) -> Result<(u32, &T), DecodeError> {
        let tag = d.read_u32()?;
        self.resolve(tag).map(|entry| (tag, entry))
    }
}

impl<O> Registry<DecodeFn<O>> {
    /// Decodes one boxed object by dispatching on its tag.
    pub fn decode(&self, d: &mut Deserializer<'_>) -> Result<O, DecodeError> {
        let (_, decode) = self.read_and_resolve(d)?;
        decode(d)
    }
}
