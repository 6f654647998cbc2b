//! Ordered, name-keyed storage shared by the static and dynamic list layers.

use std::sync::Arc;

use compact_str::CompactString;
use hashbrown::HashMap;

/// Anything registered under a unique name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Insertion-ordered map from name to declaration.
///
/// Re-registering a name replaces the entry in place, keeping its position.
pub struct Registry<T> {
    entries: Vec<Arc<T>>,
    index: HashMap<CompactString, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T: Named> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item`, returning the entry it replaced.
    pub fn insert(&mut self, item: T) -> Option<Arc<T>> {
        self.insert_arc(Arc::new(item))
    }

    pub fn insert_arc(&mut self, item: Arc<T>) -> Option<Arc<T>> {
        match self.index.get(item.name()) {
            Some(&slot) => Some(core::mem::replace(&mut self.entries[slot], item)),
            None => {
                self.index
                    .insert(CompactString::from(item.name()), self.entries.len());
                self.entries.push(item);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` with `overlay` merged over it: overlapping names take the
    /// overlay's entry at the base position, new names are appended.
    pub fn merged(&self, overlay: &Registry<T>) -> Registry<T> {
        let mut merged = self.clone();
        for entry in overlay.iter() {
            merged.insert_arc(Arc::clone(entry));
        }
        merged
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a Arc<T>;
    type IntoIter = core::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
