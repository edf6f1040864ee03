// 🔒 Unique List - insertion-ordered store that never holds two equal values
//
// Both registries wrap this. Entries are located through a value -> slot index,
// so contains/replace/remove do not scan the list, while iteration keeps the
// order in which values were added.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{EntityKind, RegistryError};

#[derive(Debug, Clone)]
pub struct UniqueList<T> {
    kind: EntityKind,
    items: Vec<T>,
    slots: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> UniqueList<T> {
    pub fn new(kind: EntityKind) -> Self {
        UniqueList {
            kind,
            items: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Slot currently holding `item`
    pub fn position(&self, item: &T) -> Option<usize> {
        self.slots.get(item).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Append `item`, failing if an equal value is already held
    pub fn add(&mut self, item: T) -> Result<(), RegistryError> {
        if self.slots.contains_key(&item) {
            return Err(RegistryError::DuplicateEntity(self.kind));
        }
        self.slots.insert(item.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Replace `target` with `replacement` in the same slot.
    ///
    /// Replacing a value with itself succeeds without touching the list.
    pub fn set(&mut self, target: &T, replacement: T) -> Result<(), RegistryError> {
        let slot = self
            .position(target)
            .ok_or(RegistryError::EntityNotFound(self.kind))?;

        if *target == replacement {
            return Ok(());
        }
        if self.slots.contains_key(&replacement) {
            return Err(RegistryError::DuplicateEntity(self.kind));
        }

        self.slots.remove(target);
        self.slots.insert(replacement.clone(), slot);
        self.items[slot] = replacement;
        Ok(())
    }

    /// Remove `target`, shifting later entries down by one slot
    pub fn remove(&mut self, target: &T) -> Result<T, RegistryError> {
        let slot = self
            .slots
            .remove(target)
            .ok_or(RegistryError::EntityNotFound(self.kind))?;

        let removed = self.items.remove(slot);
        for item in &self.items[slot..] {
            if let Some(position) = self.slots.get_mut(item) {
                *position -= 1;
            }
        }
        Ok(removed)
    }

    /// Rewrite several slots at once.
    ///
    /// All changes are checked before any is applied: the new values must be
    /// distinct from each other and from every slot that is not being
    /// rewritten. On error the list is unchanged. Slots that are not named keep
    /// their values untouched.
    pub fn replace_slots(&mut self, changes: Vec<(usize, T)>) -> Result<usize, RegistryError> {
        let rewritten: HashSet<usize> = changes.iter().map(|(slot, _)| *slot).collect();
        if rewritten.len() != changes.len() || rewritten.iter().any(|slot| *slot >= self.items.len()) {
            return Err(RegistryError::EntityNotFound(self.kind));
        }

        let mut incoming: HashSet<&T> = HashSet::with_capacity(changes.len());
        for (_, value) in &changes {
            let clashes_with_kept = self
                .slots
                .get(value)
                .is_some_and(|slot| !rewritten.contains(slot));
            if clashes_with_kept || !incoming.insert(value) {
                return Err(RegistryError::DuplicateEntity(self.kind));
            }
        }

        for (slot, _) in &changes {
            self.slots.remove(&self.items[*slot]);
        }
        let count = changes.len();
        for (slot, value) in changes {
            self.slots.insert(value.clone(), slot);
            self.items[slot] = value;
        }
        Ok(count)
    }
}

impl<T: Clone + Eq + Hash> PartialEq for UniqueList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.items == other.items
    }
}

impl<T: Clone + Eq + Hash> Eq for UniqueList<T> {}

// ============================================================================
// TESTS
// ============================================================================
