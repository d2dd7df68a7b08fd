//! Index-addressed storage for list nodes.
//!
//! A [`Handle`] is a stable index into the arena: the slot it names never
//! moves, and the handle stays valid until that slot is removed. Vacated
//! slots are chained into a free list and recycled by later inserts.
//! Dropping the arena drops every occupied slot exactly once, so teardown
//! never has to walk the pointer graph stored inside the values.

use std::mem;
use std::ops::{Index, IndexMut};

/// Opaque index of an occupied arena slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Handle(usize);

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    /// Instantiates a new, empty [Arena](Arena).
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a value, reusing a vacant slot when one is available.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;

        match self.free {
            Some(index) => {
                match mem::replace(&mut self.slots[index], Slot::Occupied(value)) {
                    Slot::Vacant { next_free } => self.free = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                Handle(index)
            }
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle(self.slots.len() - 1)
            }
        }
    }

    /// Vacates a slot and returns its value. Returns `None` if the handle
    /// does not name an occupied slot.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let next_free = self.free;
        self.free = Some(handle.0);
        self.len -= 1;

        match mem::replace(slot, Slot::Vacant { next_free }) {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &T {
        match &self.slots[handle.0] {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => panic!("handle names a vacant slot: {:?}", handle),
        }
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.0] {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => panic!("handle names a vacant slot: {:?}", handle),
        }
    }
}
