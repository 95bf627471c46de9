//! Fixed-capacity entity pools
//!
//! Slots are recycled through a free list. Despawned slots stay allocated
//! but inactive, and are skipped by every iterator. A full pool refuses new
//! spawns silently; callers treat that as backpressure, not an error.

/// Stable reference to a pooled entity.
///
/// The generation changes whenever the slot is freed, so a handle kept
/// past despawn never aliases the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    active: bool,
    generation: u32,
}

#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of inactive slots, popped on spawn
    free_list: Vec<usize>,
    capacity: usize,
    active: usize,
}

impl<T> EntityPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            capacity,
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the active limit. Entities already alive above a lowered
    /// limit are kept; new spawns wait until the count drops.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn has_capacity(&self) -> bool {
        self.active < self.capacity
    }

    /// No active entities
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Allocated slots, active or not
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Activate `value` in a free slot. Returns `None` at capacity.
    pub fn spawn(&mut self, value: T) -> Option<EntityHandle> {
        if !self.has_capacity() {
            return None;
        }
        let index = match self.free_list.pop() {
            Some(i) => {
                let slot = &mut self.slots[i];
                slot.value = value;
                slot.active = true;
                i
            }
            None => {
                self.slots.push(Slot {
                    value,
                    active: true,
                    generation: 0,
                });
                self.slots.len() - 1
            }
        };
        self.active += 1;
        Some(EntityHandle {
            index: index as u32,
            generation: self.slots[index].generation,
        })
    }

    /// Deactivate the entity. Stale handles are ignored; returns whether
    /// anything was removed.
    pub fn despawn(&mut self, handle: EntityHandle) -> bool {
        match self.slots.get_mut(handle.index()) {
            Some(slot) if slot.active && slot.generation == handle.generation => {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(handle.index());
                self.active -= 1;
                true
            }
            _ => false,
        }
    }

    /// Deactivate every entity
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (i, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.active {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(i);
        }
        self.active = 0;
    }

    /// Despawn every active entity for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        for i in 0..self.slots.len() {
            let slot = &mut self.slots[i];
            if slot.active && !keep(&slot.value) {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(i);
                self.active -= 1;
            }
        }
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &mut s.value)
    }

    /// Active entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(i, s)| {
            (
                EntityHandle {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.value,
            )
        })
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| {
                (
                    EntityHandle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.value,
                )
            })
    }

    pub fn for_each_active(&self, mut f: impl FnMut(EntityHandle, &T)) {
        for (handle, value) in self.iter_active() {
            f(handle, value);
        }
    }
}
