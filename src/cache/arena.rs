//! Record Arena Module
//!
//! Slot storage for chain records, addressed by generation-checked handles.

// == Record Handle ==
/// Stable reference to a slot in the arena.
///
/// A handle stays valid until the record it points at is removed. The slot
/// generation is bumped on removal, so a stale handle never resolves to a
/// record that later reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHandle {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

// == Arena ==
/// Owns every record of a cache. Vacated slots are recycled through a free list.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores an item and returns its handle.
    pub(crate) fn insert(&mut self, item: T) -> RecordHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.item = Some(item);
            return RecordHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        RecordHandle {
            index,
            generation: 0,
        }
    }

    /// Removes and returns the item behind `handle`, if it is still live.
    pub(crate) fn remove(&mut self, handle: RecordHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(item)
    }

    pub(crate) fn get(&self, handle: RecordHandle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: RecordHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    pub(crate) fn contains(&self, handle: RecordHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live items.
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
