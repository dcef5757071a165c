//! # Slot Arena
//!
//! Fixed-capacity storage for objects that are frequently allocated and freed,
//! addressed by generational handles.
//!
//! A [`SlotId`] is split into two parts:
//! - Lower 32 bits: index into the storage array
//! - Upper 32 bits: generation counter, bumped every time the slot is freed
//!
//! A handle that outlived its object fails every lookup instead of silently
//! addressing whatever now lives in the reused slot.

/// Generational handle to an object stored in a [`SlotArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SlotId(u64);

impl SlotId {
    /// Creates a slot ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the packed raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A fixed-capacity arena handing out generational [`SlotId`]s.
///
/// # Thread Safety
///
/// The arena is NOT thread-safe. It belongs to the consumer thread.
pub struct SlotArena<T> {
    slots: Box<[Slot<T>]>,
    /// Indices of available slots.
    free_list: Vec<u32>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an arena with the specified capacity.
    ///
    /// All slots are allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or does not fit in 32 bits.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let capacity = u32::try_from(capacity).expect("Capacity must fit in 32 bits");

        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();

        Self {
            slots: slots.into_boxed_slice(),
            free_list: (0..capacity).rev().collect(),
            len: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live objects.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no object is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a value, returning its handle, or `None` if the arena is full.
    pub fn insert(&mut self, value: T) -> Option<SlotId> {
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        self.len += 1;
        Some(SlotId::new(index, slot.generation))
    }

    /// Removes and returns the value behind `id`.
    ///
    /// Returns `None` for stale or foreign handles.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
        self.len -= 1;
        Some(value)
    }

    /// Returns true if `id` refers to a live object.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Gets a reference to a live object.
    #[inline]
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation == id.generation() {
            slot.value.as_ref()
        } else {
            None
        }
    }

    /// Gets a mutable reference to a live object.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation == id.generation() {
            slot.value.as_mut()
        } else {
            None
        }
    }

    /// Removes every object, invalidating all outstanding handles.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len() as u32).rev());
        self.len = 0;
    }

    /// Iterates over all live objects.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|v| (SlotId::new(index as u32, slot.generation), v))
        })
    }
}
