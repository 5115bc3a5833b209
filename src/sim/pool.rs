//! Fixed-capacity object pool
//!
//! Every slot is allocated up front. Acquire/release go through a free-list
//! (index stack), so both are O(1) and a slot's identity is stable for the
//! life of the pool. When the pool is exhausted, `acquire` returns `None`
//! and the caller drops the request.

/// Something that can be recycled by an [`ObjectPool`]
pub trait Poolable {
    /// Clear transient state when the slot goes back to the free list
    fn reset(&mut self);
}

#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    slots: Vec<T>,
    in_use: Vec<bool>,
    /// Free slot indices; the next acquire pops from the end
    free: Vec<usize>,
}

impl<T: Poolable> ObjectPool<T> {
    /// Pre-allocate `capacity` instances from `factory`
    pub fn new(capacity: usize, mut factory: impl FnMut(usize) -> T) -> Self {
        let slots = (0..capacity).map(&mut factory).collect();
        Self {
            slots,
            in_use: vec![false; capacity],
            // Reversed so slot 0 is handed out first
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Take a free slot, or `None` if every slot is in use
    pub fn acquire(&mut self) -> Option<(usize, &mut T)> {
        let index = self.free.pop()?;
        self.in_use[index] = true;
        Some((index, &mut self.slots[index]))
    }

    /// Return a slot to the free list. Releasing a free slot is a no-op.
    pub fn release(&mut self, index: usize) -> bool {
        match self.in_use.get_mut(index) {
            Some(used) if *used => {
                *used = false;
                self.slots[index].reset();
                self.free.push(index);
                true
            }
            _ => false,
        }
    }

    pub fn release_all(&mut self) {
        for index in 0..self.slots.len() {
            self.release(index);
        }
    }

    pub fn is_in_use(&self, index: usize) -> bool {
        self.in_use.get(index).copied().unwrap_or(false)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Every slot, in use or not, in index order
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// In-use slots in index order
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.in_use[*i])
    }

    /// In-use slots in index order
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        let in_use = &self.in_use;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| in_use[*i])
    }
}
