// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use log::debug;

/// Capacity never drops below this.
pub const MIN_CAPACITY: usize = 4;
const GROWTH_FACTOR: usize = 2;
const SHRINK_FACTOR: usize = 4;

/// Error type for RefArray operations.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// `index` is not below the current size.
    OutOfBounds { index: usize, size: usize },
    /// Growing the backing storage failed.
    AllocationFailure,
}

/// A growable array with explicit doubling/halving capacity management.
///
/// Capacity is always of the form `MIN_CAPACITY * 2^k`. It doubles when a push finds
/// the array full, and halves (clamped at [`MIN_CAPACITY`]) when a pop leaves it at
/// most a quarter full.
#[derive(Debug, Clone)]
pub struct RefArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> RefArray<T> {
    /// Creates an empty array with [`MIN_CAPACITY`] slots.
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(MIN_CAPACITY),
            capacity: MIN_CAPACITY,
        }
    }

    /// Creates an empty array able to hold at least `size` items without growing.
    ///
    /// The capacity is rounded up to the next `MIN_CAPACITY * 2^k`.
    pub fn with_capacity(size: usize) -> Result<Self, Error> {
        let capacity = size
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or(Error::AllocationFailure)?;
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure)?;
        Ok(Self { items, capacity })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `item`, doubling the capacity first if the array is full.
    pub fn push(&mut self, item: T) -> Result<(), Error> {
        if self.items.len() == self.capacity {
            let grown = self
                .capacity
                .checked_mul(GROWTH_FACTOR)
                .ok_or(Error::AllocationFailure)?;
            self.items
                .try_reserve_exact(grown - self.items.len())
                .map_err(|_| Error::AllocationFailure)?;
            debug!("RefArray: growing {} -> {}", self.capacity, grown);
            self.capacity = grown;
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes and returns the last item.
    ///
    /// If the array is left at most a quarter full the capacity is halved, but never
    /// below [`MIN_CAPACITY`].
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        if self.capacity > MIN_CAPACITY && self.items.len() <= self.capacity / SHRINK_FACTOR {
            let shrunk = (self.capacity / GROWTH_FACTOR).max(MIN_CAPACITY);
            debug!("RefArray: shrinking {} -> {}", self.capacity, shrunk);
            self.capacity = shrunk;
            self.items.shrink_to(shrunk);
        }
        Some(item)
    }

    /// Returns the item at `index`, which must be strictly below [`len`](Self::len).
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        let size = self.items.len();
        self.items.get(index).ok_or(Error::OutOfBounds { index, size })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let size = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, size })
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for RefArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a RefArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
