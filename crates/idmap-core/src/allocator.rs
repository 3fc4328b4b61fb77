//! Pick id allocation with recycling.

use std::collections::VecDeque;

use crate::codec::{PickId, ID_SPACE};
use crate::error::{IdMapError, Result};

/// Issues unique pick ids and recycles released ones.
///
/// Released ids are reused (oldest first) before the fresh counter advances.
/// The fresh counter starts at `first_id`, which is at least 1 so the
/// background id is never issued.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    first_id: u32,
    next_fresh: u32,
    recycled: VecDeque<PickId>,
    live: usize,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Creates an allocator whose first fresh id is 1.
    pub fn new() -> Self {
        Self {
            first_id: 1,
            next_fresh: 1,
            recycled: VecDeque::new(),
            live: 0,
        }
    }

    /// Creates an allocator whose first fresh id is `first_id`.
    ///
    /// `first_id` must be in `1..2^24`.
    pub fn with_first_id(first_id: u32) -> Result<Self> {
        if first_id == 0 || first_id >= ID_SPACE {
            return Err(IdMapError::IdOutOfRange(first_id));
        }
        Ok(Self {
            first_id,
            next_fresh: first_id,
            ..Self::new()
        })
    }

    /// Returns a recycled id if one is available, else the next fresh id.
    pub fn allocate(&mut self) -> Result<PickId> {
        let id = if let Some(id) = self.recycled.pop_front() {
            id
        } else {
            if self.next_fresh >= ID_SPACE {
                return Err(IdMapError::IdSpaceExhausted);
            }
            let id = PickId::new(self.next_fresh)?;
            self.next_fresh += 1;
            id
        };
        self.live += 1;
        Ok(id)
    }

    /// Returns a live id to the recycle pool.
    ///
    /// The id must have been issued by this allocator and not yet released.
    pub fn release(&mut self, id: PickId) {
        debug_assert!(
            id.get() >= self.first_id && id.get() < self.next_fresh,
            "released id {id} was never issued"
        );
        debug_assert!(!self.recycled.contains(&id), "id {id} released twice");
        self.live = self.live.saturating_sub(1);
        self.recycled.push_back(id);
    }

    /// Number of issued ids that have not been released.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of released ids waiting for reuse.
    pub fn recycled_count(&self) -> usize {
        self.recycled.len()
    }

    /// The id the next fresh allocation would return.
    pub fn next_fresh(&self) -> u32 {
        self.next_fresh
    }

    /// The floor of the fresh counter.
    pub fn first_id(&self) -> u32 {
        self.first_id
    }

    /// Forgets every issued id and restarts the fresh counter.
    pub fn reset(&mut self) {
        self.next_fresh = self.first_id;
        self.recycled.clear();
        self.live = 0;
    }
}
