//! Short-term and long-term tabu memory.

use std::collections::{BTreeSet, VecDeque};

use crate::model::{DeviceId, SiteId};
use crate::solution::{Axis, Move};

/// Search phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intensify,
    Diversify,
}

/// Bounded FIFO of recently applied `(device, axis)` moves.
#[derive(Debug, Clone)]
pub struct TabuList {
    entries: VecDeque<(DeviceId, Axis)>,
    capacity: usize,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a move key, evicting the oldest entry when full. A zero
    /// capacity list stays empty.
    pub fn push(&mut self, key: (DeviceId, Axis)) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(key);
    }

    pub fn contains(&self, key: &(DeviceId, Axis)) -> bool {
        self.entries.contains(key)
    }

    /// Whether the move that generated a solution is tabu.
    pub fn forbids(&self, mv: Option<&Move>) -> bool {
        mv.is_some_and(|m| self.contains(&m.key()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sites the search has already exploited and should steer away from.
#[derive(Debug, Clone, Default)]
pub struct SiteMemory {
    sites: BTreeSet<SiteId>,
}

impl SiteMemory {
    pub fn extend<'a>(&mut self, sites: impl IntoIterator<Item = &'a SiteId>) {
        self.sites.extend(sites.into_iter().copied());
    }

    pub fn sites(&self) -> &BTreeSet<SiteId> {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_eviction() {
        let mut list = TabuList::new(2);
        list.push((1, Axis::Site));
        list.push((2, Axis::Config));
        list.push((3, Axis::Site));
        assert_eq!(list.len(), 2);
        assert!(!list.contains(&(1, Axis::Site)), "oldest entry must go first");
        assert!(list.contains(&(2, Axis::Config)));
        assert!(list.contains(&(3, Axis::Site)));
    }

    #[test]
    fn test_axis_is_part_of_key() {
        let mut list = TabuList::new(4);
        list.push((7, Axis::Site));
        assert!(!list.contains(&(7, Axis::Config)));
    }

    #[test]
    fn test_zero_capacity() {
        let mut list = TabuList::new(0);
        list.push((1, Axis::Site));
        assert!(list.is_empty());
    }

    #[test]
    fn test_site_memory_deduplicates() {
        let mut memory = SiteMemory::default();
        memory.extend(&[3, 1]);
        memory.extend(&[1, 4]);
        assert_eq!(memory.sites().iter().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
    }
}
