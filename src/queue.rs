//! Random selection without immediate repeats.
//!
//! [`ShuffledQueue`] hands out every item once, in shuffled order, before any
//! item comes round again. When it runs dry it reshuffles the full set; the
//! first item of the new round is never the one just handed out, so two
//! consecutive posts never share a caption or a background unless there is
//! only one to choose from.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Shuffled round-robin over a fixed set of items.
#[derive(Debug, Clone)]
pub struct ShuffledQueue<T> {
    items: Vec<T>,
    pending: Vec<T>,
    last: Option<T>,
    rng: StdRng,
}

impl<T: Clone + PartialEq> ShuffledQueue<T> {
    /// Seeded queue. Equal seeds and items give equal sequences.
    pub fn with_seed(items: Vec<T>, seed: u64) -> Self {
        Self::with_rng(items, StdRng::seed_from_u64(seed))
    }

    /// Queue seeded from system entropy.
    pub fn from_entropy(items: Vec<T>) -> Self {
        Self::with_rng(items, StdRng::from_entropy())
    }

    fn with_rng(items: Vec<T>, rng: StdRng) -> Self {
        Self {
            items,
            pending: Vec::new(),
            last: None,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next item, or `None` when the queue was built empty.
    pub fn next_item(&mut self) -> Option<T> {
        if self.pending.is_empty() {
            self.refill();
        }
        let item = self.pending.pop()?;
        self.last = Some(item.clone());
        Some(item)
    }

    fn refill(&mut self) {
        self.pending = self.items.clone();
        self.pending.shuffle(&mut self.rng);
        // `pending` pops from the back; keep the previous item off the top.
        let Some(last) = &self.last else {
            return;
        };
        if self.pending.last() == Some(last) {
            if let Some(swap) = self.pending.iter().position(|item| item != last) {
                let top = self.pending.len() - 1;
                self.pending.swap(swap, top);
            }
        }
    }
}

impl<T: Clone + PartialEq> Iterator for ShuffledQueue<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.next_item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn empty_queue_yields_nothing() {
        let mut q: ShuffledQueue<u32> = ShuffledQueue::with_seed(vec![], 1);
        assert!(q.is_empty());
        assert_eq!(q.next_item(), None);
    }

    #[test]
    fn each_round_is_a_permutation() {
        let items: Vec<u32> = (0..10).collect();
        let mut q = ShuffledQueue::with_seed(items.clone(), 7);
        for _ in 0..5 {
            let round: HashSet<u32> = (0..10).map(|_| q.next_item().unwrap()).collect();
            assert_eq!(round.len(), 10);
        }
    }

    #[test]
    fn no_immediate_repeat_across_rounds() {
        for seed in 0..50 {
            let mut q = ShuffledQueue::with_seed(vec!['a', 'b', 'c'], seed);
            let drawn: Vec<char> = (0..60).map(|_| q.next_item().unwrap()).collect();
            for pair in drawn.windows(2) {
                assert_ne!(pair[0], pair[1], "seed {seed}: {drawn:?}");
            }
        }
    }

    #[test]
    fn two_items_alternate() {
        let mut q = ShuffledQueue::with_seed(vec![1, 2], 3);
        let drawn: Vec<i32> = q.by_ref().take(10).collect();
        for pair in drawn.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn single_item_repeats() {
        let mut q = ShuffledQueue::with_seed(vec!["only"], 9);
        assert_eq!(q.next_item(), Some("only"));
        assert_eq!(q.next_item(), Some("only"));
    }

    #[test]
    fn same_seed_same_sequence() {
        let a: Vec<u32> = ShuffledQueue::with_seed((0..20).collect(), 42).take(50).collect();
        let b: Vec<u32> = ShuffledQueue::with_seed((0..20).collect(), 42).take(50).collect();
        assert_eq!(a, b);
    }
}
