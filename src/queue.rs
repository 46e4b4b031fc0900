use crate::error::{Error, Result};
use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Anything that can be ordered in a [`PriorityQueue`].
pub trait Weighted {
    fn weight(&self) -> u64;
}

#[derive(Debug, Derivative)]
#[derivative(
    PartialEq(bound = ""),
    Eq(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = "")
)]
struct Entry<T> {
    weight: u64,

    // insertion order, so equal weights pop first-in first-out
    seq: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    item: T,
}

/// Binary min-heap keyed on [`Weighted::weight`].
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    pushed: u64,
}

impl<T: Weighted> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let entry = Entry {
            weight: item.weight(),
            seq: self.pushed,
            item,
        };
        self.pushed += 1;
        self.heap.push(Reverse(entry));
    }

    /// Removes the lightest item.
    pub fn pop_min(&mut self) -> Result<T> {
        self.heap
            .pop()
            .map(|Reverse(e)| e.item)
            .ok_or(Error::EmptyQueue)
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T: Weighted> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Weighted> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pq = Self::new();
        for item in iter {
            pq.push(item);
        }
        pq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct W(u64, char);

    impl Weighted for W {
        fn weight(&self) -> u64 {
            self.0
        }
    }

    fn drain(pq: &mut PriorityQueue<W>) -> Vec<u64> {
        let mut out = Vec::new();
        while !pq.is_empty() {
            out.push(pq.pop_min().unwrap().0);
        }
        out
    }

    #[test]
    fn empty_pop() {
        let mut pq: PriorityQueue<W> = PriorityQueue::new();
        assert_eq!(pq.size(), 0);
        assert!(matches!(pq.pop_min(), Err(Error::EmptyQueue)));
    }

    #[test]
    fn single() {
        let mut pq: PriorityQueue<_> = [W(42, 'a')].into_iter().collect();
        assert_eq!(pq.size(), 1);
        assert_eq!(pq.pop_min().unwrap(), W(42, 'a'));
        assert!(matches!(pq.pop_min(), Err(Error::EmptyQueue)));
    }

    #[test]
    fn non_decreasing() {
        for n in 0..64u64 {
            // a scrambled but deterministic insertion order
            let mut pq: PriorityQueue<_> = (0..n).map(|i| W((i * 37 + 11) % 17, 'x')).collect();
            assert_eq!(pq.size(), n as usize);

            let out = drain(&mut pq);
            assert_eq!(out.len(), n as usize);
            assert!(out.windows(2).all(|w| w[0] <= w[1]), "{:?}", out);
        }
    }

    #[test]
    fn ties_pop_in_insertion_order() {
        let mut pq = PriorityQueue::new();
        pq.push(W(3, 'a'));
        pq.push(W(1, 'b'));
        pq.push(W(3, 'c'));
        pq.push(W(1, 'd'));

        let order: Vec<char> = (0..4).map(|_| pq.pop_min().unwrap().1).collect();
        assert_eq!(order, vec!['b', 'd', 'a', 'c']);
    }

    #[test]
    fn interleaved() {
        let mut pq = PriorityQueue::new();
        pq.push(W(5, 'a'));
        pq.push(W(2, 'b'));
        assert_eq!(pq.pop_min().unwrap().0, 2);
        pq.push(W(1, 'c'));
        pq.push(W(9, 'd'));
        assert_eq!(drain(&mut pq), vec![1, 5, 9]);
    }
}
