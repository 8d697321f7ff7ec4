use super::formula::index_map::{Idx, IdxMap};

/// An indexed binary max-heap over keys drawn from a fixed universe, with
/// floating-point priorities (spec §4.1). Grounded on the teacher's
/// `ActivityQueue`/`IdxHeap` (array-backed heap, a side table mapping keys
/// to their heap position) generalized with genuine key removal and
/// re-insertion, which the teacher's heaps don't need since minisat never
/// un-removes a variable mid-heap-lifetime the way the three deciders here
/// do across decide()/bcp_update()/backtrack_update().
pub struct PQueue<K: Idx + Copy> {
    heap: Vec<K>,
    pos: IdxMap<K, usize>,
    score: IdxMap<K, f64>,
}

impl<K: Idx + Copy> PQueue<K> {
    /// Builds the heap in linear time from every key in the universe and
    /// its initial score. Keys with score 0 still occupy the heap.
    pub fn build(entries: Vec<(K, f64)>) -> Self {
        let mut score = IdxMap::new();
        let mut heap = Vec::with_capacity(entries.len());
        for (k, s) in entries {
            score.insert(&k, s);
            heap.push(k);
        }

        let mut pos = IdxMap::new();
        for (i, k) in heap.iter().enumerate() {
            pos.insert(k, i);
        }

        let mut pq = PQueue { heap, pos, score };
        let n = pq.heap.len();
        for i in (0..n / 2).rev() {
            pq.sift_down(i);
        }
        pq
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, k: &K) -> bool {
        self.pos.get(k).is_some()
    }

    pub fn score_of(&self, k: &K) -> f64 {
        *self.score.get(k).unwrap_or(&0.0)
    }

    /// Returns the key with the largest score, or `None` if empty.
    pub fn pop_max(&mut self) -> Option<K> {
        if self.heap.is_empty() {
            return None;
        }

        let top = self.heap[0];
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        self.heap.pop();
        self.pos.remove(&top);

        if !self.heap.is_empty() {
            self.pos.insert(&self.heap[0], 0);
            self.sift_down(0);
        }

        Some(top)
    }

    /// Logically removes `key`; a no-op if it is already absent.
    pub fn remove(&mut self, key: K) {
        let at = match self.pos.get(&key) {
            Some(&p) => p,
            None => return,
        };

        let last = self.heap.len() - 1;
        self.heap.swap(at, last);
        self.heap.pop();
        self.pos.remove(&key);

        if at < self.heap.len() {
            self.pos.insert(&self.heap[at], at);
            self.sift_down(at);
            self.sift_up(at);
        }
    }

    /// Re-inserts a previously removed key, with priority initialized to 0
    /// then bumped by `value`.
    pub fn add(&mut self, key: K, value: f64) {
        if self.contains(&key) {
            return;
        }
        self.score.insert(&key, 0.0);
        let at = self.heap.len();
        self.heap.push(key);
        self.pos.insert(&key, at);
        self.increase(key, value);
    }

    /// Adds `delta` (possibly negative) to `key`'s priority and restores
    /// the heap invariant. A no-op if `key` is currently removed.
    pub fn increase(&mut self, key: K, delta: f64) {
        let new_score = self.score_of(&key) + delta;
        self.score.insert(&key, new_score);

        if let Some(&at) = self.pos.get(&key) {
            self.sift_up(at);
            self.sift_down(at);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.score_of(&self.heap[i]) > self.score_of(&self.heap[parent]) {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = 2 * i + 1;
            let r = 2 * i + 2;
            let mut largest = i;
            if l < self.heap.len() && self.score_of(&self.heap[l]) > self.score_of(&self.heap[largest]) {
                largest = l;
            }
            if r < self.heap.len() && self.score_of(&self.heap[r]) > self.score_of(&self.heap[largest]) {
                largest = r;
            }
            if largest == i {
                break;
            }
            self.swap(i, largest);
            i = largest;
        }
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos.insert(&self.heap[i], i);
        self.pos.insert(&self.heap[j], j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::formula::Var;

    fn v(id: u32) -> Var {
        Var::new(id)
    }

    #[test]
    fn pop_max_returns_descending_scores() {
        let mut pq = PQueue::build(vec![(v(1), 3.0), (v(2), 5.0), (v(3), 1.0), (v(4), 0.0)]);
        assert_eq!(pq.pop_max(), Some(v(2)));
        assert_eq!(pq.pop_max(), Some(v(1)));
        assert_eq!(pq.pop_max(), Some(v(3)));
        assert_eq!(pq.pop_max(), Some(v(4)));
        assert_eq!(pq.pop_max(), None);
    }

    #[test]
    fn remove_then_pop_skips_key() {
        let mut pq = PQueue::build(vec![(v(1), 1.0), (v(2), 2.0), (v(3), 3.0)]);
        pq.remove(v(3));
        assert_eq!(pq.pop_max(), Some(v(2)));
        assert_eq!(pq.pop_max(), Some(v(1)));
        assert_eq!(pq.pop_max(), None);
    }

    #[test]
    fn add_reinserts_a_removed_key() {
        let mut pq = PQueue::build(vec![(v(1), 1.0), (v(2), 2.0)]);
        pq.remove(v(1));
        pq.add(v(1), 10.0);
        assert_eq!(pq.pop_max(), Some(v(1)));
        assert_eq!(pq.pop_max(), Some(v(2)));
    }

    #[test]
    fn increase_can_promote_a_key_to_the_top() {
        let mut pq = PQueue::build(vec![(v(1), 1.0), (v(2), 2.0), (v(3), 3.0)]);
        pq.increase(v(1), 10.0);
        assert_eq!(pq.pop_max(), Some(v(1)));
    }
}
