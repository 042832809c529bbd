//! Segment trees used by edge routing.
//!
//! [`PointSetMinTree`] answers "nearest position whose value is below a
//! threshold" queries for the main-column sweep. [`RangeAssignMaxTree`] is a
//! lazy range-assignment / range-maximum tree used to pack parallel edge
//! segments inside a column.

/// Point-update tree over positions `0..size` keeping a minimum per subtree.
///
/// Values start at `initial`; `set` overwrites a single position. The
/// directional queries scan for the nearest position holding a value less
/// than a threshold, which the routing sweep uses to find a free edge column
/// next to a blocked one.
#[derive(Debug, Clone)]
pub struct PointSetMinTree {
    size: usize,
    node_min: Vec<i32>,
}

impl PointSetMinTree {
    pub fn new(size: usize, initial: i32) -> Self {
        Self {
            size: size.max(1),
            node_min: vec![initial; size.max(1) * 4],
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn set(&mut self, position: usize, value: i32) {
        if position < self.size {
            self.set_in(1, 0, self.size, position, value);
        }
    }

    pub fn value_at(&self, position: usize) -> i32 {
        let mut node = 1;
        let (mut lo, mut hi) = (0, self.size);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if position < mid {
                node = 2 * node;
                hi = mid;
            } else {
                node = 2 * node + 1;
                lo = mid;
            }
        }
        self.node_min[node]
    }

    /// Rightmost position in `[0, position]` whose value is less than
    /// `value`, if any.
    pub fn rightmost_less_than(&self, position: usize, value: i32) -> Option<usize> {
        self.rightmost_in(1, 0, self.size, position, value)
    }

    /// Leftmost position in `[position, size)` whose value is less than
    /// `value`, if any.
    pub fn leftmost_less_than(&self, position: usize, value: i32) -> Option<usize> {
        self.leftmost_in(1, 0, self.size, position, value)
    }

    fn set_in(&mut self, node: usize, lo: usize, hi: usize, position: usize, value: i32) {
        if hi - lo == 1 {
            self.node_min[node] = value;
            return;
        }
        let mid = lo + (hi - lo) / 2;
        if position < mid {
            self.set_in(2 * node, lo, mid, position, value);
        } else {
            self.set_in(2 * node + 1, mid, hi, position, value);
        }
        self.node_min[node] = self.node_min[2 * node].min(self.node_min[2 * node + 1]);
    }

    fn rightmost_in(
        &self,
        node: usize,
        lo: usize,
        hi: usize,
        limit: usize,
        value: i32,
    ) -> Option<usize> {
        if lo > limit || self.node_min[node] >= value {
            return None;
        }
        if hi - lo == 1 {
            return Some(lo);
        }
        let mid = lo + (hi - lo) / 2;
        self.rightmost_in(2 * node + 1, mid, hi, limit, value)
            .or_else(|| self.rightmost_in(2 * node, lo, mid, limit, value))
    }

    fn leftmost_in(
        &self,
        node: usize,
        lo: usize,
        hi: usize,
        limit: usize,
        value: i32,
    ) -> Option<usize> {
        if hi <= limit || self.node_min[node] >= value {
            return None;
        }
        if hi - lo == 1 {
            return Some(lo);
        }
        let mid = lo + (hi - lo) / 2;
        self.leftmost_in(2 * node, lo, mid, limit, value)
            .or_else(|| self.leftmost_in(2 * node + 1, mid, hi, limit, value))
    }
}

/// Lazy segment tree over `0..size` supporting range assignment and range
/// maximum. Assignment makes a whole range uniform, so queries never need to
/// materialize pending tags: a tagged subtree answers with its tag directly.
#[derive(Debug, Clone)]
pub struct RangeAssignMaxTree {
    size: usize,
    node_max: Vec<i32>,
    pending: Vec<Option<i32>>,
}

impl RangeAssignMaxTree {
    pub fn new(size: usize, initial: i32) -> Self {
        let size = size.max(1);
        Self {
            size,
            node_max: vec![initial; size * 4],
            pending: vec![None; size * 4],
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Assign `value` to every position in `[from, to)`.
    pub fn assign(&mut self, from: usize, to: usize, value: i32) {
        let to = to.min(self.size);
        if from >= to {
            return;
        }
        self.assign_in(1, 0, self.size, from, to, value);
    }

    /// Maximum over `[from, to)`. `from >= to` yields `i32::MIN`.
    pub fn range_max(&self, from: usize, to: usize) -> i32 {
        let to = to.min(self.size);
        if from >= to {
            return i32::MIN;
        }
        self.max_in(1, 0, self.size, from, to)
    }

    fn assign_in(&mut self, node: usize, lo: usize, hi: usize, from: usize, to: usize, value: i32) {
        if from <= lo && hi <= to {
            self.node_max[node] = value;
            self.pending[node] = Some(value);
            return;
        }
        if let Some(tag) = self.pending[node].take() {
            self.node_max[2 * node] = tag;
            self.pending[2 * node] = Some(tag);
            self.node_max[2 * node + 1] = tag;
            self.pending[2 * node + 1] = Some(tag);
        }
        let mid = lo + (hi - lo) / 2;
        if from < mid {
            self.assign_in(2 * node, lo, mid, from, to.min(mid), value);
        }
        if to > mid {
            self.assign_in(2 * node + 1, mid, hi, from.max(mid), to, value);
        }
        self.node_max[node] = self.node_max[2 * node].max(self.node_max[2 * node + 1]);
    }

    fn max_in(&self, node: usize, lo: usize, hi: usize, from: usize, to: usize) -> i32 {
        if from <= lo && hi <= to {
            return self.node_max[node];
        }
        // A pending tag means the whole node range is uniform.
        if let Some(tag) = self.pending[node] {
            return tag;
        }
        let mid = lo + (hi - lo) / 2;
        let mut best = i32::MIN;
        if from < mid {
            best = best.max(self.max_in(2 * node, lo, mid, from, to.min(mid)));
        }
        if to > mid {
            best = best.max(self.max_in(2 * node + 1, mid, hi, from.max(mid), to));
        }
        best
    }
}
