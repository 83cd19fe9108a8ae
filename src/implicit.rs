//! Implicit baseline: the raw bits with no index at all.
//!
//! Zero space overhead, linear-time queries. Serves as the correctness
//! oracle in the test suite and the speed baseline in the benchmarks
//! for [`crate::Rrr`].

use crate::container::BitContainer;

/// An uncompressed bit index: a copy of the input and nothing else.
#[derive(Clone, Debug)]
pub struct ImplicitIndex {
    bits: BitContainer,
}

impl ImplicitIndex {
    /// Create a baseline index over a copy of `bits`.
    pub fn new(bits: &BitContainer) -> Self {
        Self { bits: bits.clone() }
    }

    /// Length of the sequence in bits.
    pub fn len(&self) -> u64 {
        self.bits.len()
    }

    /// Return true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Return bit `i`. O(1).
    pub fn access(&self, i: u64) -> bool {
        self.bits.get8(1, i) == 1
    }

    /// Linear-time rank: O(n).
    pub fn rank1(&self, i: u64) -> u64 {
        assert!(
            i <= self.bits.len(),
            "rank index out of range: [{i}] (length {})",
            self.bits.len()
        );
        let mut count = 0u64;
        let mut p = 0u64;
        while p < i {
            let take = (i - p).min(64) as u8;
            count += u64::from(self.bits.get64(take, p).count_ones());
            p += u64::from(take);
        }
        count
    }

    /// Linear-time rank of zeros: O(n).
    pub fn rank0(&self, i: u64) -> u64 {
        i - self.rank1(i)
    }

    /// Linear-time select: O(n).
    pub fn select1(&self, mut k: u64) -> Option<u64> {
        for i in 0..self.bits.len() {
            if self.access(i) {
                if k == 0 {
                    return Some(i);
                }
                k -= 1;
            }
        }
        None
    }

    /// Linear-time select of zeros: O(n).
    pub fn select0(&self, mut k: u64) -> Option<u64> {
        for i in 0..self.bits.len() {
            if !self.access(i) {
                if k == 0 {
                    return Some(i);
                }
                k -= 1;
            }
        }
        None
    }
}
