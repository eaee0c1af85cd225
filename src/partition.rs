// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row-interleaved assignment of raster rows to workers.
//!
//! In round `k` the worker of rank `r` owns global row `k * N + r`, so
//! every round produces one contiguous band of `N` rows with every
//! worker doing exactly one row of it.  Only `floor(height / N)` rounds
//! are run; when `N` does not divide the height the trailing rows are
//! never assigned and stay at the buffer's zero default.

/// Where a global row came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// The round in which the row is computed.
    pub round: usize,
    /// The rank that computes it.
    pub rank: usize,
}

/// The interleaving law for a group of a given size over a raster of a
/// given height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Partitioner {
    group_size: usize,
    height: usize,
}

impl Partitioner {
    /// `group_size` must be at least one; the worker group checks this
    /// before building a partitioner.
    pub fn new(group_size: usize, height: usize) -> Self {
        debug_assert!(group_size > 0);
        Partitioner { group_size, height }
    }

    /// Number of workers.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Number of complete rounds, `floor(height / group_size)`.
    pub fn round_plan(&self) -> usize {
        self.height / self.group_size
    }

    /// Rows covered by the plan; everything from here to `height` is
    /// left unpopulated.
    pub fn covered_rows(&self) -> usize {
        self.round_plan() * self.group_size
    }

    /// Rows no worker will ever compute.
    pub fn remainder_rows(&self) -> usize {
        self.height - self.covered_rows()
    }

    /// The global row owned by `rank` in `round`.
    pub fn row_for(&self, round: usize, rank: usize) -> usize {
        round * self.group_size + rank
    }

    /// The inverse of `row_for`; `None` for rows outside the plan.
    pub fn owner_of(&self, row: usize) -> Option<Assignment> {
        if row >= self.covered_rows() {
            return None;
        }
        Some(Assignment {
            round: row / self.group_size,
            rank: row % self.group_size,
        })
    }

    /// Every global row `rank` computes, in round order.
    pub fn rows_of(&self, rank: usize) -> impl Iterator<Item = usize> {
        let group_size = self.group_size;
        (0..self.round_plan()).map(move |round| round * group_size + rank)
    }
}
