// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use hashbrown::HashMap;

use crate::eval::Score;

/// What a stored score says about the true value of its node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Every child was searched inside the window; the score is exact.
    Exact(Score),

    /// The search failed high; the true value is at least this.
    Lower(Score),

    /// The search failed low; the true value is at most this.
    Upper(Score),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableEntry {
    /// Remaining depth the entry was searched to.
    pub depth: u32,
    pub node: NodeKind,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

/// Memoized search results keyed by position fingerprint. A table belongs to exactly one
/// search; it is never shared between workers and never outlives a single decision.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    table: HashMap<u64, TableEntry>,
    stats: TableStats,
}

impl TranspositionTable {
    pub fn new() -> TranspositionTable {
        TranspositionTable::default()
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }

    pub fn get(&mut self, fingerprint: u64) -> Option<TableEntry> {
        let entry = self.table.get(&fingerprint).copied();
        if entry.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }

        entry
    }

    /// Stores an entry. The most recent entry for a fingerprint always wins.
    pub fn put(&mut self, fingerprint: u64, entry: TableEntry) {
        self.stats.stores += 1;
        self.table.insert(fingerprint, entry);
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.stats = TableStats::default();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
