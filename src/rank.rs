//! Ordinal rank codec for categorical columns.
//!
//! Maps a column's distinct non-empty values (ascending sort order) to
//! ranks `1..=K` so that a mean can be computed over non-numeric data. The
//! mapping is rebuilt each time it is needed and discarded after use.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::{
    classify::{self, ColumnKind},
    dataset::Cell,
};

#[derive(Debug)]
pub struct RankMap {
    by_value: BTreeMap<String, i64>,
    by_rank: BTreeMap<i64, String>,
}

impl RankMap {
    /// Builds the rank mapping over the distinct non-empty values of a
    /// column, using the declared kind's emptiness rule.
    pub fn build(cells: &[Cell], kind: ColumnKind) -> Self {
        let mut by_value = BTreeMap::new();
        let mut by_rank = BTreeMap::new();
        let distinct = cells
            .iter()
            .filter(|cell| !classify::is_empty(cell, kind))
            .flatten()
            .sorted()
            .dedup();
        for (offset, value) in distinct.enumerate() {
            let rank = offset as i64 + 1;
            by_value.insert(value.clone(), rank);
            by_rank.insert(rank, value.clone());
        }
        Self { by_value, by_rank }
    }

    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }

    /// Encodes cells to ranks; empty cells stay empty.
    pub fn encode(&self, cells: &[Cell], kind: ColumnKind) -> Vec<Option<i64>> {
        cells
            .iter()
            .map(|cell| {
                if classify::is_empty(cell, kind) {
                    None
                } else {
                    cell.as_deref().and_then(|v| self.by_value.get(v)).copied()
                }
            })
            .collect()
    }

    /// Decodes a (possibly fractional) rank back to a value by rounding to
    /// the nearest integer rank. Out-of-range ranks fall back to rank 1 so
    /// the codec always yields some existing category.
    pub fn decode_nearest(&self, rank: f64) -> Option<&str> {
        if self.by_rank.is_empty() {
            return None;
        }
        let nearest = rank.round() as i64;
        self.by_rank
            .get(&nearest)
            .or_else(|| self.by_rank.get(&1))
            .map(String::as_str)
    }
}
