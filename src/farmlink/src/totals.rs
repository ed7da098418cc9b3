//! Per fill type quantity totals for one save.

use crate::fill_type::FillTypeCode;
use std::collections::BTreeMap;

/// Accumulated quantity per fill type code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceTotals {
    amounts: BTreeMap<FillTypeCode, f64>,
}

impl ResourceTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running total for `code`
    pub fn add(&mut self, code: FillTypeCode, amount: f64) {
        *self.amounts.entry(code).or_insert(0.0) += amount;
    }

    pub fn get(&self, code: FillTypeCode) -> Option<f64> {
        self.amounts.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FillTypeCode, f64)> + '_ {
        self.amounts.iter().map(|(code, amount)| (*code, *amount))
    }
}
