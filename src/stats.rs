// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Transaction, TxKind};

/// Number of calendar months in the trailing trend, current month included.
pub const TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }

    fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TxKind::Credit => self.income += tx.amount,
            TxKind::Debit => self.expenses += tx.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub label: String, // e.g. "Feb 24"
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionStats {
    pub totals: Totals,
    pub category_data: Vec<CategoryTotal>,
    pub monthly_data: Vec<MonthlyBucket>,
}

impl TransactionStats {
    /// Summarize `records`, with the monthly trend ending at `today`'s month.
    ///
    /// Returns `None` for an empty slice. A non-empty slice always yields
    /// [`TREND_MONTHS`] buckets, oldest first, zero-filled where no record
    /// falls in a month.
    ///
    /// Category values add credit and debit amounts together; they are
    /// volumes, not signed totals.
    pub fn compute(records: &[Transaction], today: NaiveDate) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut totals = Totals::default();
        for tx in records {
            totals.add(tx);
        }

        let mut category_data: Vec<CategoryTotal> = Vec::new();
        for tx in records {
            match category_data.iter_mut().find(|c| c.category == tx.category) {
                Some(existing) => existing.value += tx.amount,
                None => category_data.push(CategoryTotal {
                    category: tx.category,
                    value: tx.amount,
                }),
            }
        }

        let monthly_data = (0..TREND_MONTHS)
            .rev()
            .map(|back| month_bucket(records, today, back))
            .collect();

        Some(TransactionStats {
            totals,
            category_data,
            monthly_data,
        })
    }

    /// Each category's share of the summed category volume, in percent.
    pub fn category_percentages(&self) -> Vec<(Category, Decimal)> {
        let total: Decimal = self.category_data.iter().map(|c| c.value).sum();
        self.category_data
            .iter()
            .map(|c| {
                let pct = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    c.value * Decimal::ONE_HUNDRED / total
                };
                (c.category, pct)
            })
            .collect()
    }
}

/// The (year, month) `back` calendar months before `today`'s month.
fn months_back(today: NaiveDate, back: usize) -> (i32, u32) {
    let index = today.year() * 12 + today.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn month_bucket(records: &[Transaction], today: NaiveDate, back: usize) -> MonthlyBucket {
    let (year, month) = months_back(today, back);
    let mut sums = Totals::default();
    for tx in records
        .iter()
        .filter(|tx| tx.date.year() == year && tx.date.month() == month)
    {
        sums.add(tx);
    }
    let label = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.format("%b %y").to_string())
        .unwrap_or_else(|| format!("{:02}/{}", month, year));

    MonthlyBucket {
        label,
        year,
        month,
        income: sums.income,
        expenses: sums.expenses,
    }
}
