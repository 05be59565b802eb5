// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and sorting of the transaction list behind the payments view.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::error::Error;
use crate::models::{Category, Transaction, TxKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl KindFilter {
    fn accepts(&self, kind: TxKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Credit => kind == TxKind::Credit,
            KindFilter::Debit => kind == TxKind::Debit,
        }
    }
}

impl FromStr for KindFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(KindFilter::All),
            "credit" => Ok(KindFilter::Credit),
            "debit" => Ok(KindFilter::Debit),
            other => Err(Error::InvalidFilter(format!(
                "unknown type '{}', expected all, credit or debit",
                other
            ))),
        }
    }
}

/// How far back from the reference date records are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Year,
}

impl DateRange {
    /// The earliest date kept, or `None` when the range is unbounded.
    ///
    /// Month arithmetic clamps to the last valid day, so a month back from
    /// March 31st is the last day of February.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        let cutoff = match self {
            DateRange::All => return None,
            DateRange::Week => today.checked_sub_days(Days::new(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
            DateRange::Year => today.checked_sub_months(Months::new(12)),
        };
        Some(cutoff.unwrap_or(NaiveDate::MIN))
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            other => Err(Error::InvalidFilter(format!(
                "unknown date range '{}', expected all, week, month or year",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Ok(CategoryFilter::Only(s.parse()?))
    }
}

/// The kind, category and date range constraints applied together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: KindFilter,
    pub range: DateRange,
    pub category: CategoryFilter,
}

impl FilterSpec {
    fn keeps(&self, tx: &Transaction, cutoff: Option<NaiveDate>) -> bool {
        if !self.kind.accepts(tx.kind) {
            return false;
        }
        if let CategoryFilter::Only(c) = self.category {
            if tx.category != c {
                return false;
            }
        }
        match cutoff {
            Some(cutoff) => tx.date >= cutoff,
            None => true,
        }
    }

    /// Merge a partial update, leaving unset fields as they are.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(range) = patch.range {
            self.range = range;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub kind: Option<KindFilter>,
    pub range: Option<DateRange>,
    pub category: Option<CategoryFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Amount,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            _ => Err(Error::UnknownSortField(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidFilter(format!(
                "unknown sort order '{}', expected asc or desc",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            field: SortField::Date,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Clicking the current field while it is descending flips it to
    /// ascending; anything else sorts `field` descending.
    pub fn toggle(&self, field: SortField) -> SortSpec {
        let order = if self.field == field && self.order == SortOrder::Desc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        SortSpec { field, order }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ord = match self.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Build the ordered view of `records` shown for `filters` and `sort`.
///
/// `today` is the single reference date for the range cutoff. The sort is
/// stable in both directions: records with equal keys keep their input order.
pub fn filter_and_sort(
    records: &[Transaction],
    filters: &FilterSpec,
    sort: &SortSpec,
    today: NaiveDate,
) -> Vec<Transaction> {
    let cutoff = filters.range.cutoff(today);
    let mut view: Vec<Transaction> = records
        .iter()
        .filter(|tx| filters.keeps(tx, cutoff))
        .cloned()
        .collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(id: u64, kind: TxKind, amount: i64, category: Category, date: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId(id),
            kind,
            amount: Decimal::from(amount),
            description: format!("tx {}", id),
            category,
            date,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, TxKind::Credit, 50000, Category::Salary, d(2024, 2, 15)),
            tx(2, TxKind::Debit, 15000, Category::Bills, d(2024, 2, 14)),
            tx(3, TxKind::Debit, 5000, Category::Bills, d(2024, 2, 13)),
        ]
    }

    fn ids(view: &[Transaction]) -> Vec<u64> {
        view.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn debit_filter_keeps_both_bills_in_order() {
        let filters = FilterSpec {
            kind: KindFilter::Debit,
            ..Default::default()
        };
        let by_amount = SortSpec {
            field: SortField::Amount,
            order: SortOrder::Desc,
        };
        let view = filter_and_sort(&sample(), &filters, &by_amount, d(2024, 2, 20));
        assert_eq!(ids(&view), vec![2, 3]);
    }

    #[test]
    fn category_filter_keeps_salary_only() {
        let filters = FilterSpec {
            category: CategoryFilter::Only(Category::Salary),
            ..Default::default()
        };
        let view = filter_and_sort(&sample(), &filters, &SortSpec::default(), d(2024, 2, 20));
        assert_eq!(ids(&view), vec![1]);
    }

    #[test]
    fn week_range_is_inclusive_of_cutoff() {
        let filters = FilterSpec {
            range: DateRange::Week,
            ..Default::default()
        };
        // cutoff is 2024-02-14
        let view = filter_and_sort(&sample(), &filters, &SortSpec::default(), d(2024, 2, 21));
        assert_eq!(ids(&view), vec![1, 2]);
    }

    #[test]
    fn month_cutoff_clamps_to_end_of_february() {
        assert_eq!(DateRange::Month.cutoff(d(2024, 3, 31)), Some(d(2024, 2, 29)));
        assert_eq!(DateRange::Year.cutoff(d(2024, 2, 29)), Some(d(2023, 2, 28)));
        assert_eq!(DateRange::All.cutoff(d(2024, 2, 29)), None);
    }

    #[test]
    fn date_sort_orders_chronologically() {
        let asc = SortSpec {
            field: SortField::Date,
            order: SortOrder::Asc,
        };
        let view = filter_and_sort(&sample(), &FilterSpec::default(), &asc, d(2024, 3, 1));
        assert_eq!(ids(&view), vec![3, 2, 1]);

        let view = filter_and_sort(
            &sample(),
            &FilterSpec::default(),
            &SortSpec::default(),
            d(2024, 3, 1),
        );
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let day = d(2024, 1, 1);
        let records = vec![
            tx(1, TxKind::Debit, 10, Category::Food, day),
            tx(2, TxKind::Debit, 20, Category::Food, day),
            tx(3, TxKind::Debit, 10, Category::Food, day),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sort = SortSpec {
                field: SortField::Date,
                order,
            };
            let view = filter_and_sort(&records, &FilterSpec::default(), &sort, day);
            assert_eq!(ids(&view), vec![1, 2, 3]);
        }

        let desc_amount = SortSpec {
            field: SortField::Amount,
            order: SortOrder::Desc,
        };
        let view = filter_and_sort(&records, &FilterSpec::default(), &desc_amount, day);
        assert_eq!(ids(&view), vec![2, 1, 3]);
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        assert_eq!(
            "payee".parse::<SortField>().unwrap_err(),
            Error::UnknownSortField("payee".into())
        );
        assert_eq!(" Amount ".parse::<SortField>().unwrap(), SortField::Amount);
    }

    #[test]
    fn toggle_flips_only_a_descending_current_field() {
        let current = SortSpec::default();
        let flipped = current.toggle(SortField::Date);
        assert_eq!(flipped.order, SortOrder::Asc);
        assert_eq!(flipped.toggle(SortField::Date).order, SortOrder::Desc);
        assert_eq!(
            flipped.toggle(SortField::Amount),
            SortSpec {
                field: SortField::Amount,
                order: SortOrder::Desc
            }
        );
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut spec = FilterSpec {
            kind: KindFilter::Credit,
            range: DateRange::Year,
            category: CategoryFilter::All,
        };
        spec.apply(FilterPatch {
            category: Some(CategoryFilter::Only(Category::Bills)),
            ..Default::default()
        });
        assert_eq!(spec.kind, KindFilter::Credit);
        assert_eq!(spec.range, DateRange::Year);
        assert_eq!(spec.category, CategoryFilter::Only(Category::Bills));
    }
}
