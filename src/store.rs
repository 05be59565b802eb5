// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-panel state containers.
//!
//! Each panel follows the same cycle: `start` sets the loading flag and
//! clears the previous error, then either `succeed` replaces the records or
//! `fail` stores an error message and leaves the records alone. The async
//! drivers hold `&mut self` across the request, so one panel never has two
//! mutations in flight.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::filters::{FilterPatch, FilterSpec, SortField, SortSpec, filter_and_sort};
use crate::models::{
    Category, Policy, PolicyStatus, Portfolio, Transaction, TransactionDraft, check_batch,
};
use crate::sources::{PolicySource, PortfolioSource, TransactionSource, with_timeout};
use crate::stats::TransactionStats;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoadStatus {
    fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.is_loading = false;
    }

    fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }
}

/// The payments panel: transactions (newest additions first), the running
/// balance and the current filter and sort selection.
#[derive(Debug, Clone, Default)]
pub struct PaymentsState {
    transactions: Vec<Transaction>,
    balance: Decimal,
    filters: FilterSpec,
    sort: SortSpec,
    status: LoadStatus,
}

impl PaymentsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn categories(&self) -> &'static [Category] {
        Category::ALL
    }

    pub fn fetch_start(&mut self) {
        self.status.start();
    }

    /// Replace every transaction and recompute the balance from scratch.
    pub fn fetch_success(&mut self, transactions: Vec<Transaction>) {
        self.status.finish();
        self.balance = transactions.iter().map(Transaction::signed_amount).sum();
        self.transactions = transactions;
    }

    pub fn fetch_failure(&mut self, message: impl Into<String>) {
        self.status.fail(message.into());
    }

    pub fn add_start(&mut self) {
        self.status.start();
    }

    /// Prepend `tx` and move the balance by its signed amount.
    pub fn add_success(&mut self, tx: Transaction) {
        self.status.finish();
        self.balance += tx.signed_amount();
        self.transactions.insert(0, tx);
    }

    pub fn add_failure(&mut self, message: impl Into<String>) {
        self.status.fail(message.into());
    }

    pub fn update_filters(&mut self, patch: FilterPatch) {
        self.filters.apply(patch);
    }

    pub fn update_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggle(field);
    }

    /// The filtered, sorted view for the current selection.
    pub fn visible(&self, today: NaiveDate) -> Vec<Transaction> {
        filter_and_sort(&self.transactions, &self.filters, &self.sort, today)
    }

    /// Statistics over [`PaymentsState::visible`], `None` when it is empty.
    pub fn stats(&self, today: NaiveDate) -> Option<TransactionStats> {
        TransactionStats::compute(&self.visible(today), today)
    }

    pub async fn load<S: TransactionSource>(
        &mut self,
        source: &S,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.fetch_start();
        tracing::debug!("loading transactions");
        let fetched = with_timeout(timeout, source.fetch_transactions())
            .await
            .and_then(|transactions| check_batch(&transactions).map(|_| transactions));
        match fetched {
            Ok(transactions) => {
                tracing::info!("loaded {} transactions", transactions.len());
                self.fetch_success(transactions);
                Ok(())
            }
            Err(e) => {
                tracing::error!("could not load transactions: {}", e);
                self.fetch_failure(e.to_string());
                Err(e)
            }
        }
    }

    /// An added record must be well formed and carry an id not already held.
    fn check_added(&self, tx: &Transaction) -> Result<(), Error> {
        tx.check()?;
        if self.transactions.iter().any(|t| t.id == tx.id) {
            return Err(Error::Validation(format!(
                "transaction id {} is already recorded",
                tx.id
            )));
        }
        Ok(())
    }

    /// Validate `draft`, send it to `source` and record the result.
    ///
    /// A draft that fails validation is rejected before anything is sent and
    /// leaves the panel untouched, loading flag and error included. A record
    /// the source hands back is checked too; a bad one is stored as an add
    /// failure.
    pub async fn add<S: TransactionSource>(
        &mut self,
        source: &S,
        draft: &TransactionDraft,
        timeout: Duration,
    ) -> Result<Transaction, Error> {
        let new = draft.validate()?;
        self.add_start();
        let added = with_timeout(timeout, source.add_transaction(new))
            .await
            .and_then(|tx| self.check_added(&tx).map(|_| tx));
        match added {
            Ok(tx) => {
                tracing::info!("added transaction {} ({} {})", tx.id, tx.kind, tx.amount);
                self.add_success(tx.clone());
                Ok(tx)
            }
            Err(e) => {
                tracing::error!("could not add transaction: {}", e);
                self.add_failure(e.to_string());
                Err(e)
            }
        }
    }
}

/// A read-only list panel, as used by insurance and investments.
#[derive(Debug, Clone)]
pub struct RecordPanel<T> {
    records: Vec<T>,
    status: LoadStatus,
}

impl<T> Default for RecordPanel<T> {
    fn default() -> Self {
        RecordPanel {
            records: Vec::new(),
            status: LoadStatus::default(),
        }
    }
}

impl<T> RecordPanel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn start(&mut self) {
        self.status.start();
    }

    pub fn succeed(&mut self, records: Vec<T>) {
        self.status.finish();
        self.records = records;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status.fail(message.into());
    }

    async fn load_from<F>(
        &mut self,
        what: &str,
        timeout: Duration,
        fetch: F,
    ) -> Result<(), Error>
    where
        F: Future<Output = Result<Vec<T>, Error>>,
    {
        self.start();
        tracing::debug!("loading {}", what);
        match with_timeout(timeout, fetch).await {
            Ok(records) => {
                tracing::info!("loaded {} {}", records.len(), what);
                self.succeed(records);
                Ok(())
            }
            Err(e) => {
                tracing::error!("could not load {}: {}", what, e);
                self.fail(e.to_string());
                Err(e)
            }
        }
    }
}

pub type InsuranceState = RecordPanel<Policy>;
pub type InvestmentsState = RecordPanel<Portfolio>;

impl RecordPanel<Policy> {
    pub async fn load<S: PolicySource>(
        &mut self,
        source: &S,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.load_from("policies", timeout, source.fetch_policies())
            .await
    }

    pub fn active_count(&self) -> usize {
        self.records
            .iter()
            .filter(|p| p.status == PolicyStatus::Active)
            .count()
    }

    pub fn total_coverage(&self) -> Decimal {
        self.records.iter().map(|p| p.coverage).sum()
    }

    pub fn total_premium(&self) -> Decimal {
        self.records.iter().map(|p| p.premium).sum()
    }
}

impl RecordPanel<Portfolio> {
    pub async fn load<S: PortfolioSource>(
        &mut self,
        source: &S,
        timeout: Duration,
    ) -> Result<(), Error> {
        self.load_from("portfolios", timeout, source.fetch_portfolios())
            .await
    }

    pub fn total_value(&self) -> Decimal {
        self.records.iter().map(|p| p.value).sum()
    }
}
