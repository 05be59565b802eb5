// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Error;
use crate::models::{Transaction, TransactionDraft};
use crate::sources::{PolicySource, PortfolioSource, TransactionSource};
use crate::store::{InsuranceState, InvestmentsState, PaymentsState};

/// How many days back count as "recent" on the overview.
pub const RECENT_DAYS: u64 = 30;

/// The three panels plus the backend that feeds them.
///
/// Create one per session and drop it when done; nothing here is global.
#[derive(Debug)]
pub struct Dashboard<B> {
    backend: B,
    request_timeout: Duration,
    pub payments: PaymentsState,
    pub insurance: InsuranceState,
    pub investments: InvestmentsState,
}

impl<B> Dashboard<B>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    pub fn new(backend: B, request_timeout: Duration) -> Self {
        Dashboard {
            backend,
            request_timeout,
            payments: PaymentsState::new(),
            insurance: InsuranceState::new(),
            investments: InvestmentsState::new(),
        }
    }

    pub async fn load_payments(&mut self) -> Result<(), Error> {
        self.payments
            .load(&self.backend, self.request_timeout)
            .await
    }

    pub async fn load_insurance(&mut self) -> Result<(), Error> {
        self.insurance
            .load(&self.backend, self.request_timeout)
            .await
    }

    pub async fn load_investments(&mut self) -> Result<(), Error> {
        self.investments
            .load(&self.backend, self.request_timeout)
            .await
    }

    /// Load every panel in turn. All three are attempted; the first failure
    /// is returned.
    pub async fn load_all(&mut self) -> Result<(), Error> {
        let payments = self.load_payments().await;
        let insurance = self.load_insurance().await;
        let investments = self.load_investments().await;
        payments.and(insurance).and(investments)
    }

    pub async fn add_transaction(
        &mut self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error> {
        self.payments
            .add(&self.backend, draft, self.request_timeout)
            .await
    }

    pub fn overview(&self, today: NaiveDate) -> DashboardOverview {
        DashboardOverview::from_panels(&self.payments, &self.insurance, &self.investments, today)
    }
}

/// Headline figures across all panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub balance: Decimal,
    pub portfolios: usize,
    pub portfolio_value: Decimal,
    pub policies: usize,
    pub active_policies: usize,
    pub total_coverage: Decimal,
    pub recent_transactions: usize,
}

impl DashboardOverview {
    pub fn from_panels(
        payments: &PaymentsState,
        insurance: &InsuranceState,
        investments: &InvestmentsState,
        today: NaiveDate,
    ) -> Self {
        let since = today
            .checked_sub_days(Days::new(RECENT_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let recent_transactions = payments
            .transactions()
            .iter()
            .filter(|t| t.date >= since && t.date <= today)
            .count();

        DashboardOverview {
            balance: payments.balance(),
            portfolios: investments.records().len(),
            portfolio_value: investments.total_value(),
            policies: insurance.records().len(),
            active_policies: insurance.active_count(),
            total_coverage: insurance.total_coverage(),
            recent_transactions,
        }
    }
}
