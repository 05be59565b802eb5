// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use chrono::NaiveDate;
use finboard::dashboard::Dashboard;
use finboard::models::{PolicyStatus, RiskLevel, TransactionDraft};
use finboard::sources::MockBackend;
use finboard::Error;
use rust_decimal::Decimal;

const TIMEOUT: Duration = Duration::from_secs(5);

fn instant() -> MockBackend {
    MockBackend::new(Duration::ZERO, Duration::ZERO)
}

#[tokio::test]
async fn insurance_panel_loads_policies() {
    let mut dash = Dashboard::new(instant(), TIMEOUT);
    dash.load_insurance().await.unwrap();

    let policies = dash.insurance.records();
    assert_eq!(policies.len(), 3);
    assert_eq!(policies[0].provider, "AXA Mansard");
    assert!(policies.iter().all(|p| p.status == PolicyStatus::Active));
    assert_eq!(dash.insurance.active_count(), 3);
    assert_eq!(dash.insurance.total_coverage(), Decimal::from(17_000_000));
    assert_eq!(dash.insurance.total_premium(), Decimal::from(500_000));
}

#[tokio::test]
async fn investments_panel_loads_portfolios() {
    let mut dash = Dashboard::new(instant(), TIMEOUT);
    dash.load_investments().await.unwrap();

    let portfolios = dash.investments.records();
    assert_eq!(portfolios.len(), 3);
    assert_eq!(portfolios[2].risk, RiskLevel::Medium);
    assert_eq!(portfolios[0].returns, "12.5".parse::<Decimal>().unwrap());
    assert_eq!(dash.investments.total_value(), Decimal::from(6_500_000));
}

#[tokio::test]
async fn failing_panels_store_their_error() {
    let mut dash = Dashboard::new(instant().failing("upstream 503"), TIMEOUT);
    let err = dash.load_all().await.unwrap_err();

    assert_eq!(err, Error::Source("upstream 503".into()));
    for status in [
        dash.payments.status(),
        dash.insurance.status(),
        dash.investments.status(),
    ] {
        assert_eq!(status.error.as_deref(), Some("upstream 503"));
        assert!(!status.is_loading);
    }
    assert!(dash.insurance.records().is_empty());
}

#[tokio::test]
async fn overview_counts_recent_activity() {
    let mut dash = Dashboard::new(instant(), TIMEOUT);
    dash.load_all().await.unwrap();
    dash.add_transaction(&TransactionDraft {
        kind: "credit".into(),
        amount: "5000".into(),
        description: "Side gig".into(),
        category: "Others".into(),
        date: "2024-03-10".into(),
    })
    .await
    .unwrap();

    let overview = dash.overview(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert_eq!(overview.balance, Decimal::from(35000));
    assert_eq!(overview.portfolios, 3);
    assert_eq!(overview.portfolio_value, Decimal::from(6_500_000));
    assert_eq!(overview.policies, 3);
    assert_eq!(overview.active_policies, 3);
    // the window starts 2024-02-14, so the 2024-02-13 utilities bill is out
    assert_eq!(overview.recent_transactions, 3);
}
