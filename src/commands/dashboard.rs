// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::{Dashboard, RECENT_DAYS};
use crate::settings::Settings;
use crate::sources::{PolicySource, PortfolioSource, TransactionSource};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

pub async fn handle<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    // A failing panel should not hide the others; its error is shown in place.
    if let Err(e) = dash.load_all().await {
        tracing::warn!("overview is incomplete: {}", e);
    }
    let overview = dash.overview(today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &overview)? {
        return Ok(());
    }

    let symbol = &settings.currency_symbol;
    let rows = vec![
        vec![
            "Total Balance".to_string(),
            fmt_money(&overview.balance, symbol),
            "Across all transactions".to_string(),
        ],
        vec![
            "Active Investments".to_string(),
            overview.portfolios.to_string(),
            format!("Worth {}", fmt_money(&overview.portfolio_value, symbol)),
        ],
        vec![
            "Insurance Policies".to_string(),
            format!("{} ({} active)", overview.policies, overview.active_policies),
            format!("Coverage {}", fmt_money(&overview.total_coverage, symbol)),
        ],
        vec![
            "Recent Transactions".to_string(),
            overview.recent_transactions.to_string(),
            format!("In the last {} days", RECENT_DAYS),
        ],
    ];
    println!("{}", pretty_table(&["Overview", "Value", "Detail"], rows));

    for (panel, status) in [
        ("payments", dash.payments.status()),
        ("insurance", dash.insurance.status()),
        ("investments", dash.investments.status()),
    ] {
        if let Some(err) = &status.error {
            eprintln!("{} failed to load: {}", panel, err);
        }
    }
    Ok(())
}
