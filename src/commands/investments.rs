// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::Dashboard;
use crate::settings::Settings;
use crate::sources::{PolicySource, PortfolioSource, TransactionSource};
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub async fn handle<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    m: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    match m.subcommand() {
        Some(("list", sub)) => list(dash, settings, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn list<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    dash.load_investments()
        .await
        .context("Failed to load portfolios")?;
    let portfolios = dash.investments.records();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &portfolios)? {
        return Ok(());
    }
    let symbol = &settings.currency_symbol;
    let rows = portfolios
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.portfolio_type.clone(),
                fmt_money(&p.value, symbol),
                fmt_percent(&p.returns),
                p.risk.to_string(),
                p.last_updated.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Type", "Value", "Returns", "Risk", "Updated"],
            rows,
        )
    );
    println!(
        "Total value: {}",
        fmt_money(&dash.investments.total_value(), symbol)
    );
    Ok(())
}
