// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::Dashboard;
use crate::settings::Settings;
use crate::sources::{PolicySource, PortfolioSource, TransactionSource};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
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
    dash.load_insurance()
        .await
        .context("Failed to load policies")?;
    let policies = dash.insurance.records();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &policies)? {
        return Ok(());
    }
    let symbol = &settings.currency_symbol;
    let rows = policies
        .iter()
        .map(|p| {
            vec![
                p.policy_type.clone(),
                p.provider.clone(),
                p.status.to_string(),
                fmt_money(&p.premium, symbol),
                fmt_money(&p.coverage, symbol),
                p.expiry_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Type", "Provider", "Status", "Premium", "Coverage", "Expires"],
            rows,
        )
    );
    println!(
        "{} active of {} policies, total coverage {}, premiums {}",
        dash.insurance.active_count(),
        policies.len(),
        fmt_money(&dash.insurance.total_coverage(), symbol),
        fmt_money(&dash.insurance.total_premium(), symbol)
    );
    Ok(())
}
