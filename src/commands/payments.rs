// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Error;
use crate::dashboard::Dashboard;
use crate::filters::{FilterPatch, SortField, SortOrder, SortSpec};
use crate::models::{NewTransaction, Transaction, TransactionDraft, TxKind};
use crate::settings::Settings;
use crate::sources::{PolicySource, PortfolioSource, TransactionSource};
use crate::stats::TransactionStats;
use crate::store::PaymentsState;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde_json::json;

pub async fn handle<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    today: NaiveDate,
    m: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    match m.subcommand() {
        Some(("list", sub)) => list(dash, settings, today, sub).await?,
        Some(("stats", sub)) => stats(dash, settings, today, sub).await?,
        Some(("add", sub)) => add(dash, settings, today, sub).await?,
        Some(("export", sub)) => export(dash, today, sub).await?,
        _ => {}
    }
    Ok(())
}

/// Push the `--type/--range/--category/--sort/--order` flags into the panel.
///
/// Flags that are absent leave the current selection as it is.
pub fn apply_selection(state: &mut PaymentsState, sub: &clap::ArgMatches) -> Result<()> {
    let mut patch = FilterPatch::default();
    if let Some(v) = sub.get_one::<String>("type") {
        patch.kind = Some(v.parse()?);
    }
    if let Some(v) = sub.get_one::<String>("range") {
        patch.range = Some(v.parse()?);
    }
    if let Some(v) = sub.get_one::<String>("category") {
        patch.category = Some(v.parse()?);
    }
    state.update_filters(patch);

    let field = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortField>())
        .transpose()?;
    let order = sub
        .get_one::<String>("order")
        .map(|s| s.parse::<SortOrder>())
        .transpose()?;
    if field.is_some() || order.is_some() {
        let current = *state.sort();
        state.update_sort(SortSpec {
            field: field.unwrap_or(current.field),
            order: order.unwrap_or(current.order),
        });
    }
    Ok(())
}

fn signed_money(tx: &Transaction, symbol: &str) -> String {
    let sign = match tx.kind {
        TxKind::Credit => "+",
        TxKind::Debit => "-",
    };
    format!("{}{}", sign, fmt_money(&tx.amount, symbol))
}

fn transaction_rows(view: &[Transaction], symbol: &str) -> Vec<Vec<String>> {
    view.iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.kind.to_string(),
                t.description.clone(),
                t.category.to_string(),
                signed_money(t, symbol),
            ]
        })
        .collect()
}

async fn list<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    dash.load_payments()
        .await
        .context("Failed to load transactions")?;
    apply_selection(&mut dash.payments, sub)?;
    let view = dash.payments.visible(today);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let symbol = &settings.currency_symbol;
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Category", "Amount"],
                transaction_rows(&view, symbol),
            )
        );
        println!(
            "Current balance: {}",
            fmt_money(&dash.payments.balance(), symbol)
        );
    }
    Ok(())
}

pub fn print_stats(stats: &TransactionStats, symbol: &str) {
    let totals = &stats.totals;
    println!(
        "{}",
        pretty_table(
            &["Total Income", "Total Expenses", "Net Balance"],
            vec![vec![
                fmt_money(&totals.income, symbol),
                fmt_money(&totals.expenses, symbol),
                fmt_money(&totals.net(), symbol),
            ]],
        )
    );

    let monthly = stats
        .monthly_data
        .iter()
        .map(|m| {
            vec![
                m.label.clone(),
                fmt_money(&m.income, symbol),
                fmt_money(&m.expenses, symbol),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expenses"], monthly));

    let categories = stats
        .category_data
        .iter()
        .zip(stats.category_percentages())
        .map(|(c, (_, pct))| {
            vec![
                c.category.to_string(),
                fmt_money(&c.value, symbol),
                fmt_percent(&pct),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Amount", "Share"], categories));
}

async fn stats<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    dash.load_payments()
        .await
        .context("Failed to load transactions")?;
    apply_selection(&mut dash.payments, sub)?;
    let stats = dash.payments.stats(today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    match stats {
        Some(s) => print_stats(&s, &settings.currency_symbol),
        None => println!("No transactions to summarize."),
    }
    Ok(())
}

pub fn draft_from_args(sub: &clap::ArgMatches, today: NaiveDate) -> TransactionDraft {
    let text = |name: &str| sub.get_one::<String>(name).cloned().unwrap_or_default();
    TransactionDraft {
        kind: text("type"),
        amount: text("amount"),
        description: text("description"),
        category: text("category"),
        date: sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| today.to_string()),
    }
}

/// Validate the form, naming the known categories when the one given is not.
pub fn check_draft(state: &PaymentsState, draft: &TransactionDraft) -> Result<NewTransaction> {
    match draft.validate() {
        Ok(new) => Ok(new),
        Err(e @ Error::UnknownCategory(_)) => {
            let known: Vec<&str> = state.categories().iter().map(|c| c.as_str()).collect();
            bail!("{} (expected one of: {})", e, known.join(", "))
        }
        Err(e) => Err(e.into()),
    }
}

async fn add<B>(
    dash: &mut Dashboard<B>,
    settings: &Settings,
    today: NaiveDate,
    sub: &clap::ArgMatches,
) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    let draft = draft_from_args(sub, today);
    // Reject bad input before waiting on the backend.
    check_draft(&dash.payments, &draft)?;
    dash.load_payments()
        .await
        .context("Failed to load transactions")?;
    let tx = dash
        .add_transaction(&draft)
        .await
        .context("Failed to record transaction")?;
    let symbol = &settings.currency_symbol;
    println!(
        "Recorded {} {} '{}' in {} on {} (id {})",
        tx.kind,
        fmt_money(&tx.amount, symbol),
        tx.description,
        tx.category,
        tx.date,
        tx.id
    );
    println!("Balance: {}", fmt_money(&dash.payments.balance(), symbol));
    Ok(())
}

async fn export<B>(dash: &mut Dashboard<B>, today: NaiveDate, sub: &clap::ArgMatches) -> Result<()>
where
    B: TransactionSource + PolicySource + PortfolioSource,
{
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub
        .get_one::<String>("out")
        .context("--out is required")?;

    dash.load_payments()
        .await
        .context("Failed to load transactions")?;
    apply_selection(&mut dash.payments, sub)?;
    let view = dash.payments.visible(today);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "type", "description", "category", "amount"])?;
            for t in &view {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.description.clone(),
                    t.category.to_string(),
                    t.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = view
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "type": t.kind, "description": t.description,
                        "category": t.category, "amount": t.amount.to_string()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions to {}", view.len(), out);
    Ok(())
}
