// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .value_name("all|credit|debit")
            .help("Only income (credit) or expenses (debit)"),
    )
    .arg(
        Arg::new("range")
            .long("range")
            .value_name("all|week|month|year")
            .help("Only transactions within this far back"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .value_name("CATEGORY")
            .help("Only this category, or 'all'"),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .value_name("date|amount")
            .help("Field to sort by"),
    )
    .arg(
        Arg::new("order")
            .long("order")
            .value_name("asc|desc")
            .help("Sort direction"),
    )
}

pub fn build_cli() -> Command {
    Command::new("finboard")
        .version(crate_version!())
        .about("Personal finance dashboard: payments, insurance and investments")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .help("Settings file (defaults to the platform config dir)"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .value_name("YYYY-MM-DD")
                .help("Reference date for ranges and trends (defaults to today)"),
        )
        .subcommand(
            Command::new("payments")
                .about("Transactions, balance and statistics")
                .subcommand(json_args(filter_args(
                    Command::new("list").about("List transactions"),
                )))
                .subcommand(json_args(filter_args(
                    Command::new("stats").about("Totals, monthly trend and category split"),
                )))
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_name("credit|debit")
                                .default_value("debit"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Salary"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to the reference date"),
                        ),
                )
                .subcommand(filter_args(
                    Command::new("export")
                        .about("Write the filtered transactions to a file")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_name("csv|json")
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").value_name("PATH").required(true)),
                )),
        )
        .subcommand(
            Command::new("insurance")
                .about("Insurance policies")
                .subcommand(json_args(Command::new("list").about("List policies"))),
        )
        .subcommand(
            Command::new("investments")
                .about("Investment portfolios")
                .subcommand(json_args(Command::new("list").about("List portfolios"))),
        )
        .subcommand(json_args(
            Command::new("dashboard").about("Overview across all panels"),
        ))
}
