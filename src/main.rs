// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use finboard::dashboard::Dashboard;
use finboard::settings::Settings;
use finboard::sources::Backend;
use finboard::{cli, commands, utils};

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    // stdout carries tables and JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::resolve(matches.get_one::<String>("config").map(Path::new))?;
    init_tracing(&settings);

    let today = match matches.get_one::<String>("today") {
        Some(s) => utils::parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    let backend = Backend::from_settings(&settings)?;
    let mut dash = Dashboard::new(backend, settings.request_timeout());

    match matches.subcommand() {
        Some(("payments", sub)) => {
            commands::payments::handle(&mut dash, &settings, today, sub).await?
        }
        Some(("insurance", sub)) => commands::insurance::handle(&mut dash, &settings, sub).await?,
        Some(("investments", sub)) => {
            commands::investments::handle(&mut dash, &settings, sub).await?
        }
        Some(("dashboard", sub)) => {
            commands::dashboard::handle(&mut dash, &settings, today, sub).await?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
