// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `burnwatch status` command implementation.
//!
//! Fetches the realtime dashboard snapshot and prints the session window,
//! today's totals, and the current burn rate.

use burnwatch_api::UsageDataSource;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::DashboardSnapshot;

use crate::render::{format_minutes, format_tokens, format_usd, use_color};

pub async fn run_status(
    source: &dyn UsageDataSource,
    json: bool,
    plain: bool,
) -> Result<(), BurnwatchError> {
    let snapshot = source.dashboard().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    print_snapshot(&snapshot, use_color(plain));
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot, use_color: bool) {
    println!();
    println!("  burnwatch status");
    println!("  {}", "-".repeat(40));

    if snapshot.session.is_active {
        let remaining = format_minutes(snapshot.session.remaining_minutes);
        if use_color {
            use colored::Colorize;
            println!("    Session:  {} active ({remaining} left)", "●".green());
        } else {
            println!("    Session:  active ({remaining} left)");
        }
        println!(
            "              {} tokens, {} this window",
            format_tokens(snapshot.session.tokens_in_window),
            format_usd(snapshot.session.cost_in_window),
        );
    } else if use_color {
        use colored::Colorize;
        println!("    Session:  {} none active", "○".yellow());
    } else {
        println!("    Session:  none active");
    }

    println!(
        "    Today:    {} requests, {} tokens, {}",
        snapshot.today.total_requests,
        format_tokens(snapshot.today.tokens.total()),
        format_usd(snapshot.today.total_cost),
    );
    if !snapshot.today.models_used.is_empty() {
        println!("    Models:   {}", snapshot.today.models_used.join(", "));
    }
    println!(
        "    Burn:     {:.0} tok/min, {}/h",
        snapshot.burn_rate.tokens_per_minute,
        format_usd(snapshot.burn_rate.cost_per_hour),
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnwatch_api::MockDataSource;

    #[tokio::test]
    async fn status_json_serializes_snapshot() {
        let source = MockDataSource::new();
        let snapshot = source.dashboard().await.unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"burn_rate\""));
        assert!(json.contains("\"today\""));
    }

    #[tokio::test]
    async fn status_runs_against_mock() {
        let source = MockDataSource::new();
        run_status(&source, true, true).await.unwrap();
    }
}
