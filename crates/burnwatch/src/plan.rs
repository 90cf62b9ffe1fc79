// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `burnwatch plan` command implementation.
//!
//! Shows consumption against the plan's cost, token, and message limits as
//! bars colored by severity.

use burnwatch_api::UsageDataSource;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{PlanUsage, UsageVsLimit};

use crate::render::{format_minutes, paint_level, usage_bar, use_color};

pub async fn run_plan(
    source: &dyn UsageDataSource,
    plan: &str,
    json: bool,
    plain: bool,
) -> Result<(), BurnwatchError> {
    let usage = source.plan_usage(plan).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&usage).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    print_plan(&usage, use_color(plain));
    Ok(())
}

fn print_plan(usage: &PlanUsage, use_color: bool) {
    println!();
    println!("  burnwatch plan — {}", usage.plan.display_name);
    println!("  {}", "-".repeat(40));
    print_limit("Cost", &usage.cost_usage, use_color);
    print_limit("Tokens", &usage.token_usage, use_color);
    print_limit("Messages", &usage.message_usage, use_color);

    if let Some(reset) = &usage.reset_info {
        println!(
            "    Resets:   in {} ({})",
            format_minutes(reset.remaining_minutes),
            reset.reset_time.format("%H:%M UTC"),
        );
    }
    println!(
        "    Burn:     {:.0} tok/min, ${:.2}/h",
        usage.burn_rate.tokens_per_minute, usage.burn_rate.cost_per_hour,
    );
    println!();
}

fn print_limit(label: &str, usage: &UsageVsLimit, use_color: bool) {
    let bar = usage_bar(usage.percentage, 20);
    let pct = format!("{:5.1}%", usage.percentage);
    println!(
        "    {label:<9} {} {}",
        paint_level(&bar, usage.level(), use_color),
        paint_level(&pct, usage.level(), use_color),
    );
}
