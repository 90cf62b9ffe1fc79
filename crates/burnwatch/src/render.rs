// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure formatting helpers shared by the commands.

use burnwatch_core::UsageLevel;
use colored::Colorize;

/// Compact token count: 950 stays 950, 12_300 becomes "12.3K",
/// 4_200_000 becomes "4.2M".
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

pub fn format_usd(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Minutes into "2h 5m" / "45m" form. Negative values clamp to zero.
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Horizontal usage bar, `width` cells wide. Percentages over 100 fill the
/// whole bar.
pub fn usage_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Paint text by severity: high is red, medium yellow, low green.
pub fn paint_level(text: &str, level: UsageLevel, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    match level {
        UsageLevel::High => text.red().to_string(),
        UsageLevel::Medium => text.yellow().to_string(),
        UsageLevel::Low => text.green().to_string(),
    }
}

/// Whether colored output should be used for stdout.
pub fn use_color(plain: bool) -> bool {
    use std::io::IsTerminal;
    !plain && std::io::stdout().is_terminal()
}
