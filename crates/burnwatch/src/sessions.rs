// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `burnwatch sessions` command implementation.

use burnwatch_api::UsageDataSource;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{Session, SessionStatus};

use crate::render::{format_tokens, format_usd, use_color};

pub async fn run_sessions(
    source: &dyn UsageDataSource,
    limit: u32,
    json: bool,
    plain: bool,
) -> Result<(), BurnwatchError> {
    let sessions = source.recent_sessions(limit).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&sessions).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    print_sessions(&sessions, use_color(plain));
    Ok(())
}

fn print_sessions(sessions: &[Session], use_color: bool) {
    println!();
    println!("  burnwatch sessions");
    println!("  {}", "-".repeat(60));

    if sessions.is_empty() {
        println!("    No sessions recorded.");
        println!();
        return;
    }

    println!(
        "    {:<18} {:<8} {:>8} {:>9} {:>9}",
        "Started", "Status", "Tokens", "Cost", "Requests"
    );
    for session in sessions {
        let started = session
            .start_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = paint_status(session.status, use_color);
        println!(
            "    {:<18} {:<8} {:>8} {:>9} {:>9}",
            started,
            status,
            format_tokens(session.tokens.total()),
            format_usd(session.total_cost),
            session.request_count,
        );
    }
    println!();
}

fn paint_status(status: SessionStatus, use_color: bool) -> String {
    let text = status.to_string();
    if !use_color {
        return text;
    }
    use colored::Colorize;
    match status {
        SessionStatus::Active => text.green().to_string(),
        SessionStatus::Idle | SessionStatus::Paused => text.yellow().to_string(),
        SessionStatus::Expired => text.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnwatch_api::MockDataSource;

    #[tokio::test]
    async fn sessions_runs_against_mock() {
        let source = MockDataSource::new();
        run_sessions(&source, 5, true, true).await.unwrap();
    }

    #[test]
    fn status_painting_is_passthrough_when_plain() {
        assert_eq!(paint_status(SessionStatus::Active, false), "active");
    }
}
