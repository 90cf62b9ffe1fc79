// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `burnwatch watch` command implementation.
//!
//! Live view: background pollers keep the dashboard and plan queries fresh,
//! the realtime channel invalidates them on push updates, and every change
//! redraws one status line. Ctrl-C cancels every timer and the socket before
//! returning.

use std::sync::Arc;
use std::time::Duration;

use burnwatch_api::UsageDataSource;
use burnwatch_config::model::BurnwatchConfig;
use burnwatch_core::BurnwatchError;
use burnwatch_core::types::{DashboardSnapshot, PlanUsage};
use burnwatch_sync::{QueryCache, QueryKey, QueryOptions, spawn_refetch};
use burnwatch_ws::{Handlers, RealtimeClient};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::render::{format_tokens, format_usd, paint_level, use_color};

pub async fn run_watch(
    config: &BurnwatchConfig,
    source: Arc<dyn UsageDataSource>,
    plan: String,
    plain: bool,
) -> Result<(), BurnwatchError> {
    let cache = QueryCache::new();
    let options = QueryOptions::from_config(&config.sync);
    let interval = Duration::from_millis(config.sync.refetch_interval_ms);
    let cancel = CancellationToken::new();

    let dashboard_fetch = {
        let source = source.clone();
        move || {
            let source = source.clone();
            async move { source.dashboard().await }
        }
    };
    let plan_fetch = {
        let source = source.clone();
        let plan = plan.clone();
        move || {
            let source = source.clone();
            let plan = plan.clone();
            async move { source.plan_usage(&plan).await }
        }
    };

    let dashboard_poll = spawn_refetch(
        cache.clone(),
        QueryKey::dashboard(),
        options.clone(),
        interval,
        cancel.child_token(),
        dashboard_fetch.clone(),
    );
    let plan_poll = spawn_refetch(
        cache.clone(),
        QueryKey::plan_usage(&plan),
        options.clone(),
        interval,
        cancel.child_token(),
        plan_fetch.clone(),
    );

    let realtime = config.websocket.enabled.then(|| {
        RealtimeClient::new(config.websocket.clone(), cache.clone(), Handlers::new())
    });
    if let Some(client) = &realtime {
        client.connect();
    }

    let mut invalidations = cache.subscribe();
    let mut redraw = tokio::time::interval(interval);
    let color = use_color(plain);

    println!("watching usage (Ctrl-C to stop)");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = redraw.tick() => {}
            event = invalidations.recv() => {
                debug!(?event, "redraw on invalidation");
            }
        }
        let snapshot = cache
            .query(&QueryKey::dashboard(), &options, &dashboard_fetch)
            .await;
        let plan_usage = cache
            .query(&QueryKey::plan_usage(&plan), &options, &plan_fetch)
            .await;
        match (snapshot, plan_usage) {
            (Ok(snapshot), Ok(plan_usage)) => print_line(&snapshot, &plan_usage, color),
            (Err(err), _) | (_, Err(err)) => eprintln!("fetch failed: {err}"),
        }
    }

    debug!("watch teardown");
    cancel.cancel();
    if let Some(client) = &realtime {
        client.disconnect();
    }
    let _ = dashboard_poll.await;
    let _ = plan_poll.await;
    Ok(())
}

fn print_line(snapshot: &DashboardSnapshot, plan_usage: &PlanUsage, color: bool) {
    let cost_pct = format!("{:.1}%", plan_usage.cost_usage.percentage);
    println!(
        "[{}] today {} req / {} tok / {}  burn {:.0} tok/min  cost limit {}",
        snapshot.timestamp.format("%H:%M:%S"),
        snapshot.today.total_requests,
        format_tokens(snapshot.today.tokens.total()),
        format_usd(snapshot.today.total_cost),
        snapshot.burn_rate.tokens_per_minute,
        paint_level(&cost_pct, plan_usage.cost_usage.level(), color),
    );
}
