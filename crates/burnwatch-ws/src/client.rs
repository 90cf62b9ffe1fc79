// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconnecting realtime client.
//!
//! Owns one WebSocket session at a time. On close or transport error the
//! client drops to `Disconnected`, waits a fixed delay, and reconnects up to
//! the configured attempt limit; after that it parks in `Error` until
//! `connect()` is called again. Frames that fail to parse are dropped and
//! never terminate the read loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use burnwatch_config::model::WebSocketConfig;
use burnwatch_sync::QueryCache;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::message::{Envelope, MessageKind, ping_frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

type PayloadCallback = Box<dyn Fn(&Value) + Send + Sync>;
type StateCallback = Box<dyn Fn(ConnectionState) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Optional callbacks invoked from the read loop. All default to no-ops.
#[derive(Default)]
pub struct Handlers {
    usage_update: Option<PayloadCallback>,
    session_update: Option<PayloadCallback>,
    limit_warning: Option<PayloadCallback>,
    connection_change: Option<StateCallback>,
    error: Option<ErrorCallback>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_usage_update(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.usage_update = Some(Box::new(f));
        self
    }

    pub fn on_session_update(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.session_update = Some(Box::new(f));
        self
    }

    pub fn on_limit_warning(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.limit_warning = Some(Box::new(f));
        self
    }

    pub fn on_connection_change(
        mut self,
        f: impl Fn(ConnectionState) + Send + Sync + 'static,
    ) -> Self {
        self.connection_change = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

struct ClientInner {
    config: WebSocketConfig,
    cache: QueryCache,
    handlers: Handlers,
    state: Mutex<ConnectionState>,
    reconnect_attempts: AtomicU32,
    last_error: Mutex<Option<String>>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    session_cancel: Mutex<Option<CancellationToken>>,
}

/// Cloneable handle to the realtime connection.
#[derive(Clone)]
pub struct RealtimeClient {
    inner: Arc<ClientInner>,
}

impl RealtimeClient {
    pub fn new(config: WebSocketConfig, cache: QueryCache, handlers: Handlers) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                cache,
                handlers,
                state: Mutex::new(ConnectionState::Disconnected),
                reconnect_attempts: AtomicU32::new(0),
                last_error: Mutex::new(None),
                outbound: Mutex::new(None),
                session_cancel: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock().unwrap()
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.lock().unwrap().clone()
    }

    /// Start the connection loop. No-op while already connecting or
    /// connected; calling after the attempt limit was reached starts over.
    pub fn connect(&self) {
        match self.state() {
            ConnectionState::Connecting | ConnectionState::Connected => return,
            _ => {}
        }
        self.inner.reconnect_attempts.store(0, Ordering::SeqCst);
        self.set_state(ConnectionState::Connecting);

        let cancel = CancellationToken::new();
        if let Some(old) = self
            .inner
            .session_cancel
            .lock()
            .unwrap()
            .replace(cancel.clone())
        {
            old.cancel();
        }

        let client = self.clone();
        tokio::spawn(async move {
            client.run(cancel).await;
        });
    }

    /// Tear down the session and stop reconnecting. Idempotent.
    pub fn disconnect(&self) {
        if let Some(cancel) = self.inner.session_cancel.lock().unwrap().take() {
            cancel.cancel();
        }
        *self.inner.outbound.lock().unwrap() = None;
        self.inner.reconnect_attempts.store(0, Ordering::SeqCst);
        self.set_state(ConnectionState::Disconnected);
    }

    /// Declaratively match the connection to the flag.
    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.connect();
        } else {
            self.disconnect();
        }
    }

    /// Queue a text frame. Silently dropped unless connected.
    pub fn send(&self, text: impl Into<String>) {
        if self.state() != ConnectionState::Connected {
            trace!("dropping outbound frame while not connected");
            return;
        }
        if let Some(tx) = self.inner.outbound.lock().unwrap().as_ref() {
            let _ = tx.send(text.into());
        }
    }

    async fn run(&self, cancel: CancellationToken) {
        let config = &self.inner.config;
        loop {
            if cancel.is_cancelled() {
                return;
            }
            match connect_async(config.url.as_str()).await {
                Ok((stream, _response)) => {
                    debug!(url = %config.url, "realtime channel connected");
                    self.inner.reconnect_attempts.store(0, Ordering::SeqCst);
                    self.set_state(ConnectionState::Connected);
                    self.drive_session(stream, &cancel).await;
                    *self.inner.outbound.lock().unwrap() = None;
                    if cancel.is_cancelled() {
                        return;
                    }
                    self.set_state(ConnectionState::Disconnected);
                }
                Err(err) => {
                    warn!(url = %config.url, error = %err, "realtime connect failed");
                    if cancel.is_cancelled() {
                        return;
                    }
                    self.set_state(ConnectionState::Disconnected);
                }
            }

            let attempt = self.inner.reconnect_attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt > config.max_reconnect_attempts {
                warn!(
                    attempts = config.max_reconnect_attempts,
                    "reconnect attempts exhausted"
                );
                self.set_state(ConnectionState::Error);
                return;
            }
            debug!(attempt, "scheduling reconnect");
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms)) => {}
            }
            self.set_state(ConnectionState::Connecting);
        }
    }

    async fn drive_session<S>(&self, stream: S, cancel: &CancellationToken)
    where
        S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + futures::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin,
    {
        let (mut sink, mut reader) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        *self.inner.outbound.lock().unwrap() = Some(tx);

        let mut heartbeat =
            tokio::time::interval(Duration::from_secs(self.inner.config.heartbeat_interval_secs));
        // interval fires immediately; the first heartbeat should wait a full period
        heartbeat.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return;
                }
                _ = heartbeat.tick() => {
                    if sink.send(Message::text(ping_frame())).await.is_err() {
                        return;
                    }
                }
                Some(text) = rx.recv() => {
                    if sink.send(Message::text(text)).await.is_err() {
                        return;
                    }
                }
                frame = reader.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.dispatch(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("realtime channel closed by peer");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "realtime read error");
                        return;
                    }
                }
            }
        }
    }

    /// Route one inbound frame. Never fails; bad frames are dropped.
    fn dispatch(&self, text: &str) {
        let envelope: Envelope = match serde_json::from_str(text) {
            Ok(envelope) => envelope,
            Err(err) => {
                trace!(error = %err, "dropping unparseable frame");
                return;
            }
        };
        let Some(kind) = envelope.known_kind() else {
            trace!(kind = %envelope.kind, "dropping unknown frame kind");
            return;
        };
        let handlers = &self.inner.handlers;
        match kind {
            MessageKind::UsageUpdate => {
                if !envelope.payload.is_object() {
                    trace!("usage_update without object payload");
                    return;
                }
                if let Some(f) = &handlers.usage_update {
                    f(&envelope.payload);
                }
                self.inner.cache.invalidate_prefix("usage", None);
            }
            MessageKind::SessionUpdate => {
                if !envelope.payload.is_object() {
                    trace!("session_update without object payload");
                    return;
                }
                if let Some(f) = &handlers.session_update {
                    f(&envelope.payload);
                }
                self.inner.cache.invalidate_prefix("sessions", None);
            }
            MessageKind::CostUpdate => {
                self.inner.cache.invalidate_prefix("usage", None);
            }
            MessageKind::LimitWarning => {
                if let Some(f) = &handlers.limit_warning {
                    f(&envelope.payload);
                }
            }
            MessageKind::ConnectionStatus => {
                trace!(payload = %envelope.payload, "connection status frame");
            }
            MessageKind::Error => {
                let message = envelope
                    .payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unspecified realtime error")
                    .to_string();
                warn!(%message, "realtime error frame");
                *self.inner.last_error.lock().unwrap() = Some(message.clone());
                if let Some(f) = &handlers.error {
                    f(&message);
                }
            }
        }
    }

    fn set_state(&self, next: ConnectionState) {
        {
            let mut state = self.inner.state.lock().unwrap();
            if *state == next {
                return;
            }
            *state = next;
        }
        if let Some(f) = &self.inner.handlers.connection_change {
            f(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnwatch_sync::{QueryKey, QueryOptions, RetryPolicy};
    use burnwatch_test_utils::ws::{ConnectionScript, WsTestServer};

    fn test_config(url: String) -> WebSocketConfig {
        WebSocketConfig {
            url,
            heartbeat_interval_secs: 3600,
            reconnect_delay_ms: 20,
            max_reconnect_attempts: 3,
            enabled: true,
        }
    }

    async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !check() {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for {what}"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn dispatches_usage_updates_and_survives_garbage() {
        let server = WsTestServer::start(ConnectionScript::SendThenHold(vec![
            r#"{"type":"usage_update","payload":{"tokens":10}}"#.into(),
            "definitely not json".into(),
            r#"{"type":"mystery_kind","payload":{}}"#.into(),
            r#"{"type":"usage_update","payload":{"tokens":11}}"#.into(),
        ]))
        .await;

        let updates = Arc::new(AtomicU32::new(0));
        let handlers = Handlers::new().on_usage_update({
            let updates = updates.clone();
            move |_payload| {
                updates.fetch_add(1, Ordering::SeqCst);
            }
        });
        let client = RealtimeClient::new(test_config(server.url()), QueryCache::new(), handlers);

        client.connect();
        wait_until("two usage updates", || updates.load(Ordering::SeqCst) == 2).await;
        assert_eq!(client.state(), ConnectionState::Connected);
        client.disconnect();
    }

    #[tokio::test]
    async fn usage_update_invalidates_cached_usage_queries() {
        let server = WsTestServer::start(ConnectionScript::SendThenHold(vec![
            r#"{"type":"usage_update","payload":{"tokens":10}}"#.into(),
        ]))
        .await;

        let cache = QueryCache::new();
        let opts = QueryOptions {
            stale_time: Duration::from_secs(3600),
            retry: RetryPolicy::none(),
            enabled: true,
        };
        cache
            .query(&QueryKey::dashboard(), &opts, || async { Ok(1u64) })
            .await
            .unwrap();
        let mut invalidations = cache.subscribe();

        let client =
            RealtimeClient::new(test_config(server.url()), cache.clone(), Handlers::new());
        client.connect();

        let key = tokio::time::timeout(Duration::from_secs(5), invalidations.recv())
            .await
            .expect("invalidation within deadline")
            .unwrap();
        assert_eq!(key, QueryKey::dashboard());
        client.disconnect();
    }

    #[tokio::test]
    async fn reconnects_after_peer_close() {
        let server = WsTestServer::start(ConnectionScript::SendThenClose(vec![])).await;
        let client =
            RealtimeClient::new(test_config(server.url()), QueryCache::new(), Handlers::new());

        client.connect();
        wait_until("second connection", || server.connection_count() >= 2).await;
        client.disconnect();
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        // Bind and drop a listener so the port is valid but refused.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        drop(listener);

        let mut config = test_config(url);
        config.max_reconnect_attempts = 2;
        let client = RealtimeClient::new(config, QueryCache::new(), Handlers::new());

        client.connect();
        wait_until("error state", || client.state() == ConnectionState::Error).await;
    }

    #[tokio::test]
    async fn error_frames_are_recorded() {
        let server = WsTestServer::start(ConnectionScript::SendThenHold(vec![
            r#"{"type":"error","payload":{"message":"backend unhappy"}}"#.into(),
        ]))
        .await;

        let errors = Arc::new(Mutex::new(Vec::new()));
        let handlers = Handlers::new().on_error({
            let errors = errors.clone();
            move |message| errors.lock().unwrap().push(message.to_string())
        });
        let client = RealtimeClient::new(test_config(server.url()), QueryCache::new(), handlers);

        client.connect();
        wait_until("error callback", || !errors.lock().unwrap().is_empty()).await;
        assert_eq!(client.last_error().as_deref(), Some("backend unhappy"));
        client.disconnect();
    }

    #[tokio::test]
    async fn set_enabled_drives_the_connection() {
        let server = WsTestServer::start(ConnectionScript::SendThenHold(vec![])).await;
        let client =
            RealtimeClient::new(test_config(server.url()), QueryCache::new(), Handlers::new());

        assert_eq!(client.state(), ConnectionState::Disconnected);
        // connect() moves to Connecting before the session task gets to run.
        client.set_enabled(true);
        assert_eq!(client.state(), ConnectionState::Connecting);
        wait_until("connected", || client.state() == ConnectionState::Connected).await;
        client.set_enabled(false);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn heartbeat_pings_while_connected() {
        let server = WsTestServer::start(ConnectionScript::SendThenHold(vec![])).await;
        let mut config = test_config(server.url());
        config.heartbeat_interval_secs = 1;
        let client = RealtimeClient::new(config, QueryCache::new(), Handlers::new());

        client.connect();
        wait_until("connected", || client.state() == ConnectionState::Connected).await;
        wait_until("heartbeat frame", || {
            server
                .received_frames()
                .iter()
                .any(|frame| frame == &ping_frame())
        })
        .await;
        client.disconnect();
    }

    #[tokio::test]
    async fn send_while_disconnected_is_dropped() {
        let config = test_config("ws://127.0.0.1:1".into());
        let client = RealtimeClient::new(config, QueryCache::new(), Handlers::new());
        client.send(r#"{"type":"ping"}"#);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
