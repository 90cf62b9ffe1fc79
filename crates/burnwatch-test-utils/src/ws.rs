// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted local WebSocket server.
//!
//! Binds an ephemeral loopback port and runs the same script against every
//! connection, so reconnect behavior can be observed through the connection
//! counter. Panics are fine here; this crate is test-only.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::trace;

/// What the server does with each accepted connection.
#[derive(Debug, Clone)]
pub enum ConnectionScript {
    /// Send the frames, then keep the connection open until the client
    /// closes it.
    SendThenHold(Vec<String>),
    /// Send the frames, then close from the server side.
    SendThenClose(Vec<String>),
}

pub struct WsTestServer {
    url: String,
    connections: Arc<AtomicU32>,
    received: Arc<Mutex<Vec<String>>>,
    _accept_loop: JoinHandle<()>,
}

impl WsTestServer {
    pub async fn start(script: ConnectionScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicU32::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        let counter = connections.clone();
        let inbox = received.clone();
        let accept_loop = tokio::spawn(async move {
            loop {
                let Ok((stream, peer)) = listener.accept().await else {
                    return;
                };
                trace!(%peer, "test server accepted connection");
                counter.fetch_add(1, Ordering::SeqCst);
                let script = script.clone();
                let inbox = inbox.clone();
                tokio::spawn(async move {
                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };
                    match script {
                        ConnectionScript::SendThenHold(frames) => {
                            for frame in frames {
                                if ws.send(Message::text(frame)).await.is_err() {
                                    return;
                                }
                            }
                            // Record inbound text until the client goes away.
                            while let Some(Ok(msg)) = ws.next().await {
                                match msg {
                                    Message::Text(text) => {
                                        inbox.lock().unwrap().push(text.as_str().to_string());
                                    }
                                    Message::Close(_) => break,
                                    _ => {}
                                }
                            }
                        }
                        ConnectionScript::SendThenClose(frames) => {
                            for frame in frames {
                                if ws.send(Message::text(frame)).await.is_err() {
                                    return;
                                }
                            }
                            let _ = ws.close(None).await;
                        }
                    }
                });
            }
        });

        Self {
            url: format!("ws://{addr}"),
            connections,
            received,
            _accept_loop: accept_loop,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Total connections accepted so far.
    pub fn connection_count(&self) -> u32 {
        self.connections.load(Ordering::SeqCst)
    }

    /// Text frames received from clients, in arrival order.
    pub fn received_frames(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for WsTestServer {
    fn drop(&mut self) {
        self._accept_loop.abort();
    }
}
