// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime push channel: a reconnecting WebSocket client that turns backend
//! update frames into callbacks and query-cache invalidations.

pub mod client;
pub mod message;

pub use client::{ConnectionState, Handlers, RealtimeClient};
pub use message::{Envelope, MessageKind};
