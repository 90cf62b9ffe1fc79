// SPDX-FileCopyrightText: 2026 Burnwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test helpers shared across Burnwatch crates. Only ever a dev-dependency.

pub mod ws;
