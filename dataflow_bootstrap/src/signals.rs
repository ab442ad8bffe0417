// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signal Handling
//!
//! Installs SIGINT/SIGTERM handlers that drive a `shutdown::ShutdownCoordinator`'s
//! `CancellationToken`, so an in-flight `run` can finish its current stage and
//! report `Cancelled` (§4.8/§6) instead of being killed outright.

use crate::shutdown::ShutdownCoordinator;
use std::sync::Arc;

/// Spawns a background task that waits for SIGINT or SIGTERM (Unix) /
/// Ctrl-C (all platforms) and calls `coordinator.initiate_shutdown()`.
///
/// Returns the join handle so callers can await it during their own
/// shutdown sequence, though in practice the process usually exits shortly
/// after the coordinator's token is observed.
pub fn install_handler(coordinator: Arc<ShutdownCoordinator>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received, initiating graceful shutdown");
        coordinator.initiate_shutdown();
    })
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
