// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Concrete Executors (C8)
//!
//! `dataflow-domain` defines the `Executor` port and the `run_stages`
//! driver; these two implementations supply the runtime. Both let every
//! submitted module in a stage finish even if one fails, then report
//! `StageFailed` naming every failure, per §4.8.

pub mod cooperative;
pub mod worker_pool;

pub use cooperative::CooperativeExecutor;
pub use worker_pool::WorkerPoolExecutor;
