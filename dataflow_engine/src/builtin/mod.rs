// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Built-in Modules (C11, §4.11)
//!
//! `and`/`or`/`not` boolean gates, `passthrough` (identity copy), and
//! `delay` (configurable sleep-then-copy, used by the cancellation and
//! staged-parallelism scenarios in §8).

pub mod delay;
pub mod logic;
pub mod passthrough;

use dataflow_domain::module::ModuleFactory;
use std::sync::Arc;

pub fn factories() -> Vec<(&'static str, Arc<dyn ModuleFactory>)> {
    vec![
        ("and", Arc::new(logic::AndFactory) as Arc<dyn ModuleFactory>),
        ("or", Arc::new(logic::OrFactory) as Arc<dyn ModuleFactory>),
        ("not", Arc::new(logic::NotFactory) as Arc<dyn ModuleFactory>),
        ("passthrough", Arc::new(passthrough::PassthroughFactory) as Arc<dyn ModuleFactory>),
        ("delay", Arc::new(delay::DelayFactory) as Arc<dyn ModuleFactory>),
    ]
}
