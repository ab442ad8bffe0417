// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! State-change notifications (C7). Deliberately lightweight: the engine
//! does not event-source module state (no replay, no append-only log), it
//! just lets callers observe transitions for logging and introspection.

use crate::state::ModuleState;
use crate::value_objects::Address;

#[derive(Debug, Clone)]
pub struct ModuleStateChanged {
    pub address: Address,
    pub from: ModuleState,
    pub to: ModuleState,
}

/// Observer invoked whenever a module's computed state changes. Registered
/// per assembled pipeline; failures are not propagated (observation must
/// not affect scheduling).
pub trait StateChangeObserver: Send + Sync {
    fn on_state_changed(&self, event: &ModuleStateChanged);
}
