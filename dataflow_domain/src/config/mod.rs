// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Module/pipeline descriptors and config validation (C3).

pub mod descriptor;
pub mod input_link;

pub use descriptor::{ModuleDescriptorDto, PipelineDescriptorDto};
pub use input_link::{parse_input_link, InputLinkSpecDto, NormalizedInputLink};
