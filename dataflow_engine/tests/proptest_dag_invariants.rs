// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Property tests over randomly generated gate networks: the compiler
//! (C5) must never reject a genuine DAG, every execution edge must point
//! from a strictly earlier stage to a strictly later one, compiling the
//! same descriptor twice must yield identical stage assignments (§4.5
//! determinism), and a ring of any length must always be rejected as
//! `CyclicDependency`.

use dataflow_domain::compiler::{compile, CompileOptions};
use dataflow_domain::config::{InputLinkSpecDto, ModuleDescriptorDto, PipelineDescriptorDto};
use dataflow_domain::value_objects::Address;
use dataflow_engine::Registry;
use proptest::prelude::*;
use std::collections::HashMap;

/// Builds a `count`-module "and"-gate chain where module `i`'s `a` input
/// may link to an earlier module's `y` output per `back_edges[i]` (`None`
/// leaves it as a free workflow input), guaranteeing acyclicity by
/// construction: every link points strictly backward by index.
fn descriptor_from(back_edges: &[Option<usize>]) -> PipelineDescriptorDto {
    let modules = back_edges
        .iter()
        .enumerate()
        .map(|(i, back)| {
            let mut input_links = HashMap::new();
            if let Some(j) = back {
                input_links.insert("a".to_string(), InputLinkSpecDto::Short(format!("gate_{j}.y")));
            }
            ModuleDescriptorDto {
                module_type: "and".to_string(),
                module_alias: Some(format!("gate_{i}")),
                module_config: serde_json::Map::new(),
                input_links,
            }
        })
        .collect();

    PipelineDescriptorDto {
        modules,
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        module_type_name: None,
        doc: None,
    }
}

/// Generates `2..=8` modules with random backward-only links: each raw
/// value is reduced modulo `i + 1` so it always names an earlier module
/// (or, when it reduces to `i` itself, no link at all).
fn back_edges_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    (2usize..=8).prop_flat_map(|count| {
        proptest::collection::vec(0u32..1000, count).prop_map(move |raw| {
            raw.iter()
                .enumerate()
                .map(|(i, r)| {
                    let parent = (*r as usize) % (i + 1);
                    if parent == i { None } else { Some(parent) }
                })
                .collect()
        })
    })
}

/// Builds a `count`-module ring: module `i` depends on module `i - 1`,
/// and module `0` depends on the last module, closing a cycle of the
/// requested length.
fn cyclic_ring_descriptor(count: usize) -> PipelineDescriptorDto {
    let modules = (0..count)
        .map(|i| {
            let prev = if i == 0 { count - 1 } else { i - 1 };
            let mut input_links = HashMap::new();
            input_links.insert("a".to_string(), InputLinkSpecDto::Short(format!("gate_{prev}.y")));
            ModuleDescriptorDto {
                module_type: "and".to_string(),
                module_alias: Some(format!("gate_{i}")),
                module_config: serde_json::Map::new(),
                input_links,
            }
        })
        .collect();

    PipelineDescriptorDto {
        modules,
        input_aliases: HashMap::new(),
        output_aliases: HashMap::new(),
        module_type_name: None,
        doc: None,
    }
}

proptest! {
    #[test]
    fn random_dag_always_compiles_without_cycles(back_edges in back_edges_strategy()) {
        let registry = Registry::with_builtin_modules();
        let descriptor = descriptor_from(&back_edges);
        let compiled = compile(&Address::root(), &descriptor, &registry, CompileOptions::default())
            .expect("backward-only links can never form a cycle");

        for (src, dst) in &compiled.structure.execution_edges {
            let src_stage = compiled.modules[src].execution_stage().get();
            let dst_stage = compiled.modules[dst].execution_stage().get();
            prop_assert!(src_stage < dst_stage, "edge {src} -> {dst} must strictly increase stage");
        }
    }

    #[test]
    fn compiling_twice_yields_identical_stage_assignment(back_edges in back_edges_strategy()) {
        let registry = Registry::with_builtin_modules();
        let descriptor = descriptor_from(&back_edges);
        let first = compile(&Address::root(), &descriptor, &registry, CompileOptions::default()).unwrap();
        let second = compile(&Address::root(), &descriptor, &registry, CompileOptions::default()).unwrap();

        for alias in &first.structure.children {
            prop_assert_eq!(
                first.modules[alias].execution_stage().get(),
                second.modules[alias].execution_stage().get()
            );
        }
    }

    #[test]
    fn ring_of_any_length_is_rejected_as_cyclic(count in 2usize..=8) {
        let registry = Registry::with_builtin_modules();
        let descriptor = cyclic_ring_descriptor(count);
        let result = compile(&Address::root(), &descriptor, &registry, CompileOptions::default());
        prop_assert!(matches!(result, Err(dataflow_domain::PipelineError::CyclicDependency(_))));
    }
}
