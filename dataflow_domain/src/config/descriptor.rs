// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module & Pipeline Descriptors (C3)
//!
//! The declarative shape the compiler (C5) consumes, matching the
//! serialized YAML/JSON form of §6 exactly: `module_type`, optional
//! `module_alias`, `module_config`, `input_links`. A pipeline descriptor is
//! a module descriptor whose config additionally carries `modules`,
//! `input_aliases`, and `output_aliases`.

use super::input_link::InputLinkSpecDto;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One child entry in a pipeline's `modules` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptorDto {
    pub module_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_alias: Option<String>,
    #[serde(default)]
    pub module_config: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub input_links: HashMap<String, InputLinkSpecDto>,
}

/// A pipeline descriptor, as read from a `.yaml`/`.yml`/`.json` file (§6).
/// Registered under `module_type_name` if present, otherwise the file stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDescriptorDto {
    pub modules: Vec<ModuleDescriptorDto>,
    /// `"<child_alias>__<port>" -> "<external_name>"`.
    #[serde(default)]
    pub input_aliases: HashMap<String, String>,
    /// `"<child_alias>__<port>" -> "<external_name>"`.
    #[serde(default)]
    pub output_aliases: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl PipelineDescriptorDto {
    /// Looks up the external workflow-input name bound to `(child_alias,
    /// port)`, defaulting to `"{child_alias}__{port}"` per §4.5 step 3.
    pub fn resolve_input_alias(&self, child_alias: &str, port: &str) -> String {
        let key = format!("{child_alias}__{port}");
        self.input_aliases.get(&key).cloned().unwrap_or(key)
    }

    /// Looks up the external workflow-output name bound to `(child_alias,
    /// port)`, if the pipeline exposes it explicitly.
    pub fn resolve_output_alias(&self, child_alias: &str, port: &str) -> Option<String> {
        let key = format!("{child_alias}__{port}");
        self.output_aliases.get(&key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_alias_is_alias_dunder_port() {
        let dto = PipelineDescriptorDto {
            modules: Vec::new(),
            input_aliases: HashMap::new(),
            output_aliases: HashMap::new(),
            module_type_name: None,
            doc: None,
        };
        assert_eq!(dto.resolve_input_alias("gate", "enabled"), "gate__enabled");
    }

    #[test]
    fn explicit_input_alias_overrides_default() {
        let mut input_aliases = HashMap::new();
        input_aliases.insert("gate_a__enabled".to_string(), "global_enabled".to_string());
        input_aliases.insert("gate_b__enabled".to_string(), "global_enabled".to_string());
        let dto = PipelineDescriptorDto {
            modules: Vec::new(),
            input_aliases,
            output_aliases: HashMap::new(),
            module_type_name: None,
            doc: None,
        };
        assert_eq!(dto.resolve_input_alias("gate_a", "enabled"), "global_enabled");
        assert_eq!(dto.resolve_input_alias("gate_b", "enabled"), "global_enabled");
    }

    #[test]
    fn deserializes_from_yaml_shaped_json() {
        let json = serde_json::json!({
            "modules": [
                {"module_type": "and", "module_alias": "and_1"},
                {"module_type": "not", "input_links": {"a": "and_1.y"}}
            ],
            "output_aliases": {"not__y": "result"}
        });
        let dto: PipelineDescriptorDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.modules.len(), 2);
        assert_eq!(dto.modules[0].module_alias.as_deref(), Some("and_1"));
    }
}
