// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Input-Link Shorthand Parsing (§4.3)
//!
//! An `input_links` entry for port `p` may be written in three shapes:
//! a short string (`"alias.port"` or `"alias"`), an explicit mapping
//! (`{module_id, output_name}`), or a two-element sequence (`[alias,
//! port]`). All three normalize to the same `{module_id, value_name}` pair.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputLinkSpecDto {
    Short(String),
    Mapping { module_id: String, output_name: String },
    Pair(String, String),
}

/// The normalized form every shorthand collapses to: the source child's
/// alias and the name of its output port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInputLink {
    pub module_id: String,
    pub value_name: String,
}

/// Normalizes one `input_links` entry for input port `port`.
pub fn parse_input_link(port: &str, spec: &InputLinkSpecDto) -> Result<NormalizedInputLink, PipelineError> {
    match spec {
        InputLinkSpecDto::Short(s) => {
            if let Some((alias, output)) = s.split_once('.') {
                if alias.is_empty() || output.is_empty() {
                    return Err(PipelineError::bad_input_link(port, format!("malformed reference '{s}'")));
                }
                Ok(NormalizedInputLink {
                    module_id: alias.to_string(),
                    value_name: output.to_string(),
                })
            } else if s.is_empty() {
                Err(PipelineError::bad_input_link(port, "empty alias"))
            } else {
                Ok(NormalizedInputLink {
                    module_id: s.clone(),
                    value_name: port.to_string(),
                })
            }
        }
        InputLinkSpecDto::Mapping { module_id, output_name } => Ok(NormalizedInputLink {
            module_id: module_id.clone(),
            value_name: output_name.clone(),
        }),
        InputLinkSpecDto::Pair(alias, output) => Ok(NormalizedInputLink {
            module_id: alias.clone(),
            value_name: output.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_with_dot_splits_alias_and_port() {
        let link = parse_input_link("a", &InputLinkSpecDto::Short("and_1.y".into())).unwrap();
        assert_eq!(link.module_id, "and_1");
        assert_eq!(link.value_name, "y");
    }

    #[test]
    fn bare_alias_assumes_same_port_name() {
        let link = parse_input_link("enabled", &InputLinkSpecDto::Short("gate".into())).unwrap();
        assert_eq!(link.module_id, "gate");
        assert_eq!(link.value_name, "enabled");
    }

    #[test]
    fn mapping_form_is_passed_through() {
        let link = parse_input_link(
            "a",
            &InputLinkSpecDto::Mapping {
                module_id: "not1".into(),
                output_name: "y".into(),
            },
        )
        .unwrap();
        assert_eq!(link.module_id, "not1");
        assert_eq!(link.value_name, "y");
    }

    #[test]
    fn pair_form_is_alias_then_port() {
        let link = parse_input_link("a", &InputLinkSpecDto::Pair("or_1".into(), "y".into())).unwrap();
        assert_eq!(link.module_id, "or_1");
        assert_eq!(link.value_name, "y");
    }

    #[test]
    fn empty_alias_is_bad_input_link() {
        assert!(matches!(
            parse_input_link("a", &InputLinkSpecDto::Short(String::new())),
            Err(PipelineError::BadInputLink { .. })
        ));
    }
}
