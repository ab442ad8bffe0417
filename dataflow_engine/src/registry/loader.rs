// /////////////////////////////////////////////////////////////////////////////
// Dataflow Pipeline Engine
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Descriptor Loader (C10, §4.10)
//!
//! Walks a directory tree, skipping excluded directory names (default
//! `.git`, `.tox`, `.cache`), parsing every `.yaml`/`.yml`/`.json` file as a
//! `PipelineDescriptorDto` and registering it under `module_type_name` if
//! present, otherwise the file stem.

use crate::error::EngineError;
use dataflow_domain::config::PipelineDescriptorDto;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DescriptorLoader {
    exclusions: Vec<String>,
}

impl DescriptorLoader {
    pub fn new(exclusions: Vec<String>) -> Self {
        Self { exclusions }
    }

    /// Recursively scans `root`, returning every `(name, descriptor)` pair
    /// found. Order follows directory-entry order, not sorted — callers
    /// that need determinism should sort by name themselves.
    pub fn scan(&self, root: &Path) -> Result<Vec<(String, PipelineDescriptorDto)>, EngineError> {
        let mut found = Vec::new();
        self.scan_into(root, &mut found)?;
        Ok(found)
    }

    fn scan_into(&self, dir: &Path, found: &mut Vec<(String, PipelineDescriptorDto)>) -> Result<(), EngineError> {
        let entries = fs::read_dir(dir).map_err(|e| EngineError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::io(dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                if self.is_excluded(&path) {
                    continue;
                }
                self.scan_into(&path, found)?;
                continue;
            }
            if let Some((name, descriptor)) = self.parse_descriptor_file(&path)? {
                found.push((name, descriptor));
            }
        }
        Ok(())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.exclusions.iter().any(|ex| ex == name))
            .unwrap_or(false)
    }

    fn parse_descriptor_file(&self, path: &Path) -> Result<Option<(String, PipelineDescriptorDto)>, EngineError> {
        let descriptor = match Self::load_file(path)? {
            Some(d) => d,
            None => return Ok(None),
        };
        let name = descriptor
            .module_type_name
            .clone()
            .unwrap_or_else(|| file_stem(path));
        Ok(Some((name, descriptor)))
    }

    /// Parses a single descriptor file by extension, for the CLI's
    /// `compile`/`run`/`inspect` commands that name a file directly rather
    /// than discovering one via `scan`. Returns `Ok(None)` for an
    /// unrecognized extension.
    pub fn load_file(path: &Path) -> Result<Option<PipelineDescriptorDto>, EngineError> {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return Ok(None),
        };

        let descriptor: PipelineDescriptorDto = match ext.as_str() {
            "yaml" | "yml" => {
                let contents = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
                serde_yaml::from_str(&contents).map_err(|e| EngineError::yaml(path, e))?
            }
            "json" => {
                let contents = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
                serde_json::from_str(&contents).map_err(|e| EngineError::json(path, e))?
            }
            _ => return Ok(None),
        };

        Ok(Some(descriptor))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string()
}
