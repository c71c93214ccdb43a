//! Reading and writing Navigator layer documents.
//!
//! Defaults and null-pruning live in the serde attributes on the model types;
//! every document funnels through them, so a document missing any optional
//! field parses to the stated default and absent values are omitted on the
//! way back out.

use crate::error::{LayerError, Result};
use crate::layer::Layer;
use anyhow::Context;
use std::path::Path;

/// Parse a layer from a JSON document.
pub fn parse_layer(json: &str) -> Result<Layer> {
    serde_json::from_str(json).map_err(|e| LayerError::Validation(e.to_string()))
}

/// Parse a layer from an already-decoded JSON value.
pub fn layer_from_value(value: serde_json::Value) -> Result<Layer> {
    serde_json::from_value(value).map_err(|e| LayerError::Validation(e.to_string()))
}

/// Serialize a layer to compact JSON.
pub fn to_json_string(layer: &Layer) -> Result<String> {
    serde_json::to_string(layer).map_err(|e| LayerError::Validation(e.to_string()))
}

/// Serialize a layer to pretty-printed JSON, the shape the Navigator expects
/// to import.
pub fn to_json_string_pretty(layer: &Layer) -> Result<String> {
    serde_json::to_string_pretty(layer).map_err(|e| LayerError::Validation(e.to_string()))
}

/// Read a layer from a JSON file.
pub fn read_layer_file(path: &Path) -> anyhow::Result<Layer> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read layer file {}", path.display()))?;
    let layer = parse_layer(&content)
        .with_context(|| format!("parse layer file {}", path.display()))?;
    Ok(layer)
}

/// Write a layer to a JSON file, pretty-printed.
pub fn write_layer_file(path: &Path, layer: &Layer) -> anyhow::Result<()> {
    let json = to_json_string_pretty(layer)?;
    std::fs::write(path, json)
        .with_context(|| format!("write layer file {}", path.display()))?;
    Ok(())
}
