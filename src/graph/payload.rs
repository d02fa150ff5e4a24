use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Graph payload produced by the upstream extraction pipeline.
///
/// The extraction side (document parsing, LLM calls) is a separate tool;
/// this viewer only agrees with it on this JSON shape.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<PayloadNode>,
    #[serde(default)]
    pub edges: Vec<PayloadEdge>,
    /// Variable id -> concept group name.
    #[serde(default)]
    pub groups: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PayloadNode {
    pub id: String,
    #[serde(default, rename = "isCore")]
    pub is_core: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PayloadEdge {
    pub source: String,
    pub target: String,
}

pub fn load_payload(path: &Path) -> Result<GraphPayload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let payload: GraphPayload = serde_json::from_str(&raw)
        .with_context(|| format!("invalid graph payload in {}", path.display()))?;
    Ok(payload)
}
