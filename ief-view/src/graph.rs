//! Step graph topology.
//!
//! One node per resolved step and one edge between each pair of consecutive
//! steps in document order. Layout and styling are left to the renderer.

use ief_resolver::{ResolutionResult, ResolvedStep, StepKind};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A node standing for one orchestration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StepNode {
    /// `step-<order>`, or `step-#<position>` when the step has no order
    pub id: String,
    pub order: Option<u32>,
    pub kind: StepKind,
    /// Declared type text when present, otherwise the kind name
    pub label: String,
    pub profile_ids: Vec<String>,
    pub unresolved: usize,
}

/// Directed link from a step to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StepEdge {
    /// `edge-<a>-<b>`
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Linear chain of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StepGraph {
    pub nodes: Vec<StepNode>,
    pub edges: Vec<StepEdge>,
}

impl StepGraph {
    /// Build the chain for `result`.
    pub fn from_result(result: &ResolutionResult) -> Self {
        let keys: Vec<String> = result
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| step_key(step, index))
            .collect();

        let nodes = result
            .steps
            .iter()
            .zip(&keys)
            .map(|(step, key)| StepNode {
                id: format!("step-{}", key),
                order: step.order,
                kind: step.kind,
                label: step_label(step).to_string(),
                profile_ids: step.profile_ids.clone(),
                unresolved: step.profiles.iter().filter(|p| p.is_not_found()).count(),
            })
            .collect();

        let edges = keys
            .windows(2)
            .map(|pair| StepEdge {
                id: format!("edge-{}-{}", pair[0], pair[1]),
                source: format!("step-{}", pair[0]),
                target: format!("step-{}", pair[1]),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            journey = %result.journey_ref_id,
            nodes = keys.len(),
            edges = edges.len(),
            "Built step graph"
        );

        Self { nodes, edges }
    }

    /// Position of the first step whose node id is `node_id`.
    pub fn step_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == node_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Order text, or `#<position>` counted from 1 when absent.
pub(crate) fn step_key(step: &ResolvedStep, index: usize) -> String {
    match step.order {
        Some(order) => order.to_string(),
        None => format!("#{}", index + 1),
    }
}

/// Text shown for a step's type.
pub fn step_label(step: &ResolvedStep) -> &str {
    step.declared_type
        .as_deref()
        .unwrap_or_else(|| step.kind.as_str())
}
