//! Orchestration step resolution.
//!
//! Walks a journey's `OrchestrationStep` elements in document order and binds
//! every referenced technical profile across the layered set. A profile that
//! cannot be found becomes a not-found marker; it never stops the walk.

use roxmltree::Node;

use crate::content::ContentIndex;
use crate::layers::LayeredDocumentSet;
use crate::locator::{find_all, ElementExt};
use crate::profile::resolve_profile;
use crate::types::{Precondition, ResolvedProfile, ResolvedStep, StepKind};

/// Attribute order used to read a profile id off a step reference.
const PROFILE_ID_ATTRIBUTES: [&str; 2] = ["TechnicalProfileReferenceId", "Id"];

/// Attribute order used to read a predicate id.
const PREDICATE_ID_ATTRIBUTES: [&str; 2] = ["ReferenceId", "Id"];

/// Builds resolved steps against one layered set.
///
/// The content index is built once per builder and shared by every step.
pub struct OrchestrationBuilder<'s, 'a, 'input> {
    set: &'s LayeredDocumentSet<'a, 'input>,
    content: ContentIndex,
    warn_on_unresolved: bool,
}

impl<'s, 'a, 'input: 'a> OrchestrationBuilder<'s, 'a, 'input> {
    /// Create a builder, indexing content definitions of every layer.
    pub fn new(set: &'s LayeredDocumentSet<'a, 'input>) -> Self {
        Self::with_content_index(set, ContentIndex::build(set))
    }

    /// Create a builder around an index that was already built for `set`.
    pub fn with_content_index(set: &'s LayeredDocumentSet<'a, 'input>, content: ContentIndex) -> Self {
        Self {
            set,
            content,
            warn_on_unresolved: false,
        }
    }

    /// Builder: log unresolved profile ids at warn level instead of debug.
    pub fn warn_on_unresolved(mut self, warn: bool) -> Self {
        self.warn_on_unresolved = warn;
        self
    }

    pub fn content_index(&self) -> &ContentIndex {
        &self.content
    }

    /// One resolved step per `OrchestrationStep` under `journey`, in document order.
    pub fn build_steps(&self, journey: Node<'a, 'input>) -> Vec<ResolvedStep> {
        find_all(journey, "OrchestrationStep")
            .into_iter()
            .map(|step| self.build_step(step))
            .collect()
    }

    /// Resolve a single `OrchestrationStep` element.
    pub fn build_step(&self, step: Node<'a, 'input>) -> ResolvedStep {
        let order = step
            .attr("Order")
            .and_then(|o| o.trim().parse::<u32>().ok());

        let claims_exchanges = step.find_all("ClaimsExchange");
        let technical_profiles = step.find_all("TechnicalProfile");

        let declared_type = step.child_text("Type");
        let kind = match declared_type.as_deref() {
            Some(text) => StepKind::from_declared(text),
            None if !claims_exchanges.is_empty() => StepKind::ClaimsExchange,
            None if !technical_profiles.is_empty() => StepKind::UserInterface,
            None => StepKind::Unknown,
        };

        let profile_nodes = if claims_exchanges.is_empty() {
            &technical_profiles
        } else {
            &claims_exchanges
        };
        let profile_ids: Vec<String> = profile_nodes
            .iter()
            .filter_map(|n| n.attr_any(&PROFILE_ID_ATTRIBUTES))
            .map(str::to_string)
            .collect();

        let journey_ref = step.find_first("JourneyReference");

        let predicate_nodes = step.find_all("PredicateReference");
        let is_conditioned = step.find_first("Preconditions").is_some() || !predicate_nodes.is_empty();
        let predicate_refs = predicate_nodes
            .iter()
            .filter_map(|n| n.attr_any(&PREDICATE_ID_ATTRIBUTES))
            .map(str::to_string)
            .collect();

        let profiles: Vec<ResolvedProfile> = profile_ids
            .iter()
            .map(|id| resolve_profile(id, self.set, &self.content))
            .collect();

        for missing in profiles.iter().filter(|p| p.is_not_found()) {
            if self.warn_on_unresolved {
                tracing::warn!(step = ?order, profile = %missing.id(), "Technical profile not found in any layer");
            } else {
                tracing::debug!(step = ?order, profile = %missing.id(), "Technical profile not found in any layer");
            }
        }

        ResolvedStep {
            order,
            kind,
            declared_type,
            profile_ids,
            profiles,
            is_recursive: journey_ref.is_some(),
            referenced_journey_id: journey_ref
                .and_then(|j| j.attr("Id"))
                .map(str::to_string),
            is_conditioned,
            predicate_refs,
            preconditions: step
                .find_all("Precondition")
                .into_iter()
                .map(precondition)
                .collect(),
        }
    }
}

fn precondition(node: Node<'_, '_>) -> Precondition {
    Precondition {
        condition_type: node.attr("Type").map(str::to_string),
        // Literal "true" like claim `Required`; any other value is false
        execute_actions_if: node.attr("ExecuteActionsIf").map(|v| v == "true"),
        values: node
            .find_all("Value")
            .into_iter()
            .filter_map(|v| v.text_content())
            .collect(),
        action: node.child_text("Action"),
    }
}

/// Resolve every step of `journey` with a fresh content index.
pub fn build_steps<'a, 'input: 'a>(
    journey: Node<'a, 'input>,
    set: &LayeredDocumentSet<'a, 'input>,
) -> Vec<ResolvedStep> {
    OrchestrationBuilder::new(set).build_steps(journey)
}
