//! Override analysis between policy layers.
//!
//! When the same element id is declared in more than one layer, the
//! highest-precedence declaration wins and the others are shadowed. This
//! module reports those cases so a policy author can see what each layer
//! actually contributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::layers::LayeredDocumentSet;
use crate::locator::{find_all, ElementExt};
use crate::types::PolicyLayer;

/// An id declared in more than one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct LayerOverride {
    /// Element kind, e.g. `TechnicalProfile`
    pub element: String,
    pub id: String,
    /// Layer whose declaration is used
    pub winner: PolicyLayer,
    /// Lower layers whose declarations are hidden, highest first
    pub shadowed: Vec<PolicyLayer>,
}

/// Finds ids redeclared across layers.
pub struct OverrideAnalyzer {
    elements: Vec<String>,
}

impl OverrideAnalyzer {
    /// Analyze the element kinds that resolution looks up by id.
    pub fn new() -> Self {
        Self::for_elements(["TechnicalProfile", "UserJourney", "ContentDefinition"])
    }

    /// Analyze a custom set of element kinds.
    pub fn for_elements<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }

    /// Every overridden id, ordered by element kind then id.
    pub fn analyze(&self, set: &LayeredDocumentSet<'_, '_>) -> Vec<LayerOverride> {
        let mut overrides = Vec::new();

        for element in &self.elements {
            // id -> declaring layers, highest first
            let mut by_id: BTreeMap<&str, Vec<PolicyLayer>> = BTreeMap::new();

            for doc in set.iter() {
                for node in find_all(doc.root, element) {
                    let Some(id) = node.attr("Id") else {
                        continue;
                    };
                    let layers = by_id.entry(id).or_default();
                    if !layers.contains(&doc.layer) {
                        layers.push(doc.layer);
                    }
                }
            }

            for (id, layers) in by_id {
                if let Some((winner, shadowed)) = layers.split_first() {
                    if !shadowed.is_empty() {
                        overrides.push(LayerOverride {
                            element: element.clone(),
                            id: id.to_string(),
                            winner: *winner,
                            shadowed: shadowed.to_vec(),
                        });
                    }
                }
            }
        }

        overrides
    }

    /// Explanation of one override for audit output.
    pub fn explain(&self, entry: &LayerOverride) -> String {
        let mut explanation = format!(
            "{} '{}' is declared in {} layers:\n",
            entry.element,
            entry.id,
            entry.shadowed.len() + 1
        );

        explanation.push_str(&format!("  - {} (used)\n", entry.winner.as_str()));
        for layer in &entry.shadowed {
            explanation.push_str(&format!("  - {} (shadowed)\n", layer.as_str()));
        }

        explanation.push_str(&format!(
            "\nResolution: {} layer takes precedence.\n",
            entry.winner.as_str()
        ));

        explanation
    }
}

impl Default for OverrideAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
