//! Default journey lookup.
//!
//! The pointer is read from the relying-party layer only; the journey it
//! names may be declared in any supplied layer.

use roxmltree::Node;

use crate::layers::LayeredDocumentSet;
use crate::locator::{find_all, ElementExt};
use crate::resolver::PolicyError;
use crate::types::PolicyLayer;

const USER_JOURNEY: &str = "UserJourney";

/// A journey definition located for the default journey pointer.
#[derive(Debug, Clone)]
pub struct ResolvedJourney<'a, 'input> {
    /// `DefaultUserJourney/@ReferenceId`
    pub reference_id: String,
    /// Layer whose definition won
    pub layer: PolicyLayer,
    pub element: Node<'a, 'input>,
}

impl<'a, 'input: 'a> ResolvedJourney<'a, 'input> {
    /// `OrchestrationStep` elements in document order.
    pub fn step_elements(&self) -> Vec<Node<'a, 'input>> {
        find_all(self.element, "OrchestrationStep")
    }
}

/// Read the default journey reference id from the relying-party layer.
pub fn default_journey_reference(set: &LayeredDocumentSet<'_, '_>) -> Result<String, PolicyError> {
    let relying_party = set.relying_party().ok_or(PolicyError::MissingRelyingParty)?;
    let pointer = relying_party
        .find_first("DefaultUserJourney")
        .ok_or(PolicyError::MissingJourneyPointer)?;
    pointer
        .attr("ReferenceId")
        .map(str::to_string)
        .ok_or(PolicyError::MissingJourneyReference)
}

/// Locate the default journey, reporting why it could not be found.
pub fn try_resolve_default_journey<'a, 'input: 'a>(
    set: &LayeredDocumentSet<'a, 'input>,
) -> Result<ResolvedJourney<'a, 'input>, PolicyError> {
    let reference_id = default_journey_reference(set)?;

    match set.find_by_id(USER_JOURNEY, &reference_id) {
        Some((layer, element)) => {
            tracing::debug!(journey = %reference_id, layer = %layer, "Located default journey");
            Ok(ResolvedJourney {
                reference_id,
                layer,
                element,
            })
        }
        None => Err(PolicyError::JourneyNotFound { reference_id }),
    }
}

/// Locate the default journey; `None` when any link of the lookup is missing.
pub fn resolve_default_journey<'a, 'input: 'a>(
    set: &LayeredDocumentSet<'a, 'input>,
) -> Option<ResolvedJourney<'a, 'input>> {
    try_resolve_default_journey(set).ok()
}
