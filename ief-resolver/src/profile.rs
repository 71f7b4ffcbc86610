//! Technical profile resolution across layers.

use roxmltree::Node;

use crate::claims::extract_claims;
use crate::content::ContentIndex;
use crate::layers::LayeredDocumentSet;
use crate::locator::ElementExt;
use crate::types::{
    MetadataItem, PolicyLayer, ProfileDetails, ResolvedProfile, TechnicalProfileDefinition,
    PROPRIETARY_PROTOCOL, UNKNOWN_PROTOCOL,
};

const TECHNICAL_PROFILE: &str = "TechnicalProfile";
const CONTENT_DEFINITION_KEY: &str = "ContentDefinitionReferenceId";
const SELF_ASSERTED_MARKER: &str = "SelfAsserted";

/// A `TechnicalProfile` element and the layer it was found in.
#[derive(Debug, Clone, Copy)]
pub struct ProfileMatch<'a, 'input> {
    pub element: Node<'a, 'input>,
    pub layer: PolicyLayer,
}

/// Find the highest-precedence definition of `id`.
///
/// `None` is an ordinary outcome: partial policy sets are expected input.
pub fn find_profile<'a, 'input: 'a>(
    id: &str,
    set: &LayeredDocumentSet<'a, 'input>,
) -> Option<ProfileMatch<'a, 'input>> {
    set.find_by_id(TECHNICAL_PROFILE, id)
        .map(|(layer, element)| ProfileMatch { element, layer })
}

impl TechnicalProfileDefinition {
    /// Read a definition from a `TechnicalProfile` element.
    pub fn from_element(element: Node<'_, '_>) -> Self {
        let metadata: Vec<MetadataItem> = element
            .find_all("Item")
            .into_iter()
            .filter_map(|item| {
                item.attr("Key").map(|key| MetadataItem {
                    key: key.to_string(),
                    value: item.text_content().unwrap_or_default(),
                })
            })
            .collect();

        let content_definition = metadata
            .iter()
            .find(|item| item.key == CONTENT_DEFINITION_KEY)
            .map(|item| item.value.clone())
            .filter(|value| !value.is_empty());

        Self {
            id: element.attr("Id").unwrap_or_default().to_string(),
            protocol: element
                .find_first("Protocol")
                .and_then(|p| p.attr("Name"))
                .unwrap_or(UNKNOWN_PROTOCOL)
                .to_string(),
            display_name: element.child_text("DisplayName"),
            input_claims: extract_claims(element.find_all("InputClaim")),
            output_claims: extract_claims(element.find_all("OutputClaim")),
            metadata,
            metadata_blocks: element.find_all("Metadata").len(),
            content_definition,
            // One entry per reference element, empty when it names no id
            localized_resources: element
                .find_all("LocalizedResourcesReference")
                .into_iter()
                .map(|l| l.attr("ReferenceId").unwrap_or_default().to_string())
                .collect(),
        }
    }

    /// Id contains `SelfAsserted`, whatever the protocol.
    pub fn is_self_asserted(&self) -> bool {
        self.id.contains(SELF_ASSERTED_MARKER)
    }

    /// Proprietary protocol with at least one `Metadata` block.
    pub fn is_rest(&self) -> bool {
        self.protocol == PROPRIETARY_PROTOCOL && self.metadata_blocks > 0
    }
}

/// Resolve `id` to a consumer-facing profile, or a not-found marker.
pub fn resolve_profile(
    id: &str,
    set: &LayeredDocumentSet<'_, '_>,
    content: &ContentIndex,
) -> ResolvedProfile {
    let Some(found) = find_profile(id, set) else {
        return ResolvedProfile::NotFound { id: id.to_string() };
    };

    let mut definition = TechnicalProfileDefinition::from_element(found.element);
    // The matched element's Id equals the requested id by construction
    definition.id = id.to_string();

    let content_info = definition
        .content_definition
        .as_deref()
        .and_then(|cd| content.get(cd))
        .cloned();

    let shadowed_layers = set
        .layers_defining(TECHNICAL_PROFILE, id)
        .into_iter()
        .filter(|layer| found.layer.can_override(layer))
        .collect();

    ResolvedProfile::Resolved(ProfileDetails {
        is_self_asserted: definition.is_self_asserted(),
        is_rest: definition.is_rest(),
        source_layer: found.layer,
        content_info,
        shadowed_layers,
        definition,
    })
}
