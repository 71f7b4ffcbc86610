//! Claim reference extraction.

use roxmltree::Node;

use crate::locator::ElementExt;
use crate::types::ClaimDescriptor;

/// Attributes naming the claim type, checked in order.
const CLAIM_TYPE_ATTRIBUTES: [&str; 2] = ["ClaimTypeReferenceId", "ClaimType"];

/// Map claim-reference elements to descriptors, preserving input order.
///
/// Elements naming no claim type still produce an entry with an empty
/// `claim_type`, so counts always match the source.
pub fn extract_claims<'a, 'input: 'a>(
    nodes: impl IntoIterator<Item = Node<'a, 'input>>,
) -> Vec<ClaimDescriptor> {
    nodes.into_iter().map(claim_descriptor).collect()
}

fn claim_descriptor(node: Node<'_, '_>) -> ClaimDescriptor {
    ClaimDescriptor {
        claim_type: node
            .attr_any(&CLAIM_TYPE_ATTRIBUTES)
            .unwrap_or_default()
            .to_string(),
        required: node.attribute("Required") == Some("true"),
    }
}
