//! Layered policy documents.
//!
//! A [`LayeredDocumentSet`] holds up to one parsed tree per [`PolicyLayer`],
//! always ordered from highest to lowest precedence. Every cross-layer lookup
//! goes through [`LayeredDocumentSet::find_by_id`], so the override rule
//! (RelyingParty, then Extension, then Base, first match wins) lives in one place.

pub mod sources;

pub use sources::{ParsedPolicies, PolicySources, PolicyText};

use roxmltree::{Document, Node};

use crate::locator::{find_all, ElementExt};
use crate::types::PolicyLayer;

/// One parsed document tagged with its layer role.
#[derive(Debug, Clone, Copy)]
pub struct LayerDocument<'a, 'input> {
    pub layer: PolicyLayer,
    pub root: Node<'a, 'input>,
}

/// Ordered set of the supplied policy layers.
///
/// Only supplied layers take part in lookups. The set never mutates the trees
/// it borrows.
#[derive(Debug, Clone, Default)]
pub struct LayeredDocumentSet<'a, 'input> {
    /// Sorted by descending precedence, at most one entry per layer
    layers: Vec<LayerDocument<'a, 'input>>,
}

impl<'a, 'input: 'a> LayeredDocumentSet<'a, 'input> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Build a set from the three optional layer documents.
    pub fn from_documents(
        relying_party: Option<&'a Document<'input>>,
        extension: Option<&'a Document<'input>>,
        base: Option<&'a Document<'input>>,
    ) -> Self {
        let mut set = Self::new();
        let supplied = [
            (PolicyLayer::RelyingParty, relying_party),
            (PolicyLayer::Extension, extension),
            (PolicyLayer::Base, base),
        ];
        for (layer, doc) in supplied {
            if let Some(doc) = doc {
                set.insert(layer, doc.root());
            }
        }
        set
    }

    /// Builder: add a parsed document for `layer`.
    pub fn with_document(mut self, layer: PolicyLayer, doc: &'a Document<'input>) -> Self {
        self.insert(layer, doc.root());
        self
    }

    /// Add or replace the tree for `layer`.
    pub fn insert(&mut self, layer: PolicyLayer, root: Node<'a, 'input>) {
        self.layers.retain(|d| d.layer != layer);
        self.layers.push(LayerDocument { layer, root });
        self.layers
            .sort_by(|a, b| b.layer.precedence().cmp(&a.layer.precedence()));
    }

    /// Tree for a specific layer.
    pub fn get(&self, layer: PolicyLayer) -> Option<Node<'a, 'input>> {
        self.layers
            .iter()
            .find(|d| d.layer == layer)
            .map(|d| d.root)
    }

    /// The top layer, required for any resolution.
    pub fn relying_party(&self) -> Option<Node<'a, 'input>> {
        self.get(PolicyLayer::RelyingParty)
    }

    pub fn contains(&self, layer: PolicyLayer) -> bool {
        self.get(layer).is_some()
    }

    /// Supplied layers in lookup order (highest first).
    pub fn iter(&self) -> impl Iterator<Item = &LayerDocument<'a, 'input>> + '_ {
        self.layers.iter()
    }

    /// Supplied layers in override-scan order (lowest first).
    pub fn iter_ascending(&self) -> impl Iterator<Item = &LayerDocument<'a, 'input>> + '_ {
        self.layers.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// First `tag` element whose `Id` equals `id`, searching layers by precedence.
    ///
    /// Stops at the first hit; within a layer, document order decides.
    pub fn find_by_id(&self, tag: &str, id: &str) -> Option<(PolicyLayer, Node<'a, 'input>)> {
        self.layers.iter().find_map(|doc| {
            find_all(doc.root, tag)
                .into_iter()
                .find(|n| n.attr("Id") == Some(id))
                .map(|n| (doc.layer, n))
        })
    }

    /// Every supplied layer declaring a `tag` element with this `Id`, highest first.
    pub fn layers_defining(&self, tag: &str, id: &str) -> Vec<PolicyLayer> {
        self.layers
            .iter()
            .filter(|doc| {
                find_all(doc.root, tag)
                    .iter()
                    .any(|n| n.attr("Id") == Some(id))
            })
            .map(|doc| doc.layer)
            .collect()
    }
}
