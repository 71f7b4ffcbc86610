//! Owned policy text and parsing into a [`LayeredDocumentSet`].

use roxmltree::Document;
use sha2::{Digest, Sha256};

use super::LayeredDocumentSet;
use crate::resolver::PolicyError;
use crate::types::PolicyLayer;

/// Raw text of one policy file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyText {
    /// File name, for diagnostics only
    pub name: String,
    pub xml: String,
}

impl PolicyText {
    pub fn new(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xml: xml.into(),
        }
    }
}

/// Up to three policy files, one per layer.
#[derive(Debug, Clone, Default)]
pub struct PolicySources {
    relying_party: Option<PolicyText>,
    extension: Option<PolicyText>,
    base: Option<PolicyText>,
}

impl PolicySources {
    /// Create an empty source set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the text for `layer`, replacing any previous one.
    pub fn with_layer(mut self, layer: PolicyLayer, text: PolicyText) -> Self {
        self.set(layer, Some(text));
        self
    }

    /// Builder: set the relying-party file.
    pub fn with_relying_party(self, name: impl Into<String>, xml: impl Into<String>) -> Self {
        self.with_layer(PolicyLayer::RelyingParty, PolicyText::new(name, xml))
    }

    /// Builder: set the extension file.
    pub fn with_extension(self, name: impl Into<String>, xml: impl Into<String>) -> Self {
        self.with_layer(PolicyLayer::Extension, PolicyText::new(name, xml))
    }

    /// Builder: set the base file.
    pub fn with_base(self, name: impl Into<String>, xml: impl Into<String>) -> Self {
        self.with_layer(PolicyLayer::Base, PolicyText::new(name, xml))
    }

    /// Set or clear the text for `layer`.
    pub fn set(&mut self, layer: PolicyLayer, text: Option<PolicyText>) {
        match layer {
            PolicyLayer::RelyingParty => self.relying_party = text,
            PolicyLayer::Extension => self.extension = text,
            PolicyLayer::Base => self.base = text,
        }
    }

    pub fn get(&self, layer: PolicyLayer) -> Option<&PolicyText> {
        match layer {
            PolicyLayer::RelyingParty => self.relying_party.as_ref(),
            PolicyLayer::Extension => self.extension.as_ref(),
            PolicyLayer::Base => self.base.as_ref(),
        }
    }

    /// Supplied files in lookup order (highest first).
    pub fn iter(&self) -> impl Iterator<Item = (PolicyLayer, &PolicyText)> + '_ {
        PolicyLayer::all_descending()
            .into_iter()
            .filter_map(move |layer| self.get(layer).map(|text| (layer, text)))
    }

    /// SHA-256 over each supplied layer's role and text, hex encoded.
    ///
    /// File names do not contribute: equal content yields an equal fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        for (layer, text) in self.iter() {
            hasher.update(layer.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(text.xml.as_bytes());
            hasher.update([0u8]);
        }

        hex::encode(hasher.finalize())
    }

    /// Parse every supplied file.
    pub fn parse(&self) -> Result<ParsedPolicies<'_>, PolicyError> {
        let mut documents = Vec::new();

        for (layer, text) in self.iter() {
            let doc = Document::parse(&text.xml).map_err(|e| PolicyError::Parse {
                layer,
                message: format!("{}: {}", text.name, e),
            })?;
            tracing::debug!(layer = %layer, file = %text.name, "Parsed policy document");
            documents.push((layer, doc));
        }

        Ok(ParsedPolicies { documents })
    }
}

/// Parsed trees borrowing from a [`PolicySources`].
pub struct ParsedPolicies<'s> {
    documents: Vec<(PolicyLayer, Document<'s>)>,
}

impl<'s> ParsedPolicies<'s> {
    /// Borrow the trees as a layered set.
    pub fn layered(&self) -> LayeredDocumentSet<'_, 's> {
        let mut set = LayeredDocumentSet::new();
        for (layer, doc) in &self.documents {
            set.insert(*layer, doc.root());
        }
        set
    }
}
