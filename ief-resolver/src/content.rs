//! Content definition index.
//!
//! Built once per resolution pass and shared read-only by every step.

use std::collections::HashMap;

use crate::layers::LayeredDocumentSet;
use crate::locator::{find_all, ElementExt};
use crate::types::ContentInfo;

/// Content definition id to its template references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentIndex {
    entries: HashMap<String, ContentInfo>,
}

impl ContentIndex {
    /// Scan every supplied layer for `ContentDefinition` elements.
    ///
    /// Layers are scanned Base, Extension, RelyingParty and later entries
    /// overwrite earlier ones, so a redefinition in a higher layer wins.
    /// Definitions without an `Id` are skipped.
    pub fn build(set: &LayeredDocumentSet<'_, '_>) -> Self {
        let mut entries = HashMap::new();

        for doc in set.iter_ascending() {
            for def in find_all(doc.root, "ContentDefinition") {
                let Some(id) = def.attr("Id") else {
                    continue;
                };
                entries.insert(
                    id.to_string(),
                    ContentInfo {
                        load_uri: def.child_text("LoadUri"),
                        data_uri: def.child_text("DataUri"),
                        source_layer: doc.layer,
                    },
                );
            }
        }

        tracing::debug!(definitions = entries.len(), "Built content definition index");

        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&ContentInfo> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentInfo)> + '_ {
        self.entries.iter().map(|(id, info)| (id.as_str(), info))
    }
}
