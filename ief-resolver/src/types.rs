//! Core types for resolved policy journeys.
//!
//! These types model the output of one resolution pass over the three-layer
//! policy chain (Base, Extension, RelyingParty). Everything here is owned and
//! detached from the source trees so a result can outlive the documents.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs for consistency with the journey viewer frontend.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Protocol name reported when a profile declares none.
pub const UNKNOWN_PROTOCOL: &str = "Unknown";

/// Protocol name marking REST-style technical profiles.
pub const PROPRIETARY_PROTOCOL: &str = "Proprietary";

/// Policy layer in the inheritance chain.
///
/// Higher layers have greater precedence and override lower layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum PolicyLayer {
    /// Base trust framework - lowest precedence
    Base = 1,
    /// Extension layer - overrides and extends the base
    Extension = 2,
    /// Relying-party layer - the top of the chain, declares the default journey
    RelyingParty = 3,
}

impl PolicyLayer {
    /// Get the precedence value (higher = wins lookups)
    pub fn precedence(&self) -> u8 {
        *self as u8
    }

    /// Check if this layer can override another
    pub fn can_override(&self, other: &Self) -> bool {
        self.precedence() > other.precedence()
    }

    /// Layer name as surfaced in results and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelyingParty => "RelyingParty",
            Self::Extension => "Extension",
            Self::Base => "Base",
        }
    }

    /// All layers in lookup order (highest first)
    pub fn all_descending() -> [Self; 3] {
        [Self::RelyingParty, Self::Extension, Self::Base]
    }

    /// All layers in override-scan order (lowest first)
    pub fn all_ascending() -> [Self; 3] {
        [Self::Base, Self::Extension, Self::RelyingParty]
    }
}

impl fmt::Display for PolicyLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim referenced by a technical profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ClaimDescriptor {
    /// Claim type id; empty when the element names none
    pub claim_type: String,
    /// Whether the reference is marked `Required="true"`
    pub required: bool,
}

impl fmt::Display for ClaimDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "{} (required)", self.claim_type)
        } else {
            f.write_str(&self.claim_type)
        }
    }
}

/// UI template references of a content definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ContentInfo {
    /// Template page location
    pub load_uri: Option<String>,
    /// Page contract identifier
    pub data_uri: Option<String>,
    /// Layer whose definition won
    pub source_layer: PolicyLayer,
}

/// A single `Metadata/Item` key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

/// Fields read from a `TechnicalProfile` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TechnicalProfileDefinition {
    /// Profile id as declared on the element
    pub id: String,
    /// `Protocol/@Name`, or [`UNKNOWN_PROTOCOL`]
    pub protocol: String,
    /// `DisplayName` text
    pub display_name: Option<String>,
    /// Input claims in document order
    pub input_claims: Vec<ClaimDescriptor>,
    /// Output claims in document order
    pub output_claims: Vec<ClaimDescriptor>,
    /// All metadata items in document order
    pub metadata: Vec<MetadataItem>,
    /// Number of `Metadata` blocks, even empty ones
    pub metadata_blocks: usize,
    /// Value of the `ContentDefinitionReferenceId` metadata item
    pub content_definition: Option<String>,
    /// `LocalizedResourcesReference/@ReferenceId` values
    pub localized_resources: Vec<String>,
}

/// A technical profile bound to the layer that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ProfileDetails {
    #[serde(flatten)]
    pub definition: TechnicalProfileDefinition,
    /// Highest-precedence layer declaring this id
    pub source_layer: PolicyLayer,
    /// Profile id contains `SelfAsserted`
    pub is_self_asserted: bool,
    /// Proprietary protocol with at least one metadata block
    pub is_rest: bool,
    /// Content definition looked up through the content index
    pub content_info: Option<ContentInfo>,
    /// Lower layers that also declare this id
    pub shadowed_layers: Vec<PolicyLayer>,
}

/// Outcome of resolving one profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolvedProfile {
    /// No supplied layer declares the id
    NotFound { id: String },
    /// Definition found
    Resolved(ProfileDetails),
}

impl ResolvedProfile {
    /// The requested profile id.
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound { id } => id,
            Self::Resolved(details) => &details.definition.id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Resolved details, if any.
    pub fn details(&self) -> Option<&ProfileDetails> {
        match self {
            Self::NotFound { .. } => None,
            Self::Resolved(details) => Some(details),
        }
    }
}

/// Semantic kind of an orchestration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum StepKind {
    ClaimsExchange,
    UserInterface,
    Unknown,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimsExchange => "ClaimsExchange",
            Self::UserInterface => "UserInterface",
            Self::Unknown => "Unknown",
        }
    }

    /// Map declared `Type` text to a kind. Unrecognized text is `Unknown`.
    pub fn from_declared(text: &str) -> Self {
        match text {
            "ClaimsExchange" => Self::ClaimsExchange,
            "UserInterface" => Self::UserInterface,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `Precondition` attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Precondition {
    /// `Type` attribute, e.g. `ClaimsExist` or `ClaimEquals`
    pub condition_type: Option<String>,
    /// `ExecuteActionsIf` attribute compared against the literal `true`
    pub execute_actions_if: Option<bool>,
    /// `Value` children in document order
    pub values: Vec<String>,
    /// `Action` text, e.g. `SkipThisOrchestrationStep`
    pub action: Option<String>,
}

/// One orchestration step with every referenced profile resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ResolvedStep {
    /// `Order` attribute; carried as data, sequencing follows document order
    pub order: Option<u32>,
    pub kind: StepKind,
    /// Literal text of an explicit `Type` element
    pub declared_type: Option<String>,
    /// Profile ids in reference order
    pub profile_ids: Vec<String>,
    /// One entry per profile id, same order
    pub profiles: Vec<ResolvedProfile>,
    /// Step invokes another journey
    pub is_recursive: bool,
    /// `JourneyReference/@Id`
    pub referenced_journey_id: Option<String>,
    /// Step carries preconditions or predicate references
    pub is_conditioned: bool,
    /// Referenced predicate ids
    pub predicate_refs: Vec<String>,
    pub preconditions: Vec<Precondition>,
}

/// Inherited-base metadata read from the relying-party layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BasePolicyInfo {
    pub tenant_id: Option<String>,
    pub policy_id: Option<String>,
}

/// Fully resolved default journey.
///
/// Created fresh on every pass and never mutated afterwards. Resolving the
/// same documents twice yields equal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ResolutionResult {
    /// `DefaultUserJourney/@ReferenceId`
    pub journey_ref_id: String,
    /// Layer that supplied the journey definition
    pub journey_layer: PolicyLayer,
    /// Steps in document order
    pub steps: Vec<ResolvedStep>,
    pub base_policy: Option<BasePolicyInfo>,
}

impl ResolutionResult {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Profile ids that no layer could resolve, in step order, without duplicates.
    pub fn unresolved_profile_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for profile in self.steps.iter().flat_map(|s| &s.profiles) {
            if profile.is_not_found() && !ids.contains(&profile.id()) {
                ids.push(profile.id());
            }
        }
        ids
    }

    /// Serialize for the rendering side.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_precedence() {
        assert!(PolicyLayer::RelyingParty.can_override(&PolicyLayer::Extension));
        assert!(PolicyLayer::Extension.can_override(&PolicyLayer::Base));
        assert!(!PolicyLayer::Base.can_override(&PolicyLayer::RelyingParty));
        assert!(!PolicyLayer::Base.can_override(&PolicyLayer::Base));
    }

    #[test]
    fn test_layer_ordering() {
        let layers = PolicyLayer::all_descending();
        assert_eq!(layers[0], PolicyLayer::RelyingParty);
        assert_eq!(layers[2], PolicyLayer::Base);

        let mut ascending = PolicyLayer::all_ascending().to_vec();
        ascending.reverse();
        assert_eq!(ascending, layers.to_vec());
    }

    #[test]
    fn test_claim_display() {
        let required = ClaimDescriptor {
            claim_type: "email".to_string(),
            required: true,
        };
        let optional = ClaimDescriptor {
            claim_type: "givenName".to_string(),
            required: false,
        };
        assert_eq!(required.to_string(), "email (required)");
        assert_eq!(optional.to_string(), "givenName");
    }

    #[test]
    fn test_step_kind_from_declared() {
        assert_eq!(StepKind::from_declared("ClaimsExchange"), StepKind::ClaimsExchange);
        assert_eq!(StepKind::from_declared("UserInterface"), StepKind::UserInterface);
        assert_eq!(StepKind::from_declared("SendClaims"), StepKind::Unknown);
        assert_eq!(StepKind::from_declared("claimsexchange"), StepKind::Unknown);
    }

    #[test]
    fn test_not_found_serializes_id_only() {
        let profile = ResolvedProfile::NotFound {
            id: "Missing-TP".to_string(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "not_found", "id": "Missing-TP" }));
    }
}
