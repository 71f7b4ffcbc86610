//! Resolution pass over a layered policy set.
//!
//! A pass locates the default journey, resolves each of its steps against
//! every supplied layer and attaches the relying party's base-policy info.
//! Passes are pure: they never touch the input trees and the same input
//! always yields an equal [`ResolutionResult`].

use std::sync::Arc;

use crate::base_policy::extract_base_policy_info;
use crate::cache::ResolutionCache;
use crate::config::ResolverConfig;
use crate::journey::try_resolve_default_journey;
use crate::layers::{LayeredDocumentSet, PolicySources};
use crate::steps::OrchestrationBuilder;
use crate::types::{PolicyLayer, ResolutionResult};

/// Error types for policy resolution.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A supplied document is not well-formed XML
    #[error("Failed to parse {layer} policy: {message}")]
    Parse { layer: PolicyLayer, message: String },

    /// No relying-party document was supplied
    #[error("Relying party policy not supplied")]
    MissingRelyingParty,

    /// Relying-party document has no `DefaultUserJourney`
    #[error("Relying party policy declares no default user journey")]
    MissingJourneyPointer,

    /// `DefaultUserJourney` has no `ReferenceId`
    #[error("Default user journey has no reference id")]
    MissingJourneyReference,

    /// No supplied layer declares the referenced journey
    #[error("User journey not found in any layer: {reference_id}")]
    JourneyNotFound { reference_id: String },
}

impl PolicyError {
    /// Whether the error means the pass has no result (missing relying party,
    /// journey pointer or journey) rather than malformed input.
    pub fn is_absent_result(&self) -> bool {
        !matches!(self, Self::Parse { .. })
    }
}

/// Resolves the default journey of a policy set.
pub struct PolicyResolver {
    config: ResolverConfig,
    cache: Option<ResolutionCache>,
}

impl PolicyResolver {
    /// Create a resolver with default settings.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with custom settings.
    pub fn with_config(config: ResolverConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| ResolutionCache::from_config(&config.cache));

        Self { config, cache }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The pass cache, when enabled.
    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// Resolve the default journey, reporting why no result could be produced.
    pub fn try_resolve(&self, set: &LayeredDocumentSet<'_, '_>) -> Result<ResolutionResult, PolicyError> {
        let journey = try_resolve_default_journey(set)?;

        let builder =
            OrchestrationBuilder::new(set).warn_on_unresolved(self.config.warn_on_unresolved);
        let steps = builder.build_steps(journey.element);

        let base_policy = set.relying_party().and_then(extract_base_policy_info);

        tracing::debug!(
            journey = %journey.reference_id,
            layer = %journey.layer,
            layers = set.len(),
            steps = steps.len(),
            "Resolved default journey"
        );

        Ok(ResolutionResult {
            journey_ref_id: journey.reference_id,
            journey_layer: journey.layer,
            steps,
            base_policy,
        })
    }

    /// Resolve the default journey; `None` when it cannot be located.
    pub fn resolve(&self, set: &LayeredDocumentSet<'_, '_>) -> Option<ResolutionResult> {
        match self.try_resolve(set) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(error = %e, "No resolution result");
                None
            }
        }
    }

    /// Parse and resolve raw policy text, reusing a cached pass when the
    /// documents are unchanged.
    ///
    /// Parse failures are returned as errors and never cached. A missing
    /// journey is `Ok(None)`.
    pub fn resolve_sources(
        &self,
        sources: &PolicySources,
    ) -> Result<Option<Arc<ResolutionResult>>, PolicyError> {
        let fingerprint = self.cache.as_ref().map(|_| sources.fingerprint());

        if let (Some(cache), Some(key)) = (&self.cache, &fingerprint) {
            if let Some(hit) = cache.get(key) {
                tracing::debug!(fingerprint = %key, "Resolution cache hit");
                return Ok(hit);
            }
        }

        let parsed = sources.parse()?;
        let result = self.resolve(&parsed.layered()).map(Arc::new);

        if let (Some(cache), Some(key)) = (&self.cache, fingerprint) {
            tracing::debug!(fingerprint = %key, "Caching resolution");
            cache.insert(key, result.clone());
        }

        Ok(result)
    }
}

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve `set` with default settings.
pub fn resolve(set: &LayeredDocumentSet<'_, '_>) -> Option<ResolutionResult> {
    PolicyResolver::new().resolve(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::types::StepKind;

    const RP: &str = r#"<TrustFrameworkPolicy PolicyId="B2C_1A_signup_signin">
  <BasePolicy><TenantId>contoso.onmicrosoft.com</TenantId><PolicyId>B2C_1A_TrustFrameworkExtensions</PolicyId></BasePolicy>
  <RelyingParty><DefaultUserJourney ReferenceId="SignUpOrSignIn"/></RelyingParty>
</TrustFrameworkPolicy>"#;

    const BASE: &str = r#"<TrustFrameworkPolicy>
  <UserJourneys><UserJourney Id="SignUpOrSignIn"><OrchestrationSteps>
    <OrchestrationStep Order="1"><ClaimsExchanges><ClaimsExchange Id="A" TechnicalProfileReferenceId="TP-A"/></ClaimsExchanges></OrchestrationStep>
    <OrchestrationStep Order="2"><ClaimsExchanges><ClaimsExchange Id="B" TechnicalProfileReferenceId="TP-Missing"/></ClaimsExchanges></OrchestrationStep>
  </OrchestrationSteps></UserJourney></UserJourneys>
  <TechnicalProfile Id="TP-A"><Protocol Name="OpenIdConnect"/></TechnicalProfile>
</TrustFrameworkPolicy>"#;

    fn sources() -> PolicySources {
        PolicySources::new()
            .with_relying_party("SignUpOrSignin.xml", RP)
            .with_base("TrustFrameworkBase.xml", BASE)
    }

    #[test]
    fn test_try_resolve() {
        let sources = sources();
        let parsed = sources.parse().unwrap();
        let result = PolicyResolver::new().try_resolve(&parsed.layered()).unwrap();

        assert_eq!(result.journey_ref_id, "SignUpOrSignIn");
        assert_eq!(result.journey_layer, PolicyLayer::Base);
        assert_eq!(result.step_count(), 2);
        assert_eq!(result.steps[0].kind, StepKind::ClaimsExchange);
        assert_eq!(result.unresolved_profile_ids(), vec!["TP-Missing"]);

        let base = result.base_policy.unwrap();
        assert_eq!(base.policy_id.as_deref(), Some("B2C_1A_TrustFrameworkExtensions"));
    }

    #[test]
    fn test_missing_journey_is_absent() {
        let sources = PolicySources::new().with_relying_party("rp.xml", RP);
        let parsed = sources.parse().unwrap();
        let set = parsed.layered();

        assert!(resolve(&set).is_none());
        let err = PolicyResolver::new().try_resolve(&set).unwrap_err();
        assert!(err.is_absent_result());
        assert_eq!(err.to_string(), "User journey not found in any layer: SignUpOrSignIn");
    }

    #[test]
    fn test_empty_journey_is_a_result() {
        let doc = roxmltree::Document::parse(
            r#"<TrustFrameworkPolicy>
  <RelyingParty><DefaultUserJourney ReferenceId="J"/></RelyingParty>
  <UserJourneys><UserJourney Id="J"><OrchestrationSteps/></UserJourney></UserJourneys>
</TrustFrameworkPolicy>"#,
        )
        .unwrap();
        let set = LayeredDocumentSet::new().with_document(PolicyLayer::RelyingParty, &doc);

        let result = resolve(&set).unwrap();
        assert_eq!(result.journey_ref_id, "J");
        assert_eq!(result.journey_layer, PolicyLayer::RelyingParty);
        assert_eq!(result.step_count(), 0);
        assert!(result.unresolved_profile_ids().is_empty());

        // Same pointer with no journey definition yields nothing
        let missing = roxmltree::Document::parse(
            r#"<TrustFrameworkPolicy><RelyingParty><DefaultUserJourney ReferenceId="J"/></RelyingParty></TrustFrameworkPolicy>"#,
        )
        .unwrap();
        let set = LayeredDocumentSet::new().with_document(PolicyLayer::RelyingParty, &missing);
        assert!(resolve(&set).is_none());
    }

    #[test]
    fn test_missing_relying_party_is_absent_result() {
        let doc = roxmltree::Document::parse(BASE).unwrap();
        let set = LayeredDocumentSet::new().with_document(PolicyLayer::Base, &doc);

        let err = PolicyResolver::new().try_resolve(&set).unwrap_err();
        assert!(matches!(err, PolicyError::MissingRelyingParty));
        assert!(err.is_absent_result());
    }

    #[test]
    fn test_resolve_sources_uses_cache() {
        let resolver = PolicyResolver::new();
        let first = resolver.resolve_sources(&sources()).unwrap().unwrap();
        let second = resolver.resolve_sources(&sources()).unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cache().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_sources_without_cache() {
        let config = ResolverConfig {
            cache: CacheConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let resolver = PolicyResolver::with_config(config);
        let first = resolver.resolve_sources(&sources()).unwrap().unwrap();
        let second = resolver.resolve_sources(&sources()).unwrap().unwrap();

        assert!(resolver.cache().is_none());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_errors_are_not_cached() {
        let resolver = PolicyResolver::new();
        let broken = PolicySources::new().with_relying_party("rp.xml", "<TrustFrameworkPolicy>");

        let err = resolver.resolve_sources(&broken).unwrap_err();
        assert!(!err.is_absent_result());
        assert!(resolver.cache().unwrap().is_empty());
    }

    #[test]
    fn test_absent_result_is_cached() {
        let resolver = PolicyResolver::new();
        let rp_only = PolicySources::new().with_relying_party("rp.xml", RP);

        assert!(resolver.resolve_sources(&rp_only).unwrap().is_none());
        assert_eq!(resolver.cache().unwrap().len(), 1);
        assert!(resolver.resolve_sources(&rp_only).unwrap().is_none());
    }
}
