//! Cross-layer resolution of Identity Experience Framework policy journeys.
//!
//! A custom policy is split over three documents forming an inheritance chain:
//!
//! - **Base**: the trust framework shipped with the starter pack (lowest precedence)
//! - **Extension**: tenant customizations overriding and extending the base
//! - **RelyingParty**: the entry point, naming the default user journey (highest precedence)
//!
//! This crate resolves the relying party's default journey into an ordered list
//! of orchestration steps, each bound to the technical profiles it invokes,
//! with claims and content definitions resolved across all supplied layers.
//! Any missing profile, claim or attribute is surfaced in the result instead of
//! failing the pass; only a missing journey yields no result.
//!
//! # Key Components
//!
//! - [`LayeredDocumentSet`]: supplied layers in precedence order, one lookup loop
//! - [`PolicyResolver`]: runs a resolution pass, optionally memoized by fingerprint
//! - [`OrchestrationBuilder`]: resolves the steps of a journey
//! - [`ContentIndex`]: content definitions of every layer, built once per pass
//! - [`OverrideAnalyzer`]: reports ids redeclared across layers
//!
//! # Example
//!
//! ```
//! use ief_resolver::{PolicyResolver, PolicySources};
//!
//! let sources = PolicySources::new()
//!     .with_relying_party(
//!         "SignUpOrSignin.xml",
//!         r#"<TrustFrameworkPolicy>
//!              <RelyingParty><DefaultUserJourney ReferenceId="SignUpOrSignIn"/></RelyingParty>
//!            </TrustFrameworkPolicy>"#,
//!     )
//!     .with_base(
//!         "TrustFrameworkBase.xml",
//!         r#"<TrustFrameworkPolicy>
//!              <UserJourneys><UserJourney Id="SignUpOrSignIn"><OrchestrationSteps>
//!                <OrchestrationStep Order="1"/>
//!              </OrchestrationSteps></UserJourney></UserJourneys>
//!            </TrustFrameworkPolicy>"#,
//!     );
//!
//! let result = PolicyResolver::new().resolve_sources(&sources)?.expect("journey");
//! assert_eq!(result.step_count(), 1);
//! # Ok::<(), ief_resolver::PolicyError>(())
//! ```

pub mod base_policy;
pub mod cache;
pub mod claims;
pub mod config;
pub mod content;
pub mod journey;
pub mod layers;
pub mod locator;
pub mod overrides;
pub mod profile;
pub mod resolver;
pub mod steps;
pub mod types;

// Re-export main types
pub use base_policy::extract_base_policy_info;
pub use cache::ResolutionCache;
pub use claims::extract_claims;
pub use config::{CacheConfig, ResolverConfig};
pub use content::ContentIndex;
pub use journey::{resolve_default_journey, try_resolve_default_journey, ResolvedJourney};
pub use layers::{LayerDocument, LayeredDocumentSet, ParsedPolicies, PolicySources, PolicyText};
pub use locator::{find_all, find_first, ElementExt};
pub use overrides::{LayerOverride, OverrideAnalyzer};
pub use profile::{find_profile, resolve_profile, ProfileMatch};
pub use resolver::{resolve, PolicyError, PolicyResolver};
pub use steps::{build_steps, OrchestrationBuilder};
pub use types::*;
