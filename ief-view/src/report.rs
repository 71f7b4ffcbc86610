//! Plain-text reports of a resolved journey.

use ief_resolver::{
    ClaimDescriptor, LayerOverride, OverrideAnalyzer, ProfileDetails, ResolutionResult,
    ResolvedProfile, ResolvedStep,
};

use crate::config::ViewConfig;
use crate::graph::{step_key, step_label};

/// Assembles text reports from a resolution result.
pub struct ReportAssembler {
    config: ViewConfig,
}

impl ReportAssembler {
    /// Create an assembler with default settings.
    pub fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    pub fn with_config(config: ViewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Full details of every step and profile.
    pub fn build_details(&self, result: &ResolutionResult) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "Default User Journey: {} ({})\n",
            result.journey_ref_id, result.journey_layer
        ));

        if let Some(base) = &result.base_policy {
            report.push_str("Base Policy: ");
            report.push_str(base.policy_id.as_deref().unwrap_or("-"));
            if let Some(tenant) = &base.tenant_id {
                report.push_str(&format!(" ({})", tenant));
            }
            report.push('\n');
        }

        for (index, step) in result.steps.iter().enumerate() {
            report.push('\n');
            report.push_str(&step_heading(step, index));
            report.push('\n');

            if step.is_conditioned && !step.predicate_refs.is_empty() {
                report.push_str(&format!("  Conditions: {}\n", step.predicate_refs.join(", ")));
            }

            for profile in &step.profiles {
                match profile {
                    ResolvedProfile::NotFound { id } => {
                        if self.config.show_unresolved {
                            report.push_str(&format!("  Profile not found: {}\n", id));
                        }
                    }
                    ResolvedProfile::Resolved(details) => {
                        self.push_profile_details(&mut report, step, details);
                    }
                }
            }
        }

        report
    }

    fn push_profile_details(&self, report: &mut String, step: &ResolvedStep, details: &ProfileDetails) {
        let def = &details.definition;

        report.push_str(&format!("  {}\n", def.id));
        if let Some(name) = &def.display_name {
            report.push_str(&format!("    {}\n", name));
        }
        report.push_str(&format!("    Protocol: {}{}\n", def.protocol, badges(step, details)));
        report.push_str(&format!("    InputClaims: {}\n", join_claims(&def.input_claims)));
        report.push_str(&format!("    OutputClaims: {}\n", join_claims(&def.output_claims)));
        report.push_str(&format!("    Source: {}\n", details.source_layer));

        if let Some(template) = &def.content_definition {
            report.push_str(&format!("    Template: {}\n", template));
        }
        if !def.localized_resources.is_empty() {
            report.push_str(&format!(
                "    Localized Resources: {}\n",
                def.localized_resources.join(", ")
            ));
        }

        if self.config.include_content_uris {
            if let Some(info) = &details.content_info {
                if let Some(load_uri) = &info.load_uri {
                    report.push_str(&format!("    LoadUri: {}\n", load_uri));
                }
                if let Some(data_uri) = &info.data_uri {
                    report.push_str(&format!("    DataUri: {}\n", data_uri));
                }
            }
        }
    }

    /// Compact view of one step, claim lists cut to the preview limit.
    ///
    /// `index` is the step's position in the journey, used when it has no order.
    pub fn build_step_summary(&self, step: &ResolvedStep, index: usize) -> String {
        let mut summary = step_heading(step, index);
        summary.push('\n');

        for profile in &step.profiles {
            match profile {
                ResolvedProfile::NotFound { id } => {
                    if self.config.show_unresolved {
                        summary.push_str(&format!("  Profile not found: {}\n", id));
                    }
                }
                ResolvedProfile::Resolved(details) => {
                    let def = &details.definition;
                    summary.push_str(&format!("  {}\n", def.id));
                    if let Some(name) = &def.display_name {
                        summary.push_str(&format!("    {}\n", name));
                    }
                    summary.push_str(&format!("    {}{}\n", def.protocol, badges(step, details)));
                    summary.push_str(&format!(
                        "    In: {}\n",
                        preview_claims(&def.input_claims, self.config.claim_preview_limit)
                    ));
                    summary.push_str(&format!(
                        "    Out: {}\n",
                        preview_claims(&def.output_claims, self.config.claim_preview_limit)
                    ));
                }
            }
        }

        summary
    }

    /// Compact view of every step, separated by blank lines.
    pub fn build_summary(&self, result: &ResolutionResult) -> String {
        result
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.build_step_summary(step, index))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Explanation of every cross-layer override.
    pub fn build_override_report(&self, overrides: &[LayerOverride]) -> String {
        if overrides.is_empty() {
            return "No overrides across layers.\n".to_string();
        }

        let analyzer = OverrideAnalyzer::new();
        overrides
            .iter()
            .map(|entry| analyzer.explain(entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn step_heading(step: &ResolvedStep, index: usize) -> String {
    let mut heading = format!("Step {}: {}", step_key(step, index), step_label(step));
    if step.is_conditioned {
        heading.push_str(" [Conditioned]");
    }
    heading
}

fn badges(step: &ResolvedStep, details: &ProfileDetails) -> String {
    let mut out = String::new();
    if details.is_self_asserted {
        out.push_str(" [SelfAsserted]");
    }
    if details.is_rest {
        out.push_str(" [REST API]");
    }
    if step.is_recursive {
        match &step.referenced_journey_id {
            Some(journey) => out.push_str(&format!(" [Recursive: {}]", journey)),
            None => out.push_str(" [Recursive]"),
        }
    }
    out
}

fn join_claims(claims: &[ClaimDescriptor]) -> String {
    if claims.is_empty() {
        return "None".to_string();
    }
    claims
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn preview_claims(claims: &[ClaimDescriptor], limit: usize) -> String {
    if claims.is_empty() {
        return "None".to_string();
    }

    let mut preview = claims
        .iter()
        .take(limit)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if claims.len() > limit {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use ief_resolver::{
        BasePolicyInfo, ContentInfo, PolicyLayer, StepKind, TechnicalProfileDefinition,
    };

    fn claim(name: &str, required: bool) -> ClaimDescriptor {
        ClaimDescriptor {
            claim_type: name.to_string(),
            required,
        }
    }

    fn self_asserted() -> ResolvedProfile {
        ResolvedProfile::Resolved(ProfileDetails {
            definition: TechnicalProfileDefinition {
                id: "SelfAsserted-LocalAccountSignin-Email".to_string(),
                protocol: "Proprietary".to_string(),
                display_name: Some("Local Account Signin".to_string()),
                input_claims: vec![claim("signInName", false)],
                output_claims: vec![
                    claim("signInName", true),
                    claim("password", true),
                    claim("objectId", false),
                    claim("authenticationSource", false),
                ],
                metadata: vec![],
                metadata_blocks: 1,
                content_definition: Some("api.selfasserted".to_string()),
                localized_resources: vec![],
            },
            source_layer: PolicyLayer::Base,
            is_self_asserted: true,
            is_rest: true,
            content_info: Some(ContentInfo {
                load_uri: Some("~/selfAsserted.cshtml".to_string()),
                data_uri: None,
                source_layer: PolicyLayer::Base,
            }),
            shadowed_layers: vec![],
        })
    }

    fn step(order: Option<u32>, profiles: Vec<ResolvedProfile>) -> ResolvedStep {
        ResolvedStep {
            order,
            kind: StepKind::ClaimsExchange,
            declared_type: None,
            profile_ids: profiles.iter().map(|p| p.id().to_string()).collect(),
            profiles,
            is_recursive: false,
            referenced_journey_id: None,
            is_conditioned: false,
            predicate_refs: vec![],
            preconditions: vec![],
        }
    }

    fn result() -> ResolutionResult {
        let mut conditioned = step(
            Some(2),
            vec![ResolvedProfile::NotFound {
                id: "Facebook-OAUTH".to_string(),
            }],
        );
        conditioned.is_conditioned = true;
        conditioned.predicate_refs = vec!["IsSocial".to_string()];

        ResolutionResult {
            journey_ref_id: "SignUpOrSignIn".to_string(),
            journey_layer: PolicyLayer::Base,
            steps: vec![step(Some(1), vec![self_asserted()]), conditioned],
            base_policy: Some(BasePolicyInfo {
                tenant_id: Some("contoso.onmicrosoft.com".to_string()),
                policy_id: Some("B2C_1A_TrustFrameworkExtensions".to_string()),
            }),
        }
    }

    #[test]
    fn test_build_details() {
        let report = ReportAssembler::new().build_details(&result());

        assert!(report.starts_with("Default User Journey: SignUpOrSignIn (Base)\n"));
        assert!(report.contains("Base Policy: B2C_1A_TrustFrameworkExtensions (contoso.onmicrosoft.com)"));
        assert!(report.contains("Step 1: ClaimsExchange\n"));
        assert!(report.contains("    Protocol: Proprietary [SelfAsserted] [REST API]\n"));
        assert!(report.contains("    InputClaims: signInName\n"));
        assert!(report.contains(
            "    OutputClaims: signInName (required), password (required), objectId, authenticationSource\n"
        ));
        assert!(report.contains("    Source: Base\n"));
        assert!(report.contains("    Template: api.selfasserted\n"));
        assert!(report.contains("    LoadUri: ~/selfAsserted.cshtml\n"));
        assert!(!report.contains("DataUri"));
        assert!(report.contains("Step 2: ClaimsExchange [Conditioned]\n"));
        assert!(report.contains("  Conditions: IsSocial\n"));
        assert!(report.contains("  Profile not found: Facebook-OAUTH\n"));
    }

    #[test]
    fn test_details_respect_config() {
        let assembler = ReportAssembler::with_config(ViewConfig {
            show_unresolved: false,
            include_content_uris: false,
            ..Default::default()
        });
        let report = assembler.build_details(&result());

        assert!(!report.contains("Profile not found"));
        assert!(!report.contains("LoadUri"));
        assert!(report.contains("Template: api.selfasserted"));
    }

    #[test]
    fn test_step_summary_truncates_claims() {
        let result = result();
        let summary = ReportAssembler::new().build_step_summary(&result.steps[0], 0);

        assert!(summary.contains("    In: signInName\n"));
        assert!(summary.contains("    Out: signInName (required), password (required), objectId...\n"));
    }

    #[test]
    fn test_empty_claims_render_none() {
        let mut details = self_asserted();
        if let ResolvedProfile::Resolved(d) = &mut details {
            d.definition.input_claims.clear();
        }
        let s = step(None, vec![details]);

        let summary = ReportAssembler::new().build_step_summary(&s, 4);
        assert!(summary.starts_with("Step #5: ClaimsExchange\n"));
        assert!(summary.contains("    In: None\n"));

        let report = ReportAssembler::new().build_details(&ResolutionResult {
            journey_ref_id: "J".to_string(),
            journey_layer: PolicyLayer::RelyingParty,
            steps: vec![s],
            base_policy: None,
        });
        assert!(report.contains("    InputClaims: None\n"));
        assert!(!report.contains("Base Policy"));
    }

    #[test]
    fn test_recursive_badge() {
        let mut s = step(Some(3), vec![self_asserted()]);
        s.is_recursive = true;
        s.referenced_journey_id = Some("MfaSubJourney".to_string());

        let summary = ReportAssembler::new().build_step_summary(&s, 0);
        assert!(summary.contains("[Recursive: MfaSubJourney]"));
    }

    #[test]
    fn test_preview_limit() {
        let claims = vec![claim("a", false), claim("b", true)];
        assert_eq!(preview_claims(&claims, 2), "a, b (required)");
        assert_eq!(preview_claims(&claims, 1), "a...");
        assert_eq!(preview_claims(&claims, 0), "...");
        assert_eq!(preview_claims(&[], 3), "None");
    }

    #[test]
    fn test_override_report() {
        let assembler = ReportAssembler::new();
        assert_eq!(assembler.build_override_report(&[]), "No overrides across layers.\n");

        let report = assembler.build_override_report(&[LayerOverride {
            element: "TechnicalProfile".to_string(),
            id: "P1".to_string(),
            winner: PolicyLayer::RelyingParty,
            shadowed: vec![PolicyLayer::Base],
        }]);
        assert!(report.contains("TechnicalProfile 'P1' is declared in 2 layers"));
    }
}
