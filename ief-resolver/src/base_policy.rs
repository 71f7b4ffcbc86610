//! Inherited-base metadata of the relying-party layer.

use roxmltree::Node;

use crate::locator::ElementExt;
use crate::types::BasePolicyInfo;

/// Read `BasePolicy` from the relying-party tree. Informational only.
pub fn extract_base_policy_info(relying_party: Node<'_, '_>) -> Option<BasePolicyInfo> {
    let base_policy = relying_party.find_first("BasePolicy")?;

    Some(BasePolicyInfo {
        tenant_id: base_policy.child_text("TenantId"),
        policy_id: base_policy.child_text("PolicyId"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_base_policy_present() {
        let doc = Document::parse(
            r#"<TrustFrameworkPolicy>
                 <BasePolicy>
                   <TenantId>contoso.onmicrosoft.com</TenantId>
                   <PolicyId>B2C_1A_TrustFrameworkExtensions</PolicyId>
                 </BasePolicy>
               </TrustFrameworkPolicy>"#,
        )
        .unwrap();

        let info = extract_base_policy_info(doc.root()).unwrap();
        assert_eq!(info.tenant_id.as_deref(), Some("contoso.onmicrosoft.com"));
        assert_eq!(info.policy_id.as_deref(), Some("B2C_1A_TrustFrameworkExtensions"));
    }

    #[test]
    fn test_base_policy_partial_and_absent() {
        let doc = Document::parse(
            "<TrustFrameworkPolicy><BasePolicy><PolicyId>B2C_1A_Base</PolicyId></BasePolicy></TrustFrameworkPolicy>",
        )
        .unwrap();
        let info = extract_base_policy_info(doc.root()).unwrap();
        assert_eq!(info.tenant_id, None);

        let doc = Document::parse("<TrustFrameworkPolicy/>").unwrap();
        assert!(extract_base_policy_info(doc.root()).is_none());
    }
}
