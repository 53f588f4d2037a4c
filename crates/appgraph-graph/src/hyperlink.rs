//! Terminal hyperlinks (OSC 8) for cloud console deep links.
//!
//! Only call these when the output sink is a terminal that understands the escape
//! sequence; the renderer gates them behind [`crate::DisplayOptions::hyperlinks`].

use appgraph_core::{make_relative_id, ResourceId};

use crate::node::{OutputResourceEntry, PROVIDER_AZURE};

const OSC: &str = "\x1b]8;;";
const ST: &str = "\x1b\\";

const AZURE_PORTAL_RESOURCE_URL: &str = "https://portal.azure.com/#@/resource";

/// Wrap `text` so that terminals render it as a link to `url`.
pub fn hyperlink(text: &str, url: &str) -> String {
    format!("{OSC}{url}{ST}{text}{OSC}{ST}")
}

/// The cloud console URL for an output resource, for providers that have one.
pub fn portal_link(resource: &OutputResourceEntry) -> Option<String> {
    if resource.node.has_error() || resource.node.id.is_empty() {
        return None;
    }

    match resource.provider.as_str() {
        PROVIDER_AZURE => Some(format!(
            "{AZURE_PORTAL_RESOURCE_URL}{}",
            arm_id(&resource.node.id)
        )),
        _ => None,
    }
}

/// The portal only understands plane-relative ARM IDs, so drop a leading
/// `/planes/azure/<plane>` scope.
fn arm_id(id: &str) -> String {
    match ResourceId::parse(id) {
        Ok(parsed) if parsed.is_ucp_qualified() && !parsed.scope_segments().is_empty() => {
            make_relative_id(
                &parsed.scope_segments()[1..],
                parsed.type_segments(),
                parsed.extension_segments(),
            )
        }
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PROVIDER_AWS;
    use appgraph_core::ResourceId;

    #[test]
    fn test_hyperlink_escape() {
        assert_eq!(
            hyperlink("redis", "https://example.com"),
            "\x1b]8;;https://example.com\x1b\\redis\x1b]8;;\x1b\\"
        );
    }

    #[test]
    fn test_portal_link_only_for_azure() {
        let azure = OutputResourceEntry::from_id(
            &ResourceId::parse("/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cache/Redis/cache")
                .unwrap(),
        );
        assert_eq!(
            portal_link(&azure).unwrap(),
            "https://portal.azure.com/#@/resource/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cache/Redis/cache"
        );

        let aws = OutputResourceEntry::from_id(
            &ResourceId::parse("/planes/aws/aws/accounts/0/regions/us-east-1/providers/AWS.MemoryDB/Cluster/c")
                .unwrap(),
        );
        assert_eq!(aws.provider, PROVIDER_AWS);
        assert!(portal_link(&aws).is_none());

        assert!(portal_link(&OutputResourceEntry::from_error("boom")).is_none());
    }

    #[test]
    fn test_portal_link_strips_azure_plane() {
        let ucp = OutputResourceEntry::from_id(
            &ResourceId::parse(
                "/planes/azure/azurecloud/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cache/Redis/cache",
            )
            .unwrap(),
        );
        assert_eq!(ucp.provider, PROVIDER_AZURE);
        assert_eq!(
            portal_link(&ucp).unwrap(),
            "https://portal.azure.com/#@/resource/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cache/Redis/cache"
        );
    }
}
