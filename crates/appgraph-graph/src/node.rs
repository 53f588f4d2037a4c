use appgraph_core::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROVIDER_AZURE: &str = "azure";
pub const PROVIDER_AWS: &str = "aws";
pub const PROVIDER_KUBERNETES: &str = "kubernetes";

/// Identity of a resource in the graph.
///
/// Either `id`, `name` and `resource_type` are populated and `error` is empty, or the
/// ID failed to parse and only `error` is set. A node with an error stays in the graph
/// as a placeholder rather than being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl Node {
    /// Build a node from a raw resource ID. The ID must name a resource; anything else
    /// produces an error-only node.
    pub fn from_id(id: &str) -> Self {
        match ResourceId::parse_resource(id) {
            Ok(parsed) => Self {
                id: id.to_string(),
                name: parsed.name().to_string(),
                resource_type: parsed.type_name(),
                error: String::new(),
            },
            Err(err) => Self::from_error(err.to_string()),
        }
    }

    /// Build a node from an already parsed ID, using its normalised string form.
    pub fn from_parsed_id(id: &ResourceId) -> Self {
        Self {
            id: id.to_string(),
            name: id.name().to_string(),
            resource_type: id.type_name(),
            error: String::new(),
        }
    }

    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// A directed, named edge between two resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub name: String,
    pub from: Node,
    pub to: Node,
}

/// An infrastructure artifact (a Kubernetes Deployment, an Azure Redis cache, ...)
/// created on behalf of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputResourceEntry {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

impl OutputResourceEntry {
    /// Build an entry from a parsed ID and derive its provider from the scope.
    ///
    /// UCP IDs name the provider in their first scope segment
    /// (`/planes/aws/...`, `/planes/kubernetes/...`). A scoped ID without the `/planes`
    /// prefix is a plane-relative Azure ID.
    pub fn from_id(id: &ResourceId) -> Self {
        let provider = match id.scope_segments().first() {
            Some(first) if id.is_ucp_qualified() => first.type_name.clone(),
            Some(_) => PROVIDER_AZURE.to_string(),
            None => String::new(),
        };

        Self {
            node: Node::from_parsed_id(id),
            provider,
        }
    }

    pub fn from_error(error: impl Into<String>) -> Self {
        Self {
            node: Node::from_error(error),
            provider: String::new(),
        }
    }
}

/// A resource in the application together with its edges and owned infrastructure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(flatten)]
    pub node: Node,
    /// Inbound and outbound connections, ordered by connection name.
    pub connections: Vec<ConnectionEntry>,
    /// Ordered by provider, type, name, id, then error.
    pub resources: Vec<OutputResourceEntry>,
}

impl ResourceEntry {
    pub fn from_id(id: &str) -> Self {
        Self {
            node: Node::from_id(id),
            connections: Vec::new(),
            resources: Vec::new(),
        }
    }
}

/// The resolved set of resources that make up an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationGraph {
    pub application_name: String,
    /// Keyed by the resource ID as it was listed or referenced.
    pub resources: BTreeMap<String, ResourceEntry>,
}

impl ApplicationGraph {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            resources: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ResourceEntry> {
        self.resources.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLICATION_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Core/applications/test-app";

    #[test]
    fn test_node_from_valid_id() {
        let node = Node::from_id(APPLICATION_ID);
        assert_eq!(node.id, APPLICATION_ID);
        assert_eq!(node.name, "test-app");
        assert_eq!(node.resource_type, "Applications.Core/applications");
        assert_eq!(node.error, "");
    }

    #[test]
    fn test_node_from_invalid_id() {
        let node = Node::from_id("\ndkdkfkdfs\t");
        assert_eq!(node.id, "");
        assert_eq!(node.name, "");
        assert_eq!(node.resource_type, "");
        assert_eq!(node.error, "'\ndkdkfkdfs\t' is not a valid resource id");
    }

    #[test]
    fn test_node_from_scope_id_is_error() {
        let node = Node::from_id("/planes/radius/local/resourcegroups/test-group");
        assert!(node.has_error());
        assert!(node.id.is_empty());
    }

    #[test]
    fn test_output_resource_provider() {
        let kubernetes = ResourceId::parse(
            "/planes/kubernetes/local/namespaces/default-demo/providers/apps/Deployment/demo",
        )
        .unwrap();
        let entry = OutputResourceEntry::from_id(&kubernetes);
        assert_eq!(entry.provider, PROVIDER_KUBERNETES);
        assert_eq!(entry.node.name, "demo");
        assert_eq!(entry.node.resource_type, "apps/Deployment");

        let azure = ResourceId::parse(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cache/Redis/cache",
        )
        .unwrap();
        assert_eq!(OutputResourceEntry::from_id(&azure).provider, PROVIDER_AZURE);

        let bare = ResourceId::parse("/providers/Microsoft.Cache/Redis/cache").unwrap();
        assert_eq!(OutputResourceEntry::from_id(&bare).provider, "");
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = ResourceEntry::from_id(APPLICATION_ID);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["name"], "test-app");
        assert_eq!(value["type"], "Applications.Core/applications");
        assert!(value.get("error").is_none());
        assert!(value["connections"].as_array().unwrap().is_empty());
    }
}
