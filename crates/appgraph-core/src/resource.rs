use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::debug;

use crate::error::Result;
use crate::resource_id::ResourceId;

/// A resource as returned by the management API's generic resource listing.
///
/// Only `id` and the `properties` bag matter to the graph; `properties` is kept
/// weakly typed because every resource type carries a different schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, deserialize_with = "object_or_empty")]
    pub properties: Map<String, Value>,
}

impl GenericResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Look up a nested property by path, e.g. `["status", "outputResources"]`.
    ///
    /// Returns `None` when any step is missing or is not an object.
    pub fn property(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.properties.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }
}

/// Accepts any JSON value for `properties`, keeping it only when it is an object.
fn object_or_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceListWire {
    Paged { value: Vec<GenericResource> },
    Flat(Vec<GenericResource>),
}

/// Parse a resource list, either a bare JSON array or the paged `{ "value": [...] }`
/// shape returned by list operations.
pub fn parse_resource_list(text: &str) -> Result<Vec<GenericResource>> {
    let wire: ResourceListWire = serde_json::from_str(text)?;
    Ok(match wire {
        ResourceListWire::Paged { value } => value,
        ResourceListWire::Flat(value) => value,
    })
}

pub fn read_resource_list<R: Read>(mut reader: R) -> Result<Vec<GenericResource>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_resource_list(&text)
}

/// True when the resource's `properties.application` names `application_name`.
pub fn is_resource_in_application(resource: &GenericResource, application_name: &str) -> bool {
    references_scope(resource, "application", application_name)
}

/// True when the resource's `properties.environment` names `environment_name`.
pub fn is_resource_in_environment(resource: &GenericResource, environment_name: &str) -> bool {
    references_scope(resource, "environment", environment_name)
}

fn references_scope(resource: &GenericResource, property: &str, expected_name: &str) -> bool {
    let Some(raw) = resource.properties.get(property).and_then(Value::as_str) else {
        return false;
    };
    if raw.is_empty() {
        return false;
    }

    match ResourceId::parse_resource(raw) {
        Ok(id) => id.name().eq_ignore_ascii_case(expected_name),
        Err(err) => {
            debug!(
                resource = resource.id.as_deref().unwrap_or_default(),
                property,
                "ignoring unparsable scope reference: {}",
                err
            );
            false
        }
    }
}

/// Split a flat listing into the application-scoped and environment-scoped lists the
/// graph builder expects. A resource may appear in both.
pub fn partition_resources(
    resources: &[GenericResource],
    application_name: &str,
    environment_name: &str,
) -> (Vec<GenericResource>, Vec<GenericResource>) {
    let application = resources
        .iter()
        .filter(|r| is_resource_in_application(r, application_name))
        .cloned()
        .collect();
    let environment = resources
        .iter()
        .filter(|r| is_resource_in_environment(r, environment_name))
        .cloned()
        .collect();
    (application, environment)
}
