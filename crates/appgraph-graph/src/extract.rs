//! Typed extraction of connections and output resources from a resource's property bag.
//!
//! Each entry is decoded on its own so that one malformed entry is reported in place
//! instead of hiding its siblings. A missing property, or one of the wrong JSON type,
//! simply yields no entries.

use appgraph_core::{GenericResource, ResourceId};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::node::{ConnectionEntry, Node, OutputResourceEntry};

/// `properties.connections`
pub const CONNECTIONS_PATH: &[&str] = &["connections"];
/// `properties.status.outputResources`
pub const OUTPUT_RESOURCES_PATH: &[&str] = &["status", "outputResources"];

/// Wire format of a single connection.
#[derive(Debug, Deserialize)]
struct ConnectionWire {
    source: String,
}

/// Wire format of a single output resource.
#[derive(Debug, Deserialize)]
struct OutputResourceWire {
    id: String,
}

/// Resolve the outbound connections a resource declares.
///
/// A container that connects to a database finds that connection here; the database
/// itself finds nothing, because its connections are inbound and are resolved later
/// while building the graph.
pub fn connections_from_api_data(resource: &GenericResource) -> Vec<ConnectionEntry> {
    let Some(Value::Object(connections)) = resource.property(CONNECTIONS_PATH) else {
        return Vec::new();
    };

    let from = Node::from_id(resource.id.as_deref().unwrap_or_default());

    let mut entries: Vec<ConnectionEntry> = connections
        .iter()
        .map(|(name, raw)| {
            let to = match ConnectionWire::deserialize(raw) {
                Ok(wire) => Node::from_id(&wire.source),
                Err(err) => Node::from_error(err.to_string()),
            };
            ConnectionEntry {
                name: name.clone(),
                from: from.clone(),
                to,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Collect the infrastructure a resource owns.
pub fn output_resources_from_api_data(resource: &GenericResource) -> Vec<OutputResourceEntry> {
    let Some(Value::Array(items)) = resource.property(OUTPUT_RESOURCES_PATH) else {
        return Vec::new();
    };

    let mut entries: Vec<OutputResourceEntry> = items.iter().map(output_resource_entry).collect();
    entries.sort_by(compare_output_resources);
    entries
}

fn output_resource_entry(raw: &Value) -> OutputResourceEntry {
    let wire = match OutputResourceWire::deserialize(raw) {
        Ok(wire) => wire,
        Err(err) => return OutputResourceEntry::from_error(err.to_string()),
    };

    match ResourceId::parse(&wire.id) {
        Ok(id) => OutputResourceEntry::from_id(&id),
        Err(err) => OutputResourceEntry::from_error(format!(
            "failed to unmarshal JSON, value was not a valid resource ID: {}",
            err
        )),
    }
}

/// Groups by cloud vendor first, then by resource kind.
fn compare_output_resources(a: &OutputResourceEntry, b: &OutputResourceEntry) -> Ordering {
    a.provider
        .cmp(&b.provider)
        .then_with(|| a.node.resource_type.cmp(&b.node.resource_type))
        .then_with(|| a.node.name.cmp(&b.node.name))
        .then_with(|| a.node.id.cmp(&b.node.id))
        .then_with(|| a.node.error.cmp(&b.node.error))
}
