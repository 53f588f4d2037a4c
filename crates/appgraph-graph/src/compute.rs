use appgraph_core::GenericResource;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

use crate::extract::{connections_from_api_data, output_resources_from_api_data};
use crate::membership::Membership;
use crate::node::{ApplicationGraph, ConnectionEntry, ResourceEntry};

/// Construct the application graph from the application and environment listings.
///
/// This never fails. Missing or corrupted data shows up as error annotations on nodes
/// and connections, because the result is meant for a human reading a partial picture
/// rather than for strict validation.
///
/// A resource is in the application when it is application-scoped, or when it can be
/// reached from an application-scoped resource by following connections. Reached
/// resources are either environment-scoped ones from the listing, or external (cloud)
/// resources that are never listed and only appear as connection targets. When an ID is
/// listed by both inputs the application-scoped record is used.
///
/// NOTE: connections routed through HTTP routes (`provides` on container ports) are
/// not followed.
pub fn compute(
    application_name: &str,
    application_resources: &[GenericResource],
    environment_resources: &[GenericResource],
) -> ApplicationGraph {
    let mut membership = Membership::new();
    let mut candidates: Vec<(&str, &GenericResource)> = Vec::new();

    for resource in application_resources {
        let Some(id) = resource.id.as_deref() else {
            warn!("skipping application resource without an id");
            continue;
        };
        if membership.register_application(id) {
            candidates.push((id, resource));
        }
    }

    for resource in environment_resources {
        let Some(id) = resource.id.as_deref() else {
            warn!("skipping environment resource without an id");
            continue;
        };
        if membership.register_environment(id) {
            candidates.push((id, resource));
        }
    }

    let mut entries_by_id: HashMap<String, ResourceEntry> = candidates
        .iter()
        .map(|(id, resource)| {
            let mut entry = ResourceEntry::from_id(id);
            entry.connections = connections_from_api_data(resource);
            entry.resources = output_resources_from_api_data(resource);
            (id.to_string(), entry)
        })
        .collect();

    // Breadth-first from every application-scoped resource, including ones whose own
    // ID is unparsable: their outbound connections still pull targets in.
    let mut queue: VecDeque<String> = candidates
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| membership.is_in_application(id))
        .map(str::to_string)
        .collect();

    let mut connections_by_destination: HashMap<String, Vec<ConnectionEntry>> = HashMap::new();
    let mut edges = 0usize;

    while let Some(id) = queue.pop_front() {
        let outbound = match entries_by_id.get(&id) {
            Some(entry) => entry.connections.clone(),
            None => continue,
        };

        for connection in outbound {
            if connection.to.has_error() {
                continue;
            }

            let destination = connection.to.id.clone();
            if membership.admit(&destination) {
                debug!(from = %id, to = %destination, "resource reached through connection");
                entries_by_id
                    .entry(destination.clone())
                    .or_insert_with(|| ResourceEntry::from_id(&destination));
                queue.push_back(destination.clone());
            }

            edges += 1;
            connections_by_destination
                .entry(destination)
                .or_default()
                .push(connection);
        }
    }

    debug!(
        application = application_name,
        known = membership.len(),
        edges,
        "application membership resolved"
    );

    let mut graph = ApplicationGraph::new(application_name);
    for id in membership.in_application() {
        let Some(mut entry) = entries_by_id.remove(id) else {
            continue;
        };

        if let Some(inbound) = connections_by_destination.remove(id) {
            entry.connections.extend(inbound);
        }
        entry.connections.sort_by(|a, b| a.name.cmp(&b.name));

        graph.resources.insert(id.to_string(), entry);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, OutputResourceEntry};
    use appgraph_core::ResourceId;
    use serde_json::{json, Value};

    const CONTAINER_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Core/containers/webapp";
    const REDIS_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Datastores/redisCaches/redis";
    const DEPLOYMENT_ID: &str =
        "/planes/kubernetes/local/namespaces/default-demo/providers/apps/Deployment/demo";

    fn resource(id: &str, properties: Value) -> GenericResource {
        serde_json::from_value(json!({ "id": id, "properties": properties })).unwrap()
    }

    #[test]
    fn test_empty() {
        let graph = compute("test-app", &[], &[]);
        assert_eq!(graph, ApplicationGraph::new("test-app"));
    }

    #[test]
    fn test_no_application_resources() {
        let environment = vec![resource(REDIS_ID, json!({}))];
        let graph = compute("test-app", &[], &environment);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_no_connections() {
        let application = vec![resource(
            CONTAINER_ID,
            json!({ "status": { "outputResources": [ { "id": DEPLOYMENT_ID } ] } }),
        )];
        let mut environment = vec![resource(REDIS_ID, json!({}))];
        environment.extend(application.clone());

        let graph = compute("test-app", &application, &environment);

        let mut expected = ApplicationGraph::new("test-app");
        expected.resources.insert(
            CONTAINER_ID.to_string(),
            ResourceEntry {
                node: Node::from_id(CONTAINER_ID),
                connections: Vec::new(),
                resources: vec![OutputResourceEntry::from_id(
                    &ResourceId::parse(DEPLOYMENT_ID).unwrap(),
                )],
            },
        );
        assert_eq!(graph, expected);
    }

    #[test]
    fn test_duplicate_prefers_application_payload() {
        let application = vec![resource(
            CONTAINER_ID,
            json!({ "connections": { "db": { "source": REDIS_ID } } }),
        )];
        let environment = vec![
            resource(CONTAINER_ID, json!({})),
            resource(REDIS_ID, json!({})),
        ];

        let graph = compute("test-app", &application, &environment);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get(CONTAINER_ID).unwrap().connections.len(), 1);
    }

    #[test]
    fn test_resource_without_id_is_skipped() {
        let application = vec![GenericResource::default(), resource(CONTAINER_ID, json!({}))];
        let graph = compute("test-app", &application, &[]);
        assert_eq!(graph.len(), 1);
    }
}
