#![allow(dead_code)]

use appgraph_core::GenericResource;
use serde_json::{json, Map, Value};

pub const APPLICATION_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Core/applications/test-app";
pub const CONTAINER_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Core/containers/webapp";
pub const REDIS_ID: &str = "/planes/radius/local/resourcegroups/test-group/providers/Applications.Datastores/redisCaches/redis";
pub const AZURE_REDIS_CACHE_ID: &str = "/subscriptions/66d1209e-1382-45d3-99bb-650e6bf63fc0/resourceGroups/test-group/providers/Microsoft.Cache/Redis/redis";
pub const AWS_MEMORYDB_ID: &str = "/planes/aws/aws/accounts/00000000/regions/us-east-1/providers/AWS.MemoryDB/Cluster/redis-aqbjixghynqgg";
pub const DEPLOYMENT_ID: &str =
    "/planes/kubernetes/local/namespaces/default-demo/providers/apps/Deployment/demo";

pub fn redis_id(name: &str) -> String {
    format!("/planes/radius/local/resourcegroups/test-group/providers/Applications.Datastores/redisCaches/{name}")
}

pub fn container_id(name: &str) -> String {
    format!("/planes/radius/local/resourcegroups/test-group/providers/Applications.Core/containers/{name}")
}

pub fn output_resource(id: &str) -> Value {
    json!({ "id": id })
}

/// Property bag with the given connections (name -> source) and output resources.
pub fn properties(connections: &[(&str, &str)], output_resources: &[&str]) -> Map<String, Value> {
    let mut properties = Map::new();

    if !connections.is_empty() {
        let connections: Map<String, Value> = connections
            .iter()
            .map(|(name, source)| (name.to_string(), json!({ "source": source })))
            .collect();
        properties.insert("connections".to_string(), Value::Object(connections));
    }

    if !output_resources.is_empty() {
        let items: Vec<Value> = output_resources.iter().map(|id| output_resource(id)).collect();
        properties.insert(
            "status".to_string(),
            json!({ "outputResources": items }),
        );
    }

    properties
}

pub fn resource(id: &str, connections: &[(&str, &str)], output_resources: &[&str]) -> GenericResource {
    GenericResource::new(id).with_properties(properties(connections, output_resources))
}
