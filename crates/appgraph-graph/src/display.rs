use std::cmp::Ordering;
use std::fmt;

use crate::hyperlink::{hyperlink, portal_link};
use crate::node::{ApplicationGraph, ConnectionEntry, OutputResourceEntry, ResourceEntry};

/// Containers are usually the entry point a reader is looking for, so they go first.
pub const CONTAINERS_TYPE: &str = "Applications.Core/containers";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Emit OSC 8 terminal hyperlinks for cloud console links.
    pub hyperlinks: bool,
}

/// Render the graph as plain text.
pub fn display(graph: &ApplicationGraph) -> String {
    display_with(graph, &DisplayOptions::default())
}

pub fn display_with(graph: &ApplicationGraph, options: &DisplayOptions) -> String {
    GraphReport::new(graph, *options).to_string()
}

/// A formatted view of an [`ApplicationGraph`].
pub struct GraphReport<'a> {
    graph: &'a ApplicationGraph,
    options: DisplayOptions,
}

impl<'a> GraphReport<'a> {
    pub fn new(graph: &'a ApplicationGraph, options: DisplayOptions) -> Self {
        Self { graph, options }
    }

    fn write_entry(&self, f: &mut fmt::Formatter<'_>, entry: &ResourceEntry) -> fmt::Result {
        if entry.node.has_error() {
            return writeln!(f, "Error: {}", entry.node.error);
        }

        writeln!(f, "Name: {} ({})", entry.node.name, entry.node.resource_type)?;

        if entry.connections.is_empty() {
            writeln!(f, "Connections: (none)")?;
        } else {
            writeln!(f, "Connections:")?;
            for connection in &entry.connections {
                write_connection(f, entry, connection)?;
            }
        }

        if entry.resources.is_empty() {
            writeln!(f, "Resources: (none)")?;
        } else {
            writeln!(f, "Resources:")?;
            for resource in &entry.resources {
                self.write_output_resource(f, resource)?;
            }
        }

        writeln!(f)
    }

    fn write_output_resource(
        &self,
        f: &mut fmt::Formatter<'_>,
        resource: &OutputResourceEntry,
    ) -> fmt::Result {
        if resource.node.has_error() {
            return writeln!(f, "  error ({})", resource.node.error);
        }

        let name = match portal_link(resource) {
            Some(url) if self.options.hyperlinks => hyperlink(&resource.node.name, &url),
            _ => resource.node.name.clone(),
        };
        writeln!(
            f,
            "  {} ({}: {})",
            name, resource.provider, resource.node.resource_type
        )
    }
}

fn write_connection(
    f: &mut fmt::Formatter<'_>,
    entry: &ResourceEntry,
    connection: &ConnectionEntry,
) -> fmt::Result {
    if connection.to.has_error() {
        writeln!(f, "  {} -> error ({})", connection.from.name, connection.to.error)
    } else if connection.from.id == entry.node.id {
        writeln!(
            f,
            "  {} -> {} ({})",
            connection.from.name, connection.to.name, connection.to.resource_type
        )
    } else {
        writeln!(
            f,
            "  {} ({}) -> {}",
            connection.from.name, connection.from.resource_type, connection.to.name
        )
    }
}

impl fmt::Display for GraphReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<&ResourceEntry> = self.graph.resources.values().collect();
        entries.sort_by(|a, b| compare_entries(a, b));

        write!(f, "Displaying application: {}\n\n", self.graph.application_name)?;
        if entries.is_empty() {
            return write!(f, "(empty)\n\n");
        }

        for entry in entries {
            self.write_entry(f, entry)?;
        }
        Ok(())
    }
}

fn is_container(entry: &ResourceEntry) -> bool {
    entry.node.resource_type.eq_ignore_ascii_case(CONTAINERS_TYPE)
}

fn compare_entries(a: &ResourceEntry, b: &ResourceEntry) -> Ordering {
    is_container(b)
        .cmp(&is_container(a))
        .then_with(|| a.node.resource_type.cmp(&b.node.resource_type))
        .then_with(|| a.node.name.cmp(&b.node.name))
        .then_with(|| a.node.id.cmp(&b.node.id))
        .then_with(|| a.node.error.cmp(&b.node.error))
}
