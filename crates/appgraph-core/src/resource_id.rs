//! Parsing for ARM (`/subscriptions/...`) and UCP (`/planes/...`) resource IDs.
//!
//! An ID is split into three parts: the root scope (type/name pairs before the first
//! `providers` segment), the resource type segments, and optional extension segments
//! introduced by a second `providers` segment.

use std::fmt;
use thiserror::Error;

pub const SEGMENT_SEPARATOR: &str = "/";
pub const PLANES_SEGMENT: &str = "planes";
pub const PROVIDERS_SEGMENT: &str = "providers";
pub const RESOURCE_GROUPS_SEGMENT: &str = "resourcegroups";

pub const PLANE_TYPE_PREFIX: &str = "System.Planes";
pub const RESOURCE_GROUP_TYPE: &str = "System.Resources/resourceGroups";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdError {
    #[error("'{0}' is not a valid resource id")]
    Invalid(String),

    #[error("{0:?} is a valid resource id but does not refer to a resource")]
    NotAResource(String),
}

/// One of the root-scope pairs of a resource ID, e.g. `resourceGroups/my-group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeSegment {
    pub type_name: String,
    /// Empty for a scope collection.
    pub name: String,
}

/// One of the type/name pairs after `providers`. The first segment carries the
/// `Namespace/type` combination, later ones a bare type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    pub type_name: String,
    /// Empty for a collection.
    pub name: String,
}

/// An immutable, parsed resource ID. Use [`ResourceId::parse`] or
/// [`ResourceId::parse_resource`] to construct one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceId {
    id: String,
    scope_segments: Vec<ScopeSegment>,
    type_segments: Vec<TypeSegment>,
    extension_segments: Vec<TypeSegment>,
}

impl ResourceId {
    /// Parse any valid resource ID (scope, collection or resource) as permissively as
    /// possible. The string form of the result is normalised.
    pub fn parse(id: &str) -> Result<Self, ResourceIdError> {
        let invalid = || ResourceIdError::Invalid(id.to_string());

        // A leading `//` would turn into a protocol-relative URL if reflected back.
        if !id.starts_with(SEGMENT_SEPARATOR) || id.starts_with("//") {
            return Err(invalid());
        }

        let mut rest = &id[1..];
        rest = rest.strip_suffix(SEGMENT_SEPARATOR).unwrap_or(rest);

        let mut ucp_qualified = false;
        if rest.eq_ignore_ascii_case(PLANES_SEGMENT) {
            ucp_qualified = true;
            rest = "";
        } else if let Some(stripped) = rest.strip_prefix("planes/") {
            ucp_qualified = true;
            rest = stripped;
        }

        if rest.is_empty() {
            return Ok(Self::assemble(ucp_qualified, Vec::new(), Vec::new(), Vec::new()));
        }

        let segments: Vec<&str> = rest.split(SEGMENT_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        let mut scopes = Vec::new();
        let mut i = 0;
        while i < segments.len() {
            if is_providers(segments[i]) {
                if i + 1 == segments.len() {
                    return Err(invalid());
                }
                i += 1;
                break;
            }

            if segments.len() - i < 2 {
                // A lone trailing segment names a collection under the scope.
                scopes.push(ScopeSegment {
                    type_name: segments[i].to_string(),
                    name: String::new(),
                });
                i += 1;
                break;
            }

            if is_providers(segments[i + 1]) {
                return Err(invalid());
            }

            scopes.push(ScopeSegment {
                type_name: segments[i].to_string(),
                name: segments[i + 1].to_string(),
            });
            i += 2;
        }

        if i == segments.len() {
            return Ok(Self::assemble(ucp_qualified, scopes, Vec::new(), Vec::new()));
        }

        let (types, next) = parse_type_segments(&segments, i, true).ok_or_else(invalid)?;
        i = next;

        if i == segments.len() {
            return Ok(Self::assemble(ucp_qualified, scopes, types, Vec::new()));
        }

        let (extensions, _) = parse_type_segments(&segments, i, false).ok_or_else(invalid)?;
        Ok(Self::assemble(ucp_qualified, scopes, types, extensions))
    }

    /// Parse an ID that must refer to a named resource (not a scope, collection or
    /// custom action).
    pub fn parse_resource(id: &str) -> Result<Self, ResourceIdError> {
        let parsed = Self::parse(id)?;
        if !parsed.is_resource() {
            return Err(ResourceIdError::NotAResource(id.to_string()));
        }
        Ok(parsed)
    }

    fn assemble(
        ucp_qualified: bool,
        scope_segments: Vec<ScopeSegment>,
        type_segments: Vec<TypeSegment>,
        extension_segments: Vec<TypeSegment>,
    ) -> Self {
        let relative = make_relative_id(&scope_segments, &type_segments, &extension_segments);
        let id = if !ucp_qualified {
            relative
        } else if relative == SEGMENT_SEPARATOR {
            format!("{SEGMENT_SEPARATOR}{PLANES_SEGMENT}")
        } else {
            format!("{SEGMENT_SEPARATOR}{PLANES_SEGMENT}{relative}")
        };

        Self {
            id,
            scope_segments,
            type_segments,
            extension_segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    pub fn is_ucp_qualified(&self) -> bool {
        self.id.starts_with("/planes")
    }

    pub fn scope_segments(&self) -> &[ScopeSegment] {
        &self.scope_segments
    }

    pub fn type_segments(&self) -> &[TypeSegment] {
        &self.type_segments
    }

    pub fn extension_segments(&self) -> &[TypeSegment] {
        &self.extension_segments
    }

    /// True for a named scope such as `/planes/radius/local/resourceGroups/rg1`.
    pub fn is_scope(&self) -> bool {
        !self.is_empty()
            && self.type_segments.is_empty()
            && self.extension_segments.is_empty()
            && self
                .scope_segments
                .last()
                .map_or(true, |scope| !scope.name.is_empty())
    }

    /// True for a collection or custom action on a scope.
    pub fn is_scope_collection(&self) -> bool {
        !self.is_empty()
            && self.type_segments.is_empty()
            && self.extension_segments.is_empty()
            && self
                .scope_segments
                .last()
                .is_some_and(|scope| scope.name.is_empty())
    }

    /// True for a named resource, including named extension resources.
    pub fn is_resource(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        let segments = if self.extension_segments.is_empty() {
            &self.type_segments
        } else {
            &self.extension_segments
        };
        segments.last().is_some_and(|segment| !segment.name.is_empty())
    }

    /// The resource or scope name, empty when there is none.
    pub fn name(&self) -> &str {
        if let Some(last) = self.extension_segments.last() {
            return &last.name;
        }
        if let Some(last) = self.type_segments.last() {
            return &last.name;
        }
        self.scope_segments
            .last()
            .map_or("", |scope| scope.name.as_str())
    }

    /// The fully-qualified resource type, e.g. `Applications.Core/containers`, or an
    /// empty string when it cannot be determined.
    pub fn type_name(&self) -> String {
        let segments = if self.extension_segments.is_empty() {
            &self.type_segments
        } else {
            &self.extension_segments
        };
        if !segments.is_empty() {
            return segments
                .iter()
                .map(|segment| segment.type_name.as_str())
                .collect::<Vec<_>>()
                .join(SEGMENT_SEPARATOR);
        }

        match self.scope_segments.as_slice() {
            [plane] => format!("{PLANE_TYPE_PREFIX}/{}", plane.type_name),
            [_, group]
                if group.type_name.eq_ignore_ascii_case(RESOURCE_GROUPS_SEGMENT)
                    && !self.is_scope_collection() =>
            {
                RESOURCE_GROUP_TYPE.to_string()
            }
            _ => String::new(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn is_providers(segment: &str) -> bool {
    segment.eq_ignore_ascii_case(PROVIDERS_SEGMENT)
}

/// Parse `Namespace/type[/name]` followed by `type/name` pairs, starting at `start`.
///
/// When `stop_at_providers` is set a `providers` segment ends the run and is consumed.
/// Returns the segments and the index of the first unconsumed segment, or `None` when
/// the grammar is violated.
fn parse_type_segments(
    segments: &[&str],
    start: usize,
    stop_at_providers: bool,
) -> Option<(Vec<TypeSegment>, usize)> {
    let mut i = start;
    if segments.len() - i < 2 {
        return None;
    }

    let mut first = TypeSegment {
        type_name: format!("{}/{}", segments[i], segments[i + 1]),
        name: String::new(),
    };
    i += 2;

    // A collection ID may omit the trailing name.
    if i < segments.len() {
        first.name = segments[i].to_string();
        i += 1;
    }
    let mut types = vec![first];

    while i < segments.len() {
        if stop_at_providers && is_providers(segments[i]) {
            if i + 1 == segments.len() {
                return None;
            }
            i += 1;
            break;
        }

        let mut segment = TypeSegment {
            type_name: segments[i].to_string(),
            name: String::new(),
        };
        i += 1;

        if i == segments.len() {
            types.push(segment);
            break;
        }

        segment.name = segments[i].to_string();
        i += 1;
        types.push(segment);
    }

    Some((types, i))
}

/// Build a plane-relative (ARM style) ID string from parsed segments.
pub fn make_relative_id(
    scopes: &[ScopeSegment],
    types: &[TypeSegment],
    extensions: &[TypeSegment],
) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for scope in scopes {
        parts.push(&scope.type_name);
        if !scope.name.is_empty() {
            parts.push(&scope.name);
        }
    }

    for group in [types, extensions] {
        if group.is_empty() {
            continue;
        }
        parts.push(PROVIDERS_SEGMENT);
        for segment in group {
            parts.push(&segment.type_name);
            if !segment.name.is_empty() {
                parts.push(&segment.name);
            }
        }
    }

    format!("{SEGMENT_SEPARATOR}{}", parts.join(SEGMENT_SEPARATOR))
}
