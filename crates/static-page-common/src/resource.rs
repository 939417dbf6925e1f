//! Resource declarations submitted to the external engine
//!
//! A declaration is a node in the engine's resource graph: a stable logical
//! name, a type token, an optional parent edge (ownership, which gives the
//! engine deletion order), optional explicit ordering edges, and a property
//! map whose values may be deferred.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::output::Output;
use crate::tokens::UNKNOWN_VALUE;

/// A single property value on a declaration
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Str(String),
    Bool(bool),
    /// Deferred until the engine resolves an upstream value
    Deferred(Output<String>),
}

impl PropertyValue {
    /// JSON snapshot of the value. Deferreds without a resolved value
    /// (still pending, or failed) become the unknown sentinel; failures
    /// are reported through [`PropertyValue::error`], not here.
    pub fn snapshot(&self) -> Value {
        match self {
            PropertyValue::Str(s) => json!(s),
            PropertyValue::Bool(b) => json!(b),
            PropertyValue::Deferred(output) => match output.get() {
                Some(value) => json!(value),
                None => json!(UNKNOWN_VALUE),
            },
        }
    }

    /// The failure of a failed deferred value, if any
    pub fn error(&self) -> Option<crate::output::OutputError> {
        match self {
            PropertyValue::Deferred(output) => output.error(),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Output<String>> for PropertyValue {
    fn from(output: Output<String>) -> Self {
        PropertyValue::Deferred(output)
    }
}

/// A resource declaration handed to the external engine
///
/// Declarations are produced once per construction and never mutated after
/// submission; the engine owns the resource lifecycle from there.
#[derive(Debug, Clone)]
pub struct ResourceDeclaration {
    /// Logical name, unique within the component
    pub name: String,
    /// Provider-qualified type token
    pub type_token: String,
    /// Owning resource (deletion order: children before parents)
    pub parent: Option<String>,
    /// Explicit must-create-after edges, beyond the parent edge
    pub depends_on: Vec<String>,
    /// Property map; BTreeMap keeps snapshots deterministic
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ResourceDeclaration {
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
            parent: None,
            depends_on: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Set the parent edge
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add an explicit ordering edge
    pub fn depends_on(mut self, predecessor: impl Into<String>) -> Self {
        self.depends_on.push(predecessor.into());
        self
    }

    /// Set a property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// JSON snapshot of the declaration for the host wire
    pub fn snapshot(&self) -> Value {
        let properties: BTreeMap<&str, Value> = self
            .properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.snapshot()))
            .collect();
        json!({
            "name": self.name,
            "type": self.type_token,
            "parent": self.parent,
            "dependsOn": self.depends_on,
            "properties": properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TYPE_BUCKET_OBJECT;

    #[test]
    fn test_snapshot_shape() {
        let decl = ResourceDeclaration::new("site-index-object", TYPE_BUCKET_OBJECT)
            .parent("site-bucket")
            .property("key", "index.html")
            .property("contentType", "text/html");

        let snap = decl.snapshot();
        assert_eq!(snap["name"], "site-index-object");
        assert_eq!(snap["type"], TYPE_BUCKET_OBJECT);
        assert_eq!(snap["parent"], "site-bucket");
        assert_eq!(snap["dependsOn"], json!([]));
        assert_eq!(snap["properties"]["key"], "index.html");
        assert_eq!(snap["properties"]["contentType"], "text/html");
    }

    #[test]
    fn test_unresolved_deferred_snapshots_to_sentinel() {
        let (output, resolver) = Output::pending();
        let decl = ResourceDeclaration::new("r", "t").property("bucket", output);

        assert_eq!(decl.snapshot()["properties"]["bucket"], UNKNOWN_VALUE);

        resolver.resolve("actual-bucket".to_string());
        assert_eq!(decl.snapshot()["properties"]["bucket"], "actual-bucket");
    }

    #[test]
    fn test_depends_on_recorded() {
        let decl = ResourceDeclaration::new("policy", "t").depends_on("access-block");
        assert_eq!(decl.depends_on, vec!["access-block".to_string()]);
        assert_eq!(decl.snapshot()["dependsOn"], json!(["access-block"]));
    }

    #[test]
    fn test_failed_deferred_reports_error() {
        let (output, resolver) = Output::<String>::pending();
        let decl = ResourceDeclaration::new("r", "t").property("bucket", output);
        resolver.fail("nope");

        let err = decl.properties["bucket"].error();
        assert_eq!(err.map(|e| e.0), Some("nope".to_string()));
        // The snapshot never carries a value for a failed deferred
        assert_eq!(decl.snapshot()["properties"]["bucket"], UNKNOWN_VALUE);
    }
}
