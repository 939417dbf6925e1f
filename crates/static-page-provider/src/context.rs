//! Per-construction component context
//!
//! Collects the child declarations of one component instance, mints deferred
//! outputs for engine-computed attributes (e.g. the generated bucket name),
//! and holds the component's published outputs. The engine drives resolution
//! through [`ComponentContext::resolve_attribute`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use static_page_common::{ConstructError, Output, OutputError, ResourceDeclaration, Resolver};
use tracing::{debug, warn};

/// Construction state for a single component instance
pub struct ComponentContext {
    component_type: String,
    component_name: String,
    declarations: Vec<ResourceDeclaration>,
    resolvers: HashMap<(String, String), Resolver<String>>,
    attributes: HashMap<(String, String), Output<String>>,
    outputs: BTreeMap<String, Output<String>>,
}

// Resolvers are opaque, so show the identifying fields only
impl fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext")
            .field("component_type", &self.component_type)
            .field("component_name", &self.component_name)
            .field("declarations", &self.declarations.len())
            .finish_non_exhaustive()
    }
}

impl ComponentContext {
    /// Create a context for one component instance
    pub fn new(
        component_type: impl Into<String>,
        component_name: impl Into<String>,
    ) -> Result<Self, ConstructError> {
        let component_name = component_name.into();
        if component_name.is_empty() {
            return Err(ConstructError::EmptyName);
        }
        Ok(Self {
            component_type: component_type.into(),
            component_name,
            declarations: Vec::new(),
            resolvers: HashMap::new(),
            attributes: HashMap::new(),
            outputs: BTreeMap::new(),
        })
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Register a child declaration with no engine-computed attributes
    pub fn register(&mut self, declaration: ResourceDeclaration) {
        debug!(
            resource = %declaration.name,
            type_token = %declaration.type_token,
            "Registering resource declaration"
        );
        self.declarations.push(declaration);
    }

    /// Register a child declaration and mint a deferred output for one
    /// engine-computed attribute
    pub fn register_computed(
        &mut self,
        declaration: ResourceDeclaration,
        attribute: &str,
    ) -> Output<String> {
        let key = (declaration.name.clone(), attribute.to_string());
        let (output, resolver) = Output::pending();
        self.resolvers.insert(key.clone(), resolver);
        self.attributes.insert(key, output.clone());
        self.register(declaration);
        output
    }

    /// Engine callback: a computed attribute's value is now known
    ///
    /// Fires any continuations registered on the attribute's output. Returns
    /// false if the attribute is unknown or already settled.
    pub fn resolve_attribute(&mut self, resource: &str, attribute: &str, value: String) -> bool {
        let key = (resource.to_string(), attribute.to_string());
        match self.resolvers.remove(&key) {
            Some(resolver) => {
                debug!(resource, attribute, "Resolving computed attribute");
                resolver.resolve(value);
                true
            }
            None => {
                warn!(resource, attribute, "No pending resolver for attribute");
                false
            }
        }
    }

    /// Engine callback: a computed attribute failed to materialize
    pub fn fail_attribute(&mut self, resource: &str, attribute: &str, message: &str) -> bool {
        let key = (resource.to_string(), attribute.to_string());
        match self.resolvers.remove(&key) {
            Some(resolver) => {
                warn!(resource, attribute, message, "Failing computed attribute");
                resolver.fail(message);
                true
            }
            None => false,
        }
    }

    /// Publish a component output
    pub fn publish_output(&mut self, name: impl Into<String>, output: Output<String>) {
        self.outputs.insert(name.into(), output);
    }

    pub fn declarations(&self) -> &[ResourceDeclaration] {
        &self.declarations
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output<String>> {
        &self.outputs
    }

    /// First failure among declared properties and published outputs, if any
    ///
    /// A failure here means a locally-derived value (the policy document)
    /// could not be produced; the construction is unusable.
    pub fn failure(&self) -> Option<OutputError> {
        for declaration in &self.declarations {
            for value in declaration.properties.values() {
                if let Some(err) = value.error() {
                    return Some(err);
                }
            }
        }
        self.outputs.values().find_map(|output| output.error())
    }
}
