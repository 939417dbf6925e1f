//! Component registry and schemas
//!
//! Maps component type tokens to constructors and advertises input/output
//! schemas so the engine can validate programs against this provider.

use serde::Serialize;
use serde_json::Value;
use static_page_common::tokens::{COMPONENT_STATIC_PAGE, INPUT_INDEX_CONTENT, OUTPUT_ENDPOINT};
use static_page_common::{ConstructError, Input};

use crate::context::ComponentContext;
use crate::static_page::{StaticPage, StaticPageArgs};

/// Schema entry for one component property
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub name: &'static str,
    pub type_name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Schema for one exported component
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    pub type_token: &'static str,
    pub inputs: Vec<PropertySpec>,
    pub outputs: Vec<PropertySpec>,
}

/// The components this provider exports
pub struct Registry;

impl Registry {
    /// Schemas for every exported component
    pub fn schemas() -> Vec<ComponentSchema> {
        vec![ComponentSchema {
            type_token: COMPONENT_STATIC_PAGE,
            inputs: vec![PropertySpec {
                name: INPUT_INDEX_CONTENT,
                type_name: "string",
                required: true,
                description: "Body of the index document served at the site root",
            }],
            outputs: vec![PropertySpec {
                name: OUTPUT_ENDPOINT,
                type_name: "string",
                required: true,
                description: "Public website endpoint, known after apply",
            }],
        }]
    }

    /// Dispatch a construction request by type token
    pub fn construct(
        type_token: &str,
        name: &str,
        inputs: &Value,
    ) -> Result<ComponentContext, ConstructError> {
        match type_token {
            COMPONENT_STATIC_PAGE => {
                let args = parse_static_page_args(inputs)?;
                let mut ctx = ComponentContext::new(COMPONENT_STATIC_PAGE, name)?;
                StaticPage::construct(&mut ctx, args)?;
                Ok(ctx)
            }
            other => Err(ConstructError::UnknownComponentType(other.to_string())),
        }
    }
}

fn parse_static_page_args(inputs: &Value) -> Result<StaticPageArgs, ConstructError> {
    let content = inputs
        .get(INPUT_INDEX_CONTENT)
        .ok_or(ConstructError::MissingInput(INPUT_INDEX_CONTENT))?;
    let content = content
        .as_str()
        .ok_or(ConstructError::InvalidInput {
            input: INPUT_INDEX_CONTENT,
            expected: "string",
        })?;
    Ok(StaticPageArgs {
        index_content: Input::Value(content.to_string()),
    })
}
