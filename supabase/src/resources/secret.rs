//! Project secret resource
//!
//! Secrets are environment values exposed to a project's edge functions. The
//! provider identifies them by name within the project.

use super::declare;
use resplug::{
    AttributeBuilder, Context, Input, InputMap, Output, Resource, ResourceOptions,
    ResourceOutputs, ResourceSchema, ResourceState, Result, SchemaBuilder,
};
use std::sync::OnceLock;

pub const SECRET_TYPE: &str = "supabase:project:Secret";

pub fn secret_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new(SECRET_TYPE)
            .description("Secret exposed to a project's edge functions")
            .attribute(
                AttributeBuilder::string("name")
                    .description("Name of the secret")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("value")
                    .description("Value of the secret")
                    .required()
                    .secret()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("project_id")
                    .wire_name("projectId")
                    .description("ID of the project")
                    .required()
                    .build(),
            )
            .build()
    })
}

#[derive(Debug, Clone)]
pub struct SecretArgs {
    pub name: Input<String>,
    pub value: Input<String>,
    pub project_id: Input<String>,
}

impl SecretArgs {
    pub fn new(
        name: impl Into<Input<String>>,
        value: impl Into<Input<String>>,
        project_id: impl Into<Input<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            project_id: project_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Secret {
    state: ResourceState,
    name: Output<String>,
}

impl Secret {
    pub fn new(ctx: &Context, name: &str, args: SecretArgs, opts: ResourceOptions) -> Result<Secret> {
        let mut inputs = InputMap::new();
        inputs.set("name", Some(args.name));
        inputs.set("value", Some(args.value));
        inputs.set("projectId", Some(args.project_id));
        Self::declare(ctx, name, inputs, None, opts)
    }

    /// Get an existing Secret; its id is the secret's name
    pub fn get(
        ctx: &Context,
        name: &str,
        id: impl Into<String>,
        project_id: Option<Input<String>>,
        opts: ResourceOptions,
    ) -> Result<Secret> {
        let mut state = InputMap::new();
        state.set("projectId", project_id);
        let opts = opts.merge(ResourceOptions::new().id(id));
        Self::declare(ctx, name, InputMap::new(), Some(state), opts)
    }

    pub fn from_urn(ctx: &Context, name: &str, urn: &str) -> Result<Secret> {
        Self::declare(ctx, name, InputMap::new(), None, ResourceOptions::new().urn(urn))
    }

    fn declare(
        ctx: &Context,
        name: &str,
        inputs: InputMap,
        state: Option<InputMap>,
        opts: ResourceOptions,
    ) -> Result<Secret> {
        let (resource_state, mut outputs) = ResourceOutputs::new();
        let secret = Secret {
            state: resource_state,
            name: outputs.output("name"),
        };
        declare(ctx, secret_schema(), name, inputs, state, opts, outputs)?;
        Ok(secret)
    }

    pub fn id(&self) -> &Output<String> {
        self.state.id()
    }

    pub fn name(&self) -> &Output<String> {
        &self.name
    }
}

impl Resource for Secret {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}
