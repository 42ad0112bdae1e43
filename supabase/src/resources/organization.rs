//! Organization resource

use super::declare;
use resplug::{
    AttributeBuilder, Context, Input, InputMap, Output, Resource, ResourceOptions,
    ResourceOutputs, ResourceSchema, ResourceState, Result, SchemaBuilder,
};
use std::sync::OnceLock;

pub const ORGANIZATION_TYPE: &str = "supabase:index:Organization";

pub fn organization_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new(ORGANIZATION_TYPE)
            .description("Supabase organization")
            .attribute(
                AttributeBuilder::string("name")
                    .description("Name of the organization")
                    .required()
                    .output()
                    .build(),
            )
            .build()
    })
}

#[derive(Debug, Clone)]
pub struct OrganizationArgs {
    pub name: Input<String>,
}

impl OrganizationArgs {
    pub fn new(name: impl Into<Input<String>>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct Organization {
    state: ResourceState,
    name: Output<String>,
}

impl Organization {
    pub fn new(
        ctx: &Context,
        name: &str,
        args: OrganizationArgs,
        opts: ResourceOptions,
    ) -> Result<Organization> {
        let mut inputs = InputMap::new();
        inputs.set("name", Some(args.name));
        Self::declare(ctx, name, inputs, None, opts)
    }

    /// Get an existing Organization by its provider id
    pub fn get(
        ctx: &Context,
        name: &str,
        id: impl Into<String>,
        opts: ResourceOptions,
    ) -> Result<Organization> {
        let opts = opts.merge(ResourceOptions::new().id(id));
        Self::declare(ctx, name, InputMap::new(), Some(InputMap::new()), opts)
    }

    pub fn from_urn(ctx: &Context, name: &str, urn: &str) -> Result<Organization> {
        Self::declare(ctx, name, InputMap::new(), None, ResourceOptions::new().urn(urn))
    }

    fn declare(
        ctx: &Context,
        name: &str,
        inputs: InputMap,
        state: Option<InputMap>,
        opts: ResourceOptions,
    ) -> Result<Organization> {
        let (resource_state, mut outputs) = ResourceOutputs::new();
        let organization = Organization {
            state: resource_state,
            name: outputs.output("name"),
        };
        declare(ctx, organization_schema(), name, inputs, state, opts, outputs)?;
        Ok(organization)
    }

    pub fn id(&self) -> &Output<String> {
        self.state.id()
    }

    pub fn name(&self) -> &Output<String> {
        &self.name
    }
}

impl Resource for Organization {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}
