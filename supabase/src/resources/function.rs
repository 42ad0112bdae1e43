//! Edge function resource
//!
//! A Function is source code deployed to a project's edge runtime. The binding
//! only declares it: the provider plugin creates, reads, updates and deletes
//! the remote function and reports its status and version back as outputs.

use super::{declare, pick_inputs};
use crate::enums::FunctionStatus;
use resplug::defaults::PropertyDefault;
use resplug::{
    AttributeBuilder, Context, Input, InputMap, Output, Resource, ResourceOptions,
    ResourceOutputs, ResourceSchema, ResourceState, Result, SchemaBuilder,
};
use std::sync::OnceLock;

pub const FUNCTION_TYPE: &str = "supabase:index:Function";

/// Schema of the Function resource
pub fn function_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new(FUNCTION_TYPE)
            .description("Edge function deployed to a Supabase project")
            .attribute(
                AttributeBuilder::string("body")
                    .description("Body of the function")
                    .required()
                    .secret()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("Name of the function")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("project_id")
                    .wire_name("projectId")
                    .description("ID of the project")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("slug")
                    .description("Slug of the function")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("verify_jwt")
                    .description("Verify JWT before running")
                    .optional()
                    .output()
                    .default(PropertyDefault::bool(false))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("created_at")
                    .description("Function creation date")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("updated_at")
                    .wire_name("updatedAt")
                    .description("Function updated date")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::enumeration("status", FunctionStatus::values())
                    .description("Status of the function")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::integer("version")
                    .description("Version of the function")
                    .output()
                    .build(),
            )
            .build()
    })
}

/// The set of arguments for constructing a Function
#[derive(Debug, Clone)]
pub struct FunctionArgs {
    pub body: Input<String>,
    pub name: Input<String>,
    pub project_id: Input<String>,
    pub slug: Input<String>,
    /// Defaults to false
    pub verify_jwt: Option<Input<bool>>,
}

impl FunctionArgs {
    pub fn new(
        body: impl Into<Input<String>>,
        name: impl Into<Input<String>>,
        project_id: impl Into<Input<String>>,
        slug: impl Into<Input<String>>,
    ) -> Self {
        Self {
            body: body.into(),
            name: name.into(),
            project_id: project_id.into(),
            slug: slug.into(),
            verify_jwt: None,
        }
    }

    pub fn verify_jwt(mut self, verify_jwt: impl Into<Input<bool>>) -> Self {
        self.verify_jwt = Some(verify_jwt.into());
        self
    }

    fn into_inputs(self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.set("body", Some(self.body));
        inputs.set("name", Some(self.name));
        inputs.set("projectId", Some(self.project_id));
        inputs.set("slug", Some(self.slug));
        inputs.set("verify_jwt", self.verify_jwt);
        inputs
    }
}

/// Properties that qualify the lookup of an existing Function
#[derive(Debug, Clone, Default)]
pub struct FunctionState {
    pub created_at: Option<Input<String>>,
    pub name: Option<Input<String>>,
    pub slug: Option<Input<String>>,
    pub status: Option<Input<FunctionStatus>>,
    pub updated_at: Option<Input<String>>,
    pub verify_jwt: Option<Input<bool>>,
    pub version: Option<Input<i64>>,
}

impl FunctionState {
    fn into_inputs(self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.set("created_at", self.created_at);
        inputs.set("name", self.name);
        inputs.set("slug", self.slug);
        inputs.set("status", self.status);
        inputs.set("updatedAt", self.updated_at);
        inputs.set("verify_jwt", self.verify_jwt);
        inputs.set("version", self.version);
        inputs
    }
}

/// Declares a Function from an argument bundle or from individual fields
#[derive(Debug)]
pub struct FunctionBuilder {
    resource_name: String,
    args: Option<FunctionArgs>,
    body: Option<Input<String>>,
    name: Option<Input<String>>,
    project_id: Option<Input<String>>,
    slug: Option<Input<String>>,
    verify_jwt: Option<Input<bool>>,
    state: Option<FunctionState>,
    opts: ResourceOptions,
}

impl FunctionBuilder {
    pub fn new(resource_name: &str) -> Self {
        Self {
            resource_name: resource_name.to_string(),
            args: None,
            body: None,
            name: None,
            project_id: None,
            slug: None,
            verify_jwt: None,
            state: None,
            opts: ResourceOptions::default(),
        }
    }

    pub fn args(mut self, args: FunctionArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn body(mut self, body: impl Into<Input<String>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn name(mut self, name: impl Into<Input<String>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn project_id(mut self, project_id: impl Into<Input<String>>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<Input<String>>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn verify_jwt(mut self, verify_jwt: impl Into<Input<bool>>) -> Self {
        self.verify_jwt = Some(verify_jwt.into());
        self
    }

    /// Lookup qualifiers, only valid together with an id in the options
    pub fn state(mut self, state: FunctionState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn opts(mut self, opts: ResourceOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn register(self, ctx: &Context) -> Result<Function> {
        let mut fields = InputMap::new();
        fields.set("body", self.body);
        fields.set("name", self.name);
        fields.set("projectId", self.project_id);
        fields.set("slug", self.slug);
        fields.set("verify_jwt", self.verify_jwt);
        let inputs = pick_inputs(self.args.map(FunctionArgs::into_inputs), fields)?;

        let (state, mut outputs) = ResourceOutputs::new();
        let function = Function {
            state,
            created_at: outputs.output("created_at"),
            name: outputs.output("name"),
            slug: outputs.output("slug"),
            status: outputs.output("status"),
            updated_at: outputs.output("updatedAt"),
            verify_jwt: outputs.output("verify_jwt"),
            version: outputs.output("version"),
        };

        declare(
            ctx,
            function_schema(),
            &self.resource_name,
            inputs,
            self.state.map(FunctionState::into_inputs),
            self.opts,
            outputs,
        )?;

        Ok(function)
    }
}

/// A declared edge function
#[derive(Debug, Clone)]
pub struct Function {
    state: ResourceState,
    created_at: Output<String>,
    name: Output<String>,
    slug: Output<String>,
    status: Output<FunctionStatus>,
    updated_at: Output<String>,
    verify_jwt: Output<bool>,
    version: Output<i64>,
}

impl Function {
    /// Declare a new Function
    pub fn new(
        ctx: &Context,
        name: &str,
        args: FunctionArgs,
        opts: ResourceOptions,
    ) -> Result<Function> {
        FunctionBuilder::new(name).args(args).opts(opts).register(ctx)
    }

    pub fn builder(name: &str) -> FunctionBuilder {
        FunctionBuilder::new(name)
    }

    /// Get an existing Function by its provider id
    pub fn get(
        ctx: &Context,
        name: &str,
        id: impl Into<String>,
        state: Option<FunctionState>,
        opts: ResourceOptions,
    ) -> Result<Function> {
        let builder = FunctionBuilder::new(name).opts(opts.merge(ResourceOptions::new().id(id)));
        builder.state(state.unwrap_or_default()).register(ctx)
    }

    /// Rehydrate a function that already exists in the stack
    pub fn from_urn(ctx: &Context, name: &str, urn: &str) -> Result<Function> {
        FunctionBuilder::new(name)
            .opts(ResourceOptions::new().urn(urn))
            .register(ctx)
    }

    pub fn id(&self) -> &Output<String> {
        self.state.id()
    }

    /// Function creation date
    pub fn created_at(&self) -> &Output<String> {
        &self.created_at
    }

    pub fn name(&self) -> &Output<String> {
        &self.name
    }

    pub fn slug(&self) -> &Output<String> {
        &self.slug
    }

    pub fn status(&self) -> &Output<FunctionStatus> {
        &self.status
    }

    /// Function updated date
    pub fn updated_at(&self) -> &Output<String> {
        &self.updated_at
    }

    pub fn verify_jwt(&self) -> &Output<bool> {
        &self.verify_jwt
    }

    /// Incremented by the provider on every deployment
    pub fn version(&self) -> &Output<i64> {
        &self.version
    }
}

impl Resource for Function {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn schema_wire_names() {
        let schema = function_schema();
        assert_eq!(schema.type_token, FUNCTION_TYPE);
        assert_eq!(schema.attribute("project_id").unwrap().wire_name, "projectId");
        assert_eq!(schema.attribute("updated_at").unwrap().wire_name, "updatedAt");
        assert_eq!(schema.attribute("created_at").unwrap().wire_name, "created_at");
        assert_eq!(schema.attribute("verify_jwt").unwrap().wire_name, "verify_jwt");

        let inputs: Vec<_> = schema.inputs().map(|a| a.name.as_str()).collect();
        assert_eq!(inputs, ["body", "name", "project_id", "slug", "verify_jwt"]);

        let required: Vec<_> = schema
            .attributes
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(required, ["body", "name", "project_id", "slug"]);
    }

    #[test]
    fn body_is_the_only_secret() {
        let secrets: Vec<_> = function_schema()
            .attributes
            .iter()
            .filter(|a| a.secret)
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(secrets, ["body"]);
    }

    #[test]
    fn args_map_to_wire_names() {
        let inputs = FunctionArgs::new("code", "hello", "proj", "hello-slug")
            .verify_jwt(true)
            .into_inputs();
        let keys: Vec<_> = inputs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["body", "name", "projectId", "slug", "verify_jwt"]);

        let inputs = FunctionArgs::new("code", "hello", "proj", "hello-slug").into_inputs();
        assert!(!inputs.contains("verify_jwt"));
    }
}
