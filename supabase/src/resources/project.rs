//! Project component
//!
//! Projects are remote components: the provider builds them, so the program
//! only sees the outputs it reports back. Besides the management API fields,
//! the provider reports the connection details of the project's database.

use super::declare;
use crate::enums::{Plan, Region};
use resplug::{
    AttributeBuilder, Context, Input, InputMap, Output, Resource, ResourceOptions,
    ResourceOutputs, ResourceSchema, ResourceState, Result, SchemaBuilder,
};
use std::sync::OnceLock;

pub const PROJECT_TYPE: &str = "supabase:organization:Project";

pub fn project_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let regions = Region::values();
        SchemaBuilder::new(PROJECT_TYPE)
            .description("Supabase project")
            .remote_component()
            .attribute(
                AttributeBuilder::string("db_pass")
                    .description("Password of the project database")
                    .required()
                    .secret()
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("kps_enabled")
                    .description("Enable KPS")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("Name of the project")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("organization_id")
                    .description("Organization ID of the project")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::enumeration("plan", Plan::values())
                    .description("Plan of the project")
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::enumeration("region", &regions)
                    .description("Region of the project")
                    .required()
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("created_at")
                    .description("Project creation date")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("id")
                    .description("ID of the project")
                    .output()
                    .build(),
            )
            .attribute(AttributeBuilder::string("db_host").wire_name("dbHost").output().build())
            .attribute(AttributeBuilder::integer("db_port").wire_name("dbPort").output().build())
            .attribute(AttributeBuilder::string("db_name").wire_name("dbName").output().build())
            .attribute(
                AttributeBuilder::string("db_username")
                    .wire_name("dbUsername")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::integer("db_pooling_port")
                    .wire_name("dbPoolingPort")
                    .output()
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("endpoint")
                    .description("API endpoint of the project")
                    .output()
                    .build(),
            )
            .build()
    })
}

#[derive(Debug, Clone)]
pub struct ProjectArgs {
    pub db_pass: Input<String>,
    pub kps_enabled: Input<bool>,
    pub name: Input<String>,
    pub organization_id: Input<String>,
    pub plan: Input<Plan>,
    pub region: Input<Region>,
}

impl ProjectArgs {
    pub fn new(
        db_pass: impl Into<Input<String>>,
        name: impl Into<Input<String>>,
        organization_id: impl Into<Input<String>>,
        region: Region,
    ) -> Self {
        Self {
            db_pass: db_pass.into(),
            kps_enabled: Input::Value(false),
            name: name.into(),
            organization_id: organization_id.into(),
            plan: Input::Value(Plan::Free),
            region: Input::Value(region),
        }
    }

    pub fn kps_enabled(mut self, kps_enabled: impl Into<Input<bool>>) -> Self {
        self.kps_enabled = kps_enabled.into();
        self
    }

    pub fn plan(mut self, plan: Plan) -> Self {
        self.plan = Input::Value(plan);
        self
    }

    fn into_inputs(self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.set("db_pass", Some(self.db_pass));
        inputs.set("kps_enabled", Some(self.kps_enabled));
        inputs.set("name", Some(self.name));
        inputs.set("organization_id", Some(self.organization_id));
        inputs.set("plan", Some(self.plan));
        inputs.set("region", Some(self.region));
        inputs
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    state: ResourceState,
    created_at: Output<String>,
    project_id: Output<String>,
    name: Output<String>,
    organization_id: Output<String>,
    region: Output<Region>,
    db_host: Output<String>,
    db_port: Output<i64>,
    db_name: Output<String>,
    db_username: Output<String>,
    db_pooling_port: Output<i64>,
    endpoint: Output<String>,
}

impl Project {
    pub fn new(ctx: &Context, name: &str, args: ProjectArgs, opts: ResourceOptions) -> Result<Project> {
        Self::declare(ctx, name, args.into_inputs(), opts)
    }

    /// Rehydrate a project that already exists in the stack
    pub fn from_urn(ctx: &Context, name: &str, urn: &str) -> Result<Project> {
        Self::declare(ctx, name, InputMap::new(), ResourceOptions::new().urn(urn))
    }

    fn declare(
        ctx: &Context,
        name: &str,
        inputs: InputMap,
        opts: ResourceOptions,
    ) -> Result<Project> {
        let (state, mut outputs) = ResourceOutputs::new();
        let project = Project {
            state,
            created_at: outputs.output("created_at"),
            project_id: outputs.output("id"),
            name: outputs.output("name"),
            organization_id: outputs.output("organization_id"),
            region: outputs.output("region"),
            db_host: outputs.output("dbHost"),
            db_port: outputs.output("dbPort"),
            db_name: outputs.output("dbName"),
            db_username: outputs.output("dbUsername"),
            db_pooling_port: outputs.output("dbPoolingPort"),
            endpoint: outputs.output("endpoint"),
        };
        declare(ctx, project_schema(), name, inputs, None, opts, outputs)?;
        Ok(project)
    }

    pub fn created_at(&self) -> &Output<String> {
        &self.created_at
    }

    /// Project reference assigned by Supabase
    pub fn project_id(&self) -> &Output<String> {
        &self.project_id
    }

    pub fn name(&self) -> &Output<String> {
        &self.name
    }

    pub fn organization_id(&self) -> &Output<String> {
        &self.organization_id
    }

    pub fn region(&self) -> &Output<Region> {
        &self.region
    }

    pub fn db_host(&self) -> &Output<String> {
        &self.db_host
    }

    pub fn db_port(&self) -> &Output<i64> {
        &self.db_port
    }

    pub fn db_name(&self) -> &Output<String> {
        &self.db_name
    }

    pub fn db_username(&self) -> &Output<String> {
        &self.db_username
    }

    pub fn db_pooling_port(&self) -> &Output<i64> {
        &self.db_pooling_port
    }

    pub fn endpoint(&self) -> &Output<String> {
        &self.endpoint
    }
}

impl Resource for Project {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}
