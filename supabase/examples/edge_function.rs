//! Declares a project with an edge function and a secret against the mock monitor

use async_trait::async_trait;
use resplug::mock::{EchoMocks, MockCallArgs, MockMonitor, MockResourceArgs, Mocks};
use resplug::{Context, PropertyMap, ResourceOptions};
use std::sync::Arc;
use supabase::{Function, FunctionArgs, Project, ProjectArgs, Region, Secret, SecretArgs};
use tracing::info;

/// Echoes inputs and hands projects a reference id the way the platform does
struct DemoMocks;

#[async_trait]
impl Mocks for DemoMocks {
    async fn new_resource(
        &self,
        args: MockResourceArgs,
    ) -> resplug::Result<(Option<String>, PropertyMap)> {
        let is_project = args.type_token == supabase::resources::project::PROJECT_TYPE;
        let (id, mut state) = EchoMocks.new_resource(args).await?;
        if is_project {
            state.insert("id", "abcdefghijklmnop");
        }
        Ok((id, state))
    }

    async fn call(&self, args: MockCallArgs) -> resplug::Result<PropertyMap> {
        EchoMocks.call(args).await
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let monitor = Arc::new(MockMonitor::new("edge-demo", "dev", DemoMocks));
    let ctx = Context::new("edge-demo", "dev", monitor.clone());

    let project = Project::new(
        &ctx,
        "main",
        ProjectArgs::new("change-me", "edge-demo", "org-1", Region::EuWest1),
        ResourceOptions::new(),
    )?;

    let function = Function::new(
        &ctx,
        "hello",
        FunctionArgs::new(
            "Deno.serve(() => new Response('hello'))",
            "hello",
            project.project_id(),
            "hello",
        ),
        ResourceOptions::new(),
    )?;

    Secret::new(
        &ctx,
        "greeting",
        SecretArgs::new("GREETING", "hi there", project.project_id()),
        ResourceOptions::new(),
    )?;

    ctx.export("function_id", function.id())?;
    ctx.wait().await?;

    info!(
        verify_jwt = ?function.verify_jwt().value().await?,
        registrations = monitor.registrations().len(),
        "declared edge function"
    );
    info!(exports = %ctx.exports().await?, "stack outputs");

    Ok(())
}
