//! Shared mocks for the binding tests

#![allow(dead_code)]

use async_trait::async_trait;
use resplug::mock::{MockCallArgs, MockMonitor, MockResourceArgs, Mocks};
use resplug::{Context, PropertyMap, Result};
use std::sync::Arc;

pub const PROJECT: &str = "edge";
pub const STACK: &str = "dev";

/// Behaves like the Supabase provider: echoes inputs and fills computed outputs
pub struct SupabaseMocks;

#[async_trait]
impl Mocks for SupabaseMocks {
    async fn new_resource(&self, args: MockResourceArgs) -> Result<(Option<String>, PropertyMap)> {
        let mut state = args.inputs;

        match args.type_token.as_str() {
            "supabase:index:Function" => {
                if args.id.is_some() {
                    state.insert("name", "existing");
                    state.insert("slug", "existing-slug");
                    state.insert("verify_jwt", true);
                }
                state.insert("status", "ACTIVE");
                state.insert("version", 1_i64);
                state.insert("created_at", "2024-05-01T10:00:00Z");
                state.insert("updatedAt", "2024-05-01T10:00:00Z");
            }
            "supabase:organization:Project" => {
                let reference = "abcdefghijklmnop";
                state.insert("id", reference);
                state.insert("created_at", "2024-05-01T10:00:00Z");
                state.insert("dbHost", format!("db.{}.supabase.co", reference));
                state.insert("dbPort", 5432_i64);
                state.insert("dbName", "postgres");
                state.insert("dbUsername", "postgres");
                state.insert("dbPoolingPort", 6543_i64);
                state.insert("endpoint", format!("https://{}.supabase.co", reference));
            }
            _ => {}
        }

        let id = args
            .id
            .or_else(|| args.custom.then(|| format!("{}-id", args.name)));
        Ok((id, state))
    }

    async fn call(&self, args: MockCallArgs) -> Result<PropertyMap> {
        let mut result = PropertyMap::new();
        if args.token == "supabase:index:GetTypeScript" {
            let schemas = args.args.get_string("includedSchemas")?;
            let project = args.args.get_string("projectId")?;
            result.insert(
                "types",
                format!("// project {} schemas [{}]\nexport type Json = string", project, schemas),
            );
        }
        Ok(result)
    }
}

pub fn monitor() -> Arc<MockMonitor<SupabaseMocks>> {
    Arc::new(MockMonitor::new(PROJECT, STACK, SupabaseMocks))
}

pub fn context(monitor: &Arc<MockMonitor<SupabaseMocks>>) -> Context {
    Context::new(PROJECT, STACK, monitor.clone())
}
