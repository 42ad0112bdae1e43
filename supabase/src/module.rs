//! Rehydration of resources by type token
//!
//! When the engine hands back a URN for a resource the program did not declare
//! itself (for example a resource reference in another resource's outputs),
//! the handle is rebuilt from its type token.

use crate::resources::function::FUNCTION_TYPE;
use crate::resources::organization::ORGANIZATION_TYPE;
use crate::resources::project::PROJECT_TYPE;
use crate::resources::secret::SECRET_TYPE;
use crate::resources::{Function, Organization, Project, Secret};
use resplug::{Context, Resource, ResourceState, ResplugError, Result};

/// Any resource this package can rehydrate
#[derive(Debug, Clone)]
pub enum SupabaseResource {
    Function(Function),
    Organization(Organization),
    Project(Project),
    Secret(Secret),
}

impl Resource for SupabaseResource {
    fn state(&self) -> &ResourceState {
        match self {
            SupabaseResource::Function(r) => r.state(),
            SupabaseResource::Organization(r) => r.state(),
            SupabaseResource::Project(r) => r.state(),
            SupabaseResource::Secret(r) => r.state(),
        }
    }
}

/// Type tokens `construct` accepts
pub fn resource_types() -> [&'static str; 4] {
    [FUNCTION_TYPE, ORGANIZATION_TYPE, PROJECT_TYPE, SECRET_TYPE]
}

pub fn construct(ctx: &Context, type_token: &str, name: &str, urn: &str) -> Result<SupabaseResource> {
    match type_token {
        FUNCTION_TYPE => Function::from_urn(ctx, name, urn).map(SupabaseResource::Function),
        ORGANIZATION_TYPE => {
            Organization::from_urn(ctx, name, urn).map(SupabaseResource::Organization)
        }
        PROJECT_TYPE => Project::from_urn(ctx, name, urn).map(SupabaseResource::Project),
        SECRET_TYPE => Secret::from_urn(ctx, name, urn).map(SupabaseResource::Secret),
        _ => Err(ResplugError::Custom(format!(
            "unknown resource type: {}",
            type_token
        ))),
    }
}
