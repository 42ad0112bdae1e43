//! supabase - resource bindings for the Supabase management API
//!
//! Bindings declare Supabase resources (edge functions, organizations,
//! projects and secrets) against a resource monitor. The provider plugin does
//! the actual work; these types only describe the desired state and expose
//! what the provider reports back.

pub mod config;
pub mod enums;
pub mod functions;
pub mod module;
pub mod provider;
pub mod resources;
pub mod utilities;

pub use config::{ConfigError, ProviderConfig};
pub use enums::{FunctionStatus, Plan, Region};
pub use functions::{get_type_script, get_type_script_output, GetTypeScriptArgs, GetTypeScriptResult};
pub use provider::{Provider, ProviderArgs};
pub use resources::{
    Function, FunctionArgs, FunctionBuilder, FunctionState, Organization, OrganizationArgs,
    Project, ProjectArgs, Secret, SecretArgs,
};
