//! Explicit provider instances
//!
//! Declaring a Provider lets a program talk to a different server or use a
//! different token than the default provider. Resources opt in through
//! `ResourceOptions::provider(provider.reference())`.

use crate::config::{ProviderConfig, DEFAULT_SERVER, SERVER_ENV, TOKEN_ENV};
use crate::utilities::resource_default_opts;
use resplug::defaults::PropertyDefault;
use resplug::{
    AttributeBuilder, Context, Input, InputMap, ProviderReference, Resource, ResourceOptions,
    ResourceOutputs, ResourceSchema, ResourceState, ResplugError, Result, SchemaBuilder,
};
use std::sync::OnceLock;
use tracing::debug;

pub const PROVIDER_TYPE: &str = "pulumi:providers:supabase";

pub fn provider_schema() -> &'static ResourceSchema {
    static SCHEMA: OnceLock<ResourceSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        SchemaBuilder::new(PROVIDER_TYPE)
            .description("Supabase management API provider")
            .attribute(
                AttributeBuilder::string("server")
                    .description("Management API server")
                    .optional()
                    .default(PropertyDefault::env_or(SERVER_ENV, DEFAULT_SERVER))
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("token")
                    .description("Management API access token")
                    .optional()
                    .secret()
                    .default(PropertyDefault::env(TOKEN_ENV))
                    .build(),
            )
            .build()
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProviderArgs {
    pub server: Option<Input<String>>,
    pub token: Option<Input<String>>,
}

impl ProviderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(mut self, server: impl Into<Input<String>>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn token(mut self, token: impl Into<Input<String>>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Configuration as far as it is known before any output resolves
    fn plain_config(&self) -> Option<ProviderConfig> {
        let plain = |input: &Option<Input<String>>| match input {
            None => Some(None),
            Some(Input::Value(value)) => Some(Some(value.clone())),
            Some(Input::Output(_)) => None,
        };
        Some(ProviderConfig {
            server: plain(&self.server)?,
            token: plain(&self.token)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Provider {
    state: ResourceState,
}

impl Provider {
    /// Declare a provider instance
    /// Plainly supplied configuration is checked before registering
    pub fn new(ctx: &Context, name: &str, args: ProviderArgs, opts: ResourceOptions) -> Result<Provider> {
        if let Some(config) = args.plain_config() {
            let failures = config.check();
            if !failures.is_empty() {
                let reasons = failures
                    .iter()
                    .map(|f| format!("{}: {}", f.property, f.reason))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(ResplugError::Custom(format!(
                    "invalid supabase provider configuration: {}",
                    reasons
                )));
            }
        }

        let mut inputs = InputMap::new();
        inputs.set("server", args.server);
        inputs.set("token", args.token);

        debug!(name = %name, "declaring supabase provider");

        let (state, outputs) = ResourceOutputs::new();
        ctx.register_resource(
            provider_schema(),
            name,
            inputs,
            resource_default_opts(opts),
            outputs,
        )?;
        Ok(Provider { state })
    }

    /// Reference to pass as a resource's explicit provider
    pub fn reference(&self) -> ProviderReference {
        self.state.provider_reference()
    }
}

impl Resource for Provider {
    fn state(&self) -> &ResourceState {
        &self.state
    }
}
