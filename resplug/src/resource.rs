//! Resource handles and the resolvers behind them
//!
//! Every declared resource carries a `ResourceState` (its URN and provider id)
//! plus typed outputs for its properties. `ResourceOutputs` owns the matching
//! resolvers until the monitor answers the declaration.

use crate::error::{ResplugError, Result};
use crate::output::{DynamicResolver, Output, OutputResolver};
use crate::types::{PropertyMap, UNKNOWN_VALUE};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Identity shared by all declared resources
#[derive(Debug, Clone)]
pub struct ResourceState {
    urn: Output<String>,
    id: Output<String>,
}

impl ResourceState {
    pub fn urn(&self) -> &Output<String> {
        &self.urn
    }

    /// Provider-assigned id; never known for component resources
    pub fn id(&self) -> &Output<String> {
        &self.id
    }

    /// Reference used to pass this resource as an explicit provider
    pub fn provider_reference(&self) -> ProviderReference {
        ProviderReference {
            urn: self.urn.clone(),
            id: self.id.clone(),
        }
    }
}

/// Every binding exposes its identity through this trait
pub trait Resource {
    fn state(&self) -> &ResourceState;

    fn urn(&self) -> &Output<String> {
        self.state().urn()
    }
}

/// Reference to a provider resource, rendered as `urn::id`
#[derive(Debug, Clone)]
pub struct ProviderReference {
    urn: Output<String>,
    id: Output<String>,
}

impl ProviderReference {
    pub fn new(urn: Output<String>, id: Output<String>) -> Self {
        Self { urn, id }
    }

    pub async fn resolve(&self) -> Result<String> {
        let urn = self
            .urn
            .value()
            .await?
            .ok_or_else(|| ResplugError::InvalidOptions("provider URN is unknown".to_string()))?;
        let id = self
            .id
            .value()
            .await?
            .unwrap_or_else(|| UNKNOWN_VALUE.to_string());
        Ok(format!("{}::{}", urn, id))
    }
}

/// Resolvers for a resource's identity and its output properties
pub struct ResourceOutputs {
    urn: OutputResolver<String>,
    id: OutputResolver<String>,
    properties: BTreeMap<String, Box<dyn DynamicResolver>>,
}

impl ResourceOutputs {
    pub fn new() -> (ResourceState, ResourceOutputs) {
        let (urn, urn_resolver) = Output::pending();
        let (id, id_resolver) = Output::pending();
        (
            ResourceState { urn, id },
            ResourceOutputs {
                urn: urn_resolver,
                id: id_resolver,
                properties: BTreeMap::new(),
            },
        )
    }

    /// Register a typed output for the given wire name
    pub fn output<T>(&mut self, wire_name: &str) -> Output<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let (output, resolver) = Output::pending();
        self.properties
            .insert(wire_name.to_string(), Box::new(resolver));
        output
    }

    /// Settle everything from the monitor's answer
    /// A custom resource without an id is still being previewed
    pub(crate) fn resolve(
        self,
        urn: &str,
        id: Option<&str>,
        custom: bool,
        properties: &PropertyMap,
        secret_outputs: &[String],
    ) {
        self.urn.resolve(Some(urn.to_string()), true, false);
        match id {
            Some(id) if !id.is_empty() => self.id.resolve(Some(id.to_string()), true, false),
            _ => self.id.resolve(None, !custom, false),
        }

        for (wire_name, resolver) in &self.properties {
            let force_secret = secret_outputs.iter().any(|s| s == wire_name);
            resolver.resolve_dynamic(properties.get(wire_name), force_secret);
        }
    }

    pub(crate) fn reject(self, message: &str) {
        self.urn.reject(message);
        self.id.reject(message);
        for resolver in self.properties.values() {
            resolver.reject_dynamic(message);
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::types::Dynamic;

    #[tokio::test]
    async fn resolves_identity_and_properties() {
        let (state, mut outputs) = ResourceOutputs::new();
        let name = outputs.output::<String>("name");
        let version = outputs.output::<i64>("version");
        let token = outputs.output::<String>("token");

        let mut props = PropertyMap::new();
        props.insert("name", "f1");
        props.insert("version", 1_i64);
        props.insert("token", "plain");

        outputs.resolve(
            "urn:pulumi:dev::app::test:index:Thing::t",
            Some("id-1"),
            true,
            &props,
            &["token".to_string()],
        );

        assert_eq!(state.id().value().await.unwrap().as_deref(), Some("id-1"));
        assert_eq!(name.value().await.unwrap().as_deref(), Some("f1"));
        assert_eq!(version.value().await.unwrap(), Some(1));
        assert!(token.is_secret().await.unwrap());
    }

    #[tokio::test]
    async fn missing_id_is_unknown_for_custom_resources() {
        let (state, outputs) = ResourceOutputs::new();
        outputs.resolve("urn:x", None, true, &PropertyMap::new(), &[]);
        assert!(!state.id().is_known().await.unwrap());

        let (state, outputs) = ResourceOutputs::new();
        outputs.resolve("urn:x", None, false, &PropertyMap::new(), &[]);
        assert!(state.id().is_known().await.unwrap());
        assert_eq!(state.id().value().await.unwrap(), None);
    }

    #[tokio::test]
    async fn reject_fails_every_output() {
        let (state, mut outputs) = ResourceOutputs::new();
        let status = outputs.output::<Dynamic>("status");
        outputs.reject("provider refused");

        assert!(state.urn().value().await.is_err());
        assert!(status.value().await.is_err());
    }

    #[tokio::test]
    async fn provider_reference_renders_urn_and_id() {
        let reference = ProviderReference::new(
            Output::known("urn:pulumi:dev::app::pulumi:providers:supabase::default".to_string()),
            Output::known("prov-1".to_string()),
        );
        assert_eq!(
            reference.resolve().await.unwrap(),
            "urn:pulumi:dev::app::pulumi:providers:supabase::default::prov-1"
        );
    }
}
