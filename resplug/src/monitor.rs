//! Resource monitor contract
//!
//! The monitor is the external runtime that reconciles declared resources
//! against the real system. Bindings never talk to it directly; the
//! `Context` forwards declarations as the requests below.

use crate::error::Result;
use crate::types::{CheckFailure, PropertyMap};
use async_trait::async_trait;

/// Request to declare a resource's desired state
#[derive(Debug, Clone)]
pub struct RegisterResourceRequest {
    pub type_token: String,
    pub name: String,
    pub custom: bool,
    pub remote: bool,
    pub object: PropertyMap,
    pub parent: Option<String>,
    pub provider: Option<String>,
    pub dependencies: Vec<String>,
    pub protect: bool,
    pub ignore_changes: Vec<String>,
    pub additional_secret_outputs: Vec<String>,
    pub delete_before_replace: bool,
    pub retain_on_delete: bool,
    /// URN of an existing resource being adopted
    pub alias_urn: Option<String>,
    pub version: Option<String>,
    pub plugin_download_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterResourceResponse {
    pub urn: String,
    /// Empty while previewing a resource that does not exist yet
    pub id: Option<String>,
    pub object: PropertyMap,
}

/// Request to read an existing resource by its provider id
#[derive(Debug, Clone)]
pub struct ReadResourceRequest {
    pub type_token: String,
    pub name: String,
    pub id: String,
    /// Extra properties that qualify the lookup
    pub properties: PropertyMap,
    pub parent: Option<String>,
    pub provider: Option<String>,
    pub dependencies: Vec<String>,
    pub additional_secret_outputs: Vec<String>,
    pub version: Option<String>,
    pub plugin_download_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReadResourceResponse {
    pub urn: String,
    pub properties: PropertyMap,
}

/// Request to call a provider function
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    pub token: String,
    pub args: PropertyMap,
    pub provider: Option<String>,
    pub version: Option<String>,
    pub plugin_download_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvokeResponse {
    pub result: PropertyMap,
    pub failures: Vec<CheckFailure>,
}

/// ResourceMonitor is implemented by the runtime hosting the program
#[async_trait]
pub trait ResourceMonitor: Send + Sync {
    async fn register_resource(
        &self,
        request: RegisterResourceRequest,
    ) -> Result<RegisterResourceResponse>;

    async fn read_resource(&self, request: ReadResourceRequest) -> Result<ReadResourceResponse>;

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse>;

    /// Monitors that cannot carry secrets get plaintext values instead
    fn supports_secrets(&self) -> bool {
        true
    }
}
