//! In-process resource monitor for tests
//!
//! `MockMonitor` answers declarations without a deployment engine. What a
//! resource "becomes" is decided by a `Mocks` implementation; `EchoMocks`
//! hands every input straight back with a fresh id.

use crate::error::{ResplugError, Result};
use crate::monitor::{
    InvokeRequest, InvokeResponse, ReadResourceRequest, ReadResourceResponse,
    RegisterResourceRequest, RegisterResourceResponse, ResourceMonitor,
};
use crate::token::Urn;
use crate::types::PropertyMap;
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::debug;

/// Arguments describing a resource the mock is asked to create or read
#[derive(Debug, Clone)]
pub struct MockResourceArgs {
    pub type_token: String,
    pub name: String,
    pub inputs: PropertyMap,
    pub provider: Option<String>,
    /// Set when reading an existing resource
    pub id: Option<String>,
    pub custom: bool,
}

#[derive(Debug, Clone)]
pub struct MockCallArgs {
    pub token: String,
    pub args: PropertyMap,
    pub provider: Option<String>,
}

/// Mocks decide the id and state of resources and the result of calls
#[async_trait]
pub trait Mocks: Send + Sync {
    async fn new_resource(&self, args: MockResourceArgs) -> Result<(Option<String>, PropertyMap)>;

    async fn call(&self, args: MockCallArgs) -> Result<PropertyMap>;
}

/// Echoes inputs back as state and call arguments back as results
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoMocks;

#[async_trait]
impl Mocks for EchoMocks {
    async fn new_resource(&self, args: MockResourceArgs) -> Result<(Option<String>, PropertyMap)> {
        let id = match args.id {
            Some(id) => Some(id),
            None if args.custom => Some(uuid::Uuid::new_v4().to_string()),
            None => None,
        };
        Ok((id, args.inputs))
    }

    async fn call(&self, args: MockCallArgs) -> Result<PropertyMap> {
        Ok(args.args)
    }
}

/// MockMonitor records every request it receives
pub struct MockMonitor<M> {
    project: String,
    stack: String,
    mocks: M,
    preview: bool,
    secrets: bool,
    registrations: Mutex<Vec<RegisterResourceRequest>>,
    reads: Mutex<Vec<ReadResourceRequest>>,
    invocations: Mutex<Vec<InvokeRequest>>,
}

impl<M: Mocks> MockMonitor<M> {
    pub fn new(project: &str, stack: &str, mocks: M) -> Self {
        Self {
            project: project.to_string(),
            stack: stack.to_string(),
            mocks,
            preview: false,
            secrets: true,
            registrations: Mutex::new(Vec::new()),
            reads: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Answer registrations the way a preview does: custom resources get no id
    pub fn preview(mut self) -> Self {
        self.preview = true;
        self
    }

    /// Behave like an engine that cannot carry secrets
    pub fn without_secrets(mut self) -> Self {
        self.secrets = false;
        self
    }

    pub fn registrations(&self) -> Vec<RegisterResourceRequest> {
        snapshot(&self.registrations)
    }

    pub fn reads(&self) -> Vec<ReadResourceRequest> {
        snapshot(&self.reads)
    }

    pub fn invocations(&self) -> Vec<InvokeRequest> {
        snapshot(&self.invocations)
    }

    fn urn(&self, parent: Option<&str>, type_token: &str, name: &str) -> Result<Urn> {
        let parent = parent.map(Urn::parse).transpose()?;
        Urn::new(&self.stack, &self.project, parent.as_ref(), type_token, name)
    }
}

/// Properties as a real monitor would see them after the msgpack hop
fn over_the_wire(props: &PropertyMap) -> Result<PropertyMap> {
    PropertyMap::decode_msgpack(&props.encode_msgpack()?)
}

fn snapshot<T: Clone>(records: &Mutex<Vec<T>>) -> Vec<T> {
    records.lock().map(|r| r.clone()).unwrap_or_default()
}

fn record<T>(records: &Mutex<Vec<T>>, request: T) -> Result<()> {
    records
        .lock()
        .map_err(|_| ResplugError::Custom("mock monitor lock poisoned".to_string()))?
        .push(request);
    Ok(())
}

#[async_trait]
impl<M: Mocks> ResourceMonitor for MockMonitor<M> {
    async fn register_resource(
        &self,
        request: RegisterResourceRequest,
    ) -> Result<RegisterResourceResponse> {
        let urn = self.urn(request.parent.as_deref(), &request.type_token, &request.name)?;
        debug!(urn = %urn, "mock registering resource");

        let (id, object) = self
            .mocks
            .new_resource(MockResourceArgs {
                type_token: request.type_token.clone(),
                name: request.name.clone(),
                inputs: over_the_wire(&request.object)?,
                provider: request.provider.clone(),
                id: None,
                custom: request.custom,
            })
            .await?;

        let id = if self.preview && request.custom {
            None
        } else {
            id
        };

        record(&self.registrations, request)?;
        Ok(RegisterResourceResponse {
            urn: urn.to_string(),
            id,
            object: over_the_wire(&object)?,
        })
    }

    async fn read_resource(&self, request: ReadResourceRequest) -> Result<ReadResourceResponse> {
        let urn = self.urn(request.parent.as_deref(), &request.type_token, &request.name)?;
        debug!(urn = %urn, id = %request.id, "mock reading resource");

        let (_, properties) = self
            .mocks
            .new_resource(MockResourceArgs {
                type_token: request.type_token.clone(),
                name: request.name.clone(),
                inputs: over_the_wire(&request.properties)?,
                provider: request.provider.clone(),
                id: Some(request.id.clone()),
                custom: true,
            })
            .await?;

        record(&self.reads, request)?;
        Ok(ReadResourceResponse {
            urn: urn.to_string(),
            properties: over_the_wire(&properties)?,
        })
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse> {
        debug!(token = %request.token, "mock invoking function");

        let result = self
            .mocks
            .call(MockCallArgs {
                token: request.token.clone(),
                args: over_the_wire(&request.args)?,
                provider: request.provider.clone(),
            })
            .await?;

        record(&self.invocations, request)?;
        Ok(InvokeResponse {
            result: over_the_wire(&result)?,
            failures: Vec::new(),
        })
    }

    fn supports_secrets(&self) -> bool {
        self.secrets
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn register(type_token: &str, name: &str, parent: Option<&str>) -> RegisterResourceRequest {
        let mut object = PropertyMap::new();
        object.insert("name", name);
        RegisterResourceRequest {
            type_token: type_token.to_string(),
            name: name.to_string(),
            custom: true,
            remote: false,
            object,
            parent: parent.map(str::to_string),
            provider: None,
            dependencies: Vec::new(),
            protect: false,
            ignore_changes: Vec::new(),
            additional_secret_outputs: Vec::new(),
            delete_before_replace: false,
            retain_on_delete: false,
            alias_urn: None,
            version: None,
            plugin_download_url: None,
        }
    }

    #[tokio::test]
    async fn echo_mocks_assign_ids_and_echo_state() {
        let monitor = MockMonitor::new("app", "dev", EchoMocks);
        let response = monitor
            .register_resource(register("test:index:Thing", "t", None))
            .await
            .unwrap();

        assert_eq!(response.urn, "urn:pulumi:dev::app::test:index:Thing::t");
        assert!(uuid::Uuid::parse_str(response.id.as_deref().unwrap()).is_ok());
        assert_eq!(response.object.get_string("name").unwrap(), "t");
        assert_eq!(monitor.registrations().len(), 1);
    }

    #[tokio::test]
    async fn child_urns_carry_parent_type() {
        let monitor = MockMonitor::new("app", "dev", EchoMocks);
        let parent = "urn:pulumi:dev::app::test:index:Parent::p";
        let response = monitor
            .register_resource(register("test:index:Thing", "c", Some(parent)))
            .await
            .unwrap();

        assert_eq!(
            response.urn,
            "urn:pulumi:dev::app::test:index:Parent$test:index:Thing::c"
        );
    }

    #[tokio::test]
    async fn preview_withholds_ids() {
        let monitor = MockMonitor::new("app", "dev", EchoMocks).preview();
        let response = monitor
            .register_resource(register("test:index:Thing", "t", None))
            .await
            .unwrap();
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn invoke_echoes_arguments() {
        let monitor = MockMonitor::new("app", "dev", EchoMocks);
        let mut args = PropertyMap::new();
        args.insert("projectId", "p1");

        let response = monitor
            .invoke(InvokeRequest {
                token: "test:index:fn".to_string(),
                args,
                provider: None,
                version: None,
                plugin_download_url: None,
            })
            .await
            .unwrap();

        assert_eq!(response.result.get_string("projectId").unwrap(), "p1");
        assert_eq!(monitor.invocations().len(), 1);
    }
}
