//! Tests for declaring resources through a Context

#![allow(clippy::disallowed_methods)] // Allow unwrap() in tests for clarity

use async_trait::async_trait;
use resplug::defaults::PropertyDefault;
use resplug::mock::{EchoMocks, MockCallArgs, MockMonitor, MockResourceArgs, Mocks};
use resplug::monitor::{
    InvokeRequest, InvokeResponse, ReadResourceRequest, ReadResourceResponse,
    RegisterResourceRequest, RegisterResourceResponse, ResourceMonitor,
};
use resplug::{
    AttributeBuilder, CheckFailure, Context, Input, InputMap, InvokeOptions, Output,
    PropertyMap, ResourceOptions, ResourceOutputs, ResourceSchema, ResplugError, Result,
    SchemaBuilder,
};
use serde::Deserialize;
use std::sync::Arc;

fn widget_schema() -> ResourceSchema {
    SchemaBuilder::new("test:index:Widget")
        .attribute(
            AttributeBuilder::string("secret_key")
                .wire_name("secretKey")
                .required()
                .secret()
                .build(),
        )
        .attribute(AttributeBuilder::string("label").required().output().build())
        .attribute(
            AttributeBuilder::bool("enabled")
                .optional()
                .output()
                .default(PropertyDefault::bool(false))
                .build(),
        )
        .attribute(AttributeBuilder::integer("revision").output().build())
        .build()
}

fn widget_inputs(label: impl Into<Input<String>>) -> InputMap {
    let mut inputs = InputMap::new();
    inputs.set("secretKey", Some(Input::from("hunter2")));
    inputs.set("label", Some(label.into()));
    inputs
}

struct RevisionMocks;

#[async_trait]
impl Mocks for RevisionMocks {
    async fn new_resource(&self, args: MockResourceArgs) -> Result<(Option<String>, PropertyMap)> {
        let mut state = args.inputs;
        state.insert("revision", 7_i64);
        Ok((Some(format!("{}-id", args.name)), state))
    }

    async fn call(&self, args: MockCallArgs) -> Result<PropertyMap> {
        let mut result = PropertyMap::new();
        result.insert("token", args.token);
        Ok(result)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Lookup {
    token: String,
}

struct FailingMonitor;

#[async_trait]
impl ResourceMonitor for FailingMonitor {
    async fn register_resource(
        &self,
        request: RegisterResourceRequest,
    ) -> Result<RegisterResourceResponse> {
        Err(ResplugError::Custom(format!(
            "provider rejected {}",
            request.name
        )))
    }

    async fn read_resource(&self, request: ReadResourceRequest) -> Result<ReadResourceResponse> {
        Err(ResplugError::Custom(format!("no resource with id {}", request.id)))
    }

    async fn invoke(&self, _request: InvokeRequest) -> Result<InvokeResponse> {
        Ok(InvokeResponse {
            result: PropertyMap::new(),
            failures: vec![CheckFailure::new("projectId", "project not found")],
        })
    }
}

#[tokio::test]
async fn registration_applies_defaults_and_secrets() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", RevisionMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let (state, mut outputs) = ResourceOutputs::new();
    let enabled = outputs.output::<bool>("enabled");
    let revision = outputs.output::<i64>("revision");

    ctx.register_resource(
        &widget_schema(),
        "w1",
        widget_inputs("first"),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();
    tokio_test::assert_ok!(ctx.wait().await);

    let registered = monitor.registrations();
    assert_eq!(registered.len(), 1);
    let object = &registered[0].object;
    assert!(object.get("secretKey").unwrap().is_secret());
    assert!(!object.get_bool("enabled").unwrap());
    assert!(!format!("{:?}", object).contains("hunter2"));
    assert!(registered[0].additional_secret_outputs.is_empty());

    assert_eq!(enabled.value().await.unwrap(), Some(false));
    assert_eq!(revision.value().await.unwrap(), Some(7));
    assert_eq!(state.id().value().await.unwrap().as_deref(), Some("w1-id"));
}

#[tokio::test]
async fn missing_required_input_fails_synchronously() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let mut inputs = InputMap::new();
    inputs.set("label", Some(Input::from("only-label")));

    let (_, outputs) = ResourceOutputs::new();
    let err = ctx
        .register_resource(&widget_schema(), "w", inputs, ResourceOptions::new(), outputs)
        .unwrap_err();

    assert_eq!(err.to_string(), "Missing required property 'secret_key'");
    assert!(monitor.registrations().is_empty());
}

#[tokio::test]
async fn adopting_by_urn_skips_required_checks() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let urn = "urn:pulumi:dev::app::test:index:Widget::w";
    let (state, outputs) = ResourceOutputs::new();
    ctx.register_resource(
        &widget_schema(),
        "w",
        InputMap::new(),
        ResourceOptions::new().urn(urn),
        outputs,
    )
    .unwrap();
    ctx.wait().await.unwrap();

    assert_eq!(state.urn().value().await.unwrap().as_deref(), Some(urn));
    assert_eq!(monitor.registrations()[0].alias_urn.as_deref(), Some(urn));
}

#[tokio::test]
async fn inputs_wait_for_upstream_outputs() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let (upstream, resolver) = Output::<String>::pending();
    let (_, mut outputs) = ResourceOutputs::new();
    let label = outputs.output::<String>("label");

    ctx.register_resource(
        &widget_schema(),
        "w",
        widget_inputs(upstream.apply(|s| format!("{}-label", s))),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();

    resolver.resolve(Some("upstream".to_string()), true, false);
    ctx.wait().await.unwrap();

    assert_eq!(
        label.value().await.unwrap().as_deref(),
        Some("upstream-label")
    );
}

#[tokio::test]
async fn monitor_failures_reject_outputs_and_surface_in_wait() {
    let ctx = Context::new("app", "dev", Arc::new(FailingMonitor));

    let (state, mut outputs) = ResourceOutputs::new();
    let label = outputs.output::<String>("label");
    ctx.register_resource(
        &widget_schema(),
        "broken",
        widget_inputs("x"),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();

    let err = tokio_test::assert_err!(ctx.wait().await);
    assert!(matches!(err, ResplugError::Registration { ref name, .. } if name == "broken"));
    assert!(label.value().await.is_err());
    assert!(state.urn().value().await.is_err());
}

#[tokio::test]
async fn read_resource_resolves_outputs_from_state() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", RevisionMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let (state, mut outputs) = ResourceOutputs::new();
    let revision = outputs.output::<i64>("revision");
    ctx.read_resource(
        &widget_schema(),
        "existing",
        "w-42",
        InputMap::new(),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();
    ctx.wait().await.unwrap();

    assert_eq!(state.id().value().await.unwrap().as_deref(), Some("w-42"));
    assert_eq!(revision.value().await.unwrap(), Some(7));
    assert_eq!(monitor.reads()[0].id, "w-42");
}

#[tokio::test]
async fn preview_leaves_ids_unknown() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks).preview());
    let ctx = Context::new("app", "dev", monitor);

    let (state, outputs) = ResourceOutputs::new();
    ctx.register_resource(
        &widget_schema(),
        "w",
        widget_inputs("x"),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();
    ctx.wait().await.unwrap();

    assert!(!state.id().is_known().await.unwrap());
}

#[tokio::test]
async fn monitors_without_secret_support_receive_plaintext() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks).without_secrets());
    let ctx = Context::new("app", "dev", monitor.clone());

    let (_, mut outputs) = ResourceOutputs::new();
    let secret_key = outputs.output::<String>("secretKey");
    ctx.register_resource(
        &widget_schema(),
        "w",
        widget_inputs("x"),
        ResourceOptions::new(),
        outputs,
    )
    .unwrap();
    ctx.wait().await.unwrap();

    let object = &monitor.registrations()[0].object;
    assert!(!object.get("secretKey").unwrap().is_secret());
    assert_eq!(secret_key.value().await.unwrap().as_deref(), Some("hunter2"));
}

#[tokio::test]
async fn invoke_returns_results_and_reports_failures() {
    let ctx = Context::new(
        "app",
        "dev",
        Arc::new(MockMonitor::new("app", "dev", RevisionMocks)),
    );
    let result = ctx
        .invoke("test:index:lookup", InputMap::new(), InvokeOptions::new())
        .await
        .unwrap();
    assert_eq!(result.get_string("token").unwrap(), "test:index:lookup");

    let ctx = Context::new("app", "dev", Arc::new(FailingMonitor));
    let err = ctx
        .invoke("test:index:lookup", InputMap::new(), InvokeOptions::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("projectId: project not found"));
}

#[tokio::test]
async fn export_macro_records_stack_outputs() {
    let ctx = Context::new(
        "app",
        "dev",
        Arc::new(MockMonitor::new("app", "dev", EchoMocks)),
    );

    resplug::export!(ctx,
        "label" => Output::known("w".to_string()),
        "token" => Output::secret("t".to_string()),
    )
    .unwrap();

    let exports = ctx.exports().await.unwrap();
    assert_eq!(exports.get_string("label").unwrap(), "w");
    assert!(exports.get("token").unwrap().is_secret());
}

#[tokio::test]
async fn failed_invoke_output_fails_wait() {
    let ctx = Context::new("app", "dev", Arc::new(FailingMonitor));

    let result = resplug::invoke_output::<Lookup>(
        &ctx,
        "test:index:lookup",
        InputMap::new(),
        InvokeOptions::new(),
    );

    let err = tokio_test::assert_err!(ctx.wait().await);
    assert!(matches!(err, ResplugError::Invoke { ref token, .. } if token == "test:index:lookup"));
    assert!(result.value().await.is_err());
}

#[tokio::test]
async fn invoke_output_resolves_and_wait_succeeds() {
    let ctx = Context::new(
        "app",
        "dev",
        Arc::new(MockMonitor::new("app", "dev", RevisionMocks)),
    );

    let result = resplug::invoke_output::<Lookup>(
        &ctx,
        "test:index:lookup",
        InputMap::new(),
        InvokeOptions::new(),
    );

    tokio_test::assert_ok!(ctx.wait().await);
    let result = result.value().await.unwrap().unwrap();
    assert_eq!(result.token, "test:index:lookup");
}

#[tokio::test]
async fn values_outside_an_enumeration_fail_registration() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let schema = SchemaBuilder::new("test:index:Gadget")
        .attribute(
            AttributeBuilder::enumeration("size", &["small", "large"])
                .required()
                .build(),
        )
        .build();
    let mut inputs = InputMap::new();
    inputs.set("size", Some(Input::from("medium")));

    let (_, outputs) = ResourceOutputs::new();
    ctx.register_resource(&schema, "g", inputs, ResourceOptions::new(), outputs)
        .unwrap();

    let err = tokio_test::assert_err!(ctx.wait().await);
    assert!(err.to_string().contains("size: 'medium' is not one of [small, large]"));
    assert!(monitor.registrations().is_empty());
}

#[tokio::test]
async fn additional_secret_outputs_are_masked() {
    let monitor = Arc::new(MockMonitor::new("app", "dev", EchoMocks));
    let ctx = Context::new("app", "dev", monitor.clone());

    let (_, mut outputs) = ResourceOutputs::new();
    let label = outputs.output::<String>("label");
    ctx.register_resource(
        &widget_schema(),
        "w",
        widget_inputs("plain"),
        ResourceOptions::new().additional_secret_output("label"),
        outputs,
    )
    .unwrap();
    ctx.wait().await.unwrap();

    assert_eq!(
        monitor.registrations()[0].additional_secret_outputs,
        ["label"]
    );
    assert!(label.is_secret().await.unwrap());
    assert_eq!(label.value().await.unwrap().as_deref(), Some("plain"));
}
