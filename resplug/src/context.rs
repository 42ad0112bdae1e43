//! Program context for declaring resources
//!
//! The Context carries the project and stack names, the resource monitor,
//! and every in-flight declaration. Declarations return immediately; the work
//! of resolving inputs and talking to the monitor runs as tokio tasks that
//! `wait` joins.

use crate::error::{ResplugError, Result};
use crate::input::{DynamicInput, Input, InputMap};
use crate::monitor::{
    InvokeRequest, ReadResourceRequest, RegisterResourceRequest, ResourceMonitor,
};
use crate::options::{InvokeOptions, ResourceOptions};
use crate::output::Output;
use crate::resource::{ProviderReference, ResourceOutputs};
use crate::schema::ResourceSchema;
use crate::token::TypeToken;
use crate::types::{CheckFailure, PropertyMap};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Context is cheap to clone; all clones share the same program state
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    project: String,
    stack: String,
    monitor: Arc<dyn ResourceMonitor>,
    pending: Mutex<JoinSet<Result<()>>>,
    exports: Mutex<BTreeMap<String, Arc<dyn DynamicInput>>>,
    done: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
}

impl Context {
    pub fn new(project: &str, stack: &str, monitor: Arc<dyn ResourceMonitor>) -> Self {
        let (done_tx, done_rx) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                project: project.to_string(),
                stack: stack.to_string(),
                monitor,
                pending: Mutex::new(JoinSet::new()),
                exports: Mutex::new(BTreeMap::new()),
                done: done_rx,
                done_tx,
            }),
        }
    }

    pub fn project(&self) -> &str {
        &self.inner.project
    }

    pub fn stack(&self) -> &str {
        &self.inner.stack
    }

    pub fn monitor(&self) -> Arc<dyn ResourceMonitor> {
        self.inner.monitor.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow()
    }

    /// Abort every declaration that has not reached the monitor yet
    pub fn cancel(&self) {
        let _ = self.inner.done_tx.send(true);
    }

    /// Declare a resource's desired state
    ///
    /// Required inputs are checked here unless an existing resource is adopted
    /// by URN. Defaults and secret wrapping are applied before the inputs are
    /// handed to the monitor.
    pub fn register_resource(
        &self,
        schema: &ResourceSchema,
        name: &str,
        mut inputs: InputMap,
        opts: ResourceOptions,
        outputs: ResourceOutputs,
    ) -> Result<()> {
        TypeToken::parse(&schema.type_token)?;
        if opts.id.is_some() {
            return Err(ResplugError::InvalidOptions(
                "resources with an id must be read, not registered".to_string(),
            ));
        }

        if opts.urn.is_none() {
            schema.check_required(&inputs)?;
        }
        schema.apply_defaults(&mut inputs);
        schema.mark_secrets(&mut inputs);

        let mut secret_outputs = schema.secret_outputs();
        secret_outputs.extend(opts.additional_secret_outputs.iter().cloned());

        let monitor = self.monitor();
        let schema = schema.clone();
        let type_token = schema.type_token.clone();
        let custom = !schema.component;
        let remote = schema.remote;
        let name = name.to_string();

        debug!(type_token = %type_token, name = %name, inputs = ?inputs, "declaring resource");

        self.spawn(async move {
            let result = async {
                let mut object = inputs.resolve().await?;
                let failures = schema.check_values(&object);
                if !failures.is_empty() {
                    return Err(ResplugError::InvalidValues(describe_failures(&failures)));
                }
                let provider = resolve_provider(opts.provider.as_ref()).await?;

                // Logged while secrets are still wrapped
                debug!(type_token = %type_token, name = %name, object = %object, "registering resource");
                if !monitor.supports_secrets() {
                    object = object.unsecret();
                }

                monitor
                    .register_resource(RegisterResourceRequest {
                        type_token: type_token.clone(),
                        name: name.clone(),
                        custom,
                        remote,
                        object,
                        parent: opts.parent.clone(),
                        provider,
                        dependencies: opts.depends_on.clone(),
                        protect: opts.protect,
                        ignore_changes: opts.ignore_changes.clone(),
                        additional_secret_outputs: secret_outputs.clone(),
                        delete_before_replace: opts.delete_before_replace,
                        retain_on_delete: opts.retain_on_delete,
                        alias_urn: opts.urn.clone(),
                        version: opts.version.clone(),
                        plugin_download_url: opts.plugin_download_url.clone(),
                    })
                    .await
            }
            .await;

            match result {
                Ok(response) => {
                    debug!(urn = %response.urn, id = ?response.id, "resource registered");
                    outputs.resolve(
                        &response.urn,
                        response.id.as_deref(),
                        custom,
                        &response.object,
                        &secret_outputs,
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(type_token = %type_token, name = %name, error = %e, "resource registration failed");
                    outputs.reject(&e.to_string());
                    Err(registration_error(&name, e))
                }
            }
        })
    }

    /// Adopt an existing resource by provider id
    /// Inputs are not required; the monitor sources them from remote state
    pub fn read_resource(
        &self,
        schema: &ResourceSchema,
        name: &str,
        id: &str,
        state: InputMap,
        opts: ResourceOptions,
        outputs: ResourceOutputs,
    ) -> Result<()> {
        TypeToken::parse(&schema.type_token)?;
        if id.is_empty() {
            return Err(ResplugError::InvalidOptions(
                "an id is required to read an existing resource".to_string(),
            ));
        }

        let mut secret_outputs = schema.secret_outputs();
        secret_outputs.extend(opts.additional_secret_outputs.iter().cloned());

        let monitor = self.monitor();
        let type_token = schema.type_token.clone();
        let name = name.to_string();
        let id = id.to_string();

        debug!(type_token = %type_token, name = %name, id = %id, "reading resource");

        self.spawn(async move {
            let result = async {
                let properties = state.resolve().await?;
                let provider = resolve_provider(opts.provider.as_ref()).await?;

                monitor
                    .read_resource(ReadResourceRequest {
                        type_token: type_token.clone(),
                        name: name.clone(),
                        id: id.clone(),
                        properties,
                        parent: opts.parent.clone(),
                        provider,
                        dependencies: opts.depends_on.clone(),
                        additional_secret_outputs: secret_outputs.clone(),
                        version: opts.version.clone(),
                        plugin_download_url: opts.plugin_download_url.clone(),
                    })
                    .await
            }
            .await;

            match result {
                Ok(response) => {
                    debug!(urn = %response.urn, "resource read");
                    outputs.resolve(
                        &response.urn,
                        Some(&id),
                        true,
                        &response.properties,
                        &secret_outputs,
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(type_token = %type_token, name = %name, error = %e, "resource read failed");
                    outputs.reject(&e.to_string());
                    Err(registration_error(&name, e))
                }
            }
        })
    }

    /// Call a provider function and wait for its result
    pub async fn invoke(
        &self,
        token: &str,
        args: InputMap,
        opts: InvokeOptions,
    ) -> Result<PropertyMap> {
        TypeToken::parse(token)?;

        let mut resolved = args.resolve().await?;
        let provider = resolve_provider(opts.provider.as_ref()).await?;

        debug!(token = %token, args = %resolved, "invoking provider function");
        if !self.inner.monitor.supports_secrets() {
            resolved = resolved.unsecret();
        }

        let response = self
            .inner
            .monitor
            .invoke(InvokeRequest {
                token: token.to_string(),
                args: resolved,
                provider,
                version: opts.version,
                plugin_download_url: opts.plugin_download_url,
            })
            .await?;

        if !response.failures.is_empty() {
            return Err(ResplugError::Invoke {
                token: token.to_string(),
                message: describe_failures(&response.failures),
            });
        }

        Ok(response.result)
    }

    /// Record a stack output
    pub fn export<T>(&self, name: &str, value: impl Into<Input<T>>) -> Result<()>
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        let input: Arc<dyn DynamicInput> = Arc::new(value.into());
        self.inner
            .exports
            .lock()
            .map_err(|_| ResplugError::Custom("stack exports lock poisoned".to_string()))?
            .insert(name.to_string(), input);
        Ok(())
    }

    /// Resolve every stack output recorded so far
    pub async fn exports(&self) -> Result<PropertyMap> {
        let exports: Vec<(String, Arc<dyn DynamicInput>)> = self
            .inner
            .exports
            .lock()
            .map_err(|_| ResplugError::Custom("stack exports lock poisoned".to_string()))?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut props = PropertyMap::new();
        for (name, value) in exports {
            props.insert(name, value.resolve().await?);
        }
        Ok(props)
    }

    /// Join every pending declaration, including ones started while waiting
    /// Returns the first failure
    pub async fn wait(&self) -> Result<()> {
        let mut first_error = None;

        loop {
            let mut tasks = {
                let mut pending = self.inner.pending.lock().map_err(|_| {
                    ResplugError::Custom("pending task registry poisoned".to_string())
                })?;
                std::mem::take(&mut *pending)
            };
            if tasks.is_empty() {
                break;
            }

            while let Some(joined) = tasks.join_next().await {
                let outcome = joined.map_err(ResplugError::from).and_then(|r| r);
                if let Err(e) = outcome {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let done = self.inner.done.clone();
        let guarded = async move {
            tokio::select! {
                result = task => result,
                _ = cancelled(done) => Err(ResplugError::Cancelled),
            }
        };

        self.inner
            .pending
            .lock()
            .map_err(|_| ResplugError::Custom("pending task registry poisoned".to_string()))?
            .spawn(guarded);
        Ok(())
    }
}

async fn resolve_provider(provider: Option<&ProviderReference>) -> Result<Option<String>> {
    match provider {
        Some(provider) => Ok(Some(provider.resolve().await?)),
        None => Ok(None),
    }
}

fn describe_failures(failures: &[CheckFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.property, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

fn registration_error(name: &str, err: ResplugError) -> ResplugError {
    match err {
        ResplugError::Registration { .. } | ResplugError::Cancelled => err,
        other => ResplugError::Registration {
            name: name.to_string(),
            message: other.to_string(),
        },
    }
}

async fn cancelled(mut done: watch::Receiver<bool>) {
    loop {
        if *done.borrow_and_update() {
            return;
        }
        if done.changed().await.is_err() {
            // Context dropped without cancelling
            std::future::pending::<()>().await;
        }
    }
}

/// Build an output whose value is the result of a provider function call
/// The call is tracked like a registration, so its failure also fails `wait()`
pub fn invoke_output<T>(
    ctx: &Context,
    token: &str,
    args: InputMap,
    opts: InvokeOptions,
) -> Output<T>
where
    T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
{
    let (output, resolver) = Output::pending();
    let resolver = Arc::new(resolver);
    let call_ctx = ctx.clone();
    let token = token.to_string();
    let settle = Arc::clone(&resolver);
    let spawned = ctx.spawn(async move {
        let decoded = call_ctx
            .invoke(&token, args, opts)
            .await
            .and_then(|result| {
                let secret = result.iter().any(|(_, v)| v.contains_secrets());
                Ok((result.deserialize_into::<T>()?, secret))
            });
        match decoded {
            Ok((value, secret)) => {
                settle.resolve(Some(value), true, secret);
                Ok(())
            }
            Err(e) => {
                warn!(token = %token, error = %e, "provider function failed");
                settle.reject(e.to_string());
                Err(e)
            }
        }
    });
    if let Err(e) = spawned {
        resolver.reject(e.to_string());
    }
    output
}
