//! Resource bindings

pub mod function;
pub mod organization;
pub mod project;
pub mod secret;

pub use function::{Function, FunctionArgs, FunctionBuilder, FunctionState};
pub use organization::{Organization, OrganizationArgs};
pub use project::{Project, ProjectArgs};
pub use secret::{Secret, SecretArgs};

use crate::utilities::resource_default_opts;
use resplug::{
    Context, InputMap, ResourceOptions, ResourceOutputs, ResourceSchema, ResplugError, Result,
};
use tracing::{debug, warn};

pub(crate) const STATE_WITHOUT_ID: &str =
    "state is only valid when passed in combination with a valid id to get an existing resource";

/// Inputs come either as an argument bundle or as individual fields
pub(crate) fn pick_inputs(args: Option<InputMap>, fields: InputMap) -> Result<InputMap> {
    match args {
        Some(_) if !fields.is_empty() => Err(ResplugError::AmbiguousArguments(format!(
            "pass either an argument bundle or individual fields, not both (fields: {:?})",
            fields
        ))),
        Some(args) => Ok(args),
        None => Ok(fields),
    }
}

/// Register a new resource, or read an existing one when an id is given
pub(crate) fn declare(
    ctx: &Context,
    schema: &ResourceSchema,
    name: &str,
    inputs: InputMap,
    state: Option<InputMap>,
    opts: ResourceOptions,
    outputs: ResourceOutputs,
) -> Result<()> {
    let mut opts = resource_default_opts(opts);

    match opts.id.take() {
        Some(id) => {
            if !inputs.is_empty() {
                warn!(
                    type_token = %schema.type_token,
                    name = %name,
                    "inputs are ignored when reading an existing resource"
                );
            }
            debug!(type_token = %schema.type_token, name = %name, id = %id, "reading existing resource");
            ctx.read_resource(schema, name, &id, state.unwrap_or_default(), opts, outputs)
        }
        None => {
            if state.is_some() {
                return Err(ResplugError::InvalidOptions(STATE_WITHOUT_ID.to_string()));
            }
            ctx.register_resource(schema, name, inputs, opts, outputs)
        }
    }
}
