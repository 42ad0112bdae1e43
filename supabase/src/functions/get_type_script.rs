//! TypeScript type generation for a project's database

use crate::utilities::invoke_default_opts;
use resplug::{invoke_output, Context, Input, InputMap, InvokeOptions, Output, Result};
use serde::{Deserialize, Serialize};

pub const GET_TYPE_SCRIPT_TOKEN: &str = "supabase:index:GetTypeScript";

#[derive(Debug, Clone, Default)]
pub struct GetTypeScriptArgs {
    /// Comma separated schemas to include, all schemas when empty
    pub included_schemas: Option<Input<String>>,
    pub project_id: Option<Input<String>>,
}

impl GetTypeScriptArgs {
    pub fn new(project_id: impl Into<Input<String>>) -> Self {
        Self {
            included_schemas: None,
            project_id: Some(project_id.into()),
        }
    }

    pub fn included_schemas(mut self, schemas: impl Into<Input<String>>) -> Self {
        self.included_schemas = Some(schemas.into());
        self
    }

    fn into_inputs(self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.set(
            "includedSchemas",
            Some(
                self.included_schemas
                    .unwrap_or_else(|| Input::Value(String::new())),
            ),
        );
        inputs.set("projectId", self.project_id);
        inputs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTypeScriptResult {
    /// TypeScript types of the project
    pub types: String,
}

/// Generate TypeScript types for a project's database
pub async fn get_type_script(
    ctx: &Context,
    args: GetTypeScriptArgs,
    opts: InvokeOptions,
) -> Result<GetTypeScriptResult> {
    let result = ctx
        .invoke(
            GET_TYPE_SCRIPT_TOKEN,
            args.into_inputs(),
            invoke_default_opts(opts),
        )
        .await?;
    result.deserialize_into()
}

/// Same as `get_type_script`, as an output usable as another resource's input
pub fn get_type_script_output(
    ctx: &Context,
    args: GetTypeScriptArgs,
    opts: InvokeOptions,
) -> Output<GetTypeScriptResult> {
    invoke_output(
        ctx,
        GET_TYPE_SCRIPT_TOKEN,
        args.into_inputs(),
        invoke_default_opts(opts),
    )
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn included_schemas_defaults_to_empty() {
        let props = GetTypeScriptArgs::new("proj")
            .into_inputs()
            .resolve()
            .await
            .unwrap();
        assert_eq!(props.get_string("includedSchemas").unwrap(), "");
        assert_eq!(props.get_string("projectId").unwrap(), "proj");
    }

    #[tokio::test]
    async fn default_args_send_no_project() {
        let props = GetTypeScriptArgs::default()
            .into_inputs()
            .resolve()
            .await
            .unwrap();
        assert!(!props.contains_key("projectId"));
        assert_eq!(props.len(), 1);
    }
}
