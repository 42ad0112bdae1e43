//! Declared input values
//!
//! An `Input<T>` is either a plain value or the output of another resource.
//! Bindings collect their inputs into an `InputMap` keyed by wire name. The map
//! is validated synchronously at declaration time and resolved into a
//! `PropertyMap` once every referenced output has settled.

use crate::error::Result;
use crate::output::Output;
use crate::types::{Dynamic, PropertyMap};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Input is a plain value or a pending output
#[derive(Clone)]
pub enum Input<T> {
    Value(T),
    Output(Output<T>),
}

impl<T> fmt::Debug for Input<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Value(_) => f.write_str("Input(value)"),
            Input::Output(output) => write!(f, "Input({:?})", output),
        }
    }
}

impl<T> From<Output<T>> for Input<T> {
    fn from(output: Output<T>) -> Self {
        Input::Output(output)
    }
}

impl<T> From<&Output<T>> for Input<T> {
    fn from(output: &Output<T>) -> Self {
        Input::Output(output.clone())
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Input::Value(value.to_string())
    }
}

impl From<String> for Input<String> {
    fn from(value: String) -> Self {
        Input::Value(value)
    }
}

impl From<bool> for Input<bool> {
    fn from(value: bool) -> Self {
        Input::Value(value)
    }
}

impl From<i64> for Input<i64> {
    fn from(value: i64) -> Self {
        Input::Value(value)
    }
}

impl From<Dynamic> for Input<Dynamic> {
    fn from(value: Dynamic) -> Self {
        Input::Value(value)
    }
}

/// Type-erased input that resolves to a property value
#[async_trait]
pub trait DynamicInput: Send + Sync {
    async fn resolve(&self) -> Result<Dynamic>;
}

#[async_trait]
impl<T> DynamicInput for Input<T>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    async fn resolve(&self) -> Result<Dynamic> {
        match self {
            Input::Value(value) => Dynamic::from_serializable(value),
            Input::Output(output) => {
                let settled = output.settle().await?;
                let value = match settled.value {
                    Some(value) => Dynamic::from_serializable(&value)?,
                    None if settled.known => Dynamic::Null,
                    None => Dynamic::Unknown,
                };
                Ok(if settled.secret {
                    value.into_secret()
                } else {
                    value
                })
            }
        }
    }
}

struct SecretInput(Box<dyn DynamicInput>);

#[async_trait]
impl DynamicInput for SecretInput {
    async fn resolve(&self) -> Result<Dynamic> {
        Ok(self.0.resolve().await?.into_secret())
    }
}

/// InputMap holds a binding's declared inputs keyed by wire name
#[derive(Default)]
pub struct InputMap {
    inputs: BTreeMap<String, Box<dyn DynamicInput>>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, wire_name: &str, input: I)
    where
        I: DynamicInput + 'static,
    {
        self.inputs.insert(wire_name.to_string(), Box::new(input));
    }

    /// Insert only when the caller supplied a value
    pub fn set<T>(&mut self, wire_name: &str, input: Option<Input<T>>)
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        if let Some(input) = input {
            self.insert(wire_name, input);
        }
    }

    pub fn contains(&self, wire_name: &str) -> bool {
        self.inputs.contains_key(wire_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inputs.keys()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Wrap an existing input so it resolves as a secret
    pub fn mark_secret(&mut self, wire_name: &str) {
        if let Some(input) = self.inputs.remove(wire_name) {
            self.inputs
                .insert(wire_name.to_string(), Box::new(SecretInput(input)));
        }
    }

    /// Await every input and build the property bag
    pub async fn resolve(&self) -> Result<PropertyMap> {
        let mut props = PropertyMap::new();
        for (wire_name, input) in &self.inputs {
            props.insert(wire_name.clone(), input.resolve().await?);
        }
        Ok(props)
    }
}

impl fmt::Debug for InputMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inputs.keys()).finish()
    }
}
