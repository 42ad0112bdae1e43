//! Schema types and builders for resplug
//!
//! A resource schema lists every property of a resource type together with
//! its wire name, whether it is an input, an output or both, and whether it is
//! required, defaulted or secret. Bindings enforce their construction contract
//! through the schema rather than by hand.

use crate::error::{ResplugError, Result};
use crate::input::{Input, InputMap};
use crate::defaults::PropertyDefault;
use crate::types::{CheckFailure, Dynamic, PropertyMap};

/// AttributeType describes the value type of a property
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Integer,
    Bool,
    /// String enumeration with its allowed values
    Enum(Vec<String>),
}

impl AttributeType {
    /// Why `value` does not fit, if it doesn't
    /// Unknowns and nulls always fit; secrets are checked by their contents
    fn mismatch(&self, value: &Dynamic) -> Option<String> {
        let value = match value {
            Dynamic::Secret(inner) => return self.mismatch(inner),
            Dynamic::Unknown | Dynamic::Null => return None,
            other => other,
        };
        match (self, value) {
            (AttributeType::String, Dynamic::String(_))
            | (AttributeType::Bool, Dynamic::Bool(_))
            | (AttributeType::Number, Dynamic::Number(_)) => None,
            (AttributeType::Integer, Dynamic::Number(n)) if n.fract() == 0.0 => None,
            (AttributeType::Integer, Dynamic::Number(n)) => {
                Some(format!("expected an integer, got {}", n))
            }
            (AttributeType::Enum(allowed), Dynamic::String(s)) => {
                if allowed.iter().any(|a| a == s) {
                    None
                } else {
                    Some(format!(
                        "'{}' is not one of [{}]",
                        s,
                        allowed.join(", ")
                    ))
                }
            }
            (expected, actual) => Some(format!(
                "expected {}, got {}",
                expected.name(),
                actual.type_name()
            )),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AttributeType::String | AttributeType::Enum(_) => "string",
            AttributeType::Number => "number",
            AttributeType::Integer => "integer",
            AttributeType::Bool => "bool",
        }
    }
}

/// Attribute represents a single resource property
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Name used by the binding's Rust API
    pub name: String,
    /// Name used on the wire when it differs in casing
    pub wire_name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    /// Populated by the provider
    pub output: bool,
    /// Masked wherever rendered
    pub secret: bool,
    pub default: Option<PropertyDefault>,
}

impl Attribute {
    pub fn is_input(&self) -> bool {
        self.required || self.optional
    }
}

/// AttributeBuilder provides fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    /// Create a new attribute builder; the wire name defaults to the name
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                wire_name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                output: false,
                secret: false,
                default: None,
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, AttributeType::Integer)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        Self::new(
            name,
            AttributeType::Enum(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    /// Set the wire name
    pub fn wire_name(mut self, wire_name: &str) -> Self {
        self.attribute.wire_name = wire_name.to_string();
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    /// Mark as required input
    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    /// Mark as optional input
    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    /// Mark as populated by the provider
    pub fn output(mut self) -> Self {
        self.attribute.output = true;
        self
    }

    /// Mark as secret
    pub fn secret(mut self) -> Self {
        self.attribute.secret = true;
        self
    }

    pub fn default(mut self, default: PropertyDefault) -> Self {
        self.attribute.default = Some(default);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// ResourceSchema describes one resource type
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub type_token: String,
    pub description: String,
    /// Component resources group children and have no provider id
    pub component: bool,
    /// Component implemented by the provider rather than in-process
    pub remote: bool,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.output)
    }

    /// Wire names of outputs that must be treated as secret
    pub fn secret_outputs(&self) -> Vec<String> {
        self.outputs()
            .filter(|a| a.secret)
            .map(|a| a.wire_name.clone())
            .collect()
    }

    /// Every required input must be present
    pub fn check_required(&self, inputs: &InputMap) -> Result<()> {
        match self
            .attributes
            .iter()
            .find(|a| a.required && !inputs.contains(&a.wire_name))
        {
            Some(missing) => Err(ResplugError::MissingRequiredProperty(missing.name.clone())),
            None => Ok(()),
        }
    }

    /// Substitute defaults for absent inputs
    pub fn apply_defaults(&self, inputs: &mut InputMap) {
        let absent = self
            .inputs()
            .filter(|a| !inputs.contains(&a.wire_name))
            .filter_map(|a| Some((&a.wire_name, a.default.as_ref()?.resolve()?)))
            .collect::<Vec<_>>();
        for (wire_name, value) in absent {
            inputs.insert(wire_name, Input::Value(value));
        }
    }

    /// Every supplied input whose value does not fit its declared type
    pub fn check_values(&self, object: &PropertyMap) -> Vec<CheckFailure> {
        self.inputs()
            .filter_map(|attr| {
                let value = object.get(&attr.wire_name)?;
                let reason = attr.r#type.mismatch(value)?;
                Some(CheckFailure::new(&attr.name, reason))
            })
            .collect()
    }

    /// Wrap every secret input
    pub fn mark_secrets(&self, inputs: &mut InputMap) {
        for attr in self.inputs().filter(|a| a.secret) {
            inputs.mark_secret(&attr.wire_name);
        }
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: ResourceSchema,
}

impl SchemaBuilder {
    pub fn new(type_token: &str) -> Self {
        Self {
            schema: ResourceSchema {
                type_token: type_token.to_string(),
                description: String::new(),
                component: false,
                remote: false,
                attributes: Vec::new(),
            },
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    /// Mark as a remote component resource
    pub fn remote_component(mut self) -> Self {
        self.schema.component = true;
        self.schema.remote = true;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.push(attr);
        self
    }

    pub fn build(self) -> ResourceSchema {
        self.schema
    }
}
