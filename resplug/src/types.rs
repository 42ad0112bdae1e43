//! Core value model for resplug
//!
//! This module provides the values exchanged with a resource monitor:
//! `Dynamic` for a single property and `PropertyMap` for a property bag.

use crate::error::{ResplugError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Signature key marking a secret-wrapped object on the wire
pub const SECRET_SIG_KEY: &str = "4dabf18193072939515e22adb298388d";
/// Signature value marking a secret-wrapped object on the wire
pub const SECRET_SIG: &str = "1b47061264138c4ac30d75fd1eb44270";
/// Sentinel string for values not yet known
pub const UNKNOWN_VALUE: &str = "04da6b54-80e4-46f7-96ec-b56ff0331ba9";

/// Dynamic represents a property value of any type
/// Secrets wrap their inner value and never render it through Debug or Display
#[derive(Clone, PartialEq)]
pub enum Dynamic {
    /// Explicit null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (all numbers are f64 on the wire)
    Number(f64),
    /// String value
    String(String),
    /// List of values
    List(Vec<Dynamic>),
    /// Object of string keys to values
    Map(BTreeMap<String, Dynamic>),
    /// Value not yet known (during preview)
    Unknown,
    /// Sensitive value
    Secret(Box<Dynamic>),
}

impl Dynamic {
    /// Convert any serializable value into a Dynamic
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)
            .map_err(|e| ResplugError::EncodingError(format!("json encoding failed: {}", e)))?;
        serde_json::from_value(json)
            .map_err(|e| ResplugError::EncodingError(format!("json conversion failed: {}", e)))
    }

    /// Convert into a typed value; secrets are unwrapped first
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let plain = self.clone().unsecret();
        let json = serde_json::to_value(&plain)
            .map_err(|e| ResplugError::DecodingError(format!("json encoding failed: {}", e)))?;
        serde_json::from_value(json)
            .map_err(|e| ResplugError::DecodingError(format!("json decoding failed: {}", e)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Dynamic::Unknown)
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Dynamic::Secret(_))
    }

    /// Wrap as a secret; already-secret values are left as they are
    pub fn into_secret(self) -> Self {
        match self {
            Dynamic::Secret(_) => self,
            other => Dynamic::Secret(Box::new(other)),
        }
    }

    /// Strip every secret wrapper, recursively
    pub fn unsecret(self) -> Self {
        match self {
            Dynamic::Secret(inner) => inner.unsecret(),
            Dynamic::List(l) => Dynamic::List(l.into_iter().map(Dynamic::unsecret).collect()),
            Dynamic::Map(m) => {
                Dynamic::Map(m.into_iter().map(|(k, v)| (k, v.unsecret())).collect())
            }
            other => other,
        }
    }

    pub fn contains_secrets(&self) -> bool {
        match self {
            Dynamic::Secret(_) => true,
            Dynamic::List(l) => l.iter().any(Dynamic::contains_secrets),
            Dynamic::Map(m) => m.values().any(Dynamic::contains_secrets),
            _ => false,
        }
    }

    pub fn contains_unknowns(&self) -> bool {
        match self {
            Dynamic::Unknown => true,
            Dynamic::Secret(inner) => inner.contains_unknowns(),
            Dynamic::List(l) => l.iter().any(Dynamic::contains_unknowns),
            Dynamic::Map(m) => m.values().any(Dynamic::contains_unknowns),
            _ => false,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Map(_) => "map",
            Dynamic::Unknown => "unknown",
            Dynamic::Secret(_) => "secret",
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Null => f.write_str("null"),
            Dynamic::Bool(b) => write!(f, "{}", b),
            Dynamic::Number(n) => write!(f, "{}", n),
            Dynamic::String(s) => write!(f, "{:?}", s),
            Dynamic::List(l) => f.debug_list().entries(l).finish(),
            Dynamic::Map(m) => f.debug_map().entries(m).finish(),
            Dynamic::Unknown => f.write_str("[unknown]"),
            Dynamic::Secret(_) => f.write_str("[secret]"),
        }
    }
}

impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
    }
}

impl From<f64> for Dynamic {
    fn from(value: f64) -> Self {
        Dynamic::Number(value)
    }
}

impl From<i64> for Dynamic {
    fn from(value: i64) -> Self {
        Dynamic::Number(value as f64)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::String(value.to_string())
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::String(value)
    }
}

impl Serialize for Dynamic {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            // Whole numbers go out as integers so typed decoding into i64 works
            Dynamic::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Dynamic::Number(n) => serializer.serialize_f64(*n),
            Dynamic::String(s) => serializer.serialize_str(s),
            Dynamic::List(l) => l.serialize(serializer),
            Dynamic::Map(m) => m.serialize(serializer),
            Dynamic::Unknown => serializer.serialize_str(UNKNOWN_VALUE),
            Dynamic::Secret(inner) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(SECRET_SIG_KEY, SECRET_SIG)?;
                map.serialize_entry("value", inner)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Dynamic {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct DynamicVisitor;

        impl<'de> Visitor<'de> for DynamicVisitor {
            type Value = Dynamic;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid property value")
            }

            fn visit_unit<E>(self) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Dynamic, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Dynamic::deserialize(deserializer)
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                Ok(Dynamic::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                if value == UNKNOWN_VALUE {
                    Ok(Dynamic::Unknown)
                } else {
                    Ok(Dynamic::String(value.to_string()))
                }
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Dynamic, E>
            where
                E: de::Error,
            {
                if value == UNKNOWN_VALUE {
                    Ok(Dynamic::Unknown)
                } else {
                    Ok(Dynamic::String(value))
                }
            }

            fn visit_seq<V>(self, mut seq: V) -> std::result::Result<Dynamic, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Dynamic::List(vec))
            }

            fn visit_map<V>(self, mut map: V) -> std::result::Result<Dynamic, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut values: BTreeMap<String, Dynamic> = BTreeMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }

                let is_secret = matches!(
                    values.get(SECRET_SIG_KEY),
                    Some(Dynamic::String(sig)) if sig == SECRET_SIG
                );
                if is_secret {
                    let inner = values.remove("value").unwrap_or(Dynamic::Null);
                    return Ok(Dynamic::Secret(Box::new(inner)));
                }

                Ok(Dynamic::Map(values))
            }
        }

        deserializer.deserialize_any(DynamicVisitor)
    }
}

/// PropertyMap is the property bag sent to and received from a resource monitor
/// Keys are wire names
#[derive(Clone, Default, PartialEq)]
pub struct PropertyMap {
    values: BTreeMap<String, Dynamic>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Dynamic>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Dynamic> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Dynamic)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay every entry of `other` onto this map
    pub fn extend(&mut self, other: PropertyMap) {
        self.values.extend(other.values);
    }

    /// Type-safe accessors, secrets are read through transparently
    pub fn get_string(&self, key: &str) -> Result<String> {
        let value = self.plain(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.plain(key)?;
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }

    pub fn get_number(&self, key: &str) -> Result<f64> {
        let value = self.plain(key)?;
        value.as_number().ok_or_else(|| mismatch("number", value))
    }

    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let number = self.get_number(key)?;
        if number.fract() != 0.0 {
            return Err(ResplugError::TypeMismatch {
                expected: "integer".to_string(),
                actual: number.to_string(),
            });
        }
        Ok(number as i64)
    }

    /// Return a copy with every secret wrapper removed
    pub fn unsecret(&self) -> PropertyMap {
        PropertyMap {
            values: self
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().unsecret()))
                .collect(),
        }
    }

    /// Decode the whole map into a typed struct
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        Dynamic::Map(self.values.clone()).deserialize_into()
    }

    /// Encoding for the wire, msgpack by default
    pub fn encode_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::encode::to_vec(&self.values)
            .map_err(|e| ResplugError::EncodingError(format!("msgpack encoding failed: {}", e)))
    }

    pub fn decode_msgpack(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::new());
        }
        let values = rmp_serde::decode::from_slice(data)
            .map_err(|e| ResplugError::DecodingError(format!("msgpack decoding failed: {}", e)))?;
        Ok(Self { values })
    }

    fn plain(&self, key: &str) -> Result<&Dynamic> {
        let mut value = self
            .values
            .get(key)
            .ok_or_else(|| ResplugError::PropertyNotFound(key.to_string()))?;
        while let Dynamic::Secret(inner) = value {
            value = inner;
        }
        Ok(value)
    }
}

fn mismatch(expected: &str, actual: &Dynamic) -> ResplugError {
    ResplugError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(&self.values).finish()
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromIterator<(String, Dynamic)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, Dynamic)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Dynamic>> for PropertyMap {
    fn from(values: BTreeMap<String, Dynamic>) -> Self {
        Self { values }
    }
}

/// CheckFailure reports why a property was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub property: String,
    pub reason: String,
}

impl CheckFailure {
    pub fn new(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            reason: reason.into(),
        }
    }
}
