//! Fallback values for input properties the caller left out
//!
//! A default only fires when the property is absent from the input bag.
//! An explicitly supplied value, even `false` or an empty string, always wins.
//!
//! ```no_run
//! use resplug::defaults::PropertyDefault;
//! use resplug::schema::AttributeBuilder;
//!
//! let verify_jwt = AttributeBuilder::bool("verify_jwt")
//!     .optional()
//!     .default(PropertyDefault::bool(false))
//!     .build();
//!
//! let server = AttributeBuilder::string("server")
//!     .optional()
//!     .default(PropertyDefault::env_or("SUPABASE_SERVER", "https://api.supabase.com/v1/"))
//!     .build();
//! ```

use crate::types::Dynamic;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDefault {
    /// Fixed value baked into the schema
    Fixed(Dynamic),
    /// Read from the process environment when the binding is constructed
    Env {
        var: String,
        fallback: Option<String>,
    },
}

impl PropertyDefault {
    pub fn bool(value: bool) -> Self {
        PropertyDefault::Fixed(Dynamic::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        PropertyDefault::Fixed(Dynamic::String(value.into()))
    }

    pub fn number(value: f64) -> Self {
        PropertyDefault::Fixed(Dynamic::Number(value))
    }

    /// Environment variable with no fallback; unset leaves the property absent
    pub fn env(var: &str) -> Self {
        PropertyDefault::Env {
            var: var.to_string(),
            fallback: None,
        }
    }

    pub fn env_or(var: &str, fallback: &str) -> Self {
        PropertyDefault::Env {
            var: var.to_string(),
            fallback: Some(fallback.to_string()),
        }
    }

    /// Value to substitute, or `None` to leave the property out.
    /// Empty environment variables count as unset.
    pub fn resolve(&self) -> Option<Dynamic> {
        match self {
            PropertyDefault::Fixed(value) => Some(value.clone()),
            PropertyDefault::Env { var, fallback } => std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| fallback.clone())
                .map(Dynamic::String),
        }
    }
}

impl fmt::Display for PropertyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDefault::Fixed(value) => write!(f, "{}", value),
            PropertyDefault::Env {
                var,
                fallback: Some(fallback),
            } => write!(f, "${} or {}", var, fallback),
            PropertyDefault::Env { var, fallback: None } => write!(f, "${}", var),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn fixed_values_always_resolve() {
        assert_eq!(PropertyDefault::bool(false).resolve(), Some(Dynamic::Bool(false)));
        assert_eq!(
            PropertyDefault::string("").resolve(),
            Some(Dynamic::String(String::new()))
        );
        assert_eq!(
            PropertyDefault::number(5432.0).resolve(),
            Some(Dynamic::Number(5432.0))
        );
    }

    #[test]
    fn env_prefers_the_variable_over_the_fallback() {
        let default = PropertyDefault::env_or("RESPLUG_TEST_DEFAULT_SET", "fallback");
        assert_eq!(default.resolve(), Some(Dynamic::String("fallback".into())));

        std::env::set_var("RESPLUG_TEST_DEFAULT_SET", "from-env");
        assert_eq!(default.resolve(), Some(Dynamic::String("from-env".into())));

        std::env::set_var("RESPLUG_TEST_DEFAULT_SET", "");
        assert_eq!(default.resolve(), Some(Dynamic::String("fallback".into())));
        std::env::remove_var("RESPLUG_TEST_DEFAULT_SET");
    }

    #[test]
    fn env_without_fallback_stays_absent() {
        let default = PropertyDefault::env("RESPLUG_TEST_REQUIRED_UNSET");
        assert_eq!(default.resolve(), None);
        assert_eq!(default.to_string(), "$RESPLUG_TEST_REQUIRED_UNSET");
    }
}
