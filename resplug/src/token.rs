//! Type tokens and URNs
//!
//! A type token addresses a resource type as `package:module:Type`.
//! A URN names one declared resource inside a stack.

use crate::error::{ResplugError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn token_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*):([A-Za-z0-9_./-]*):([A-Za-z_][A-Za-z0-9_]*)$")
        })
        .as_ref()
        .map_err(|e| ResplugError::Custom(format!("type token pattern: {}", e)))
}

/// TypeToken is a parsed `package:module:Type` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeToken {
    package: String,
    module: String,
    name: String,
}

impl TypeToken {
    pub fn parse(token: &str) -> Result<Self> {
        let captures = token_pattern()?
            .captures(token)
            .ok_or_else(|| ResplugError::InvalidTypeToken(token.to_string()))?;

        Ok(Self {
            package: captures[1].to_string(),
            module: captures[2].to_string(),
            name: captures[3].to_string(),
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider resources live under the reserved `pulumi:providers` module
    pub fn is_provider(&self) -> bool {
        self.package == "pulumi" && self.module == "providers"
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.package, self.module, self.name)
    }
}

/// Urn uniquely names a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn(String);

impl Urn {
    /// Build a URN; a parent contributes its qualified type as a `$`-joined prefix
    pub fn new(
        stack: &str,
        project: &str,
        parent: Option<&Urn>,
        type_token: &str,
        name: &str,
    ) -> Result<Self> {
        let qualified_type = match parent {
            Some(parent) => format!("{}${}", parent.qualified_type()?, type_token),
            None => type_token.to_string(),
        };
        Ok(Self(format!(
            "urn:pulumi:{}::{}::{}::{}",
            stack, project, qualified_type, name
        )))
    }

    pub fn parse(value: &str) -> Result<Self> {
        let urn = Self(value.to_string());
        urn.parts()?;
        Ok(urn)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn stack(&self) -> Result<&str> {
        Ok(self.parts()?.0)
    }

    pub fn project(&self) -> Result<&str> {
        Ok(self.parts()?.1)
    }

    pub fn qualified_type(&self) -> Result<&str> {
        Ok(self.parts()?.2)
    }

    /// The resource's own type, without parent qualifiers
    pub fn type_token(&self) -> Result<&str> {
        let qualified = self.qualified_type()?;
        Ok(qualified.rsplit('$').next().unwrap_or(qualified))
    }

    pub fn name(&self) -> Result<&str> {
        Ok(self.parts()?.3)
    }

    fn parts(&self) -> Result<(&str, &str, &str, &str)> {
        let rest = self
            .0
            .strip_prefix("urn:pulumi:")
            .ok_or_else(|| ResplugError::InvalidUrn(self.0.clone()))?;

        // The name is everything after the third separator and may itself contain "::"
        let mut parts = rest.splitn(4, "::");
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(stack), Some(project), Some(qualified), Some(name)) if !qualified.is_empty() => {
                Ok((stack, project, qualified, name))
            }
            _ => Err(ResplugError::InvalidUrn(self.0.clone())),
        }
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resource_and_provider_tokens() {
        let token = TypeToken::parse("supabase:index:Function").unwrap();
        assert_eq!(token.package(), "supabase");
        assert_eq!(token.module(), "index");
        assert_eq!(token.name(), "Function");
        assert!(!token.is_provider());
        assert_eq!(token.to_string(), "supabase:index:Function");

        let provider = TypeToken::parse("pulumi:providers:supabase").unwrap();
        assert!(provider.is_provider());
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in ["", "supabase", "supabase:Function", "a:b:c:d", "supabase:index:"] {
            assert!(
                matches!(TypeToken::parse(bad), Err(ResplugError::InvalidTypeToken(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn urn_round_trips_with_parent() {
        let parent = Urn::new("dev", "app", None, "supabase:organization:Project", "proj").unwrap();
        let child =
            Urn::new("dev", "app", Some(&parent), "supabase:index:Function", "hello").unwrap();

        assert_eq!(
            child.as_str(),
            "urn:pulumi:dev::app::supabase:organization:Project$supabase:index:Function::hello"
        );
        assert_eq!(child.type_token().unwrap(), "supabase:index:Function");
        assert_eq!(child.name().unwrap(), "hello");
        assert_eq!(child.stack().unwrap(), "dev");
        assert_eq!(child.project().unwrap(), "app");
    }

    #[test]
    fn urn_parse_rejects_garbage() {
        assert!(Urn::parse("not-a-urn").is_err());
        assert!(Urn::parse("urn:pulumi:dev::app").is_err());
    }
}
