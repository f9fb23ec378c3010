//! `namespace:path` resource identifiers

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Namespace assumed when an identifier omits one
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A parsed `namespace:path` identifier (biome, tag, dimension, crop, animal)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    /// Parse an identifier, defaulting the namespace to `minecraft`
    pub fn parse(raw: &str) -> Result<Self> {
        let (namespace, path) = match raw.split_once(':') {
            Some((ns, path)) => (ns, path),
            None => (DEFAULT_NAMESPACE, raw),
        };

        let namespace_ok = !namespace.is_empty() && namespace.chars().all(is_namespace_char);
        let path_ok = !path.is_empty() && path.chars().all(|c| is_namespace_char(c) || c == '/');
        if !namespace_ok || !path_ok {
            return Err(Error::InvalidIdentifier(raw.to_string()));
        }

        Ok(ResourceId {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ResourceId::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Wildcard forms accepted in biome and subject pattern lists
pub(crate) fn is_wildcard(pattern: &str) -> bool {
    pattern == "*" || pattern.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_namespace() {
        let id = ResourceId::parse("forge:is_desert").unwrap();
        assert_eq!(id.namespace(), "forge");
        assert_eq!(id.path(), "is_desert");
        assert_eq!(id.to_string(), "forge:is_desert");
    }

    #[test]
    fn test_parse_defaults_namespace() {
        let id: ResourceId = "is_hot".parse().unwrap();
        assert_eq!(id.to_string(), "minecraft:is_hot");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourceId::parse("").is_err());
        assert!(ResourceId::parse("Minecraft:Desert").is_err());
        assert!(ResourceId::parse("a:b:c").is_err());
        assert!(ResourceId::parse("ns:").is_err());
        assert!(ResourceId::parse("worldgen/biome:x").is_err());
        assert!(ResourceId::parse("ns:worldgen/biome").is_ok());
    }

    #[test]
    fn test_wildcards() {
        assert!(is_wildcard("*"));
        assert!(is_wildcard("minecraft:*"));
        assert!(!is_wildcard("minecraft:wheat"));
    }
}
