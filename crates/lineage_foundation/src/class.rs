//! Qualified class identities.
//!
//! Analysis classes and file-format classes are identified by a qualified
//! `module:Name` string. The angle-bracketed location form `<module:Name>`
//! is accepted wherever a class location is parsed.

use std::fmt;
use std::sync::Arc;

use crate::{Error, ErrorKind, Result};

/// Qualified identity of a class (`module:Name`).
///
/// Cloning is O(1). Equality and hashing are by the qualified name, so two
/// identities naming the same class compare equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Arc<str>);

impl ClassId {
    /// Creates a class identity from a module path and a class name.
    ///
    /// No validation is performed; identities built from user input should
    /// go through [`ClassId::parse`].
    #[must_use]
    pub fn new(module: &str, name: &str) -> Self {
        Self(format!("{module}:{name}").into())
    }

    /// Parses a class location of the form `module:Name` or `<module:Name>`.
    ///
    /// # Errors
    /// Returns an error if the location does not contain exactly one `:`
    /// separating a non-empty module path from a non-empty class name.
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(trimmed);

        let mut parts = inner.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(module), Some(name), None)
                if !module.is_empty() && !name.is_empty() && is_identifier(name) =>
            {
                Ok(Self(inner.into()))
            }
            _ => Err(Error::new(ErrorKind::InvalidClassLocation(
                location.to_string(),
            ))),
        }
    }

    /// Returns the module path (everything before the `:`).
    #[must_use]
    pub fn module(&self) -> &str {
        self.0.split_once(':').map_or("", |(module, _)| module)
    }

    /// Returns the bare class name (everything after the `:`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(_, name)| name)
    }

    /// Returns the qualified `module:Name` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the angle-bracketed location form, `<module:Name>`.
    #[must_use]
    pub fn location(&self) -> String {
        format!("<{}>", self.0)
    }

    /// Returns this identity with `prefix` prepended to its module path.
    ///
    /// Used when a qualified name fails to resolve verbatim and a list of
    /// allowable package prefixes is tried instead.
    #[must_use]
    pub fn with_module_prefix(&self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('.');
        if prefix.is_empty() {
            return self.clone();
        }
        Self::new(&format!("{prefix}.{}", self.module()), self.name())
    }
}

fn is_identifier(name: &str) -> bool {
    name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ClassId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ClassId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let location = String::deserialize(deserializer)?;
        Self::parse(&location).map_err(serde::de::Error::custom)
    }
}
