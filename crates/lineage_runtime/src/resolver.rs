//! Resolving qualified class names back to live classes.

use lineage_foundation::{ClassId, Result};
use lineage_resolve::AnalysisRegistry;

/// Looks up analysis and format classes by qualified location.
pub trait ClassResolver {
    /// Resolves `location` (`module:Name` or `<module:Name>`), trying each
    /// of `prefixes` when the location is not known verbatim.
    ///
    /// # Errors
    /// Returns `UnresolvedClass` if nothing matches, or
    /// `InvalidClassLocation` if the location is malformed.
    fn resolve_class(&self, location: &str, prefixes: &[String]) -> Result<ClassId>;
}

impl ClassResolver for AnalysisRegistry {
    fn resolve_class(&self, location: &str, prefixes: &[String]) -> Result<ClassId> {
        self.resolve_location(location, prefixes)
    }
}

impl<F> ClassResolver for F
where
    F: Fn(&str, &[String]) -> Result<ClassId>,
{
    fn resolve_class(&self, location: &str, prefixes: &[String]) -> Result<ClassId> {
        self(location, prefixes)
    }
}

/// Settings for rebuilding specs from records.
///
/// Strict by default: every class reference in a record must resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// Keep references that do not resolve as bare identities instead of
    /// failing.
    pub permit_unresolved: bool,
    /// Module prefixes tried when a location does not resolve verbatim.
    pub prefixes: Vec<String>,
}

impl DeserializeOptions {
    /// Creates strict options with no prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that keep unresolved references.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new().with_permit_unresolved(true)
    }

    /// Sets whether unresolved references are kept.
    #[must_use]
    pub fn with_permit_unresolved(mut self, permit: bool) -> Self {
        self.permit_unresolved = permit;
        self
    }

    /// Adds a module prefix to try.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }
}
