//! Registry of analysis classes and their resolved specs.
//!
//! The `AnalysisRegistry` tracks:
//! - Every registered class body and the spec resolved from it
//! - The order classes were registered in
//! - Known file-format classes, so qualified names can be resolved back
//!   to live definitions

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lineage_declare::ClassBody;
use lineage_foundation::{ClassId, Error, ErrorKind, Result};

use crate::aggregate;
use crate::spec::AnalysisSpec;

// =============================================================================
// RegisteredClass
// =============================================================================

/// A registered analysis class.
#[derive(Clone, Debug)]
pub struct RegisteredClass {
    /// The class body as declared.
    pub body: Arc<ClassBody>,
    /// The spec resolved from it.
    pub spec: Arc<AnalysisSpec>,
}

// =============================================================================
// AnalysisRegistry
// =============================================================================

/// Registry of analysis classes, keyed by identity.
///
/// Provides:
/// - One-time resolution of each class body, cached by identity
/// - Lookup of resolved specs for subclassing and composition
/// - Resolution of qualified class names, with module-prefix fallbacks
#[derive(Debug, Default)]
pub struct AnalysisRegistry {
    /// Map from class identity to its registration.
    classes: HashMap<ClassId, RegisteredClass>,
    /// Class identities in registration order.
    order: Vec<ClassId>,
    /// File-format classes referenced by column and parameter types.
    formats: HashSet<ClassId>,
}

impl AnalysisRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a class body and registers its spec.
    ///
    /// Every base and every subanalysis must already be registered.
    ///
    /// # Errors
    /// Returns `DuplicateClass` if the class is already registered,
    /// `UnknownClass` if a base or subanalysis is not, and any configuration
    /// error raised while resolving the body.
    pub fn register(&mut self, body: ClassBody) -> Result<Arc<AnalysisSpec>> {
        if self.is_known(&body.class) {
            return Err(Error::new(ErrorKind::DuplicateClass(body.class)));
        }

        let spec = aggregate::resolve(&body, self)
            .map_err(|e| e.with_frame(format!("resolving {}", body.class)))?;
        let spec = Arc::new(spec);

        let class = body.class.clone();
        self.order.push(class.clone());
        self.classes.insert(
            class,
            RegisteredClass {
                body: Arc::new(body),
                spec: Arc::clone(&spec),
            },
        );
        Ok(spec)
    }

    /// Registers a file-format class. Returns false if it was already known.
    pub fn register_format(&mut self, format: ClassId) -> bool {
        self.formats.insert(format)
    }

    /// Returns the registration of a class.
    ///
    /// # Errors
    /// Returns `UnknownClass` if the class is not registered.
    pub fn entry(&self, class: &ClassId) -> Result<&RegisteredClass> {
        self.classes
            .get(class)
            .ok_or_else(|| Error::new(ErrorKind::UnknownClass(class.clone())))
    }

    /// Returns the resolved spec of a class.
    ///
    /// # Errors
    /// Returns `UnknownClass` if the class is not registered.
    pub fn spec(&self, class: &ClassId) -> Result<Arc<AnalysisSpec>> {
        self.entry(class).map(|entry| Arc::clone(&entry.spec))
    }

    /// Looks up a resolved spec without failing.
    #[must_use]
    pub fn get(&self, class: &ClassId) -> Option<&Arc<AnalysisSpec>> {
        self.classes.get(class).map(|entry| &entry.spec)
    }

    /// Check if an analysis class is registered.
    #[must_use]
    pub fn contains(&self, class: &ClassId) -> bool {
        self.classes.contains_key(class)
    }

    /// Check if a file-format class is registered.
    #[must_use]
    pub fn is_format(&self, class: &ClassId) -> bool {
        self.formats.contains(class)
    }

    /// Check if a class is registered as either an analysis or a format.
    #[must_use]
    pub fn is_known(&self, class: &ClassId) -> bool {
        self.contains(class) || self.is_format(class)
    }

    /// Returns the registered analysis classes in registration order.
    #[must_use]
    pub fn class_names(&self) -> Vec<&ClassId> {
        self.order.iter().collect()
    }

    /// Returns the method-resolution order of a class.
    ///
    /// # Errors
    /// Returns `UnknownClass` if the class is not registered.
    pub fn mro(&self, class: &ClassId) -> Result<&[ClassId]> {
        self.entry(class).map(|entry| entry.spec.mro())
    }

    /// Returns true if `class` is `base` or derives from it.
    #[must_use]
    pub fn is_subclass(&self, class: &ClassId, base: &ClassId) -> bool {
        self.get(class).is_some_and(|spec| spec.is_subclass_of(base))
    }

    /// Resolves a qualified class location to a registered class.
    ///
    /// The location is tried verbatim first, then under each module prefix
    /// in turn (`prefix.module:Name`).
    ///
    /// # Errors
    /// Returns `InvalidClassLocation` if the location is malformed and
    /// `UnresolvedClass` if no candidate is registered.
    pub fn resolve_location(&self, location: &str, prefixes: &[String]) -> Result<ClassId> {
        let class = ClassId::parse(location)?;
        if self.is_known(&class) {
            return Ok(class);
        }
        prefixes
            .iter()
            .map(|prefix| class.with_module_prefix(prefix))
            .find(|candidate| self.is_known(candidate))
            .ok_or_else(|| {
                Error::new(ErrorKind::UnresolvedClass {
                    location: location.to_string(),
                    prefixes: prefixes.to_vec(),
                })
            })
    }

    /// Clear the registry (for testing).
    pub fn clear(&mut self) {
        self.classes.clear();
        self.order.clear();
        self.formats.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
