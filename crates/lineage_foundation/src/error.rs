//! Error types for the Lineage system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! configuration error names the analysis class and the declaration involved,
//! so a specification author can fix the declaration without reading source.

use std::fmt;

use thiserror::Error;

use crate::class::ClassId;
use crate::types::Type;

/// The main error type for Lineage operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds a frame to this error's context, creating the context if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates an invalid declaration error.
    #[must_use]
    pub fn invalid_declaration(
        class: &ClassId,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidDeclaration {
            class: class.clone(),
            name: name.into(),
            message: message.into(),
        })
    }

    /// Creates a lookup-not-found error listing the valid names.
    #[must_use]
    pub fn lookup_not_found<'a>(
        class: &ClassId,
        kind: DeclKind,
        name: impl Into<String>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(ErrorKind::LookupNotFound {
            class: class.clone(),
            kind,
            name: name.into(),
            available: available.into_iter().map(String::from).collect(),
        })
    }

    /// Creates a declaration kind conflict error.
    #[must_use]
    pub fn kind_conflict(
        class: &ClassId,
        name: impl Into<String>,
        existing: DeclKind,
        declared: DeclKind,
    ) -> Self {
        Self::new(ErrorKind::DeclarationKindConflict {
            class: class.clone(),
            name: name.into(),
            existing,
            declared,
        })
    }

    /// Creates a condition evaluation error.
    #[must_use]
    pub fn condition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConditionEvaluation {
            class: None,
            declaration: None,
            name: name.into(),
            message: message.into(),
        })
    }

    /// Names the class and declaration an evaluation error arose in.
    ///
    /// Only fills a `ConditionEvaluation` that does not name one yet, so the
    /// innermost site wins; other kinds already name their class.
    #[must_use]
    pub fn in_declaration(mut self, owner: &ClassId, site: impl Into<String>) -> Self {
        if let ErrorKind::ConditionEvaluation {
            class, declaration, ..
        } = &mut self.kind
        {
            if class.is_none() {
                *class = Some(owner.clone());
                *declaration = Some(site.into());
            }
        }
        self
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Returns true if this error was caused by a specification defect rather
    /// than by the supplied run context.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::ConditionEvaluation { .. }
                | ErrorKind::UnresolvablePipeline { .. }
                | ErrorKind::MissingParameter { .. }
                | ErrorKind::MissingOutput { .. }
                | ErrorKind::SerializationError(_)
                | ErrorKind::IoError(_)
        )
    }
}

/// The six kinds of declaration an analysis can make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeclKind {
    /// A typed data column.
    Column,
    /// A typed configuration parameter.
    Parameter,
    /// A computation producing columns.
    Pipeline,
    /// A computation returning a discriminator value.
    Switch,
    /// A validation computation over a column.
    Check,
    /// A nested analysis.
    Subanalysis,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Column => "column",
            Self::Parameter => "parameter",
            Self::Pipeline => "pipeline",
            Self::Switch => "switch",
            Self::Check => "check",
            Self::Subanalysis => "subanalysis",
        };
        f.write_str(name)
    }
}

/// A pipeline that was considered for a column and rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Name of the rejected pipeline.
    pub pipeline: String,
    /// Why it was rejected.
    pub reason: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pipeline, self.reason)
    }
}

/// A pipeline that survived selection alongside others.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Name of the surviving pipeline.
    pub pipeline: String,
    /// Every column the pipeline is registered to produce.
    pub outputs: Vec<String>,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ({})", self.pipeline, self.outputs.join(", "))
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[allow(clippy::ref_option)]
fn located(class: &Option<ClassId>, declaration: &Option<String>) -> String {
    match (class, declaration) {
        (Some(class), Some(declaration)) => format!("{class}: {declaration}: "),
        (Some(class), None) => format!("{class}: "),
        (None, Some(declaration)) => format!("{declaration}: "),
        (None, None) => String::new(),
    }
}

fn join_names(names: &[String]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names.join(", ")
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An inherit marker names a declaration absent from the referenced base.
    #[error(
        "{class}: '{name}' is inherited from {base}, which declares no such attribute (available: {})",
        join_names(.available)
    )]
    UnknownDeclarationReference {
        /// The class making the inherit marker.
        class: ClassId,
        /// The inherited declaration name.
        name: String,
        /// The base class the marker refers to.
        base: ClassId,
        /// Names the base does declare.
        available: Vec<String>,
    },

    /// The same name is declared as two different kinds.
    #[error("{class}: '{name}' is declared as a {declared} but is already a {existing}")]
    DeclarationKindConflict {
        /// The class where the conflict surfaced.
        class: ClassId,
        /// The conflicting name.
        name: String,
        /// The kind already in effect.
        existing: DeclKind,
        /// The kind of the new declaration.
        declared: DeclKind,
    },

    /// No candidate pipeline survives selection for a column.
    #[error(
        "{class}: no pipeline can produce column '{column}' for this run (rejected: {})",
        join(.rejected)
    )]
    UnresolvablePipeline {
        /// The analysis class.
        class: ClassId,
        /// The requested column.
        column: String,
        /// Every candidate and why it was rejected.
        rejected: Vec<Rejection>,
    },

    /// More than one candidate pipeline survives selection for a column.
    #[error(
        "{class}: ambiguous pipelines for column '{column}': {} all apply",
        join(.candidates)
    )]
    AmbiguousPipeline {
        /// The analysis class.
        class: ClassId,
        /// The requested column.
        column: String,
        /// The surviving candidates and their outputs.
        candidates: Vec<Candidate>,
    },

    /// A condition or switch could not be evaluated against the run context.
    #[error(
        "{}cannot evaluate condition on '{name}': {message}",
        located(.class, .declaration)
    )]
    ConditionEvaluation {
        /// The analysis class, once known.
        class: Option<ClassId>,
        /// The declaration whose condition or switch failed, e.g.
        /// `pipeline 'reverse_concat_pipeline'`.
        declaration: Option<String>,
        /// The referenced name.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// A query for a declaration that does not exist.
    #[error("{class} has no {kind} named '{name}' (valid names: {})", join_names(.available))]
    LookupNotFound {
        /// The analysis class queried.
        class: ClassId,
        /// The kind of declaration requested.
        kind: DeclKind,
        /// The requested name.
        name: String,
        /// The names of that kind that do exist.
        available: Vec<String>,
    },

    /// A declaration is malformed or references something it may not.
    #[error("{class}: invalid declaration '{name}': {message}")]
    InvalidDeclaration {
        /// The declaring class.
        class: ClassId,
        /// The declaration name.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// A class was referenced before it was defined.
    #[error("unknown analysis class {0}")]
    UnknownClass(ClassId),

    /// A class was defined twice.
    #[error("analysis class {0} is already defined")]
    DuplicateClass(ClassId),

    /// No consistent method-resolution order exists for a class.
    #[error("{class}: cannot linearize bases ({})", join_names(.bases))]
    InconsistentHierarchy {
        /// The class being defined.
        class: ClassId,
        /// Its declared bases.
        bases: Vec<String>,
    },

    /// A class location string is malformed.
    #[error("invalid class location '{0}': expected 'module:Name'")]
    InvalidClassLocation(String),

    /// A class location did not resolve to a known class.
    #[error("did not find class at '{location}' or under any of the prefixes ({})", join_names(.prefixes))]
    UnresolvedClass {
        /// The location that failed to resolve.
        location: String,
        /// The prefixes that were tried.
        prefixes: Vec<String>,
    },

    /// Type mismatch between a declared type and a value or redeclaration.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// A parameter needed by a pipeline has neither a run value nor a default.
    #[error("{class}: pipeline '{pipeline}' needs parameter '{parameter}', which has no value or default")]
    MissingParameter {
        /// The analysis class.
        class: ClassId,
        /// The pipeline being requested.
        pipeline: String,
        /// The missing parameter.
        parameter: String,
    },

    /// An executed pipeline did not return an artifact for one of its outputs.
    #[error("{class}: pipeline '{pipeline}' did not produce output column '{column}'")]
    MissingOutput {
        /// The analysis class.
        class: ClassId,
        /// The executed pipeline.
        pipeline: String,
        /// The missing output column.
        column: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source of the declaration (class or file).
    pub source: Option<String>,
    /// Stack of resolution steps that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
