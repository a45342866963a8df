//! The boundary to the execution collaborator.
//!
//! A [`PipelineBinding`] is everything a collaborator needs to wire a
//! pipeline into a workflow: the typed inputs, parameters and outputs, and
//! the handle to the build method. A [`PipelineRequest`] adds the concrete
//! parameter values for one run. Running it is the collaborator's job,
//! behind the [`PipelineExecutor`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use lineage_declare::MethodRef;
use lineage_foundation::{ClassId, Error, ErrorKind, Result, Type, Value};
use lineage_resolve::{AnalysisSpec, PipelineSpec};
use tracing::warn;

use crate::context::{Provision, ValueProvider};

/// A name paired with the type the build method expects it in.
pub type TypedName = (Arc<str>, Type);

// =============================================================================
// PipelineBinding
// =============================================================================

/// The typed signature of a resolved pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineBinding {
    class: ClassId,
    pipeline: Arc<str>,
    method: MethodRef,
    inputs: Vec<TypedName>,
    parameters: Vec<TypedName>,
    outputs: Vec<TypedName>,
}

impl PipelineBinding {
    /// Binds `pipeline` against the columns and parameters of `spec`.
    ///
    /// An argument annotated on the method keeps its annotated type, which
    /// may differ from the column's stored type; converting between the two
    /// is the collaborator's concern.
    ///
    /// # Errors
    /// Returns `LookupNotFound` if the pipeline refers to a name `spec` does
    /// not declare.
    pub fn new(spec: &AnalysisSpec, pipeline: &PipelineSpec) -> Result<Self> {
        let arg_type = |name: &Arc<str>, declared: &Type| {
            pipeline
                .method
                .arg_type(name)
                .cloned()
                .unwrap_or_else(|| declared.clone())
        };

        let inputs = pipeline
            .inputs
            .iter()
            .map(|name| -> Result<TypedName> {
                Ok((name.clone(), arg_type(name, &spec.column(name)?.ty)))
            })
            .collect::<Result<_>>()?;
        let parameters = pipeline
            .parameters
            .iter()
            .map(|name| -> Result<TypedName> {
                Ok((name.clone(), arg_type(name, &spec.parameter(name)?.ty)))
            })
            .collect::<Result<_>>()?;
        let outputs = pipeline
            .outputs
            .iter()
            .map(|name| -> Result<TypedName> { Ok((name.clone(), spec.column(name)?.ty.clone())) })
            .collect::<Result<_>>()?;

        Ok(Self {
            class: spec.class().clone(),
            pipeline: pipeline.name.clone(),
            method: pipeline.method.clone(),
            inputs,
            parameters,
            outputs,
        })
    }

    /// Returns the analysis class the pipeline was selected from.
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Returns the build method handle.
    #[must_use]
    pub fn method(&self) -> &MethodRef {
        &self.method
    }

    /// Returns the input columns and the types the method expects them in.
    #[must_use]
    pub fn inputs(&self) -> &[TypedName] {
        &self.inputs
    }

    /// Returns the parameters and the types the method expects them in.
    #[must_use]
    pub fn parameters(&self) -> &[TypedName] {
        &self.parameters
    }

    /// Returns the output columns and their stored types.
    #[must_use]
    pub fn outputs(&self) -> &[TypedName] {
        &self.outputs
    }
}

// =============================================================================
// PipelineRequest
// =============================================================================

/// A binding plus the concrete parameter values for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineRequest {
    binding: PipelineBinding,
    values: Vec<(Arc<str>, Value)>,
}

impl PipelineRequest {
    /// Builds the request to run `pipeline` with the values of one run.
    ///
    /// Each parameter takes the run's value if provided, else its default.
    ///
    /// # Errors
    /// Returns `MissingParameter` if a parameter has neither, `TypeMismatch`
    /// if a provided value has the wrong type, and `ConditionEvaluation` if it
    /// is not one of the parameter's choices.
    pub fn new(
        spec: &AnalysisSpec,
        pipeline: &PipelineSpec,
        values: &dyn ValueProvider,
    ) -> Result<Self> {
        let binding = PipelineBinding::new(spec, pipeline)?;
        let mut bound = Vec::with_capacity(pipeline.parameters.len());

        for name in &pipeline.parameters {
            let parameter = spec.parameter(name)?;
            let value = match values.provision(name) {
                Some(Provision::Provided(value)) => value,
                Some(Provision::NotProvided) | None => {
                    parameter.default.clone().ok_or_else(|| {
                        Error::new(ErrorKind::MissingParameter {
                            class: spec.class().clone(),
                            pipeline: pipeline.name.to_string(),
                            parameter: name.to_string(),
                        })
                    })?
                }
            };
            if !parameter.ty.accepts(&value.value_type()) {
                return Err(Error::type_mismatch(parameter.ty.clone(), value.value_type())
                    .with_frame(format!("parameter '{name}' of pipeline '{}'", pipeline.name)));
            }
            if !parameter.allows(&value) {
                return Err(Error::condition(
                    &**name,
                    format!("{value} is not one of the allowed choices"),
                )
                .in_declaration(spec.class(), format!("parameter '{name}'"))
                .with_frame(format!("request for pipeline '{}'", pipeline.name)));
            }
            bound.push((name.clone(), value));
        }

        Ok(Self {
            binding,
            values: bound,
        })
    }

    /// Returns the typed signature.
    #[must_use]
    pub fn binding(&self) -> &PipelineBinding {
        &self.binding
    }

    /// Returns the value bound to a parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, value)| value)
    }

    /// Returns every bound parameter value, in signature order.
    pub fn parameter_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_ref(), v))
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Runs pipeline requests. Implemented by the execution collaborator.
pub trait PipelineExecutor {
    /// The artifact produced for one output column (a file, a handle, ...).
    type Artifact;

    /// Builds and runs the computation, returning artifacts keyed by output
    /// column name.
    ///
    /// # Errors
    /// Implementations return an error when the computation fails.
    fn run(&mut self, request: &PipelineRequest) -> Result<HashMap<Arc<str>, Self::Artifact>>;
}

/// Runs a request and checks that every output column was produced.
///
/// Artifacts keyed by names that are not outputs of the pipeline are
/// discarded.
///
/// # Errors
/// Returns `MissingOutput` for the first output column without an artifact,
/// or the executor's own error.
pub fn execute<E: PipelineExecutor>(
    executor: &mut E,
    request: &PipelineRequest,
) -> Result<HashMap<Arc<str>, E::Artifact>> {
    let binding = request.binding();
    let mut artifacts = executor.run(request)?;

    let mut produced = HashMap::with_capacity(binding.outputs().len());
    for (column, _) in binding.outputs() {
        let artifact = artifacts.remove(column).ok_or_else(|| {
            Error::new(ErrorKind::MissingOutput {
                class: binding.class().clone(),
                pipeline: binding.pipeline().to_string(),
                column: column.to_string(),
            })
        })?;
        produced.insert(column.clone(), artifact);
    }

    for extra in artifacts.keys() {
        warn!(
            pipeline = binding.pipeline(),
            column = %extra,
            "discarding artifact for a column the pipeline does not declare"
        );
    }
    Ok(produced)
}
