//! Pipeline selection.
//!
//! For a requested column the selector runs a small state machine over the
//! pipelines registered to produce it:
//!
//! ```text
//! candidates -> filter by switch value -> filter by condition -> exactly one?
//!                                                                 |- one:  selected
//!                                                                 |- none: UnresolvablePipeline
//!                                                                 |- many: AmbiguousPipeline
//! ```
//!
//! Every rejected candidate is recorded with the reason it was rejected.

use std::collections::HashMap;
use std::sync::Arc;

use lineage_foundation::{Candidate, Error, ErrorKind, Rejection, Result, Value};
use lineage_resolve::{AnalysisSpec, PipelineSpec};
use tracing::debug;

use crate::binding::PipelineRequest;
use crate::context::ValueProvider;
use crate::eval::evaluate;
use crate::switch::SwitchEvaluator;

/// Switch results computed during one selection call.
type SwitchCache = HashMap<Arc<str>, Value>;

/// Selects the active pipeline for columns of one analysis, for one run.
pub struct PipelineSelector<'a> {
    spec: &'a AnalysisSpec,
    values: &'a dyn ValueProvider,
    switches: Option<&'a dyn SwitchEvaluator>,
}

impl<'a> PipelineSelector<'a> {
    /// Creates a selector over `spec` for the run described by `values`.
    #[must_use]
    pub fn new(spec: &'a AnalysisSpec, values: &'a dyn ValueProvider) -> Self {
        Self {
            spec,
            values,
            switches: None,
        }
    }

    /// Supplies the evaluator for switch-gated pipelines.
    #[must_use]
    pub fn with_switches(mut self, switches: &'a dyn SwitchEvaluator) -> Self {
        self.switches = Some(switches);
        self
    }

    /// Selects the single pipeline that produces `column` for this run.
    ///
    /// # Errors
    /// Returns `LookupNotFound` if `column` is not a column,
    /// `UnresolvablePipeline` if no candidate survives, `AmbiguousPipeline`
    /// if several do, and `ConditionEvaluation` if a switch or condition
    /// cannot be evaluated.
    pub fn select(&self, column: &str) -> Result<&'a PipelineSpec> {
        self.select_cached(column, &mut SwitchCache::new())
    }

    /// Selects the pipelines producing each of `columns`.
    ///
    /// A pipeline producing several of the columns appears once. Each switch
    /// is evaluated at most once across all columns.
    ///
    /// # Errors
    /// Fails on the first column that cannot be resolved, as [`select`](Self::select).
    pub fn select_all<'c, I>(&self, columns: I) -> Result<Vec<&'a PipelineSpec>>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let mut cache = SwitchCache::new();
        let mut selected: Vec<&'a PipelineSpec> = Vec::new();
        for column in columns {
            let pipeline = self.select_cached(column, &mut cache)?;
            if !selected.iter().any(|p| p.name == pipeline.name) {
                selected.push(pipeline);
            }
        }
        Ok(selected)
    }

    /// Selects the pipeline for `column` and builds the request to run it.
    ///
    /// # Errors
    /// Fails as [`select`](Self::select), or if a parameter the pipeline
    /// needs has no value.
    pub fn request(&self, column: &str) -> Result<PipelineRequest> {
        let pipeline = self.select(column)?;
        PipelineRequest::new(self.spec, pipeline, self.values)
    }

    fn select_cached(&self, column: &str, cache: &mut SwitchCache) -> Result<&'a PipelineSpec> {
        let spec = self.spec;
        let mut rejected = Vec::new();

        // Switch filter
        let mut gated = Vec::new();
        for pipeline in spec.pipelines_for(column)? {
            let Some(gate) = &pipeline.switch else {
                gated.push(pipeline);
                continue;
            };
            let value = self.switch_value(&gate.switch, cache)?;
            if gate.selects(&value) {
                gated.push(pipeline);
            } else {
                rejected.push(Rejection {
                    pipeline: pipeline.name.to_string(),
                    reason: format!(
                        "switch '{}' evaluated to {value}, not {}",
                        gate.switch,
                        gate.values
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" or ")
                    ),
                });
            }
        }

        // Condition filter
        let mut survivors = Vec::new();
        for pipeline in gated {
            let Some(condition) = &pipeline.condition else {
                survivors.push(pipeline);
                continue;
            };
            let holds = evaluate(condition, self.values).map_err(|e| {
                e.in_declaration(spec.class(), format!("pipeline '{}'", pipeline.name))
                    .with_frame(format!("selecting a pipeline for '{column}'"))
            })?;
            if holds {
                survivors.push(pipeline);
            } else {
                rejected.push(Rejection {
                    pipeline: pipeline.name.to_string(),
                    reason: format!("condition {condition} is false"),
                });
            }
        }

        match survivors.as_slice() {
            [selected] => {
                debug!(
                    class = %spec.class(),
                    column,
                    pipeline = %selected.name,
                    rejected = rejected.len(),
                    "selected pipeline"
                );
                Ok(*selected)
            }
            [] => Err(Error::new(ErrorKind::UnresolvablePipeline {
                class: spec.class().clone(),
                column: column.to_string(),
                rejected,
            })),
            many => Err(Error::new(ErrorKind::AmbiguousPipeline {
                class: spec.class().clone(),
                column: column.to_string(),
                candidates: many
                    .iter()
                    .map(|p| Candidate {
                        pipeline: p.name.to_string(),
                        outputs: p.outputs.iter().map(ToString::to_string).collect(),
                    })
                    .collect(),
            })),
        }
    }

    fn switch_value(&self, name: &Arc<str>, cache: &mut SwitchCache) -> Result<Value> {
        if let Some(value) = cache.get(name) {
            return Ok(value.clone());
        }
        let class = self.spec.class();
        let switch = self.spec.switch(name)?;
        let evaluator = self.switches.ok_or_else(|| {
            Error::condition(&**name, "pipelines are gated on it but no switch evaluator was supplied")
                .in_declaration(class, format!("switch '{name}'"))
        })?;
        let value = evaluator
            .evaluate(switch, self.values)
            .map_err(|e| e.in_declaration(class, format!("switch '{name}'")))?;
        cache.insert(name.clone(), value.clone());
        Ok(value)
    }
}
