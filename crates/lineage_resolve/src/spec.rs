//! The resolved, flattened specification of one analysis class.
//!
//! An [`AnalysisSpec`] is what every consumer of an analysis sees: the
//! columns and parameters in effect (each with the class that authored it),
//! and the pipelines, switches, checks and subanalyses that survived
//! override resolution. It is immutable once built and cheap to share.

use std::fmt;
use std::sync::Arc;

use lineage_declare::{Condition, MethodRef, SwitchRef};
use lineage_foundation::{
    CheckSalience, ClassId, ColumnSalience, DataSpace, DeclKind, Error, OrderedTable,
    ParameterSalience, Result, RowFrequency, Type, Value,
};

// =============================================================================
// Data Attributes
// =============================================================================

/// A resolved column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    /// Column name, unique within the analysis.
    pub name: Arc<str>,
    /// Stored type.
    pub ty: Type,
    /// The level of the data space the column exists at.
    pub row_frequency: RowFrequency,
    /// Human-readable description.
    pub desc: Arc<str>,
    /// Importance tier.
    pub salience: ColumnSalience,
    /// The class whose declaration content is in effect.
    pub defined_in: ClassId,
}

/// A resolved parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    /// Parameter name, unique within the analysis.
    pub name: Arc<str>,
    /// Value type.
    pub ty: Type,
    /// Human-readable description.
    pub desc: Arc<str>,
    /// Default value, if any.
    pub default: Option<Value>,
    /// Importance tier.
    pub salience: ParameterSalience,
    /// Allowed values, if restricted.
    pub choices: Option<Vec<Value>>,
    /// The class whose declaration content is in effect.
    pub defined_in: ClassId,
}

impl ParameterSpec {
    /// Returns true if `value` has an accepted type and is one of the
    /// choices, when the parameter is restricted.
    #[must_use]
    pub fn allows(&self, value: &Value) -> bool {
        self.ty.accepts(&value.value_type())
            && self
                .choices
                .as_ref()
                .is_none_or(|choices| choices.iter().any(|c| c.matches(value)))
    }
}

// =============================================================================
// Methods
// =============================================================================

/// A resolved pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineSpec {
    /// The declaring method's name.
    pub name: Arc<str>,
    /// Columns the pipeline produces, in registration order.
    pub outputs: Vec<Arc<str>>,
    /// Signature arguments that name columns, in signature order.
    pub inputs: Vec<Arc<str>>,
    /// Signature arguments that name parameters, in signature order.
    pub parameters: Vec<Arc<str>>,
    /// Run-time condition.
    pub condition: Option<Condition>,
    /// Switch gating.
    pub switch: Option<SwitchRef>,
    /// The underlying build method.
    pub method: MethodRef,
}

impl PipelineSpec {
    /// Returns the class that declared the pipeline.
    #[must_use]
    pub fn defined_in(&self) -> &ClassId {
        &self.method.owner
    }

    /// Returns true if the pipeline is registered to produce `column`.
    #[must_use]
    pub fn produces(&self, column: &str) -> bool {
        self.outputs.iter().any(|o| o.as_ref() == column)
    }
}

/// A resolved switch.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchSpec {
    /// The declaring method's name.
    pub name: Arc<str>,
    /// Signature arguments that name columns.
    pub inputs: Vec<Arc<str>>,
    /// Signature arguments that name parameters.
    pub parameters: Vec<Arc<str>>,
    /// The underlying evaluation method.
    pub method: MethodRef,
}

impl SwitchSpec {
    /// Returns the class that declared the switch.
    #[must_use]
    pub fn defined_in(&self) -> &ClassId {
        &self.method.owner
    }
}

/// A resolved check.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckSpec {
    /// The declaring method's name.
    pub name: Arc<str>,
    /// The column being validated.
    pub column: Arc<str>,
    /// Importance tier.
    pub salience: CheckSalience,
    /// Signature arguments that name columns.
    pub inputs: Vec<Arc<str>>,
    /// Signature arguments that name parameters.
    pub parameters: Vec<Arc<str>>,
    /// The underlying evaluation method.
    pub method: MethodRef,
}

impl CheckSpec {
    /// Returns the class that declared the check.
    #[must_use]
    pub fn defined_in(&self) -> &ClassId {
        &self.method.owner
    }
}

/// A nested analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct SubanalysisSpec {
    /// Name of the nested analysis within its parent.
    pub name: Arc<str>,
    /// Human-readable description.
    pub desc: Arc<str>,
    /// The nested analysis's own resolved spec.
    pub analysis: Arc<AnalysisSpec>,
    /// The class that declared the composition.
    pub defined_in: ClassId,
}

// =============================================================================
// AnalysisSpec
// =============================================================================

/// The resolved specification of one analysis class.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisSpec {
    class: ClassId,
    space: DataSpace,
    bases: Arc<[ClassId]>,
    mro: Arc<[ClassId]>,
    columns: OrderedTable<Arc<ColumnSpec>>,
    parameters: OrderedTable<Arc<ParameterSpec>>,
    pipelines: OrderedTable<Arc<PipelineSpec>>,
    switches: OrderedTable<Arc<SwitchSpec>>,
    checks: OrderedTable<Arc<CheckSpec>>,
    subanalyses: OrderedTable<Arc<SubanalysisSpec>>,
}

impl AnalysisSpec {
    /// Creates an empty spec for a class with no bases.
    ///
    /// Specs are normally produced by registering a class body; this
    /// constructor and the `with_*` builders exist to reassemble a spec
    /// that was resolved elsewhere.
    #[must_use]
    pub fn new(class: ClassId, space: DataSpace) -> Self {
        Self {
            mro: Arc::from(vec![class.clone()]),
            class,
            space,
            bases: Arc::from(Vec::new()),
            columns: OrderedTable::new(),
            parameters: OrderedTable::new(),
            pipelines: OrderedTable::new(),
            switches: OrderedTable::new(),
            checks: OrderedTable::new(),
            subanalyses: OrderedTable::new(),
        }
    }

    /// Sets the direct bases.
    #[must_use]
    pub fn with_bases(mut self, bases: Vec<ClassId>) -> Self {
        self.bases = bases.into();
        self
    }

    /// Sets the method-resolution order (the class itself first).
    #[must_use]
    pub fn with_mro(mut self, mro: Vec<ClassId>) -> Self {
        self.mro = mro.into();
        self
    }

    /// Adds or replaces a column.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.put_column(Arc::new(column));
        self
    }

    /// Adds or replaces a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.put_parameter(Arc::new(parameter));
        self
    }

    /// Adds or replaces a pipeline.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineSpec) -> Self {
        self.put_pipeline(Arc::new(pipeline));
        self
    }

    /// Adds or replaces a switch.
    #[must_use]
    pub fn with_switch(mut self, switch: SwitchSpec) -> Self {
        self.put_switch(Arc::new(switch));
        self
    }

    /// Adds or replaces a check.
    #[must_use]
    pub fn with_check(mut self, check: CheckSpec) -> Self {
        self.put_check(Arc::new(check));
        self
    }

    /// Adds or replaces a subanalysis.
    #[must_use]
    pub fn with_subanalysis(mut self, subanalysis: SubanalysisSpec) -> Self {
        self.put_subanalysis(Arc::new(subanalysis));
        self
    }

    // -------------------------------------------------------------------------
    // Crate-internal folding
    // -------------------------------------------------------------------------

    /// Takes an O(1) snapshot of this spec to fold a derived class over.
    pub(crate) fn snapshot_for(&self, class: ClassId) -> Self {
        Self {
            mro: Arc::from(vec![class.clone()]),
            class,
            bases: Arc::from(Vec::new()),
            ..self.clone()
        }
    }

    pub(crate) fn set_lineage(&mut self, bases: Vec<ClassId>, mro: Vec<ClassId>) {
        self.bases = bases.into();
        self.mro = mro.into();
    }

    pub(crate) fn column_entry(&self, name: &str) -> Option<&Arc<ColumnSpec>> {
        self.columns.get(name)
    }

    pub(crate) fn parameter_entry(&self, name: &str) -> Option<&Arc<ParameterSpec>> {
        self.parameters.get(name)
    }

    pub(crate) fn put_column(&mut self, column: Arc<ColumnSpec>) {
        self.columns = self.columns.insert(column.name.clone(), column);
    }

    pub(crate) fn put_parameter(&mut self, parameter: Arc<ParameterSpec>) {
        self.parameters = self.parameters.insert(parameter.name.clone(), parameter);
    }

    pub(crate) fn put_pipeline(&mut self, pipeline: Arc<PipelineSpec>) {
        self.pipelines = self.pipelines.insert(pipeline.name.clone(), pipeline);
    }

    pub(crate) fn put_switch(&mut self, switch: Arc<SwitchSpec>) {
        self.switches = self.switches.insert(switch.name.clone(), switch);
    }

    pub(crate) fn put_check(&mut self, check: Arc<CheckSpec>) {
        self.checks = self.checks.insert(check.name.clone(), check);
    }

    pub(crate) fn put_subanalysis(&mut self, subanalysis: Arc<SubanalysisSpec>) {
        self.subanalyses = self
            .subanalyses
            .insert(subanalysis.name.clone(), subanalysis);
    }

    // -------------------------------------------------------------------------
    // Query surface
    // -------------------------------------------------------------------------

    /// Returns the class this spec was resolved for.
    #[must_use]
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Returns the data space the analysis operates over.
    #[must_use]
    pub fn space(&self) -> &DataSpace {
        &self.space
    }

    /// Returns the direct bases in declaration order.
    #[must_use]
    pub fn bases(&self) -> &[ClassId] {
        &self.bases
    }

    /// Returns the method-resolution order, this class first.
    #[must_use]
    pub fn mro(&self) -> &[ClassId] {
        &self.mro
    }

    /// Returns true if `class` is this class or one of its ancestors.
    #[must_use]
    pub fn is_subclass_of(&self, class: &ClassId) -> bool {
        self.mro.contains(class)
    }

    /// Returns the column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.names().collect()
    }

    /// Returns the parameter names in declaration order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.names().collect()
    }

    /// Returns the pipeline names in declaration order.
    #[must_use]
    pub fn pipeline_names(&self) -> Vec<&str> {
        self.pipelines.names().collect()
    }

    /// Returns the switch names in declaration order.
    #[must_use]
    pub fn switch_names(&self) -> Vec<&str> {
        self.switches.names().collect()
    }

    /// Returns the check names in declaration order.
    #[must_use]
    pub fn check_names(&self) -> Vec<&str> {
        self.checks.names().collect()
    }

    /// Returns the subanalysis names in declaration order.
    #[must_use]
    pub fn subanalysis_names(&self) -> Vec<&str> {
        self.subanalyses.names().collect()
    }

    /// Looks up a column.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid column names.
    pub fn column(&self, name: &str) -> Result<&ColumnSpec> {
        self.lookup(&self.columns, DeclKind::Column, name)
    }

    /// Looks up a parameter.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid parameter names.
    pub fn parameter(&self, name: &str) -> Result<&ParameterSpec> {
        self.lookup(&self.parameters, DeclKind::Parameter, name)
    }

    /// Looks up a pipeline.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid pipeline names.
    pub fn pipeline(&self, name: &str) -> Result<&PipelineSpec> {
        self.lookup(&self.pipelines, DeclKind::Pipeline, name)
    }

    /// Looks up a switch.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid switch names.
    pub fn switch(&self, name: &str) -> Result<&SwitchSpec> {
        self.lookup(&self.switches, DeclKind::Switch, name)
    }

    /// Looks up a check.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid check names.
    pub fn check(&self, name: &str) -> Result<&CheckSpec> {
        self.lookup(&self.checks, DeclKind::Check, name)
    }

    /// Looks up a subanalysis.
    ///
    /// # Errors
    /// Returns `LookupNotFound` listing the valid subanalysis names.
    pub fn subanalysis(&self, name: &str) -> Result<&SubanalysisSpec> {
        self.lookup(&self.subanalyses, DeclKind::Subanalysis, name)
    }

    fn lookup<'a, T>(
        &'a self,
        table: &'a OrderedTable<Arc<T>>,
        kind: DeclKind,
        name: &str,
    ) -> Result<&'a T> {
        table
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| Error::lookup_not_found(&self.class, kind, name, table.names()))
    }

    /// Returns true if the analysis has a column named `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Returns true if the analysis has a parameter named `name`.
    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    /// Returns the kind of declaration `name` refers to, if any.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DeclKind> {
        if self.columns.contains(name) {
            Some(DeclKind::Column)
        } else if self.parameters.contains(name) {
            Some(DeclKind::Parameter)
        } else if self.pipelines.contains(name) {
            Some(DeclKind::Pipeline)
        } else if self.switches.contains(name) {
            Some(DeclKind::Switch)
        } else if self.checks.contains(name) {
            Some(DeclKind::Check)
        } else if self.subanalyses.contains(name) {
            Some(DeclKind::Subanalysis)
        } else {
            None
        }
    }

    /// Iterates over the columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values().map(Arc::as_ref)
    }

    /// Iterates over the parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.values().map(Arc::as_ref)
    }

    /// Iterates over the pipelines in declaration order.
    pub fn pipelines(&self) -> impl Iterator<Item = &PipelineSpec> {
        self.pipelines.values().map(Arc::as_ref)
    }

    /// Iterates over the switches in declaration order.
    pub fn switches(&self) -> impl Iterator<Item = &SwitchSpec> {
        self.switches.values().map(Arc::as_ref)
    }

    /// Iterates over the checks in declaration order.
    pub fn checks(&self) -> impl Iterator<Item = &CheckSpec> {
        self.checks.values().map(Arc::as_ref)
    }

    /// Iterates over the subanalyses in declaration order.
    pub fn subanalyses(&self) -> impl Iterator<Item = &SubanalysisSpec> {
        self.subanalyses.values().map(Arc::as_ref)
    }

    /// Returns every pipeline registered to produce `column`, in
    /// declaration order.
    ///
    /// # Errors
    /// Returns `LookupNotFound` if `column` is not a column.
    pub fn pipelines_for(&self, column: &str) -> Result<Vec<&PipelineSpec>> {
        self.column(column)?;
        Ok(self.pipelines().filter(|p| p.produces(column)).collect())
    }

    /// Returns the checks that validate `column`, in declaration order.
    pub fn checks_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CheckSpec> {
        self.checks().filter(move |c| c.column.as_ref() == column)
    }
}

// =============================================================================
// Summary
// =============================================================================

fn write_list(f: &mut fmt::Formatter<'_>, names: &[Arc<str>]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{name}")?;
    }
    Ok(())
}

impl fmt::Display for AnalysisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} over {}", self.class, self.space)?;
        if !self.bases.is_empty() {
            write!(f, "  bases: ")?;
            for (i, base) in self.bases.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{base}")?;
            }
            writeln!(f)?;
        }

        if !self.columns.is_empty() {
            writeln!(f, "  columns:")?;
            for c in self.columns() {
                writeln!(
                    f,
                    "    {}: {} @ {} [{}] ({})",
                    c.name, c.ty, c.row_frequency, c.salience, c.defined_in
                )?;
            }
        }

        if !self.parameters.is_empty() {
            writeln!(f, "  parameters:")?;
            for p in self.parameters() {
                write!(f, "    {}: {}", p.name, p.ty)?;
                if let Some(default) = &p.default {
                    write!(f, " = {default}")?;
                }
                writeln!(f, " [{}] ({})", p.salience, p.defined_in)?;
            }
        }

        if !self.pipelines.is_empty() {
            writeln!(f, "  pipelines:")?;
            for p in self.pipelines() {
                write!(f, "    {}(", p.name)?;
                write_list(f, &p.inputs)?;
                write!(f, "; ")?;
                write_list(f, &p.parameters)?;
                write!(f, ") -> (")?;
                write_list(f, &p.outputs)?;
                write!(f, ")")?;
                if let Some(switch) = &p.switch {
                    write!(f, " when {}", switch.switch)?;
                }
                if let Some(condition) = &p.condition {
                    write!(f, " if {condition}")?;
                }
                writeln!(f, " ({})", p.defined_in())?;
            }
        }

        if !self.switches.is_empty() {
            writeln!(f, "  switches:")?;
            for s in self.switches() {
                writeln!(f, "    {}", s.method)?;
            }
        }

        if !self.checks.is_empty() {
            writeln!(f, "  checks:")?;
            for c in self.checks() {
                writeln!(f, "    {} on {} [{}]", c.name, c.column, c.salience)?;
            }
        }

        if !self.subanalyses.is_empty() {
            writeln!(f, "  subanalyses:")?;
            for s in self.subanalyses() {
                writeln!(f, "    {}: {}", s.name, s.analysis.class())?;
            }
        }
        Ok(())
    }
}
