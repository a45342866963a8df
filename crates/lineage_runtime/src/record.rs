//! The record form of a resolved analysis spec.
//!
//! A [`SpecRecord`] is a plain description of an [`AnalysisSpec`] that can
//! be written out and read back in another process. Each declaration is
//! tagged with its kind and carries the location of the class that
//! authored it. Class and format references are kept as location strings
//! (`<module:Name>`) and resolved back to live classes through a
//! [`ClassResolver`] when the record is rebuilt.

use std::collections::HashMap;
use std::sync::Arc;

use lineage_declare::{Condition, MethodArg, MethodRef, SwitchRef};
use lineage_foundation::{
    CheckSalience, ClassId, ColumnSalience, DataSpace, DeclKind, Error, ErrorKind,
    ParameterSalience, Result, Type, Value,
};
use lineage_resolve::{
    AnalysisSpec, CheckSpec, ColumnSpec, ParameterSpec, PipelineSpec, SubanalysisSpec, SwitchSpec,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::resolver::{ClassResolver, DeserializeOptions};

/// Version of the record layout written by [`to_record`].
pub const RECORD_VERSION: u32 = 1;

// =============================================================================
// Records
// =============================================================================

/// A resolved analysis spec in record form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecRecord {
    /// Layout version.
    pub version: u32,
    /// Location of the analysis class.
    pub class: String,
    /// The data space the analysis is declared over.
    pub space: DataSpace,
    /// Locations of the direct bases.
    pub bases: Vec<String>,
    /// Locations of the method-resolution order, the class itself first.
    pub mro: Vec<String>,
    /// Every declaration, grouped by kind, each kind in declaration order.
    pub declarations: Vec<DeclRecord>,
}

/// One declaration, tagged with its kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum DeclRecord {
    Column(ColumnRecord),
    Parameter(ParameterRecord),
    Pipeline(PipelineRecord),
    Switch(SwitchRecord),
    Check(CheckRecord),
    Subanalysis(SubanalysisRecord),
}

impl DeclRecord {
    /// Returns the declaration kind.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        match self {
            Self::Column(_) => DeclKind::Column,
            Self::Parameter(_) => DeclKind::Parameter,
            Self::Pipeline(_) => DeclKind::Pipeline,
            Self::Switch(_) => DeclKind::Switch,
            Self::Check(_) => DeclKind::Check,
            Self::Subanalysis(_) => DeclKind::Subanalysis,
        }
    }

    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Column(r) => &r.name,
            Self::Parameter(r) => &r.name,
            Self::Pipeline(r) => &r.name,
            Self::Switch(r) => &r.name,
            Self::Check(r) => &r.name,
            Self::Subanalysis(r) => &r.name,
        }
    }

    /// Returns the location of the class whose declaration is in effect.
    #[must_use]
    pub fn defined_in(&self) -> &str {
        match self {
            Self::Column(r) => &r.defined_in,
            Self::Parameter(r) => &r.defined_in,
            Self::Pipeline(r) => &r.defined_in,
            Self::Switch(r) => &r.defined_in,
            Self::Check(r) => &r.defined_in,
            Self::Subanalysis(r) => &r.defined_in,
        }
    }
}

/// A column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Column name.
    pub name: String,
    /// Location of the defining class.
    pub defined_in: String,
    /// Stored type, as written by [`Type`]'s `Display`.
    pub ty: String,
    /// Level of the analysis's data space.
    pub row_frequency: String,
    /// Description.
    pub desc: String,
    /// Importance tier.
    pub salience: ColumnSalience,
}

/// A parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Parameter name.
    pub name: String,
    /// Location of the defining class.
    pub defined_in: String,
    /// Value type.
    pub ty: String,
    /// Description.
    pub desc: String,
    /// Default value.
    pub default: Option<Value>,
    /// Importance tier.
    pub salience: ParameterSalience,
    /// Allowed values.
    pub choices: Option<Vec<Value>>,
}

/// One argument of a method signature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArgRecord {
    /// Argument name.
    pub name: String,
    /// Annotated type, if any.
    pub ty: Option<String>,
}

/// A pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineRecord {
    /// Pipeline name.
    pub name: String,
    /// Location of the class that declared the method.
    pub defined_in: String,
    /// Produced columns.
    pub outputs: Vec<String>,
    /// Column arguments.
    pub inputs: Vec<String>,
    /// Parameter arguments.
    pub parameters: Vec<String>,
    /// Run-time condition.
    pub condition: Option<Condition>,
    /// Switch gating.
    pub switch: Option<SwitchRef>,
    /// Method name.
    pub method: String,
    /// Method signature.
    pub args: Vec<ArgRecord>,
}

/// A switch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchRecord {
    /// Switch name.
    pub name: String,
    /// Location of the class that declared the method.
    pub defined_in: String,
    /// Column arguments.
    pub inputs: Vec<String>,
    /// Parameter arguments.
    pub parameters: Vec<String>,
    /// Method name.
    pub method: String,
    /// Method signature.
    pub args: Vec<ArgRecord>,
}

/// A check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Check name.
    pub name: String,
    /// Location of the class that declared the method.
    pub defined_in: String,
    /// The validated column.
    pub column: String,
    /// Importance tier.
    pub salience: CheckSalience,
    /// Column arguments.
    pub inputs: Vec<String>,
    /// Parameter arguments.
    pub parameters: Vec<String>,
    /// Method name.
    pub method: String,
    /// Method signature.
    pub args: Vec<ArgRecord>,
}

/// A nested analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubanalysisRecord {
    /// Name within the parent.
    pub name: String,
    /// Location of the class that declared the composition.
    pub defined_in: String,
    /// Description.
    pub desc: String,
    /// The nested analysis.
    pub analysis: SpecRecord,
}

// =============================================================================
// Spec -> Record
// =============================================================================

/// Writes a resolved spec out as a record.
#[must_use]
pub fn to_record(spec: &AnalysisSpec) -> SpecRecord {
    let mut declarations = Vec::new();
    declarations.extend(spec.columns().map(|c| DeclRecord::Column(column_record(c))));
    declarations.extend(
        spec.parameters()
            .map(|p| DeclRecord::Parameter(parameter_record(p))),
    );
    declarations.extend(spec.switches().map(|s| DeclRecord::Switch(switch_record(s))));
    declarations.extend(
        spec.pipelines()
            .map(|p| DeclRecord::Pipeline(pipeline_record(p))),
    );
    declarations.extend(spec.checks().map(|c| DeclRecord::Check(check_record(c))));
    declarations.extend(spec.subanalyses().map(|s| {
        DeclRecord::Subanalysis(SubanalysisRecord {
            name: s.name.to_string(),
            defined_in: s.defined_in.location(),
            desc: s.desc.to_string(),
            analysis: to_record(&s.analysis),
        })
    }));

    SpecRecord {
        version: RECORD_VERSION,
        class: spec.class().location(),
        space: spec.space().clone(),
        bases: spec.bases().iter().map(ClassId::location).collect(),
        mro: spec.mro().iter().map(ClassId::location).collect(),
        declarations,
    }
}

fn column_record(column: &ColumnSpec) -> ColumnRecord {
    ColumnRecord {
        name: column.name.to_string(),
        defined_in: column.defined_in.location(),
        ty: column.ty.to_string(),
        row_frequency: column.row_frequency.level().to_string(),
        desc: column.desc.to_string(),
        salience: column.salience,
    }
}

fn parameter_record(parameter: &ParameterSpec) -> ParameterRecord {
    ParameterRecord {
        name: parameter.name.to_string(),
        defined_in: parameter.defined_in.location(),
        ty: parameter.ty.to_string(),
        desc: parameter.desc.to_string(),
        default: parameter.default.clone(),
        salience: parameter.salience,
        choices: parameter.choices.clone(),
    }
}

fn pipeline_record(pipeline: &PipelineSpec) -> PipelineRecord {
    PipelineRecord {
        name: pipeline.name.to_string(),
        defined_in: pipeline.defined_in().location(),
        outputs: strings(&pipeline.outputs),
        inputs: strings(&pipeline.inputs),
        parameters: strings(&pipeline.parameters),
        condition: pipeline.condition.clone(),
        switch: pipeline.switch.clone(),
        method: pipeline.method.name.to_string(),
        args: arg_records(&pipeline.method),
    }
}

fn switch_record(switch: &SwitchSpec) -> SwitchRecord {
    SwitchRecord {
        name: switch.name.to_string(),
        defined_in: switch.defined_in().location(),
        inputs: strings(&switch.inputs),
        parameters: strings(&switch.parameters),
        method: switch.method.name.to_string(),
        args: arg_records(&switch.method),
    }
}

fn check_record(check: &CheckSpec) -> CheckRecord {
    CheckRecord {
        name: check.name.to_string(),
        defined_in: check.defined_in().location(),
        column: check.column.to_string(),
        salience: check.salience,
        inputs: strings(&check.inputs),
        parameters: strings(&check.parameters),
        method: check.method.name.to_string(),
        args: arg_records(&check.method),
    }
}

fn arg_records(method: &MethodRef) -> Vec<ArgRecord> {
    method
        .args
        .iter()
        .map(|arg| ArgRecord {
            name: arg.name.to_string(),
            ty: arg.ty.as_ref().map(ToString::to_string),
        })
        .collect()
}

fn strings(names: &[Arc<str>]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn names(strings: &[String]) -> Vec<Arc<str>> {
    strings.iter().map(|s| Arc::from(s.as_str())).collect()
}

// =============================================================================
// Record -> Spec
// =============================================================================

/// Rebuilds a resolved spec from its record.
///
/// Every class location in the record (the analysis, its bases and MRO,
/// defining classes, method owners, and format types) goes through
/// `resolver`. Under [`DeserializeOptions::permit_unresolved`] a location
/// that does not resolve is kept as written.
///
/// # Errors
/// Returns `SerializationError` for a record of another layout version,
/// `UnresolvedClass` for a class reference that does not resolve (unless
/// permitted), and an error for a malformed type or row frequency.
pub fn from_record(
    record: &SpecRecord,
    resolver: &dyn ClassResolver,
    options: &DeserializeOptions,
) -> Result<AnalysisSpec> {
    Rebuilder {
        resolver,
        options,
        resolved: HashMap::new(),
    }
    .spec(record)
}

struct Rebuilder<'a> {
    resolver: &'a dyn ClassResolver,
    options: &'a DeserializeOptions,
    resolved: HashMap<String, ClassId>,
}

impl Rebuilder<'_> {
    fn spec(&mut self, record: &SpecRecord) -> Result<AnalysisSpec> {
        if record.version != RECORD_VERSION {
            return Err(Error::new(ErrorKind::SerializationError(format!(
                "record of {} has layout version {}, expected {RECORD_VERSION}",
                record.class, record.version
            ))));
        }

        let class = self.class(&record.class)?;
        let bases = self.classes(&record.bases)?;
        let mro = self.classes(&record.mro)?;
        let mut spec = AnalysisSpec::new(class, record.space.clone())
            .with_bases(bases)
            .with_mro(mro);

        for decl in &record.declarations {
            spec = self.declaration(spec, &record.space, decl).map_err(|e| {
                e.with_frame(format!(
                    "rebuilding {} '{}' of {}",
                    decl.kind(),
                    decl.name(),
                    record.class
                ))
            })?;
        }

        debug!(
            class = %spec.class(),
            declarations = record.declarations.len(),
            "rebuilt analysis spec from record"
        );
        Ok(spec)
    }

    fn declaration(
        &mut self,
        spec: AnalysisSpec,
        space: &DataSpace,
        decl: &DeclRecord,
    ) -> Result<AnalysisSpec> {
        Ok(match decl {
            DeclRecord::Column(r) => spec.with_column(ColumnSpec {
                name: r.name.as_str().into(),
                ty: self.ty(&r.ty)?,
                row_frequency: space.frequency(&r.row_frequency)?,
                desc: r.desc.as_str().into(),
                salience: r.salience,
                defined_in: self.class(&r.defined_in)?,
            }),
            DeclRecord::Parameter(r) => spec.with_parameter(ParameterSpec {
                name: r.name.as_str().into(),
                ty: self.ty(&r.ty)?,
                desc: r.desc.as_str().into(),
                default: r.default.clone(),
                salience: r.salience,
                choices: r.choices.clone(),
                defined_in: self.class(&r.defined_in)?,
            }),
            DeclRecord::Switch(r) => spec.with_switch(SwitchSpec {
                name: r.name.as_str().into(),
                inputs: names(&r.inputs),
                parameters: names(&r.parameters),
                method: self.method(&r.defined_in, &r.method, &r.args)?,
            }),
            DeclRecord::Pipeline(r) => spec.with_pipeline(PipelineSpec {
                name: r.name.as_str().into(),
                outputs: names(&r.outputs),
                inputs: names(&r.inputs),
                parameters: names(&r.parameters),
                condition: r.condition.clone(),
                switch: r.switch.clone(),
                method: self.method(&r.defined_in, &r.method, &r.args)?,
            }),
            DeclRecord::Check(r) => spec.with_check(CheckSpec {
                name: r.name.as_str().into(),
                column: r.column.as_str().into(),
                salience: r.salience,
                inputs: names(&r.inputs),
                parameters: names(&r.parameters),
                method: self.method(&r.defined_in, &r.method, &r.args)?,
            }),
            DeclRecord::Subanalysis(r) => spec.with_subanalysis(SubanalysisSpec {
                name: r.name.as_str().into(),
                desc: r.desc.as_str().into(),
                analysis: Arc::new(self.spec(&r.analysis)?),
                defined_in: self.class(&r.defined_in)?,
            }),
        })
    }

    fn method(&mut self, owner: &str, name: &str, args: &[ArgRecord]) -> Result<MethodRef> {
        let owner = self.class(owner)?;
        let mut method_args = Vec::with_capacity(args.len());
        for arg in args {
            method_args.push(match &arg.ty {
                Some(ty) => MethodArg::typed(arg.name.as_str(), self.ty(ty)?),
                None => MethodArg::new(arg.name.as_str()),
            });
        }
        Ok(MethodRef::new(owner, name, method_args))
    }

    fn ty(&mut self, text: &str) -> Result<Type> {
        match text.parse::<Type>()? {
            Type::Format(class) => Ok(Type::Format(self.class(&class.location())?)),
            builtin => Ok(builtin),
        }
    }

    fn classes(&mut self, locations: &[String]) -> Result<Vec<ClassId>> {
        locations.iter().map(|l| self.class(l)).collect()
    }

    fn class(&mut self, location: &str) -> Result<ClassId> {
        if let Some(class) = self.resolved.get(location) {
            return Ok(class.clone());
        }
        let class = match self.resolver.resolve_class(location, &self.options.prefixes) {
            Ok(class) => class,
            Err(err)
                if self.options.permit_unresolved
                    && matches!(err.kind, ErrorKind::UnresolvedClass { .. }) =>
            {
                warn!(location, "keeping unresolved class reference");
                ClassId::parse(location)?
            }
            Err(err) => return Err(err),
        };
        self.resolved.insert(location.to_string(), class.clone());
        Ok(class)
    }
}
