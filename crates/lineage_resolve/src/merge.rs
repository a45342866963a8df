//! The override resolver.
//!
//! Turns one column or parameter declaration into the spec that takes
//! effect. Fresh declarations are owned by the declaring class. Inherit
//! markers reuse the base's spec, sharing it outright when nothing is
//! overridden, and keep the base's `defined_in` either way.

use std::sync::Arc;

use lineage_declare::{ColumnDecl, InheritDecl, Override, ParameterDecl};
use lineage_foundation::{ClassId, DataSpace, DeclKind, Error, ErrorKind, Result, Type};
use tracing::trace;

use crate::spec::{AnalysisSpec, ColumnSpec, ParameterSpec};

/// A column or parameter ready to be folded into a spec.
pub(crate) enum Attribute {
    Column(Arc<ColumnSpec>),
    Parameter(Arc<ParameterSpec>),
}

impl Attribute {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Column(c) => &c.name,
            Self::Parameter(p) => &p.name,
        }
    }

    pub(crate) fn kind(&self) -> DeclKind {
        match self {
            Self::Column(_) => DeclKind::Column,
            Self::Parameter(_) => DeclKind::Parameter,
        }
    }
}

// =============================================================================
// Fresh Declarations
// =============================================================================

pub(crate) fn fresh_column(
    class: &ClassId,
    space: &DataSpace,
    decl: &ColumnDecl,
) -> Result<ColumnSpec> {
    let row_frequency = match &decl.row_frequency {
        Some(frequency) if space.contains(frequency) => frequency.clone(),
        Some(frequency) => {
            return Err(Error::invalid_declaration(
                class,
                &*decl.name,
                format!("row frequency {frequency} is not a level of data space {space:?}"),
            ));
        }
        None => space.leaf(),
    };
    Ok(ColumnSpec {
        name: decl.name.clone(),
        ty: decl.ty.clone(),
        row_frequency,
        desc: decl.desc.clone(),
        salience: decl.salience,
        defined_in: class.clone(),
    })
}

pub(crate) fn fresh_parameter(class: &ClassId, decl: &ParameterDecl) -> Result<ParameterSpec> {
    let parameter = ParameterSpec {
        name: decl.name.clone(),
        ty: decl.ty.clone(),
        desc: decl.desc.clone(),
        default: decl.default.clone(),
        salience: decl.salience,
        choices: decl.choices.clone(),
        defined_in: class.clone(),
    };
    validate_parameter(class, &parameter)?;
    Ok(parameter)
}

/// Checks that a parameter's default and choices agree with its type.
///
/// `class` is the class being resolved, which may differ from the
/// parameter's owner when an override made the default invalid.
fn validate_parameter(class: &ClassId, parameter: &ParameterSpec) -> Result<()> {
    let invalid = |message: String| Error::invalid_declaration(class, &*parameter.name, message);

    if let Some(choices) = &parameter.choices {
        if choices.is_empty() {
            return Err(invalid("the choice set is empty".to_string()));
        }
        if let Some(bad) = choices
            .iter()
            .find(|c| !parameter.ty.accepts(&c.value_type()))
        {
            return Err(invalid(format!("choice {bad} is not a {}", parameter.ty)));
        }
    }

    if let Some(default) = &parameter.default {
        if !parameter.ty.accepts(&default.value_type()) {
            return Err(invalid(format!(
                "default {default} is not a {}",
                parameter.ty
            )));
        }
        if let Some(choices) = &parameter.choices {
            if !choices.iter().any(|c| c.matches(default)) {
                return Err(invalid(format!(
                    "default {default} is not one of the choices"
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// Inherit Markers
// =============================================================================

/// Resolves an inherit marker against the resolved spec of the base it names.
pub(crate) fn inherit(class: &ClassId, marker: &InheritDecl, base: &AnalysisSpec) -> Result<Attribute> {
    if let Some(column) = base.column_entry(&marker.name) {
        check_restated_type(class, marker, &column.ty)?;
        return inherit_column(class, marker, column).map(Attribute::Column);
    }
    if let Some(parameter) = base.parameter_entry(&marker.name) {
        check_restated_type(class, marker, &parameter.ty)?;
        return inherit_parameter(class, marker, parameter).map(Attribute::Parameter);
    }

    let available = base
        .column_names()
        .into_iter()
        .chain(base.parameter_names())
        .map(String::from)
        .collect();
    Err(Error::new(ErrorKind::UnknownDeclarationReference {
        class: class.clone(),
        name: marker.name.to_string(),
        base: base.class().clone(),
        available,
    }))
}

fn check_restated_type(class: &ClassId, marker: &InheritDecl, inherited: &Type) -> Result<()> {
    match &marker.ty {
        Some(restated) if restated != inherited => Err(Error::invalid_declaration(
            class,
            &*marker.name,
            format!(
                "restates the type as {restated} but {} declares it as {inherited}",
                marker.from
            ),
        )),
        _ => Ok(()),
    }
}

fn not_applicable(class: &ClassId, marker: &InheritDecl, field: &str, kind: DeclKind) -> Error {
    Error::invalid_declaration(
        class,
        &*marker.name,
        format!("cannot override '{field}' of an inherited {kind}"),
    )
}

fn inherit_column(
    class: &ClassId,
    marker: &InheritDecl,
    column: &Arc<ColumnSpec>,
) -> Result<Arc<ColumnSpec>> {
    if marker.is_verbatim() {
        return Ok(Arc::clone(column));
    }

    let mut copy = ColumnSpec::clone(column);
    for o in &marker.overrides {
        match o {
            Override::Description(desc) => copy.desc = desc.clone(),
            Override::ColumnSalience(salience) => copy.salience = *salience,
            other => return Err(not_applicable(class, marker, other.field(), DeclKind::Column)),
        }
        trace!(%class, column = %marker.name, field = o.field(), "applied override");
    }
    Ok(Arc::new(copy))
}

fn inherit_parameter(
    class: &ClassId,
    marker: &InheritDecl,
    parameter: &Arc<ParameterSpec>,
) -> Result<Arc<ParameterSpec>> {
    if marker.is_verbatim() {
        return Ok(Arc::clone(parameter));
    }

    let mut copy = ParameterSpec::clone(parameter);
    for o in &marker.overrides {
        match o {
            Override::Default(value) => copy.default = Some(value.clone()),
            Override::Description(desc) => copy.desc = desc.clone(),
            Override::ParameterSalience(salience) => copy.salience = *salience,
            Override::Choices(choices) => copy.choices = Some(choices.clone()),
            Override::ColumnSalience(_) => {
                return Err(not_applicable(class, marker, o.field(), DeclKind::Parameter));
            }
        }
        trace!(%class, parameter = %marker.name, field = o.field(), "applied override");
    }
    validate_parameter(class, &copy)?;
    Ok(Arc::new(copy))
}
