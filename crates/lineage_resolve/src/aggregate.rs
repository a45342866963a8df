//! Folds class bodies over their ancestors' resolved specs.
//!
//! With a single base the fold starts from an O(1) snapshot of the base's
//! spec. With several bases the ancestor bodies are folded again in
//! reverse method-resolution order, so the first class in the MRO that
//! declares a name is the one whose declaration takes effect.

use std::sync::Arc;

use lineage_declare::{AttributeDecl, ClassBody, MethodArg, MethodRef};
use lineage_foundation::{ClassId, DataSpace, DeclKind, Error, Result};
use tracing::debug;

use crate::merge::{self, Attribute};
use crate::mro::linearize;
use crate::registry::AnalysisRegistry;
use crate::spec::{AnalysisSpec, CheckSpec, PipelineSpec, SubanalysisSpec, SwitchSpec};

/// Resolves a class body against the classes already in `registry`.
pub(crate) fn resolve(body: &ClassBody, registry: &AnalysisRegistry) -> Result<AnalysisSpec> {
    let class = &body.class;
    let bases = body
        .bases
        .iter()
        .map(|base| registry.spec(base))
        .collect::<Result<Vec<_>>>()?;

    let base_mros: Vec<&[ClassId]> = bases.iter().map(|b| b.mro()).collect();
    let mro = linearize(class, &body.bases, &base_mros)?;
    let space = resolve_space(body, &bases)?;

    let mut spec = match bases.as_slice() {
        [] => AnalysisSpec::new(class.clone(), space),
        [parent] => parent.snapshot_for(class.clone()),
        _ => {
            let mut spec = AnalysisSpec::new(class.clone(), space);
            for ancestor in mro[1..].iter().rev() {
                let entry = registry.entry(ancestor)?;
                fold(&mut spec, &entry.body, entry.spec.mro(), registry)?;
            }
            spec
        }
    };

    fold(&mut spec, body, &mro, registry)?;
    spec.set_lineage(body.bases.clone(), mro);
    validate(&spec)?;

    debug!(
        %class,
        columns = spec.column_names().len(),
        parameters = spec.parameter_names().len(),
        pipelines = spec.pipeline_names().len(),
        "resolved analysis class"
    );
    Ok(spec)
}

fn resolve_space(body: &ClassBody, bases: &[Arc<AnalysisSpec>]) -> Result<DataSpace> {
    let invalid = |message: String| Error::invalid_declaration(&body.class, "space", message);

    let inherited = bases.first().map(|b| b.space().clone());
    if let Some(inherited) = &inherited {
        if let Some(other) = bases.iter().find(|b| b.space() != inherited) {
            return Err(invalid(format!(
                "bases disagree on the data space ({inherited} vs {} in {})",
                other.space(),
                other.class()
            )));
        }
    }

    match (&body.space, inherited) {
        (Some(own), Some(inherited)) if *own != inherited => Err(invalid(format!(
            "declares data space {own} but its bases use {inherited}"
        ))),
        (Some(space), _) => Ok(space.clone()),
        (None, Some(space)) => Ok(space),
        (None, None) => Err(invalid(
            "declares no data space and has no base to inherit one from".to_string(),
        )),
    }
}

/// Folds one class body into `spec`. `mro` is the body's own class's MRO.
///
/// Kinds fold in a fixed order (columns and parameters, then subanalyses,
/// switches, pipelines, checks) whatever order the `ClassBody` calls came
/// in. Declaration order only matters within one kind.
fn fold(
    spec: &mut AnalysisSpec,
    body: &ClassBody,
    mro: &[ClassId],
    registry: &AnalysisRegistry,
) -> Result<()> {
    let class = &body.class;

    for decl in &body.attributes {
        let attribute = match decl {
            AttributeDecl::Column(column) => {
                Attribute::Column(Arc::new(merge::fresh_column(class, spec.space(), column)?))
            }
            AttributeDecl::Parameter(parameter) => {
                Attribute::Parameter(Arc::new(merge::fresh_parameter(class, parameter)?))
            }
            AttributeDecl::Inherited(marker) => {
                if !mro[1..].contains(&marker.from) {
                    return Err(Error::invalid_declaration(
                        class,
                        &*marker.name,
                        format!("inherits from {}, which is not a base of {class}", marker.from),
                    ));
                }
                let base = registry.spec(&marker.from)?;
                merge::inherit(class, marker, &base)?
            }
        };
        check_kind(spec, class, attribute.name(), attribute.kind())?;
        match attribute {
            Attribute::Column(column) => spec.put_column(column),
            Attribute::Parameter(parameter) => spec.put_parameter(parameter),
        }
    }

    for decl in &body.subanalyses {
        check_kind(spec, class, &decl.name, DeclKind::Subanalysis)?;
        let analysis = registry
            .spec(&decl.analysis)
            .map_err(|e| e.with_frame(format!("subanalysis '{}' of {class}", decl.name)))?;
        spec.put_subanalysis(Arc::new(SubanalysisSpec {
            name: decl.name.clone(),
            desc: decl.desc.clone(),
            analysis,
            defined_in: class.clone(),
        }));
    }

    for decl in &body.switches {
        check_kind(spec, class, &decl.name, DeclKind::Switch)?;
        let (inputs, parameters) = split_args(spec, class, &decl.name, &decl.args)?;
        spec.put_switch(Arc::new(SwitchSpec {
            name: decl.name.clone(),
            inputs,
            parameters,
            method: MethodRef::new(class.clone(), decl.name.clone(), decl.args.clone()),
        }));
    }

    for decl in &body.pipelines {
        check_kind(spec, class, &decl.name, DeclKind::Pipeline)?;
        let (inputs, parameters) = split_args(spec, class, &decl.name, &decl.args)?;
        spec.put_pipeline(Arc::new(PipelineSpec {
            name: decl.name.clone(),
            outputs: decl.outputs.clone(),
            inputs,
            parameters,
            condition: decl.condition.clone(),
            switch: decl.switch.clone(),
            method: MethodRef::new(class.clone(), decl.name.clone(), decl.args.clone()),
        }));
    }

    for decl in &body.checks {
        check_kind(spec, class, &decl.name, DeclKind::Check)?;
        let (inputs, parameters) = split_args(spec, class, &decl.name, &decl.args)?;
        spec.put_check(Arc::new(CheckSpec {
            name: decl.name.clone(),
            column: decl.column.clone(),
            salience: decl.salience,
            inputs,
            parameters,
            method: MethodRef::new(class.clone(), decl.name.clone(), decl.args.clone()),
        }));
    }

    Ok(())
}

fn check_kind(spec: &AnalysisSpec, class: &ClassId, name: &str, declared: DeclKind) -> Result<()> {
    match spec.kind_of(name) {
        Some(existing) if existing != declared => {
            Err(Error::kind_conflict(class, name, existing, declared))
        }
        _ => Ok(()),
    }
}

type SplitArgs = (Vec<Arc<str>>, Vec<Arc<str>>);

/// Sorts method arguments into column inputs and parameters.
fn split_args(
    spec: &AnalysisSpec,
    class: &ClassId,
    method: &str,
    args: &[MethodArg],
) -> Result<SplitArgs> {
    let mut inputs = Vec::new();
    let mut parameters = Vec::new();
    for arg in args {
        if spec.has_column(&arg.name) {
            inputs.push(arg.name.clone());
        } else if spec.has_parameter(&arg.name) {
            parameters.push(arg.name.clone());
        } else {
            return Err(Error::invalid_declaration(
                class,
                method,
                format!("argument '{}' names no column or parameter", arg.name),
            ));
        }
    }
    Ok((inputs, parameters))
}

/// Checks the references between declarations once the whole body is folded.
fn validate(spec: &AnalysisSpec) -> Result<()> {
    for pipeline in spec.pipelines() {
        let invalid =
            |message: String| Error::invalid_declaration(pipeline.defined_in(), &*pipeline.name, message);

        if pipeline.outputs.is_empty() {
            return Err(invalid("produces no columns".to_string()));
        }
        if let Some(output) = pipeline.outputs.iter().find(|o| !spec.has_column(o)) {
            return Err(invalid(format!("output '{output}' is not a column")));
        }
        if let Some(condition) = &pipeline.condition {
            if let Some(name) = condition
                .referenced_names()
                .into_iter()
                .find(|n| !spec.has_column(n) && !spec.has_parameter(n))
            {
                return Err(invalid(format!(
                    "condition references '{name}', which is not a column or parameter"
                )));
            }
        }
        if let Some(switch) = &pipeline.switch {
            if spec.switch(&switch.switch).is_err() {
                return Err(invalid(format!(
                    "gated on '{}', which is not a switch",
                    switch.switch
                )));
            }
        }
    }

    for check in spec.checks() {
        if !spec.has_column(&check.column) {
            return Err(Error::invalid_declaration(
                check.defined_in(),
                &*check.name,
                format!("checks '{}', which is not a column", check.column),
            ));
        }
    }
    Ok(())
}
