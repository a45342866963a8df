//! Shared analysis fixtures: a small concatenation analysis and two
//! subclasses that extend and override it.

#![allow(dead_code)]

use std::sync::Arc;

use lineage_declare::{
    CheckDecl, ClassBody, ColumnDecl, InheritDecl, ParameterDecl, PipelineDecl, SwitchDecl,
    inherited_from, is_provided, value_of,
};
use lineage_foundation::{
    CheckSalience, ClassId, ColumnSalience, DataSpace, ParameterSalience, Type,
};
use lineage_resolve::{AnalysisRegistry, AnalysisSpec};

pub fn samples() -> DataSpace {
    DataSpace::new("samples", ["dataset", "sample"]).unwrap()
}

pub fn text() -> Type {
    Type::format("fixtures.formats", "Text")
}

pub fn zip() -> Type {
    Type::format("fixtures.formats", "Zip")
}

pub fn concat() -> ClassId {
    ClassId::new("fixtures.concat", "Concat")
}

pub fn extended_concat() -> ClassId {
    ClassId::new("fixtures.concat", "ExtendedConcat")
}

pub fn overriden_concat() -> ClassId {
    ClassId::new("fixtures.concat", "OverridenConcat")
}

pub fn concat_body() -> ClassBody {
    ClassBody::new(concat())
        .space(samples())
        .column(
            ColumnDecl::new("file1", zip(), "an arbitrary text file")
                .salience(ColumnSalience::Primary),
        )
        .column(
            ColumnDecl::new("file2", text(), "another arbitrary text file")
                .salience(ColumnSalience::Primary),
        )
        .column(ColumnDecl::new(
            "concatenated",
            text(),
            "the output of concatenating file1 and file2",
        ))
        .parameter(
            ParameterDecl::new(
                "duplicates",
                Type::Int,
                "the number of times to duplicate the concatenation",
            )
            .default(1),
        )
        .pipeline(
            PipelineDecl::new("concat_pipeline")
                .output("concatenated")
                .typed_arg("file1", text())
                .typed_arg("file2", text())
                .typed_arg("duplicates", Type::Int),
        )
}

pub fn extended_body() -> ClassBody {
    ClassBody::new(extended_concat())
        .extends(&concat())
        .inherit(inherited_from("concatenated", &concat()))
        .column(
            ColumnDecl::new("file3", text(), "another file to concatenate")
                .salience(ColumnSalience::Primary),
        )
        .column(ColumnDecl::new(
            "doubly_concatenated",
            text(),
            "the doubly concatenated file",
        ))
        .inherit(inherited_from("duplicates", &concat()))
        .parameter(
            ParameterDecl::new(
                "second_duplicates",
                Type::Int,
                "the number of times to duplicate the second concatenation",
            )
            .default(1),
        )
        .pipeline(
            PipelineDecl::new("doubly_concat_pipeline")
                .output("doubly_concatenated")
                .typed_arg("concatenated", text())
                .typed_arg("file3", text())
                .typed_arg("second_duplicates", Type::Int),
        )
        .check(
            CheckDecl::new("num_lines_check", "file3")
                .salience(CheckSalience::Recommended)
                .typed_arg("file3", text())
                .typed_arg("duplicates", Type::Int),
        )
}

pub fn overriden_body() -> ClassBody {
    ClassBody::new(overriden_concat())
        .extends(&concat())
        .inherit(InheritDecl::new("file1", concat()).typed(zip()))
        .inherit(InheritDecl::new("file2", concat()).typed(text()))
        .inherit(InheritDecl::new("concatenated", concat()).typed(text()))
        .column(ColumnDecl::new(
            "multiplied",
            text(),
            "contents of the concatenated files are multiplied",
        ))
        .inherit(InheritDecl::new("duplicates", concat()).default(2))
        .parameter(
            ParameterDecl::new("multiplier", Type::Int, "the multiplier used to apply")
                .salience(ParameterSalience::Arbitrary),
        )
        .parameter(
            ParameterDecl::new(
                "order",
                Type::Str,
                "perform the concatenation in reverse order, i.e. file2 and then file1",
            )
            .choices(["forward", "reversed"])
            .default("forward"),
        )
        .switch(
            SwitchDecl::new("inputs_are_numeric")
                .typed_arg("file1", text())
                .typed_arg("file2", text()),
        )
        .pipeline(
            PipelineDecl::new("concat_pipeline")
                .output("concatenated")
                .typed_arg("file1", text())
                .typed_arg("file2", text())
                .typed_arg("duplicates", Type::Int)
                .condition(value_of("order").equals("forward")),
        )
        .pipeline(
            PipelineDecl::new("reverse_concat_pipeline")
                .output("concatenated")
                .typed_arg("file1", text())
                .typed_arg("file2", text())
                .typed_arg("duplicates", Type::Int)
                .condition(
                    value_of("order").equals("reversed")
                        & is_provided("file1")
                        & value_of("multiplier").less_than(10),
                ),
        )
        .pipeline(
            PipelineDecl::new("multiply_pipeline")
                .output("multiplied")
                .arg("concatenated")
                .arg("multiplier")
                .switch("inputs_are_numeric"),
        )
}

/// A registry holding the fixture formats and all three analyses.
pub fn registry() -> AnalysisRegistry {
    let mut registry = AnalysisRegistry::new();
    for format in [&text(), &zip()] {
        if let Some(class) = format.as_format() {
            registry.register_format(class.clone());
        }
    }
    registry.register(concat_body()).unwrap();
    registry.register(extended_body()).unwrap();
    registry.register(overriden_body()).unwrap();
    registry
}

pub fn spec(registry: &AnalysisRegistry, class: &ClassId) -> Arc<AnalysisSpec> {
    registry.spec(class).unwrap()
}

pub fn names<'a>(names: impl IntoIterator<Item = &'a Arc<str>>) -> Vec<String> {
    names.into_iter().map(ToString::to_string).collect()
}
