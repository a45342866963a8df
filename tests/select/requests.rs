//! Pipeline bindings, requests, and execution

use std::collections::HashMap;
use std::sync::Arc;

use lineage_declare::{ClassBody, ColumnDecl, PipelineDecl};
use lineage_foundation::{ClassId, ErrorKind, Result, Type, Value};
use lineage_select::{
    PipelineBinding, PipelineExecutor, PipelineRequest, PipelineSelector, RunContext, execute,
};

use crate::fixtures::{self, extended_concat, overriden_concat, text};

fn typed(name: &str, ty: Type) -> (Arc<str>, Type) {
    (name.into(), ty)
}

#[test]
fn binding_lists_typed_inputs_parameters_and_outputs() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &extended_concat());
    let pipeline = spec.pipeline("doubly_concat_pipeline").unwrap();
    let binding = PipelineBinding::new(&spec, pipeline).unwrap();

    assert_eq!(binding.class(), &extended_concat());
    assert_eq!(
        binding.inputs(),
        [typed("concatenated", text()), typed("file3", text())]
    );
    assert_eq!(binding.parameters(), [typed("second_duplicates", Type::Int)]);
    assert_eq!(binding.outputs(), [typed("doubly_concatenated", text())]);
}

#[test]
fn annotated_type_differs_from_stored_type() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &extended_concat());
    // file1 is stored as a zip but the method reads it as text
    let binding = PipelineBinding::new(&spec, spec.pipeline("concat_pipeline").unwrap()).unwrap();
    assert_eq!(binding.inputs()[0].1, text());
    assert_ne!(spec.column("file1").unwrap().ty, text());
}

#[test]
fn request_uses_the_overridden_default() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = RunContext::for_spec(&spec)
        .with_value("order", "reversed")
        .with_value("file1", "/data/file1.zip")
        .with_value("multiplier", 2);

    let request = PipelineSelector::new(&spec, &ctx).request("concatenated").unwrap();
    assert_eq!(request.binding().pipeline(), "reverse_concat_pipeline");
    assert_eq!(request.parameter("duplicates"), Some(&Value::Int(2)));
    assert_eq!(
        request.parameter_values().collect::<Vec<_>>(),
        [("duplicates", &Value::Int(2))]
    );
}

#[test]
fn request_without_a_parameter_value_fails() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let pipeline = spec.pipeline("multiply_pipeline").unwrap();
    let err = PipelineRequest::new(&spec, pipeline, &RunContext::for_spec(&spec)).unwrap_err();
    match err.kind {
        ErrorKind::MissingParameter {
            pipeline,
            parameter,
            ..
        } => {
            assert_eq!(pipeline, "multiply_pipeline");
            assert_eq!(parameter, "multiplier");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn request_rejects_a_value_outside_the_choices() {
    let mut registry = fixtures::registry();
    let spec = registry
        .register(
            ClassBody::new(ClassId::new("fixtures.concat", "ReportingConcat"))
                .extends(&overriden_concat())
                .column(ColumnDecl::new("report", text(), "which order was used"))
                .pipeline(
                    PipelineDecl::new("report_pipeline")
                        .output("report")
                        .arg("concatenated")
                        .arg("order"),
                ),
        )
        .unwrap();
    let pipeline = spec.pipeline("report_pipeline").unwrap();

    let ctx = RunContext::for_spec(&spec).with_value("order", "reversed");
    let request = PipelineRequest::new(&spec, pipeline, &ctx).unwrap();
    assert_eq!(request.parameter("order"), Some(&Value::from("reversed")));

    let ctx = RunContext::for_spec(&spec).with_value("order", "sideways");
    let err = PipelineRequest::new(&spec, pipeline, &ctx).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("ReportingConcat"));
    assert!(message.contains("\"sideways\" is not one of the allowed choices"));
}

/// Records what it was asked to run and "produces" a path per output.
#[derive(Default)]
struct Recorder {
    ran: Vec<String>,
}

impl PipelineExecutor for Recorder {
    type Artifact = String;

    fn run(&mut self, request: &PipelineRequest) -> Result<HashMap<Arc<str>, String>> {
        self.ran.push(request.binding().pipeline().to_string());
        Ok(request
            .binding()
            .outputs()
            .iter()
            .map(|(name, _)| (name.clone(), format!("/work/{name}.txt")))
            .collect())
    }
}

#[test]
fn execute_returns_artifacts_by_output_column() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &extended_concat());
    let ctx = RunContext::for_spec(&spec);
    let request = PipelineSelector::new(&spec, &ctx)
        .request("doubly_concatenated")
        .unwrap();

    let mut recorder = Recorder::default();
    let artifacts = execute(&mut recorder, &request).unwrap();
    assert_eq!(recorder.ran, ["doubly_concat_pipeline"]);
    assert_eq!(artifacts["doubly_concatenated"], "/work/doubly_concatenated.txt");
}
