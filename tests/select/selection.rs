//! Pipeline selection over the overriding fixture

use lineage_declare::{ClassBody, PipelineDecl, SwitchDecl};
use lineage_foundation::{ClassId, ErrorKind, Result, Value};
use lineage_resolve::SwitchSpec;
use lineage_select::{PipelineSelector, RunContext, SwitchValues, ValueProvider};
use proptest::prelude::*;

use crate::fixtures::{self, overriden_concat};

fn run(order: &str) -> RunContext {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    RunContext::for_spec(&spec)
        .with_value("file1", "/data/file1.zip")
        .with_value("file2", "/data/file2.txt")
        .with_value("multiplier", 3)
        .with_value("order", order)
}

#[test]
fn forward_selects_the_forward_pipeline() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("forward");
    let selected = PipelineSelector::new(&spec, &ctx).select("concatenated").unwrap();
    assert_eq!(&*selected.name, "concat_pipeline");
}

#[test]
fn reversed_selects_the_reverse_pipeline() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("reversed");
    let selected = PipelineSelector::new(&spec, &ctx).select("concatenated").unwrap();
    assert_eq!(&*selected.name, "reverse_concat_pipeline");
}

#[test]
fn failing_conjunct_leaves_nothing() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("reversed").with_value("multiplier", 12);
    let err = PipelineSelector::new(&spec, &ctx)
        .select("concatenated")
        .unwrap_err();
    match err.kind {
        ErrorKind::UnresolvablePipeline {
            column, rejected, ..
        } => {
            assert_eq!(column, "concatenated");
            let rejected: Vec<_> = rejected.iter().map(|r| r.pipeline.as_str()).collect();
            assert_eq!(rejected, ["concat_pipeline", "reverse_concat_pipeline"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unprovided_input_fails_the_condition() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("reversed").with_not_provided("file1");
    assert!(PipelineSelector::new(&spec, &ctx).select("concatenated").is_err());
}

#[test]
fn comparing_an_unset_parameter_is_an_evaluation_error() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    // multiplier has no default, so it starts as not provided
    let ctx = RunContext::for_spec(&spec)
        .with_value("order", "reversed")
        .with_value("file1", "/data/file1.zip");
    let err = PipelineSelector::new(&spec, &ctx)
        .select("concatenated")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConditionEvaluation { .. }));
    assert!(!err.is_configuration_error());

    let message = err.to_string();
    assert!(message.contains("fixtures.concat:OverridenConcat"));
    assert!(message.contains("reverse_concat_pipeline"));
    assert!(message.contains("multiplier"));
}

#[test]
fn third_unconditioned_pipeline_is_ambiguous() {
    let mut registry = fixtures::registry();
    let class = ClassId::new("fixtures.concat", "AmbiguousConcat");
    let spec = registry
        .register(
            ClassBody::new(class)
                .extends(&overriden_concat())
                .pipeline(
                    PipelineDecl::new("plain_concat_pipeline")
                        .output("concatenated")
                        .arg("file1")
                        .arg("file2"),
                ),
        )
        .unwrap();

    let ctx = run("forward");
    let err = PipelineSelector::new(&spec, &ctx)
        .select("concatenated")
        .unwrap_err();
    match &err.kind {
        ErrorKind::AmbiguousPipeline { candidates, .. } => {
            let names: Vec<_> = candidates.iter().map(|c| c.pipeline.as_str()).collect();
            assert_eq!(names, ["concat_pipeline", "plain_concat_pipeline"]);
            assert!(candidates.iter().all(|c| c.outputs == ["concatenated"]));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("AmbiguousConcat"));
}

// =============================================================================
// Switches
// =============================================================================

#[test]
fn switch_gates_the_multiply_pipeline() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("forward");

    let numeric = SwitchValues::new().with("inputs_are_numeric", true);
    let selected = PipelineSelector::new(&spec, &ctx)
        .with_switches(&numeric)
        .select("multiplied")
        .unwrap();
    assert_eq!(&*selected.name, "multiply_pipeline");

    let textual = SwitchValues::new().with("inputs_are_numeric", false);
    let err = PipelineSelector::new(&spec, &ctx)
        .with_switches(&textual)
        .select("multiplied")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvablePipeline { .. }));
    // The spec is unchanged by either run
    assert_eq!(spec.pipeline_names().len(), 3);
}

#[test]
fn switch_evaluators_see_the_run_values() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("forward");
    let by_extension = |switch: &SwitchSpec, values: &dyn ValueProvider| -> Result<Value> {
        let numeric = switch.inputs.iter().all(|input| {
            values
                .provision(input)
                .and_then(|p| p.value().and_then(Value::as_str).map(|s| s.ends_with(".zip")))
                .unwrap_or(false)
        });
        Ok(Value::Bool(numeric))
    };
    let selector = PipelineSelector::new(&spec, &ctx).with_switches(&by_extension);
    // file2 is not a zip, so the switch is false
    assert!(selector.select("multiplied").is_err());
}

#[test]
fn numeric_switch_values_match_across_int_and_float() {
    let mut registry = fixtures::registry();
    let spec = registry
        .register(
            ClassBody::new(ClassId::new("fixtures.concat", "LevelledConcat"))
                .extends(&overriden_concat())
                .switch(SwitchDecl::new("level").arg("file1"))
                .pipeline(
                    PipelineDecl::new("levelled_multiply_pipeline")
                        .output("multiplied")
                        .arg("concatenated")
                        .arg("multiplier")
                        .switch_on("level", [1.0]),
                ),
        )
        .unwrap();
    let ctx = run("forward");

    let switches = SwitchValues::new()
        .with("inputs_are_numeric", false)
        .with("level", 1);
    let selected = PipelineSelector::new(&spec, &ctx)
        .with_switches(&switches)
        .select("multiplied")
        .unwrap();
    assert_eq!(&*selected.name, "levelled_multiply_pipeline");

    let switches = SwitchValues::new()
        .with("inputs_are_numeric", false)
        .with("level", 2);
    assert!(
        PipelineSelector::new(&spec, &ctx)
            .with_switches(&switches)
            .select("multiplied")
            .is_err()
    );
}

#[test]
fn select_all_covers_every_output() {
    let registry = fixtures::registry();
    let spec = fixtures::spec(&registry, &overriden_concat());
    let ctx = run("reversed");
    let numeric = SwitchValues::new().with("inputs_are_numeric", true);
    let selected = PipelineSelector::new(&spec, &ctx)
        .with_switches(&numeric)
        .select_all(["concatenated", "multiplied"])
        .unwrap();
    let names: Vec<_> = selected.iter().map(|p| &*p.name).collect();
    assert_eq!(names, ["reverse_concat_pipeline", "multiply_pipeline"]);
}

proptest! {
    #[test]
    fn exactly_one_order_pipeline_survives(reversed in any::<bool>(), multiplier in 0i64..10) {
        let registry = fixtures::registry();
        let spec = fixtures::spec(&registry, &overriden_concat());
        let order = if reversed { "reversed" } else { "forward" };
        let ctx = run(order).with_value("multiplier", multiplier);
        let selected = PipelineSelector::new(&spec, &ctx).select("concatenated").unwrap();
        let expected = if reversed { "reverse_concat_pipeline" } else { "concat_pipeline" };
        prop_assert_eq!(&*selected.name, expected);
    }
}
