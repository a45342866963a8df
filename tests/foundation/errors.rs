//! Integration tests for Error types
//!
//! Tests error construction, display, context, and classification.

use lineage_foundation::{
    Candidate, ClassId, DeclKind, Error, ErrorContext, ErrorKind, Rejection, Type,
};

fn concat() -> ClassId {
    ClassId::new("fixtures", "Concat")
}

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn lookup_not_found_lists_valid_names() {
    let err = Error::lookup_not_found(&concat(), DeclKind::Column, "file9", ["file1", "file2"]);
    assert!(matches!(err.kind, ErrorKind::LookupNotFound { .. }));
    let msg = err.to_string();
    assert!(msg.contains("fixtures:Concat"));
    assert!(msg.contains("column"));
    assert!(msg.contains("file9"));
    assert!(msg.contains("file1, file2"));
}

#[test]
fn kind_conflict_names_both_kinds() {
    let err = Error::kind_conflict(&concat(), "order", DeclKind::Parameter, DeclKind::Column);
    let msg = err.to_string();
    assert!(msg.contains("'order' is declared as a column but is already a parameter"));
}

#[test]
fn invalid_declaration_names_class_and_declaration() {
    let err = Error::invalid_declaration(&concat(), "duplicates", "default is not a choice");
    assert_eq!(
        err.to_string(),
        "fixtures:Concat: invalid declaration 'duplicates': default is not a choice"
    );
}

#[test]
fn type_mismatch_display() {
    let err = Error::type_mismatch(Type::Int, Type::Str);
    assert_eq!(err.to_string(), "type mismatch: expected int, got str");
}

// =============================================================================
// Selection errors
// =============================================================================

#[test]
fn unresolvable_lists_every_rejection() {
    let err = Error::new(ErrorKind::UnresolvablePipeline {
        class: concat(),
        column: "concatenated".to_string(),
        rejected: vec![
            Rejection {
                pipeline: "forward".to_string(),
                reason: "condition order == \"forward\" is false".to_string(),
            },
            Rejection {
                pipeline: "reversed".to_string(),
                reason: "condition order == \"reversed\" is false".to_string(),
            },
        ],
    });
    let msg = err.to_string();
    assert!(msg.contains("forward (condition"));
    assert!(msg.contains("reversed (condition"));
    assert!(!err.is_configuration_error());
}

#[test]
fn ambiguity_lists_candidates_with_outputs() {
    let err = Error::new(ErrorKind::AmbiguousPipeline {
        class: concat(),
        column: "concatenated".to_string(),
        candidates: vec![
            Candidate {
                pipeline: "a".to_string(),
                outputs: vec!["concatenated".to_string()],
            },
            Candidate {
                pipeline: "b".to_string(),
                outputs: vec!["concatenated".to_string(), "report".to_string()],
            },
        ],
    });
    let msg = err.to_string();
    assert!(msg.contains("a -> (concatenated)"));
    assert!(msg.contains("b -> (concatenated, report)"));
    assert!(err.is_configuration_error());
}

#[test]
fn empty_rejection_list_says_none() {
    let err = Error::new(ErrorKind::UnresolvablePipeline {
        class: concat(),
        column: "x".to_string(),
        rejected: Vec::new(),
    });
    assert!(err.to_string().contains("(rejected: none)"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn frames_accumulate() {
    let err = Error::condition("order", "is not present in the run context")
        .with_frame("condition of pipeline 'forward'")
        .with_frame("selecting 'concatenated'");
    let context = err.context.unwrap();
    assert_eq!(
        context.stack,
        ["condition of pipeline 'forward'", "selecting 'concatenated'"]
    );
}

#[test]
fn explicit_context() {
    let err = Error::new(ErrorKind::UnknownClass(concat()))
        .with_context(ErrorContext::new().with_source("fixtures/concat.rs"));
    assert_eq!(
        err.context.and_then(|c| c.source).as_deref(),
        Some("fixtures/concat.rs")
    );
}
