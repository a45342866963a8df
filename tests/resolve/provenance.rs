//! Provenance of inherited, overridden, and redeclared attributes

use std::collections::BTreeSet;

use lineage_declare::{ClassBody, ColumnDecl, InheritDecl, ParameterDecl, inherited_from};
use lineage_foundation::{ClassId, ColumnSalience, ErrorKind, Type, Value};
use lineage_resolve::AnalysisRegistry;
use proptest::prelude::*;

use crate::fixtures::samples;

fn id(name: &str) -> ClassId {
    ClassId::new("provenance", name)
}

fn base() -> ClassBody {
    ClassBody::new(id("A"))
        .space(samples())
        .column(ColumnDecl::new("c", Type::Str, "a column").salience(ColumnSalience::Raw))
        .parameter(ParameterDecl::new("p", Type::Int, "a parameter").default(1))
}

fn registry_with(derived: ClassBody) -> AnalysisRegistry {
    let mut registry = AnalysisRegistry::new();
    registry.register(base()).unwrap();
    registry.register(derived).unwrap();
    registry
}

#[test]
fn verbatim_marker_keeps_the_author() {
    let registry = registry_with(
        ClassBody::new(id("B"))
            .extends(&id("A"))
            .inherit(inherited_from("p", &id("A")))
            .inherit(inherited_from("c", &id("A"))),
    );
    let a = registry.spec(&id("A")).unwrap();
    let b = registry.spec(&id("B")).unwrap();

    assert_eq!(b.parameter("p").unwrap().defined_in, id("A"));
    assert_eq!(b.column("c").unwrap().defined_in, id("A"));
    // Verbatim inheritance shares the declaration itself
    assert!(std::ptr::eq(a.parameter("p").unwrap(), b.parameter("p").unwrap()));
}

#[test]
fn default_override_keeps_the_author() {
    let registry = registry_with(
        ClassBody::new(id("B"))
            .extends(&id("A"))
            .inherit(InheritDecl::new("p", id("A")).default(5)),
    );
    let b = registry.spec(&id("B")).unwrap();
    let p = b.parameter("p").unwrap();
    assert_eq!(p.defined_in, id("A"));
    assert_eq!(p.default, Some(Value::Int(5)));
    // The base keeps its own default
    let a = registry.spec(&id("A")).unwrap();
    assert_eq!(a.parameter("p").unwrap().default, Some(Value::Int(1)));
}

#[test]
fn fresh_declaration_takes_ownership() {
    let registry = registry_with(
        ClassBody::new(id("B"))
            .extends(&id("A"))
            .parameter(ParameterDecl::new("p", Type::Int, "redeclared").default(3)),
    );
    let b = registry.spec(&id("B")).unwrap();
    assert_eq!(b.parameter("p").unwrap().defined_in, id("B"));
    assert_eq!(b.parameter_names(), ["p"]);
}

#[test]
fn overrides_apply_field_by_field() {
    let registry = registry_with(
        ClassBody::new(id("B"))
            .extends(&id("A"))
            .inherit(
                InheritDecl::new("c", id("A"))
                    .desc("a better description")
                    .column_salience(ColumnSalience::Primary),
            ),
    );
    let c = registry.spec(&id("B")).unwrap().column("c").unwrap().clone();
    assert_eq!(&*c.desc, "a better description");
    assert_eq!(c.salience, ColumnSalience::Primary);
    assert_eq!(c.ty, Type::Str);
    assert_eq!(c.defined_in, id("A"));
}

#[test]
fn inheriting_a_missing_name_lists_the_base_attributes() {
    let mut registry = AnalysisRegistry::new();
    registry.register(base()).unwrap();
    let err = registry
        .register(
            ClassBody::new(id("B"))
                .extends(&id("A"))
                .inherit(inherited_from("q", &id("A"))),
        )
        .unwrap_err();
    match &err.kind {
        ErrorKind::UnknownDeclarationReference {
            name, available, ..
        } => {
            assert_eq!(name, "q");
            assert_eq!(available, &["c", "p"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("provenance:B"));
}

#[test]
fn restated_type_must_match() {
    let mut registry = AnalysisRegistry::new();
    registry.register(base()).unwrap();
    let body = ClassBody::new(id("B"))
        .extends(&id("A"))
        .inherit(InheritDecl::new("p", id("A")).typed(Type::Str));
    assert!(registry.register(body).is_err());
}

#[test]
fn default_override_on_a_column_is_invalid() {
    let mut registry = AnalysisRegistry::new();
    registry.register(base()).unwrap();
    let body = ClassBody::new(id("B"))
        .extends(&id("A"))
        .inherit(InheritDecl::new("c", id("A")).default(1));
    let err = registry.register(body).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidDeclaration { .. }));
}

// =============================================================================
// Property tests
// =============================================================================

/// How one class in a generated chain declares one parameter name.
#[derive(Clone, Debug)]
enum Redeclare {
    Skip,
    Fresh,
    Inherit,
    Override(i64),
}

fn redeclare() -> impl Strategy<Value = Redeclare> {
    prop_oneof![
        Just(Redeclare::Skip),
        Just(Redeclare::Fresh),
        Just(Redeclare::Inherit),
        (0i64..100).prop_map(Redeclare::Override),
    ]
}

proptest! {
    #[test]
    fn chains_have_unique_complete_names_and_exact_provenance(
        plan in prop::collection::vec(prop::collection::vec(redeclare(), 4), 1..6)
    ) {
        let mut registry = AnalysisRegistry::new();
        let mut declared: BTreeSet<String> = BTreeSet::new();
        // (author, default) expected per name
        let mut expected: Vec<Option<(ClassId, Option<Value>)>> = vec![None; 4];
        let mut previous: Option<ClassId> = None;

        for (depth, row) in plan.iter().enumerate() {
            let class = id(&format!("C{depth}"));
            let mut body = ClassBody::new(class.clone()).space(samples());
            if let Some(parent) = &previous {
                body = body.extends(parent);
            }
            for (i, action) in row.iter().enumerate() {
                let name = format!("p{i}");
                let current = expected[i].clone();
                match (action, current, &previous) {
                    (Redeclare::Fresh, _, _) | (_, None, _) | (_, _, None) => {
                        if matches!(action, Redeclare::Skip) {
                            continue;
                        }
                        body = body.parameter(ParameterDecl::new(name.as_str(), Type::Int, "generated"));
                        expected[i] = Some((class.clone(), None));
                        declared.insert(name);
                    }
                    (Redeclare::Skip, _, _) => {}
                    (Redeclare::Inherit, Some(_), Some(parent)) => {
                        body = body.inherit(inherited_from(name.as_str(), parent));
                    }
                    (Redeclare::Override(v), Some((author, _)), Some(parent)) => {
                        body = body.inherit(InheritDecl::new(name.as_str(), parent.clone()).default(*v));
                        expected[i] = Some((author, Some(Value::Int(*v))));
                    }
                }
            }
            registry.register(body).unwrap();
            previous = Some(class);
        }

        let spec = registry.spec(&previous.unwrap()).unwrap();
        let names = spec.parameter_names();
        let unique: BTreeSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());
        prop_assert_eq!(
            unique.into_iter().map(String::from).collect::<BTreeSet<_>>(),
            declared
        );

        for (i, entry) in expected.iter().enumerate() {
            if let Some((author, default)) = entry {
                let parameter = spec.parameter(&format!("p{i}")).unwrap();
                prop_assert_eq!(&parameter.defined_in, author);
                prop_assert_eq!(&parameter.default, default);
            }
        }
    }
}
