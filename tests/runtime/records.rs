//! The record form of a resolved spec

use lineage_foundation::{ClassId, DeclKind, ErrorKind, Result};
use lineage_runtime::{DeclRecord, DeserializeOptions, from_record, to_record};

use crate::fixtures::{self, concat, overriden_concat};

#[test]
fn records_carry_kind_author_and_fields() {
    let registry = fixtures::registry();
    let record = to_record(&fixtures::spec(&registry, &overriden_concat()));

    assert_eq!(record.class, "<fixtures.concat:OverridenConcat>");
    assert_eq!(record.bases, ["<fixtures.concat:Concat>"]);

    let duplicates = record
        .declarations
        .iter()
        .find_map(|d| match d {
            DeclRecord::Parameter(p) if p.name == "duplicates" => Some(p),
            _ => None,
        })
        .unwrap();
    assert_eq!(duplicates.defined_in, "<fixtures.concat:Concat>");
    assert_eq!(duplicates.ty, "int");

    let multiply = record
        .declarations
        .iter()
        .find(|d| d.name() == "multiply_pipeline")
        .unwrap();
    assert_eq!(multiply.kind(), DeclKind::Pipeline);
    assert_eq!(multiply.defined_in(), "<fixtures.concat:OverridenConcat>");
}

#[test]
fn moved_classes_resolve_under_prefixes() {
    let registry = fixtures::registry();
    let mut record = to_record(&fixtures::spec(&registry, &concat()));
    // Written by a process that knew the classes under a shorter module path
    let shorten = |location: &str| location.replace("<fixtures.", "<");
    record.class = shorten(&record.class);
    record.mro = record.mro.iter().map(|l| shorten(l)).collect();
    for decl in &mut record.declarations {
        match decl {
            DeclRecord::Column(c) => {
                c.defined_in = shorten(&c.defined_in);
                c.ty = shorten(&c.ty);
            }
            DeclRecord::Parameter(p) => p.defined_in = shorten(&p.defined_in),
            DeclRecord::Pipeline(p) => {
                p.defined_in = shorten(&p.defined_in);
                for arg in &mut p.args {
                    arg.ty = arg.ty.as_deref().map(shorten);
                }
            }
            _ => {}
        }
    }

    let strict = from_record(&record, &registry, &DeserializeOptions::new()).unwrap_err();
    assert!(matches!(strict.kind, ErrorKind::UnresolvedClass { .. }));

    let options = DeserializeOptions::new().with_prefix("fixtures");
    let restored = from_record(&record, &registry, &options).unwrap();
    assert_eq!(restored, *fixtures::spec(&registry, &concat()));
}

#[test]
fn custom_resolvers() {
    let registry = fixtures::registry();
    let record = to_record(&fixtures::spec(&registry, &concat()));
    let refuse = |location: &str, _: &[String]| -> Result<ClassId> {
        Err(lineage_foundation::Error::new(ErrorKind::UnresolvedClass {
            location: location.to_string(),
            prefixes: Vec::new(),
        }))
    };
    assert!(from_record(&record, &refuse, &DeserializeOptions::new()).is_err());
    assert!(from_record(&record, &refuse, &DeserializeOptions::permissive()).is_ok());
}
