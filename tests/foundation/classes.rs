//! Integration tests for class identities and data spaces

use lineage_foundation::{ClassId, DataSpace, ErrorKind};

// =============================================================================
// ClassId
// =============================================================================

#[test]
fn class_id_parses_both_forms() {
    let plain = ClassId::parse("fixtures.concat:Concat").unwrap();
    let bracketed = ClassId::parse("<fixtures.concat:Concat>").unwrap();
    assert_eq!(plain, bracketed);
    assert_eq!(plain.module(), "fixtures.concat");
    assert_eq!(plain.name(), "Concat");
    assert_eq!(plain.location(), "<fixtures.concat:Concat>");
}

#[test]
fn malformed_locations_are_rejected() {
    for bad in ["Concat", ":Concat", "fixtures:", "a:b:C", "fixtures:Not-A-Name"] {
        let err = ClassId::parse(bad).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidClassLocation(_)), "{bad}");
    }
}

#[test]
fn module_prefixes() {
    let class = ClassId::new("formats", "Text");
    assert_eq!(
        class.with_module_prefix("site."),
        ClassId::new("site.formats", "Text")
    );
    assert_eq!(class.with_module_prefix(""), class);
}

// =============================================================================
// DataSpace
// =============================================================================

#[test]
fn data_space_levels() {
    let space = DataSpace::new("samples", ["dataset", "group", "sample"]).unwrap();
    assert_eq!(space.levels().collect::<Vec<_>>(), ["dataset", "group", "sample"]);
    assert_eq!(space.leaf().level(), "sample");
    assert_eq!(space.leaf().space(), "samples");

    let group = space.frequency("group").unwrap();
    assert!(space.contains(&group));
    assert!(space.frequency("visit").is_err());
}

#[test]
fn frequencies_belong_to_one_space() {
    let samples = DataSpace::new("samples", ["dataset", "sample"]).unwrap();
    let clinical = DataSpace::new("clinical", ["dataset", "sample"]).unwrap();
    assert!(!clinical.contains(&samples.leaf()));
}

#[test]
fn degenerate_spaces_are_rejected() {
    assert!(DataSpace::new("empty", Vec::<String>::new()).is_err());
    assert!(DataSpace::new("repeats", ["a", "b", "a"]).is_err());
}
