use crate::{Conflict, Error, LabeledTable, Overlap, MISSING};
use std::collections::HashMap;

#[test]
fn merge_left_bias() -> Result<(), Error> {
    let mapping = HashMap::from([("A", HashMap::from([("x", "1".to_string())]))]);
    let mut table = LabeledTable::from_nested_mapping(mapping, None, None)?;
    let mapping = HashMap::from([("A", HashMap::from([("x", "2".to_string()), ("y", "3".to_string())]))]);
    let other = LabeledTable::from_nested_mapping(mapping, None, None)?;

    let overlap = table.merge(&other);

    assert_eq!(table.row_labels(), ["A"]);
    assert_eq!(table.col_labels(), ["x", "y"]);
    assert_eq!(table.get("A", "x")?, "1");
    assert_eq!(table.get("A", "y")?, "3");

    let expected = Overlap {
        rows: vec!["A".to_string()],
        cols: vec!["x".to_string()],
        conflicts: vec![Conflict { row: "A".into(), col: "x".into(), kept: "1".into(), discarded: "2".into() }],
    };
    assert_eq!(overlap, expected);
    table.check_integrity()?;
    Ok(())
}

#[test]
fn merge_fills_missing() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"]])?;
    let other = LabeledTable::from_rows([["#", "y"], ["B", "3"], ["C", "4"]])?;

    let overlap = table.merge(&other);

    assert_eq!(table.row_labels(), ["A", "B", "C"]);
    assert_eq!(table.col_labels(), ["x", "y"]);
    assert_eq!(table.row("A")?, ["1", MISSING]);
    assert_eq!(table.row("B")?, ["2", "3"]);
    assert_eq!(table.row("C")?, [MISSING, "4"]);
    assert!(table.iter_entries().all(|(_, _, value)| !value.is_empty()));
    assert_eq!(overlap.rows, ["B"]);
    assert!(overlap.conflicts.is_empty());
    Ok(())
}

#[test]
fn merge_custom_missing() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"]])?.with_missing("0".to_string());
    let other = LabeledTable::from_rows([["#", "y"], ["B", "2"]])?;
    table.merge(&other);
    assert_eq!(table.row("A")?, ["1", "0"]);
    assert_eq!(table.row("B")?, ["0", "2"]);
    Ok(())
}

#[test]
fn augment_keeps_columns() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x", "y"], ["A", "1", "2"]])?;
    let other = LabeledTable::from_rows([["#", "z", "x"], ["A", "9", "9"], ["B", "5", "6"]])?;

    let overlap = table.augment(&other);

    assert_eq!(table.col_labels(), ["x", "y"]);
    assert_eq!(table.row("A")?, ["1", "2"]);
    assert_eq!(table.row("B")?, ["6", MISSING]);
    assert_eq!(overlap.cols, ["x"]);
    assert_eq!(overlap.conflicts.len(), 1);
    table.check_integrity()?;
    Ok(())
}

#[test]
fn extend_keeps_rows() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "2"]])?;
    let other = LabeledTable::from_rows([["#", "x", "y", "z"], ["B", "2", "3", "4"], ["C", "0", "0", "0"]])?;

    let overlap = table.extend(&other);

    assert_eq!(table.row_labels(), ["A", "B"]);
    assert_eq!(table.col_labels(), ["x", "y", "z"]);
    assert_eq!(table.row("A")?, ["1", MISSING, MISSING]);
    assert_eq!(table.row("B")?, ["2", "3", "4"]);
    assert!(overlap.conflicts.is_empty());
    table.check_integrity()?;
    Ok(())
}

#[test]
fn disjoint_overlap_is_empty() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"]])?;
    let other = LabeledTable::from_rows([["#", "y"], ["B", "2"]])?;
    let overlap = table.merge(&other);
    assert!(overlap.is_empty());
    assert_eq!(overlap, Overlap::default());
    Ok(())
}

#[test]
fn missing_values_do_not_conflict() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", MISSING]])?;
    let other = LabeledTable::from_rows([["#", "x"], ["A", MISSING]])?;
    let overlap = table.merge(&other);
    assert!(overlap.conflicts.is_empty());
    Ok(())
}

#[test]
fn numeric_merge() -> Result<(), Error> {
    let mut table = LabeledTable::new(vec!["A".into()], vec!["x".into()], vec![vec![1.0]])?;
    let other = LabeledTable::new(vec!["B".into()], vec!["y".into()], vec![vec![2.0]])?;
    table.merge(&other);
    assert_eq!(table.get("A", "x")?, 1.0);
    assert!(table.get("A", "y")?.is_nan());
    assert!(table.get("B", "x")?.is_nan());
    Ok(())
}

#[test]
fn metasplit_and_metamerge() -> Result<(), Error> {
    let original = LabeledTable::from_rows([
        ["#", "S1", "S2"],
        ["host", "cat", "dog"],
        ["site", "gut", "skin"],
        ["A", "1", "0"],
        ["B", "0", "1"],
    ])?;

    let (meta, mut features) = original.metasplit("site")?;
    assert_eq!(meta.row_labels(), ["host", "site"]);
    assert_eq!(features.row_labels(), ["A", "B"]);

    features.grep(&["A"], None, Default::default())?;
    features.metamerge(&meta);
    assert_eq!(features.row_labels(), ["host", "site", "A"]);
    assert_eq!(features.row("site")?, ["gut", "skin"]);
    features.check_integrity()?;
    Ok(())
}

#[test]
fn metamerge_projects_columns() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "S2", "S3"], ["A", "1", "0"]])?;
    let meta = LabeledTable::from_rows([["#", "S1", "S2"], ["host", "cat", "dog"], ["A", "9", "9"]])?;

    let overlap = table.metamerge(&meta);

    assert_eq!(table.row_labels(), ["host", "A"]);
    assert_eq!(table.row("host")?, ["dog", MISSING]);
    assert_eq!(table.row("A")?, ["1", "0"]);
    assert_eq!(overlap.rows, ["A"]);
    Ok(())
}

#[test]
fn metasplit_bad_index() -> Result<(), Error> {
    let table = LabeledTable::from_rows([["#", "S1"], ["A", "1"]])?;
    assert!(matches!(table.metasplit("host"), Err(Error::BadIndex { .. })));
    Ok(())
}
