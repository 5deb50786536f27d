use crate::{Axis, Comparator, Criterion, Error, Key, LabeledTable, Options};

fn table() -> Result<LabeledTable<String>, Error> {
    LabeledTable::from_rows([
        ["#", "S1", "S2", "S3"],
        ["ABC", "0", "1", "0"],
        ["B", "1", "0", "1"],
        ["C", "1", "1", "0"],
        ["DB", "5", "0", "0"],
    ])
}

#[test]
fn grep_label_substring() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["B"], None, Options::default())?;
    assert_eq!(table.row_labels(), ["ABC", "B", "DB"]);
    assert_eq!(table.row("DB")?, ["5", "0", "0"]);
    table.check_integrity()?;
    Ok(())
}

#[test]
fn grep_multiple_patterns() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["^A", "^C$"], None, Options::default())?;
    assert_eq!(table.row_labels(), ["ABC", "C"]);
    Ok(())
}

#[test]
fn grep_invert() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["B"], None, Options::new().invert(true))?;
    assert_eq!(table.row_labels(), ["C"]);
    Ok(())
}

#[test]
fn grep_focus_column() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["^1$"], Some(Key::from("S1")), Options::default())?;
    assert_eq!(table.row_labels(), ["B", "C"]);
    Ok(())
}

#[test]
fn grep_transposed_filters_columns() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["S[13]"], None, Options::new().transposed(true))?;

    assert_eq!(table.col_labels(), ["S1", "S3"]);
    assert_eq!(table.row_labels(), ["ABC", "B", "C", "DB"]);
    assert!(!table.is_transposed());
    assert_eq!(table.row("B")?, ["1", "1"]);
    table.check_integrity()?;
    Ok(())
}

#[test]
fn grep_invalid_pattern() -> Result<(), Error> {
    let mut table = table()?;
    let result = table.grep(&["("], None, Options::default());
    assert!(matches!(result, Err(Error::Parse { .. })));
    assert_eq!(table.n_rows(), 4);
    Ok(())
}

#[test]
fn return_new_leaves_original() -> Result<(), Error> {
    let mut table = table()?;
    let original = table.clone();

    let observed = table.grep(&["B"], None, Options::new().return_new(true))?;
    assert_eq!(table, original);

    let observed = observed.ok_or_else(|| Error::Format { table: "test".into(), reason: "no table".into() })?;
    assert_eq!(observed.row_labels(), ["ABC", "B", "DB"]);
    observed.check_integrity()?;
    Ok(())
}

#[test]
fn return_new_transposed() -> Result<(), Error> {
    let mut table = table()?;
    let observed = table.select(&["S2"], None, Options::new().transposed(true).return_new(true))?;
    let observed = observed.ok_or_else(|| Error::Format { table: "test".into(), reason: "no table".into() })?;

    assert_eq!(observed.col_labels(), ["S2"]);
    assert_eq!(observed.row_labels(), table.row_labels());
    assert!(!observed.is_transposed());
    assert_eq!(table.n_cols(), 3);
    Ok(())
}

#[test]
fn in_place_returns_none() -> Result<(), Error> {
    let mut table = table()?;
    let observed = table.select(&["B"], None, Options::default())?;
    assert!(observed.is_none());
    assert_eq!(table.row_labels(), ["B"]);
    Ok(())
}

#[test]
fn select_exact_match() -> Result<(), Error> {
    let mut table = table()?;
    table.select(&["B", "C", "missing"], None, Options::default())?;
    assert_eq!(table.row_labels(), ["B", "C"]);
    Ok(())
}

#[test]
fn select_focus_column() -> Result<(), Error> {
    let mut table = table()?;
    table.select(&["0"], Some(Key::from("S3")), Options::default())?;
    assert_eq!(table.row_labels(), ["ABC", "C", "DB"]);
    Ok(())
}

#[test]
fn delete_complements_select() -> Result<(), Error> {
    let mut selected = table()?;
    let mut deleted = table()?;
    selected.select(&["B", "C"], None, Options::default())?;
    deleted.delete(&["B", "C"], None, Options::default())?;

    assert_eq!(deleted.row_labels(), ["ABC", "DB"]);
    assert_eq!(selected.n_rows() + deleted.n_rows(), 4);
    Ok(())
}

#[test]
fn delete_transposed() -> Result<(), Error> {
    let mut table = table()?;
    table.delete(&["S1"], None, Options::new().transposed(true))?;
    assert_eq!(table.col_labels(), ["S2", "S3"]);
    Ok(())
}

#[test]
fn head_inclusive() -> Result<(), Error> {
    let mut table = table()?;
    table.head("C", Options::default())?;
    assert_eq!(table.row_labels(), ["ABC", "B", "C"]);
    Ok(())
}

#[test]
fn head_position() -> Result<(), Error> {
    let mut table = table()?;
    table.head(0usize, Options::default())?;
    assert_eq!(table.row_labels(), ["ABC"]);
    Ok(())
}

#[test]
fn head_transposed() -> Result<(), Error> {
    let mut table = table()?;
    table.head("S2", Options::new().transposed(true))?;
    assert_eq!(table.col_labels(), ["S1", "S2"]);
    Ok(())
}

#[test]
fn head_bad_index() -> Result<(), Error> {
    let mut table = table()?;
    let result = table.head("Z", Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Row, .. })));

    // errors raised while transposed refer to the original axis
    let result = table.head("Z", Options::new().transposed(true));
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));
    assert!(!table.is_transposed());
    assert_eq!(table.n_rows(), 4);
    Ok(())
}

#[test]
fn unknown_keys_fail_without_rows() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"]])?;
    let focus = Some(Key::from("nocol"));

    let result = table.head("nope", Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Row, .. })));
    let result = table.limit("nocol", ">=1", Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));
    let result = table.grep(&["A"], focus, Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));
    let result = table.select(&["A"], focus, Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));
    let result = table.delete(&["A"], focus, Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));

    // transposed, the filtered axis is the columns and the focus is a row
    let result = table.limit("nope", ">=1", Options::new().transposed(true));
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Row, .. })));
    assert_eq!(table.col_labels(), ["x"]);
    Ok(())
}

#[test]
fn limit_comparators() -> Result<(), Error> {
    let cases = [
        (">=1", vec!["B", "C", "DB"]),
        (">1", vec!["DB"]),
        ("<1", vec!["ABC"]),
        ("<=1", vec!["ABC", "B", "C"]),
        ("=1", vec!["B", "C"]),
        ("==1", vec!["B", "C"]),
        ("!=1", vec!["ABC", "DB"]),
    ];
    for (criterion, expected) in cases {
        let mut table = table()?;
        table.limit("S1", criterion, Options::default())?;
        assert_eq!(table.row_labels(), expected, "criterion: {criterion}");
    }
    Ok(())
}

#[test]
fn limit_non_numeric() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "x"], ["A", "1"], ["B", "many"]])?;
    let result = table.limit("x", ">0", Options::default());
    assert!(matches!(result, Err(Error::Parse { .. })));
    assert_eq!(table.row_labels(), ["A", "B"]);
    Ok(())
}

#[test]
fn limit_transposed() -> Result<(), Error> {
    let mut table = table()?;
    table.limit("DB", ">0", Options::new().transposed(true))?;
    assert_eq!(table.col_labels(), ["S1"]);
    Ok(())
}

#[test]
fn criterion_parse() -> Result<(), Error> {
    let criterion: Criterion = "< -0.5".parse()?;
    assert_eq!(criterion.comparator, Comparator::Lt);
    assert_eq!(criterion.threshold, -0.5);
    assert_eq!(criterion.to_string(), "<-0.5");

    for bad in ["10", "<>10", ">=", ">=ten", "~1"] {
        assert!(bad.parse::<Criterion>().is_err(), "parsed: {bad}");
    }
    Ok(())
}

#[test]
fn nontrivial_rows() -> Result<(), Error> {
    let mut table = table()?;
    table.nontrivial(2, 1.0, Options::default())?;
    assert_eq!(table.row_labels(), ["B", "C"]);
    Ok(())
}

#[test]
fn nontrivial_skips_missing() -> Result<(), Error> {
    let mut table = LabeledTable::from_rows([["#", "S1", "S2"], ["A", "#N/A", "2"], ["B", "#N/A", "0"]])?;
    table.nontrivial(1, 1.0, Options::default())?;
    assert_eq!(table.row_labels(), ["A"]);
    Ok(())
}

#[test]
fn filter_rows_custom_predicate() -> Result<(), Error> {
    let mut table = table()?;
    table.filter_rows(|row| Ok(row.number("S2")? + row.number("S3")? == 1.0), Options::default())?;
    assert_eq!(table.row_labels(), ["ABC", "B", "C"]);
    Ok(())
}

#[test]
fn filter_rows_predicate_error() -> Result<(), Error> {
    let mut table = table()?;
    let result = table.filter_rows(|row| row.get("S9").map(|_| true), Options::default());
    assert!(matches!(result, Err(Error::BadIndex { axis: Axis::Col, .. })));
    assert_eq!(table.n_rows(), 4);
    Ok(())
}

#[test]
fn filter_everything() -> Result<(), Error> {
    let mut table = table()?;
    table.grep(&["nothing"], None, Options::default())?;
    assert_eq!(table.n_rows(), 0);
    assert_eq!(table.n_cols(), 3);
    table.check_integrity()?;
    Ok(())
}
