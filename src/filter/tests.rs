use crate::filter::{self, FilterArgs, HeadArgs, LimitArgs, MatchArgs, NontrivialArgs};
use crate::utils::temp_table;
use color_eyre::eyre::{Report, Result};
use indoc::indoc;
use tempfile::NamedTempFile;

const TABLE: &str = indoc! {"
    #\tS1\tS2\tS3
    ABC\t0\t1\t0
    B\t1\t0\t1
    C\t1\t1\t0
    DB\t5\t0\t0
"};

const META: &str = indoc! {"
    #\tS1\tS2
    host\tcat\tdog
    A\t1\t0
    B\t0\t2
"};

fn match_args(file: &NamedTempFile, values: &[&str]) -> MatchArgs {
    MatchArgs {
        input: file.path().to_path_buf(),
        values: values.iter().map(|v| v.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn grep_labels() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let table = filter::grep(&match_args(&file, &["B"]))?;
    assert_eq!(table.row_labels(), ["ABC", "B", "DB"]);
    Ok(())
}

#[test]
fn grep_focus_invert() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let mut args = match_args(&file, &["^0$"]);
    args.focus = Some("S2".to_string());
    args.filter.invert = true;

    let table = filter::grep(&args)?;
    assert_eq!(table.row_labels(), ["ABC", "C"]);
    Ok(())
}

#[test]
fn grep_bad_focus() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let mut args = match_args(&file, &["1"]);
    args.focus = Some("S9".to_string());

    let error = filter::grep(&args).err().map(|e| format!("{e:?}")).unwrap_or_default();
    assert!(error.contains("Unknown focus column"), "{error}");
    Ok(())
}

#[test]
fn select_delete_partition() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = match_args(&file, &["B", "DB"]);

    let selected = filter::select(&args)?;
    let deleted = filter::delete(&args)?;

    assert_eq!(selected.row_labels(), ["B", "DB"]);
    assert_eq!(deleted.row_labels(), ["ABC", "C"]);
    Ok(())
}

#[test]
fn select_columns() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let mut args = match_args(&file, &["S3", "S1"]);
    args.filter.transposed = true;

    let table = filter::select(&args)?;
    assert_eq!(table.col_labels(), ["S1", "S3"]);
    Ok(())
}

#[test]
fn head_rows() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = HeadArgs { input: file.path().to_path_buf(), label: "B".to_string(), ..Default::default() };
    let table = filter::head(&args)?;
    assert_eq!(table.row_labels(), ["ABC", "B"]);
    Ok(())
}

#[test]
fn head_unknown_label() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = HeadArgs { input: file.path().to_path_buf(), label: "Z".to_string(), ..Default::default() };
    assert!(filter::head(&args).is_err());
    Ok(())
}

#[test]
fn limit_threshold() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = LimitArgs {
        input: file.path().to_path_buf(),
        column: "S1".to_string(),
        criterion: ">= 1".to_string(),
        filter: FilterArgs::default(),
    };
    let table = filter::limit(&args)?;
    assert_eq!(table.row_labels(), ["B", "C", "DB"]);
    Ok(())
}

#[test]
fn limit_bad_criterion() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = LimitArgs {
        input: file.path().to_path_buf(),
        column: "S1".to_string(),
        criterion: "=>1".to_string(),
        filter: FilterArgs::default(),
    };
    let error = filter::limit(&args).err().map(|e| format!("{e:?}")).unwrap_or_default();
    assert!(error.contains("Failed to limit"), "{error}");
    Ok(())
}

#[test]
fn positional_keys() -> Result<(), Report> {
    let file = temp_table(TABLE)?;

    let args = HeadArgs { input: file.path().to_path_buf(), label: "#1".to_string(), ..Default::default() };
    assert_eq!(filter::head(&args)?.row_labels(), ["ABC", "B"]);

    let args = LimitArgs {
        input: file.path().to_path_buf(),
        column: "#0".to_string(),
        criterion: ">1".to_string(),
        filter: FilterArgs::default(),
    };
    assert_eq!(filter::limit(&args)?.row_labels(), ["DB"]);

    let mut args = match_args(&file, &["^1$"]);
    args.focus = Some("#1".to_string());
    assert_eq!(filter::grep(&args)?.row_labels(), ["ABC", "C"]);
    Ok(())
}

#[test]
fn protect_metadata_rows() -> Result<(), Report> {
    let file = temp_table(META)?;
    let mut shared = FilterArgs::default();

    // the metadata row is not numeric
    let args = LimitArgs {
        input: file.path().to_path_buf(),
        column: "S1".to_string(),
        criterion: ">=1".to_string(),
        filter: shared.clone(),
    };
    assert!(filter::limit(&args).is_err());

    shared.protect = Some("host".to_string());
    let args = LimitArgs { filter: shared.clone(), ..args };
    let table = filter::limit(&args)?;
    assert_eq!(table.row_labels(), ["host", "A"]);
    assert_eq!(table.row("host")?, ["cat", "dog"]);

    // filtering columns keeps the metadata aligned
    shared.transposed = true;
    let mut args = match_args(&file, &["S2"]);
    args.filter = shared;
    let table = filter::select(&args)?;
    assert_eq!(table.col_labels(), ["S2"]);
    assert_eq!(table.row_labels(), ["host", "A", "B"]);
    assert_eq!(table.col("S2")?, ["dog", "0", "2"]);
    Ok(())
}

#[test]
fn protect_unknown_row() -> Result<(), Report> {
    let file = temp_table(META)?;
    let mut args = match_args(&file, &["A"]);
    args.filter.protect = Some("missing".to_string());
    let error = filter::select(&args).err().map(|e| format!("{e:?}")).unwrap_or_default();
    assert!(error.contains("protected row"), "{error}");
    Ok(())
}

#[test]
fn select_values_file() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let values = temp_table("B\n\n DB \n")?;
    let mut args = match_args(&file, &["C"]);
    args.values_file = Some(values.path().to_path_buf());

    let table = filter::select(&args)?;
    assert_eq!(table.row_labels(), ["B", "C", "DB"]);

    args.values_file = Some(values.path().with_extension("missing"));
    assert!(filter::select(&args).is_err());
    Ok(())
}

#[test]
fn nontrivial_rows() -> Result<(), Report> {
    let file = temp_table(TABLE)?;
    let args = NontrivialArgs {
        input: file.path().to_path_buf(),
        min_count: 2,
        min_value: 1.0,
        filter: FilterArgs::default(),
    };
    let table = filter::nontrivial(&args)?;
    assert_eq!(table.row_labels(), ["B", "C"]);
    Ok(())
}

#[test]
fn nontrivial_protected() -> Result<(), Report> {
    let file = temp_table(META)?;
    let mut args = NontrivialArgs {
        input: file.path().to_path_buf(),
        min_count: 1,
        min_value: 2.0,
        filter: FilterArgs::default(),
    };
    assert!(filter::nontrivial(&args).is_err());

    args.filter.protect = Some("#0".to_string());
    let table = filter::nontrivial(&args)?;
    assert_eq!(table.row_labels(), ["host", "B"]);
    Ok(())
}
