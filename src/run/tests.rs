use crate::cli::Cli;
use crate::run::run;
use crate::utils::temp_table;
use clap::Parser;
use color_eyre::eyre::{Report, Result};
use indoc::indoc;

const TABLE: &str = indoc! {"
    #\tS1\tS2
    host\tcat\tdog
    A\t1\t2
    B\t3\t4
"};

#[test]
fn run_grep_to_file() -> Result<(), Report> {
    let input = temp_table(TABLE)?;
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.tsv");

    let input_arg = input.path().to_string_lossy().to_string();
    let output_arg = output.to_string_lossy().to_string();
    let args = Cli::try_parse_from(["tabkit", "grep", &input_arg, "^[AB]$", "-o", &output_arg])?;
    run(args.command)?;

    assert_eq!(std::fs::read_to_string(&output)?, "#\tS1\tS2\nA\t1\t2\nB\t3\t4\n");
    Ok(())
}

#[test]
fn run_transpose_markdown() -> Result<(), Report> {
    let input = temp_table("#\tx\nA\t1\n")?;
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.md");

    let input_arg = input.path().to_string_lossy().to_string();
    let output_arg = output.to_string_lossy().to_string();
    let args = Cli::try_parse_from(["tabkit", "transpose", &input_arg, "--format", "markdown", "-o", &output_arg])?;
    run(args.command)?;

    assert_eq!(std::fs::read_to_string(&output)?, "| # | A |\n|---|---|\n| x | 1 |\n");
    Ok(())
}

#[test]
fn run_stratify_writes_strata() -> Result<(), Report> {
    let input = temp_table("#\thost\tn\nA\tcat\t1\nB\tdog\t2\nC\tcat\t3\n")?;
    let dir = tempfile::tempdir()?;

    let input_arg = input.path().to_string_lossy().to_string();
    let dir_arg = dir.path().to_string_lossy().to_string();
    let args = Cli::try_parse_from(["tabkit", "stratify", &input_arg, "host", "--output-dir", &dir_arg])?;
    run(args.command)?;

    let cat = std::fs::read_to_string(dir.path().join("cat.tsv"))?;
    assert_eq!(cat, "#\thost\tn\nA\tcat\t1\nC\tcat\t3\n");
    assert!(dir.path().join("dog.tsv").exists());
    Ok(())
}

#[test]
fn run_nontrivial_protected() -> Result<(), Report> {
    let input = temp_table(TABLE)?;
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.tsv");

    let input_arg = input.path().to_string_lossy().to_string();
    let output_arg = output.to_string_lossy().to_string();
    let args = Cli::try_parse_from([
        "tabkit",
        "nontrivial",
        &input_arg,
        "--min-value",
        "3",
        "--protect",
        "host",
        "-o",
        &output_arg,
    ])?;
    run(args.command)?;

    assert_eq!(std::fs::read_to_string(&output)?, "#\tS1\tS2\nhost\tcat\tdog\nB\t3\t4\n");
    Ok(())
}

#[test]
fn run_missing_input() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.tsv").to_string_lossy().to_string();
    let args = Cli::try_parse_from(["tabkit", "transpose", &missing])?;
    assert!(run(args.command).is_err());
    Ok(())
}
