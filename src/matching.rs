use log::{debug, info, warn};

use volunteer_matching::builder::Builder;
use volunteer_matching::output::MatchRow;
use volunteer_matching::*;

use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::matching::config_reader::*;
use crate::matching::io_common::resolve_path;
use crate::matching::io_output::{write_output, OutputFormat};

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_output;

#[derive(Debug, Snafu)]
pub enum MatchError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The file {path} does not contain any data"))]
    EmptyExcel { path: String },
    #[snafu(display("The worksheet {name} cannot be found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("The file {path} does not have a header row"))]
    MissingHeader { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Cannot access the current directory"))]
    CurrentDir { source: std::io::Error },
    #[snafu(display("Unknown provider {provider:?} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown assignment mode {mode:?} (expected exclusive or reusable)"))]
    UnknownMode { mode: String },
    #[snafu(display("Unknown output format {format:?} (expected csv or json)"))]
    UnknownFormat { format: String },
    #[snafu(display("The weights (day {day}, time {time}, language {language}) do not fit in a 32-bit score"))]
    InvalidWeights { day: u32, time: u32, language: u32 },
    #[snafu(display("No {dataset} file was provided"))]
    MissingInput { dataset: Dataset },
    #[snafu(display("{source}"))]
    Matching { source: MatchingErrors },
    #[snafu(display("Error writing the matches to {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing the matches to {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed summary and the reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type MatchErrorResult<T> = Result<T, MatchError>;
// The errors are large, boxing them keeps the results small.
pub type BMatchResult<T> = Result<T, Box<MatchError>>;

/// The outcome of a run, before it is written anywhere.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub rows: Vec<MatchRow>,
    pub summary: JSValue,
}

fn read_dataset(root: &Path, dataset: Dataset, source: &FileSource) -> BMatchResult<Table> {
    let path = resolve_path(root, &source.file_path);
    info!("Attempting to read {} file {:?}", dataset, path);
    let table = match source.provider.as_str() {
        "csv" => io_csv::read_csv_table(&path)?,
        "xlsx" => io_excel::read_excel_table(&path, source.excel_worksheet_name.as_deref())?,
        x => {
            return Err(Box::new(MatchError::UnknownProvider {
                provider: x.to_string(),
            }))
        }
    };
    info!(
        "read_dataset: {}: {} rows, headers: {:?}",
        dataset,
        table.len(),
        table.headers
    );
    Ok(table)
}

fn build_summary_js(rules: &MatchRules, rows: &[MatchRow], num_volunteers: usize) -> JSValue {
    let c = OutputConfig {
        assignment_mode: rules.assignment_mode.to_string(),
        day_weight: rules.weights.day,
        time_weight: rules.weights.time,
        language_weight: rules.weights.language,
        minimum_score: rules.minimum_score,
    };
    let matches: Vec<JSValue> = rows.iter().map(row_to_json).collect();
    let matched = rows
        .iter()
        .filter(|r| r.status == MatchStatus::Matched)
        .count();
    json!({
        "config": c,
        "matches": matches,
        "summary": {
            "participants": rows.len(),
            "volunteers": num_volunteers,
            "matched": matched,
            "unmatched": rows.len() - matched,
        }
    })
}

fn row_to_json(row: &MatchRow) -> JSValue {
    json!({
        "participant": row.participant,
        "participantEmail": row.participant_email,
        "volunteer": row.volunteer,
        "volunteerEmail": row.volunteer_email,
        "score": row.score,
        "status": row.status.as_str(),
        "sharedDays": row.shared_days,
        "sharedTimes": row.shared_times,
        "sharedLanguages": row.shared_langs,
    })
}

/// Reads both datasets, runs the matching and assembles the summary.
pub fn compute_matches(config: &MatchingConfig, root: &Path) -> BMatchResult<MatchOutcome> {
    let rules = validate_rules(&config.rules)?;
    info!("rules: {:?}", rules);

    let participants_source = config
        .participants
        .as_ref()
        .context(MissingInputSnafu {
            dataset: Dataset::Participants,
        })?;
    let volunteers_source = config
        .volunteers
        .as_ref()
        .context(MissingInputSnafu {
            dataset: Dataset::Volunteers,
        })?;

    let participants = read_dataset(root, Dataset::Participants, participants_source)?;
    let volunteers = read_dataset(root, Dataset::Volunteers, volunteers_source)?;

    let builder = Builder::new(&rules)
        .and_then(|b| b.participants(&participants, &validate_columns(participants_source)))
        .and_then(|b| b.volunteers(&volunteers, &validate_columns(volunteers_source)))
        .context(MatchingSnafu {})?;
    let result = builder.run().context(MatchingSnafu {})?;
    debug!("compute_matches: assignments: {:?}", result.assignments);

    let rows = builder.rows(&result);
    let summary = build_summary_js(&rules, &rows, builder.volunteer_records().len());
    info!(
        "compute_matches: {} participants, {} matched",
        rows.len(),
        result.matched_count()
    );
    Ok(MatchOutcome { rows, summary })
}

/// Compares a summary with the reference summary stored at the given path.
///
/// The differences are printed on the standard output.
pub fn check_reference(summary: &JSValue, reference_path: &str) -> BMatchResult<()> {
    let summary_ref = read_summary(reference_path.to_string())?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_js_summary = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_summary {
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_summary.as_str(),
            "\n",
        );
        return Err(Box::new(MatchError::ReferenceMismatch {}));
    }
    Ok(())
}

// Paths given on the command line are relative to the current directory, not
// to the configuration file.
fn absolute_path(path: &str) -> MatchErrorResult<String> {
    if path == "stdout" || Path::new(path).is_absolute() {
        return Ok(path.to_string());
    }
    let cwd = std::env::current_dir().context(CurrentDirSnafu {})?;
    Ok(cwd.join(path).display().to_string())
}

fn override_source(
    source: Option<FileSource>,
    file_path: &Option<String>,
    args: &Args,
) -> MatchErrorResult<Option<FileSource>> {
    let mut source = match (source, file_path) {
        (None, None) => return Ok(None),
        (Some(s), None) => s,
        (s, Some(p)) => FileSource {
            file_path: absolute_path(p)?,
            ..s.unwrap_or_else(|| FileSource::from_path(p, "csv"))
        },
    };
    if let Some(input_type) = &args.input_type {
        source.provider = input_type.clone();
    }
    if let Some(name) = &args.excel_worksheet_name {
        source.excel_worksheet_name = Some(name.clone());
    }
    Ok(Some(source))
}

fn merge_args(config: MatchingConfig, args: &Args) -> MatchErrorResult<MatchingConfig> {
    let participants = override_source(config.participants, &args.participants, args)?;
    let volunteers = override_source(config.volunteers, &args.volunteers, args)?;
    if participants.is_none() || volunteers.is_none() {
        whatever!("Both a participants file and a volunteers file are required: use --config, or --participants and --volunteers");
    }

    let mut output_settings = config.output_settings;
    if let Some(out) = &args.out {
        output_settings.output_file = Some(absolute_path(out)?);
    }
    if let Some(format) = &args.format {
        output_settings.format = Some(format.clone());
    }

    let mut rules = config.rules;
    if let Some(mode) = &args.mode {
        rules.assignment_mode = Some(mode.clone());
    }

    Ok(MatchingConfig {
        output_settings,
        participants,
        volunteers,
        rules,
    })
}

/// Runs the program as described by the command line.
pub fn run_from_args(args: &Args) -> BMatchResult<()> {
    let (config, root): (MatchingConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (MatchingConfig::default(), PathBuf::new()),
    };
    let config = merge_args(config, args)?;
    info!("config: {:?}", config);

    let format = OutputFormat::parse(config.output_settings.format.as_deref())?;
    let outcome = compute_matches(&config, &root)?;

    let out_path = config
        .output_settings
        .output_file
        .as_ref()
        .map(|p| resolve_path(&root, p));
    write_output(out_path.as_deref(), format, &outcome)?;

    if let Some(reference_path) = &args.reference {
        check_reference(&outcome.summary, reference_path)?;
        info!("The summary matches the reference {:?}", reference_path);
    }
    Ok(())
}

#[cfg(test)]
fn run_matching_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> BMatchResult<()> {
    let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
    let config = read_config(&config_path)?;
    let root = Path::new(&config_path)
        .parent()
        .context(MissingParentDirSnafu {})?
        .to_path_buf();
    let outcome = compute_matches(&config, &root)?;
    check_reference(
        &outcome.summary,
        &format!("{}/{}/{}", test_dir, test_name, summary_lpath),
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let res = run_matching_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    if let Err(e) = res {
        panic!("Test {} failed: {}", test_name, e);
    }
}
