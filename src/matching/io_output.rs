// Writing the matches.

use std::fs::File;
use std::io::Write;

use crate::matching::*;

pub const CSV_HEADER: [&str; 9] = [
    "Participant",
    "Participant Email",
    "Volunteer",
    "Volunteer Email",
    "Score",
    "Status",
    "Shared Days",
    "Shared Times",
    "Shared Languages",
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(format: Option<&str>) -> BMatchResult<OutputFormat> {
        match format {
            None | Some("csv") => Ok(OutputFormat::Csv),
            Some("json") => Ok(OutputFormat::Json),
            Some(x) => Err(Box::new(MatchError::UnknownFormat {
                format: x.to_string(),
            })),
        }
    }
}

fn row_record(row: &MatchRow) -> Vec<String> {
    vec![
        row.participant.clone(),
        row.participant_email.clone().unwrap_or_default(),
        row.volunteer.clone().unwrap_or_default(),
        row.volunteer_email.clone().unwrap_or_default(),
        row.score.to_string(),
        row.status.to_string(),
        row.shared_days.join(", "),
        row.shared_times.join(", "),
        row.shared_langs.join(", "),
    ]
}

pub fn write_rows_csv<W: Write>(writer: W, rows: &[MatchRow], path: &str) -> BMatchResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)
        .context(WritingCsvSnafu { path })?;
    for row in rows.iter() {
        wtr.write_record(row_record(row))
            .context(WritingCsvSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    Ok(())
}

fn write_to<W: Write>(
    mut writer: W,
    format: OutputFormat,
    outcome: &MatchOutcome,
    path: &str,
) -> BMatchResult<()> {
    match format {
        OutputFormat::Csv => write_rows_csv(writer, &outcome.rows, path),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&outcome.summary).context(ParsingJsonSnafu {})?;
            writeln!(writer, "{}", pretty).context(WritingFileSnafu { path })?;
            Ok(())
        }
    }
}

/// Writes the outcome to a file, or to the standard output if no file is
/// given or the path is `stdout`.
pub fn write_output(
    path_o: Option<&str>,
    format: OutputFormat,
    outcome: &MatchOutcome,
) -> BMatchResult<()> {
    match path_o {
        None | Some("stdout") => {
            let stdout = std::io::stdout();
            write_to(stdout.lock(), format, outcome, "stdout")
        }
        Some(path) => {
            info!("Writing {} matches to {:?}", outcome.rows.len(), path);
            let file = File::create(path).context(WritingFileSnafu { path })?;
            write_to(file, format, outcome, path)
        }
    }
}
