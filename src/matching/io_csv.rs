// Primitives for reading CSV files.

use std::fs::File;

use crate::matching::{io_common::simplify_file_name, io_common::text_cell, *};

/// Reads a CSV file whose first row is the header.
///
/// The rows may be shorter or longer than the header, as some form exports
/// drop trailing empty cells.
pub fn read_csv_table(path: &str) -> BMatchResult<Table> {
    let mut records = get_records(path)?;

    let header = records
        .next()
        .context(MissingHeaderSnafu { path })?
        .context(CsvLineParseSnafu { path, lineno: 1_usize })?;
    let headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            // Excel adds a byte order mark to the exported files.
            let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();
    debug!("read_csv_table: {}: headers: {:?}", simplify_file_name(path), headers);

    let mut table = Table::new(headers);
    for (idx, line_r) in records.enumerate() {
        // The header is the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        if line.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_table: skipping empty line {}", lineno);
            continue;
        }
        table.push_row(line.iter().map(text_cell).collect());
    }
    Ok(table)
}

fn get_records(path: &str) -> MatchErrorResult<csv::StringRecordsIntoIter<File>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    Ok(rdr.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/basic_exclusive/participants.csv");
        let table = read_csv_table(path).unwrap();
        assert_eq!(
            table.headers,
            vec![
                "Student's Full Name",
                "Email",
                "Day Availability",
                "Times available",
                "Preferred language"
            ]
        );
        assert_eq!(table.len(), 3);
        let last = table.rows().last().unwrap();
        assert_eq!(last.get("Student's Full Name"), Some(&CellValue::from("Linus")));
        assert_eq!(last.get("Times available"), None);
    }

    #[test]
    fn missing_file() {
        let res = read_csv_table("/nonexistent/participants.csv");
        assert!(matches!(res.map_err(|e| *e), Err(MatchError::CsvOpen { .. })));
    }
}
