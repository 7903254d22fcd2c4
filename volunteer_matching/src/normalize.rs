//! Turns free-text availability cells into canonical tokens.

use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::NaiveTime;
use log::{debug, warn};

use crate::columns::{resolve_columns, DatasetColumns, ResolvedColumn};
use crate::config::*;

const DELIMITERS: [char; 3] = [';', ',', '/'];

// Longest spellings first.
const MERIDIEM_SUFFIXES: [(&str, &str); 6] = [
    ("a.m.", "AM"),
    ("p.m.", "PM"),
    ("a.m", "AM"),
    ("p.m", "PM"),
    ("am", "AM"),
    ("pm", "PM"),
];

/// Splits a cell into its canonical tokens.
///
/// Absent and empty cells give an empty set. Otherwise the text is split on
/// any run of `;`, `,` and `/`, and each piece is trimmed and lowercased.
/// Empty pieces are dropped.
pub fn tokenize(cell: Option<&CellValue>) -> BTreeSet<String> {
    match cell.and_then(|c| c.as_text()) {
        Some(text) => tokenize_str(&text),
        None => BTreeSet::new(),
    }
}

pub fn tokenize_str(text: &str) -> BTreeSet<String> {
    text.split(|c: char| DELIMITERS.contains(&c))
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// The outcome of normalizing a time token.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum TimeToken {
    /// The token was understood as a clock time.
    Parsed(NaiveTime),
    /// The token is not a clock time (for example "afternoon"). It is kept
    /// trimmed and lowercased.
    Unparsed(String),
}

impl TimeToken {
    /// `HH:MM` for clock times, the cleaned token otherwise.
    pub fn canonical(&self) -> String {
        match self {
            TimeToken::Parsed(t) => t.format("%H:%M").to_string(),
            TimeToken::Unparsed(s) => s.clone(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, TimeToken::Parsed(_))
    }
}

impl Display for TimeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Reads a token as a clock time, falling back to the cleaned token.
///
/// ```
/// use volunteer_matching::normalize::{normalize_time, TimeToken};
///
/// assert_eq!(normalize_time("4pm").canonical(), "16:00");
/// assert_eq!(normalize_time("4:00 PM").canonical(), "16:00");
/// assert_eq!(
///     normalize_time(" Afternoon "),
///     TimeToken::Unparsed("afternoon".to_string())
/// );
/// ```
pub fn normalize_time(token: &str) -> TimeToken {
    let cleaned = token.trim().to_lowercase();
    match parse_clock_time(&cleaned) {
        Some(t) => TimeToken::Parsed(t),
        None => TimeToken::Unparsed(cleaned),
    }
}

/// Normalizes all the time tokens. The result is deduplicated and sorted.
pub fn normalize_time_set<I, S>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unparsed = 0;
    let res: BTreeSet<String> = tokens
        .into_iter()
        .map(|t| {
            let tt = normalize_time(t.as_ref());
            if !tt.is_parsed() {
                unparsed += 1;
            }
            tt.canonical()
        })
        .collect();
    if unparsed > 0 {
        debug!(
            "normalize_time_set: {} token(s) kept as free text: {:?}",
            unparsed, res
        );
    }
    res
}

// Expects a lowercased token.
fn parse_clock_time(token: &str) -> Option<NaiveTime> {
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    let (body, meridiem) = split_meridiem(&compact);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }
    let hm = if body.contains(':') {
        body.to_string()
    } else if body.len() <= 2 {
        format!("{}:00", body)
    } else {
        return None;
    };

    match meridiem {
        Some(m) => {
            let s = format!("{} {}", hm, m);
            NaiveTime::parse_from_str(&s, "%I:%M %p")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%I:%M:%S %p"))
                .ok()
        }
        None => NaiveTime::parse_from_str(&hm, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&hm, "%H:%M:%S"))
            .ok(),
    }
}

fn split_meridiem(s: &str) -> (&str, Option<&'static str>) {
    for (suffix, meridiem) in MERIDIEM_SUFFIXES.iter() {
        if let Some(body) = s.strip_suffix(suffix) {
            return (body, Some(*meridiem));
        }
    }
    (s, None)
}

// ********* Table normalization **********

struct NormalizedRow {
    name: String,
    email: Option<String>,
    availability: Availability,
}

/// Reads the participants out of a table, in row order.
pub fn normalize_participants(
    table: &Table,
    columns: &DatasetColumns,
) -> Result<Vec<Participant>, MatchingErrors> {
    let rows = normalize_rows(Dataset::Participants, table, columns)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, r)| Participant {
            id: ParticipantId(idx),
            name: r.name,
            email: r.email,
            availability: r.availability,
        })
        .collect())
}

/// Reads the volunteers out of a table, in row order.
pub fn normalize_volunteers(
    table: &Table,
    columns: &DatasetColumns,
) -> Result<Vec<Volunteer>, MatchingErrors> {
    let rows = normalize_rows(Dataset::Volunteers, table, columns)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, r)| Volunteer {
            id: VolunteerId(idx),
            name: r.name,
            email: r.email,
            availability: r.availability,
        })
        .collect())
}

/// Normalizes lists of already separated entries, as typed by a caller.
///
/// Each entry may itself contain delimiters.
pub fn availability_from_entries(
    days: &[String],
    times: &[String],
    langs: &[String],
) -> Availability {
    let split = |entries: &[String]| -> BTreeSet<String> {
        entries.iter().flat_map(|e| tokenize_str(e)).collect()
    };
    Availability {
        days: split(days),
        times: normalize_time_set(split(times)),
        langs: split(langs),
    }
}

fn normalize_rows(
    dataset: Dataset,
    table: &Table,
    columns: &DatasetColumns,
) -> Result<Vec<NormalizedRow>, MatchingErrors> {
    let resolved = resolve_columns(dataset, columns, &table.headers)?;
    debug!("normalize_rows: {}: resolved columns: {:?}", dataset, resolved);
    if resolved.language.is_none() {
        debug!(
            "normalize_rows: {}: no language column, the language dimension will not score",
            dataset
        );
    }

    let read = |row: &TableRow, col: &Option<ResolvedColumn>| -> Option<String> {
        col.as_ref()
            .and_then(|c| row.cell(c.index))
            .and_then(|cell| cell.as_trimmed_text())
    };

    let mut res: Vec<NormalizedRow> = Vec::new();
    for (idx, row) in table.rows().enumerate() {
        let days = tokenize(row.cell(resolved.days.index));
        let times = normalize_time_set(tokenize(row.cell(resolved.times.index)));
        let langs = resolved
            .language
            .as_ref()
            .map(|c| tokenize(row.cell(c.index)))
            .unwrap_or_default();
        let name = read(&row, &resolved.name).unwrap_or_else(|| {
            if resolved.name.is_some() {
                warn!(
                    "normalize_rows: {}: row {} has no name, using its position",
                    dataset,
                    idx + 1
                );
            }
            (idx + 1).to_string()
        });
        let email = read(&row, &resolved.email);
        debug!(
            "normalize_rows: {}: row {}: name: {:?} days: {:?} times: {:?} langs: {:?}",
            dataset,
            idx + 1,
            name,
            days,
            times,
            langs
        );
        res.push(NormalizedRow {
            name,
            email,
            availability: Availability { days, times, langs },
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnStrategy;

    #[test]
    fn tokenize_absent_cell() {
        assert!(tokenize(None).is_empty());
        assert!(tokenize(Some(&CellValue::Empty)).is_empty());
    }

    #[test]
    fn tokenize_mixed_delimiters() {
        let cell = CellValue::from(" Monday;Wednesday ,, Friday / SATURDAY;; ");
        let tokens: Vec<String> = tokenize(Some(&cell)).into_iter().collect();
        assert_eq!(tokens, vec!["friday", "monday", "saturday", "wednesday"]);
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tokenize_numbers() {
        assert_eq!(tokenize(Some(&CellValue::Float(4.0))), set(&["4"]));
        assert_eq!(tokenize(Some(&CellValue::Float(4.5))), set(&["4.5"]));
        assert_eq!(tokenize(Some(&CellValue::Int(12))), set(&["12"]));
        assert_eq!(
            tokenize(Some(&CellValue::Float(1e20))),
            set(&["100000000000000000000"])
        );
    }

    #[test]
    fn normalize_clock_times() {
        for (input, expected) in [
            ("4pm", "16:00"),
            ("4 PM", "16:00"),
            ("4:00 PM", "16:00"),
            ("4:30pm", "16:30"),
            ("4 p.m.", "16:00"),
            ("12am", "00:00"),
            ("12 pm", "12:00"),
            ("9am", "09:00"),
            ("16:00", "16:00"),
            ("16:00:30", "16:00"),
            ("9", "09:00"),
        ] {
            let tt = normalize_time(input);
            assert!(tt.is_parsed(), "{} was not parsed", input);
            assert_eq!(tt.canonical(), expected, "input: {}", input);
        }
    }

    #[test]
    fn normalize_descriptors_pass_through() {
        for (input, expected) in [
            ("afternoon", "afternoon"),
            ("  Evening ", "evening"),
            ("team", "team"),
            ("4-5pm", "4-5pm"),
            ("25:00", "25:00"),
            ("1600", "1600"),
        ] {
            assert_eq!(
                normalize_time(input),
                TimeToken::Unparsed(expected.to_string())
            );
        }
    }

    #[test]
    fn normalize_time_set_dedups_and_sorts() {
        let res = normalize_time_set(["4pm", "16:00", "afternoon", "9am"]);
        let v: Vec<String> = res.into_iter().collect();
        assert_eq!(v, vec!["09:00", "16:00", "afternoon"]);
    }

    #[test]
    fn normalize_participants_table() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut table = Table::new(vec![
            "Student's Full Name".to_string(),
            "Day Availability".to_string(),
            "Time Availability".to_string(),
        ]);
        table.push_row(vec![
            "Ada".into(),
            "Monday, Wednesday".into(),
            "4pm; 5:00 PM".into(),
        ]);
        table.push_row(vec![CellValue::Empty, "Friday".into()]);

        let columns = DatasetColumns {
            name: Some(ColumnStrategy::exact("Student's Full Name")),
            ..DatasetColumns::default()
        };
        let ps = normalize_participants(&table, &columns).unwrap();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].name, "Ada");
        assert_eq!(ps[0].id, ParticipantId(0));
        assert!(ps[0].availability.days.contains("wednesday"));
        assert!(ps[0].availability.times.contains("17:00"));
        assert!(ps[0].availability.langs.is_empty());
        // Blank name and ragged row.
        assert_eq!(ps[1].name, "2");
        assert!(ps[1].availability.times.is_empty());
    }
}
