// ********* Input data structures ***********

use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::Display;

/// The raw content of a single spreadsheet cell.
///
/// The readers hand over cells without any interpretation. Numbers are kept
/// as numbers so that the normalization step decides how to render them.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// The textual content of the cell, or `None` if the cell is empty.
    ///
    /// Integral floats are rendered without their fractional part, since
    /// spreadsheets tend to store every number as a float.
    /// Large floats are never truncated to an integer type.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }

    /// The trimmed text of the cell, or `None` if it is empty or blank.
    pub fn as_trimmed_text(&self) -> Option<String> {
        self.as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// A parsed spreadsheet: the header row and the data rows below it.
///
/// Rows may be shorter than the header. The missing cells are treated as
/// absent.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Table {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Builds a table out of rows expressed as column name -> cell mappings.
    ///
    /// The header order is the one given by `headers`. Keys of the records that
    /// are not in the header are ignored.
    pub fn from_records(headers: &[String], records: &[HashMap<String, CellValue>]) -> Table {
        let mut table = Table::new(headers.to_vec());
        for record in records.iter() {
            let row = headers
                .iter()
                .map(|h| record.get(h).cloned().unwrap_or(CellValue::Empty))
                .collect();
            table.push_row(row);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|cells| TableRow {
            headers: &self.headers,
            cells,
        })
    }
}

/// A view over one row of a table.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TableRow<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> TableRow<'a> {
    /// The cell at the given column position, if the row is long enough.
    pub fn cell(&self, index: usize) -> Option<&'a CellValue> {
        self.cells.get(index)
    }

    /// The cell under the first header equal to `header`.
    pub fn get(&self, header: &str) -> Option<&'a CellValue> {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|idx| self.cell(idx))
    }
}

/// The two populations that get matched together.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Dataset {
    Participants,
    Volunteers,
}

impl Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Participants => write!(f, "participants"),
            Dataset::Volunteers => write!(f, "volunteers"),
        }
    }
}

/// The logical fields read out of each dataset.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Field {
    Days,
    Times,
    Language,
    Name,
    Email,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::Days => "days",
            Field::Times => "times",
            Field::Language => "language",
            Field::Name => "name",
            Field::Email => "email",
        };
        write!(f, "{}", s)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ParticipantId(pub usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct VolunteerId(pub usize);

/// The canonical availability of one person.
///
/// All the tokens are trimmed, lowercased and never empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Availability {
    pub days: BTreeSet<String>,
    pub times: BTreeSet<String>,
    pub langs: BTreeSet<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    /// The provided name, or the sequential row number if none was given.
    pub name: String,
    pub email: Option<String>,
    pub availability: Availability,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Volunteer {
    pub id: VolunteerId,
    /// The provided name, or the sequential row number if none was given.
    pub name: String,
    pub email: Option<String>,
    pub availability: Availability,
}

// ******** Output data structures *********

/// Score reported for a participant that did not receive a volunteer.
pub const NO_CANDIDATE_SCORE: i64 = -1;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MatchStatus {
    /// A volunteer was assigned. The score may be zero.
    Matched,
    /// Some volunteers were available, but the best one scored below the
    /// minimum score.
    BelowThreshold,
    /// No volunteer was available at all.
    NoCandidate,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::BelowThreshold => "below_threshold",
            MatchStatus::NoCandidate => "no_candidate",
        }
    }
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which dimensions overlapped between a participant and a volunteer.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub struct ScoreBreakdown {
    pub days: bool,
    pub times: bool,
    pub langs: bool,
}

impl ScoreBreakdown {
    /// The weighted score. Saturates at `u32::MAX`.
    pub fn total(&self, weights: &ScoreWeights) -> u32 {
        let mut score: u32 = 0;
        if self.days {
            score = score.saturating_add(weights.day);
        }
        if self.times {
            score = score.saturating_add(weights.time);
        }
        if self.langs {
            score = score.saturating_add(weights.language);
        }
        score
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchRecord {
    pub participant: ParticipantId,
    pub volunteer: Option<VolunteerId>,
    /// The score of the assigned volunteer, or `NO_CANDIDATE_SCORE`.
    pub score: i64,
    pub status: MatchStatus,
    /// Only present when a volunteer was assigned.
    pub breakdown: Option<ScoreBreakdown>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchResult {
    /// One record per participant, in input order.
    pub records: Vec<MatchRecord>,
    /// The state of the volunteer pool at the end of the run, indexed by the
    /// position of the volunteer in the input.
    /// In reusable mode, nothing is ever marked.
    pub assignments: Vec<Option<ParticipantId>>,
}

impl MatchResult {
    pub fn matched_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == MatchStatus::Matched)
            .count()
    }
}

/// Errors that prevent the matching from starting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MatchingErrors {
    /// A required column could not be found in the header.
    MissingColumn {
        dataset: Dataset,
        field: Field,
        headers: Vec<String>,
    },
    /// A column selection keyword or name is empty and would match anything.
    EmptyKeyword { dataset: Dataset, field: Field },
    /// Two records of the same dataset share an identifier.
    DuplicateId { dataset: Dataset, id: usize },
}

impl Error for MatchingErrors {}

impl Display for MatchingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingErrors::MissingColumn {
                dataset,
                field,
                headers,
            } => write!(
                f,
                "Cannot find the {} column in the {} dataset. Headers present: {:?}",
                field, dataset, headers
            ),
            MatchingErrors::EmptyKeyword { dataset, field } => write!(
                f,
                "Empty column selector for the {} column of the {} dataset",
                field, dataset
            ),
            MatchingErrors::DuplicateId { dataset, id } => {
                write!(f, "Duplicate identifier {} in the {} dataset", id, dataset)
            }
        }
    }
}

// ********* Configuration **********

/// The contribution of each overlapping dimension to the score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub day: u32,
    pub time: u32,
    pub language: u32,
}

impl ScoreWeights {
    pub const DEFAULT: ScoreWeights = ScoreWeights {
        day: 3,
        time: 3,
        language: 4,
    };

    /// The highest score a pair can reach. Saturates at `u32::MAX`.
    pub fn max_score(&self) -> u32 {
        self.day
            .saturating_add(self.time)
            .saturating_add(self.language)
    }

    /// The exact sum of the weights, or `None` if it does not fit in a `u32`.
    pub fn checked_max_score(&self) -> Option<u32> {
        self.day
            .checked_add(self.time)
            .and_then(|s| s.checked_add(self.language))
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights::DEFAULT
    }
}

/// Whether a volunteer can be given to more than one participant.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AssignmentMode {
    /// Each volunteer is used at most once per run.
    Exclusive,
    /// Every participant is matched against the full pool.
    Reusable,
}

impl Display for AssignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentMode::Exclusive => write!(f, "exclusive"),
            AssignmentMode::Reusable => write!(f, "reusable"),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchRules {
    pub weights: ScoreWeights,
    pub assignment_mode: AssignmentMode,
    /// If set, the best candidate must reach this score to be accepted.
    pub minimum_score: Option<u32>,
}

impl MatchRules {
    pub const DEFAULT_RULES: MatchRules = MatchRules {
        weights: ScoreWeights::DEFAULT,
        assignment_mode: AssignmentMode::Exclusive,
        minimum_score: None,
    };
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules::DEFAULT_RULES
    }
}
