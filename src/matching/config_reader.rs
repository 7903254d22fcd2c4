use crate::matching::*;

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use volunteer_matching::columns::{ColumnStrategy, DatasetColumns};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    pub format: Option<String>,
}

/// The configuration, as written back in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "assignmentMode")]
    pub assignment_mode: String,
    #[serde(rename = "dayWeight")]
    pub day_weight: u32,
    #[serde(rename = "timeWeight")]
    pub time_weight: u32,
    #[serde(rename = "languageWeight")]
    pub language_weight: u32,
    #[serde(rename = "minimumScore")]
    pub minimum_score: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "dayKeyword")]
    pub day_keyword: Option<String>,
    #[serde(rename = "timeKeyword")]
    pub time_keyword: Option<String>,
    #[serde(rename = "dayColumn")]
    pub day_column: Option<String>,
    #[serde(rename = "timeColumn")]
    pub time_column: Option<String>,
    #[serde(rename = "languageColumn")]
    pub language_column: Option<String>,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "emailColumn")]
    pub email_column: Option<String>,
}

impl FileSource {
    /// A source with the default column settings.
    pub fn from_path(file_path: &str, provider: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
            day_keyword: None,
            time_keyword: None,
            day_column: None,
            time_column: None,
            language_column: None,
            name_column: None,
            email_column: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchingRules {
    #[serde(rename = "dayWeight")]
    pub day_weight: Option<u32>,
    #[serde(rename = "timeWeight")]
    pub time_weight: Option<u32>,
    #[serde(rename = "languageWeight")]
    pub language_weight: Option<u32>,
    #[serde(rename = "assignmentMode")]
    pub assignment_mode: Option<String>,
    #[serde(rename = "minimumScore")]
    pub minimum_score: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchingConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    pub participants: Option<FileSource>,
    pub volunteers: Option<FileSource>,
    #[serde(default)]
    pub rules: MatchingRules,
}

pub fn read_config(path: &str) -> BMatchResult<MatchingConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: MatchingConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> BMatchResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

pub fn validate_mode(mode: &str) -> BMatchResult<AssignmentMode> {
    match mode {
        "exclusive" => Ok(AssignmentMode::Exclusive),
        "reusable" => Ok(AssignmentMode::Reusable),
        x => Err(Box::new(MatchError::UnknownMode {
            mode: x.to_string(),
        })),
    }
}

pub fn validate_rules(rules: &MatchingRules) -> BMatchResult<MatchRules> {
    let defaults = ScoreWeights::DEFAULT;
    let weights = ScoreWeights {
        day: rules.day_weight.unwrap_or(defaults.day),
        time: rules.time_weight.unwrap_or(defaults.time),
        language: rules.language_weight.unwrap_or(defaults.language),
    };
    if weights.checked_max_score().is_none() {
        return Err(Box::new(MatchError::InvalidWeights {
            day: weights.day,
            time: weights.time,
            language: weights.language,
        }));
    }
    let res = MatchRules {
        weights,
        assignment_mode: match rules.assignment_mode.as_deref() {
            None => AssignmentMode::Exclusive,
            Some(m) => validate_mode(m)?,
        },
        minimum_score: rules.minimum_score,
    };
    Ok(res)
}

/// The column strategies for one dataset.
///
/// An explicit column name takes precedence over a keyword.
pub fn validate_columns(source: &FileSource) -> DatasetColumns {
    let defaults = DatasetColumns::default();
    let pick = |column: &Option<String>, keyword: &Option<String>, default: ColumnStrategy| {
        match (column, keyword) {
            (Some(c), _) => ColumnStrategy::exact(c),
            (None, Some(k)) => ColumnStrategy::substring(k),
            (None, None) => default,
        }
    };
    DatasetColumns {
        days: pick(&source.day_column, &source.day_keyword, defaults.days),
        times: pick(&source.time_column, &source.time_keyword, defaults.times),
        language: source.language_column.as_deref().map(ColumnStrategy::exact),
        name: source.name_column.as_deref().map(ColumnStrategy::exact),
        email: source.email_column.as_deref().map(ColumnStrategy::exact),
    }
}
