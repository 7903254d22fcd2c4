//! Finding the columns to read in a header.
//!
//! Form exports change the wording of their questions from one revision to the
//! next. The columns are therefore located through a strategy rather than a
//! fixed name.

use log::{debug, warn};

use crate::config::*;

/// How to pick a column in a header. All comparisons ignore case.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ColumnStrategy {
    /// The first header (in file order) that contains the keyword.
    Substring(String),
    /// The header equal to the name, surrounding whitespace ignored.
    Exact(String),
    /// A prioritized list of keywords: the first keyword that is contained in
    /// any header wins.
    Keywords(Vec<String>),
}

impl ColumnStrategy {
    pub fn substring(keyword: &str) -> ColumnStrategy {
        ColumnStrategy::Substring(keyword.to_string())
    }

    pub fn exact(name: &str) -> ColumnStrategy {
        ColumnStrategy::Exact(name.to_string())
    }

    pub fn keywords(keywords: &[&str]) -> ColumnStrategy {
        ColumnStrategy::Keywords(keywords.iter().map(|k| k.to_string()).collect())
    }

    /// All the positions this strategy accepts, best first.
    pub fn candidates(&self, headers: &[String]) -> Vec<usize> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let containing = |keyword: &str| -> Vec<usize> {
            let k = keyword.trim().to_lowercase();
            lowered
                .iter()
                .enumerate()
                .filter(|(_, h)| h.contains(k.as_str()))
                .map(|(idx, _)| idx)
                .collect()
        };
        match self {
            ColumnStrategy::Substring(keyword) => containing(keyword),
            ColumnStrategy::Exact(name) => {
                let n = name.trim().to_lowercase();
                lowered
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| **h == n)
                    .map(|(idx, _)| idx)
                    .collect()
            }
            ColumnStrategy::Keywords(keywords) => {
                let mut res: Vec<usize> = Vec::new();
                for k in keywords.iter() {
                    for idx in containing(k) {
                        if !res.contains(&idx) {
                            res.push(idx);
                        }
                    }
                }
                res
            }
        }
    }

    fn has_empty_selector(&self) -> bool {
        match self {
            ColumnStrategy::Substring(s) | ColumnStrategy::Exact(s) => s.trim().is_empty(),
            ColumnStrategy::Keywords(ks) => ks.is_empty() || ks.iter().any(|k| k.trim().is_empty()),
        }
    }
}

/// Where to find each field in one dataset.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DatasetColumns {
    pub days: ColumnStrategy,
    pub times: ColumnStrategy,
    /// If not set or not found, the language dimension never scores.
    pub language: Option<ColumnStrategy>,
    /// If not set, the participants and volunteers are named by their row number.
    pub name: Option<ColumnStrategy>,
    pub email: Option<ColumnStrategy>,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        DatasetColumns {
            days: ColumnStrategy::substring("day"),
            times: ColumnStrategy::substring("time"),
            language: None,
            name: None,
            email: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolvedColumns {
    pub days: ResolvedColumn,
    pub times: ResolvedColumn,
    pub language: Option<ResolvedColumn>,
    pub name: Option<ResolvedColumn>,
    pub email: Option<ResolvedColumn>,
}

/// Resolves all the columns of a dataset.
///
/// The days and times columns are required. The optional columns that are
/// configured but cannot be found resolve to `None`.
pub fn resolve_columns(
    dataset: Dataset,
    columns: &DatasetColumns,
    headers: &[String],
) -> Result<ResolvedColumns, MatchingErrors> {
    let days = resolve_column(dataset, Field::Days, &columns.days, headers)?.ok_or_else(|| {
        MatchingErrors::MissingColumn {
            dataset,
            field: Field::Days,
            headers: headers.to_vec(),
        }
    })?;
    let times = resolve_column(dataset, Field::Times, &columns.times, headers)?.ok_or_else(|| {
        MatchingErrors::MissingColumn {
            dataset,
            field: Field::Times,
            headers: headers.to_vec(),
        }
    })?;
    Ok(ResolvedColumns {
        days,
        times,
        language: resolve_optional(dataset, Field::Language, &columns.language, headers)?,
        name: resolve_optional(dataset, Field::Name, &columns.name, headers)?,
        email: resolve_optional(dataset, Field::Email, &columns.email, headers)?,
    })
}

/// Resolves a single column. `Ok(None)` means that nothing matched.
pub fn resolve_column(
    dataset: Dataset,
    field: Field,
    strategy: &ColumnStrategy,
    headers: &[String],
) -> Result<Option<ResolvedColumn>, MatchingErrors> {
    if strategy.has_empty_selector() {
        return Err(MatchingErrors::EmptyKeyword { dataset, field });
    }
    let candidates = strategy.candidates(headers);
    if candidates.len() > 1 {
        let ignored: Vec<&String> = candidates[1..].iter().map(|idx| &headers[*idx]).collect();
        warn!(
            "{}: several headers match the {} column, using {:?} and ignoring {:?}",
            dataset, field, headers[candidates[0]], ignored
        );
    }
    let res = candidates.first().map(|idx| ResolvedColumn {
        index: *idx,
        header: headers[*idx].clone(),
    });
    debug!(
        "resolve_column: {} {} with {:?}: {:?}",
        dataset, field, strategy, res
    );
    Ok(res)
}

fn resolve_optional(
    dataset: Dataset,
    field: Field,
    strategy: &Option<ColumnStrategy>,
    headers: &[String],
) -> Result<Option<ResolvedColumn>, MatchingErrors> {
    match strategy {
        None => Ok(None),
        Some(s) => {
            let res = resolve_column(dataset, field, s, headers)?;
            if res.is_none() {
                warn!(
                    "{}: the {} column {:?} is not in the header {:?}",
                    dataset, field, s, headers
                );
            }
            Ok(res)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(hs: &[&str]) -> Vec<String> {
        hs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substring_first_match_wins() {
        let hs = headers(&[
            "Timestamp",
            "Day(s) Available-  Please select at least two days",
            "Time Availability (Sessions are 30min- 1 hour long)",
        ]);
        let cols = resolve_columns(Dataset::Volunteers, &DatasetColumns::default(), &hs).unwrap();
        assert_eq!(cols.days.index, 1);
        // The timestamp column shadows the real one.
        assert_eq!(cols.times.index, 0);
        assert_eq!(cols.times.header, "Timestamp");
    }

    #[test]
    fn keywords_follow_priority() {
        let hs = headers(&["Timestamp", "Days", "Time Availability"]);
        let s = ColumnStrategy::keywords(&["time availability", "time"]);
        assert_eq!(s.candidates(&hs), vec![2, 0]);
    }

    #[test]
    fn exact_ignores_case_and_spaces() {
        let hs = headers(&["Name ", "Language"]);
        assert_eq!(ColumnStrategy::exact("name").candidates(&hs), vec![0]);
        assert!(ColumnStrategy::exact("lang").candidates(&hs).is_empty());
    }

    #[test]
    fn missing_required_column() {
        let hs = headers(&["Name", "Days"]);
        let res = resolve_columns(Dataset::Participants, &DatasetColumns::default(), &hs);
        assert_eq!(
            res,
            Err(MatchingErrors::MissingColumn {
                dataset: Dataset::Participants,
                field: Field::Times,
                headers: hs.clone(),
            })
        );
        let msg = res.unwrap_err().to_string();
        assert!(msg.contains("participants"));
        assert!(msg.contains("\"Days\""));
    }

    #[test]
    fn missing_optional_column() {
        let hs = headers(&["Days", "Times"]);
        let columns = DatasetColumns {
            language: Some(ColumnStrategy::exact("Language")),
            ..DatasetColumns::default()
        };
        let cols = resolve_columns(Dataset::Volunteers, &columns, &hs).unwrap();
        assert_eq!(cols.language, None);
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let hs = headers(&["Days", "Times"]);
        let columns = DatasetColumns {
            days: ColumnStrategy::substring(" "),
            ..DatasetColumns::default()
        };
        assert_eq!(
            resolve_columns(Dataset::Volunteers, &columns, &hs),
            Err(MatchingErrors::EmptyKeyword {
                dataset: Dataset::Volunteers,
                field: Field::Days,
            })
        );
    }
}
