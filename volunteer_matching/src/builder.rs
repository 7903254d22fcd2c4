pub use crate::columns::{ColumnStrategy, DatasetColumns};
pub use crate::config::*;
use crate::normalize::{availability_from_entries, normalize_participants, normalize_volunteers};
use crate::output::{build_rows, MatchRow};

/// A builder for collecting participants and volunteers before a run.
///
/// The populations can be read out of tables or added one by one.
///
/// ```
/// pub use volunteer_matching::builder::Builder;
/// pub use volunteer_matching::{MatchRules, NO_CANDIDATE_SCORE};
/// # use volunteer_matching::MatchingErrors;
///
/// let mut builder = Builder::new(&MatchRules::DEFAULT_RULES)?;
///
/// builder.add_participant("Ada", &["Monday, Wednesday".to_string()], &["4pm".to_string()], &[])?;
/// builder.add_participant("Grace", &["Wednesday".to_string()], &["16:00".to_string()], &[])?;
/// builder.add_volunteer("Alan", &["wednesday".to_string()], &["4:00 PM".to_string()], &[])?;
///
/// let result = builder.run()?;
/// let rows = builder.rows(&result);
/// assert_eq!(rows[0].volunteer, Some("Alan".to_string()));
/// assert_eq!(rows[0].score, 6);
/// assert_eq!(rows[1].volunteer, None);
/// assert_eq!(rows[1].score, NO_CANDIDATE_SCORE);
///
/// # Ok::<(), MatchingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: MatchRules,
    pub(crate) _participants: Vec<Participant>,
    pub(crate) _volunteers: Vec<Volunteer>,
}

impl Builder {
    pub fn new(rules: &MatchRules) -> Result<Builder, MatchingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _participants: Vec::new(),
            _volunteers: Vec::new(),
        })
    }

    /// Replaces the participants with the rows of a table.
    pub fn participants(self, table: &Table, columns: &DatasetColumns) -> Result<Builder, MatchingErrors> {
        Ok(Builder {
            _participants: normalize_participants(table, columns)?,
            ..self
        })
    }

    /// Replaces the volunteers with the rows of a table.
    pub fn volunteers(self, table: &Table, columns: &DatasetColumns) -> Result<Builder, MatchingErrors> {
        Ok(Builder {
            _volunteers: normalize_volunteers(table, columns)?,
            ..self
        })
    }

    /// Adds a participant after the existing ones.
    ///
    /// The entries go through the same normalization as spreadsheet cells, so
    /// they may contain delimiters.
    pub fn add_participant(
        &mut self,
        name: &str,
        days: &[String],
        times: &[String],
        langs: &[String],
    ) -> Result<ParticipantId, MatchingErrors> {
        let id = ParticipantId(self._participants.len());
        self._participants.push(Participant {
            id,
            name: name.to_string(),
            email: None,
            availability: availability_from_entries(days, times, langs),
        });
        Ok(id)
    }

    /// Adds a volunteer after the existing ones.
    pub fn add_volunteer(
        &mut self,
        name: &str,
        days: &[String],
        times: &[String],
        langs: &[String],
    ) -> Result<VolunteerId, MatchingErrors> {
        let id = VolunteerId(self._volunteers.len());
        self._volunteers.push(Volunteer {
            id,
            name: name.to_string(),
            email: None,
            availability: availability_from_entries(days, times, langs),
        });
        Ok(id)
    }

    pub fn participant_records(&self) -> &[Participant] {
        &self._participants
    }

    pub fn volunteer_records(&self) -> &[Volunteer] {
        &self._volunteers
    }

    pub fn run(&self) -> Result<MatchResult, MatchingErrors> {
        crate::run_matching(&self._participants, &self._volunteers, &self._rules)
    }

    pub fn rows(&self, result: &MatchResult) -> Vec<MatchRow> {
        build_rows(result, &self._participants, &self._volunteers)
    }
}
