//! Assembles the match records into rows for display or export.

use std::collections::HashMap;

use crate::config::*;
use crate::score::shared_tokens;

/// One output row, in the vocabulary of the input files.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchRow {
    pub participant: String,
    pub participant_email: Option<String>,
    pub volunteer: Option<String>,
    pub volunteer_email: Option<String>,
    pub score: i64,
    pub status: MatchStatus,
    pub shared_days: Vec<String>,
    pub shared_times: Vec<String>,
    pub shared_langs: Vec<String>,
}

/// Builds one row per record, in the order of the records.
pub fn build_rows(
    result: &MatchResult,
    participants: &[Participant],
    volunteers: &[Volunteer],
) -> Vec<MatchRow> {
    let participants_by_id: HashMap<ParticipantId, &Participant> =
        participants.iter().map(|p| (p.id, p)).collect();
    let volunteers_by_id: HashMap<VolunteerId, &Volunteer> =
        volunteers.iter().map(|v| (v.id, v)).collect();

    result
        .records
        .iter()
        .map(|record| {
            let participant = participants_by_id.get(&record.participant);
            let volunteer = record
                .volunteer
                .and_then(|vid| volunteers_by_id.get(&vid));
            let (shared_days, shared_times, shared_langs) = match (participant, volunteer) {
                (Some(p), Some(v)) => {
                    let (a, b) = (&p.availability, &v.availability);
                    (
                        shared_tokens(&a.days, &b.days),
                        shared_tokens(&a.times, &b.times),
                        shared_tokens(&a.langs, &b.langs),
                    )
                }
                _ => (Vec::new(), Vec::new(), Vec::new()),
            };
            MatchRow {
                participant: participant
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| (record.participant.0 + 1).to_string()),
                participant_email: participant.and_then(|p| p.email.clone()),
                volunteer: volunteer.map(|v| v.name.clone()),
                volunteer_email: volunteer.and_then(|v| v.email.clone()),
                score: record.score,
                status: record.status,
                shared_days,
                shared_times,
                shared_langs,
            }
        })
        .collect()
}
