mod config;
pub mod builder;
pub mod columns;
pub mod manual;
pub mod normalize;
pub mod output;
pub mod score;

use log::{debug, info};

use std::collections::HashSet;

pub use crate::config::*;

// **** Private structures ****

/// The availability of the volunteers during one run.
///
/// Volunteers are never removed from the input. They are marked instead, so
/// that the pool can be inspected once the run is over.
struct VolunteerPool {
    // Indexed by the position of the volunteer in the input.
    assigned: Vec<Option<ParticipantId>>,
}

impl VolunteerPool {
    fn new(size: usize) -> VolunteerPool {
        VolunteerPool {
            assigned: vec![None; size],
        }
    }

    fn is_available(&self, pos: usize) -> bool {
        self.assigned[pos].is_none()
    }

    fn assign(&mut self, pos: usize, pid: ParticipantId) {
        debug_assert!(self.is_available(pos), "volunteer {} assigned twice", pos);
        self.assigned[pos] = Some(pid);
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Candidate {
    pos: usize,
    score: u32,
    breakdown: ScoreBreakdown,
}

/// Runs the greedy matching with the given rules.
///
/// Participants are processed in input order. Each one receives the
/// best-scoring volunteer among the candidates, the earliest volunteer winning
/// ties. In exclusive mode, a volunteer that has been given out is no longer a
/// candidate for the following participants.
///
/// Arguments:
/// * `participants` the participants, in processing order
/// * `volunteers` the volunteers, in tie-break order
/// * `rules` the scoring weights and assignment policy
///
/// One record is returned per participant, whatever the relative sizes of the
/// two populations.
pub fn run_matching(
    participants: &[Participant],
    volunteers: &[Volunteer],
    rules: &MatchRules,
) -> Result<MatchResult, MatchingErrors> {
    info!(
        "Matching {:?} participants with {:?} volunteers, rules: {:?}",
        participants.len(),
        volunteers.len(),
        rules
    );
    check_ids(
        Dataset::Participants,
        participants.iter().map(|p| p.id.0),
    )?;
    check_ids(Dataset::Volunteers, volunteers.iter().map(|v| v.id.0))?;

    let mut pool = VolunteerPool::new(volunteers.len());
    let mut records: Vec<MatchRecord> = Vec::new();

    for participant in participants.iter() {
        let best = match rules.assignment_mode {
            AssignmentMode::Exclusive => {
                find_best_candidate(participant, volunteers, &rules.weights, |pos| {
                    pool.is_available(pos)
                })
            }
            AssignmentMode::Reusable => {
                find_best_candidate(participant, volunteers, &rules.weights, |_| true)
            }
        };

        let record = match best {
            None => {
                debug!(
                    "run_matching: participant {:?}: no volunteer left",
                    participant.name
                );
                MatchRecord {
                    participant: participant.id,
                    volunteer: None,
                    score: NO_CANDIDATE_SCORE,
                    status: MatchStatus::NoCandidate,
                    breakdown: None,
                }
            }
            Some(c) if rules.minimum_score.map_or(false, |min| c.score < min) => {
                debug!(
                    "run_matching: participant {:?}: best score {} is below the minimum {:?}",
                    participant.name, c.score, rules.minimum_score
                );
                MatchRecord {
                    participant: participant.id,
                    volunteer: None,
                    score: NO_CANDIDATE_SCORE,
                    status: MatchStatus::BelowThreshold,
                    breakdown: None,
                }
            }
            Some(c) => {
                let volunteer = &volunteers[c.pos];
                debug!(
                    "run_matching: participant {:?} -> volunteer {:?} (score {}, {:?})",
                    participant.name, volunteer.name, c.score, c.breakdown
                );
                if rules.assignment_mode == AssignmentMode::Exclusive {
                    pool.assign(c.pos, participant.id);
                }
                MatchRecord {
                    participant: participant.id,
                    volunteer: Some(volunteer.id),
                    score: c.score as i64,
                    status: MatchStatus::Matched,
                    breakdown: Some(c.breakdown),
                }
            }
        };
        records.push(record);
    }

    let res = MatchResult {
        records,
        assignments: pool.assigned,
    };
    info!(
        "Matched {} of {} participants ({} mode)",
        res.matched_count(),
        participants.len(),
        rules.assignment_mode
    );
    Ok(res)
}

// Scans all the candidates: a weak best match is still a match.
fn find_best_candidate<F>(
    participant: &Participant,
    volunteers: &[Volunteer],
    weights: &ScoreWeights,
    is_candidate: F,
) -> Option<Candidate>
where
    F: Fn(usize) -> bool,
{
    let mut best: Option<Candidate> = None;
    for (pos, volunteer) in volunteers.iter().enumerate() {
        if !is_candidate(pos) {
            continue;
        }
        let breakdown = score::score_breakdown(participant, volunteer);
        let s = breakdown.total(weights);
        // Strict comparison: the first volunteer with the best score is kept.
        if best.map_or(true, |b| s > b.score) {
            best = Some(Candidate {
                pos,
                score: s,
                breakdown,
            });
        }
    }
    best
}

fn check_ids<I>(dataset: Dataset, ids: I) -> Result<(), MatchingErrors>
where
    I: Iterator<Item = usize>,
{
    let mut seen: HashSet<usize> = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(MatchingErrors::DuplicateId { dataset, id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn participant(id: usize, days: &[&str], times: &[&str], langs: &[&str]) -> Participant {
        Participant {
            id: ParticipantId(id),
            name: format!("p{}", id),
            email: None,
            availability: Availability {
                days: set(days),
                times: set(times),
                langs: set(langs),
            },
        }
    }

    fn volunteer(id: usize, days: &[&str], times: &[&str], langs: &[&str]) -> Volunteer {
        Volunteer {
            id: VolunteerId(id),
            name: format!("v{}", id),
            email: None,
            availability: Availability {
                days: set(days),
                times: set(times),
                langs: set(langs),
            },
        }
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn greedy_order_beats_better_later_score() {
        init_logs();
        let ps = vec![
            participant(0, &["mon"], &["16:00"], &[]),
            participant(1, &["mon"], &["afternoon"], &["spanish"]),
        ];
        let vs = vec![volunteer(0, &["mon"], &["16:00"], &["spanish"])];
        // The second participant shares the language and scores higher.
        let rules = MatchRules {
            weights: ScoreWeights {
                day: 3,
                time: 3,
                language: 5,
            },
            ..MatchRules::DEFAULT_RULES
        };
        assert_eq!(score::score(&ps[1], &vs[0], &rules.weights), 8);

        let res = run_matching(&ps, &vs, &rules).unwrap();
        assert_eq!(res.records.len(), 2);
        assert_eq!(res.records[0].volunteer, Some(VolunteerId(0)));
        assert_eq!(res.records[0].score, 6);
        assert_eq!(res.records[1].volunteer, None);
        assert_eq!(res.records[1].score, NO_CANDIDATE_SCORE);
        assert_eq!(res.records[1].status, MatchStatus::NoCandidate);
        assert_eq!(res.assignments, vec![Some(ParticipantId(0))]);
    }

    #[test]
    fn first_seen_wins_ties() {
        let ps = vec![participant(0, &["tue"], &[], &[])];
        let vs = vec![
            volunteer(0, &["mon"], &[], &[]),
            volunteer(1, &["tue"], &[], &[]),
            volunteer(2, &["tue", "wed"], &[], &[]),
        ];
        let res = run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.records[0].volunteer, Some(VolunteerId(1)));
        assert_eq!(res.records[0].score, 3);
    }

    #[test]
    fn zero_score_is_still_a_match() {
        let ps = vec![participant(0, &[], &[], &[])];
        let vs = vec![volunteer(0, &["mon"], &["16:00"], &[])];
        let res = run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.records[0].volunteer, Some(VolunteerId(0)));
        assert_eq!(res.records[0].score, 0);
        assert_eq!(res.records[0].status, MatchStatus::Matched);
        assert_eq!(
            res.records[0].breakdown,
            Some(ScoreBreakdown::default())
        );
    }

    #[test]
    fn exclusive_uses_each_volunteer_once() {
        let ps = vec![
            participant(0, &["mon"], &["16:00"], &[]),
            participant(1, &["mon"], &["16:00"], &[]),
            participant(2, &["mon"], &["16:00"], &[]),
        ];
        let vs = vec![
            volunteer(0, &["mon"], &["16:00"], &[]),
            volunteer(1, &["mon"], &["09:00"], &[]),
        ];
        let res = run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES).unwrap();
        let got: Vec<(Option<VolunteerId>, i64)> =
            res.records.iter().map(|r| (r.volunteer, r.score)).collect();
        assert_eq!(
            got,
            vec![
                (Some(VolunteerId(0)), 6),
                (Some(VolunteerId(1)), 3),
                (None, NO_CANDIDATE_SCORE)
            ]
        );
    }

    #[test]
    fn reusable_shares_volunteers() {
        let ps = vec![
            participant(0, &["mon"], &["16:00"], &[]),
            participant(1, &["mon"], &["16:00"], &[]),
        ];
        let vs = vec![
            volunteer(0, &["mon"], &["16:00"], &[]),
            volunteer(1, &["mon"], &[], &[]),
        ];
        let rules = MatchRules {
            assignment_mode: AssignmentMode::Reusable,
            ..MatchRules::DEFAULT_RULES
        };
        let res = run_matching(&ps, &vs, &rules).unwrap();
        assert!(res
            .records
            .iter()
            .all(|r| r.volunteer == Some(VolunteerId(0)) && r.score == 6));
        assert_eq!(res.assignments, vec![None, None]);
    }

    #[test]
    fn minimum_score_keeps_volunteer_available() {
        let ps = vec![
            participant(0, &["sun"], &[], &[]),
            participant(1, &["mon"], &[], &[]),
        ];
        let vs = vec![volunteer(0, &["mon"], &[], &[])];
        let rules = MatchRules {
            minimum_score: Some(3),
            ..MatchRules::DEFAULT_RULES
        };
        let res = run_matching(&ps, &vs, &rules).unwrap();
        assert_eq!(res.records[0].status, MatchStatus::BelowThreshold);
        assert_eq!(res.records[0].score, NO_CANDIDATE_SCORE);
        assert_eq!(res.records[1].volunteer, Some(VolunteerId(0)));
        assert_eq!(res.records[1].score, 3);
    }

    #[test]
    fn no_volunteers() {
        let ps = vec![participant(0, &["sun"], &[], &[])];
        let res = run_matching(&ps, &[], &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.records[0].status, MatchStatus::NoCandidate);
        assert!(res.assignments.is_empty());
    }

    #[test]
    fn runs_are_independent() {
        let ps = vec![participant(0, &["mon"], &[], &[])];
        let vs = vec![volunteer(0, &["mon"], &[], &[])];
        let first = run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES).unwrap();
        let second = run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ps = vec![participant(0, &[], &[], &[])];
        let vs = vec![volunteer(3, &[], &[], &[]), volunteer(3, &[], &[], &[])];
        assert_eq!(
            run_matching(&ps, &vs, &MatchRules::DEFAULT_RULES),
            Err(MatchingErrors::DuplicateId {
                dataset: Dataset::Volunteers,
                id: 3
            })
        );
    }
}
