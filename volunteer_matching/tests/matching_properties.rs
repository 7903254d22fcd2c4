//! Property-based tests for normalization, scoring and matching.
//!
//! # Invariants tested
//!
//! - **Canonical tokens:** tokens are never empty and always lowercase.
//! - **Symmetric overlap:** `overlap(a, b) == overlap(b, a)`.
//! - **Score bounds:** scores stay within `[0, max_score]`.
//! - **Exclusivity:** in exclusive mode a volunteer is assigned at most once.
//! - **Completeness:** one record per participant, in input order.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use volunteer_matching::normalize::{tokenize, tokenize_str};
use volunteer_matching::score::{overlap, score};
use volunteer_matching::{
    run_matching, AssignmentMode, Availability, CellValue, MatchRules, MatchStatus,
    Participant, ParticipantId, ScoreWeights, Volunteer, VolunteerId, NO_CANDIDATE_SCORE,
};

const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
const TIMES: [&str; 5] = ["09:00", "12:00", "16:00", "17:00", "afternoon"];
const LANGS: [&str; 3] = ["english", "spanish", "french"];

fn token_set(pool: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<String>> {
    proptest::sample::subsequence(pool, 0..=pool.len())
        .prop_map(|v| v.into_iter().map(|s| s.to_string()).collect())
}

fn availability_strategy() -> impl Strategy<Value = Availability> {
    (token_set(&DAYS), token_set(&TIMES), token_set(&LANGS)).prop_map(|(days, times, langs)| {
        Availability { days, times, langs }
    })
}

fn participants_strategy(max: usize) -> impl Strategy<Value = Vec<Participant>> {
    proptest::collection::vec(availability_strategy(), 0..=max).prop_map(|avs| {
        avs.into_iter()
            .enumerate()
            .map(|(idx, availability)| Participant {
                id: ParticipantId(idx),
                name: format!("participant {}", idx),
                email: None,
                availability,
            })
            .collect()
    })
}

fn volunteers_strategy(max: usize) -> impl Strategy<Value = Vec<Volunteer>> {
    proptest::collection::vec(availability_strategy(), 0..=max).prop_map(|avs| {
        avs.into_iter()
            .enumerate()
            .map(|(idx, availability)| Volunteer {
                id: VolunteerId(idx),
                name: format!("volunteer {}", idx),
                email: None,
                availability,
            })
            .collect()
    })
}

fn weights_strategy() -> impl Strategy<Value = ScoreWeights> {
    (0_u32..10, 0_u32..10, 0_u32..10).prop_map(|(day, time, language)| ScoreWeights {
        day,
        time,
        language,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: tokens are trimmed, lowercase and never empty, for any text.
    #[test]
    fn tokens_are_canonical(text in "[ a-zA-Z0-9:;,/]{0,40}") {
        for token in tokenize_str(&text) {
            prop_assert!(!token.is_empty());
            prop_assert_eq!(token.clone(), token.to_lowercase());
            prop_assert_eq!(token.trim(), token.as_str());
        }
    }

    /// Property: numeric cells give a single token, empty cells give none.
    #[test]
    fn numeric_cells_tokenize(i in any::<i64>()) {
        prop_assert_eq!(tokenize(Some(&CellValue::Int(i))).len(), 1);
        prop_assert!(tokenize(Some(&CellValue::Empty)).is_empty());
        prop_assert!(tokenize(None).is_empty());
    }

    /// Property: the overlap relation is symmetric.
    #[test]
    fn overlap_is_symmetric(a in token_set(&DAYS), b in token_set(&DAYS)) {
        prop_assert_eq!(overlap(&a, &b), overlap(&b, &a));
    }

    /// Property: the score never exceeds the sum of the weights.
    #[test]
    fn score_is_bounded(
        pa in availability_strategy(),
        va in availability_strategy(),
        weights in weights_strategy(),
    ) {
        let p = Participant { id: ParticipantId(0), name: "p".to_string(), email: None, availability: pa };
        let v = Volunteer { id: VolunteerId(0), name: "v".to_string(), email: None, availability: va };
        prop_assert!(score(&p, &v, &weights) <= weights.max_score());
    }

    /// Property: in exclusive mode, no volunteer is assigned twice, and the
    /// number of matches is bounded by the number of volunteers.
    #[test]
    fn exclusive_mode_never_reuses_volunteers(
        participants in participants_strategy(12),
        volunteers in volunteers_strategy(8),
    ) {
        let res = run_matching(&participants, &volunteers, &MatchRules::DEFAULT_RULES)
            .expect("matching should succeed");
        let mut seen: HashSet<VolunteerId> = HashSet::new();
        for record in res.records.iter() {
            if let Some(vid) = record.volunteer {
                prop_assert!(seen.insert(vid), "volunteer {:?} assigned twice", vid);
            }
        }
        prop_assert_eq!(
            res.matched_count(),
            participants.len().min(volunteers.len())
        );
    }

    /// Property: every participant gets exactly one record, in input order,
    /// whatever the sizes of the two populations.
    #[test]
    fn every_participant_gets_a_record(
        participants in participants_strategy(12),
        volunteers in volunteers_strategy(12),
        reusable in any::<bool>(),
        weights in weights_strategy(),
    ) {
        let rules = MatchRules {
            weights,
            assignment_mode: if reusable { AssignmentMode::Reusable } else { AssignmentMode::Exclusive },
            minimum_score: None,
        };
        let res = run_matching(&participants, &volunteers, &rules).expect("matching should succeed");
        prop_assert_eq!(res.records.len(), participants.len());
        for (p, record) in participants.iter().zip(res.records.iter()) {
            prop_assert_eq!(p.id, record.participant);
            match record.status {
                MatchStatus::Matched => {
                    prop_assert!(record.score >= 0);
                    prop_assert!(record.score <= i64::from(weights.max_score()));
                }
                _ => prop_assert_eq!(record.score, NO_CANDIDATE_SCORE),
            }
        }
    }

    /// Property: in reusable mode, each participant gets its best possible
    /// volunteer, so a non-empty pool always yields a match.
    #[test]
    fn reusable_mode_takes_the_best_volunteer(
        participants in participants_strategy(6),
        volunteers in volunteers_strategy(6),
    ) {
        let rules = MatchRules {
            assignment_mode: AssignmentMode::Reusable,
            ..MatchRules::DEFAULT_RULES
        };
        let res = run_matching(&participants, &volunteers, &rules).expect("matching should succeed");
        for (p, record) in participants.iter().zip(res.records.iter()) {
            let best = volunteers
                .iter()
                .map(|v| score(p, v, &rules.weights))
                .max();
            match best {
                Some(b) => prop_assert_eq!(record.score, i64::from(b)),
                None => prop_assert_eq!(record.status, MatchStatus::NoCandidate),
            }
        }
    }
}
