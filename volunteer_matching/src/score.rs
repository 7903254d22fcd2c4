//! Pairwise compatibility score.
//!
//! The score is a coarse signal: one weight per dimension (days, times,
//! languages) in which the two people share at least one token. Ties are
//! frequent.

use std::collections::BTreeSet;

use crate::config::*;

/// True iff the two sets share at least one token.
pub fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    // Iterate over the smaller set.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|t| large.contains(t))
}

pub fn availability_breakdown(a: &Availability, b: &Availability) -> ScoreBreakdown {
    ScoreBreakdown {
        days: overlap(&a.days, &b.days),
        times: overlap(&a.times, &b.times),
        langs: overlap(&a.langs, &b.langs),
    }
}

pub fn score_breakdown(participant: &Participant, volunteer: &Volunteer) -> ScoreBreakdown {
    availability_breakdown(&participant.availability, &volunteer.availability)
}

/// The score of a pair, between 0 and `weights.max_score()`.
pub fn score(participant: &Participant, volunteer: &Volunteer, weights: &ScoreWeights) -> u32 {
    score_breakdown(participant, volunteer).total(weights)
}

/// The tokens shared by two sets, in sorted order.
pub fn shared_tokens(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.intersection(b).cloned().collect()
}
