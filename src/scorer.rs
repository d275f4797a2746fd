//! Document scoring: lexicon effects applied to frame counts.
//!
//! The scoring policy is an additive point system, not a set of mutually
//! exclusive branches. A single (persona, verb) entry can contribute to
//! both the positive and negative tallies:
//!
//! - persona as **subject**: `agent == 1` adds positive, `agent == -1`
//!   adds negative, and `theme == 1` *also* adds negative (being the
//!   subject of a verb whose power flows to the theme marks the persona
//!   as ceding power)
//! - persona as **object**: `theme == 1` adds positive, `theme == -1`
//!   adds negative, and `agent == 1` adds negative — unless the lexicon is
//!   [`nsubj-only`](crate::Lexicon::nsubj_only), in which case an
//!   agency-only table would otherwise inject a phantom penalty

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::frames::FrameCounts;
use crate::lexicon::Lexicon;

/// Accumulated positive/negative score for one persona.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerScore {
    /// Positive score mass.
    pub positive: u32,
    /// Negative score mass.
    pub negative: u32,
}

impl PowerScore {
    /// Create a score.
    #[must_use]
    pub fn new(positive: u32, negative: u32) -> Self {
        Self { positive, negative }
    }

    /// Fold another score into this one.
    pub fn accumulate(&mut self, other: PowerScore) {
        self.positive += other.positive;
        self.negative += other.negative;
    }

    /// Net score (positive minus negative).
    #[must_use]
    pub fn net(&self) -> i64 {
        i64::from(self.positive) - i64::from(self.negative)
    }
}

/// Scoring output for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocScores {
    /// Persona key → accumulated score.
    pub persona_scores: HashMap<String, PowerScore>,
    /// Persona key → number of distinct (persona, verb) frame entries
    /// whose verb was lexicon-scored. One increment per entry, not per
    /// mention occurrence.
    pub scored_verbs: HashMap<String, u32>,
}

/// Score one document's frame counts against a lexicon.
///
/// Verbs absent from the lexicon carry no signal and contribute nothing,
/// in either direction.
#[must_use]
pub fn score_document(counts: &FrameCounts, lexicon: &Lexicon) -> DocScores {
    let mut scores = DocScores::default();

    for ((persona, verb), &count) in &counts.subject {
        let Some(effect) = lexicon.effect(verb) else {
            continue;
        };
        *scores.scored_verbs.entry(persona.clone()).or_default() += 1;
        let entry = scores.persona_scores.entry(persona.clone()).or_default();
        if effect.agent == 1 {
            entry.positive += count;
        } else if effect.agent == -1 {
            entry.negative += count;
        }
        if effect.theme == 1 {
            entry.negative += count;
        }
    }

    for ((persona, verb), &count) in &counts.object {
        let Some(effect) = lexicon.effect(verb) else {
            continue;
        };
        *scores.scored_verbs.entry(persona.clone()).or_default() += 1;
        let entry = scores.persona_scores.entry(persona.clone()).or_default();
        if effect.theme == 1 {
            entry.positive += count;
        } else if effect.theme == -1 {
            entry.negative += count;
        }
        if !lexicon.nsubj_only() && effect.agent == 1 {
            entry.negative += count;
        }
    }

    scores
}

// =============================================================================
// Tests
// =============================================================================
