//! Frame extraction: (persona, verb) counts by grammatical role.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::DepRole;
use crate::persona::PersonaCluster;

/// Count map keyed by (persona key, verb lemma).
pub type VerbCounts = HashMap<(String, String), u32>;

/// Per-document frame counts, split by the mention's grammatical role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounts {
    /// Counts where the persona is the subject (agent) of the verb.
    pub subject: VerbCounts,
    /// Counts where the persona is the object (theme) of the verb.
    pub object: VerbCounts,
}

impl FrameCounts {
    /// Create empty counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no frames were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.object.is_empty()
    }

    /// Total mention count per persona, summed over both roles and all
    /// verbs, irrespective of any lexicon.
    #[must_use]
    pub fn persona_counts(&self) -> HashMap<String, u32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for ((persona, _verb), count) in self.subject.iter().chain(self.object.iter()) {
            *counts.entry(persona.clone()).or_default() += count;
        }
        counts
    }
}

/// Extract frame counts from resolved persona clusters.
///
/// Every mention acting as the subject of a verb increments the subject
/// map at (persona key, verb lemma); object mentions increment the object
/// map. Mentions with any other role carry no frame. The persona key is
/// the cluster's normalized main-mention text, so every mention in a chain
/// counts toward the same persona regardless of its own surface form.
#[must_use]
pub fn extract_frames(clusters: &[PersonaCluster]) -> FrameCounts {
    let mut counts = FrameCounts::new();

    for cluster in clusters {
        let persona = cluster.key();
        for mention in &cluster.mentions {
            let Some(verb) = mention.head_verb.as_deref() else {
                continue;
            };
            let entry = (persona.clone(), verb.to_lowercase());
            match mention.role {
                DepRole::Subject => *counts.subject.entry(entry).or_default() += 1,
                DepRole::Object => *counts.object.entry(entry).or_default() += 1,
                DepRole::Other => {}
            }
        }
    }

    counts
}

// =============================================================================
// Tests
// =============================================================================
