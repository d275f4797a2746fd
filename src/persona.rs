//! Persona resolution: from raw coreference clusters to people.
//!
//! A persona is the set of coreferent mentions of one person in a document.
//! Resolution starts from the backend's raw clusters, decides which noun
//! phrases refer to people, adopts whole clusters when any member qualifies,
//! synthesizes singleton clusters for unattached person phrases, and finally
//! restricts every cluster to mentions that align exactly to noun-phrase
//! boundaries (only those carry usable dependency context).
//!
//! # Example
//!
//! ```rust
//! use conno::{AnnotatedDoc, NounPhrase, PeopleWords, resolve_personas};
//!
//! let doc = AnnotatedDoc::new()
//!     .with_noun_phrase(NounPhrase::new("the doctor", 0, 2).subject_of("heal"))
//!     .with_noun_phrase(NounPhrase::new("the lamp", 4, 6));
//!
//! let personas = resolve_personas(&doc, &PeopleWords::default());
//! assert_eq!(personas.len(), 1);
//! assert_eq!(personas[0].key(), "the doctor");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotatedDoc, MentionSpan, NounPhrase};

// =============================================================================
// People words
// =============================================================================

/// Default person-indicator tokens: generic role nouns and pronouns.
const DEFAULT_PEOPLE_WORDS: &[&str] = &["doctor", "i", "me", "you", "he", "she", "man", "woman"];

/// Case-insensitive set of literal tokens treated as person indicators.
///
/// A noun phrase containing any of these tokens is considered a person even
/// without a PERSON entity tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleWords {
    words: HashSet<String>,
}

impl Default for PeopleWords {
    fn default() -> Self {
        Self::from_words(DEFAULT_PEOPLE_WORDS.iter().copied())
    }
}

impl PeopleWords {
    /// Create an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Build from an iterator of words (lowercased on insertion).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Add a word.
    #[must_use]
    pub fn with_word(mut self, word: impl AsRef<str>) -> Self {
        self.words.insert(word.as_ref().to_lowercase());
        self
    }

    /// Check whether a token matches, case-insensitively.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    /// Number of words in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// =============================================================================
// Persona key
// =============================================================================

/// Normalize a main-mention text into a persona key.
///
/// Lowercases, then folds object-case pronouns onto their subject-case
/// counterparts ("me" → "i", "us" → "we") so one persona does not split
/// into two keys by grammatical case. All other text passes through
/// lowercased unchanged.
#[must_use]
pub fn persona_key(main_text: &str) -> String {
    let lower = main_text.to_lowercase();
    match lower.as_str() {
        "me" => "i".to_string(),
        "us" => "we".to_string(),
        _ => lower,
    }
}

// =============================================================================
// Persona clusters
// =============================================================================

/// A resolved persona: one person's mentions in a document.
///
/// # Invariants
///
/// - Every mention aligns exactly (offsets and text) to a noun-phrase span
///   in the source document
/// - `mentions` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaCluster {
    /// Cluster id, renumbered after resolution.
    pub id: usize,
    /// Representative mention; its text determines the persona key.
    pub main: MentionSpan,
    /// Noun-phrase mentions of this persona, in document order.
    pub mentions: Vec<NounPhrase>,
}

impl PersonaCluster {
    /// The persona key for aggregation (normalized main-mention text).
    #[must_use]
    pub fn key(&self) -> String {
        persona_key(&self.main.text)
    }

    /// Number of mentions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    /// Check if the cluster has no mentions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

impl std::fmt::Display for PersonaCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mentions: Vec<String> = self
            .mentions
            .iter()
            .map(|m| format!("\"{}\"", m.text))
            .collect();
        write!(f, "{} [{}]", self.main, mentions.join(", "))
    }
}

// Candidate under construction: a raw cluster adopted wholesale, or a
// synthesized singleton for an unattached person phrase.
struct Candidate {
    main: MentionSpan,
    members: Vec<MentionSpan>,
}

impl Candidate {
    fn from_raw(cluster: &crate::annotation::RawCluster) -> Self {
        Self {
            main: cluster.main.clone(),
            members: cluster.mentions.clone(),
        }
    }

    fn singleton(span: MentionSpan) -> Self {
        Self {
            main: span.clone(),
            members: vec![span],
        }
    }
}

/// Resolve the personas of an annotated document.
///
/// 1. Clusters whose main mention is exactly "I" or "you" (case-sensitive)
///    are always persona candidates, regardless of entity tagging.
/// 2. A noun phrase is a person if it contains a PERSON-tagged entity or
///    any people-word token.
/// 3. Person phrases that match a raw-cluster member adopt the whole
///    cluster (the permissive any-member rule); otherwise they become
///    singleton clusters. Duplicate adoption of the same raw cluster
///    collapses to one candidate (identity is the cluster's index, not
///    mention content).
/// 4. Each candidate's mention list is rebuilt from noun-phrase spans whose
///    offsets and text match a member exactly; candidates left without any
///    qualifying mention are dropped.
#[must_use]
pub fn resolve_personas(doc: &AnnotatedDoc, people_words: &PeopleWords) -> Vec<PersonaCluster> {
    let mut adopted: HashSet<usize> = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    // First- and second-person chains are always people.
    for (idx, cluster) in doc.clusters.iter().enumerate() {
        if (cluster.main.text == "I" || cluster.main.text == "you") && adopted.insert(idx) {
            candidates.push(Candidate::from_raw(cluster));
        }
    }

    for phrase in &doc.noun_phrases {
        if !is_person(phrase, people_words) {
            continue;
        }

        let mut in_cluster = false;
        for (idx, cluster) in doc.clusters.iter().enumerate() {
            if cluster.contains_span(phrase.start, phrase.end) {
                in_cluster = true;
                if adopted.insert(idx) {
                    candidates.push(Candidate::from_raw(cluster));
                }
            }
        }
        if !in_cluster {
            candidates.push(Candidate::singleton(phrase.as_mention()));
        }
    }

    // Restrict each candidate to mentions that are themselves noun phrases.
    // Coreference members without phrase boundaries carry no dependency
    // context and are dropped here; the cluster survives as long as one
    // member still qualifies.
    let mut personas = Vec::new();
    for candidate in candidates {
        let mentions: Vec<NounPhrase> = doc
            .noun_phrases
            .iter()
            .filter(|span| {
                candidate
                    .members
                    .iter()
                    .any(|m| m.span_matches(span.start, span.end) && m.text == span.text)
            })
            .cloned()
            .collect();

        if !mentions.is_empty() {
            personas.push(PersonaCluster {
                id: personas.len(),
                main: candidate.main,
                mentions,
            });
        }
    }

    personas
}

fn is_person(phrase: &NounPhrase, people_words: &PeopleWords) -> bool {
    phrase.has_person_entity() || phrase.tokens.iter().any(|t| people_words.matches(t))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RawCluster;

    fn span(text: &str, start: usize, end: usize) -> MentionSpan {
        MentionSpan::new(text, start, end)
    }

    #[test]
    fn test_persona_key_normalization() {
        assert_eq!(persona_key("me"), "i");
        assert_eq!(persona_key("Me"), "i");
        assert_eq!(persona_key("ME"), "i");
        assert_eq!(persona_key("us"), "we");
        assert_eq!(persona_key("Us"), "we");
        assert_eq!(persona_key("He"), "he");
        assert_eq!(persona_key("The Doctor"), "the doctor");
    }

    #[test]
    fn test_non_person_phrase_yields_nothing() {
        let doc = AnnotatedDoc::new().with_noun_phrase(NounPhrase::new("the lamp", 0, 2));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert!(personas.is_empty());
    }

    #[test]
    fn test_people_word_singleton() {
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the doctor", 0, 2).subject_of("heal"));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].key(), "the doctor");
        assert_eq!(personas[0].len(), 1);
    }

    #[test]
    fn test_person_entity_without_people_word() {
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("Rosa Parks", 0, 2).with_entity_label("PERSON"));
        let personas = resolve_personas(&doc, &PeopleWords::empty());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].key(), "rosa parks");
    }

    #[test]
    fn test_forced_first_person_cluster() {
        // "I" not tagged PERSON, people words empty: forced rule still
        // produces the persona.
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("I", 0, 1).subject_of("leave"))
            .with_cluster(RawCluster::new(span("I", 0, 1), vec![span("I", 0, 1)]));
        let personas = resolve_personas(&doc, &PeopleWords::empty());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].key(), "i");
    }

    #[test]
    fn test_forced_rule_is_case_sensitive() {
        // Lowercase "i" main mention is not the forced first-person chain.
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("it", 0, 1))
            .with_cluster(RawCluster::new(span("it", 0, 1), vec![span("it", 0, 1)]));
        let personas = resolve_personas(&doc, &PeopleWords::empty());
        assert!(personas.is_empty());
    }

    #[test]
    fn test_cluster_adoption_via_any_member() {
        // "he" is the person-matching member; the whole chain comes along,
        // including the non-person-word main mention "the butler".
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the butler", 0, 2).subject_of("serve"))
            .with_noun_phrase(NounPhrase::new("he", 5, 6).subject_of("leave"))
            .with_cluster(RawCluster::new(
                span("the butler", 0, 2),
                vec![span("the butler", 0, 2), span("he", 5, 6)],
            ));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].key(), "the butler");
        assert_eq!(personas[0].len(), 2);
    }

    #[test]
    fn test_duplicate_adoption_collapses() {
        // Two person phrases both belong to the same raw cluster; the
        // candidate set keeps one copy.
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the doctor", 0, 2))
            .with_noun_phrase(NounPhrase::new("she", 5, 6))
            .with_cluster(RawCluster::new(
                span("the doctor", 0, 2),
                vec![span("the doctor", 0, 2), span("she", 5, 6)],
            ));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].len(), 2);
    }

    #[test]
    fn test_non_phrase_members_dropped() {
        // The chain member at [9-10) aligns to no noun phrase, so it is
        // filtered out; the cluster survives on its remaining mention.
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the woman", 0, 2).subject_of("speak"))
            .with_cluster(RawCluster::new(
                span("the woman", 0, 2),
                vec![span("the woman", 0, 2), span("woman", 9, 10)],
            ));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].len(), 1);
        assert_eq!(personas[0].mentions[0].text, "the woman");
    }

    #[test]
    fn test_member_text_must_match_span() {
        // Same offsets but different text: retokenization drift between the
        // coref backend and the phrase chunker. The member does not qualify.
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the doctor", 0, 2))
            .with_cluster(RawCluster::new(
                span("doctor", 0, 2),
                vec![span("doctor", 0, 2)],
            ));
        // Offsets match so the cluster is adopted (no singleton is
        // synthesized), but the rebuilt mention list is empty.
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert!(personas.is_empty());
    }

    #[test]
    fn test_clusters_renumbered_in_order() {
        let doc = AnnotatedDoc::new()
            .with_noun_phrase(NounPhrase::new("the man", 0, 2))
            .with_noun_phrase(NounPhrase::new("the woman", 4, 6));
        let personas = resolve_personas(&doc, &PeopleWords::default());
        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].id, 0);
        assert_eq!(personas[1].id, 1);
        assert_eq!(personas[0].key(), "the man");
        assert_eq!(personas[1].key(), "the woman");
    }

    #[test]
    fn test_people_words_case_insensitive() {
        let words = PeopleWords::from_words(["Nurse"]);
        assert!(words.matches("nurse"));
        assert!(words.matches("NURSE"));
        assert!(!words.matches("doctor"));
    }
}
