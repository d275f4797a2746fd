//! Annotation backend contract.
//!
//! The NLP pipeline (tokenization, dependency parsing, NER, coreference) is
//! an external collaborator. This module defines the data it must produce
//! for one document and the [`Annotator`] trait the pipeline is injected
//! through. The crate ships no real pipeline; [`MockAnnotator`] exists so
//! tests and downstream composition roots can supply pre-built documents.
//!
//! # Terminology
//!
//! - **Noun phrase**: a contiguous span with phrase boundaries, the unit a
//!   persona mention must align to
//! - **Raw cluster**: a coreference chain exactly as the backend produced
//!   it, before person filtering
//! - **Dependency role**: the span head's relation to its governing verb,
//!   collapsed to subject / object / other

use serde::{Deserialize, Serialize};

use crate::Result;

// =============================================================================
// Spans
// =============================================================================

/// Dependency role of a span's syntactic head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepRole {
    /// Nominal subject of a verb (nsubj).
    Subject,
    /// Direct object of a verb (dobj).
    Object,
    /// Any other relation.
    Other,
}

/// A mention span inside a coreference chain.
///
/// Spans are compared by token offsets and surface text, never by any
/// backend-internal identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MentionSpan {
    /// Surface text of the span.
    pub text: String,
    /// Start token offset (inclusive).
    pub start: usize,
    /// End token offset (exclusive).
    pub end: usize,
}

impl MentionSpan {
    /// Create a new mention span.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Offset pair used for set operations.
    #[must_use]
    pub fn span_id(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Check if offsets match exactly.
    #[must_use]
    pub fn span_matches(&self, start: usize, end: usize) -> bool {
        self.start == start && self.end == end
    }
}

impl std::fmt::Display for MentionSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" [{}-{})", self.text, self.start, self.end)
    }
}

/// A noun-phrase span with its dependency context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounPhrase {
    /// Surface text of the phrase.
    pub text: String,
    /// Start token offset (inclusive).
    pub start: usize,
    /// End token offset (exclusive).
    pub end: usize,
    /// Surface forms of the tokens inside the phrase.
    pub tokens: Vec<String>,
    /// Entity labels of entity spans contained in the phrase (e.g. "PERSON").
    pub entity_labels: Vec<String>,
    /// Dependency role of the phrase head.
    pub role: DepRole,
    /// Lemma of the governing verb when `role` is subject or object.
    pub head_verb: Option<String>,
}

impl NounPhrase {
    /// Create a noun phrase with no entity labels and role [`DepRole::Other`].
    ///
    /// Tokens default to the whitespace-split surface text; override with
    /// [`NounPhrase::with_tokens`] when the backend tokenizes differently.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        let text = text.into();
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Self {
            text,
            start,
            end,
            tokens,
            entity_labels: Vec::new(),
            role: DepRole::Other,
            head_verb: None,
        }
    }

    /// Replace the default tokenization.
    #[must_use]
    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Add a contained entity label.
    #[must_use]
    pub fn with_entity_label(mut self, label: impl Into<String>) -> Self {
        self.entity_labels.push(label.into());
        self
    }

    /// Mark the phrase as the subject of `verb` (lemma).
    #[must_use]
    pub fn subject_of(mut self, verb: impl Into<String>) -> Self {
        self.role = DepRole::Subject;
        self.head_verb = Some(verb.into());
        self
    }

    /// Mark the phrase as the object of `verb` (lemma).
    #[must_use]
    pub fn object_of(mut self, verb: impl Into<String>) -> Self {
        self.role = DepRole::Object;
        self.head_verb = Some(verb.into());
        self
    }

    /// Offset pair used for set operations.
    #[must_use]
    pub fn span_id(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Check whether the phrase contains an entity tagged as a person.
    ///
    /// Accepts both CoNLL-style "PER" and OntoNotes-style "PERSON".
    #[must_use]
    pub fn has_person_entity(&self) -> bool {
        self.entity_labels
            .iter()
            .any(|l| l.eq_ignore_ascii_case("PERSON") || l.eq_ignore_ascii_case("PER"))
    }

    /// View of the phrase as a bare mention span.
    #[must_use]
    pub fn as_mention(&self) -> MentionSpan {
        MentionSpan::new(self.text.clone(), self.start, self.end)
    }
}

impl std::fmt::Display for NounPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" [{}-{})", self.text, self.start, self.end)
    }
}

// =============================================================================
// Raw coreference clusters
// =============================================================================

/// A coreference chain as produced by the annotation backend.
///
/// The main mention is the backend's representative for the chain; members
/// are ordered by position. No person filtering has happened yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCluster {
    /// Representative mention for the chain.
    pub main: MentionSpan,
    /// All member mentions, including the main one.
    pub mentions: Vec<MentionSpan>,
}

impl RawCluster {
    /// Create a cluster from a main mention and its members.
    #[must_use]
    pub fn new(main: MentionSpan, mentions: Vec<MentionSpan>) -> Self {
        Self { main, mentions }
    }

    /// Check if any member matches the given offsets exactly.
    #[must_use]
    pub fn contains_span(&self, start: usize, end: usize) -> bool {
        self.mentions.iter().any(|m| m.span_matches(start, end))
    }
}

// =============================================================================
// Annotated document
// =============================================================================

/// One document's annotation output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDoc {
    /// Noun-phrase spans in document order.
    pub noun_phrases: Vec<NounPhrase>,
    /// Raw coreference clusters.
    pub clusters: Vec<RawCluster>,
}

impl AnnotatedDoc {
    /// Create an empty annotated document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a noun phrase.
    #[must_use]
    pub fn with_noun_phrase(mut self, phrase: NounPhrase) -> Self {
        self.noun_phrases.push(phrase);
        self
    }

    /// Add a raw coreference cluster.
    #[must_use]
    pub fn with_cluster(mut self, cluster: RawCluster) -> Self {
        self.clusters.push(cluster);
        self
    }
}

// =============================================================================
// Annotator trait
// =============================================================================

/// Trait for annotation backends.
///
/// The backend is constructed once by the composition root and injected
/// into the framer; it is never ambient global state. Implementations wrap
/// whatever NLP pipeline is in use (spaCy over IPC, a Rust parser, a
/// service call) and translate its output into [`AnnotatedDoc`].
pub trait Annotator: Send + Sync {
    /// Annotate one document.
    ///
    /// # Errors
    ///
    /// Any error (encoding failure, backend crash) is surfaced per
    /// document; the caller decides whether to abort or skip.
    fn annotate(&self, text: &str) -> Result<AnnotatedDoc>;

    /// Backend name for logs.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// A mock annotation backend for testing and offline composition.
///
/// Returns pre-built documents keyed by exact input text.
///
/// # Example
///
/// ```rust
/// use conno::{AnnotatedDoc, Annotator, MockAnnotator, NounPhrase};
///
/// let doc = AnnotatedDoc::new()
///     .with_noun_phrase(NounPhrase::new("the doctor", 0, 2).subject_of("heal"));
/// let mock = MockAnnotator::new().with_doc("The doctor healed.", doc);
///
/// let annotated = mock.annotate("The doctor healed.").unwrap();
/// assert_eq!(annotated.noun_phrases.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAnnotator {
    docs: std::collections::HashMap<String, AnnotatedDoc>,
}

impl MockAnnotator {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the document to return for `text`.
    #[must_use]
    pub fn with_doc(mut self, text: impl Into<String>, doc: AnnotatedDoc) -> Self {
        self.docs.insert(text.into(), doc);
        self
    }
}

impl Annotator for MockAnnotator {
    fn annotate(&self, text: &str) -> Result<AnnotatedDoc> {
        self.docs.get(text).cloned().ok_or_else(|| {
            let preview: String = text.chars().take(60).collect();
            crate::Error::invalid_input(format!(
                "no mock annotation registered for text: {preview:?}"
            ))
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// =============================================================================
// Lemmatization
// =============================================================================

/// Trait for verb lemmatizers.
///
/// Real lemmatization belongs to the annotation backend; the lexicon only
/// needs a hook so verb surface forms in the source table land on the same
/// key space as head-verb lemmas in annotated documents.
pub trait Lemmatizer: Send + Sync {
    /// Lemmatize `verb` as a verb.
    fn verb_lemma(&self, verb: &str) -> String;
}

/// Fallback lemmatizer: first whitespace-delimited token, lowercased.
///
/// Sufficient for lexicons whose verb column already carries lemmas
/// (possibly with trailing particles, e.g. "give up").
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn verb_lemma(&self, verb: &str) -> String {
        verb.split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noun_phrase_default_tokens() {
        let np = NounPhrase::new("the young doctor", 0, 3);
        assert_eq!(np.tokens, vec!["the", "young", "doctor"]);
        assert_eq!(np.role, DepRole::Other);
        assert!(np.head_verb.is_none());
    }

    #[test]
    fn test_subject_of_sets_role_and_verb() {
        let np = NounPhrase::new("she", 4, 5).subject_of("win");
        assert_eq!(np.role, DepRole::Subject);
        assert_eq!(np.head_verb.as_deref(), Some("win"));
    }

    #[test]
    fn test_person_entity_labels() {
        let np = NounPhrase::new("John Smith", 0, 2).with_entity_label("PERSON");
        assert!(np.has_person_entity());

        let np = NounPhrase::new("John Smith", 0, 2).with_entity_label("per");
        assert!(np.has_person_entity());

        let np = NounPhrase::new("Acme Corp", 0, 2).with_entity_label("ORG");
        assert!(!np.has_person_entity());
    }

    #[test]
    fn test_cluster_contains_span() {
        let cluster = RawCluster::new(
            MentionSpan::new("John", 0, 1),
            vec![MentionSpan::new("John", 0, 1), MentionSpan::new("he", 7, 8)],
        );
        assert!(cluster.contains_span(7, 8));
        assert!(!cluster.contains_span(7, 9));
    }

    #[test]
    fn test_mock_annotator_unknown_text_errors() {
        let mock = MockAnnotator::new();
        assert!(mock.annotate("never registered").is_err());
    }

    #[test]
    fn test_lowercase_lemmatizer_first_token() {
        let lem = LowercaseLemmatizer;
        assert_eq!(lem.verb_lemma("Give up"), "give");
        assert_eq!(lem.verb_lemma("RUN"), "run");
        assert_eq!(lem.verb_lemma(""), "");
    }
}
