//! Corpus aggregation: drive the pipeline over documents and fold totals.
//!
//! [`Framer`] owns the lexicon, the injected annotation backend, and the
//! resolution config. One [`train`](Framer::train) call processes every
//! document through annotate → resolve → extract → score, retains all
//! per-document results for later lookup, and rebuilds corpus-wide totals.
//! Training is destructive: a second call replaces all prior state.

use std::collections::HashMap;

use crate::annotation::Annotator;
use crate::frames::{extract_frames, FrameCounts, VerbCounts};
use crate::lexicon::Lexicon;
use crate::persona::{resolve_personas, PeopleWords};
use crate::scorer::{score_document, PowerScore};
use crate::{Error, Result};

/// What to do when the annotation backend fails on one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole training run on the first failure.
    #[default]
    Abort,
    /// Skip the failed document, record it in the summary, continue.
    Skip,
}

/// One skipped document under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFailure {
    /// Identifier of the skipped document.
    pub doc_id: String,
    /// Backend-reported failure description.
    pub message: String,
}

/// Outcome of a training run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainSummary {
    /// Number of documents fully processed.
    pub documents_processed: usize,
    /// Documents skipped under [`ErrorPolicy::Skip`]. Always empty under
    /// [`ErrorPolicy::Abort`].
    pub failures: Vec<DocFailure>,
}

/// Connotation-frame scorer over a document corpus.
///
/// # Example
///
/// ```rust
/// use conno::{AnnotatedDoc, Framer, Lexicon, MockAnnotator, NounPhrase};
///
/// let lexicon =
///     Lexicon::from_reader("verb,label\nheal,power_agent\n".as_bytes(), "verb", "label")?;
/// let annotator = MockAnnotator::new().with_doc(
///     "The doctor healed the patient.",
///     AnnotatedDoc::new()
///         .with_noun_phrase(NounPhrase::new("The doctor", 0, 2).subject_of("heal")),
/// );
///
/// let mut framer = Framer::new(lexicon, Box::new(annotator));
/// framer.train(&["The doctor healed the patient."], &["doc1"])?;
///
/// assert_eq!(framer.score_totals()["the doctor"].positive, 1);
/// # Ok::<(), conno::Error>(())
/// ```
pub struct Framer {
    lexicon: Lexicon,
    annotator: Box<dyn Annotator>,
    people_words: PeopleWords,
    error_policy: ErrorPolicy,

    score_totals: HashMap<String, PowerScore>,
    doc_scores: HashMap<String, HashMap<String, PowerScore>>,
    doc_persona_counts: HashMap<String, HashMap<String, u32>>,
    doc_scored_verbs: HashMap<String, HashMap<String, u32>>,
    doc_subject_verbs: HashMap<String, VerbCounts>,
    doc_object_verbs: HashMap<String, VerbCounts>,
}

impl Framer {
    /// Create a framer with default people words and abort-on-failure
    /// policy.
    #[must_use]
    pub fn new(lexicon: Lexicon, annotator: Box<dyn Annotator>) -> Self {
        Self {
            lexicon,
            annotator,
            people_words: PeopleWords::default(),
            error_policy: ErrorPolicy::default(),
            score_totals: HashMap::new(),
            doc_scores: HashMap::new(),
            doc_persona_counts: HashMap::new(),
            doc_scored_verbs: HashMap::new(),
            doc_subject_verbs: HashMap::new(),
            doc_object_verbs: HashMap::new(),
        }
    }

    /// Replace the person-indicator word set.
    #[must_use]
    pub fn with_people_words(mut self, people_words: PeopleWords) -> Self {
        self.people_words = people_words;
        self
    }

    /// Set the batch error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// The loaded lexicon.
    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Process a corpus and rebuild all per-document and corpus-wide state.
    ///
    /// `texts` and `ids` are parallel slices; repeated ids follow
    /// last-write-wins semantics for both per-document maps and totals.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] on length mismatch;
    /// [`Error::DocumentProcessing`] on the first backend failure under
    /// [`ErrorPolicy::Abort`].
    pub fn train<S, I>(&mut self, texts: &[S], ids: &[I]) -> Result<TrainSummary>
    where
        S: AsRef<str>,
        I: AsRef<str>,
    {
        if texts.len() != ids.len() {
            return Err(Error::invalid_input(format!(
                "got {} texts but {} ids",
                texts.len(),
                ids.len()
            )));
        }

        self.clear();

        let total = texts.len();
        let mut summary = TrainSummary::default();

        for (index, (text, id)) in texts.iter().zip(ids.iter()).enumerate() {
            let id = id.as_ref();
            log::info!(
                "[{}/{}] processing document '{}' with {}",
                index + 1,
                total,
                id,
                self.annotator.name()
            );

            let annotated = match self.annotator.annotate(text.as_ref()) {
                Ok(doc) => doc,
                Err(err) => match self.error_policy {
                    ErrorPolicy::Abort => {
                        return Err(Error::document_processing(id, err.to_string()));
                    }
                    ErrorPolicy::Skip => {
                        log::warn!("skipping document '{}': {}", id, err);
                        summary.failures.push(DocFailure {
                            doc_id: id.to_string(),
                            message: err.to_string(),
                        });
                        continue;
                    }
                },
            };

            let personas = resolve_personas(&annotated, &self.people_words);
            let counts = extract_frames(&personas);
            let scores = score_document(&counts, &self.lexicon);

            self.doc_persona_counts
                .insert(id.to_string(), counts.persona_counts());
            self.doc_scores
                .insert(id.to_string(), scores.persona_scores);
            self.doc_scored_verbs
                .insert(id.to_string(), scores.scored_verbs);
            let FrameCounts { subject, object } = counts;
            self.doc_subject_verbs.insert(id.to_string(), subject);
            self.doc_object_verbs.insert(id.to_string(), object);

            summary.documents_processed += 1;
        }

        // Totals come from the retained per-document map, so repeated ids
        // contribute exactly once.
        for doc_scores in self.doc_scores.values() {
            for (persona, score) in doc_scores {
                self.score_totals
                    .entry(persona.clone())
                    .or_default()
                    .accumulate(*score);
            }
        }

        log::info!(
            "training complete: {} documents, {} skipped",
            summary.documents_processed,
            summary.failures.len()
        );
        Ok(summary)
    }

    fn clear(&mut self) {
        self.score_totals.clear();
        self.doc_scores.clear();
        self.doc_persona_counts.clear();
        self.doc_scored_verbs.clear();
        self.doc_subject_verbs.clear();
        self.doc_object_verbs.clear();
    }

    /// Corpus-wide persona → score totals.
    #[must_use]
    pub fn score_totals(&self) -> &HashMap<String, PowerScore> {
        &self.score_totals
    }

    /// Persona scores for one document.
    ///
    /// Personas never scored in a known document are simply absent from
    /// the map (no signal, not an error).
    pub fn scores_for_doc(&self, doc_id: &str) -> Result<&HashMap<String, PowerScore>> {
        self.doc_scores
            .get(doc_id)
            .ok_or_else(|| Error::unknown_document_id(doc_id))
    }

    /// Persona mention counts for one document (both roles, any verb).
    pub fn personas_for_doc(&self, doc_id: &str) -> Result<&HashMap<String, u32>> {
        self.doc_persona_counts
            .get(doc_id)
            .ok_or_else(|| Error::unknown_document_id(doc_id))
    }

    /// Per-persona lexicon-scored frame counts for one document.
    pub fn scored_verbs_for_doc(&self, doc_id: &str) -> Result<&HashMap<String, u32>> {
        self.doc_scored_verbs
            .get(doc_id)
            .ok_or_else(|| Error::unknown_document_id(doc_id))
    }

    /// Subject-role (persona, verb) counts for one document.
    pub fn subject_verbs_for_doc(&self, doc_id: &str) -> Result<&VerbCounts> {
        self.doc_subject_verbs
            .get(doc_id)
            .ok_or_else(|| Error::unknown_document_id(doc_id))
    }

    /// Object-role (persona, verb) counts for one document.
    pub fn object_verbs_for_doc(&self, doc_id: &str) -> Result<&VerbCounts> {
        self.doc_object_verbs
            .get(doc_id)
            .ok_or_else(|| Error::unknown_document_id(doc_id))
    }

    /// Document ids in which a persona was observed, sorted.
    #[must_use]
    pub fn docs_for_persona(&self, persona: &str) -> Vec<&str> {
        let mut docs: Vec<&str> = self
            .doc_persona_counts
            .iter()
            .filter(|(_, counts)| counts.contains_key(persona))
            .map(|(id, _)| id.as_str())
            .collect();
        docs.sort_unstable();
        docs
    }

    /// Corpus-wide verb coverage over subject-role frames: verb → number
    /// of (document, persona) frame entries it appears in.
    #[must_use]
    pub fn verb_coverage(&self) -> HashMap<String, u32> {
        let mut coverage: HashMap<String, u32> = HashMap::new();
        for counts in self.doc_subject_verbs.values() {
            for (_persona, verb) in counts.keys() {
                *coverage.entry(verb.clone()).or_default() += 1;
            }
        }
        coverage
    }
}

impl std::fmt::Debug for Framer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framer")
            .field("lexicon_len", &self.lexicon.len())
            .field("annotator", &self.annotator.name())
            .field("error_policy", &self.error_policy)
            .field("documents", &self.doc_scores.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
