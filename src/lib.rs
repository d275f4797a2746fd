//! # conno
//!
//! Connotation frames for Rust: lexicon-driven power and agency scoring
//! for the people mentioned in text.
//!
//! Given a corpus and a verb lexicon (e.g. the power/agency connotation
//! frame lexicons), conno resolves which noun phrases refer to people,
//! groups coreferent mentions into personas, counts how often each persona
//! is the subject (agent) or object (theme) of scored verbs, and
//! aggregates positive/negative scores per document and corpus-wide.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Annotation | [`annotation`] | tokens, noun phrases, coref clusters |
//! | Persona resolution | [`persona`] | person clusters with aligned mentions |
//! | Frame extraction | [`frames`] | (persona, verb) counts by role |
//! | Document scoring | [`scorer`] | positive/negative increments |
//! | Corpus aggregation | [`corpus`] | per-document maps + totals |
//!
//! ## Quick Start
//!
//! ```rust
//! use conno::{AnnotatedDoc, Framer, Lexicon, MockAnnotator, NounPhrase};
//!
//! let lexicon = Lexicon::from_reader(
//!     "verb,label\nheal,power_agent\n".as_bytes(),
//!     "verb",
//!     "label",
//! )?;
//!
//! // The NLP pipeline is injected behind the Annotator trait; here a mock
//! // supplies pre-built annotations.
//! let text = "The doctor healed the patient.";
//! let annotator = MockAnnotator::new().with_doc(
//!     text,
//!     AnnotatedDoc::new()
//!         .with_noun_phrase(NounPhrase::new("The doctor", 0, 2).subject_of("heal")),
//! );
//!
//! let mut framer = Framer::new(lexicon, Box::new(annotator));
//! framer.train(&[text], &["doc1"])?;
//!
//! assert_eq!(framer.score_totals()["the doctor"].positive, 1);
//! # Ok::<(), conno::Error>(())
//! ```
//!
//! ## Design Philosophy
//!
//! - **Injected pipeline**: no global NLP state; backends implement
//!   [`Annotator`] and are passed in by the composition root
//! - **Explicit configuration**: label mappings, people words, and the
//!   batch error policy are values, never shared mutable defaults
//! - **No signal is not an error**: unscored verbs and unseen personas
//!   yield zero contributions; only caller mistakes (unknown document ids,
//!   mismatched inputs) fail
//! - **Rebuild, don't merge**: each training run replaces all prior state

#![warn(missing_docs)]

pub mod annotation;
pub mod corpus;
mod error;
pub mod frames;
pub mod lexicon;
pub mod persona;
pub mod scorer;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use conno::prelude::*;
    //!
    //! let lexicon =
    //!     Lexicon::from_reader("verb,label\nwin,power_agent\n".as_bytes(), "verb", "label")
    //!         .unwrap();
    //! assert!(lexicon.contains("win"));
    //! ```
    pub use crate::annotation::{
        AnnotatedDoc, Annotator, DepRole, MentionSpan, MockAnnotator, NounPhrase, RawCluster,
    };
    pub use crate::corpus::{ErrorPolicy, Framer, TrainSummary};
    pub use crate::error::{Error, Result};
    pub use crate::frames::{extract_frames, FrameCounts};
    pub use crate::lexicon::{Lexicon, VerbEffect};
    pub use crate::persona::{persona_key, resolve_personas, PeopleWords, PersonaCluster};
    pub use crate::scorer::{score_document, PowerScore};
}

// Re-exports
pub use annotation::{
    AnnotatedDoc, Annotator, DepRole, Lemmatizer, LowercaseLemmatizer, MentionSpan, MockAnnotator,
    NounPhrase, RawCluster,
};
pub use corpus::{DocFailure, ErrorPolicy, Framer, TrainSummary};
pub use error::{Error, Result};
pub use frames::{extract_frames, FrameCounts, VerbCounts};
pub use lexicon::{default_label_mapping, LabelMapping, Lexicon, VerbEffect};
pub use persona::{persona_key, resolve_personas, PeopleWords, PersonaCluster};
pub use scorer::{score_document, DocScores, PowerScore};
