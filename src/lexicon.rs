//! Verb lexicon: the power/agency effect table.
//!
//! A lexicon maps verb lemmas to a [`VerbEffect`] — the score applied to a
//! persona when it is the agent (subject) or theme (object) of that verb.
//! Lexicons are loaded once from a CSV source and immutable afterwards.
//!
//! # Label mapping
//!
//! The source table carries symbolic labels ("power_agent", "agency_neg",
//! ...) rather than numbers. [`default_label_mapping`] covers the standard
//! closed set; callers with bespoke annotation schemes pass their own
//! mapping. The mapping is always an explicit value, never shared mutable
//! default state.
//!
//! # Example
//!
//! ```rust
//! use conno::Lexicon;
//!
//! let csv = "verb,label\nwin,power_agent\nsuffer,power_theme\n";
//! let lexicon = Lexicon::from_reader(csv.as_bytes(), "verb", "label").unwrap();
//!
//! assert_eq!(lexicon.effect("win").unwrap().agent, 1);
//! assert!(!lexicon.nsubj_only());
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::annotation::{Lemmatizer, LowercaseLemmatizer};
use crate::{Error, Result};

// =============================================================================
// Effects and label mapping
// =============================================================================

/// Score effect of one verb, split by grammatical role.
///
/// Both fields are in {-1, 0, 1}; out-of-range inputs are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbEffect {
    /// Effect on the verb's agent (subject).
    pub agent: i8,
    /// Effect on the verb's theme (object).
    pub theme: i8,
}

impl VerbEffect {
    /// Create an effect, clamping both values to [-1, 1].
    #[must_use]
    pub fn new(agent: i8, theme: i8) -> Self {
        Self {
            agent: agent.clamp(-1, 1),
            theme: theme.clamp(-1, 1),
        }
    }
}

/// Mapping from lexicon label strings to effects.
pub type LabelMapping = HashMap<String, VerbEffect>;

static DEFAULT_LABEL_MAPPING: Lazy<LabelMapping> = Lazy::new(|| {
    let mut m = LabelMapping::new();
    m.insert("power_agent".into(), VerbEffect::new(1, 0));
    m.insert("power_theme".into(), VerbEffect::new(0, 1));
    m.insert("power_equal".into(), VerbEffect::new(0, 0));
    m.insert("agency_pos".into(), VerbEffect::new(1, 0));
    m.insert("agency_neg".into(), VerbEffect::new(-1, 0));
    m.insert("agency_equal".into(), VerbEffect::new(0, 0));
    m
});

/// The standard label set for connotation-frame lexicons.
#[must_use]
pub fn default_label_mapping() -> &'static LabelMapping {
    &DEFAULT_LABEL_MAPPING
}

// =============================================================================
// Lexicon
// =============================================================================

/// Immutable verb → effect table with load-time policy flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    verbs: HashMap<String, VerbEffect>,
    nsubj_only: bool,
}

impl Lexicon {
    /// Load a lexicon from a CSV file using the default label mapping and
    /// the fallback lemmatizer.
    ///
    /// # Errors
    ///
    /// [`Error::LexiconLoad`] if either column is missing or a non-empty
    /// label is not in the mapping; [`Error::Io`]/[`Error::Csv`] on read
    /// failures.
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        verb_column: &str,
        label_column: &str,
    ) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, verb_column, label_column)
    }

    /// Load from a CSV file with an explicit mapping and lemmatizer.
    pub fn from_csv_path_with(
        path: impl AsRef<Path>,
        verb_column: &str,
        label_column: &str,
        mapping: &LabelMapping,
        lemmatizer: &dyn Lemmatizer,
    ) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader_with(file, verb_column, label_column, mapping, lemmatizer)
    }

    /// Load from any CSV reader using the default label mapping and the
    /// fallback lemmatizer.
    pub fn from_reader<R: Read>(reader: R, verb_column: &str, label_column: &str) -> Result<Self> {
        Self::from_reader_with(
            reader,
            verb_column,
            label_column,
            default_label_mapping(),
            &LowercaseLemmatizer,
        )
    }

    /// Load from any CSV reader with an explicit mapping and lemmatizer.
    ///
    /// Rows with an empty label are skipped. Later rows with the same verb
    /// lemma overwrite earlier ones.
    pub fn from_reader_with<R: Read>(
        reader: R,
        verb_column: &str,
        label_column: &str,
        mapping: &LabelMapping,
        lemmatizer: &dyn Lemmatizer,
    ) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let find_column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                Error::lexicon_load(format!(
                    "column '{}' not found in lexicon header [{}]",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
        };
        let verb_idx = find_column(verb_column)?;
        let label_idx = find_column(label_column)?;

        let mut verbs = HashMap::new();
        for record in csv_reader.records() {
            let record = record?;
            let label = record.get(label_idx).unwrap_or("").trim();
            if label.is_empty() {
                continue;
            }
            let effect = *mapping.get(label).ok_or_else(|| {
                Error::lexicon_load(format!("unknown lexicon label '{}'", label))
            })?;

            let verb = record.get(verb_idx).unwrap_or("").trim();
            let lemma = lemmatizer.verb_lemma(verb);
            if lemma.is_empty() {
                continue;
            }
            verbs.insert(lemma, effect);
        }

        // An all-zero theme column means this lexicon carries no object
        // signal (e.g. an agency lexicon); the scorer must not apply the
        // agent-on-object penalty in that case.
        let theme_sum: i32 = verbs.values().map(|e| i32::from(e.theme)).sum();
        let nsubj_only = theme_sum == 0;

        Ok(Self { verbs, nsubj_only })
    }

    /// Effect for a verb lemma, if scored.
    #[must_use]
    pub fn effect(&self, verb: &str) -> Option<VerbEffect> {
        self.verbs.get(verb).copied()
    }

    /// Check whether a verb lemma is scored.
    #[must_use]
    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.contains_key(verb)
    }

    /// Number of scored verbs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    /// Check if the lexicon is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// True when the lexicon carries no theme signal at all.
    #[must_use]
    pub fn nsubj_only(&self) -> bool {
        self.nsubj_only
    }

    /// Iterate over (lemma, effect) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, VerbEffect)> {
        self.verbs.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// =============================================================================
// Tests
// =============================================================================
