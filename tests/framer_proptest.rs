//! Property-based tests for framer invariants.
//!
//! These verify aggregation identities for ALL generated corpora, not just
//! hand-picked examples.

use std::collections::HashMap;

use conno::{
    persona_key, AnnotatedDoc, Framer, Lexicon, MockAnnotator, NounPhrase, PowerScore,
};
use proptest::prelude::*;

// Persona surface forms that are people under the default word set.
const PERSONAS: &[&str] = &["I", "you", "he", "she", "the doctor", "Me", "us"];
// "ponder" is deliberately absent from the lexicon.
const VERBS: &[&str] = &["heal", "thank", "win", "lose", "ponder"];

fn lexicon() -> Lexicon {
    let csv = "\
verb,label
heal,power_agent
thank,power_theme
win,agency_pos
lose,agency_neg
";
    Lexicon::from_reader(csv.as_bytes(), "verb", "label").unwrap()
}

/// One synthetic document: a list of (persona, verb, is_subject) frames
/// rendered as singleton noun phrases at disjoint offsets.
fn doc_strategy() -> impl Strategy<Value = AnnotatedDoc> {
    prop::collection::vec(
        (0..PERSONAS.len(), 0..VERBS.len(), any::<bool>()),
        0..12,
    )
    .prop_map(|frames| {
        let mut doc = AnnotatedDoc::new();
        for (i, (p, v, is_subject)) in frames.into_iter().enumerate() {
            let start = i * 4;
            let phrase = NounPhrase::new(PERSONAS[p], start, start + 1);
            let phrase = if is_subject {
                phrase.subject_of(VERBS[v])
            } else {
                phrase.object_of(VERBS[v])
            };
            doc = doc.with_noun_phrase(phrase);
        }
        doc
    })
}

fn train_corpus(docs: Vec<AnnotatedDoc>) -> (Framer, Vec<String>) {
    let mut annotator = MockAnnotator::new();
    let mut texts = Vec::new();
    let mut ids = Vec::new();
    for (i, doc) in docs.into_iter().enumerate() {
        let text = format!("synthetic document {i}");
        annotator = annotator.with_doc(&text, doc);
        texts.push(text);
        ids.push(format!("doc-{i}"));
    }
    let mut framer = Framer::new(lexicon(), Box::new(annotator));
    framer.train(&texts, &ids).unwrap();
    (framer, ids)
}

proptest! {
    #[test]
    fn corpus_totals_equal_elementwise_document_sums(
        docs in prop::collection::vec(doc_strategy(), 1..6)
    ) {
        let (framer, ids) = train_corpus(docs);

        let mut summed: HashMap<String, PowerScore> = HashMap::new();
        for id in &ids {
            for (persona, score) in framer.scores_for_doc(id).unwrap() {
                summed.entry(persona.clone()).or_default().accumulate(*score);
            }
        }
        prop_assert_eq!(&summed, framer.score_totals());
    }

    #[test]
    fn persona_counts_match_role_count_sums(
        docs in prop::collection::vec(doc_strategy(), 1..4)
    ) {
        let (framer, ids) = train_corpus(docs);

        for id in &ids {
            let mut expected: HashMap<String, u32> = HashMap::new();
            let subject = framer.subject_verbs_for_doc(id).unwrap();
            let object = framer.object_verbs_for_doc(id).unwrap();
            for ((persona, _verb), count) in subject.iter().chain(object.iter()) {
                *expected.entry(persona.clone()).or_default() += count;
            }
            prop_assert_eq!(&expected, framer.personas_for_doc(id).unwrap());
        }
    }

    #[test]
    fn scored_verbs_never_exceed_frame_entries(
        docs in prop::collection::vec(doc_strategy(), 1..4)
    ) {
        let (framer, ids) = train_corpus(docs);

        for id in &ids {
            let mut entries: HashMap<String, u32> = HashMap::new();
            let subject = framer.subject_verbs_for_doc(id).unwrap();
            let object = framer.object_verbs_for_doc(id).unwrap();
            for (persona, _verb) in subject.keys().chain(object.keys()) {
                *entries.entry(persona.clone()).or_default() += 1;
            }
            for (persona, scored) in framer.scored_verbs_for_doc(id).unwrap() {
                prop_assert!(*scored <= entries[persona]);
            }
        }
    }

    #[test]
    fn retraining_same_corpus_is_deterministic(
        docs in prop::collection::vec(doc_strategy(), 1..4)
    ) {
        let (framer_a, _) = train_corpus(docs.clone());
        let (framer_b, _) = train_corpus(docs);
        prop_assert_eq!(framer_a.score_totals(), framer_b.score_totals());
    }

    #[test]
    fn persona_key_is_idempotent(text in "\\PC{0,20}") {
        let once = persona_key(&text);
        let twice = persona_key(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn persona_keys_are_lowercase(text in "[a-zA-Z ]{1,20}") {
        let key = persona_key(&text);
        prop_assert_eq!(key.clone(), key.to_lowercase());
    }

    #[test]
    fn lexicon_reload_is_identical(
        labels in prop::collection::vec(
            prop::sample::select(vec![
                "power_agent", "power_theme", "power_equal",
                "agency_pos", "agency_neg", "agency_equal",
            ]),
            0..10,
        )
    ) {
        let mut csv = String::from("verb,label\n");
        for (i, label) in labels.iter().enumerate() {
            csv.push_str(&format!("verb{i},{label}\n"));
        }
        let a = Lexicon::from_reader(csv.as_bytes(), "verb", "label").unwrap();
        let b = Lexicon::from_reader(csv.as_bytes(), "verb", "label").unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.nsubj_only(), b.nsubj_only());

        // The flag is exactly "no theme signal anywhere".
        let has_theme = labels.iter().any(|l| *l == "power_theme");
        prop_assert_eq!(a.nsubj_only(), !has_theme);
    }
}
