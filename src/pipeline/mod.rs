//! Episode ingestion pipeline.
//!
//! Turns extracted document text into graph episodes: the text is split into
//! sentences at terminal punctuation, sentences are grouped two per episode,
//! and each episode is submitted to the graph service with a name, source
//! tag, source description and reference time. Entity/edge extraction,
//! deduplication and embedding all happen service-side.
//!
//! PDF-to-text extraction is an upstream collaborator; this module starts
//! from plain text.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::Result;
use crate::graph::{Episode, EpisodeSource, GraphStore};
use crate::utils::normalize_whitespace;

/// Minimum sentence length; anything shorter is punctuation noise.
const MIN_SENTENCE_CHARS: usize = 3;

/// Split `text` into sentences at `.`, `!` or `?` followed by whitespace
/// (or end of input). Whitespace inside each sentence is normalized; tiny
/// fragments are discarded. A trailing fragment without terminal punctuation
/// is kept as its own sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let at_boundary = text[end..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
            if at_boundary {
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
        }
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = normalize_whitespace(raw);
    if sentence.chars().count() >= MIN_SENTENCE_CHARS {
        sentences.push(sentence);
    }
}

/// Chunk `text` into episodes of two sentences each.
///
/// An odd trailing sentence becomes an episode on its own. Returns an empty
/// vector for text with no usable sentences.
pub fn chunk_text_by_sentence_pairs(text: &str) -> Vec<String> {
    split_sentences(text)
        .chunks(2)
        .map(|pair| pair.join(" "))
        .collect()
}

/// Chunk `text` and submit every episode to the graph service.
///
/// Episodes are named `{name}_episode_{n}` (1-based) and share one reference
/// time. Returns the number of episodes submitted; the first service failure
/// aborts the run.
pub async fn ingest_text<G: GraphStore>(
    store: &G,
    name: &str,
    text: &str,
    source_description: &str,
    reference_time: DateTime<Utc>,
) -> Result<usize> {
    let chunks = chunk_text_by_sentence_pairs(text);

    if chunks.is_empty() {
        warn!(name, "no usable sentences in input text");
        return Ok(0);
    }

    info!(name, episodes = chunks.len(), "submitting episodes");

    for (i, content) in chunks.iter().enumerate() {
        let episode = Episode {
            name: format!("{}_episode_{}", name, i + 1),
            content: content.clone(),
            source: EpisodeSource::Text,
            source_description: source_description.to_string(),
            reference_time,
        };
        store.add_episode(&episode).await?;
        info!(episode = %episode.name, "episode submitted");
    }

    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SearchResult;
    use std::sync::Mutex;

    // --- chunk_text_by_sentence_pairs ---

    #[test]
    fn test_pairs_two_sentences_per_episode() {
        let text = "TechNova was founded in 2015. Alice became CEO in 2022. \
                    The company ships Widget. Widget launched in 2023.";
        let chunks = chunk_text_by_sentence_pairs(text);
        assert_eq!(
            chunks,
            vec![
                "TechNova was founded in 2015. Alice became CEO in 2022.",
                "The company ships Widget. Widget launched in 2023.",
            ]
        );
    }

    #[test]
    fn test_odd_trailing_sentence_stands_alone() {
        let text = "First one. Second one! Third one?";
        let chunks = chunk_text_by_sentence_pairs(text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "Third one?");
    }

    #[test]
    fn test_single_sentence_is_one_episode() {
        assert_eq!(
            chunk_text_by_sentence_pairs("Only one sentence here."),
            vec!["Only one sentence here."]
        );
    }

    #[test]
    fn test_trailing_fragment_without_punctuation_is_kept() {
        let chunks = chunk_text_by_sentence_pairs("A full sentence. and a dangling tail");
        assert_eq!(chunks, vec!["A full sentence. and a dangling tail"]);
    }

    #[test]
    fn test_abbreviation_dots_inside_words_do_not_split() {
        // "U.S.A." — the inner dots are not followed by whitespace.
        let chunks = chunk_text_by_sentence_pairs("Made in the U.S.A. Sold worldwide.");
        assert_eq!(chunks, vec!["Made in the U.S.A. Sold worldwide."]);
    }

    #[test]
    fn test_whitespace_is_normalized_within_sentences() {
        let chunks = chunk_text_by_sentence_pairs("Spread\tacross\n\nlines.  Second   one.");
        assert_eq!(chunks, vec!["Spread across lines. Second one."]);
    }

    #[test]
    fn test_empty_and_noise_inputs_yield_nothing() {
        assert!(chunk_text_by_sentence_pairs("").is_empty());
        assert!(chunk_text_by_sentence_pairs("   \n\t ").is_empty());
        assert!(chunk_text_by_sentence_pairs(". . ! ?").is_empty());
    }

    // --- ingest_text ---

    struct RecordingStore {
        episodes: Mutex<Vec<Episode>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                episodes: Mutex::new(Vec::new()),
            }
        }
    }

    impl GraphStore for RecordingStore {
        async fn search(&self, _q: &str, _n: usize) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn add_episode(&self, episode: &Episode) -> Result<()> {
            self.episodes.lock().unwrap().push(episode.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_ingest_names_and_orders_episodes() {
        let store = RecordingStore::new();
        let now = Utc::now();

        let count = ingest_text(
            &store,
            "tech_nova",
            "One. Two. Three. Four. Five.",
            "PDF extract, sentence-pair chunks",
            now,
        )
        .await
        .unwrap();

        assert_eq!(count, 3);
        let episodes = store.episodes.lock().unwrap();
        let names: Vec<&str> = episodes.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            ["tech_nova_episode_1", "tech_nova_episode_2", "tech_nova_episode_3"]
        );
        assert!(episodes.iter().all(|e| e.reference_time == now));
        assert!(episodes.iter().all(|e| e.source == EpisodeSource::Text));
    }

    #[tokio::test]
    async fn test_ingest_empty_text_submits_nothing() {
        let store = RecordingStore::new();
        let count = ingest_text(&store, "doc", "  ", "desc", Utc::now())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(store.episodes.lock().unwrap().is_empty());
    }
}
