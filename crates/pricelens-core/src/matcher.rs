//! Cross-source listing matcher.
//!
//! Pairs each left-hand record with its most similar right-hand record by
//! title word overlap. The pairing is greedy per left record, not a global
//! bipartite assignment: one right record may be chosen by several left
//! records.

use serde::Serialize;

use crate::domain::CanonicalRecord;
use crate::obs;

/// A pair must score strictly above this to be reported.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Words shorter than this never count as common.
pub const MIN_WORD_LEN: usize = 4;

/// Two records believed to describe the same product.
///
/// Only [`match_records`] builds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    left: CanonicalRecord,
    right: CanonicalRecord,
    #[serde(rename = "similarityScore")]
    similarity_score: f64,
}

impl MatchedPair {
    pub fn left(&self) -> &CanonicalRecord {
        &self.left
    }

    pub fn right(&self) -> &CanonicalRecord {
        &self.right
    }

    pub fn similarity_score(&self) -> f64 {
        self.similarity_score
    }
}

/// Lower-cased whitespace-separated words of a title.
struct TitleWords(Vec<String>);

impl TitleWords {
    fn new(title: &str) -> Self {
        Self(
            title
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        )
    }

    fn similarity(&self, other: &TitleWords) -> f64 {
        let denominator = (self.0.len() + other.0.len()) as f64 / 2.0;
        if denominator == 0.0 {
            return 0.0;
        }
        let common = self
            .0
            .iter()
            .filter(|word| word.chars().count() >= MIN_WORD_LEN)
            .filter(|word| {
                other
                    .0
                    .iter()
                    .any(|w| w.contains(word.as_str()) || word.contains(w.as_str()))
            })
            .count();
        common as f64 / denominator
    }
}

/// Title word-overlap score.
///
/// Counts words of `a` with at least [`MIN_WORD_LEN`] characters that contain,
/// or are contained in, some word of `b`, divided by the mean word count of
/// the two titles. Not clamped; `0` when either title has no words.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    TitleWords::new(a).similarity(&TitleWords::new(b))
}

/// Match `left` against `right`, best first.
///
/// Each left record keeps the first right record with the highest score
/// above [`MATCH_THRESHOLD`]; left records without one are dropped. Equal
/// scores keep left-list order.
pub fn match_records(left: &[CanonicalRecord], right: &[CanonicalRecord]) -> Vec<MatchedPair> {
    if left.is_empty() || right.is_empty() {
        obs::emit_match_completed(left.len(), right.len(), 0);
        return Vec::new();
    }

    let right_words: Vec<TitleWords> = right
        .iter()
        .map(|r| TitleWords::new(&r.product_name))
        .collect();

    let mut pairs = Vec::new();
    for record in left {
        let words = TitleWords::new(&record.product_name);
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in right_words.iter().enumerate() {
            let score = words.similarity(candidate);
            let beats_best = best.map_or(true, |(_, top)| score > top);
            if score > MATCH_THRESHOLD && beats_best {
                best = Some((idx, score));
            }
        }
        if let Some((idx, score)) = best {
            pairs.push(MatchedPair {
                left: record.clone(),
                right: right[idx].clone(),
                similarity_score: score,
            });
        }
    }

    // Stable sort keeps left order among equal scores.
    pairs.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    obs::emit_match_completed(left.len(), right.len(), pairs.len());
    pairs
}
