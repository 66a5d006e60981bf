//! Brute-force nearest-neighbour ranking over the in-memory index.

use anyhow::bail;
use domain::models::Embedding;
use shared::types::Result;
use std::cmp::Ordering;

/// One ranked index row.
#[derive(Debug, Clone, Copy)]
pub struct ScoredExample<'a> {
    pub score: f32,
    pub example: &'a Embedding,
}

/// Cosine similarity of two equal-length vectors. A zero-norm side scores 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_nan() {
        0.0
    } else {
        score
    }
}

/// The `k` rows nearest to `query`, best first. Equal scores keep corpus order.
///
/// Fails when `query` does not live in the same vector space as the index, which
/// happens when the embedding model changed underneath a persisted index.
pub fn nearest<'a>(
    query: &[f32],
    index: &'a [Embedding],
    k: usize,
) -> Result<Vec<ScoredExample<'a>>> {
    if let Some(row) = index.iter().find(|row| row.vector.len() != query.len()) {
        bail!(
            "query vector has {} dimensions but {} has {}; rebuild the index",
            query.len(),
            row.id,
            row.vector.len()
        );
    }
    let mut ranked: Vec<ScoredExample<'a>> = index
        .iter()
        .map(|example| ScoredExample {
            score: cosine(query, &example.vector),
            example,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(k);
    Ok(ranked)
}
