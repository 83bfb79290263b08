//! Greedy Maximal Marginal Relevance (MMR) selection.
//!
//! Select a small, fixed-size subset of candidates that is jointly relevant
//! to a query and mutually diverse — maximizing coverage while minimizing
//! redundancy.
//!
//! # Algorithm
//!
//! Each round scores every remaining candidate as
//!
//! ```text
//! mmr(i) = λ · cos(cand[i], query) − (1−λ) · max_{s ∈ selected} cos(cand[i], cand[s])
//! ```
//!
//! and picks the maximum. The first round has no selected items to be
//! redundant with, so it is a pure-relevance pick for every `λ`. Query
//! relevance is computed once, up front; it never changes across rounds.
//!
//! # Lambda Parameter Guide
//!
//! | Value | Use Case |
//! |-------|----------|
//! | 0.3–0.5 | Exploratory search, discovery |
//! | 0.5 | Balanced default (RAG systems, few-shot example picking) |
//! | 0.7–0.9 | Precision search, specific intent |
//!
//! `λ=1` reduces to top-k by relevance; `λ=0` reduces to max-diversity
//! after the first pick. Values outside `[0, 1]` are accepted as-is and
//! simply invert or exaggerate the tradeoff.
//!
//! # Determinism
//!
//! Output is a function of the inputs alone. Ties, in the first pick and
//! in every later round, always resolve to the lowest original index, so
//! repeated calls reproduce the same sequence exactly.
//!
//! # Example
//!
//! ```rust
//! use rank_diverse::mmr::{try_select, MmrConfig};
//!
//! let query = vec![1.0, 0.2, 0.0];
//! let candidates = vec![
//!     vec![1.0, 0.0, 0.0], // on-topic
//!     vec![0.9, 0.0, 0.2], // close paraphrase of the first
//!     vec![0.0, 1.0, 0.0], // different aspect
//! ];
//!
//! let picked = try_select(&query, &candidates, MmrConfig::new(0.5, 2)).unwrap();
//!
//! // Index 1 is crowded out by its redundancy with index 0.
//! assert_eq!(picked, vec![0, 2]);
//! ```

use crate::simd;
use crate::{Result, SelectError};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for Maximal Marginal Relevance selection.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MmrConfig {
    /// Trade-off between relevance and diversity.
    /// - `λ=1.0`: pure relevance (no diversity)
    /// - `λ=0.0`: pure diversity after the first pick
    /// - `λ=0.5`: balanced (common default)
    ///
    /// Not clamped: out-of-range values are used verbatim.
    pub lambda: f32,
    /// Number of candidates to select. The result holds
    /// `min(k, candidates.len())` indices.
    pub k: usize,
}

impl Default for MmrConfig {
    fn default() -> Self {
        Self { lambda: 0.5, k: 10 }
    }
}

impl MmrConfig {
    /// Create config with custom lambda and k.
    #[must_use]
    pub const fn new(lambda: f32, k: usize) -> Self {
        Self { lambda, k }
    }

    /// Set lambda (relevance-diversity tradeoff).
    #[must_use]
    pub const fn with_lambda(mut self, lambda: f32) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set k (number of candidates to select).
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection from embeddings
// ─────────────────────────────────────────────────────────────────────────────

/// MMR selection over raw embeddings.
///
/// Computes cosine similarities internally: query relevance once up front,
/// candidate-to-selected similarities on demand in the greedy loop
/// (O(k·n·d) overall). See [`try_select_precomputed`] to supply your own
/// scores and similarity matrix instead.
///
/// # Returns
///
/// `min(k, n)` pairwise-distinct indices into `candidates`, in selection
/// order: position 0 is the most query-relevant candidate, each later
/// position is the marginal-relevance maximizer given everything before it.
/// Mapping indices back to payloads is the caller's lookup.
///
/// # Errors
///
/// - [`SelectError::DimensionMismatch`] if any candidate's length differs
///   from the query's, reported before any scoring.
/// - [`SelectError::UndefinedSimilarity`] if the query or any candidate
///   has zero norm. Every norm is taken during the up-front relevance
///   pass, so this also surfaces before the first pick.
///
/// An empty pool or `k = 0` is not an error: the result is empty.
pub fn try_select<V: AsRef<[f32]>>(
    query: &[f32],
    candidates: &[V],
    config: MmrConfig,
) -> Result<Vec<usize>> {
    let n = candidates.len();
    if n == 0 || config.k == 0 {
        return Ok(Vec::new());
    }

    let dim = query.len();
    for (i, cand) in candidates.iter().enumerate() {
        let len = cand.as_ref().len();
        if len != dim {
            return Err(SelectError::DimensionMismatch {
                index: i,
                expected: dim,
                got: len,
            });
        }
    }

    let query_norm = simd::norm(query);
    if query_norm <= simd::ZERO_NORM {
        return Err(SelectError::UndefinedSimilarity { index: None });
    }

    // One pass over the pool: norms are reused for every pairwise cosine in
    // the loop, relevance never changes across rounds.
    let mut norms = Vec::with_capacity(n);
    let mut relevance = Vec::with_capacity(n);
    for (i, cand) in candidates.iter().enumerate() {
        let cand = cand.as_ref();
        let cand_norm = simd::norm(cand);
        if cand_norm <= simd::ZERO_NORM {
            return Err(SelectError::UndefinedSimilarity { index: Some(i) });
        }
        relevance.push(simd::dot(cand, query) / (cand_norm * query_norm));
        norms.push(cand_norm);
    }

    Ok(greedy_pick(&relevance, config, |i, s| {
        simd::dot(candidates[i].as_ref(), candidates[s].as_ref()) / (norms[i] * norms[s])
    }))
}

/// Panicking convenience wrapper around [`try_select`].
///
/// # Panics
///
/// Panics if the inputs violate a precondition (mixed dimensions, zero-norm
/// vectors). Use [`try_select`] for the fallible version.
#[must_use]
pub fn select<V: AsRef<[f32]>>(query: &[f32], candidates: &[V], config: MmrConfig) -> Vec<usize> {
    try_select(query, candidates, config)
        .expect("query and candidates must be same-dimension vectors with non-zero norm")
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection from precomputed scores
// ─────────────────────────────────────────────────────────────────────────────

/// MMR selection from precomputed relevance and a similarity matrix.
///
/// For callers that already carry relevance scores (e.g. from a retrieval
/// stage) or want to trade an O(n²·d) matrix precompute for O(1) pairwise
/// lookups. Identical greedy loop, bootstrap, and tie-breaking as
/// [`try_select`]; relevance scores are used raw, without rescaling, so a
/// `λ=1` run degenerates to exactly top-k by the scores given.
///
/// # Arguments
///
/// * `relevance` - Per-candidate relevance score (higher is better)
/// * `similarity` - Flattened row-major n×n matrix;
///   `similarity[i * n + j]` is the similarity of candidates `i` and `j`
/// * `config` - Lambda and k
///
/// # Errors
///
/// Returns [`SelectError::SimilarityMatrixShape`] if
/// `similarity.len() != relevance.len()²`.
pub fn try_select_precomputed(
    relevance: &[f32],
    similarity: &[f32],
    config: MmrConfig,
) -> Result<Vec<usize>> {
    let n = relevance.len();
    if similarity.len() != n * n {
        return Err(SelectError::SimilarityMatrixShape {
            expected: n * n,
            got: similarity.len(),
        });
    }

    if n == 0 || config.k == 0 {
        return Ok(Vec::new());
    }

    Ok(greedy_pick(relevance, config, |i, s| similarity[i * n + s]))
}

/// Panicking convenience wrapper around [`try_select_precomputed`].
///
/// # Panics
///
/// Panics if `similarity.len() != relevance.len()²`.
#[must_use]
pub fn select_precomputed(relevance: &[f32], similarity: &[f32], config: MmrConfig) -> Vec<usize> {
    try_select_precomputed(relevance, similarity, config)
        .expect("similarity matrix must be n×n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Greedy loop
// ─────────────────────────────────────────────────────────────────────────────

/// The greedy loop shared by both entry points.
///
/// `pair_sim(i, s)` yields the similarity between candidates `i` and `s`.
/// Invariants: the remaining pool stays sorted ascending (`Vec::remove`,
/// never `swap_remove`) and rounds compare with strict `>`, so the lowest
/// original index wins every tie. The first round scores by relevance
/// alone: with nothing selected the redundancy penalty is undefined, and
/// scoring it as zero would make the first pick depend on `λ`.
fn greedy_pick(
    relevance: &[f32],
    config: MmrConfig,
    pair_sim: impl Fn(usize, usize) -> f32,
) -> Vec<usize> {
    let n = relevance.len();
    let lambda = config.lambda;
    let rounds = config.k.min(n);

    let mut selected: Vec<usize> = Vec::with_capacity(rounds);
    let mut remaining: Vec<usize> = (0..n).collect();

    for _ in 0..rounds {
        let mut best_pos = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (pos, &cand) in remaining.iter().enumerate() {
            let score = if selected.is_empty() {
                relevance[cand]
            } else {
                let max_sim = selected
                    .iter()
                    .map(|&s| pair_sim(cand, s))
                    .fold(f32::NEG_INFINITY, f32::max);
                lambda * relevance[cand] - (1.0 - lambda) * max_sim
            };

            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }

        selected.push(remaining.remove(best_pos));
    }

    selected
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


// ─────────────────────────────────────────────────────────────────────────────
// Property Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Candidate pools of non-degenerate vectors (no zero norms).
    fn arb_pool(dim: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
        proptest::collection::vec(
            proptest::collection::vec(-10.0f32..10.0, dim)
                .prop_filter("non-zero", |v| crate::simd::norm(v) > 1e-6),
            1..12,
        )
    }

    fn arb_query(dim: usize) -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(-10.0f32..10.0, dim)
            .prop_filter("non-zero", |v| crate::simd::norm(v) > 1e-6)
    }

    proptest! {
        /// Result length is exactly min(k, n)
        #[test]
        fn size_law(
            query in arb_query(8),
            candidates in arb_pool(8),
            k in 0usize..20,
            lambda in 0.0f32..1.0,
        ) {
            let picked = try_select(&query, &candidates, MmrConfig::new(lambda, k)).unwrap();
            prop_assert_eq!(picked.len(), k.min(candidates.len()));
        }

        /// No index is ever selected twice, and all indices are in range
        #[test]
        fn indices_distinct_and_in_range(
            query in arb_query(6),
            candidates in arb_pool(6),
            lambda in 0.0f32..1.0,
        ) {
            let n = candidates.len();
            let picked = try_select(&query, &candidates, MmrConfig::new(lambda, n)).unwrap();

            let mut seen = std::collections::HashSet::new();
            for &i in &picked {
                prop_assert!(i < n, "index {} out of range", i);
                prop_assert!(seen.insert(i), "duplicate index {}", i);
            }
        }

        /// Identical inputs reproduce identical output sequences
        #[test]
        fn deterministic(
            query in arb_query(6),
            candidates in arb_pool(6),
            k in 1usize..8,
            lambda in 0.0f32..1.0,
        ) {
            let cfg = MmrConfig::new(lambda, k);
            let a = try_select(&query, &candidates, cfg).unwrap();
            let b = try_select(&query, &candidates, cfg).unwrap();
            prop_assert_eq!(a, b);
        }

        /// The first pick is always the relevance argmax (lowest index on
        /// ties), independent of lambda
        #[test]
        fn bootstrap_is_relevance_argmax(
            query in arb_query(6),
            candidates in arb_pool(6),
            lambda in 0.0f32..1.0,
        ) {
            let picked = try_select(&query, &candidates, MmrConfig::new(lambda, 1)).unwrap();

            let mut best = 0;
            let mut best_rel = f32::NEG_INFINITY;
            for (i, c) in candidates.iter().enumerate() {
                let rel = crate::simd::cosine(c, &query).unwrap();
                if rel > best_rel {
                    best_rel = rel;
                    best = i;
                }
            }
            prop_assert_eq!(picked, vec![best]);
        }

        /// λ=1 reduces to top-k by relevance, ties to lowest index
        #[test]
        fn lambda_one_is_relevance_sort(
            query in arb_query(6),
            candidates in arb_pool(6),
        ) {
            let n = candidates.len();
            let picked = try_select(&query, &candidates, MmrConfig::new(1.0, n)).unwrap();

            let mut expected: Vec<usize> = (0..n).collect();
            let relevance: Vec<f32> = candidates
                .iter()
                .map(|c| crate::simd::cosine(c, &query).unwrap())
                .collect();
            // Stable sort keeps ascending-index order within equal scores
            expected.sort_by(|&a, &b| relevance[b].total_cmp(&relevance[a]));

            prop_assert_eq!(picked, expected);
        }

        /// The embedding path and the precomputed-matrix path agree
        #[test]
        fn precomputed_agrees_with_direct(
            query in arb_query(5),
            candidates in arb_pool(5),
            k in 1usize..8,
            lambda in 0.0f32..1.0,
        ) {
            let n = candidates.len();
            let relevance: Vec<f32> = candidates
                .iter()
                .map(|c| crate::simd::cosine(c, &query).unwrap())
                .collect();
            let mut similarity = Vec::with_capacity(n * n);
            for i in 0..n {
                for j in 0..n {
                    similarity.push(
                        crate::simd::cosine(&candidates[i], &candidates[j]).unwrap(),
                    );
                }
            }

            let cfg = MmrConfig::new(lambda, k);
            let direct = try_select(&query, &candidates, cfg).unwrap();
            let via_matrix = try_select_precomputed(&relevance, &similarity, cfg).unwrap();
            prop_assert_eq!(direct, via_matrix);
        }
    }
}
