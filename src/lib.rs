//! # rank-diverse
//!
//! Diversity-aware subset selection for retrieval pipelines.
//!
//! Pure top-k-by-similarity tends to return near-duplicates: the second
//! result is usually a paraphrase of the first. This crate implements greedy
//! Maximal Marginal Relevance (MMR) selection, which picks a small subset
//! that is jointly relevant to a query *and* mutually diverse.
//!
//! ## Modules
//!
//! | Module | Purpose | Notes |
//! |--------|---------|-------|
//! | [`mmr`] | Greedy MMR selection over embeddings | The core |
//! | [`simd`] | Vector ops (AVX2/NEON) | Auto-dispatch |
//! | [`embedding`] | Embedding provider seam | Trait-based, BYOM |
//!
//! ## Pipeline
//!
//! ```text
//! Embed → Retrieve → Select diverse subset (this crate) → Present
//! ```
//!
//! The crate never produces embeddings itself: callers hand it
//! already-computed `f32` vectors (see [`embedding::Embedder`] for the
//! boundary), and get back *indices* into their candidate pool. Mapping
//! indices back to payloads is a lookup the caller owns.
//!
//! ## Quick Example
//!
//! ```rust
//! use rank_diverse::mmr::{self, MmrConfig};
//!
//! let query = vec![1.0, 0.2];
//! let candidates = vec![
//!     vec![1.0, 0.0], // most relevant
//!     vec![1.0, 0.0], // exact duplicate of the above
//!     vec![0.0, 1.0], // less relevant, but different
//! ];
//!
//! let config = MmrConfig::default().with_lambda(0.5).with_k(2);
//! let picked = mmr::try_select(&query, &candidates, config).unwrap();
//!
//! // The duplicate is fully penalized; the diverse candidate wins slot 2.
//! assert_eq!(picked, vec![0, 2]);
//! ```

pub mod embedding;
pub mod mmr;
pub mod simd;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors reported by selection.
///
/// Every variant names the precondition that was violated and, where it
/// applies, the candidate index implicated. No partial selection is ever
/// returned alongside an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// A candidate vector's dimensionality differs from the query's.
    ///
    /// Detected before any scoring: a selection over mixed-dimension
    /// vectors would be meaningless.
    DimensionMismatch {
        /// Index of the offending candidate.
        index: usize,
        /// Query dimensionality.
        expected: usize,
        /// The candidate's dimensionality.
        got: usize,
    },
    /// A vector with (numerically) zero norm was encountered.
    ///
    /// A zero vector has no direction, so cosine similarity against it is
    /// undefined. `index` is the offending candidate, or `None` for the
    /// query itself. Callers that want to treat zero vectors as similarity
    /// 0 must do so explicitly via [`simd::cosine_or_zero`] before
    /// selection; the selector never assumes that policy.
    UndefinedSimilarity {
        /// Offending candidate index; `None` means the query vector.
        index: Option<usize>,
    },
    /// A precomputed similarity matrix is not n×n for n candidates.
    SimilarityMatrixShape {
        /// Expected flattened length (n²).
        expected: usize,
        /// Actual flattened length.
        got: usize,
    },
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "candidate {index} has dimension {got}, query has dimension {expected}"
            ),
            Self::UndefinedSimilarity { index: Some(i) } => {
                write!(f, "candidate {i} has zero norm; cosine similarity is undefined")
            }
            Self::UndefinedSimilarity { index: None } => {
                write!(f, "query has zero norm; cosine similarity is undefined")
            }
            Self::SimilarityMatrixShape { expected, got } => write!(
                f,
                "similarity matrix has {got} entries, expected {expected} (n²)"
            ),
        }
    }
}

impl std::error::Error for SelectError {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_candidate() {
        let e = SelectError::DimensionMismatch {
            index: 3,
            expected: 128,
            got: 64,
        };
        let msg = e.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("128"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn error_display_distinguishes_query_from_candidate() {
        let q = SelectError::UndefinedSimilarity { index: None };
        let c = SelectError::UndefinedSimilarity { index: Some(7) };
        assert!(q.to_string().contains("query"));
        assert!(c.to_string().contains('7'));
    }
}
