//! The embedding-provider boundary.
//!
//! Selection consumes already-computed vectors; producing them is a
//! separate concern with its own lifecycle (model download, weights in
//! memory, warmup). This module pins down that boundary as a trait so the
//! selector stays testable with synthetic vectors and never pays a model's
//! startup cost.
//!
//! ## Usage
//!
//! Implement [`Embedder`] for your inference backend (e.g. candle, ort,
//! an HTTP embedding API).
//!
//! ```rust
//! use rank_diverse::embedding::Embedder;
//! use rank_diverse::mmr::{self, MmrConfig};
//!
//! struct ByteHistogram;
//!
//! impl Embedder for ByteHistogram {
//!     fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
//!         texts
//!             .iter()
//!             .map(|t| {
//!                 let mut v = vec![0.0f32; 16];
//!                 for b in t.bytes() {
//!                     v[(b % 16) as usize] += 1.0;
//!                 }
//!                 v
//!             })
//!             .collect()
//!     }
//! }
//!
//! let model = ByteHistogram;
//! let pool = ["an example", "another example", "something else"];
//! let candidates = model.embed_batch(&pool);
//! let query = model.embed("example");
//!
//! let picked = mmr::try_select(&query, &candidates, MmrConfig::new(0.5, 2)).unwrap();
//! assert_eq!(picked.len(), 2);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Embedder Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for embedding providers.
///
/// Implementors map text to fixed-length `f32` vectors. All vectors
/// produced within one session must share a single dimensionality, and
/// embedding the same text twice should yield the same vector; selection
/// is deterministic, and a nondeterministic provider forfeits that
/// property upstream.
pub trait Embedder {
    /// Embed a batch of texts, one vector per text, in input order.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_batch(&[text]).pop().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalized Embedding (unit L2 norm)
// ─────────────────────────────────────────────────────────────────────────────

/// A unit-normalized embedding vector.
///
/// # Invariant
///
/// `||v||₂ = 1` (within floating-point tolerance)
///
/// Contrastively trained embedding models produce vectors meant to be
/// compared on the unit hypersphere, where `cos(q, d) = q · d`. This type
/// makes that assumption explicit and compiler-checked, and it cannot hold
/// a zero vector, so every similarity against it is defined.
#[derive(Debug, Clone)]
pub struct Normalized {
    data: Vec<f32>,
}

impl Normalized {
    /// Access the underlying data (guaranteed unit norm).
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Dimension of the embedding.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Dot product with another normalized vector.
    ///
    /// Because both are unit normalized, this IS cosine similarity.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Normalized) -> f32 {
        crate::simd::dot(&self.data, &other.data)
    }
}

impl AsRef<[f32]> for Normalized {
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}

/// Normalize a vector to unit L2 norm.
///
/// Returns `None` if the vector is zero (undefined normalization), the
/// same degenerate class [`crate::simd::cosine`] refuses to score.
#[must_use]
pub fn normalize(v: &[f32]) -> Option<Normalized> {
    let norm = crate::simd::norm(v);
    if norm <= crate::simd::ZERO_NORM {
        return None;
    }
    let data: Vec<f32> = v.iter().map(|&x| x / norm).collect();
    Some(Normalized { data })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
