//! Diverse few-shot example picking.
//!
//! Select a handful of labeled examples that cover the candidate pool
//! instead of repeating the same sentiment three times.
//!
//! Run: `cargo run --example select_diverse`

use rank_diverse::embedding::Embedder;
use rank_diverse::mmr::{self, MmrConfig};
use rank_diverse::simd;

fn main() {
    let model = HashEmbedder { dim: 64 };

    let candidates = [
        "The movie was fantastic and entertaining",
        "I loved this film, it was amazing",
        "Great cinematography and acting",
        "Terrible movie, waste of time",
        "The plot was confusing and boring",
        "Best film I've seen this year",
        "Not my cup of tea, too slow",
        "Outstanding performances by the cast",
    ];

    let embeddings = model.embed_batch(&candidates);
    let query = model.embed("How was the movie?");

    println!("=== Diverse Example Selection ===\n");

    // Pure relevance: redundancy-prone
    let top = mmr::select(&query, &embeddings, MmrConfig::new(1.0, 3));
    println!("Top 3 by relevance only:");
    for &i in &top {
        let rel = simd::cosine(&embeddings[i], &query).expect("non-zero embeddings");
        println!("  [{i}] {:.3}  {}", rel, candidates[i]);
    }

    // Balanced MMR
    let picked = mmr::select(&query, &embeddings, MmrConfig::new(0.5, 3));
    println!("\nMMR (lambda=0.5, balanced):");
    for &i in &picked {
        println!("  [{i}] {}", candidates[i]);
    }

    // Diversity-heavy MMR
    let spread = mmr::select(&query, &embeddings, MmrConfig::new(0.3, 3));
    println!("\nMMR (lambda=0.3, more diverse):");
    for &i in &spread {
        println!("  [{i}] {}", candidates[i]);
    }

    println!("\n=== Key Insight ===");
    println!("Pure relevance tends to return paraphrases of one sentiment;");
    println!("MMR mixes praise, criticism, and style remarks.");
}

/// Simple embedding simulation (hash-based, deterministic).
struct HashEmbedder {
    dim: usize,
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0f32; self.dim];
                for (i, word) in text.split_whitespace().enumerate() {
                    for (j, ch) in word.chars().enumerate() {
                        let idx = ((ch as usize) * 7 + i * 13 + j * 17) % self.dim;
                        v[idx] += 0.3;
                    }
                }
                v
            })
            .collect()
    }
}
