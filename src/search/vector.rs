use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{DishMetadata, Document};

/// A stored menu item with its precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub page_content: String,
    pub metadata: DishMetadata,
    pub embedding: Vec<f32>,
}

/// Read-only menu index loaded from disk, searched by cosine similarity.
pub struct MenuIndex {
    entries: Vec<IndexEntry>,
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct VectorHit {
    pub document: Document,
    pub score: f32,
}

impl MenuIndex {
    /// Load the index file. A missing file is an error: the index is built
    /// by a separate ingestion step and is never created here.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Menu index not found at {}. Please run your ingestion script first.",
                path.display()
            );
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read menu index {}", path.display()))?;
        let entries: Vec<IndexEntry> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse menu index {}", path.display()))?;

        Self::from_entries(entries, path.to_path_buf())
    }

    pub fn from_entries(entries: Vec<IndexEntry>, path: PathBuf) -> Result<Self> {
        if let Some(first) = entries.first() {
            let dim = first.embedding.len();
            if let Some(bad) = entries.iter().position(|e| e.embedding.len() != dim) {
                anyhow::bail!(
                    "Menu index entry {bad} has embedding dimension {} (expected {dim})",
                    entries[bad].embedding.len()
                );
            }
        } else {
            tracing::warn!("Menu index {} is empty", path.display());
        }

        Ok(Self { entries, path })
    }

    /// Top `limit` entries by cosine similarity to `query_embedding`.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<VectorHit> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        // Stable sort keeps index order for ties
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| VectorHit {
                document: Document {
                    page_content: e.page_content.clone(),
                    metadata: e.metadata.clone(),
                },
                score,
            })
            .collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    let score = dot / denom;
    // Zero norms and overflowing embeddings score as unrelated
    if denom == 0.0 || !score.is_finite() {
        0.0
    } else {
        score
    }
}
