//! Content similarity between catalog entries.
//!
//! ## Algorithm
//! 1. Tokenize each metadata text: runs of two or more word characters,
//!    lowercased, English stop words removed
//! 2. Weight terms with TF-IDF: raw count times `ln((1+n)/(1+df)) + 1`
//! 3. L2-normalize every document vector
//! 4. Cosine similarity is then a plain dot product; every row of the dense
//!    matrix is accumulated through an inverted index, rows in parallel
//!
//! Building is O(N²) in catalog size, which is fine for a few thousand
//! movies and nothing more.

use crate::error::{RecommendError, Result};
use crate::stop_words::ENGLISH_STOP_WORDS;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, instrument};

/// Split text into lowercase terms of at least two word characters
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// Sparse document vector, entries sorted by term id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }
}

/// Fitted TF-IDF model plus the transformed corpus
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Terms in id order (alphabetical)
    pub vocabulary: Vec<String>,
    /// Inverse document frequency per term id
    pub idf: Vec<f64>,
    /// One L2-normalized vector per input document
    pub rows: Vec<SparseVector>,
}

impl TfidfMatrix {
    #[cfg(test)]
    fn term_id(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|known| known.as_str().cmp(term))
            .ok()
    }
}

/// TF-IDF vectorizer with a stop-word list
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Vectorizer using the standard English stop words
    pub fn new() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn with_stop_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            stop_words: words.into_iter().map(str::to_lowercase).collect(),
        }
    }

    fn term_counts(&self, text: &str) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for term in tokenize(text).filter(|t| !self.stop_words.contains(t)) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }

    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn fit_transform(&self, documents: &[&str]) -> TfidfMatrix {
        let counts: Vec<BTreeMap<String, u32>> = documents
            .par_iter()
            .map(|doc| self.term_counts(doc))
            .collect();

        let vocabulary: Vec<String> = counts
            .iter()
            .flat_map(|c| c.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut df = vec![0u32; vocabulary.len()];
        let ids: Vec<Vec<usize>> = counts
            .iter()
            .map(|doc| {
                doc.keys()
                    .map(|term| {
                        // Every term of every document is in the vocabulary
                        let id = vocabulary
                            .binary_search(term)
                            .unwrap_or_else(|insert_at| insert_at);
                        df[id] += 1;
                        id
                    })
                    .collect()
            })
            .collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = counts
            .par_iter()
            .zip(ids.par_iter())
            .map(|(doc, doc_ids)| {
                let mut vector = SparseVector {
                    entries: doc_ids
                        .iter()
                        .zip(doc.values())
                        .map(|(&id, &tf)| (id, tf as f64 * idf[id]))
                        .collect(),
                };
                let norm = vector.norm();
                if norm > 0.0 {
                    for (_, w) in &mut vector.entries {
                        *w /= norm;
                    }
                }
                vector
            })
            .collect();

        debug!("Vectorized {} documents over {} terms", rows.len(), vocabulary.len());

        TfidfMatrix {
            vocabulary,
            idf,
            rows,
        }
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dense, symmetric pairwise cosine similarity in catalog row order
///
/// Cells are kept in full `f64` so ranking ties and percentage rounding
/// see the same value the dot product produced.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Pairwise dot products of the (already normalized) TF-IDF rows
    ///
    /// Each cell sums the shared terms in ascending term order whichever
    /// side it is computed from, so `[i][j]` and `[j][i]` are bit-identical.
    pub fn from_tfidf(tfidf: &TfidfMatrix) -> Self {
        let size = tfidf.rows.len();

        let mut postings: Vec<Vec<(usize, f64)>> = vec![Vec::new(); tfidf.vocabulary.len()];
        for (doc, row) in tfidf.rows.iter().enumerate() {
            for &(term, weight) in &row.entries {
                postings[term].push((doc, weight));
            }
        }

        let mut values = vec![0.0f64; size * size];
        if size == 0 {
            return Self { size, values };
        }

        values
            .par_chunks_mut(size)
            .zip(tfidf.rows.par_iter())
            .for_each(|(out, row)| {
                let mut acc = vec![0.0f64; size];
                for &(term, weight) in &row.entries {
                    for &(doc, other) in &postings[term] {
                        acc[doc] += weight * other;
                    }
                }
                for (cell, value) in out.iter_mut().zip(acc) {
                    *cell = value.clamp(0.0, 1.0);
                }
            });

        Self { size, values }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

/// Builds the [`SimilarityMatrix`] of a corpus of metadata texts
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vectorizer: TfidfVectorizer,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vectorizer(vectorizer: TfidfVectorizer) -> Self {
        Self { vectorizer }
    }

    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn build(&self, documents: &[&str]) -> Result<SimilarityMatrix> {
        if documents.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        let tfidf = self.vectorizer.fit_transform(documents);
        let matrix = SimilarityMatrix::from_tfidf(&tfidf);
        info!(
            "Built {}x{} similarity matrix over {} terms",
            matrix.size(),
            matrix.size(),
            tfidf.vocabulary.len()
        );
        Ok(matrix)
    }
}
