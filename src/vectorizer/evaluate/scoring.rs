use std::{cmp::Ordering, fmt};

use indexmap::IndexMap;
use num::Float;
use rayon::prelude::*;
use serde::Serialize;

use crate::vectorizer::vector::TermVector;

/// Cosine similarity of two sparse vectors.
/// cos(θ) = A・B / (|A||B|)
///
/// Returns zero when either vector is empty or has zero magnitude.
/// The result is not clamped: with negative weights it can range over [-1, 1].
pub fn cosine<N>(a: &TermVector<N>, b: &TermVector<N>) -> N
where
    N: Float,
{
    if a.is_empty() || b.is_empty() {
        return N::zero();
    }
    let norm_a = a.magnitude();
    let norm_b = b.magnitude();
    if norm_a.is_zero() || norm_b.is_zero() {
        return N::zero();
    }
    a.dot(b) / (norm_a * norm_b)
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry<N = f64> {
    pub document_id: String,
    pub score: N,
}

/// Ranked search results, best first.
#[derive(Clone, PartialEq)]
pub struct Hits<N = f64> {
    pub list: Vec<HitEntry<N>>,
}

impl<N> Hits<N>
where
    N: Float,
{
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry<N>> {
        self.list.iter()
    }

    /// Drop hits whose score is zero or negative.
    pub fn retain_positive(&mut self) -> &mut Self {
        self.list.retain(|hit| hit.score > N::zero());
        self
    }

    pub fn into_vec(self) -> Vec<HitEntry<N>> {
        self.list
    }
}

impl<N> IntoIterator for Hits<N> {
    type Item = HitEntry<N>;
    type IntoIter = std::vec::IntoIter<HitEntry<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<N> fmt::Debug for Hits<N>
where
    N: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:?}", hit.document_id, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<N> fmt::Display for Hits<N>
where
    N: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {} (score: {:.4})", rank + 1, hit.document_id, hit.score)?;
        }
        Ok(())
    }
}

/// Score every document against `query` and keep the best `top_k`.
///
/// Sorted by score descending; equal scores are ordered by document id
/// ascending so the output is reproducible. Returns
/// `min(top_k, documents.len())` hits, nothing is filtered by score here.
pub fn rank_documents<N>(
    query: &TermVector<N>,
    documents: &IndexMap<String, TermVector<N>>,
    top_k: usize,
) -> Hits<N>
where
    N: Float + Send + Sync,
{
    if top_k == 0 {
        return Hits { list: Vec::new() };
    }
    let mut list: Vec<HitEntry<N>> = documents
        .par_iter()
        .map(|(id, doc)| HitEntry {
            document_id: id.clone(),
            score: cosine(query, doc),
        })
        .collect();
    list.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    list.truncate(top_k);
    Hits { list }
}
