use indexmap::IndexMap;
use num::Float;

/// Sparse term-weight vector.
///
/// Used for both document vectors (owned by the matrix) and query vectors
/// (built per query). A weight of exactly zero is never stored: inserting
/// zero removes the term, and an absent term reads as zero.
/// Negative weights are kept, they come from negative idf values.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVector<N = f64>
where
    N: Float,
{
    weights: IndexMap<String, N>,
}

impl<N> Default for TermVector<N>
where
    N: Float,
{
    fn default() -> Self {
        Self { weights: IndexMap::new() }
    }
}

impl<N> TermVector<N>
where
    N: Float,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { weights: IndexMap::with_capacity(capacity) }
    }

    /// Set the weight of `term`. Zero removes the term.
    pub fn insert(&mut self, term: impl Into<String>, weight: N) {
        let term = term.into();
        if weight.is_zero() {
            self.weights.shift_remove(&term);
        } else {
            self.weights.insert(term, weight);
        }
    }

    /// Weight of `term`, zero when absent.
    #[inline]
    pub fn weight(&self, term: &str) -> N {
        self.weights.get(term).copied().unwrap_or_else(N::zero)
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<N> {
        self.weights.get(term).copied()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, N)> + '_ {
        self.weights.iter().map(|(term, &w)| (term.as_str(), w))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(String::as_str)
    }

    /// Euclidean norm over the stored weights.
    /// ||a|| = sqrt(Σ(a_i^2))
    pub fn magnitude(&self) -> N {
        self.weights
            .values()
            .fold(N::zero(), |acc, &w| acc + w * w)
            .sqrt()
    }

    /// Dot product over the terms both vectors share.
    /// Iterates the smaller vector and probes the larger one.
    pub fn dot(&self, other: &TermVector<N>) -> N {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(term, &w)| large.weights.get(term).map(|&v| w * v))
            .fold(N::zero(), |acc, p| acc + p)
    }

    /// Same terms, and every weight within `tolerance` of the other side.
    pub fn approx_eq(&self, other: &TermVector<N>, tolerance: N) -> bool {
        self.len() == other.len()
            && self.weights.iter().all(|(term, &w)| {
                other
                    .weights
                    .get(term)
                    .is_some_and(|&v| (w - v).abs() <= tolerance)
            })
    }
}

impl<N, S> FromIterator<(S, N)> for TermVector<N>
where
    N: Float,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, N)>>(iter: I) -> Self {
        let mut vector = TermVector::new();
        for (term, weight) in iter {
            vector.insert(term, weight);
        }
        vector
    }
}
