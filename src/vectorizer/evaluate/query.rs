use crate::vectorizer::{
    idf::IdfTable, term::TermFrequency, vector::TermVector, TfIdfMatrix, Vocabulary,
};

/// Turns tokenized queries into TF-IDF vectors against a fixed vocabulary.
///
/// Borrowing the vocabulary and IDF table keeps it cheap to build one per
/// query, or to share one across threads.
#[derive(Debug, Clone, Copy)]
pub struct QueryVectorizer<'a> {
    vocabulary: &'a Vocabulary,
    idf: &'a IdfTable,
}

impl<'a> QueryVectorizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary, idf: &'a IdfTable) -> Self {
        Self { vocabulary, idf }
    }

    pub fn from_matrix(matrix: &'a TfIdfMatrix) -> Self {
        Self::new(matrix.vocabulary(), matrix.idf())
    }

    /// tf is relative to the query's own token count, idf comes from the
    /// corpus. Out-of-vocabulary terms are dropped, as are terms whose
    /// weight is exactly zero. An empty result means "no results".
    pub fn vectorize<T>(&self, tokens: &[T]) -> TermVector<f64>
    where
        T: AsRef<str>,
    {
        let freq = TermFrequency::from_terms(tokens);
        freq.tf_iter()
            .filter(|(term, _)| self.vocabulary.contains(*term))
            .map(|(term, tf)| (term, tf * self.idf.get(term).unwrap_or(0.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Vocabulary, IdfTable) {
        let vocabulary: Vocabulary = ["economy", "growth", "sport"]
            .into_iter()
            .map(String::from)
            .collect();
        // N = 2: economy in both, growth and sport in one each
        let idf = IdfTable::from_doc_freqs(2, [("economy", 2), ("growth", 1), ("sport", 1)]);
        (vocabulary, idf)
    }

    #[test]
    fn single_term_query_uses_full_idf() {
        let (vocabulary, idf) = setup();
        let q = QueryVectorizer::new(&vocabulary, &idf).vectorize(&["economy"]);
        assert_eq!(q.len(), 1);
        assert!((q.weight("economy") - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((q.weight("economy") - -0.405).abs() < 1e-3);
    }

    #[test]
    fn out_of_vocabulary_terms_are_dropped() {
        let (vocabulary, idf) = setup();
        let q = QueryVectorizer::new(&vocabulary, &idf).vectorize(&["economy", "unknown"]);
        assert_eq!(q.len(), 1);
        // tf still counts the unknown token: 1 / 2
        assert!((q.weight("economy") - 0.5 * (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!(!q.contains("unknown"));
    }

    #[test]
    fn zero_idf_terms_are_dropped() {
        let (vocabulary, idf) = setup();
        let q = QueryVectorizer::new(&vocabulary, &idf).vectorize(&["growth", "sport"]);
        assert!(q.is_empty());
    }

    #[test]
    fn empty_and_unknown_queries_give_empty_vectors() {
        let (vocabulary, idf) = setup();
        let vectorizer = QueryVectorizer::new(&vocabulary, &idf);
        assert!(vectorizer.vectorize::<&str>(&[]).is_empty());
        assert!(vectorizer.vectorize(&["nothing", "here"]).is_empty());
    }

    #[test]
    fn repeated_terms_raise_tf() {
        let vocabulary: Vocabulary = ["a", "b"].into_iter().map(String::from).collect();
        let idf = IdfTable::from_doc_freqs(10, [("a", 1), ("b", 1)]);
        let q = QueryVectorizer::new(&vocabulary, &idf).vectorize(&["a", "a", "b"]);
        assert!((q.weight("a") - 2.0 * q.weight("b")).abs() < 1e-12);
    }
}
