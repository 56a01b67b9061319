use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

use crate::vectorizer::{
    idf::IdfTable, term::TermFrequency, vector::TermVector, TfIdfMatrix, Vocabulary,
};

impl TfIdfMatrix {
    /// Build a TF-IDF matrix from a tokenized corpus.
    ///
    /// - tf(t, d) = count(t, d) / |d|
    /// - df(t) = number of documents containing t
    /// - idf(t) = ln(N / (1 + df(t)))
    /// - weight(t, d) = tf(t, d) * idf(t), zero weights omitted
    ///
    /// Documents keep the corpus order. The vocabulary is the union of all
    /// document terms in document order, then first-occurrence order.
    /// An empty corpus gives an empty matrix and a document with no tokens
    /// gives an empty vector.
    pub fn build<T>(corpus: &IndexMap<String, Vec<T>>) -> Self
    where
        T: AsRef<str> + Sync,
    {
        let freqs: Vec<(&str, TermFrequency)> = corpus
            .par_iter()
            .map(|(id, tokens)| (id.as_str(), TermFrequency::from_terms(tokens)))
            .collect();

        let doc_num = freqs.len() as u64;
        let mut doc_freqs: IndexMap<String, u64> = IndexMap::new();
        for (_, freq) in &freqs {
            for term in freq.terms() {
                *doc_freqs.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        let vocabulary: Vocabulary = doc_freqs.keys().cloned().collect();
        let idf = IdfTable::from_doc_freqs(doc_num, doc_freqs);

        let documents: IndexMap<String, TermVector<f64>> = freqs
            .into_par_iter()
            .map(|(id, freq)| {
                let vector: TermVector<f64> = freq
                    .tf_iter()
                    .map(|(term, tf)| (term, tf * idf.get(term).unwrap_or(0.0)))
                    .collect();
                (id.to_string(), vector)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        info!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "built TF-IDF matrix"
        );
        TfIdfMatrix::from_parts(documents, vocabulary, idf)
    }
}
