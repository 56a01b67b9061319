pub mod builder;
pub mod evaluate;
pub mod idf;
pub mod persist;
pub mod term;
pub mod vector;

use indexmap::{IndexMap, IndexSet};

use crate::vectorizer::{idf::IdfTable, vector::TermVector};

/// Every term known to a matrix, in insertion order.
/// The order only matters for reproducible serialization.
pub type Vocabulary = IndexSet<String>;

/// A tokenized corpus: document id -> token sequence.
pub type TokenizedCorpus = IndexMap<String, Vec<String>>;

/// TF-IDF matrix: one sparse weight vector per document, the vocabulary,
/// and the IDF table the weights were derived from.
///
/// Built from scratch by [`TfIdfMatrix::build`] or read back with
/// [`TfIdfMatrix::load`]. Nothing mutates it afterwards, so a loaded matrix
/// can be shared across threads and queried concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct TfIdfMatrix {
    /// document id -> TF-IDF vector, in column order
    documents: IndexMap<String, TermVector<f64>>,
    vocabulary: Vocabulary,
    idf: IdfTable,
}

impl TfIdfMatrix {
    pub(crate) fn from_parts(
        documents: IndexMap<String, TermVector<f64>>,
        vocabulary: Vocabulary,
        idf: IdfTable,
    ) -> Self {
        Self { documents, vocabulary, idf }
    }

    /// Number of documents (N). Fixed for the lifetime of the matrix.
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn documents(&self) -> &IndexMap<String, TermVector<f64>> {
        &self.documents
    }

    #[inline]
    pub fn document(&self, id: &str) -> Option<&TermVector<f64>> {
        self.documents.get(id)
    }

    #[inline]
    pub fn contains_doc(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains(term)
    }

    #[inline]
    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    /// Same documents, same vocabulary, and every weight within `tolerance`.
    /// Document and vocabulary order are ignored.
    pub fn approx_eq(&self, other: &TfIdfMatrix, tolerance: f64) -> bool {
        self.doc_num() == other.doc_num()
            && self.vocabulary.len() == other.vocabulary.len()
            && self.vocabulary.iter().all(|t| other.vocabulary.contains(t))
            && self.documents.iter().all(|(id, vector)| {
                other
                    .documents
                    .get(id)
                    .is_some_and(|o| vector.approx_eq(o, tolerance))
            })
    }
}
