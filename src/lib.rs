//! This crate builds a TF-IDF matrix over a document corpus, persists it as a
//! comma-separated file, and ranks documents against free-text queries by
//! cosine similarity.

pub mod config;
pub mod engine;
pub mod error;
pub mod vectorizer;

/// TF-IDF Matrix
/// The central structure of this crate: one sparse TF-IDF vector per
/// document, the corpus vocabulary, and the IDF table the weights came from.
///
/// - `TfIdfMatrix::build` computes it from a tokenized corpus
/// - `TfIdfMatrix::save` writes it atomically to a CSV file
/// - `TfIdfMatrix::load` reads it back and recomputes the IDF table from the
///   stored weights
///
/// # Weights
/// tf(t, d) = count(t, d) / |d|
/// idf(t) = ln(N / (1 + df(t)))
/// The IDF can be zero or negative for common terms. Zero weights are never
/// stored, negative weights are.
///
/// # Thread Safety
/// Immutable once built or loaded, so it can be shared across threads.
pub use vectorizer::TfIdfMatrix;

/// Vocabulary of a matrix, in first-seen order.
pub use vectorizer::Vocabulary;

/// Tokenized corpus: document id -> token sequence.
pub use vectorizer::TokenizedCorpus;

/// Term Frequency structure
/// Counts term occurrences within one document or query and derives
/// relative term frequencies from them.
pub use vectorizer::term::TermFrequency;

/// Sparse term -> weight vector
/// Entries with weight exactly zero are never stored.
pub use vectorizer::vector::TermVector;

/// IDF table
/// term -> ln(N / (1 + df)), together with the document count N it was
/// computed for.
pub use vectorizer::idf::IdfTable;

/// Parse outcome of one matrix cell.
pub use vectorizer::persist::Cell;

/// Cosine similarity of two sparse vectors.
pub use vectorizer::evaluate::scoring::cosine;

/// Rank documents against a query vector, best first, ties by id.
pub use vectorizer::evaluate::scoring::rank_documents;

/// Search results
/// `Hits` is the ordered list, `HitEntry` one document and its score.
/// `{:#?}` pretty-prints one hit per line, `{}` prints a numbered ranking.
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Query vectorizer
/// Projects a tokenized query onto a matrix's vocabulary and IDF table.
pub use vectorizer::evaluate::query::QueryVectorizer;

/// Tokenizers
/// `Tokenizer` is implemented by `SimpleTokenizer` and by any
/// `Fn(&str) -> Vec<String>`.
pub use engine::tokenizer::{SimpleTokenizer, Stopwords, Tokenizer};

/// Corpus sources
/// `DirectoryCorpus` reads text files recursively, identified by file name.
pub use engine::corpus::{CorpusSource, DirectoryCorpus};

/// Search engine
/// Answers free-text queries over a loaded matrix.
pub use engine::search::{build_and_persist, SearchEngine};

pub use error::{Error, Result};
