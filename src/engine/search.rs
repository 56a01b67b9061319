use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    engine::{
        corpus::CorpusSource,
        tokenizer::{SimpleTokenizer, Tokenizer},
    },
    error::Result,
    vectorizer::{
        evaluate::{
            query::QueryVectorizer,
            scoring::{rank_documents, Hits},
        },
        TfIdfMatrix, TokenizedCorpus,
    },
};

/// A loaded matrix plus the tokenizer that produced it.
///
/// Read-only after construction; `search` takes `&self` and can be called
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct SearchEngine<T = SimpleTokenizer> {
    matrix: TfIdfMatrix,
    tokenizer: T,
}

impl<T> SearchEngine<T>
where
    T: Tokenizer,
{
    pub fn new(matrix: TfIdfMatrix, tokenizer: T) -> Self {
        Self { matrix, tokenizer }
    }

    /// Load the matrix file at `path`.
    pub fn open(path: impl AsRef<Path>, tokenizer: T) -> Result<Self> {
        Ok(Self::new(TfIdfMatrix::load(path)?, tokenizer))
    }

    /// Like [`SearchEngine::open`], but first builds and saves the matrix
    /// from `corpus` when `path` does not exist. The engine always reads the
    /// saved file, so a fresh build scores exactly like every later load.
    pub fn open_or_build<C>(path: impl AsRef<Path>, corpus: &C, tokenizer: T) -> Result<Self>
    where
        C: CorpusSource + ?Sized,
        T: Sync,
    {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "matrix not found, building it");
            build_and_persist(corpus, &tokenizer, path)?;
        }
        Self::open(path, tokenizer)
    }

    #[inline]
    pub fn matrix(&self) -> &TfIdfMatrix {
        &self.matrix
    }

    #[inline]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Best `top_k` documents for a free-text query.
    ///
    /// Only documents with a strictly positive similarity are returned, so
    /// the result may be shorter than `top_k`. A query that shares no
    /// weighted term with the vocabulary gives no hits.
    pub fn search(&self, query: &str, top_k: usize) -> Hits {
        let tokens = self.tokenizer.tokenize(query);
        let query_vector = QueryVectorizer::from_matrix(&self.matrix).vectorize(&tokens);
        if query_vector.is_empty() {
            debug!(query, tokens = tokens.len(), "query has no weighted terms");
            return Hits { list: Vec::new() };
        }
        let mut hits = rank_documents(&query_vector, self.matrix.documents(), top_k);
        hits.retain_positive();
        debug!(query, hits = hits.len(), "search done");
        hits
    }
}

/// Tokenize every document of `corpus`, build the matrix, and save it to
/// `output`. The built matrix is returned as well.
pub fn build_and_persist<C, T>(
    corpus: &C,
    tokenizer: &T,
    output: impl AsRef<Path>,
) -> Result<TfIdfMatrix>
where
    C: CorpusSource + ?Sized,
    T: Tokenizer + Sync,
{
    let texts = corpus.load_corpus()?;
    let tokenized: TokenizedCorpus = texts
        .par_iter()
        .map(|(id, text)| (id.clone(), tokenizer.tokenize(text)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    let matrix = TfIdfMatrix::build(&tokenized);
    matrix.save(output.as_ref())?;
    Ok(matrix)
}
