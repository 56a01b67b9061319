use indexmap::IndexMap;

/// idf = ln(N / (1 + df))
///
/// Negative once a term appears in more than half of the documents
/// (N / (1 + df) < 1). That is accepted, not clamped.
#[inline]
pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
    (doc_num as f64 / (1.0 + doc_freq as f64)).ln()
}

/// Inverse document frequency of every vocabulary term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    /// term -> idf, in vocabulary order
    idf: IndexMap<String, f64>,
    /// document count the table was computed for
    doc_num: u64,
}

impl IdfTable {
    /// Build the table from `(term, document frequency)` pairs.
    pub fn from_doc_freqs<I, S>(doc_num: u64, doc_freqs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let idf = doc_freqs
            .into_iter()
            .map(|(term, df)| (term.into(), idf_calc(doc_num, df)))
            .collect();
        Self { idf, doc_num }
    }

    #[inline]
    pub fn get(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.idf.iter().map(|(term, &idf)| (term.as_str(), idf))
    }

    /// The `n` highest-idf terms, ties broken by term.
    pub fn top_terms(&self, n: usize) -> Vec<(&str, f64)> {
        let mut terms: Vec<(&str, f64)> = self.iter().collect();
        terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(n);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_in_every_document_has_negative_idf() {
        for n in 1..10u64 {
            let idf = idf_calc(n, n);
            assert!(idf < 0.0);
            assert!((idf - (n as f64 / (n as f64 + 1.0)).ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn term_in_one_document_has_ln_half_n() {
        for n in 2..10u64 {
            assert!((idf_calc(n, 1) - (n as f64 / 2.0).ln()).abs() < 1e-12);
        }
        assert_eq!(idf_calc(2, 1), 0.0);
    }

    #[test]
    fn top_terms_orders_by_idf_then_term() {
        let table = IdfTable::from_doc_freqs(4, [("b", 1), ("a", 1), ("c", 3)]);
        let top = table.top_terms(2);
        assert_eq!(top.iter().map(|(t, _)| *t).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.doc_num(), 4);
    }
}
