use indexmap::IndexMap;

/// Term occurrence counts of a single document or query.
///
/// Keeps the count of every distinct term plus the total number of tokens
/// seen, which is the denominator of the relative term frequency.
/// Terms are kept in first-occurrence order.
///
/// # Examples
/// ```
/// use tfidf_search::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["economy", "economy", "sport"]);
///
/// assert_eq!(freq.term_count("economy"), 2);
/// assert!((freq.tf("sport") - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    term_count: IndexMap<String, u64>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every term of a token sequence.
    pub fn from_terms<T>(terms: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_terms(terms);
        freq
    }

    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.term_count.entry(term.to_string()).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Relative frequency of `term`: its count divided by the total count.
    /// Unknown terms and an empty frequency table give 0.
    #[inline]
    pub fn tf(&self, term: &str) -> f64 {
        if self.total_term_count == 0 {
            return 0.0;
        }
        self.term_count(term) as f64 / self.total_term_count as f64
    }

    /// Relative frequency of every term, in first-occurrence order.
    pub fn tf_iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let total = self.total_term_count as f64;
        self.term_count
            .iter()
            .map(move |(term, &count)| (term.as_str(), count as f64 / total))
    }

    /// Relative frequency of every term as an owned map.
    pub fn tf_map(&self) -> IndexMap<String, f64> {
        self.tf_iter()
            .map(|(term, tf)| (term.to_string(), tf))
            .collect()
    }

    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total_term_count(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms.
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// Distinct terms in first-occurrence order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.term_count.keys().map(String::as_str)
    }
}
