use std::{collections::HashSet, fs, path::Path};

use tracing::{debug, warn};

/// Turns raw text into an ordered sequence of normalized terms.
///
/// Anything implementing this can feed the matrix builder and the query
/// vectorizer; both sides must use the same tokenizer for terms to match.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Case and letter-variant folding applied before splitting.
///
/// Lowercases, folds Arabic alef variants to bare alef, ta marbuta to ha,
/// alef maqsura to ya, and strips Arabic diacritics and tatweel.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // fathatan .. sukun, tatweel
            '\u{064B}'..='\u{0652}' | '\u{0640}' => {}
            '\u{0622}' | '\u{0623}' | '\u{0625}' => out.push('\u{0627}'),
            '\u{0629}' => out.push('\u{0647}'),
            '\u{0649}' => out.push('\u{064A}'),
            c => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Words removed from every token stream.
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize(w.as_ref().trim()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// One word per line. A file that cannot be read gives an empty list
    /// and a warning, tokenizing still works without stopwords.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let stopwords = Self::from_words(text.lines());
                debug!(path = %path.display(), count = stopwords.len(), "loaded stopwords");
                stopwords
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read stopwords, continuing without");
                Self::new()
            }
        }
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Normalize, split on anything that is not alphanumeric, drop stopwords.
/// No stemming.
#[derive(Debug, Clone, Default)]
pub struct SimpleTokenizer {
    stopwords: Stopwords,
}

impl SimpleTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stopwords(stopwords: Stopwords) -> Self {
        Self { stopwords }
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(text)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty() && !self.stopwords.contains(t))
            .map(String::from)
            .collect()
    }
}
