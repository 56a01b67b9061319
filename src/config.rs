//! Default locations and tuning values.
//!
//! These are compile-time constants; runtime overrides come from CLI
//! arguments and environment variables in `main.rs`.

/// Where the TF-IDF matrix is written by `build` and read by `search`.
pub const DEFAULT_MATRIX_PATH: &str = "output/matrix.csv";

/// Root directory scanned (recursively) for corpus documents.
pub const DEFAULT_CORPUS_DIR: &str = "corpus";

/// File extension of corpus documents, without the dot.
pub const DEFAULT_CORPUS_EXTENSION: &str = "txt";

/// Number of hits returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum number of characters shown when previewing a matched document.
pub const PREVIEW_CHARS: usize = 500;

/// Label of the first header cell in the matrix file.
pub const MATRIX_ROW_LABEL: &str = "Term";

/// Cell separator of the matrix file.
pub const MATRIX_DELIMITER: char = ',';

/// Replacement for separators found inside document ids and terms.
pub const MATRIX_DELIMITER_REPLACEMENT: char = '_';
