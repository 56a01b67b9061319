//! Comma-separated matrix file.
//!
//! ```text
//! Term,<doc_1>,<doc_2>,...,<doc_N>
//! <term>,<weight_1>,<weight_2>,...,<weight_N>
//! ```
//!
//! The reader is lenient: rows with fewer than two fields are skipped and
//! cells that do not parse count as weight 0. Only a missing header or a
//! duplicated document column fails the load.

use std::{
    borrow::Cow,
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    config::{MATRIX_DELIMITER, MATRIX_DELIMITER_REPLACEMENT, MATRIX_ROW_LABEL},
    error::{Error, Result},
    vectorizer::{idf::IdfTable, vector::TermVector, TfIdfMatrix, Vocabulary},
};

/// Parse result of one weight cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Valid(f64),
    /// Unparsable or non-finite. Reads as weight 0.
    Skipped,
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(w) if w.is_finite() => Cell::Valid(w),
            _ => Cell::Skipped,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ParseStats {
    rows: usize,
    skipped_rows: usize,
    skipped_cells: usize,
}

/// Trim, then replace separators. The loader trims every field, so the
/// writer must too for ids and terms to survive a round trip.
fn sanitize(field: &str) -> Cow<'_, str> {
    let field = field.trim();
    if field.contains([MATRIX_DELIMITER, '\n', '\r']) {
        Cow::Owned(
            field
                .chars()
                .map(|c| match c {
                    MATRIX_DELIMITER | '\n' | '\r' => MATRIX_DELIMITER_REPLACEMENT,
                    c => c,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(field)
    }
}

/// serialize
impl TfIdfMatrix {
    /// Write the matrix to `path`, replacing any existing file.
    ///
    /// Intermediate directories are created. The content goes to a sibling
    /// `.tmp` file first and is renamed over `path`, so the target either
    /// holds the complete new matrix or is left as it was.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let columns = self.column_ids()?;
        let rows = self.row_terms()?;

        let file_name = path.file_name().ok_or_else(|| {
            Error::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "matrix path has no file name"),
            )
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let written = File::create(&tmp_path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.write_rows(&mut writer, &columns, &rows)?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::io(tmp_path, e));
        }
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::io(path, e)
        })?;

        info!(
            path = %path.display(),
            documents = self.doc_num(),
            vocabulary = self.vocabulary().len(),
            "saved TF-IDF matrix"
        );
        Ok(())
    }

    /// Serialize into an in-memory string, same format as [`TfIdfMatrix::save`].
    pub fn to_csv_string(&self) -> Result<String> {
        let columns = self.column_ids()?;
        let rows = self.row_terms()?;
        let mut buf = Vec::new();
        self.write_rows(&mut buf, &columns, &rows)
            .map_err(|e| Error::io("<memory>", e))?;
        String::from_utf8(buf).map_err(|e| {
            Error::io("<memory>", io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    /// Header ids with separators replaced. Fails if two ids collide.
    fn column_ids(&self) -> Result<Vec<Cow<'_, str>>> {
        let mut seen = IndexSet::with_capacity(self.doc_num());
        self.documents()
            .keys()
            .map(|id| {
                let id = sanitize(id);
                if seen.insert(id.clone()) {
                    Ok(id)
                } else {
                    Err(Error::DuplicateDocument { id: id.into_owned() })
                }
            })
            .collect()
    }

    /// Row labels, in vocabulary order. Fails if two terms collide.
    fn row_terms(&self) -> Result<Vec<Cow<'_, str>>> {
        let mut seen = IndexSet::with_capacity(self.vocabulary().len());
        self.vocabulary()
            .iter()
            .map(|term| {
                let label = sanitize(term);
                if seen.insert(label.clone()) {
                    Ok(label)
                } else {
                    Err(Error::DuplicateTerm { term: label.into_owned() })
                }
            })
            .collect()
    }

    fn write_rows<W: Write>(
        &self,
        writer: &mut W,
        columns: &[Cow<'_, str>],
        rows: &[Cow<'_, str>],
    ) -> io::Result<()> {
        write!(writer, "{MATRIX_ROW_LABEL}")?;
        for id in columns {
            write!(writer, "{MATRIX_DELIMITER}{id}")?;
        }
        writeln!(writer)?;

        for (term, label) in self.vocabulary().iter().zip(rows) {
            write!(writer, "{label}")?;
            for vector in self.documents().values() {
                match vector.get(term) {
                    Some(w) => write!(writer, "{MATRIX_DELIMITER}{w}")?,
                    None => write!(writer, "{MATRIX_DELIMITER}0")?,
                }
            }
            writeln!(writer)?;
        }
        writer.flush()
    }
}

/// deserialize
impl TfIdfMatrix {
    /// Read a matrix file written by [`TfIdfMatrix::save`] and recompute the
    /// IDF table from its nonzero entries.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let matrix = Self::from_csv_reader(BufReader::new(file), path)?;
        info!(
            path = %path.display(),
            documents = matrix.doc_num(),
            vocabulary = matrix.vocabulary().len(),
            "loaded TF-IDF matrix"
        );
        Ok(matrix)
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes(), Path::new("<memory>"))
    }

    /// `origin` only labels errors.
    pub fn from_csv_reader<R: BufRead>(reader: R, origin: &Path) -> Result<Self> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|e| Error::io(origin, e))?,
            None => return Err(Error::MissingHeader { path: origin.to_path_buf() }),
        };
        let header = header.strip_prefix('\u{feff}').unwrap_or(&header);
        if header.trim().is_empty() {
            return Err(Error::MissingHeader { path: origin.to_path_buf() });
        }

        let mut header_cells = header.split(MATRIX_DELIMITER).map(str::trim);
        let label = header_cells.next().unwrap_or_default();
        if label != MATRIX_ROW_LABEL {
            debug!(label, "unexpected row label in matrix header");
        }
        let mut documents: IndexMap<String, TermVector<f64>> = IndexMap::new();
        for id in header_cells {
            if documents.insert(id.to_string(), TermVector::new()).is_some() {
                return Err(Error::DuplicateDocument { id: id.to_string() });
            }
        }

        let mut vocabulary = Vocabulary::new();
        let mut stats = ParseStats::default();
        for (idx, line) in lines.enumerate() {
            let line = line.map_err(|e| Error::io(origin, e))?;
            if line.trim().is_empty() {
                continue;
            }
            stats.rows += 1;
            let mut fields = line.split(MATRIX_DELIMITER);
            let term = fields.next().unwrap_or_default().trim();
            let cells: Vec<Cell> = fields.map(Cell::parse).collect();
            if term.is_empty() || cells.is_empty() {
                // +2: 1-based, after the header
                debug!(line = idx + 2, "skipping malformed matrix row");
                stats.skipped_rows += 1;
                continue;
            }
            vocabulary.insert(term.to_string());
            stats.skipped_cells += apply_row(&mut documents, term, &cells);
        }

        if stats.skipped_rows > 0 || stats.skipped_cells > 0 {
            debug!(
                rows = stats.rows,
                skipped_rows = stats.skipped_rows,
                skipped_cells = stats.skipped_cells,
                "matrix parsed with skipped entries"
            );
        }

        let idf = idf_from_documents(&documents, &vocabulary);
        Ok(TfIdfMatrix::from_parts(documents, vocabulary, idf))
    }
}

/// Store one row's cells into the document vectors, column by column.
/// Cells past the header width are ignored; missing cells read as 0.
/// Returns the number of skipped cells.
fn apply_row(documents: &mut IndexMap<String, TermVector<f64>>, term: &str, cells: &[Cell]) -> usize {
    documents
        .values_mut()
        .zip(cells)
        .fold(0, |skipped, (vector, cell)| match *cell {
            Cell::Valid(w) => {
                vector.insert(term, w);
                skipped
            }
            Cell::Skipped => skipped + 1,
        })
}

/// df(t) = number of documents whose stored weight for t is nonzero.
fn idf_from_documents(
    documents: &IndexMap<String, TermVector<f64>>,
    vocabulary: &Vocabulary,
) -> IdfTable {
    let doc_freqs: Vec<(String, u64)> = vocabulary
        .par_iter()
        .map(|term| {
            let df = documents.values().filter(|v| v.contains(term)).count() as u64;
            (term.clone(), df)
        })
        .collect();
    IdfTable::from_doc_freqs(documents.len() as u64, doc_freqs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scenario() -> TfIdfMatrix {
        let corpus: IndexMap<String, Vec<String>> = [
            ("docA", vec!["economy", "growth"]),
            ("docB", vec!["economy", "economy", "sport"]),
            ("docC", vec!["sport", "rust", "rust"]),
        ]
        .into_iter()
        .map(|(id, t)| (id.to_string(), t.into_iter().map(String::from).collect()))
        .collect();
        TfIdfMatrix::build(&corpus)
    }

    #[test]
    fn cell_parse_is_tagged() {
        assert_eq!(Cell::parse("0.25"), Cell::Valid(0.25));
        assert_eq!(Cell::parse(" -1.5E-3 "), Cell::Valid(-0.0015));
        assert_eq!(Cell::parse("0"), Cell::Valid(0.0));
        assert_eq!(Cell::parse("abc"), Cell::Skipped);
        assert_eq!(Cell::parse(""), Cell::Skipped);
        assert_eq!(Cell::parse("NaN"), Cell::Skipped);
        assert_eq!(Cell::parse("inf"), Cell::Skipped);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/matrix.csv");
        let m = scenario();
        m.save(&path).unwrap();

        let loaded = TfIdfMatrix::load(&path).unwrap();
        assert!(loaded.approx_eq(&m, 1e-12));
        assert_eq!(loaded.vocabulary(), m.vocabulary());
        assert!(!dir.path().join("nested/deeper/matrix.csv.tmp").exists());
    }

    #[test]
    fn save_is_deterministic_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.csv");
        fs::write(&path, "stale content").unwrap();

        scenario().save(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        scenario().save(&path).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("Term,docA,docB,docC\n"));
        assert_eq!(first, scenario().to_csv_string().unwrap());
    }

    #[test]
    fn every_row_has_one_cell_per_document() {
        let text = scenario().to_csv_string().unwrap();
        for line in text.lines() {
            assert_eq!(line.split(',').count(), 4, "bad row: {line}");
        }
        // economy and sport sit in 2 of 3 documents: idf = ln(3/3) = 0
        assert!(text.contains("\nsport,0,0,0\n"));
        assert!(text.contains("\neconomy,0,0,0\n"));
    }

    #[test]
    fn commas_in_ids_are_replaced() {
        let corpus: IndexMap<String, Vec<String>> =
            [("a,b.txt".to_string(), vec!["x".to_string()])].into_iter().collect();
        let text = TfIdfMatrix::build(&corpus).to_csv_string().unwrap();
        assert!(text.starts_with("Term,a_b.txt\n"));
    }

    #[test]
    fn colliding_ids_fail_to_serialize() {
        let corpus: IndexMap<String, Vec<String>> = [
            ("a,b".to_string(), vec!["x".to_string()]),
            ("a_b".to_string(), vec!["y".to_string()]),
        ]
        .into_iter()
        .collect();
        let err = TfIdfMatrix::build(&corpus).to_csv_string().unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument { id } if id == "a_b"));
    }

    #[test]
    fn colliding_terms_fail_to_serialize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.csv");
        let corpus: IndexMap<String, Vec<String>> = [
            ("d1".to_string(), vec!["a,b".to_string()]),
            ("d2".to_string(), vec!["a_b".to_string()]),
            ("d3".to_string(), vec!["c".to_string()]),
        ]
        .into_iter()
        .collect();
        let m = TfIdfMatrix::build(&corpus);
        let err = m.to_csv_string().unwrap_err();
        assert!(matches!(err, Error::DuplicateTerm { term } if term == "a_b"));
        assert!(matches!(m.save(&path), Err(Error::DuplicateTerm { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn padded_ids_and_terms_round_trip() {
        let corpus: IndexMap<String, Vec<String>> = [
            (" notes.txt".to_string(), vec!["rust ".to_string()]),
            ("other.txt".to_string(), vec!["search".to_string()]),
            ("third.txt".to_string(), vec!["index".to_string()]),
        ]
        .into_iter()
        .collect();
        let m = TfIdfMatrix::build(&corpus);
        let text = m.to_csv_string().unwrap();
        assert!(text.starts_with("Term,notes.txt,other.txt,third.txt\n"));
        assert!(text.contains("\nrust,"));

        let loaded = TfIdfMatrix::from_csv_str(&text).unwrap();
        assert!(loaded.contains_doc("notes.txt"));
        assert!(loaded.document("notes.txt").unwrap().get("rust").is_some());
    }

    #[test]
    fn header_only_matrix_keeps_every_column() {
        let m = TfIdfMatrix::from_csv_str("Term,d1,d2,d3\n").unwrap();
        assert_eq!(m.doc_num(), 3);
        assert!(m.vocabulary().is_empty());
        assert!(m.documents().values().all(TermVector::is_empty));
        assert_eq!(m.idf().doc_num(), 3);
    }

    #[test]
    fn lenient_rows_and_cells() {
        let text = "\u{feff}Term,d1,d2\r\n\
                    alpha,0.5,abc\r\n\
                    lonely\r\n\
                    \r\n\
                    beta,0,-0.25,99\r\n\
                    gamma,0.1\r\n\
                    ,0.3,0.3\r\n";
        let m = TfIdfMatrix::from_csv_str(text).unwrap();

        let vocab: Vec<&str> = m.vocabulary().iter().map(String::as_str).collect();
        assert_eq!(vocab, vec!["alpha", "beta", "gamma"]);

        let d1 = m.document("d1").unwrap();
        let d2 = m.document("d2").unwrap();
        assert_eq!(d1.get("alpha"), Some(0.5));
        assert_eq!(d2.get("alpha"), None);
        assert_eq!(d1.get("beta"), None);
        assert_eq!(d2.get("beta"), Some(-0.25));
        assert_eq!(d1.get("gamma"), Some(0.1));
        assert_eq!(d2.get("gamma"), None);
    }

    #[test]
    fn idf_is_recomputed_from_nonzero_entries() {
        let text = "Term,d1,d2,d3\nshared,0.1,0.2,0.3\nrare,0.4,0,0\nnowhere,0,0,0\n";
        let m = TfIdfMatrix::from_csv_str(text).unwrap();
        let idf = m.idf();
        assert!((idf.get("shared").unwrap() - (3.0f64 / 4.0).ln()).abs() < 1e-12);
        assert!((idf.get("rare").unwrap() - (3.0f64 / 2.0).ln()).abs() < 1e-12);
        assert!((idf.get("nowhere").unwrap() - 3.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn loaded_idf_matches_builder_for_nonzero_idf_terms() {
        let built = scenario();
        let loaded = TfIdfMatrix::from_csv_str(&built.to_csv_string().unwrap()).unwrap();
        for (term, idf) in built.idf().iter() {
            if idf != 0.0 {
                assert!((loaded.idf().get(term).unwrap() - idf).abs() < 1e-12, "{term}");
            }
        }
    }

    #[test]
    fn empty_file_is_missing_header() {
        assert!(matches!(
            TfIdfMatrix::from_csv_str(""),
            Err(Error::MissingHeader { .. })
        ));
        assert!(matches!(
            TfIdfMatrix::from_csv_str("\n"),
            Err(Error::MissingHeader { .. })
        ));
    }

    #[test]
    fn duplicate_header_column_is_rejected() {
        assert!(matches!(
            TfIdfMatrix::from_csv_str("Term,d1,d1\nx,1,2\n"),
            Err(Error::DuplicateDocument { id }) if id == "d1"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = TfIdfMatrix::load(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
