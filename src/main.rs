use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tfidf_search::{
    build_and_persist, config,
    engine::corpus::preview,
    DirectoryCorpus, HitEntry, Hits, SearchEngine, SimpleTokenizer, Stopwords, TfIdfMatrix,
};

#[derive(Parser)]
#[command(name = "tfidf-search", about = "TF-IDF document search", version)]
struct Args {
    /// Matrix file written by `build` and read by `search` and `stats`
    #[arg(long, env = "TFIDF_MATRIX", default_value = config::DEFAULT_MATRIX_PATH, global = true)]
    matrix: PathBuf,

    /// Corpus root, scanned recursively
    #[arg(long, env = "TFIDF_CORPUS", default_value = config::DEFAULT_CORPUS_DIR, global = true)]
    corpus: PathBuf,

    /// Corpus file extension, without the dot
    #[arg(long, default_value = config::DEFAULT_CORPUS_EXTENSION, global = true)]
    extension: String,

    /// Stopword list, one word per line
    #[arg(long, env = "TFIDF_STOPWORDS", global = true)]
    stopwords: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the matrix from the corpus and save it
    Build,
    /// Rank corpus documents against a query
    Search {
        query: String,

        /// Number of results
        #[arg(short = 'k', long, default_value_t = config::DEFAULT_TOP_K)]
        top_k: usize,

        /// Print results as a JSON array
        #[arg(long)]
        json: bool,

        /// Build the matrix first when the file does not exist
        #[arg(long)]
        build_if_missing: bool,
    },
    /// Print matrix statistics
    Stats {
        /// Number of highest-idf terms to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[derive(Serialize)]
struct JsonHit<'a> {
    #[serde(flatten)]
    hit: &'a HitEntry,
    path: Option<&'a Path>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tfidf_search=info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let tokenizer = match &args.stopwords {
        Some(path) => SimpleTokenizer::with_stopwords(Stopwords::from_file(path)),
        None => SimpleTokenizer::new(),
    };
    let corpus = DirectoryCorpus::new(&args.corpus).with_extension(&args.extension);

    match &args.command {
        Command::Build => {
            let matrix = build_and_persist(&corpus, &tokenizer, &args.matrix)?;
            println!(
                "built {} documents, {} terms -> {}",
                matrix.doc_num(),
                matrix.vocabulary().len(),
                args.matrix.display()
            );
        }
        Command::Search { query, top_k, json, build_if_missing } => {
            let engine = if *build_if_missing {
                SearchEngine::open_or_build(&args.matrix, &corpus, tokenizer)?
            } else {
                SearchEngine::open(&args.matrix, tokenizer)?
            };
            let hits = engine.search(query, *top_k);
            let paths = if hits.is_empty() {
                IndexMap::new()
            } else {
                corpus.document_paths().unwrap_or_else(|err| {
                    tracing::warn!(%err, "could not list corpus documents");
                    IndexMap::new()
                })
            };
            if *json {
                let out: Vec<JsonHit<'_>> = hits
                    .iter()
                    .map(|hit| JsonHit {
                        hit,
                        path: paths.get(&hit.document_id).map(PathBuf::as_path),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if hits.is_empty() {
                println!("no results for {query:?}");
            } else {
                print_hits(&corpus, &paths, &hits);
            }
        }
        Command::Stats { top } => {
            let matrix = TfIdfMatrix::load(&args.matrix)?;
            println!("documents:  {}", matrix.doc_num());
            println!("vocabulary: {}", matrix.vocabulary().len());
            println!("top idf terms:");
            for (term, idf) in matrix.idf().top_terms(*top) {
                println!("  {term:<24} {idf:.4}");
            }
        }
    }
    Ok(())
}

fn print_hits(corpus: &DirectoryCorpus, paths: &IndexMap<String, PathBuf>, hits: &Hits) {
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>3}. {} (score: {:.4})", rank + 1, hit.document_id, hit.score);
        match paths.get(&hit.document_id) {
            Some(path) => {
                println!("     {}", path.display());
                print_preview(path);
            }
            None => println!("     (not found under {})", corpus.root().display()),
        }
    }
}

fn print_preview(path: &Path) {
    match preview(path, config::PREVIEW_CHARS) {
        Ok(text) => {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                println!("     | {line}");
            }
        }
        Err(err) => tracing::warn!(path = %path.display(), %err, "could not read document"),
    }
}
