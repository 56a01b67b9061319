use criterion::{criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use std::hint::black_box;
use tfidf_search::{rank_documents, QueryVectorizer, TfIdfMatrix};

/// xorshift32, enough to spread terms over a Zipf-ish vocabulary
struct Rng(u32);
impl Rng {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

fn synthetic_corpus(docs: usize, doc_len: usize, vocab: u32) -> IndexMap<String, Vec<String>> {
    let mut rng = Rng(0x9e37_79b9);
    (0..docs)
        .map(|i| {
            let tokens = (0..doc_len)
                .map(|_| {
                    // square the draw so low term ids dominate
                    let r = (rng.next() % vocab) as u64;
                    format!("t{}", r * r / vocab as u64)
                })
                .collect();
            (format!("doc{i}"), tokens)
        })
        .collect()
}

fn build_and_rank_benchmark(c: &mut Criterion) {
    let corpus = synthetic_corpus(500, 300, 5_000);

    c.bench_function("build_matrix", |b| {
        b.iter(|| TfIdfMatrix::build(black_box(&corpus)));
    });

    let matrix = TfIdfMatrix::build(&corpus);
    let csv = matrix.to_csv_string().expect("serialize matrix");
    c.bench_function("load_matrix", |b| {
        b.iter(|| TfIdfMatrix::from_csv_str(black_box(&csv)).expect("parse matrix"));
    });

    let query_tokens = ["t120", "t3", "t2500", "t4999", "t77"];
    let query = QueryVectorizer::from_matrix(&matrix).vectorize(&query_tokens);
    c.bench_function("rank_documents", |b| {
        b.iter(|| rank_documents(black_box(&query), matrix.documents(), 10));
    });
}

criterion_group!(benches, build_and_rank_benchmark);
criterion_main!(benches);
