//! Text-facing side of the crate: turning raw documents and queries into
//! terms, reading a corpus from disk, and answering searches over a
//! loaded matrix.

pub mod corpus;
pub mod search;
pub mod tokenizer;
