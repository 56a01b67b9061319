pub mod query;
pub mod scoring;
