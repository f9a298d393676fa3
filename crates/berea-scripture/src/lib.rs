//! Syntactic scripture-citation extraction over finished response text.

pub mod extractor;

pub use extractor::extract_citations;
