//! Deterministic, pure helpers shared by the generators, scrapers and passes.
//!
//! Core modules must be free of I/O side effects. They operate on strings and
//! in-memory tables and return deterministic outputs suitable for tests.

pub mod dates;
pub mod glossary;
pub mod json_extract;
pub mod morph_id;
pub mod slug;
pub mod text;
