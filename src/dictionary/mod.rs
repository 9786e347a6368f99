//! Lexical entries produced by dictionary lookups
//!
//! The lookup itself happens elsewhere; this module only defines the entry
//! shape and binds it to flashcards through its simplified headword.

mod models;

pub use models::*;
