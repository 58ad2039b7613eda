//! Book metadata source used to gather recommendation candidates.

mod openlibrary;
mod types;

pub use openlibrary::{subject_key, BookSource, OpenLibraryClient, OpenLibraryClientBuilder};
pub use types::Book;
