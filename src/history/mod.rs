//! Search history of dictionary lookups

mod models;
mod storage;

pub use models::*;
pub use storage::*;
