//! Turning raw argument vectors into a queryable store.
//!
//! [`tokenize`] produces [`ParsedArguments`]; [`ArgumentStore`] wraps them
//! with case-aware lookups and lenient typed access.

mod store;
mod tokenizer;

pub use store::ArgumentStore;
pub use tokenizer::{tokenize, ParsedArguments};
