//! Edge-list provider that reads weighted graphs from plain text.
//!
//! Each non-blank line holds `source target [weight]`, separated by
//! whitespace or commas. Node ids are zero-based, weights default to `1`, and
//! everything after a `#` is a comment.

mod errors;
mod parse;
mod source;

pub use errors::EdgeListError;
pub use source::EdgeListSource;

#[cfg(test)]
mod tests;
