//! Property-based tests for the Paris chain merger.
//!
//! Checks that both aggregate graph engines produce identical dendrograms,
//! that every dendrogram is a well-formed binary tree over the input nodes,
//! and that reordering is canonical, across random graph topologies.

mod equivalence;
mod strategies;
mod structural;
mod types;
