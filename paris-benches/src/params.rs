//! Benchmark parameter types.

use std::fmt;

use paris_core::Engine;

/// Parameters for one engine benchmark run.
#[derive(Clone, Debug)]
pub struct EngineBenchParams {
    /// Engine under test.
    pub engine: Engine,
    /// Number of nodes in the graph.
    pub node_count: usize,
}

impl fmt::Display for EngineBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={}", self.engine, self.node_count)
    }
}
