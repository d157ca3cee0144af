//! Error types for the analysis pipeline

use thiserror::Error;

/// Failures the core pipeline can report to the caller.
///
/// All other errors (I/O, parsing) propagate as plain `anyhow` errors from
/// the loader and writer collaborators.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A configuration value is out of its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Community detection hit its iteration bound without converging
    #[error("community detection did not converge within {0} iterations")]
    ConvergenceFailure(usize),
}
