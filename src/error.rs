//! Error taxonomy.
//!
//! Configuration problems are fatal before any model is built; solve-time
//! infeasibility is only discovered after a full model build. There is no
//! automatic retry or constraint relaxation; a caller wanting relaxation
//! rebuilds with adjusted parameters.

use crate::solver::SolveStatus;
use thiserror::Error;

/// Configuration resolution failures.
///
/// The orchestrator only ever branches on this type; the individual
/// variants exist so tests and callers can tell a bad per-type count
/// apart from bad difficulty proportions.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured per-type question count is negative or non-integral.
    #[error("invalid question count for type `{qtype}`: {value}")]
    InvalidQuestionTypeNumber { qtype: String, value: f64 },

    /// Difficulty-bucket proportions are negative or sum to zero.
    #[error("invalid difficulty proportions: {0}")]
    InvalidConstraint(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document could not be parsed.
    #[error("malformed configuration document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Question bank loading failures.
#[derive(Debug, Error)]
pub enum BankError {
    /// A dataset file could not be read or written.
    #[error("failed to access dataset `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A dataset file is not a valid question array.
    #[error("malformed dataset `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two records in the merged bank share an id.
    ///
    /// Ids must be unique across the whole bank fed to one model build.
    #[error("duplicate question id `{0}` in the loaded bank")]
    DuplicateId(String),
}

/// Top-level failure of one paper-generation run.
#[derive(Debug, Error)]
pub enum PaperError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bank(#[from] BankError),

    /// The model is well-formed but the solver found no assignment.
    ///
    /// Raised by the orchestrator after inspecting solve status, never by
    /// the model builder: constraint conflicts surface only at solve time.
    #[error("no feasible selection (solver status: {status:?})")]
    NoFeasibleSolution { status: SolveStatus },
}
