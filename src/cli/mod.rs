//! Command-line orchestration for jsoneval
//!
//! Provides programmatic access to the `run` and `check` commands so they can
//! be driven from tests or embedded in other tools.

mod run;

pub use run::{check_syntax, execute, load, RunOptions, RunOutcome};

use thiserror::Error;

use crate::{DocumentFormatError, ExpressionEvaluationError, ExpressionSyntaxError};

/// Errors that can occur during CLI operations
///
/// The `Display` form is the one-line diagnostic printed on standard error;
/// it starts with the kind of failure.
#[derive(Debug, Error)]
pub enum CliError {
    /// Document could not be read or parsed
    #[error("DocumentFormatError: {0}")]
    Document(#[from] DocumentFormatError),

    /// Query is malformed
    #[error("ExpressionSyntaxError: {0}")]
    Syntax(#[from] ExpressionSyntaxError),

    /// Query does not fit the document
    #[error("ExpressionEvaluationError: {0}")]
    Eval(#[from] ExpressionEvaluationError),

    /// A parse task panicked or was cancelled
    #[error("internal error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Result could not be serialized
    #[error("could not format result: {0}")]
    Output(#[from] serde_json::Error),
}
