//! Run a query against a document file

use std::{path::PathBuf, time::Instant};

use log::{debug, info};
use tokio::task;

use super::CliError;
use crate::{
    Expression, Field, evaluate, output::OutputFormat, parse_expression, parse_file,
};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path of the document to read
    pub document: PathBuf,
    /// The query to evaluate
    pub query: String,
    /// How the result is formatted
    pub format: OutputFormat,
    /// Print the parsed expression tree to stderr before evaluating
    pub show_tree: bool,
}

/// Result of a successful run
#[derive(Debug)]
pub struct RunOutcome {
    /// The parsed query
    pub expression: Expression,
    /// The formatted result, ready for stdout
    pub output: String,
}

/// Parses the document and the query concurrently.
///
/// Both parses run as blocking tasks and share nothing; this is the only
/// point where they meet. A broken query is reported before a broken
/// document.
pub async fn load(document: PathBuf, query: String) -> Result<(Vec<Field>, Expression), CliError> {
    let started = Instant::now();

    let document_task = task::spawn_blocking(move || parse_file(&document));
    let query_task = task::spawn_blocking(move || parse_expression(&query));

    let (fields, expression) = tokio::join!(document_task, query_task);
    let expression = expression??;
    let fields = fields??;

    info!(
        "loaded {} top-level fields and a {} query in {:?}",
        fields.len(),
        expression.opcode,
        started.elapsed()
    );
    Ok((fields, expression))
}

/// Validates a query without touching any document.
pub fn check_syntax(query: &str) -> Result<Expression, CliError> {
    Ok(parse_expression(query)?)
}

/// Execute a run: load both inputs, evaluate, format the result
pub async fn execute(options: RunOptions) -> Result<RunOutcome, CliError> {
    let RunOptions {
        document,
        query,
        format,
        show_tree,
    } = options;

    let (fields, expression) = load(document, query).await?;
    if show_tree {
        eprint!("{}", expression);
    }

    let value = evaluate(&expression, &fields)?;
    debug!("query produced {}", value.type_name());

    let output = format.format(&value)?;
    Ok(RunOutcome { expression, output })
}
