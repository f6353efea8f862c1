use std::{path::PathBuf, process::ExitCode};

use clap::{Parser as ClapParser, Subcommand};
use jsoneval::{
    cli::{self, CliError, RunOptions},
    output::OutputFormat,
};
use log::LevelFilter;

#[derive(ClapParser)]
#[command(name = "jsoneval")]
#[command(about = "jsoneval - Evaluate field, subscript and arithmetic queries against JSON-like documents")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a query against a document
    Run {
        /// Path of the document to read
        document: PathBuf,

        /// The query to evaluate, e.g. "max(a.b) - a.c[0]"
        query: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print the result as JSON (implies --json)
        #[arg(short, long)]
        pretty: bool,

        /// Print the parsed expression tree to stderr
        #[arg(long)]
        tree: bool,
    },

    /// Only validate query syntax, don't read a document
    Check {
        /// The query to validate
        query: String,

        /// Print the parsed expression tree
        #[arg(long)]
        tree: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; --help and --version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            document,
            query,
            json,
            pretty,
            tree,
        } => run(document, query, json, pretty, tree).await,
        Commands::Check { query, tree } => match cli::check_syntax(&query) {
            Ok(expression) => {
                if tree {
                    print!("{}", expression);
                }
                println!("Syntax is valid");
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    document: PathBuf,
    query: String,
    json: bool,
    pretty: bool,
    tree: bool,
) -> Result<(), CliError> {
    let format = match (json, pretty) {
        (_, true) => OutputFormat::PrettyJson,
        (true, false) => OutputFormat::Json,
        (false, false) => OutputFormat::Text,
    };

    let options = RunOptions {
        document,
        query,
        format,
        show_tree: tree,
    };

    let outcome = cli::execute(options).await?;
    println!("{}", outcome.output);
    Ok(())
}
