//! # jsonsmith CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! the subcommand handlers. Documents go to stdout; logs go to stderr.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsonsmith_cli::generate::{run_generate, GenerateArgs};
use jsonsmith_cli::validate::{run_validate, ValidateArgs};

/// jsonsmith: randomized documents from JSON Schemas, and schema-aware
/// validation of existing documents.
#[derive(Parser, Debug)]
#[command(name = "jsonsmith", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate randomized documents that conform to a schema.
    Generate(GenerateArgs),

    /// Validate a document against a schema file.
    Validate(ValidateArgs),
}

/// Filter for the given verbosity; with no `-v`, `RUST_LOG` applies and
/// defaults to `warn`.
fn env_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_writer(io::stderr)
        .with_target(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!("jsonsmith CLI starting");

    let mut stdout = io::stdout().lock();
    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args, &mut stdout),
        Commands::Validate(args) => run_validate(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["jsonsmith", "generate", "--schema", "s.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.log_json);
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.json"));
            assert_eq!(args.count, 1);
            assert!(args.seed.is_none());
            assert!(args.config.is_none());
            assert!(!args.pretty);
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_generate_all_flags() {
        let cli = Cli::try_parse_from([
            "jsonsmith", "-vv", "generate", "--schema", "s.yaml", "--config", "g.yaml",
            "--count", "5", "--seed", "42", "--pretty", "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        if let Commands::Generate(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("g.yaml")));
            assert_eq!(args.count, 5);
            assert_eq!(args.seed, Some(42));
            assert!(args.pretty);
        } else {
            panic!("expected generate");
        }
    }

    #[test]
    fn cli_parse_validate() {
        let cli =
            Cli::try_parse_from(["jsonsmith", "validate", "--schema", "s.json", "doc.json"]).unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.schema, PathBuf::from("s.json"));
            assert_eq!(args.document, PathBuf::from("doc.json"));
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_rejects_missing_schema() {
        assert!(Cli::try_parse_from(["jsonsmith", "generate"]).is_err());
        assert!(Cli::try_parse_from(["jsonsmith", "validate", "doc.json"]).is_err());
    }

    #[test]
    fn cli_parse_rejects_non_numeric_count() {
        assert!(
            Cli::try_parse_from(["jsonsmith", "generate", "--schema", "s", "--count", "x"]).is_err()
        );
    }
}
