use std::{io, process::ExitCode};

use clap::Parser;
use minicc::driver::{self, Options, Stage};
use tracing_subscriber::EnvFilter;

/// Compiles a tiny subset of C, given as a single argument.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser)]
#[clap(version)]
struct Cli {
    /// The program text.
    source: String,
    /// Prints every token after lexing.
    #[clap(long)]
    debug_dump_tokens: bool,
    /// Stops after lexing.
    #[clap(long, conflicts_with = "debug_only_parse")]
    debug_only_tokenize: bool,
    /// Prints the syntax tree after parsing.
    #[clap(long)]
    debug_dump_ast: bool,
    /// Stops after parsing.
    #[clap(long)]
    debug_only_parse: bool,
    /// Prints the basic blocks after lowering.
    #[clap(long)]
    debug_dump_ir: bool,
    /// Stops after lowering.
    #[clap(long)]
    debug_only_dump_ir: bool,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Options {
        let stop = if cli.debug_only_tokenize {
            Some(Stage::Lex)
        } else if cli.debug_only_parse {
            Some(Stage::Parse)
        } else if cli.debug_only_dump_ir {
            Some(Stage::Lower)
        } else {
            None
        };
        Options {
            dump_tokens: cli.debug_dump_tokens,
            dump_ast: cli.debug_dump_ast,
            dump_ir: cli.debug_dump_ir,
            stop,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options::from(&cli);
    match driver::compile(&cli.source, &options, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}
