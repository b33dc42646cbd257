mod commands;
mod context;
mod help;
mod output;
mod theme;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use log::LevelFilter;

use commands::{
    generate::{GenerateArgs, handle_generate},
    inspect::{InspectArgs, handle_inspect},
};
use help::HelpPainter;
use output::{Console, ConsoleOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "trackgen", version)]
#[command(
    about = "Generate deep-copy and change-diff routines for plain Rust structs",
    long_about = r#"Scans a package of Rust sources, classifies every struct field and writes:

• clone.rs   DeepClone impls that share no storage with the source
• diff.rs    Diff impls producing minimal change sets with merge directives
             for document columns
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Only print errors (JSON output is still printed)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print scan details and debug logs
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write clone.rs and diff.rs for one or more packages
    Generate(GenerateArgs),

    /// Show how every struct field is classified
    Inspect(InspectArgs),
}

impl Cli {
    fn parse_decorated() -> Self {
        let command = HelpPainter::detect().decorate(Cli::command());
        let matches = command.try_get_matches().unwrap_or_else(|err| err.exit());
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    /// `RUST_LOG` still wins when set.
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, true) => LevelFilter::Debug,
            (false, false) => LevelFilter::Warn,
        }
    }

    fn console(&self) -> Console {
        Console::new(ConsoleOptions {
            format: self.format.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
            no_color: self.no_color,
        })
    }
}

fn main() {
    let cli = Cli::parse_decorated();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        log::debug!("{err:?}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let console = cli.console();
    match cli.command {
        Commands::Generate(args) => handle_generate(args, &console),
        Commands::Inspect(args) => handle_inspect(args, &console),
    }
}
