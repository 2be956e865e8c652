use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use lox_interpreter as lox;

use lox::ast_printer::AstPrinter;
use lox::diagnostics::Diagnostics;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::scanner::{decode_source, tokenize, Scanner};
use lox::session::Session;

/// Exit status for a malformed command line.
const EXIT_USAGE: i32 = 64;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Where `--log` writes to
    #[arg(long, global = true, default_value = "app.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print tokens as JSON, one per line
        #[arg(long)]
        json: bool,
    },

    /// Parses a file as a program and prints its AST
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

/// Maps the file and copies it out as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the mapping is read once and copied before this function returns;
    // the file is not expected to be truncated concurrently.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let source = decode_source(&map)
        .context(format!("Failed to read {:?}", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'lox_interpreter::' from module path
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("lox_interpreter::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

/// Print every collected diagnostic to stderr.
fn report(diagnostics: &Diagnostics) {
    for error in diagnostics.errors() {
        debug!("Reporting: {}", error);
        eprintln!("{}", error);
    }
}

fn exit_on_error(diagnostics: &Diagnostics) {
    report(diagnostics);

    if let Some(code) = diagnostics.exit_code() {
        debug!("Exiting with code {}", code);
        std::process::exit(code);
    }
}

fn tokenize_file(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    for result in Scanner::new(&source) {
        match result {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => diagnostics.report(e),
        }
    }

    exit_on_error(&diagnostics);
    Ok(())
}

fn parse_file(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = tokenize(&source, &mut diagnostics);
    let statements = Parser::new(tokens, &mut diagnostics).parse();

    exit_on_error(&diagnostics);

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    Ok(())
}

fn evaluate_file(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = tokenize(&source, &mut diagnostics);
    let expr = Parser::new(tokens, &mut diagnostics).parse_expression();

    exit_on_error(&diagnostics);

    if let Some(expr) = expr {
        let mut interpreter = Interpreter::new();

        match interpreter.evaluate(&expr) {
            Ok(value) => println!("{}", value),
            Err(e) => diagnostics.runtime_error(e),
        }
    }

    exit_on_error(&diagnostics);
    Ok(())
}

fn run_file(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut session = Session::new();

    let diagnostics = session.run(&source);
    io::stdout().flush()?;

    exit_on_error(&diagnostics);
    info!("Program executed successfully");
    Ok(())
}

fn run_prompt() -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        // Errors are shown and forgotten; the session keeps its globals.
        let diagnostics = session.run(&line);
        report(&diagnostics);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            e.print()?;
            std::process::exit(EXIT_USAGE);
        }
        // --help / --version
        Err(e) => e.exit(),
    };

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename, json } => tokenize_file(filename, *json),
        Commands::Parse { filename } => parse_file(filename),
        Commands::Evaluate { filename } => evaluate_file(filename),
        Commands::Run { filename } => run_file(filename),
        Commands::Repl => run_prompt(),
    }
}
