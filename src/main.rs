//! descent-json CLI.
//!
//! Thin command-line wrapper around the library: reads a document from a
//! file or stdin and reports the parse outcome.
//!
//! Exit codes: 0 on success, 1 when the document (or a corpus vector) fails,
//! 2 when the input cannot be read.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use descent_json::conformance::{CorpusRunner, TestResult};
use descent_json::{parse_with_limits, JsonError, JsonValue, Limits};

#[derive(Parser)]
#[command(name = "descent-json")]
#[command(about = "Parse and check JSON documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print its top-level type
    Check {
        /// Input file; stdin when omitted or `-`
        path: Option<PathBuf>,
        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Parse a document and print value counts and nesting depth
    Stats {
        /// Input file; stdin when omitted or `-`
        path: Option<PathBuf>,
        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Run a conformance corpus file
    Corpus {
        /// Corpus JSON file
        path: PathBuf,
        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(Args)]
struct LimitArgs {
    /// Maximum nesting depth of arrays and objects
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum input size in bytes
    #[arg(long)]
    max_input_size: Option<usize>,

    /// Disable all limits (deeply nested input may overflow the stack)
    #[arg(long, conflicts_with_all = ["max_depth", "max_input_size"])]
    unbounded: bool,
}

impl LimitArgs {
    fn to_limits(&self) -> Limits {
        if self.unbounded {
            return Limits::unbounded();
        }
        let mut limits = Limits::default();
        if let Some(depth) = self.max_depth {
            limits = limits.with_max_nesting_depth(depth);
        }
        if let Some(size) = self.max_input_size {
            limits = limits.with_max_input_size(size);
        }
        limits
    }
}

/// Value counts gathered by `stats`.
#[derive(Debug, Default)]
struct Stats {
    objects: usize,
    arrays: usize,
    strings: usize,
    numbers: usize,
    booleans: usize,
    nulls: usize,
    max_depth: usize,
}

impl Stats {
    /// Walk the tree with an explicit stack so unbounded input stays safe.
    fn collect(root: &JsonValue) -> Self {
        let mut stats = Stats {
            max_depth: root.depth(),
            ..Stats::default()
        };
        let mut stack = vec![root];

        while let Some(value) = stack.pop() {
            match value {
                JsonValue::Object(map) => {
                    stats.objects += 1;
                    stack.extend(map.values());
                }
                JsonValue::Array(arr) => {
                    stats.arrays += 1;
                    stack.extend(arr);
                }
                JsonValue::String(_) => stats.strings += 1,
                JsonValue::Number(_) => stats.numbers += 1,
                JsonValue::Bool(_) => stats.booleans += 1,
                JsonValue::Null => stats.nulls += 1,
            }
        }

        stats
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn report_error(err: &JsonError) {
    eprintln!("error[E{}] {}: {}", err.code(), err.kind(), err);
}

/// Read and parse a document, mapping failures to exit codes.
fn load_document(path: Option<&Path>, limits: Limits) -> Result<JsonValue, ExitCode> {
    let input = read_input(path).map_err(|e| {
        eprintln!("error: failed to read input: {}", e);
        ExitCode::from(2)
    })?;

    parse_with_limits(&input, limits).map_err(|e| {
        report_error(&e);
        ExitCode::FAILURE
    })
}

fn run_check(path: Option<&Path>, limits: Limits) -> ExitCode {
    match load_document(path, limits) {
        Ok(value) => {
            println!("ok {}", value.type_name());
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_stats(path: Option<&Path>, limits: Limits) -> ExitCode {
    let value = match load_document(path, limits) {
        Ok(value) => value,
        Err(code) => return code,
    };

    let stats = Stats::collect(&value);
    println!("objects: {}", stats.objects);
    println!("arrays: {}", stats.arrays);
    println!("strings: {}", stats.strings);
    println!("numbers: {}", stats.numbers);
    println!("booleans: {}", stats.booleans);
    println!("nulls: {}", stats.nulls);
    println!("max_depth: {}", stats.max_depth);
    ExitCode::SUCCESS
}

fn run_corpus(path: &Path, limits: Limits) -> ExitCode {
    let runner = match CorpusRunner::load(path) {
        Ok(runner) => runner.with_limits(limits),
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let results = runner.run_all();

    for (id, result) in results.failures() {
        if let TestResult::Fail { expected, actual } = result {
            println!("FAIL {} - expected: {}, actual: {}", id, expected, actual);
        }
    }
    for (id, result) in results.error_details() {
        if let TestResult::Error { message } = result {
            println!("ERROR {} - {}", id, message);
        }
    }
    println!("{}", results.summary());

    if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Check { path, limits } => run_check(path.as_deref(), limits.to_limits()),
        Commands::Stats { path, limits } => run_stats(path.as_deref(), limits.to_limits()),
        Commands::Corpus { path, limits } => run_corpus(path, limits.to_limits()),
    }
}
