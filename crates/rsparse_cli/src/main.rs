//! rsp: the rsparse command-line driver.
//!
//! Usage:
//!   rsp parse <file>... [--dump] [--json]
//!   rsp reparse <file> --start N --old-length N --insert TEXT
//!
//! Exit status is 0 for clean input, 2 when any file has parse errors and 1
//! when a file could not be read.

mod report;

use clap::{ArgAction, Parser as ClapParser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use rsparse_ast::dump::{dump_tree, dump_tree_pretty};
use rsparse_ast::{JSDocParsingMode, SourceFile};
use rsparse_core::{Error, TextChangeRange};
use rsparse_parser::{parse_source_file, update_source_file, ParseOptions};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Parser threads recurse once per nesting level, up to the nesting limit.
const PARSER_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(ClapParser, Debug)]
#[command(name = "rsp", about = "rsparse - an error-tolerant TypeScript and JavaScript parser", version)]
struct Cli {
    /// Log more; repeat for trace output. `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse files and report their diagnostics.
    Parse {
        /// Files to parse. The extension selects TS, TSX, JS, JSX or JSON.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Print each syntax tree.
        #[arg(long)]
        dump: bool,

        /// Print a JSON summary of every file instead of rendered diagnostics.
        #[arg(long)]
        json: bool,

        /// Leave documentation comments unparsed.
        #[arg(long = "no-jsdoc")]
        no_jsdoc: bool,
    },

    /// Parse a file, apply one edit and reparse it incrementally.
    Reparse {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Byte offset of the edit in the original text.
        #[arg(long)]
        start: u32,

        /// Bytes removed at `start`.
        #[arg(long = "old-length", default_value_t = 0)]
        old_length: u32,

        /// Text inserted at `start`.
        #[arg(long, default_value = "")]
        insert: String,

        /// Print the updated syntax tree.
        #[arg(long)]
        dump: bool,

        /// Parse the edited text from scratch as well and compare the trees.
        #[arg(long)]
        verify: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<i32> {
    let pool = rayon::ThreadPoolBuilder::new()
        .stack_size(PARSER_STACK_SIZE)
        .build()
        .into_diagnostic()
        .wrap_err("failed to start parser threads")?;

    match cli.command {
        Command::Parse {
            files,
            dump,
            json,
            no_jsdoc,
        } => {
            let mode = if no_jsdoc {
                JSDocParsingMode::ParseNone
            } else {
                JSDocParsingMode::ParseAll
            };
            pool.install(|| run_parse(&files, dump, json, mode))
        }
        Command::Reparse {
            file,
            start,
            old_length,
            insert,
            dump,
            verify,
        } => {
            let change = TextChangeRange::replacement(start, old_length, &insert);
            pool.install(|| run_reparse(&file, change, &insert, dump, verify))
        }
    }
}

/// Read a file as UTF-8, replacing invalid sequences.
fn read_source(path: &Path) -> rsparse_core::Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    if u32::try_from(bytes.len()).is_err() {
        return Err(Error::TextTooLarge(bytes.len()));
    }
    let text = match simdutf8::basic::from_utf8(&bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
    };
    Ok(text)
}

fn parse_path(path: &Path, jsdoc_parsing_mode: JSDocParsingMode) -> rsparse_core::Result<SourceFile> {
    let text = read_source(path)?;
    let name = path.display().to_string();
    let mut options = ParseOptions::for_file_name(&name);
    options.jsdoc_parsing_mode = jsdoc_parsing_mode;
    Ok(parse_source_file(&name, &text, options))
}

fn run_parse(files: &[PathBuf], dump: bool, json: bool, mode: JSDocParsingMode) -> Result<i32> {
    let started = Instant::now();
    let results: Vec<(&PathBuf, rsparse_core::Result<SourceFile>)> =
        files.par_iter().map(|path| (path, parse_path(path, mode))).collect();
    info!(files = files.len(), elapsed_ms = started.elapsed().as_millis() as u64, "parsed");

    let mut exit_code = 0;
    let mut summaries = Vec::new();
    for (path, result) in results {
        let file = match result {
            Ok(file) => file,
            Err(err) => {
                eprintln!("{:?}", miette::Report::new(report::io_failure(&err)));
                exit_code = 1;
                continue;
            }
        };
        debug!(file = %path.display(), diagnostics = file.parse_diagnostics.len(), "reporting");
        if file.parse_diagnostics.iter().any(|d| d.is_error()) && exit_code == 0 {
            exit_code = 2;
        }
        if json {
            summaries.push(report::FileSummary::new(&file));
            continue;
        }
        if dump {
            println!("{}", dump_tree_pretty(&file.arena, &file.interner, file.root));
        }
        report::print_diagnostics(&file);
    }

    if json {
        let out = serde_json::to_string_pretty(&summaries).into_diagnostic()?;
        println!("{out}");
    }
    Ok(exit_code)
}

fn run_reparse(path: &Path, change: TextChangeRange, insert: &str, dump: bool, verify: bool) -> Result<i32> {
    let text = read_source(path).into_diagnostic()?;
    let name = path.display().to_string();
    let new_text = change.apply(&text, insert).ok_or_else(|| Error::InvalidChangeRange {
        start: change.span.start,
        end: change.span.end(),
        text_len: text.len() as u32,
    });
    let new_text = new_text.into_diagnostic()?;

    let options = ParseOptions::for_file_name(&name);
    let prior = parse_source_file(&name, &text, options);
    let started = Instant::now();
    let updated = update_source_file(prior, &new_text, change)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to reparse {name}"))?;
    let elapsed = started.elapsed();

    match updated.incremental_stats {
        Some(stats) => println!(
            "reparsed {name} in {:.3}ms: {} nodes reused, {} elements reparsed ({:.1}% reuse)",
            elapsed.as_secs_f64() * 1000.0,
            stats.reused_nodes,
            stats.reparsed_elements,
            stats.reuse_rate() * 100.0
        ),
        None => println!("reparsed {name} in {:.3}ms from scratch", elapsed.as_secs_f64() * 1000.0),
    }
    if dump {
        println!("{}", dump_tree_pretty(&updated.arena, &updated.interner, updated.root));
    }
    report::print_diagnostics(&updated);

    if verify {
        let fresh = parse_source_file(&name, &new_text, options);
        let same_tree = dump_tree(&updated.arena, &updated.interner, updated.root)
            == dump_tree(&fresh.arena, &fresh.interner, fresh.root);
        if !same_tree || updated.parse_diagnostics != fresh.parse_diagnostics {
            eprintln!("incremental result differs from a fresh parse of {name}");
            return Ok(3);
        }
        println!("incremental result matches a fresh parse");
    }

    let has_errors = updated.parse_diagnostics.iter().any(|d| d.is_error());
    Ok(if has_errors { 2 } else { 0 })
}
