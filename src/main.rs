//! CLI entry point for deepwalk

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use deepwalk::walk;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // Failure reports are the only colored output, and they go to
            // stderr.
            io::stderr().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "deepwalk")]
#[command(about = "List directory trees of unbounded depth, one entry per line")]
#[command(version)]
struct Args {
    /// Files or directories to walk
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Show what the walker is doing on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("deepwalk=debug")
    } else {
        EnvFilter::new("deepwalk=error")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print one failed entry as `path: error`, the way ls reports entries it
/// cannot read.
fn report_failure(stderr: &mut StandardStream, path: &Path, err: &io::Error) {
    // A write failure on stderr has nowhere left to be reported.
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = write!(stderr, "{}", path.display());
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {}", err);
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let choice = if should_use_color(args.color) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let stdout = io::stdout();
    let mut stderr = StandardStream::stderr(choice);

    for root in &args.paths {
        let result = walk(root, |path, _meta, err| match err {
            Some(err) => {
                report_failure(&mut stderr, path, &err);
                Ok(())
            }
            None => {
                let mut out = stdout.lock();
                writeln!(out, "{}", path.display())?;
                Ok(())
            }
        });

        if let Err(err) = result {
            eprintln!("deepwalk: {}", err);
            process::exit(1);
        }
    }
}
