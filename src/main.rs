// SPDX-License-Identifier: MIT
//
// nmark — colored multi-pattern marks kept in sync across windows and tab
// pages.
//
// This is the binary that wires the crates together:
//
//   n-editor → buffer, windows and tab pages, highlight groups, matches
//   n-mark   → slot registry, per-view sync, mark lookup and commands
//
// A script of editor commands runs against a file, then every window of the
// current tab page is printed with its marks painted in:
//
//   file ─┐
//   script ─→ Session (Editor + Marks) ─→ render ─→ stdout
//   config ─┘                         └─→ messages ─→ stdout

mod config;
mod host;
mod render;
mod script;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use n_editor::Editor;
use n_editor::buffer::Buffer;
use tracing::info;

use crate::config::AppConfig;
use crate::render::{RenderOptions, render};
use crate::script::Session;

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "nmark")]
#[command(about = "Colored multi-pattern marks kept in sync across windows and tab pages")]
#[command(version)]
struct Args {
    /// File to show
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Script line to run (repeatable, runs after --script-file)
    #[arg(short, long = "script", value_name = "LINE")]
    scripts: Vec<String>,

    /// File of script lines
    #[arg(short = 'f', long, value_name = "PATH")]
    script_file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print without colors
    #[arg(long)]
    no_color: bool,
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr; `RUST_LOG` overrides the `-v` level.
fn setup_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn build_session(args: &Args, config: &AppConfig) -> Result<Session> {
    let buffer = Buffer::from_file(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let mut editor = Editor::new(buffer, config.highlight_groups()?);
    editor.set_ignorecase(config.editor.ignorecase);
    editor.set_number(config.editor.number);
    Ok(Session::new(editor, config.marks.clone()))
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut session = build_session(args, &config)?;
    info!(file = %args.file.display(), "loaded");

    if let Some(path) = &args.script_file {
        let script = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        session.run_script(&script);
    }
    for line in &args.scripts {
        session.run_line(line);
    }
    info!(marks = session.marks().list().len(), "script done");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    render(
        &mut out,
        session.editor(),
        RenderOptions {
            color: !args.no_color,
        },
    )?;
    for msg in session.messages() {
        writeln!(out, "{msg}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);
    run(&args)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
