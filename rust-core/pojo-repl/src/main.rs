// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! pojo: interactive shell and one-shot tools for POJO tag lines.
//!
//! The shell offers:
//! - completion of database names, types and field values
//! - an inline field template hint for the line being typed
//! - tag-line colouring
//! - history recording when an entry is followed by an empty line
//! - meta-commands for history inspection and maintenance
//!
//! The same session is reachable non-interactively through subcommands
//! (`parse`, `suggest`, `hint`, `scan`, `history`, `forget`,
//! `delete-history`).

mod completer;
mod formatter;
mod highlighter;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pojo_history::{FileBackend, HISTORY_FILE_NAME};
use pojo_schema::{PojoSettings, SchemaRegistry};
use pojo_parser::ParseError;
use pojo_session::{CompletedLine, PojoSession, SessionError};
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline_derive::{Completer, Helper, Highlighter, Hinter, Validator};
use tracing::{info, warn};

use completer::{SharedSession, TagCompleter, TagHinter};
use formatter::{format_history, format_outcome, format_report, format_suggestions, OutputFormat};
use highlighter::TagHighlighter;

/// Version string, pulled from Cargo.toml at compile time.
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// pojo: structured tag lines for free-form notes.
#[derive(Parser, Debug)]
#[command(name = "pojo", version = VERSION, about = "Tag-line shell with schema-driven completion")]
struct Cli {
    /// Settings document (databases, fields, daily entries).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// History file.
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive shell (the default).
    Repl {
        /// Ask before remembering the values of a finished entry.
        #[arg(long)]
        confirm: bool,
    },
    /// Parse one tag line.
    Parse { line: String },
    /// Suggestions for a line at a cursor position.
    Suggest {
        line: String,
        /// Cursor position in characters; defaults to the end of the line.
        #[arg(long)]
        cursor: Option<usize>,
    },
    /// Field template for a line.
    Hint { line: String },
    /// Record the tag lines of existing note files.
    Scan {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show remembered values.
    History {
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        key: Option<String>,
    },
    /// Forget one remembered value.
    Forget {
        database: String,
        key: String,
        value: String,
    },
    /// Forget everything.
    DeleteHistory {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

// ---------------------------------------------------------------------------
// Rustyline helper (bundles all traits into one type)
// ---------------------------------------------------------------------------

#[derive(Helper, Highlighter, Completer, Hinter, Validator)]
struct PojoHelper {
    #[rustyline(Highlighter)]
    highlighter: TagHighlighter,
    #[rustyline(Completer)]
    completer: TagCompleter,
    #[rustyline(Hinter)]
    hinter: TagHinter,
}

type PojoEditor = rustyline::Editor<PojoHelper, DefaultHistory>;

// ---------------------------------------------------------------------------
// Shell state
// ---------------------------------------------------------------------------

/// Mutable state for the REPL loop.
struct Shell {
    session: SharedSession,
    settings_path: PathBuf,
    format: OutputFormat,
    /// Ask before committing a finished entry.
    confirm: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format: OutputFormat = cli.format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {e}. Defaulting to table format.");
        OutputFormat::Table
    });

    let explicit_settings = cli.settings.is_some();
    let settings_path = cli.settings.unwrap_or_else(default_settings_path);
    let history_path = cli.history.unwrap_or_else(default_history_path);

    let registry = load_registry(&settings_path, explicit_settings)?;
    let mut session = PojoSession::open(registry, FileBackend::new(&history_path))
        .await
        .with_context(|| format!("failed to open history at {}", history_path.display()))?;

    match cli.command.unwrap_or(Command::Repl { confirm: false }) {
        Command::Repl { confirm } => {
            let shell = Shell {
                session: Rc::new(RefCell::new(session)),
                settings_path,
                format,
                confirm,
            };
            run_repl(shell).await?;
        }
        Command::Parse { line } => {
            let outcome = session.parse(&line)?;
            println!("{}", format_outcome(&outcome, format));
        }
        Command::Suggest { line, cursor } => {
            let cursor = cursor.unwrap_or_else(|| line.chars().count());
            let suggestions = session.suggest(&line, cursor).unwrap_or_default();
            println!("{}", format_suggestions(&suggestions, format));
        }
        Command::Hint { line } => {
            if let Some(hint) = session.hint(&line) {
                println!("{hint}");
            }
        }
        Command::Scan { files } => {
            let report = session.scan_files(&files).await?;
            println!("{}", format_report(&report, format));
        }
        Command::History { database, key } => {
            let document = session.history().document();
            println!(
                "{}",
                format_history(document, database.as_deref(), key.as_deref(), format)
            );
        }
        Command::Forget {
            database,
            key,
            value,
        } => {
            if session.forget(&database, &key, &value).await? {
                println!("Forgot '{value}' from {database}/{key}.");
            } else {
                println!("'{value}' is not in {database}/{key}.");
            }
        }
        Command::DeleteHistory { yes } => {
            if !yes {
                bail!("refusing to delete history without --yes");
            }
            session.delete_history().await?;
            println!("History deleted.");
        }
    }
    Ok(())
}

/// Build the registry from the settings file.
///
/// A missing default settings file gives an empty registry; a missing file
/// named on the command line is an error.
fn load_registry(path: &Path, explicit: bool) -> anyhow::Result<SchemaRegistry> {
    if !explicit && !path.exists() {
        warn!(path = %path.display(), "no settings file, starting without databases");
        return Ok(SchemaRegistry::default());
    }
    let settings = PojoSettings::from_path(path)?;
    let registry = SchemaRegistry::from_settings(&settings)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    info!(path = %path.display(), databases = registry.len(), "settings loaded");
    Ok(registry)
}

// ---------------------------------------------------------------------------
// REPL loop
// ---------------------------------------------------------------------------

async fn run_repl(mut shell: Shell) -> anyhow::Result<()> {
    print_banner(&shell);

    let helper = PojoHelper {
        highlighter: TagHighlighter,
        completer: TagCompleter {
            session: Rc::clone(&shell.session),
        },
        hinter: TagHinter {
            session: Rc::clone(&shell.session),
        },
    };

    let mut editor = PojoEditor::new()
        .context("failed to create readline editor")?;
    editor.set_helper(Some(helper));
    editor.set_auto_add_history(true);

    let editor_history = editor_history_path();
    let _ = editor.load_history(&editor_history);

    let prompt = format!("{} ", "pojo>".bright_green().bold());
    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.starts_with('\\') {
                    if handle_meta_command(&mut shell, &mut editor, trimmed).await {
                        break;
                    }
                    continue;
                }

                let completed = shell.session.borrow_mut().observe_line(&line);
                if trimmed.is_empty() {
                    if let Some(completed) = completed {
                        record_completed(&shell, &mut editor, completed).await;
                    }
                    continue;
                }
                describe_line(&shell, &line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use \\quit or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye.");
                break;
            }
            Err(err) => {
                eprintln!("Readline error: {err}");
                break;
            }
        }
    }

    let _ = editor.save_history(&editor_history);
    Ok(())
}

/// Show what a just-entered line parsed to.
fn describe_line(shell: &Shell, line: &str) {
    let session = shell.session.borrow();
    match session.parse(line) {
        Ok(outcome) => {
            for warning in &outcome.warnings {
                println!("{} {warning}", "Warning:".yellow().bold());
            }
            if !outcome.record.daily_entry {
                println!("{}", "(empty line to record)".dimmed());
            }
        }
        Err(SessionError::Parse(ParseError::NotTagLine)) => {}
        Err(err) if err.is_line_error() => {
            println!("{} {err}", "Invalid:".yellow().bold());
        }
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
        }
    }
}

/// Commit the values of a finished entry, asking first when configured to.
// The editor is idle while the session is borrowed across these awaits.
#[allow(clippy::await_holding_refcell_ref)]
async fn record_completed(shell: &Shell, editor: &mut PojoEditor, completed: CompletedLine) {
    if completed.delta.is_empty() {
        return;
    }
    let added: Vec<String> = completed
        .delta
        .entries()
        .iter()
        .map(|entry| format!("{}/{}: {}", entry.database, entry.key, entry.value))
        .collect();

    if shell.confirm {
        println!("New values:");
        for line in &added {
            println!("  {line}");
        }
        let answer = editor.readline("Remember these? [Y/n] ").unwrap_or_default();
        if answer.trim().eq_ignore_ascii_case("n") {
            println!("{}", "Not recorded.".dimmed());
            return;
        }
    }

    match shell.session.borrow_mut().commit(&completed.delta).await {
        Ok(_) => {
            for line in &added {
                println!("{} {line}", "+".green().bold());
            }
        }
        Err(err) => eprintln!("{} {err}", "Error:".red().bold()),
    }
}

// ---------------------------------------------------------------------------
// Meta-command handling
// ---------------------------------------------------------------------------

/// Handle a meta-command (line starting with '\').
///
/// Returns `true` if the REPL should exit (on \quit or \q).
#[allow(clippy::await_holding_refcell_ref)]
async fn handle_meta_command(shell: &mut Shell, editor: &mut PojoEditor, line: &str) -> bool {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    match cmd {
        "\\quit" | "\\q" => {
            println!("Goodbye.");
            return true;
        }
        "\\help" | "\\h" | "\\?" => print_help(),
        "\\history" => {
            let mut filters = arg.split_whitespace();
            let database = filters.next();
            let key = filters.next();
            let session = shell.session.borrow();
            println!(
                "{}",
                format_history(session.history().document(), database, key, shell.format)
            );
        }
        "\\forget" => {
            let parts: Vec<&str> = arg.splitn(3, char::is_whitespace).collect();
            let [database, key, value] = parts[..] else {
                println!("Usage: \\forget <database> <key> <value>");
                return false;
            };
            match shell.session.borrow_mut().forget(database, key, value.trim()).await {
                Ok(true) => println!("Forgot '{}' from {database}/{key}.", value.trim()),
                Ok(false) => println!("'{}' is not in {database}/{key}.", value.trim()),
                Err(err) => eprintln!("{} {err}", "Error:".red().bold()),
            }
        }
        "\\scan" => {
            let files: Vec<PathBuf> = arg.split_whitespace().map(PathBuf::from).collect();
            if files.is_empty() {
                println!("Usage: \\scan <file>...");
                return false;
            }
            match shell.session.borrow_mut().scan_files(&files).await {
                Ok(report) => println!("{}", format_report(&report, shell.format)),
                Err(err) => eprintln!("{} {err}", "Error:".red().bold()),
            }
        }
        "\\reload" => {
            let result = PojoSettings::from_path(&shell.settings_path)
                .map_err(anyhow::Error::from)
                .and_then(|settings| {
                    shell
                        .session
                        .borrow_mut()
                        .reload_settings(&settings)
                        .map_err(anyhow::Error::from)
                });
            match result {
                Ok(()) => println!(
                    "Reloaded {} database(s) from {}",
                    shell.session.borrow().registry().len(),
                    shell.settings_path.display()
                ),
                Err(err) => eprintln!("{} {err:#}", "Error:".red().bold()),
            }
        }
        "\\confirm" => {
            shell.confirm = !shell.confirm;
            println!(
                "Confirm before recording: {}",
                if shell.confirm { "on" } else { "off" }
            );
        }
        "\\format" => {
            if arg.is_empty() {
                println!("Current format: {}", shell.format);
                println!("Usage: \\format <table|json>");
            } else {
                match arg.parse::<OutputFormat>() {
                    Ok(fmt) => {
                        shell.format = fmt;
                        println!("Output format: {}", shell.format);
                    }
                    Err(e) => eprintln!("{} {e}", "Error:".red().bold()),
                }
            }
        }
        "\\delete-history" => {
            let answer = editor
                .readline("Delete all remembered values? [y/N] ")
                .unwrap_or_default();
            if !answer.trim().eq_ignore_ascii_case("y") {
                println!("Kept.");
                return false;
            }
            match shell.session.borrow_mut().delete_history().await {
                Ok(()) => println!("History deleted."),
                Err(err) => eprintln!("{} {err}", "Error:".red().bold()),
            }
        }
        _ => {
            eprintln!(
                "{} Unknown command: {}. Type \\help for available commands.",
                "Error:".red().bold(),
                cmd
            );
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pojo")
        .join("settings.json")
}

fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pojo")
        .join(HISTORY_FILE_NAME)
}

/// Line-editor history (~/.pojo_repl_history).
fn editor_history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pojo_repl_history")
}

// ---------------------------------------------------------------------------
// Help and banner
// ---------------------------------------------------------------------------

fn print_banner(shell: &Shell) {
    let session = shell.session.borrow();
    println!();
    println!("{}", "  POJO tag-line shell".bright_cyan().bold());
    println!("  {} {}", "Version:  ".dimmed(), VERSION);
    println!("  {} {}", "Settings: ".dimmed(), shell.settings_path.display());
    println!(
        "  {} {}",
        "Databases:".dimmed(),
        session.registry().database_names().join(", ")
    );
    println!(
        "  {} {}",
        "History:  ".dimmed(),
        session.history().document().value_count()
    );
    println!();
    println!(
        "  Type {} for help, {} to exit.",
        "\\help".bright_yellow(),
        "\\quit".bright_yellow()
    );
    println!();
}

fn print_help() {
    println!();
    println!("{}", "  Tag lines".bright_cyan().bold());
    println!();
    println!("  #Database/Type value; value; ...   or   ### Database/Type ...");
    println!("  Tab completes the field under the cursor. An empty line after");
    println!("  an entry records its values.");
    println!();
    println!("{}", "  Meta-commands".bright_cyan().bold());
    println!();
    for (cmd, text) in [
        ("\\history [db] [key]         ", "Show remembered values"),
        ("\\forget <db> <key> <value>  ", "Forget one value"),
        ("\\scan <file>...             ", "Record the tag lines of note files"),
        ("\\reload                     ", "Re-read the settings file"),
        ("\\confirm                    ", "Toggle confirmation before recording"),
        ("\\format <fmt>               ", "Set output format (table|json)"),
        ("\\delete-history             ", "Forget everything"),
        ("\\help                       ", "Show this help message"),
        ("\\quit / \\q                  ", "Exit the shell"),
    ] {
        println!("  {}  {}", cmd.bright_yellow(), text);
    }
    println!();
}
