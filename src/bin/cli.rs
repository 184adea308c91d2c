//! FlatDB - CLI Client
//!
//! Reads one query per line and hands it to the execution engine. SELECT
//! results go to stdout, errors and logs to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use flatdb::{Config, ExecutionEngine};

const PROMPT: &str = "dbc > ";

/// Print welcome banner
fn print_banner() {
    println!("--------------------- Database Manager ---------------------");
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .tables            List all tables
  .schema <table>    Show table schema
  exit, \q           Exit

Queries:
  DATASET <table> <col>:<TYPE> ...         Create a table (INTEGER, NUMBER, STRING, BOOLEAN)
  INSERT_INTO <table> <col>=<value> ...    Append a row, values in column order
  SELECT <table> [<col><op><value> ...]    Print matching rows
  UPDATE <table> <col><op><value> ... <col>:<value> ...
  DELETE <table> <col><op><value> ...

Operators: = <> != < <= > >=

Examples:
  DATASET users name:STRING age:INTEGER
  INSERT_INTO users name='Bob Smith' age=31
  SELECT users age>=18
"#
    );
}

/// Handle special dot commands
fn handle_special_command(cmd: &str, engine: &ExecutionEngine) {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let catalog = engine.catalog();

    match parts.first().copied() {
        Some(".help") => print_help(),
        Some(".tables") => match catalog.list_schemas() {
            Ok(schemas) if schemas.is_empty() => println!("No tables found."),
            Ok(schemas) => {
                println!("Tables:");
                for schema in schemas {
                    println!("  {}", schema.name());
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        },
        Some(".schema") => {
            let names: Vec<String> = match parts.get(1) {
                Some(name) => vec![name.to_string()],
                None => match catalog.list_schemas() {
                    Ok(schemas) => schemas.iter().map(|s| s.name().to_string()).collect(),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return;
                    }
                },
            };
            for name in names {
                match catalog.get_table_info(&name) {
                    Ok(info) => println!("{}", info),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Type '.help' for available commands.");
        }
        None => {}
    }
}

/// Execute a query line
fn execute_query(query: &str, engine: &ExecutionEngine) {
    match engine.execute(query) {
        Ok(result) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(e) = result.write_rows(&mut out).and_then(|_| out.flush()) {
                eprintln!("error: {}", e);
            }
        }
        Err(e) => eprintln!("error: {}", e),
    }
}

/// Main REPL loop
fn run_repl(engine: &ExecutionEngine) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;

    print_banner();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                if line == "exit" || line == "\\q" {
                    break;
                }
                if line.starts_with('.') {
                    handle_special_command(line, engine);
                    continue;
                }
                execute_query(line, engine);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => anyhow::bail!("failed to read input: {}", e),
        }
    }

    Ok(())
}

/// Parse `--data-dir` and `--config` into a config
fn parse_args() -> Result<Config> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_file: Option<PathBuf> = None;
    let mut data_dir: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_file = args.get(i + 1).map(PathBuf::from);
                i += 1;
            }
            "--data-dir" | "-d" => {
                data_dir = args.get(i + 1).map(PathBuf::from);
                i += 1;
            }
            other => anyhow::bail!("unknown argument '{}'", other),
        }
        i += 1;
    }

    let mut config = match config_file {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::new(),
    };
    if let Some(dir) = data_dir {
        config = config.data_dir(dir);
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = parse_args()?;
    let engine = ExecutionEngine::new(config).context("failed to open data directory")?;

    run_repl(&engine)
}
