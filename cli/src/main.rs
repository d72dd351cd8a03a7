//! tabsql CLI - Tableau workbook SQL extraction tool
//!
//! Parses a Tableau workbook (.twb/.twbx) and writes a SQL-commented report
//! of its worksheets, connections and custom SQL.

use chrono::Local;
use clap::Parser;
use colored::*;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Extract worksheets, connections and custom SQL from Tableau workbooks
#[derive(Parser)]
#[command(
    name = "tabsql",
    version,
    about = "Extract SQL and connection metadata from Tableau workbooks",
    long_about = "tabsql - Tableau workbook SQL extraction tool.\n\n\
                  Parses a .twb or .twbx workbook and reports its worksheets, the\n\
                  datasources they reference, connection details, and any custom SQL\n\
                  as commented SQL text."
)]
struct Cli {
    /// Input workbook (.twb or .twbx)
    input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let created_by = username();
    let created_on = Local::now().format("%Y-%m-%d %I:%M%p").to_string();

    // The report is built in full before the output file is touched, so a
    // failed conversion never leaves a truncated file behind.
    let report = tabsql::convert(&cli.input, &created_by, &created_on)?;

    write_output(cli.output.as_ref(), &report)?;

    if let Some(output) = cli.output {
        println!(
            "{} Extracted {} to {}",
            "✓".green().bold(),
            cli.input.display(),
            output.display()
        );
    }

    Ok(())
}

/// Invoking user for the report header.
fn username() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), io::Error> {
    match path {
        Some(p) => fs::write(p, content),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
