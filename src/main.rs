use std::time::Instant;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use tinyrel::db::Database;
use tinyrel::executor::{self, ExecOutcome};
use tinyrel::sql;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut db = Database::new();
    match std::env::args().nth(1) {
        Some(path) => run_script(&mut db, &path),
        None => run_interactive(&mut db),
    }
}

/// Executes every non-blank line of a script file, then reports one
/// benchmark for the whole batch.
fn run_script(db: &mut Database, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let script = std::fs::read_to_string(path)?;
    let started = Instant::now();
    let ios = db.disk.io_count();
    let millis = db.disk.elapsed_millis();
    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        println!("tinyrel> {line}");
        run_statement(db, line);
    }
    print_benchmark(db, started, ios, millis);
    Ok(())
}

fn run_interactive(db: &mut Database) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("tinyrel> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    break;
                }
                editor.add_history_entry(&line)?;

                let started = Instant::now();
                let ios = db.disk.io_count();
                let millis = db.disk.elapsed_millis();
                if run_statement(db, &line) {
                    print_benchmark(db, started, ios, millis);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Parses and executes one statement. A failure of either stage prints
/// the underlying error plus the session's standard complaint, and the
/// session continues.
fn run_statement(db: &mut Database, input: &str) -> bool {
    let statement = match sql::parse(input) {
        Ok(statement) => statement,
        Err(e) => {
            eprintln!("{e}");
            println!("Invalid SQL statement.");
            return false;
        }
    };
    match executor::execute(db, &statement) {
        Ok(outcome) => {
            print_outcome(&outcome);
            true
        }
        Err(e) => {
            eprintln!("{e}");
            println!("Invalid SQL statement.");
            false
        }
    }
}

fn print_outcome(outcome: &ExecOutcome) {
    match outcome {
        ExecOutcome::Created { relation } => {
            println!("Successfully created relation \"{relation}\".");
        }
        ExecOutcome::Dropped { relation } => {
            println!("Successfully dropped relation \"{relation}\".");
        }
        ExecOutcome::Inserted { relation, rows } => {
            println!("Successfully inserted {rows} row(s) into relation \"{relation}\".");
        }
        ExecOutcome::Deleted { relation } => {
            println!("Successfully deleted from relation \"{relation}\".");
        }
        ExecOutcome::Selected(result) => {
            print!("{}", result.render());
            println!("{} row(s) selected.", result.num_rows());
        }
    }
}

fn print_benchmark(db: &Database, started: Instant, ios_before: u64, millis_before: f64) {
    println!("DBMS time = {:.2} ms", db.disk.elapsed_millis() - millis_before);
    println!("DBMS Disk I/Os = {}", db.disk.io_count() - ios_before);
    println!("Computer time = {} ms", started.elapsed().as_millis());
}
