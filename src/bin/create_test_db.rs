use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use etracker::{ExpenseTracker, PasswordHash};

/// A utility for creating a test database for the etracker shell.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut tracker = ExpenseTracker::new(conn, PasswordHash::DEFAULT_COST)?;

    println!("Creating test user \"test\" with the password \"test\"...");
    tracker.register("test", "test")?;
    tracker.log_in("test", "test")?;

    for name in ["food", "transport", "housing"] {
        tracker.add_expense_type(name)?;
    }

    println!("Adding expenses...");
    for (description, amount, category) in [
        ("coffee", "3.50", "food"),
        ("bus fare", "2.40", "transport"),
        ("rent", "450", "housing"),
        ("groceries", "87.15", "food"),
    ] {
        tracker.add_expense(description, amount, category)?;
    }

    println!("Success!");

    Ok(())
}
