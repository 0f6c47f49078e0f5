use std::{
    error::Error,
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use clap::Parser;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use etracker::{DEFAULT_DB_PATH, ExpenseTracker, PasswordHash, shell};

/// A personal expense tracker backed by a local SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if it does not exist.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// File path to append debug logs to.
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// The bcrypt cost used to hash the passwords of new users.
    #[arg(long, default_value_t = PasswordHash::DEFAULT_COST)]
    bcrypt_cost: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(args.log_path.as_deref())?;

    let mut tracker = match ExpenseTracker::open(&args.db_path, args.bcrypt_cost) {
        Ok(tracker) => tracker,
        Err(error) => {
            eprintln!("Could not open the database at {:?}: {error}", args.db_path);
            exit(1);
        }
    };

    shell::run(
        &mut tracker,
        io::stdin().lock(),
        io::stdout().lock(),
        |prompt: &str| rpassword::prompt_password(prompt),
    )?;

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (warnings by default), and at debug
/// level to `log_path` if given.
fn setup_logging(log_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let stderr_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let debug_log = match log_path {
        Some(log_path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
