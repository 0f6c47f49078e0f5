//! E-Tracker is a personal expense tracker.
//!
//! A user registers an account, logs in and records expenses (description,
//! amount and category) in a local SQLite database. This library provides the
//! storage, authentication and session logic, plus the interactive shell used
//! by the `etracker` binary.

#![warn(missing_docs)]

mod auth;
mod database_id;
mod db;
mod expense;
mod expense_type;
mod export;
mod input;
mod password;
mod session;
pub mod shell;
mod tracker;
mod user;

pub use auth::{log_in, register};
pub use database_id::{DatabaseId, ExpenseId, ExpenseTypeId};
pub use db::{DEFAULT_DB_PATH, initialize as initialize_db, open_database};
pub use expense::{
    Expense, NewExpense, count_expenses, create_expense, get_expenses, parse_amount,
};
pub use expense_type::{ExpenseType, ExpenseTypeName, create_expense_type, get_expense_types};
pub use export::export_expenses;
pub use password::PasswordHash;
pub use session::Session;
pub use tracker::ExpenseTracker;
pub use user::{User, UserID, count_users};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was empty.
    ///
    /// Holds the name of the field, e.g. "username".
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),

    /// The amount of an expense could not be parsed as a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The password is too long to be hashed without truncation.
    ///
    /// Holds the maximum length in bytes.
    #[error("password must be at most {0} bytes long")]
    PasswordTooLong(usize),

    /// No registered user matched the username and password.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// A ledger operation was attempted before logging in.
    #[error("you must log in first")]
    NotAuthenticated,

    /// The username has already been registered.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// A row referred to a user that does not exist in the database.
    #[error("the user ID {0} does not refer to a registered user")]
    UnknownUser(UserID),

    /// An unexpected error occurred with the underlying hashing library.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested feature has not been built yet.
    #[error("the {0} feature is not implemented yet")]
    NotImplemented(&'static str),

    /// Expenses could not be written as CSV.
    #[error("could not export expenses: {0}")]
    ExportError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}
