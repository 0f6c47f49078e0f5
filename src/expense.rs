//! Defines the expense model and its database queries.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, UserID, database_id::ExpenseId, input::require_text};

// ============================================================================
// MODELS
// ============================================================================

/// Money spent (or, for negative amounts, received) by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The user that recorded the expense.
    pub user_id: UserID,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The category label, e.g. "food".
    pub category: String,
}

impl Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (${:.2}) - {}",
            self.description, self.amount, self.category
        )
    }
}

/// A validated expense that has not been saved yet.
///
/// Use [NewExpense::parse] to build one from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A non-empty description.
    pub description: String,
    /// A finite amount.
    pub amount: f64,
    /// A non-empty category label.
    pub category: String,
}

impl NewExpense {
    /// Validate the raw text fields of an expense form.
    ///
    /// Surrounding whitespace is trimmed from every field.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidInput] if any field is empty,
    /// - or [Error::InvalidAmount] if `amount` is not a finite number.
    pub fn parse(description: &str, amount: &str, category: &str) -> Result<Self, Error> {
        let description = require_text(description, "description")?;
        let amount = parse_amount(amount)?;
        let category = require_text(category, "category")?;

        Ok(Self {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
        })
    }
}

/// Parse the text typed into an amount field.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidInput] if `raw_amount` is empty,
/// - or [Error::InvalidAmount] if it is not a finite decimal number.
pub fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    let raw_amount = require_text(raw_amount, "amount")?;

    match raw_amount.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount(raw_amount.to_owned())),
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                expense_type TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Save `expense` for the user `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UnknownUser] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(
    user_id: UserID,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expenses (user_id, description, amount, expense_type)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, description, amount, expense_type",
        )?
        .query_row(
            (
                user_id.as_i64(),
                expense.description,
                expense.amount,
                expense.category,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::UnknownUser(user_id),
            error => error.into(),
        })?;

    tracing::debug!("Created expense {} for user {user_id}", expense.id);

    Ok(expense)
}

/// Retrieve the expenses of `user_id` in the order they were recorded.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, expense_type FROM expenses
             WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Get the number of expenses recorded by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_expenses(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM expenses WHERE user_id = ?1;",
            [user_id.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id = row.get(1)?;
    let description = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;

    Ok(Expense {
        id,
        user_id: UserID::new(raw_user_id),
        description,
        amount,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================
