//! Expense types: the per-user category labels offered when adding expenses.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, UserID, database_id::ExpenseTypeId, input::require_text};

/// A validated, non-empty expense type label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseTypeName(String);

impl ExpenseTypeName {
    /// Create an expense type name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidInput] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        require_text(name, "expense type").map(|name| Self(name.to_owned()))
    }

    /// Create an expense type name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ExpenseTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category label owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseType {
    /// The ID of the expense type.
    pub id: ExpenseTypeId,
    /// The user the label belongs to.
    pub user_id: UserID,
    /// The label itself.
    pub name: ExpenseTypeName,
}

/// Initialize the expense type table.
pub fn create_expense_type_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_types (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Create an expense type for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::UnknownUser] if `user_id` does not refer to a registered user.
pub fn create_expense_type(
    user_id: UserID,
    name: ExpenseTypeName,
    connection: &Connection,
) -> Result<ExpenseType, Error> {
    connection
        .execute(
            "INSERT INTO expense_types (user_id, type) VALUES (?1, ?2);",
            (user_id.as_i64(), name.as_ref()),
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

    let id = connection.last_insert_rowid();

    Ok(ExpenseType { id, user_id, name })
}

/// Retrieve the expense types of `user_id` in the order they were created.
pub fn get_expense_types(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ExpenseType>, Error> {
    connection
        .prepare("SELECT id, user_id, type FROM expense_types WHERE user_id = :user_id ORDER BY id ASC;")?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_type| maybe_type.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<ExpenseType, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_user_id = row.get(1)?;
    let raw_name: String = row.get(2)?;

    Ok(ExpenseType {
        id,
        user_id: UserID::new(raw_user_id),
        name: ExpenseTypeName::new_unchecked(&raw_name),
    })
}
