//! Opens the application database and creates its tables.

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, expense::create_expense_table, expense_type::create_expense_type_table,
    user::create_user_table,
};

/// Where the database lives when no path is given.
pub const DEFAULT_DB_PATH: &str = "expense_tracker.db";

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, so rows that
/// refer to a missing user are rejected.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // SQLite ignores this pragma inside a transaction.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_expense_type_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Open the database at `path`, creating the file if it does not exist, and
/// make sure its tables exist.
///
/// # Errors
/// Returns an [Error::SqlError] if the file cannot be opened (e.g. permission
/// denied) or the tables cannot be created.
pub fn open_database(path: &Path) -> Result<Connection, Error> {
    let is_new = !path.exists();
    let connection = Connection::open(path)?;

    initialize(&connection)?;

    if is_new {
        tracing::info!("Created database at {path:?}");
    } else {
        tracing::debug!("Opened database at {path:?}");
    }

    Ok(connection)
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use crate::{Error, NewExpense, PasswordHash, UserID, expense::create_expense, user::create_user};

    use super::{initialize, open_database};

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|name| name.unwrap())
            .collect()
    }

    #[test]
    fn initialize_creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        assert_eq!(
            table_names(&connection),
            vec!["expense_types", "expenses", "users"]
        );
    }

    #[test]
    fn initialize_twice_keeps_existing_rows() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user =
            create_user("alice", PasswordHash::new_unchecked("hunter2"), &connection).unwrap();

        initialize(&connection).expect("Could not initialize database a second time");

        let count: u32 = connection
            .query_row("SELECT COUNT(id) FROM users WHERE id = ?1", [user.id.as_i64()], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user_id = UserID::new(7);

        let result = create_expense(
            user_id,
            NewExpense::parse("coffee", "3.50", "food").unwrap(),
            &connection,
        );

        assert_eq!(result, Err(Error::UnknownUser(user_id)));
    }

    #[test]
    fn open_database_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expense_tracker.db");

        let connection = open_database(&path).expect("Could not open database");

        assert!(path.is_file());
        assert_eq!(table_names(&connection).len(), 3);
    }

    #[test]
    fn open_database_reuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expense_tracker.db");
        {
            let connection = open_database(&path).unwrap();
            create_user("alice", PasswordHash::new_unchecked("hunter2"), &connection).unwrap();
        }

        let connection = open_database(&path).expect("Could not reopen database");

        assert_eq!(crate::count_users(&connection), Ok(1));
    }

    #[test]
    fn open_database_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("expense_tracker.db");

        let result = open_database(&path);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }
}
