//! Implements the struct that ties the database, credentials and session together.

use std::{
    io::Write,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;

use crate::{
    Error, Expense, ExpenseType, ExpenseTypeName, NewExpense, Session, UserID, auth,
    db::{initialize, open_database},
    expense::{create_expense, get_expenses},
    expense_type::{create_expense_type, get_expense_types},
    export::export_expenses,
    user::User,
};

/// The state of a running expense tracker.
///
/// Every ledger operation acts on the expenses of the logged in user and
/// fails with [Error::NotAuthenticated] before anyone has logged in.
#[derive(Debug)]
pub struct ExpenseTracker {
    db_connection: Arc<Mutex<Connection>>,
    password_cost: u32,
    session: Session,
}

impl ExpenseTracker {
    /// Create a new [ExpenseTracker] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `password_cost` is the bcrypt cost used when registering users.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, password_cost: u32) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self::with_initialized_connection(db_connection, password_cost))
    }

    /// Open the database file at `db_path`, creating it and its tables if
    /// needed, and start a logged out tracker on it.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened or the tables
    /// cannot be created.
    pub fn open(db_path: &Path, password_cost: u32) -> Result<Self, Error> {
        let db_connection = open_database(db_path)?;

        Ok(Self::with_initialized_connection(db_connection, password_cost))
    }

    fn with_initialized_connection(db_connection: Connection, password_cost: u32) -> Self {
        Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            password_cost,
            session: Session::default(),
        }
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Register a new user. The session is not changed.
    ///
    /// See [auth::register] for the possible errors.
    pub fn register(&self, username: &str, password: &str) -> Result<User, Error> {
        auth::register(username, password, self.password_cost, &*self.connection()?)
    }

    /// Check the credentials and, if they match, make that user the logged in user.
    ///
    /// A failed attempt leaves the session as it was.
    ///
    /// See [auth::log_in] for the possible errors.
    pub fn log_in(&mut self, username: &str, password: &str) -> Result<UserID, Error> {
        let user_id = auth::log_in(username, password, &*self.connection()?)?;
        self.session.log_in(user_id);

        Ok(user_id)
    }

    /// Record an expense for the logged in user and return their refreshed
    /// list of expenses.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NotAuthenticated] if nobody has logged in,
    /// - [Error::InvalidInput] if a field is empty,
    /// - [Error::InvalidAmount] if `amount` is not a finite number,
    /// - or [Error::SqlError] if there is some SQL error.
    pub fn add_expense(
        &self,
        description: &str,
        amount: &str,
        category: &str,
    ) -> Result<Vec<Expense>, Error> {
        let user_id = self.session.user_id()?;
        let expense = NewExpense::parse(description, amount, category)?;

        let connection = self.connection()?;
        create_expense(user_id, expense, &connection)?;

        get_expenses(user_id, &connection)
    }

    /// The logged in user's expenses in the order they were recorded.
    pub fn list_expenses(&self) -> Result<Vec<Expense>, Error> {
        let user_id = self.session.user_id()?;

        get_expenses(user_id, &*self.connection()?)
    }

    /// Add a category label for the logged in user.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotAuthenticated] if nobody has logged in, or
    /// [Error::InvalidInput] if `name` is empty.
    pub fn add_expense_type(&self, name: &str) -> Result<ExpenseType, Error> {
        let user_id = self.session.user_id()?;
        let name = ExpenseTypeName::new(name)?;

        create_expense_type(user_id, name, &*self.connection()?)
    }

    /// The logged in user's category labels in the order they were added.
    pub fn list_expense_types(&self) -> Result<Vec<ExpenseTypeName>, Error> {
        let user_id = self.session.user_id()?;

        let expense_types = get_expense_types(user_id, &*self.connection()?)?;

        Ok(expense_types
            .into_iter()
            .map(|expense_type| expense_type.name)
            .collect())
    }

    /// Write the logged in user's expenses to `writer` as CSV.
    pub fn export_expenses<W: Write>(&self, writer: W) -> Result<(), Error> {
        let expenses = self.list_expenses()?;

        export_expenses(&expenses, writer)
    }

    /// Chart the logged in user's spending.
    ///
    /// # Errors
    ///
    /// Always returns [Error::NotImplemented].
    pub fn show_graph(&self) -> Result<(), Error> {
        Err(Error::NotImplemented("graph"))
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)
    }
}
