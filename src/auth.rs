//! Registration and credential checks.

use rusqlite::Connection;

use crate::{
    Error, PasswordHash,
    input::require_text,
    user::{User, UserID, create_user, get_users_by_username},
};

/// Register a new user with a salted hash of `password`.
///
/// Surrounding whitespace is trimmed from `username`, the password is used
/// exactly as given.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidInput] if `username` or `password` is empty,
/// - [Error::PasswordTooLong] if `password` is longer than [PasswordHash::MAX_PASSWORD_BYTES],
/// - [Error::HashingError] if the password could not be hashed with `cost`,
/// - [Error::DuplicateUsername] if the username is taken,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn register(
    username: &str,
    password: &str,
    cost: u32,
    connection: &Connection,
) -> Result<User, Error> {
    let username = require_text(username, "username")?;
    require_password(password)?;

    if password.len() > PasswordHash::MAX_PASSWORD_BYTES {
        return Err(Error::PasswordTooLong(PasswordHash::MAX_PASSWORD_BYTES));
    }

    let password_hash = PasswordHash::new(password, cost)?;
    let user = create_user(username, password_hash, connection)?;

    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    Ok(user)
}

/// Check `username` and `password` against the registered users.
///
/// If several users share the username, the oldest one whose password
/// matches wins.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidInput] if `username` or `password` is empty,
/// - [Error::InvalidCredentials] if no user matches,
/// - or [Error::SqlError] if there is some SQL error.
pub fn log_in(username: &str, password: &str, connection: &Connection) -> Result<UserID, Error> {
    let username = require_text(username, "username")?;
    require_password(password)?;

    // No stored hash can match a password that register would have refused.
    if password.len() > PasswordHash::MAX_PASSWORD_BYTES {
        tracing::warn!("Failed log-in attempt for {username:?}");
        return Err(Error::InvalidCredentials);
    }

    for user in get_users_by_username(username, connection)? {
        match user.password_hash.verify(password) {
            Ok(true) => {
                tracing::info!("User {} logged in", user.id);
                return Ok(user.id);
            }
            Ok(false) => {}
            Err(error) => {
                tracing::warn!("Could not verify the password of user {}: {error}", user.id);
            }
        }
    }

    tracing::warn!("Failed log-in attempt for {username:?}");

    Err(Error::InvalidCredentials)
}

fn require_password(password: &str) -> Result<(), Error> {
    if password.is_empty() {
        Err(Error::InvalidInput("password"))
    } else {
        Ok(())
    }
}
