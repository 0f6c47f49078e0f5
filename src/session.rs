//! Tracks which user, if any, is logged in.

use crate::{Error, UserID};

/// The authentication state of the running application.
///
/// A session starts logged out and moves to [Session::LoggedIn] after a
/// successful log-in. Logging in again replaces the user. There is no way
/// back to [Session::LoggedOut].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody has logged in yet.
    #[default]
    LoggedOut,
    /// The user with this ID has logged in.
    LoggedIn(UserID),
}

impl Session {
    /// Record that `user_id` has logged in.
    pub fn log_in(&mut self, user_id: UserID) {
        *self = Session::LoggedIn(user_id);
    }

    /// The ID of the logged in user.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotAuthenticated] if nobody has logged in.
    pub fn user_id(&self) -> Result<UserID, Error> {
        match self {
            Session::LoggedIn(user_id) => Ok(*user_id),
            Session::LoggedOut => Err(Error::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod session_tests {
    use crate::{Error, UserID};

    use super::Session;

    #[test]
    fn starts_logged_out() {
        let session = Session::default();

        assert_eq!(session, Session::LoggedOut);
        assert_eq!(session.user_id(), Err(Error::NotAuthenticated));
    }

    #[test]
    fn log_in_sets_user() {
        let mut session = Session::default();

        session.log_in(UserID::new(3));

        assert_eq!(session, Session::LoggedIn(UserID::new(3)));
        assert_eq!(session.user_id(), Ok(UserID::new(3)));
    }

    #[test]
    fn log_in_again_replaces_user() {
        let mut session = Session::default();
        session.log_in(UserID::new(3));

        session.log_in(UserID::new(7));

        assert_eq!(session.user_id(), Ok(UserID::new(7)));
    }
}
