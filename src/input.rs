//! Validation shared by the forms the user fills in.

use crate::Error;

/// Trim `value` and return it, or [Error::InvalidInput] naming `field` if
/// nothing is left.
pub(crate) fn require_text<'a>(value: &'a str, field: &'static str) -> Result<&'a str, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::InvalidInput(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod require_text_tests {
    use crate::Error;

    use super::require_text;

    #[test]
    fn fails_on_empty_string() {
        assert_eq!(require_text("", "username"), Err(Error::InvalidInput("username")));
    }

    #[test]
    fn fails_on_just_whitespace() {
        assert_eq!(
            require_text("\n\t \r", "description"),
            Err(Error::InvalidInput("description"))
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(require_text("  coffee ", "description"), Ok("coffee"));
    }
}
