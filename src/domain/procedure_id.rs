use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

/// A procedure identifier.
///
/// Identifiers are short, human-meaningful and case sensitive, for example
/// `N1`, `C4.1` or `ERP-FA`. They are the only stable handle used for
/// cross-referencing and navigation.
///
/// Format: one or more ASCII alphanumeric characters, `.` or `-`, starting and
/// ending with an alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcedureId(String);

impl ProcedureId {
    /// Creates a new `ProcedureId` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIdError`] if the string is empty, contains characters
    /// other than ASCII alphanumerics, `.` and `-`, or starts or ends with a
    /// separator.
    pub fn new(s: String) -> Result<Self, InvalidIdError> {
        let is_separator = |c: char| c == '.' || c == '-';

        if s.is_empty() || s.starts_with(is_separator) || s.ends_with(is_separator) {
            return Err(InvalidIdError(s));
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || is_separator(c))
        {
            return Err(InvalidIdError(s));
        }

        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProcedureId {
    type Error = InvalidIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ProcedureId {
    type Error = InvalidIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<ProcedureId> for String {
    fn from(id: ProcedureId) -> Self {
        id.0
    }
}

impl FromStr for ProcedureId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for ProcedureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// `Hash` and `Eq` are derived from the inner `String`, so they agree with `str`.
impl Borrow<str> for ProcedureId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for ProcedureId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<str> for ProcedureId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProcedureId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ProcedureId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string is not a valid procedure identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid procedure ID '{0}': must be non-empty ASCII alphanumerics, '.' or '-', and must not \
     start or end with a separator"
)]
pub struct InvalidIdError(String);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use test_case::test_case;

    use super::*;

    #[test_case("N1" ; "normal")]
    #[test_case("C4.1" ; "dotted sub-procedure")]
    #[test_case("ERP-FA" ; "hyphenated")]
    #[test_case("e5" ; "lowercase is preserved")]
    fn accepts_valid_identifiers(input: &str) {
        let id: ProcedureId = input.parse().unwrap();
        assert_eq!(id.as_str(), input);
        assert_eq!(id.to_string(), input);
    }

    #[test_case("" ; "empty")]
    #[test_case("N 1" ; "whitespace")]
    #[test_case("-N1" ; "leading separator")]
    #[test_case("C4." ; "trailing separator")]
    #[test_case("E1/2" ; "slash")]
    fn rejects_invalid_identifiers(input: &str) {
        let err = input.parse::<ProcedureId>().unwrap_err();
        assert_eq!(err, InvalidIdError(input.to_string()));
    }

    #[test]
    fn lookups_by_str_match_owned_keys() {
        let mut map = HashMap::new();
        map.insert(ProcedureId::try_from("C4.1").unwrap(), 7);

        assert_eq!(map.get("C4.1"), Some(&7));
        assert_eq!(map.get("c4.1"), None);
    }

    #[test]
    fn deserialising_validates() {
        let id: ProcedureId = serde_json::from_str("\"ERP-FA\"").unwrap();
        assert_eq!(id, "ERP-FA");

        let result: Result<ProcedureId, _> = serde_json::from_str("\"ERP FA\"");
        assert!(result.is_err());
    }
}
