/// Result of parsing an identifier string.
///
/// Parsing never fails: malformed input yields a value whose
/// [`Parsed::is_valid`] is `false` and whose `info` is `None`.
///
/// ```
/// use tempoid::Ulid;
///
/// let parsed = Ulid::parse("not-a-ulid");
/// assert!(!parsed.is_valid());
/// assert!(parsed.info.is_none());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The string that was parsed.
    pub input: String,
    /// The decoded components, when the input is well formed.
    pub info: Option<T>,
}

impl<T> Parsed<T> {
    pub(crate) fn invalid(input: &str) -> Self {
        Self {
            input: input.to_owned(),
            info: None,
        }
    }

    pub(crate) fn from_option(input: &str, info: Option<T>) -> Self {
        Self {
            input: input.to_owned(),
            info,
        }
    }

    /// Returns `true` when the input matched the family's structure.
    pub const fn is_valid(&self) -> bool {
        self.info.is_some()
    }

    /// Consumes the result, returning the decoded components.
    pub fn into_info(self) -> Option<T> {
        self.info
    }
}
