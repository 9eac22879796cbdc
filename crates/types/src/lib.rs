/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Query cannot be empty")]
    Empty,
}

/// A free-text query as typed by the user.
///
/// This type wraps a `String` and guarantees it contains at least one
/// non-whitespace character. The input is trimmed of leading and trailing
/// whitespace during construction. This is the only validation a query
/// receives before it is dispatched to a backend; the query language itself
/// is interpreted server-side (or by the local simulator) and is opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText(String);

impl QueryText {
    /// Creates a new `QueryText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned — callers are expected to treat
    /// that as "nothing to dispatch" rather than as a user-facing failure.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(QueryText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the query lower-cased, as used for keyword matching.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    /// Consumes the wrapper and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for QueryText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for QueryText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for QueryText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for QueryText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        QueryText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let query = QueryText::new("  Show me all female patients  ").expect("valid query");
        assert_eq!(query.as_str(), "Show me all female patients");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(QueryText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn rejects_whitespace_only_input() {
        assert!(matches!(QueryText::new("   \t\n"), Err(TextError::Empty)));
    }

    #[test]
    fn lowercases_for_keyword_matching() {
        let query = QueryText::new("How MANY Patients?").expect("valid query");
        assert_eq!(query.to_lowercase(), "how many patients?");
    }

    #[test]
    fn serde_round_trip() {
        let query = QueryText::new("common conditions").expect("valid query");
        let json = serde_json::to_string(&query).expect("serialize");
        assert_eq!(json, "\"common conditions\"");
        let back: QueryText = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, query);
    }

    #[test]
    fn serde_rejects_empty_string() {
        let result: Result<QueryText, _> = serde_json::from_str("\"   \"");
        assert!(result.is_err());
    }
}
