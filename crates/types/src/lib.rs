//! Validated identifier types shared across the trajectory crates.

/// Longest patient identifier accepted from callers.
pub const MAX_PATIENT_ID_LEN: usize = 128;

/// Errors that can occur when constructing a [`PatientId`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace.
    #[error("patient id cannot be empty")]
    Empty,
    /// The trimmed input is longer than [`MAX_PATIENT_ID_LEN`].
    #[error("patient id exceeds maximum length of {} characters", MAX_PATIENT_ID_LEN)]
    TooLong,
    /// The input contains a character outside the allowed set.
    #[error("patient id contains invalid character {0:?} (only alphanumeric, '.', '-', '_' allowed)")]
    InvalidCharacter(char),
}

/// Identifier of a patient whose visits are tracked.
///
/// Input is trimmed of surrounding whitespace. The remaining text must be non-empty, no longer
/// than [`MAX_PATIENT_ID_LEN`] and made of ASCII alphanumerics, `.`, `-` or `_`, which keeps the
/// identifier safe to embed in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Parses and validates a patient identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IdError`] describing the first rule the input breaks.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.len() > MAX_PATIENT_ID_LEN {
            return Err(IdError::TooLong);
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
        {
            return Err(IdError::InvalidCharacter(bad));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PatientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::new(&s).map_err(serde::de::Error::custom)
    }
}
