//! Small validated value types shared across the CRM crates.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The resource type is not one the CRM keeps a directory for
    #[error("Unknown resource type: {0}")]
    UnknownResourceKind(String),
}

/// A string type that guarantees non-empty content.
///
/// Input is trimmed of leading and trailing whitespace during construction. Display names and
/// directory identifiers use this so that a blank entry can never be stored or emitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, trimming the input.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
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

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Resource types whose display names the CRM can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Patient,
    Practitioner,
    Case,
}

impl ResourceKind {
    /// The FHIR resource type name, as used in references.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Practitioner => "Practitioner",
            Self::Case => "Case",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = TypeError;

    /// Parses a resource type name. Matching is exact, as in FHIR references.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Self::Patient),
            "Practitioner" => Ok(Self::Practitioner),
            "Case" => Ok(Self::Case),
            other => Err(TypeError::UnknownResourceKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_text() {
        let text = NonEmptyText::new("  Dr Jane Smith ").expect("non-empty");
        assert_eq!(text.as_str(), "Dr Jane Smith");
        assert_eq!(text.to_string(), "Dr Jane Smith");
    }

    #[test]
    fn rejects_blank_text() {
        assert_eq!(NonEmptyText::new("   "), Err(TypeError::Empty));
        assert_eq!("".parse::<NonEmptyText>(), Err(TypeError::Empty));
    }

    #[test]
    fn deserialise_rejects_blank_text() {
        let err = serde_json::from_str::<NonEmptyText>(r#""  ""#).expect_err("blank text");
        assert!(err.to_string().contains("empty"));

        let text = serde_json::from_str::<NonEmptyText>(r#"" John Doe""#).expect("text");
        assert_eq!(text.into_inner(), "John Doe");
    }

    #[test]
    fn parses_resource_kinds_exactly() {
        assert_eq!("Patient".parse::<ResourceKind>(), Ok(ResourceKind::Patient));
        assert_eq!(
            "Practitioner".parse::<ResourceKind>(),
            Ok(ResourceKind::Practitioner)
        );
        assert_eq!("Case".parse::<ResourceKind>(), Ok(ResourceKind::Case));
        assert_eq!(
            "patient".parse::<ResourceKind>(),
            Err(TypeError::UnknownResourceKind("patient".into()))
        );
    }

    #[test]
    fn resource_kind_display_matches_reference_prefix() {
        assert_eq!(ResourceKind::Practitioner.to_string(), "Practitioner");
    }
}
