//! Audience rating accepted by the remote avatar service.

use serde::{Deserialize, Serialize};

/// Audience rating. Unknown values collapse to [`Rating::G`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Suitable for all audiences.
    #[default]
    G,
    /// May contain rude gestures or mild violence.
    Pg,
    /// May contain harsh language or violence.
    R,
    /// Explicit content.
    X,
}

impl Rating {
    /// Normalizes a stored or user supplied value.
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pg" => Self::Pg,
            "r" => Self::R,
            "x" => Self::X,
            _ => Self::G,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "g",
            Self::Pg => "pg",
            Self::R => "r",
            Self::X => "x",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Rating {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("g", Rating::G ; "g")]
    #[test_case("PG", Rating::Pg ; "upper_pg")]
    #[test_case(" r ", Rating::R ; "padded_r")]
    #[test_case("x", Rating::X ; "x")]
    #[test_case("nc-17", Rating::G ; "unknown")]
    #[test_case("", Rating::G ; "empty")]
    fn test_normalize(input: &str, expected: Rating) {
        assert_eq!(Rating::normalize(input), expected);
    }

    #[test]
    fn test_display_roundtrip() {
        for rating in [Rating::G, Rating::Pg, Rating::R, Rating::X] {
            assert_eq!(Rating::normalize(&rating.to_string()), rating);
        }
    }
}
