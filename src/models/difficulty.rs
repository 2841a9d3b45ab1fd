// src/models/difficulty.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Difficulty levels for exercises.
/// Stored as an integer column; serialized by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum Difficulty {
    Easy = 1,
    Normal = 2,
    Hard = 3,
}

impl Difficulty {
    /// The available difficulty levels, as shown to clients.
    pub const ALL: [&'static str; 3] = ["Easy", "Normal", "Hard"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_name() {
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!(Difficulty::Normal.to_string(), "Normal");
        assert_eq!(Difficulty::Hard.to_string(), "Hard");
    }

    #[test]
    fn serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Hard).unwrap(),
            "\"Hard\""
        );
        let d: Difficulty = serde_json::from_str("\"Easy\"").unwrap();
        assert_eq!(d, Difficulty::Easy);
    }
}
