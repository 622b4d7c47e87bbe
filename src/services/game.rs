//! Validated game identifiers.

use std::fmt;

/// Longest accepted game name, in characters.
pub const MAX_GAME_NAME_LEN: usize = 64;

/// A trimmed, non-empty game name as stored in `high_scores.game_name` and
/// `favorites.game_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameName(String);

impl GameName {
    /// Parse a raw request value. Returns `None` for missing, blank, overlong
    /// or control-character-bearing names.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_GAME_NAME_LEN || trimmed.chars().any(char::is_control) {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "game_test.rs"]
mod tests;
