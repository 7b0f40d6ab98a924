#![forbid(unsafe_code)]

//! The recipe record and its search predicate.

use core::fmt;

/// Unique, immutable identity of a recipe.
///
/// Identity, equality, and lookup are always by id. Callers allocate ids
/// (conventionally monotonically increasing or time-derived) and are
/// responsible for keeping them unique within one store.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RecipeId(pub u64);

impl From<u64> for RecipeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A titled, described record identified by a unique id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Recipe {
    /// Unique identity; immutable once created.
    pub id: RecipeId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
}

impl Recipe {
    /// Construct a recipe record.
    pub fn new(
        id: impl Into<RecipeId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Case-insensitive substring test against title OR description.
    ///
    /// `needle_lower` must already be lowercased; the store lowercases the
    /// search term once per recompute rather than once per recipe. An empty
    /// needle matches every recipe.
    #[must_use]
    pub fn matches_term(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_case_insensitively() {
        let r = Recipe::new(1, "Pasta Carbonara", "Eggs and guanciale");
        assert!(r.matches_term("carbo"));
        assert!(r.matches_term("pasta"));
        assert!(!r.matches_term("salad"));
    }

    #[test]
    fn matches_description_case_insensitively() {
        let r = Recipe::new(1, "Pasta", "Tomato SAUCE");
        assert!(r.matches_term("sauce"));
        assert!(!r.matches_term("pesto"));
    }

    #[test]
    fn empty_needle_matches_everything() {
        let r = Recipe::new(1, "", "");
        assert!(r.matches_term(""));
    }

    #[test]
    fn non_ascii_lowercasing() {
        let r = Recipe::new(1, "CRÈME Brûlée", "Custard");
        assert!(r.matches_term("crème"));
        assert!(r.matches_term("brûlée"));
    }

    #[test]
    fn id_display_and_from() {
        let id: RecipeId = 42.into();
        assert_eq!(id.to_string(), "42");
        assert_eq!(id, RecipeId(42));
    }
}
