//! Subscription box categories.
//!
//! The contract stores the category as a public numeric field; the client
//! derives the category from it by reducing modulo the fixed category list.
//! Note this makes the category of every box public even though the
//! preference score itself is encrypted.

use serde::{Deserialize, Serialize};

/// One of the six fixed box categories.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    Electronics,
    Fashion,
    Books,
    Food,
    Beauty,
    Sports,
}

impl Category {
    /// All categories in their on-chain order.
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Fashion,
        Category::Books,
        Category::Food,
        Category::Beauty,
        Category::Sports,
    ];

    /// Derive a category from the contract's public category code.
    #[must_use]
    pub fn from_code(code: u64) -> Self {
        Self::ALL[(code % Self::ALL.len() as u64) as usize]
    }

    /// Code written to the contract when creating a box.
    ///
    /// Chosen so that `from_code(c.code()) == c`.
    #[must_use]
    pub fn code(self) -> u64 {
        self as u64
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::Books => "books",
            Self::Food => "food",
            Self::Beauty => "beauty",
            Self::Sports => "sports",
        }
    }

    /// Label shown in the creation form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::Books => "Books",
            Self::Food => "Food & Snacks",
            Self::Beauty => "Beauty",
            Self::Sports => "Sports",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_code(self.code() + 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_code(self.code() + Self::ALL.len() as u64 - 1)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// Category selector for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }

    /// Cycle `All -> electronics -> ... -> sports -> All`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Category::Electronics),
            Self::Only(Category::Sports) => Self::All,
            Self::Only(c) => Self::Only(c.next()),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Categories",
            Self::Only(c) => c.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_reduces_modulo_list() {
        for v in 0u64..500 {
            assert_eq!(Category::from_code(v), Category::ALL[(v % 6) as usize]);
        }
        assert_eq!(Category::from_code(u64::MAX), Category::ALL[(u64::MAX % 6) as usize]);
    }

    #[test]
    fn test_code_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::from_code(c.code()), c);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Books".parse::<Category>(), Ok(Category::Books));
        assert_eq!(" sports ".parse::<Category>(), Ok(Category::Sports));
        assert!("garden".parse::<Category>().is_err());
    }

    #[test]
    fn test_filter_cycle_visits_every_category() {
        let mut filter = CategoryFilter::All;
        let mut seen = Vec::new();
        for _ in 0..7 {
            filter = filter.next();
            seen.push(filter);
        }
        assert_eq!(seen.last(), Some(&CategoryFilter::All));
        assert_eq!(seen.len(), 7);
        assert!(CategoryFilter::All.matches(Category::Food));
        assert!(!CategoryFilter::Only(Category::Books).matches(Category::Food));
    }

    #[test]
    fn test_prev_wraps() {
        assert_eq!(Category::Electronics.prev(), Category::Sports);
        assert_eq!(Category::Sports.next(), Category::Electronics);
    }
}
