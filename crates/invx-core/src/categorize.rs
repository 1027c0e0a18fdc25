//! Expense categorization.
//!
//! Real classification lives outside this crate; the placeholder here hands
//! every invoice the configured default category.

/// Assigns an expense category to invoice text.
pub trait ExpenseCategorizer {
    /// Return the category for the given text. Never empty.
    fn categorize(&self, text: &str) -> String;
}

/// Categorizer that assigns one fixed category.
#[derive(Debug, Clone)]
pub struct PlaceholderCategorizer {
    category: String,
}

impl PlaceholderCategorizer {
    /// Fallback when no category is configured.
    pub const DEFAULT_CATEGORY: &'static str = "Uncategorized";

    pub fn new(category: impl Into<String>) -> Self {
        let category = category.into();
        if category.trim().is_empty() {
            return Self::default();
        }
        Self { category }
    }
}

impl Default for PlaceholderCategorizer {
    fn default() -> Self {
        Self {
            category: Self::DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl ExpenseCategorizer for PlaceholderCategorizer {
    fn categorize(&self, _text: &str) -> String {
        self.category.clone()
    }
}
