//! Invention list filters and their query-string form.

use shared::domain::{Category, SortKey};

/// Filter set sent with `GET /inventions`. Filtering and sorting happen on
/// the backend; the client only serializes what is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventionFilters {
    pub category: Option<Category>,
    pub tag: String,
    pub seeking_mentorship: Option<bool>,
    pub seeking_collaboration: Option<bool>,
    pub sort_by: Option<SortKey>,
}

impl InventionFilters {
    /// Query pairs in a stable order, skipping unset and blank values.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.as_query_value().to_string()));
        }
        let tag = self.tag.trim();
        if !tag.is_empty() {
            pairs.push(("tag", tag.to_string()));
        }
        if let Some(value) = self.seeking_mentorship {
            pairs.push(("seeking_mentorship", value.to_string()));
        }
        if let Some(value) = self.seeking_collaboration {
            pairs.push(("seeking_collaboration", value.to_string()));
        }
        if let Some(sort) = self.sort_by {
            pairs.push(("sort_by", sort.as_query_value().to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }
}
