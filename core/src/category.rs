use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Name as used for question bank keys.
    pub fn bank_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Ordered, append-only list of board columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five stock columns.
    pub fn stock() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category {
                id,
                name: name.to_string(),
            })
            .collect();
        Self { categories }
    }

    /// Builds a registry by appending each name in order, failing on the first rejected one.
    pub fn with_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.add(name.as_ref())?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn find_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .any(|category| category.name.trim().to_lowercase() == name)
    }

    /// Checks `name` without mutating, returning the trimmed name that [`Self::add`] would store.
    pub fn validate<'a>(&self, name: &'a str) -> Result<&'a str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GameError::EmptyName);
        }
        if self.contains_name(trimmed) {
            return Err(GameError::DuplicateCategory);
        }
        Ok(trimmed)
    }

    /// Appends a category, its id is the registry length after insertion.
    pub fn add(&mut self, name: &str) -> Result<&Category> {
        let name = self.validate(name)?.to_string();
        let id = self.next_id();
        log::debug!("category added: {} ({:?})", id, name);
        self.categories.push(Category { id, name });
        Ok(&self.categories[self.categories.len() - 1])
    }

    fn next_id(&self) -> CategoryId {
        // ids never collide because categories are never removed
        CategoryId::try_from(self.categories.len())
            .unwrap_or(CategoryId::MAX)
            .saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> CategoryRegistry {
        CategoryRegistry::with_names(DEFAULT_CATEGORIES).unwrap()
    }

    #[test]
    fn ids_are_assigned_sequentially_from_one() {
        let registry = defaults();

        let ids: Vec<_> = registry.iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
        assert_eq!(registry.find_by_id(3).unwrap().name, "Geography");
        assert!(registry.find_by_id(6).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut registry = defaults();

        assert_eq!(registry.add("science"), Err(GameError::DuplicateCategory));
        assert_eq!(registry.add("  HISTORY "), Err(GameError::DuplicateCategory));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut registry = defaults();

        assert_eq!(registry.add(""), Err(GameError::EmptyName));
        assert_eq!(registry.add("   "), Err(GameError::EmptyName));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn add_stores_trimmed_name_with_next_id() {
        let mut registry = defaults();

        let category = registry.add("  Art History ").unwrap().clone();

        assert_eq!(category, Category { id: 6, name: "Art History".into() });
        assert_eq!(category.bank_name(), "art history");
        assert!(registry.contains_name("art history"));
    }
}
