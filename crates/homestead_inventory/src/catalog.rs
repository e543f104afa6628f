//! Item catalog
//!
//! Read-only table of item definitions keyed by id, built once at startup
//! from a designer-authored TOML table:
//!
//! ```toml
//! [[items]]
//! id = "apple"
//! display_name = "Apple"
//! category = "consumable"
//! action = "eat"
//! max_stack = 10
//! eat_recover_stamina = 5.0
//! world_model = "models/apple"
//! ```

use crate::error::CatalogError;
use crate::item::{ItemDefinition, ItemStack};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogTable {
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

/// Static lookup from item id to definition
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions
    ///
    /// Definitions with a blank id are skipped. A duplicated id replaces the
    /// earlier definition.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    /// Parse a TOML item table
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let table: CatalogTable = toml::from_str(source)?;
        Ok(Self::from_definitions(table.items))
    }

    /// Load a TOML item table from disk
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&source)?;
        log::info!("Loaded {} item definitions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    fn insert(&mut self, mut definition: ItemDefinition) {
        let id = definition.id.trim().to_string();
        if id.is_empty() {
            log::warn!("Skipping item definition with empty id");
            return;
        }
        definition.id = id.clone();
        definition.max_stack = definition.max_stack.max(1);
        if self.items.contains_key(&id) {
            log::warn!("Duplicated item id '{}', keeping the last definition", id);
        }
        self.items.insert(id, definition);
    }

    /// Look up a definition
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Check if an id is known
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Max stack for an item, `None` for unknown ids
    pub fn max_stack(&self, id: &str) -> Option<u32> {
        self.items.get(id).map(|d| d.max_stack)
    }

    /// A fresh stack of `count` with the item's starting durability
    pub fn new_stack(&self, id: &str, count: u32) -> Option<ItemStack> {
        let definition = self.items.get(id)?;
        Some(ItemStack::new(id, count).with_durability(definition.max_durability))
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All definitions, in no particular order
    pub fn definitions(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemActionType, ItemCategory};

    const TABLE: &str = r#"
        [[items]]
        id = "apple"
        display_name = "Apple"
        category = "consumable"
        action = "eat"
        max_stack = 10
        eat_recover_stamina = 5.0
        world_model = "models/apple"

        [[items]]
        id = "hoe"
        display_name = "Hoe"
        category = "tool"
        action = "tool_use"
        max_stack = 0
        tool_power = 2.0
    "#;

    #[test]
    fn test_parse_table() {
        let catalog = ItemCatalog::from_toml_str(TABLE).unwrap();

        assert_eq!(catalog.len(), 2);
        let apple = catalog.get("apple").unwrap();
        assert_eq!(apple.category, ItemCategory::Consumable);
        assert_eq!(apple.action_type, ItemActionType::Eat);
        assert_eq!(apple.max_stack, 10);
        assert_eq!(apple.world_model.as_deref(), Some("models/apple"));
        assert_eq!(apple.place_yaw_snap, 90.0);

        // max_stack 0 clamps to 1
        assert_eq!(catalog.max_stack("hoe"), Some(1));
        assert_eq!(catalog.max_stack("banana"), None);
    }

    #[test]
    fn test_new_stack_durability() {
        let catalog = ItemCatalog::from_definitions(vec![
            ItemDefinition::new("hoe", "Hoe").with_max_durability(30.0),
        ]);

        assert_eq!(catalog.new_stack("hoe", 1).unwrap().durability, 30.0);
        assert!(catalog.new_stack("sickle", 1).is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let catalog = ItemCatalog::from_toml_str("[[items]]\nid = \"stone\"").unwrap();
        let stone = catalog.get("stone").unwrap();

        assert_eq!(stone.max_stack, 99);
        assert_eq!(stone.category, ItemCategory::Resource);
        assert_eq!(stone.action_type, ItemActionType::None);
        assert_eq!(stone.label(), "stone");
    }

    #[test]
    fn test_blank_ids_skipped_and_duplicates_replaced() {
        let catalog = ItemCatalog::from_definitions(vec![
            ItemDefinition::new("  ", "Nothing"),
            ItemDefinition::new("apple", "Old Apple"),
            ItemDefinition::new(" apple ", "Apple"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("apple").unwrap().display_name, "Apple");
    }

    #[test]
    fn test_parse_error() {
        let result = ItemCatalog::from_toml_str("[[items]]\nid = 5");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.toml");
        std::fs::write(&path, TABLE).unwrap();

        let catalog = ItemCatalog::load_from_file(&path).unwrap();
        assert!(catalog.contains("hoe"));

        let missing = ItemCatalog::load_from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }
}
