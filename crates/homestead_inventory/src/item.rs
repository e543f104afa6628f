//! Item definitions and stacks

use serde::{Deserialize, Serialize};

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Raw materials (wood, stone, apples)
    Resource,
    /// Plantable seeds
    Seed,
    /// Axes, sickles, hoes
    Tool,
    /// Food and potions
    Consumable,
    /// Crafting output (planks, ingots)
    Crafted,
}

impl Default for ItemCategory {
    fn default() -> Self {
        Self::Resource
    }
}

/// What happens when the player uses an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemActionType {
    /// Not usable
    None,
    /// Eat to recover stamina
    Eat,
    /// Hand over to the planting system
    Plant,
    /// Hand over to the tool system
    ToolUse,
    /// Place a world object (fence, workbench)
    Place,
    /// Game-specific handler
    Custom,
}

impl Default for ItemActionType {
    fn default() -> Self {
        Self::None
    }
}

/// Default yaw snap for placed objects, in degrees
pub const DEFAULT_PLACE_YAW_SNAP: f32 = 90.0;

fn default_max_stack() -> u32 {
    99
}

fn default_place_yaw_snap() -> f32 {
    DEFAULT_PLACE_YAW_SNAP
}

/// Item definition
///
/// Authored once in the item table and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default)]
    pub category: ItemCategory,
    /// Use behavior
    #[serde(default, rename = "action")]
    pub action_type: ItemActionType,
    /// Maximum stack size (1 = not stackable)
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Stamina recovered when eaten
    #[serde(default)]
    pub eat_recover_stamina: f32,
    /// Power applied by tool use
    #[serde(default)]
    pub tool_power: f32,
    /// Durability of a fresh stack (0 = never wears)
    #[serde(default)]
    pub max_durability: f32,
    /// Yaw snap for placement, in degrees
    #[serde(default = "default_place_yaw_snap")]
    pub place_yaw_snap: f32,
    /// Icon path
    #[serde(default)]
    pub icon: Option<String>,
    /// Model spawned in the world (ground pickups, placed objects)
    #[serde(default)]
    pub world_model: Option<String>,
    /// Model attached to the hand anchor
    #[serde(default)]
    pub hand_model: Option<String>,
}

impl ItemDefinition {
    /// Create a new item definition
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: name.into(),
            description: String::new(),
            category: ItemCategory::default(),
            action_type: ItemActionType::default(),
            max_stack: default_max_stack(),
            eat_recover_stamina: 0.0,
            tool_power: 0.0,
            max_durability: 0.0,
            place_yaw_snap: DEFAULT_PLACE_YAW_SNAP,
            icon: None,
            world_model: None,
            hand_model: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set category
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Set use behavior
    pub fn with_action(mut self, action: ItemActionType) -> Self {
        self.action_type = action;
        self
    }

    /// Set max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max.max(1);
        self
    }

    /// Set stamina recovered when eaten
    pub fn with_eat_recover_stamina(mut self, stamina: f32) -> Self {
        self.eat_recover_stamina = stamina;
        self
    }

    /// Set tool power
    pub fn with_tool_power(mut self, power: f32) -> Self {
        self.tool_power = power;
        self
    }

    /// Set durability of fresh stacks
    pub fn with_max_durability(mut self, durability: f32) -> Self {
        self.max_durability = durability.max(0.0);
        self
    }

    /// Set placement yaw snap
    pub fn with_place_yaw_snap(mut self, degrees: f32) -> Self {
        self.place_yaw_snap = degrees;
        self
    }

    /// Set icon path
    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon = Some(path.into());
        self
    }

    /// Set world model path
    pub fn with_world_model(mut self, path: impl Into<String>) -> Self {
        self.world_model = Some(path.into());
        self
    }

    /// Set hand model path
    pub fn with_hand_model(mut self, path: impl Into<String>) -> Self {
        self.hand_model = Some(path.into());
        self
    }

    /// Asset shown in the hand: the hand model, else the world model
    pub fn hand_asset(&self) -> Option<&str> {
        self.hand_model.as_deref().or(self.world_model.as_deref())
    }

    /// Name for UI, falling back to the id
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }
}

/// A stack of items in an inventory slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item ID (references ItemDefinition)
    pub item_id: String,
    /// Quantity, never 0 while stored in a slot
    pub count: u32,
    /// Tool durability (unused by most items)
    pub durability: f32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_id: impl Into<String>, count: u32) -> Self {
        Self {
            item_id: item_id.into(),
            count: count.max(1),
            durability: 0.0,
        }
    }

    /// Create a single item
    pub fn single(item_id: impl Into<String>) -> Self {
        Self::new(item_id, 1)
    }

    /// Set durability
    pub fn with_durability(mut self, durability: f32) -> Self {
        self.durability = durability.max(0.0);
        self
    }

    /// Check if this stack is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add to this stack (returns overflow if any)
    pub fn add(&mut self, amount: u32, max_stack: u32) -> u32 {
        let space = max_stack.saturating_sub(self.count);
        let to_add = amount.min(space);
        self.count += to_add;
        amount - to_add
    }

    /// Remove from this stack (returns amount actually removed)
    pub fn remove(&mut self, amount: u32) -> u32 {
        let to_remove = amount.min(self.count);
        self.count -= to_remove;
        to_remove
    }

    /// Room left before hitting `max_stack`
    pub fn space(&self, max_stack: u32) -> u32 {
        max_stack.saturating_sub(self.count)
    }

    /// Wear down durability by `amount`, clamped at 0
    pub fn wear(&mut self, amount: f32) {
        self.durability = (self.durability - amount).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_definition() {
        let item = ItemDefinition::new("apple", "Apple")
            .with_category(ItemCategory::Consumable)
            .with_action(ItemActionType::Eat)
            .with_max_stack(10)
            .with_eat_recover_stamina(5.0);

        assert_eq!(item.id, "apple");
        assert!(item.is_stackable());
        assert_eq!(item.action_type, ItemActionType::Eat);
    }

    #[test]
    fn test_max_stack_is_clamped() {
        let item = ItemDefinition::new("axe", "Axe").with_max_stack(0);
        assert_eq!(item.max_stack, 1);
        assert!(!item.is_stackable());
    }

    #[test]
    fn test_hand_asset_fallback() {
        let item = ItemDefinition::new("apple", "Apple").with_world_model("models/apple");
        assert_eq!(item.hand_asset(), Some("models/apple"));

        let item = item.with_hand_model("models/apple_hand");
        assert_eq!(item.hand_asset(), Some("models/apple_hand"));

        assert_eq!(ItemDefinition::new("stone", "").hand_asset(), None);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(ItemDefinition::new("stone", "").label(), "stone");
        assert_eq!(ItemDefinition::new("stone", "Stone").label(), "Stone");
    }

    #[test]
    fn test_stack_add_and_remove() {
        let mut apples = ItemStack::new("apple", 7);

        assert_eq!(apples.add(5, 10), 2);
        assert_eq!(apples.count, 10);
        assert_eq!(apples.space(10), 0);

        assert_eq!(apples.remove(12), 10);
        assert!(apples.is_empty());
    }

    #[test]
    fn test_stack_never_created_empty() {
        assert_eq!(ItemStack::new("stone", 0).count, 1);
    }

    #[test]
    fn test_wear() {
        let mut hoe = ItemStack::single("hoe").with_durability(1.5);
        hoe.wear(1.0);
        assert_eq!(hoe.durability, 0.5);
        hoe.wear(1.0);
        assert_eq!(hoe.durability, 0.0);
    }
}
