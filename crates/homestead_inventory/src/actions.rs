//! Item use actions
//!
//! Using the selected item dispatches on its [`ItemActionType`] to a
//! registered [`ItemAction`]. Actions never touch the inventory directly:
//! they report what the use cost through [`ActionOutcome`], and the caller
//! applies that to the slot. Game systems (stamina, crops, tools, building)
//! are reached through [`ActionHost`].

use crate::drop::ActorPose;
use crate::farming::PlantingRules;
use crate::item::{ItemActionType, ItemDefinition};
use glam::Vec3;
use std::collections::BTreeMap;

/// Game systems an item use can reach
pub trait ActionHost {
    /// Current stamina of the acting character
    fn stamina(&self) -> f32;
    /// Maximum stamina of the acting character
    fn max_stamina(&self) -> f32;
    /// Add stamina
    fn recover_stamina(&mut self, amount: f32);
    /// Plant a crop, returns false if the ground refused it
    fn plant(&mut self, item_id: &str, position: Vec3) -> bool;
    /// Apply a tool hit in front of the actor
    fn use_tool(&mut self, item_id: &str, power: f32, target: Vec3);
    /// Place a world object, returns false if the spot is blocked
    fn place(&mut self, item_id: &str, model: &str, position: Vec3, yaw_degrees: f32) -> bool;
}

/// Everything an action may look at while running
pub struct ActionContext<'a> {
    /// Pose of the acting character
    pub pose: ActorPose,
    /// Durability of the used stack
    pub durability: f32,
    /// Planting rules
    pub planting: &'a PlantingRules,
    /// Distance in front of the actor for tool hits and placement
    pub reach: f32,
    /// Game systems
    pub host: &'a mut dyn ActionHost,
}

/// What a use cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    /// Remove this many items from the used stack
    Consumed(u32),
    /// Item stays, optionally losing durability
    Used { wear: f32 },
    /// Nothing happened
    Rejected,
}

impl ActionOutcome {
    /// Check if the use had any effect
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Behavior attached to an action type
pub trait ItemAction: Send + Sync {
    /// Whether this definition can be used at all
    fn can_use(&self, definition: &ItemDefinition) -> bool;
    /// Run the action
    fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome;
}

/// Eat to recover stamina
#[derive(Debug, Default)]
pub struct EatAction;

impl ItemAction for EatAction {
    fn can_use(&self, definition: &ItemDefinition) -> bool {
        definition.eat_recover_stamina > 0.0
    }

    fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        if ctx.host.stamina() >= ctx.host.max_stamina() {
            log::debug!("Not hungry, keeping '{}'", definition.id);
            return ActionOutcome::Rejected;
        }
        ctx.host.recover_stamina(definition.eat_recover_stamina);
        ActionOutcome::Consumed(1)
    }
}

/// Plant in front of the actor
#[derive(Debug, Default)]
pub struct PlantAction;

impl ItemAction for PlantAction {
    fn can_use(&self, _definition: &ItemDefinition) -> bool {
        true
    }

    fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        if !ctx.planting.can_plant(&definition.id) {
            log::debug!("'{}' is not plantable", definition.id);
            return ActionOutcome::Rejected;
        }
        let position = ctx.planting.plant_position(&ctx.pose);
        if ctx.host.plant(&definition.id, position) {
            ActionOutcome::Consumed(1)
        } else {
            ActionOutcome::Rejected
        }
    }
}

/// Hit whatever is in front of the actor
#[derive(Debug, Default)]
pub struct ToolUseAction;

/// Durability lost per tool use
pub const TOOL_WEAR_PER_USE: f32 = 1.0;

impl ItemAction for ToolUseAction {
    fn can_use(&self, _definition: &ItemDefinition) -> bool {
        true
    }

    fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        let target = ctx.pose.point_ahead(ctx.reach, ctx.pose.position.y);
        ctx.host.use_tool(&definition.id, definition.tool_power, target);
        let wear = if ctx.durability > 0.0 {
            TOOL_WEAR_PER_USE
        } else {
            0.0
        };
        ActionOutcome::Used { wear }
    }
}

/// Place a world object snapped to the yaw grid
#[derive(Debug, Default)]
pub struct PlaceAction;

impl PlaceAction {
    /// Actor yaw in degrees, snapped to multiples of `snap`
    pub fn snapped_yaw(pose: &ActorPose, snap: f32) -> f32 {
        let forward = pose.flat_forward();
        // Yaw 0 faces -Z
        let yaw = (-forward.x).atan2(-forward.z).to_degrees();
        if snap > 0.0 {
            (yaw / snap).round() * snap
        } else {
            yaw
        }
    }
}

impl ItemAction for PlaceAction {
    fn can_use(&self, definition: &ItemDefinition) -> bool {
        definition.world_model.is_some()
    }

    fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        let Some(model) = definition.world_model.as_deref() else {
            return ActionOutcome::Rejected;
        };
        let position = ctx.pose.point_ahead(ctx.reach, ctx.pose.position.y);
        let yaw = Self::snapped_yaw(&ctx.pose, definition.place_yaw_snap);
        if ctx.host.place(&definition.id, model, position, yaw) {
            ActionOutcome::Consumed(1)
        } else {
            ActionOutcome::Rejected
        }
    }
}

/// Action handlers keyed by action type
pub struct ItemActionRegistry {
    actions: BTreeMap<ItemActionType, Box<dyn ItemAction>>,
}

impl ItemActionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// Registry with eat, plant, tool and place handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ItemActionType::Eat, Box::new(EatAction));
        registry.register(ItemActionType::Plant, Box::new(PlantAction));
        registry.register(ItemActionType::ToolUse, Box::new(ToolUseAction));
        registry.register(ItemActionType::Place, Box::new(PlaceAction));
        registry
    }

    /// Register a handler, replacing any previous one
    pub fn register(&mut self, action_type: ItemActionType, action: Box<dyn ItemAction>) {
        if action_type == ItemActionType::None {
            log::warn!("Ignoring handler registered for action type 'none'");
            return;
        }
        if self.actions.insert(action_type, action).is_some() {
            log::debug!("Replaced handler for {:?}", action_type);
        }
    }

    /// Check if a handler exists
    pub fn contains(&self, action_type: ItemActionType) -> bool {
        self.actions.contains_key(&action_type)
    }

    /// Check if an item can be used at all
    pub fn can_use(&self, definition: &ItemDefinition) -> bool {
        self.actions
            .get(&definition.action_type)
            .map_or(false, |a| a.can_use(definition))
    }

    /// Run the handler for a definition
    pub fn perform(&self, definition: &ItemDefinition, ctx: &mut ActionContext<'_>) -> ActionOutcome {
        let Some(action) = self.actions.get(&definition.action_type) else {
            log::debug!("'{}' has no use ({:?})", definition.id, definition.action_type);
            return ActionOutcome::Rejected;
        };
        if !action.can_use(definition) {
            return ActionOutcome::Rejected;
        }
        action.perform(definition, ctx)
    }
}

impl Default for ItemActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ItemActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemActionRegistry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlantingConfig;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Host {
        stamina: f32,
        planted: Vec<(String, Vec3)>,
        tool_hits: Vec<(String, f32)>,
        placed: Vec<(String, f32)>,
        block_placement: bool,
    }

    impl ActionHost for Host {
        fn stamina(&self) -> f32 {
            self.stamina
        }

        fn max_stamina(&self) -> f32 {
            100.0
        }

        fn recover_stamina(&mut self, amount: f32) {
            self.stamina = (self.stamina + amount).min(100.0);
        }

        fn plant(&mut self, item_id: &str, position: Vec3) -> bool {
            self.planted.push((item_id.to_string(), position));
            true
        }

        fn use_tool(&mut self, item_id: &str, power: f32, _target: Vec3) {
            self.tool_hits.push((item_id.to_string(), power));
        }

        fn place(&mut self, item_id: &str, _model: &str, _position: Vec3, yaw: f32) -> bool {
            if self.block_placement {
                return false;
            }
            self.placed.push((item_id.to_string(), yaw));
            true
        }
    }

    fn run(definition: &ItemDefinition, host: &mut Host, durability: f32) -> ActionOutcome {
        let rules = PlantingRules::from_config(&PlantingConfig::default());
        let mut ctx = ActionContext {
            pose: ActorPose::default(),
            durability,
            planting: &rules,
            reach: 1.0,
            host,
        };
        ItemActionRegistry::with_defaults().perform(definition, &mut ctx)
    }

    #[test]
    fn test_eat_recovers_stamina() {
        let apple = ItemDefinition::new("apple", "Apple")
            .with_action(ItemActionType::Eat)
            .with_eat_recover_stamina(5.0);
        let mut host = Host {
            stamina: 50.0,
            ..Default::default()
        };

        assert_eq!(run(&apple, &mut host, 0.0), ActionOutcome::Consumed(1));
        assert_eq!(host.stamina, 55.0);
    }

    #[test]
    fn test_eat_rejected_when_full() {
        let apple = ItemDefinition::new("apple", "Apple")
            .with_action(ItemActionType::Eat)
            .with_eat_recover_stamina(5.0);
        let mut host = Host {
            stamina: 100.0,
            ..Default::default()
        };

        assert_eq!(run(&apple, &mut host, 0.0), ActionOutcome::Rejected);
    }

    #[test]
    fn test_plant_only_plantable() {
        let apple = ItemDefinition::new("apple", "Apple").with_action(ItemActionType::Plant);
        let stone = ItemDefinition::new("stone", "Stone").with_action(ItemActionType::Plant);
        let mut host = Host::default();

        assert_eq!(run(&apple, &mut host, 0.0), ActionOutcome::Consumed(1));
        assert_eq!(run(&stone, &mut host, 0.0), ActionOutcome::Rejected);
        assert_eq!(host.planted.len(), 1);
        assert_relative_eq!(host.planted[0].1.z, -1.2);
    }

    #[test]
    fn test_tool_wears_only_with_durability() {
        let hoe = ItemDefinition::new("hoe", "Hoe")
            .with_action(ItemActionType::ToolUse)
            .with_tool_power(2.0);
        let mut host = Host::default();

        assert_eq!(run(&hoe, &mut host, 10.0), ActionOutcome::Used { wear: 1.0 });
        assert_eq!(run(&hoe, &mut host, 0.0), ActionOutcome::Used { wear: 0.0 });
        assert_eq!(host.tool_hits, vec![("hoe".to_string(), 2.0), ("hoe".to_string(), 2.0)]);
    }

    #[test]
    fn test_place_snaps_yaw() {
        let pose = ActorPose::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, -0.2));
        assert_relative_eq!(PlaceAction::snapped_yaw(&pose, 90.0), 90.0);

        let fence = ItemDefinition::new("fence", "Fence")
            .with_action(ItemActionType::Place)
            .with_world_model("models/fence");
        let mut host = Host::default();
        assert_eq!(run(&fence, &mut host, 0.0), ActionOutcome::Consumed(1));
        assert_relative_eq!(host.placed[0].1, 0.0);

        host.block_placement = true;
        assert_eq!(run(&fence, &mut host, 0.0), ActionOutcome::Rejected);
    }

    #[test]
    fn test_place_needs_model() {
        let fence = ItemDefinition::new("fence", "Fence").with_action(ItemActionType::Place);
        assert!(!ItemActionRegistry::with_defaults().can_use(&fence));
    }

    #[test]
    fn test_unhandled_types_rejected() {
        let registry = ItemActionRegistry::with_defaults();
        let stone = ItemDefinition::new("stone", "Stone");
        let relic = ItemDefinition::new("relic", "Relic").with_action(ItemActionType::Custom);

        assert!(!registry.can_use(&stone));
        assert!(!registry.can_use(&relic));
        assert!(!registry.contains(ItemActionType::Custom));
    }

    #[test]
    fn test_register_custom() {
        struct Ring;
        impl ItemAction for Ring {
            fn can_use(&self, _definition: &ItemDefinition) -> bool {
                true
            }
            fn perform(&self, _definition: &ItemDefinition, _ctx: &mut ActionContext<'_>) -> ActionOutcome {
                ActionOutcome::Used { wear: 0.0 }
            }
        }

        let mut registry = ItemActionRegistry::new();
        registry.register(ItemActionType::None, Box::new(Ring));
        registry.register(ItemActionType::Custom, Box::new(Ring));

        assert!(!registry.contains(ItemActionType::None));
        assert!(registry.contains(ItemActionType::Custom));
    }
}
