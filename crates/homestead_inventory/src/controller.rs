//! Character inventory controller
//!
//! Composition root for one character: owns the inventory and the hand,
//! tracks pickups in range and turns player commands into protocol calls.
//! Engine glue feeds it trigger callbacks, key presses and a per-frame tick.

use crate::actions::{ActionContext, ActionHost, ActionOutcome, ItemActionRegistry};
use crate::catalog::ItemCatalog;
use crate::config::InventoryConfig;
use crate::drop::{ActorPose, DropOutcome, DropProtocol, DropSettings, WorldBridge};
use crate::equipment::{CycleDirection, EquipmentSync, HandPresenter};
use crate::farming::PlantingRules;
use crate::inventory::Inventory;
use crate::pickup::{PickupCandidate, PickupOutcome, PickupProtocol, PickupSensor, WorldEntityId};
use crate::snapshot::{HeldSnapshot, InventorySnapshot, SnapshotPoller};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Anything that carries an inventory
///
/// Callers resolve this once instead of looking components up by name.
pub trait InventoryHolder {
    fn inventory(&self) -> &Inventory;
    fn inventory_mut(&mut self) -> &mut Inventory;
}

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryCommand {
    PickupNearest,
    DropSelected,
    CycleHeld(CycleDirection),
    SelectSlot(usize),
    SelectNext,
    SelectPrev,
    UseSelected,
}

/// Keys the inventory reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    E,
    Q,
    F,
    Tab,
    PageUp,
    PageDown,
    /// Number row, 0-9
    Digit(u8),
}

/// A key-down event from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    /// Auto-repeat while held
    pub repeat: bool,
}

impl KeyPress {
    /// A fresh press without modifiers
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            repeat: false,
        }
    }

    /// Set shift
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Mark as auto-repeat
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// Key bindings for inventory commands
#[derive(Debug, Clone)]
pub struct HotkeyMap {
    bindings: BTreeMap<(Key, bool), InventoryCommand>,
}

impl HotkeyMap {
    /// Empty map
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind a key (with or without shift) to a command
    pub fn bind(&mut self, key: Key, shift: bool, command: InventoryCommand) {
        self.bindings.insert((key, shift), command);
    }

    /// Remove a binding
    pub fn unbind(&mut self, key: Key, shift: bool) -> Option<InventoryCommand> {
        self.bindings.remove(&(key, shift))
    }

    /// Command for a key press
    ///
    /// Auto-repeats never trigger commands.
    pub fn resolve(&self, press: &KeyPress) -> Option<InventoryCommand> {
        if press.repeat {
            return None;
        }
        self.bindings.get(&(press.key, press.shift)).copied()
    }
}

impl Default for HotkeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(Key::E, false, InventoryCommand::PickupNearest);
        map.bind(Key::Q, false, InventoryCommand::DropSelected);
        map.bind(Key::F, false, InventoryCommand::UseSelected);
        map.bind(Key::Tab, false, InventoryCommand::CycleHeld(CycleDirection::Next));
        map.bind(Key::Tab, true, InventoryCommand::CycleHeld(CycleDirection::Prev));
        map.bind(Key::PageDown, false, InventoryCommand::SelectNext);
        map.bind(Key::PageUp, false, InventoryCommand::SelectPrev);
        for digit in 1..=9u8 {
            map.bind(
                Key::Digit(digit),
                false,
                InventoryCommand::SelectSlot(digit as usize - 1),
            );
        }
        map
    }
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Pickup(Option<PickupOutcome>),
    Drop(DropOutcome),
    Held(Option<String>),
    Selected(Option<usize>),
    Used(ActionOutcome),
}

/// Inventory, hand and pickups of one character
pub struct InventoryController<H: HandPresenter> {
    config: InventoryConfig,
    inventory: Inventory,
    equipment: EquipmentSync<H>,
    sensor: PickupSensor,
    pickup: PickupProtocol,
    drop: DropProtocol,
    actions: ItemActionRegistry,
    planting: PlantingRules,
    poller: SnapshotPoller,
}

impl<H: HandPresenter> InventoryController<H> {
    /// Create a controller with an empty inventory
    pub fn new(config: InventoryConfig, catalog: Arc<ItemCatalog>, presenter: H) -> Self {
        let drop = DropProtocol::new(DropSettings {
            distance: config.drop_distance,
            ground_level: config.ground_level,
            height_offset: config.drop_height_offset,
        });
        log::debug!(
            "Inventory controller: {} slots, pickup overflow {}",
            config.capacity,
            config.pickup_overflow
        );

        Self {
            inventory: Inventory::new(config.capacity, catalog.clone()),
            equipment: EquipmentSync::new(presenter, catalog),
            sensor: PickupSensor::new(),
            pickup: PickupProtocol::new(config.pickup_overflow),
            drop,
            actions: ItemActionRegistry::with_defaults(),
            planting: PlantingRules::from_config(&config.planting),
            poller: SnapshotPoller::new(config.effective_refresh_interval()),
            config,
        }
    }

    /// Replace the action registry
    pub fn with_actions(mut self, actions: ItemActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn equipment(&self) -> &EquipmentSync<H> {
        &self.equipment
    }

    pub fn equipment_mut(&mut self) -> &mut EquipmentSync<H> {
        &mut self.equipment
    }

    pub fn sensor(&self) -> &PickupSensor {
        &self.sensor
    }

    pub fn actions_mut(&mut self) -> &mut ItemActionRegistry {
        &mut self.actions
    }

    pub fn planting(&self) -> &PlantingRules {
        &self.planting
    }

    /// Held item id
    pub fn held_id(&self) -> Option<&str> {
        self.equipment.held_id()
    }

    // Trigger callbacks

    /// A pickup entered the character's trigger
    pub fn on_pickup_enter(&mut self, candidate: PickupCandidate) -> bool {
        self.sensor.on_enter(candidate)
    }

    /// A pickup left the character's trigger
    pub fn on_pickup_exit(&mut self, entity: WorldEntityId) {
        self.sensor.on_exit(entity);
    }

    // Commands

    /// Pick up the closest candidate within `pickup_radius`
    pub fn pickup_nearest<W>(&mut self, world: &mut W, pose: &ActorPose) -> Option<PickupOutcome>
    where
        W: WorldBridge + ?Sized,
    {
        let entity = self.sensor.nearest(pose.position, self.config.pickup_radius)?;
        let candidate = self.sensor.get_mut(entity)?;
        let outcome = self.pickup.pickup(candidate, &mut self.inventory);

        match &outcome {
            PickupOutcome::Collected { .. } => {
                world.despawn_pickup(entity);
                self.sensor.on_exit(entity);
            }
            PickupOutcome::Partial { remaining, .. } => {
                world.update_pickup_count(entity, *remaining);
            }
            PickupOutcome::Rejected { .. } | PickupOutcome::AlreadyPicked => {}
        }

        self.equipment.tick(&self.inventory);
        Some(outcome)
    }

    /// Drop one item from the selected slot
    pub fn drop_selected_one<W>(&mut self, world: &mut W, pose: &ActorPose) -> DropOutcome
    where
        W: WorldBridge + ?Sized,
    {
        let Some(index) = self.inventory.selected_index() else {
            return DropOutcome::Nothing;
        };
        self.drop
            .drop(index, 1, &mut self.inventory, &mut self.equipment, world, pose)
    }

    /// Cycle the held item over distinct ids
    pub fn cycle_held(&mut self, direction: CycleDirection) -> Option<&str> {
        self.equipment.cycle_held(&self.inventory, direction)
    }

    /// Hold a specific item
    pub fn equip_by_id(&mut self, item_id: &str) -> bool {
        self.equipment.equip_by_id(&self.inventory, item_id)
    }

    /// Select a slot; the hand follows the selection again
    pub fn select_slot(&mut self, index: usize) -> bool {
        let ok = self.inventory.select(index);
        self.equipment.follow_selection(&self.inventory);
        ok
    }

    /// Select the next occupied slot; the hand follows the selection again
    pub fn select_next(&mut self) -> Option<usize> {
        self.inventory.select_next();
        self.equipment.follow_selection(&self.inventory);
        self.inventory.selected_index()
    }

    /// Select the previous occupied slot; the hand follows the selection again
    pub fn select_prev(&mut self) -> Option<usize> {
        self.inventory.select_prev();
        self.equipment.follow_selection(&self.inventory);
        self.inventory.selected_index()
    }

    /// Slot the next use applies to
    ///
    /// The selected slot when it holds the held item, else the first slot
    /// holding it.
    pub fn active_slot(&self) -> Option<usize> {
        let held = self.equipment.held_id()?;
        match self.inventory.selected() {
            Some(stack) if stack.item_id == held => self.inventory.selected_index(),
            _ => self.inventory.find_item(held),
        }
    }

    /// Use the held item
    pub fn use_selected(&mut self, host: &mut dyn ActionHost, pose: &ActorPose) -> ActionOutcome {
        let Some(index) = self.active_slot() else {
            return ActionOutcome::Rejected;
        };
        let Some(stack) = self.inventory.slot(index) else {
            return ActionOutcome::Rejected;
        };
        let catalog = Arc::clone(self.inventory.catalog());
        let Some(definition) = catalog.get(&stack.item_id) else {
            return ActionOutcome::Rejected;
        };

        let mut ctx = ActionContext {
            pose: *pose,
            durability: stack.durability,
            planting: &self.planting,
            reach: self.config.use_reach,
            host,
        };
        let outcome = self.actions.perform(definition, &mut ctx);

        match outcome {
            ActionOutcome::Consumed(count) => {
                self.inventory.remove_at(index, count);
            }
            ActionOutcome::Used { wear } if wear > 0.0 => {
                if self.inventory.wear_at(index, wear) == Some(0.0) {
                    log::info!("'{}' broke", definition.id);
                    self.inventory.remove_at(index, 1);
                }
            }
            ActionOutcome::Used { .. } | ActionOutcome::Rejected => {}
        }

        self.equipment.tick(&self.inventory);
        outcome
    }

    /// Run a command
    pub fn execute<W>(
        &mut self,
        command: InventoryCommand,
        world: &mut W,
        host: &mut dyn ActionHost,
        pose: &ActorPose,
    ) -> CommandResult
    where
        W: WorldBridge + ?Sized,
    {
        match command {
            InventoryCommand::PickupNearest => CommandResult::Pickup(self.pickup_nearest(world, pose)),
            InventoryCommand::DropSelected => CommandResult::Drop(self.drop_selected_one(world, pose)),
            InventoryCommand::CycleHeld(direction) => {
                CommandResult::Held(self.cycle_held(direction).map(str::to_string))
            }
            InventoryCommand::SelectSlot(index) => {
                self.select_slot(index);
                CommandResult::Selected(self.inventory.selected_index())
            }
            InventoryCommand::SelectNext => CommandResult::Selected(self.select_next()),
            InventoryCommand::SelectPrev => CommandResult::Selected(self.select_prev()),
            InventoryCommand::UseSelected => CommandResult::Used(self.use_selected(host, pose)),
        }
    }

    /// Per-frame reconciliation
    ///
    /// Returns a UI snapshot when one is due and the inventory changed.
    pub fn tick(&mut self, dt: f32) -> Option<InventorySnapshot> {
        self.equipment.tick(&self.inventory);
        self.poller.tick(dt, &self.inventory)
    }

    /// Current inventory contents
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot::capture(&self.inventory)
    }

    /// Current hand contents
    pub fn held_snapshot(&self) -> HeldSnapshot {
        HeldSnapshot::capture(&self.equipment)
    }

    /// Destroy every hand representation
    pub fn shutdown(&mut self) {
        self.equipment.clear();
    }
}

impl<H: HandPresenter> InventoryHolder for InventoryController<H> {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

impl<H: HandPresenter + std::fmt::Debug> std::fmt::Debug for InventoryController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryController")
            .field("inventory", &self.inventory)
            .field("equipment", &self.equipment)
            .field("sensor", &self.sensor)
            .finish()
    }
}
