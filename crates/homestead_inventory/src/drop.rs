//! Drop protocol
//!
//! Moves items from a slot back into the world in front of the actor and
//! keeps the hand stocked while copies remain.

use crate::equipment::{EquipmentSync, HandPresenter};
use crate::inventory::Inventory;
use crate::pickup::WorldEntityId;
use glam::Vec3;

/// Forward axis of an unrotated actor
pub const DEFAULT_FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// World placement of the acting character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    /// World position
    pub position: Vec3,
    /// World forward direction (any length)
    pub forward: Vec3,
}

impl ActorPose {
    /// Create a pose
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Forward projected on the ground plane and normalized
    ///
    /// Falls back to [`DEFAULT_FORWARD`] when the actor looks straight up
    /// or down.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.forward.x, 0.0, self.forward.z)
            .try_normalize()
            .unwrap_or(DEFAULT_FORWARD)
    }

    /// Ground point `distance` in front of the actor
    pub fn point_ahead(&self, distance: f32, ground_y: f32) -> Vec3 {
        let ahead = self.position + self.flat_forward() * distance;
        Vec3::new(ahead.x, ground_y, ahead.z)
    }
}

impl Default for ActorPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, DEFAULT_FORWARD)
    }
}

/// Request to create a pickup-eligible entity in the world
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Item ID
    pub item_id: String,
    /// Quantity
    pub count: u32,
    /// World position
    pub position: Vec3,
    /// World model, if the item has one
    pub model: Option<String>,
}

/// Scene-side world spawner
pub trait WorldBridge {
    /// Create a pickup entity, synchronously
    fn spawn_pickup(&mut self, request: SpawnRequest) -> WorldEntityId;
    /// Remove a collected pickup
    fn despawn_pickup(&mut self, entity: WorldEntityId);
    /// A partially collected pickup now holds `count`
    fn update_pickup_count(&mut self, entity: WorldEntityId, count: u32);
}

/// Drop placement settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSettings {
    /// Distance in front of the actor
    pub distance: f32,
    /// World ground height
    pub ground_level: f32,
    /// Height above ground
    pub height_offset: f32,
}

impl Default for DropSettings {
    fn default() -> Self {
        Self {
            distance: 1.0,
            ground_level: 0.0,
            height_offset: 0.0,
        }
    }
}

/// Result of a drop
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Slot was empty or out of range
    Nothing,
    /// Items left the inventory and were spawned
    Dropped {
        item_id: String,
        count: u32,
        entity: WorldEntityId,
        position: Vec3,
    },
}

impl DropOutcome {
    /// Amount removed from the inventory
    pub fn dropped_count(&self) -> u32 {
        match self {
            Self::Nothing => 0,
            Self::Dropped { count, .. } => *count,
        }
    }
}

/// Moves items from inventory slots into the world
#[derive(Debug, Clone, Copy, Default)]
pub struct DropProtocol {
    settings: DropSettings,
}

impl DropProtocol {
    /// Create with placement settings
    pub fn new(settings: DropSettings) -> Self {
        Self { settings }
    }

    /// Placement settings
    pub fn settings(&self) -> &DropSettings {
        &self.settings
    }

    /// Where a drop from `pose` lands
    pub fn drop_position(&self, pose: &ActorPose) -> Vec3 {
        pose.point_ahead(
            self.settings.distance,
            self.settings.ground_level + self.settings.height_offset,
        )
    }

    /// Drop up to `count` from the slot at `index`
    pub fn drop<H, W>(
        &self,
        index: usize,
        count: u32,
        inventory: &mut Inventory,
        equipment: &mut EquipmentSync<H>,
        world: &mut W,
        pose: &ActorPose,
    ) -> DropOutcome
    where
        H: HandPresenter,
        W: WorldBridge + ?Sized,
    {
        let Some(stack) = inventory.slot(index) else {
            return DropOutcome::Nothing;
        };
        let item_id = stack.item_id.clone();
        let position = self.drop_position(pose);
        let from_selected = inventory.selected_index() == Some(index);

        let removed = inventory.remove_at(index, count);
        if removed == 0 {
            return DropOutcome::Nothing;
        }

        let model = inventory
            .catalog()
            .get(&item_id)
            .and_then(|d| d.world_model.clone());
        if model.is_none() {
            log::warn!("Dropped '{}' has no world model", item_id);
        }
        let entity = world.spawn_pickup(SpawnRequest {
            item_id: item_id.clone(),
            count: removed,
            position,
            model,
        });
        log::debug!("Dropped '{}' x{} at {:?}", item_id, removed, position);

        // Refill the hand from another stack of the same item. Drops from
        // other slots leave the selection where the player put it.
        let still_selected = inventory.selected().map_or(false, |s| s.item_id == item_id);
        if from_selected && !still_selected {
            if let Some(slot) = inventory.find_item(&item_id) {
                inventory.select(slot);
            }
        }
        equipment.refill_after_drop(inventory, &item_id);

        DropOutcome::Dropped {
            item_id,
            count: removed,
            entity,
            position,
        }
    }
}
