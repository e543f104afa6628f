//! Homestead Inventory - Items, Inventory and Hand Equipment
//!
//! Per-character item storage for a survival/farming game, kept consistent
//! with what the character visibly holds and with pickup-eligible items in
//! the world.
//!
//! # Features
//!
//! - Item catalog loaded from TOML
//! - Fixed-capacity inventory with capped stacking and a selection cursor
//! - Change events for UI and other observers
//! - Hand equipment with exactly one visible representation
//! - Pickup and drop protocols against an engine-side world bridge
//! - Item actions (eat, plant, tool use, place)
//! - Rate-limited UI snapshots
//!
//! # Example
//!
//! ```ignore
//! use homestead_inventory::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ItemCatalog::load_from_file("data/items.toml")?);
//! let config = InventoryConfig::load_or_default("data/inventory.toml");
//!
//! let mut player = InventoryController::new(config, catalog, HeadlessHand::new());
//! player.inventory_mut().add_item("apple", 3, true);
//!
//! // Each frame
//! if let Some(snapshot) = player.tick(dt) {
//!     hud.update(&snapshot);
//! }
//! ```

pub mod actions;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod drop;
pub mod equipment;
pub mod error;
pub mod events;
pub mod farming;
pub mod headless;
pub mod inventory;
pub mod item;
pub mod pickup;
pub mod snapshot;

pub mod prelude {
    pub use crate::actions::{
        ActionContext, ActionHost, ActionOutcome, ItemAction, ItemActionRegistry,
    };
    pub use crate::catalog::ItemCatalog;
    pub use crate::config::{InventoryConfig, PickupOverflow, PlantingConfig};
    pub use crate::controller::{
        CommandResult, HotkeyMap, InventoryCommand, InventoryController, InventoryHolder, Key,
        KeyPress,
    };
    pub use crate::drop::{ActorPose, DropOutcome, DropProtocol, DropSettings, SpawnRequest, WorldBridge};
    pub use crate::equipment::{CycleDirection, EquipmentSync, HandPresenter, HeldSource, RepresentationId};
    pub use crate::error::{CatalogError, ConfigError};
    pub use crate::events::{InventoryEvent, InventoryListener, SubscriberId};
    pub use crate::farming::{deposit_harvest, HarvestYield, PlantingRules};
    pub use crate::headless::{HeadlessHand, HeadlessWorld};
    pub use crate::inventory::Inventory;
    pub use crate::item::{ItemActionType, ItemCategory, ItemDefinition, ItemStack};
    pub use crate::pickup::{PickupCandidate, PickupOutcome, PickupProtocol, PickupSensor, WorldEntityId};
    pub use crate::snapshot::{HeldSnapshot, InventorySnapshot, SlotView, SnapshotPoller};
}

pub use prelude::*;
