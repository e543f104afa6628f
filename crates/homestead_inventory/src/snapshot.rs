//! UI snapshots
//!
//! Read-only views of the inventory and hand for HUD code. Pull them with a
//! [`SnapshotPoller`] on the UI's own cadence, or subscribe to inventory
//! events for push updates.

use crate::equipment::{EquipmentSync, HandPresenter};
use crate::inventory::Inventory;
use serde::Serialize;

/// One occupied slot as shown in the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub item_id: String,
    pub display_name: String,
    pub count: u32,
}

/// Inventory contents at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InventorySnapshot {
    /// One entry per slot, `None` for empty slots
    pub slots: Vec<Option<SlotView>>,
    /// Selected slot
    pub selected: Option<usize>,
    /// Inventory revision this was taken at
    pub revision: u64,
}

impl InventorySnapshot {
    /// Capture the current contents
    pub fn capture(inventory: &Inventory) -> Self {
        let catalog = inventory.catalog();
        let slots = inventory
            .slots()
            .iter()
            .map(|slot| {
                slot.as_ref().map(|stack| SlotView {
                    item_id: stack.item_id.clone(),
                    display_name: catalog
                        .get(&stack.item_id)
                        .map_or_else(|| stack.item_id.clone(), |d| d.label().to_string()),
                    count: stack.count,
                })
            })
            .collect();

        Self {
            slots,
            selected: inventory.selected_index(),
            revision: inventory.revision(),
        }
    }

    /// Selected slot view
    pub fn selected_view(&self) -> Option<&SlotView> {
        self.slots.get(self.selected?)?.as_ref()
    }

    /// Number of occupied slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// What the hand holds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HeldSnapshot {
    pub held_id: Option<String>,
}

impl HeldSnapshot {
    /// Capture the held item
    pub fn capture<H: HandPresenter>(equipment: &EquipmentSync<H>) -> Self {
        Self {
            held_id: equipment.held_id().map(str::to_string),
        }
    }
}

/// Rate-limited snapshot source
#[derive(Debug, Clone)]
pub struct SnapshotPoller {
    interval: f32,
    elapsed: f32,
    last_revision: Option<u64>,
}

impl SnapshotPoller {
    /// Create with an interval in seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(crate::config::MIN_UI_REFRESH_INTERVAL),
            elapsed: 0.0,
            last_revision: None,
        }
    }

    /// Polling interval in seconds
    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance by `dt` seconds
    ///
    /// Returns a snapshot once per interval, and only when the inventory
    /// changed since the last one. The first poll always emits.
    pub fn tick(&mut self, dt: f32, inventory: &Inventory) -> Option<InventorySnapshot> {
        self.elapsed += dt.max(0.0);
        if self.last_revision.is_some() && self.elapsed < self.interval {
            return None;
        }
        self.elapsed = 0.0;

        let revision = inventory.revision();
        if self.last_revision == Some(revision) {
            return None;
        }
        self.last_revision = Some(revision);
        Some(InventorySnapshot::capture(inventory))
    }

    /// Emit on the next tick regardless of revision
    pub fn invalidate(&mut self) {
        self.last_revision = None;
    }
}
