//! Hand equipment sync
//!
//! Keeps exactly one world-visible "held" representation consistent with
//! the inventory, either following the selected slot or an explicit
//! equip/cycle command. The inventory is borrowed per call; the hand anchor
//! is reached only through [`HandPresenter`].

use crate::catalog::ItemCatalog;
use crate::inventory::Inventory;
use std::sync::Arc;

/// Handle to a representation node under the hand anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepresentationId(pub u64);

/// Scene-side hand anchor
pub trait HandPresenter {
    /// Instantiate a hidden representation of an item from an asset
    fn instantiate(&mut self, item_id: &str, asset: &str) -> Option<RepresentationId>;
    /// Make a representation visible
    fn show(&mut self, id: RepresentationId);
    /// Hide a representation, keeping it alive
    fn hide(&mut self, id: RepresentationId);
    /// Destroy a representation
    fn destroy(&mut self, id: RepresentationId);
}

/// Direction for cycling the held item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Prev,
}

impl CycleDirection {
    /// From a signed step (+1 / -1)
    pub fn from_step(step: i32) -> Self {
        if step < 0 {
            Self::Prev
        } else {
            Self::Next
        }
    }
}

/// What drives the held item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldSource {
    /// Mirror the selected slot
    Selection,
    /// Set by cycling or explicit equip; selection is ignored
    Manual,
}

impl Default for HeldSource {
    fn default() -> Self {
        Self::Selection
    }
}

/// Mediator between inventory contents and the hand anchor
pub struct EquipmentSync<H: HandPresenter> {
    presenter: H,
    catalog: Arc<ItemCatalog>,
    /// Logical held item
    held_id: Option<String>,
    /// The single visible representation
    active: Option<RepresentationId>,
    /// Hidden representations kept for reuse
    cached: Vec<(String, RepresentationId)>,
    source: HeldSource,
}

impl<H: HandPresenter> EquipmentSync<H> {
    /// Create with an empty hand
    pub fn new(presenter: H, catalog: Arc<ItemCatalog>) -> Self {
        Self {
            presenter,
            catalog,
            held_id: None,
            active: None,
            cached: Vec::new(),
            source: HeldSource::default(),
        }
    }

    /// Held item id
    pub fn held_id(&self) -> Option<&str> {
        self.held_id.as_deref()
    }

    /// Visible representation, if any
    pub fn active_representation(&self) -> Option<RepresentationId> {
        self.active
    }

    /// Number of hidden representations kept for reuse
    pub fn cached_count(&self) -> usize {
        self.cached.len()
    }

    /// Current sync source
    pub fn source(&self) -> HeldSource {
        self.source
    }

    /// Hand anchor
    pub fn presenter(&self) -> &H {
        &self.presenter
    }

    /// Mutable hand anchor
    pub fn presenter_mut(&mut self) -> &mut H {
        &mut self.presenter
    }

    /// Switch back to mirroring the selection and sync immediately
    pub fn follow_selection(&mut self, inventory: &Inventory) -> bool {
        self.source = HeldSource::Selection;
        self.sync_to_selection(inventory)
    }

    /// Mirror the selected slot
    ///
    /// Returns true if the held item changed. Does nothing when the
    /// selected id already matches the held id.
    pub fn sync_to_selection(&mut self, inventory: &Inventory) -> bool {
        let selected = inventory.selected().map(|s| s.item_id.as_str());
        if selected == self.held_id.as_deref() {
            return false;
        }
        match selected {
            Some(id) => self.show_item(id),
            None => self.clear_held(),
        }
        true
    }

    /// Equip a specific item
    ///
    /// Fails without touching the hand when the inventory holds none.
    pub fn equip_by_id(&mut self, inventory: &Inventory, item_id: &str) -> bool {
        if inventory.item_count(item_id) == 0 {
            log::debug!("Cannot equip '{}': none in inventory", item_id);
            return false;
        }
        self.source = HeldSource::Manual;
        if self.held_id.as_deref() != Some(item_id) {
            self.show_item(item_id);
        }
        true
    }

    /// Cycle the held item over the distinct ids in the inventory
    ///
    /// Independent of slot selection. An empty inventory clears the hand.
    pub fn cycle_held(&mut self, inventory: &Inventory, direction: CycleDirection) -> Option<&str> {
        self.source = HeldSource::Manual;
        let ids = inventory.distinct_item_ids();
        if ids.is_empty() {
            self.clear_held();
            self.prune_cache(inventory);
            return None;
        }

        let len = ids.len();
        let current = self
            .held_id
            .as_deref()
            .and_then(|held| ids.iter().position(|id| *id == held));
        let next = match (current, direction) {
            (Some(i), CycleDirection::Next) => (i + 1) % len,
            (Some(i), CycleDirection::Prev) => (i + len - 1) % len,
            (None, CycleDirection::Next) => 0,
            (None, CycleDirection::Prev) => len - 1,
        };

        if Some(next) != current {
            self.show_item(ids[next]);
        }
        self.held_id()
    }

    /// Reconcile the hand after items of `item_id` were dropped
    ///
    /// Keeps a representation in hand while copies remain.
    pub fn refill_after_drop(&mut self, inventory: &Inventory, item_id: &str) {
        match self.source {
            HeldSource::Selection => {
                self.sync_to_selection(inventory);
            }
            HeldSource::Manual => {
                if self.held_id.as_deref() == Some(item_id) && inventory.item_count(item_id) == 0 {
                    self.clear_held();
                }
            }
        }
        self.prune_cache(inventory);
    }

    /// Per-frame reconciliation
    ///
    /// Safe to call every tick: clears a held item that ran out, destroys
    /// cached representations of items no longer owned and, when following
    /// the selection, mirrors it.
    pub fn tick(&mut self, inventory: &Inventory) {
        if let Some(held) = self.held_id.as_deref() {
            if inventory.item_count(held) == 0 {
                log::debug!("Held item '{}' ran out", held);
                self.clear_held();
            }
        }
        self.prune_cache(inventory);
        if self.source == HeldSource::Selection {
            self.sync_to_selection(inventory);
        }
    }

    /// Empty the hand, keeping the representation hidden for reuse
    pub fn clear_held(&mut self) {
        self.stash_active();
        self.held_id = None;
    }

    /// Destroy every representation under the hand anchor
    pub fn clear(&mut self) {
        if let Some(active) = self.active.take() {
            self.presenter.destroy(active);
        }
        for (_, id) in self.cached.drain(..) {
            self.presenter.destroy(id);
        }
        self.held_id = None;
    }

    fn stash_active(&mut self) {
        if let Some(active) = self.active.take() {
            self.presenter.hide(active);
            if let Some(held) = self.held_id.clone() {
                self.cached.push((held, active));
            } else {
                self.presenter.destroy(active);
            }
        }
    }

    /// Hide the old representation, then show one for `item_id`
    fn show_item(&mut self, item_id: &str) {
        self.stash_active();
        self.held_id = Some(item_id.to_string());

        if let Some(pos) = self.cached.iter().position(|(id, _)| id == item_id) {
            let (_, representation) = self.cached.remove(pos);
            self.presenter.show(representation);
            self.active = Some(representation);
            log::debug!("Equipped '{}' (reused representation)", item_id);
            return;
        }

        let asset = self.catalog.get(item_id).and_then(|d| d.hand_asset());
        let Some(asset) = asset else {
            log::warn!("Item '{}' has no hand or world model, equipping without one", item_id);
            return;
        };

        match self.presenter.instantiate(item_id, asset) {
            Some(representation) => {
                self.presenter.show(representation);
                self.active = Some(representation);
                log::debug!("Equipped '{}' ({})", item_id, asset);
            }
            None => {
                log::warn!("Failed to instantiate '{}' for '{}'", asset, item_id);
            }
        }
    }

    fn prune_cache(&mut self, inventory: &Inventory) {
        let presenter = &mut self.presenter;
        self.cached.retain(|(id, representation)| {
            let keep = inventory.item_count(id) > 0;
            if !keep {
                presenter.destroy(*representation);
            }
            keep
        });
    }
}

impl<H: HandPresenter + std::fmt::Debug> std::fmt::Debug for EquipmentSync<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EquipmentSync")
            .field("held_id", &self.held_id)
            .field("active", &self.active)
            .field("cached", &self.cached)
            .field("source", &self.source)
            .field("presenter", &self.presenter)
            .finish()
    }
}
