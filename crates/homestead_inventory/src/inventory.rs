//! Inventory component
//!
//! Fixed-capacity slot storage with a selection cursor. This is the only
//! code path that mutates stack counts. Every operation is total: bad slot
//! indices and unknown ids degrade to `false`/`0`/full remainder.
//!
//! Stacking is capped: same-id stacks are topped up to the catalog's
//! `max_stack` first, then new stacks are opened in empty slots.
//!
//! Invariant: `selected` is `None` or points at a non-empty slot after
//! every mutating call.

use crate::catalog::ItemCatalog;
use crate::events::{InventoryEvent, ListenerList, SubscriberId};
use crate::item::ItemStack;
use std::sync::Arc;

/// Inventory component
#[derive(Debug)]
pub struct Inventory {
    /// Inventory slots (None = empty)
    slots: Vec<Option<ItemStack>>,
    /// Number of slots
    capacity: usize,
    /// Selected slot
    selected: Option<usize>,
    /// Item definitions for stack size lookup
    catalog: Arc<ItemCatalog>,
    /// Bumped on every observable change
    revision: u64,
    listeners: ListenerList,
    pending: Vec<InventoryEvent>,
}

impl Inventory {
    /// Create a new inventory with given capacity
    pub fn new(capacity: usize, catalog: Arc<ItemCatalog>) -> Self {
        Self {
            slots: vec![None; capacity],
            capacity,
            selected: None,
            catalog,
            revision: 0,
            listeners: ListenerList::default(),
            pending: Vec::new(),
        }
    }

    /// Item catalog backing this inventory
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Get inventory capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change counter, increases whenever contents or selection change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get number of used slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Get number of free slots
    pub fn free_slots(&self) -> usize {
        self.capacity - self.used_slots()
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Check if inventory is empty
    pub fn is_empty(&self) -> bool {
        self.used_slots() == 0
    }

    /// Get slot contents
    pub fn slot(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    /// All slots in order
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Occupied slots as (index, stack)
    pub fn items(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|stack| (i, stack)))
    }

    /// Find first slot containing an item
    pub fn find_item(&self, item_id: &str) -> Option<usize> {
        self.items()
            .find(|(_, stack)| stack.item_id == item_id)
            .map(|(i, _)| i)
    }

    /// Count total quantity of an item, saturating at `u32::MAX`
    pub fn item_count(&self, item_id: &str) -> u32 {
        self.items()
            .filter(|(_, stack)| stack.item_id == item_id)
            .fold(0u32, |total, (_, stack)| total.saturating_add(stack.count))
    }

    /// Distinct item ids in first-seen slot order
    pub fn distinct_item_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for (_, stack) in self.items() {
            if !ids.contains(&stack.item_id.as_str()) {
                ids.push(&stack.item_id);
            }
        }
        ids
    }

    /// Selected slot index
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Stack in the selected slot
    pub fn selected(&self) -> Option<&ItemStack> {
        self.slot(self.selected?)
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: FnMut(&InventoryEvent) + Send + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Remove a change listener
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Check whether `amount` of an item would fit completely
    pub fn can_add(&self, item_id: &str, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }
        let Some(max_stack) = self.catalog.max_stack(item_id) else {
            return false;
        };

        let mut remaining = amount;
        for (_, stack) in self.items() {
            if stack.item_id == item_id {
                remaining = remaining.saturating_sub(stack.space(max_stack));
            }
        }
        if remaining == 0 {
            return true;
        }

        let stacks_needed = remaining.div_ceil(max_stack);
        self.free_slots() >= stacks_needed as usize
    }

    /// Add items, returning the amount that did not fit
    ///
    /// With `select_new`, the last slot that received items becomes the
    /// selection.
    pub fn add_item(&mut self, item_id: &str, count: u32, select_new: bool) -> u32 {
        if count == 0 {
            return 0;
        }
        let previous = self.selected;

        let Some(max_stack) = self.catalog.max_stack(item_id) else {
            log::warn!("Refusing to add unknown item '{}' x{}", item_id, count);
            self.pending.push(InventoryEvent::Full {
                item_id: item_id.to_string(),
                overflow: count,
            });
            self.finish(previous);
            return count;
        };

        let mut remaining = count;
        let mut last_slot = None;

        // Top up existing stacks
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item_id == item_id && stack.count < max_stack {
                    let before = remaining;
                    remaining = stack.add(remaining, max_stack);
                    self.pending.push(InventoryEvent::ItemAdded {
                        slot: index,
                        item_id: item_id.to_string(),
                        quantity: before - remaining,
                    });
                    last_slot = Some(index);
                }
            }
        }

        // Open new stacks in empty slots
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let amount = remaining.min(max_stack);
                *slot = self.catalog.new_stack(item_id, amount);
                remaining -= amount;
                self.pending.push(InventoryEvent::ItemAdded {
                    slot: index,
                    item_id: item_id.to_string(),
                    quantity: amount,
                });
                last_slot = Some(index);
            }
        }

        if remaining > 0 {
            log::debug!("Inventory full: '{}' overflow {}", item_id, remaining);
            self.pending.push(InventoryEvent::Full {
                item_id: item_id.to_string(),
                overflow: remaining,
            });
        }

        if select_new {
            if let Some(index) = last_slot {
                self.selected = Some(index);
            }
        }

        self.validate_selection();
        self.finish(previous);
        remaining
    }

    /// Remove items by id, scanning slots in order
    ///
    /// Returns the amount actually removed.
    pub fn remove_item(&mut self, item_id: &str, count: u32) -> u32 {
        let previous = self.selected;
        let mut remaining = count;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item_id == item_id {
                    let removed = stack.remove(remaining);
                    remaining -= removed;
                    self.pending.push(InventoryEvent::ItemRemoved {
                        slot: index,
                        item_id: item_id.to_string(),
                        quantity: removed,
                    });
                    if stack.is_empty() {
                        *slot = None;
                    }
                }
            }
        }

        self.validate_selection();
        self.finish(previous);
        count - remaining
    }

    /// Remove up to `count` from one slot
    ///
    /// Out-of-range or empty slots remove nothing.
    pub fn remove_at(&mut self, index: usize, count: u32) -> u32 {
        let previous = self.selected;
        let Some(slot) = self.slots.get_mut(index) else {
            return 0;
        };
        let Some(stack) = slot else {
            return 0;
        };

        let removed = stack.remove(count);
        if removed > 0 {
            self.pending.push(InventoryEvent::ItemRemoved {
                slot: index,
                item_id: stack.item_id.clone(),
                quantity: removed,
            });
        }
        if stack.is_empty() {
            *slot = None;
        }

        self.validate_selection();
        self.finish(previous);
        removed
    }

    /// Wear the tool in a slot, returning the remaining durability
    pub fn wear_at(&mut self, index: usize, amount: f32) -> Option<f32> {
        let previous = self.selected;
        let stack = self.slots.get_mut(index)?.as_mut()?;
        let before = stack.durability;
        stack.wear(amount);
        let durability = stack.durability;
        if durability != before {
            self.pending.push(InventoryEvent::DurabilityChanged {
                slot: index,
                item_id: stack.item_id.clone(),
                durability,
            });
        }
        self.finish(previous);
        Some(durability)
    }

    /// Swap two slots; the selection follows its stack
    pub fn swap_slots(&mut self, slot_a: usize, slot_b: usize) -> bool {
        if slot_a >= self.capacity || slot_b >= self.capacity || slot_a == slot_b {
            return false;
        }
        let previous = self.selected;

        self.slots.swap(slot_a, slot_b);
        self.selected = match self.selected {
            Some(i) if i == slot_a => Some(slot_b),
            Some(i) if i == slot_b => Some(slot_a),
            other => other,
        };
        self.pending
            .push(InventoryEvent::SlotsSwapped { slot_a, slot_b });

        self.validate_selection();
        self.finish(previous);
        true
    }

    /// Select a slot
    ///
    /// Selecting an out-of-range or empty slot clears the selection.
    pub fn select(&mut self, index: usize) -> bool {
        let previous = self.selected;
        let ok = self.slot(index).is_some();
        self.selected = if ok { Some(index) } else { None };
        self.finish(previous);
        ok
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        let previous = self.selected;
        self.selected = None;
        self.finish(previous);
    }

    /// Select the next non-empty slot, wrapping
    pub fn select_next(&mut self) {
        self.step_selection(true);
    }

    /// Select the previous non-empty slot, wrapping
    pub fn select_prev(&mut self) {
        self.step_selection(false);
    }

    fn step_selection(&mut self, forward: bool) {
        let len = self.slots.len();
        if len == 0 {
            return;
        }
        let previous = self.selected;

        // With no selection, stepping forward starts at slot 0 and stepping
        // back starts at the last slot.
        let mut cursor = match (self.selected, forward) {
            (Some(i), _) => i,
            (None, true) => len - 1,
            (None, false) => 0,
        };

        self.selected = None;
        for _ in 0..len {
            cursor = if forward {
                (cursor + 1) % len
            } else {
                (cursor + len - 1) % len
            };
            if self.slots[cursor].is_some() {
                self.selected = Some(cursor);
                break;
            }
        }

        self.finish(previous);
    }

    /// Repair the selection after a structural change
    ///
    /// Keeps a valid selection, otherwise selects the first non-empty slot,
    /// otherwise clears it.
    pub fn ensure_selected_valid(&mut self) {
        let previous = self.selected;
        self.validate_selection();
        self.finish(previous);
    }

    fn validate_selection(&mut self) {
        let valid = self
            .selected
            .map_or(false, |i| self.slots.get(i).map_or(false, Option::is_some));
        if !valid {
            self.selected = self.slots.iter().position(Option::is_some);
        }
        debug_assert!(
            self.selected.map_or(true, |i| self.slots[i].is_some()),
            "selection points at an empty slot"
        );
    }

    /// Emit queued events and selection change
    fn finish(&mut self, previous: Option<usize>) {
        if self.selected != previous {
            self.pending.push(InventoryEvent::SelectionChanged {
                previous,
                current: self.selected,
            });
        }
        if self.pending.is_empty() {
            return;
        }
        self.revision += 1;
        let events = std::mem::take(&mut self.pending);
        self.listeners.dispatch(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDefinition;
    use parking_lot::Mutex;

    fn catalog() -> Arc<ItemCatalog> {
        Arc::new(ItemCatalog::from_definitions(vec![
            ItemDefinition::new("apple", "Apple").with_max_stack(10),
            ItemDefinition::new("banana", "Banana").with_max_stack(5),
            ItemDefinition::new("hoe", "Hoe").with_max_stack(1),
            ItemDefinition::new("wheat_seed", "Wheat Seed").with_max_stack(99),
        ]))
    }

    fn inventory(capacity: usize) -> Inventory {
        Inventory::new(capacity, catalog())
    }

    #[test]
    fn test_inventory_creation() {
        let inv = inventory(10);

        assert_eq!(inv.capacity(), 10);
        assert_eq!(inv.used_slots(), 0);
        assert!(inv.is_empty());
        assert_eq!(inv.selected_index(), None);
    }

    #[test]
    fn test_add_item_selects_slot() {
        let mut inv = inventory(5);

        let remainder = inv.add_item("apple", 3, true);
        assert_eq!(remainder, 0);
        assert_eq!(inv.used_slots(), 1);
        assert_eq!(inv.slot(0).unwrap().count, 3);
        assert_eq!(inv.selected_index(), Some(0));
    }

    #[test]
    fn test_stacking_is_capped() {
        let mut inv = inventory(5);

        inv.add_item("apple", 3, true);
        inv.add_item("apple", 8, true);

        assert_eq!(inv.slot(0).unwrap().count, 10);
        assert_eq!(inv.slot(1).unwrap().count, 1);
        assert_eq!(inv.item_count("apple"), 11);
        // last slot that received items
        assert_eq!(inv.selected_index(), Some(1));
    }

    #[test]
    fn test_overflow() {
        let mut inv = inventory(2);

        let overflow = inv.add_item("banana", 14, true);

        assert_eq!(overflow, 4);
        assert_eq!(inv.item_count("banana"), 10);
        assert!(inv.is_full());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut inv = inventory(3);

        assert_eq!(inv.add_item("mystery", 4, true), 4);
        assert!(inv.is_empty());
        assert_eq!(inv.selected_index(), None);
    }

    #[test]
    fn test_add_without_select_keeps_selection() {
        let mut inv = inventory(5);

        inv.add_item("apple", 1, true);
        inv.add_item("banana", 1, false);

        assert_eq!(inv.selected_index(), Some(0));
    }

    #[test]
    fn test_remove_item_spans_slots() {
        let mut inv = inventory(5);
        inv.add_item("banana", 7, true);

        let removed = inv.remove_item("banana", 6);

        assert_eq!(removed, 6);
        assert_eq!(inv.item_count("banana"), 1);
        assert!(inv.slot(0).is_none());
        assert_eq!(inv.slot(1).unwrap().count, 1);
        assert_eq!(inv.selected_index(), Some(1));
    }

    #[test]
    fn test_remove_more_than_owned() {
        let mut inv = inventory(5);
        inv.add_item("apple", 2, true);

        assert_eq!(inv.remove_item("apple", 5), 2);
        assert!(inv.is_empty());
        assert_eq!(inv.selected_index(), None);
    }

    #[test]
    fn test_remove_at_targets_one_slot() {
        let mut inv = inventory(5);
        inv.add_item("banana", 5, true);
        inv.add_item("banana", 3, true);

        assert_eq!(inv.remove_at(1, 10), 3);
        assert_eq!(inv.slot(0).unwrap().count, 5);
        assert!(inv.slot(1).is_none());
    }

    #[test]
    fn test_remove_at_invalid_is_noop() {
        let mut inv = inventory(2);
        inv.add_item("apple", 1, true);
        let revision = inv.revision();

        assert_eq!(inv.remove_at(1, 1), 0);
        assert_eq!(inv.remove_at(7, 1), 0);
        assert_eq!(inv.revision(), revision);
    }

    #[test]
    fn test_select_invalid_clears_selection() {
        let mut inv = inventory(3);
        inv.add_item("apple", 1, true);

        assert!(!inv.select(2));
        assert_eq!(inv.selected_index(), None);
        assert!(inv.select(0));
        assert!(!inv.select(99));
        assert_eq!(inv.selected_index(), None);
    }

    #[test]
    fn test_select_next_and_prev_skip_empty() {
        let mut inv = inventory(5);
        inv.add_item("apple", 1, true);
        inv.add_item("hoe", 1, true);
        inv.add_item("hoe", 1, true);
        inv.remove_at(1, 1);
        // slots: apple, -, hoe, -, -
        inv.select(0);

        inv.select_next();
        assert_eq!(inv.selected_index(), Some(2));
        inv.select_next();
        assert_eq!(inv.selected_index(), Some(0));
        inv.select_prev();
        assert_eq!(inv.selected_index(), Some(2));
    }

    #[test]
    fn test_cycle_from_no_selection() {
        let mut inv = inventory(4);
        inv.add_item("hoe", 3, false);
        inv.clear_selection();

        inv.select_next();
        assert_eq!(inv.selected_index(), Some(0));

        inv.clear_selection();
        inv.select_prev();
        assert_eq!(inv.selected_index(), Some(2));
    }

    #[test]
    fn test_cycle_on_empty_inventory() {
        let mut inv = inventory(4);
        inv.select_next();
        assert_eq!(inv.selected_index(), None);
        inv.select_prev();
        assert_eq!(inv.selected_index(), None);
    }

    #[test]
    fn test_ensure_selected_valid_picks_first() {
        let mut inv = inventory(4);
        inv.add_item("hoe", 2, true);
        inv.clear_selection();

        inv.ensure_selected_valid();
        assert_eq!(inv.selected_index(), Some(0));
    }

    #[test]
    fn test_swap_slots_selection_follows() {
        let mut inv = inventory(5);

        inv.add_item("hoe", 1, true);
        inv.add_item("apple", 1, false);

        assert!(inv.swap_slots(0, 1));

        assert_eq!(inv.slot(0).unwrap().item_id, "apple");
        assert_eq!(inv.slot(1).unwrap().item_id, "hoe");
        assert_eq!(inv.selected_index(), Some(1));
        assert!(!inv.swap_slots(0, 9));
    }

    #[test]
    fn test_can_add() {
        let mut inv = inventory(2);
        inv.add_item("banana", 3, true);

        assert!(inv.can_add("banana", 7));
        assert!(!inv.can_add("banana", 8));
        assert!(!inv.can_add("mystery", 1));
        assert!(inv.can_add("mystery", 0));
    }

    #[test]
    fn test_distinct_item_ids_first_seen_order() {
        let mut inv = inventory(5);
        inv.add_item("banana", 6, true);
        inv.add_item("apple", 1, true);
        inv.remove_at(0, 5);
        inv.add_item("hoe", 1, true);

        // slots: hoe, banana, apple
        assert_eq!(inv.distinct_item_ids(), vec!["hoe", "banana", "apple"]);
    }

    #[test]
    fn test_listeners_receive_events() {
        let mut inv = inventory(1);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        inv.subscribe(move |event| sink.lock().push(event.clone()));

        inv.add_item("apple", 12, true);

        let events = log.lock();
        assert_eq!(
            *events,
            vec![
                InventoryEvent::ItemAdded {
                    slot: 0,
                    item_id: "apple".into(),
                    quantity: 10
                },
                InventoryEvent::Full {
                    item_id: "apple".into(),
                    overflow: 2
                },
                InventoryEvent::SelectionChanged {
                    previous: None,
                    current: Some(0)
                },
            ]
        );
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut inv = inventory(3);
        let start = inv.revision();

        inv.add_item("apple", 1, true);
        assert!(inv.revision() > start);

        let after_add = inv.revision();
        inv.select(0); // already selected
        assert_eq!(inv.revision(), after_add);
    }

    #[test]
    fn test_item_count_saturates() {
        let catalog = Arc::new(ItemCatalog::from_definitions(vec![
            ItemDefinition::new("sand", "Sand").with_max_stack(u32::MAX),
        ]));
        let mut inv = Inventory::new(2, catalog);

        assert_eq!(inv.add_item("sand", u32::MAX, true), 0);
        assert_eq!(inv.add_item("sand", 5, true), 0);

        assert_eq!(inv.used_slots(), 2);
        assert_eq!(inv.item_count("sand"), u32::MAX);
    }

    #[test]
    fn test_wear_notifies_listeners() {
        let catalog = Arc::new(ItemCatalog::from_definitions(vec![
            ItemDefinition::new("hoe", "Hoe").with_max_durability(2.0),
        ]));
        let mut inv = Inventory::new(2, catalog);
        inv.add_item("hoe", 1, true);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        inv.subscribe(move |event| sink.lock().push(event.clone()));
        let before = inv.revision();

        assert_eq!(inv.wear_at(0, 1.0), Some(1.0));
        assert!(inv.revision() > before);
        assert_eq!(
            *log.lock(),
            vec![InventoryEvent::DurabilityChanged {
                slot: 0,
                item_id: "hoe".into(),
                durability: 1.0
            }]
        );

        // Empty slots report nothing
        assert_eq!(inv.wear_at(1, 1.0), None);
        assert_eq!(log.lock().len(), 1);
    }
}
