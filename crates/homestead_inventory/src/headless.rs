//! In-memory collaborators
//!
//! Scene-free implementations of [`HandPresenter`] and [`WorldBridge`] for
//! dedicated servers, tooling and tests. They record enough state to check
//! the hand and world invariants.

use crate::drop::{SpawnRequest, WorldBridge};
use crate::equipment::{HandPresenter, RepresentationId};
use crate::pickup::{PickupCandidate, WorldEntityId};
use std::collections::BTreeMap;

/// A representation node under the hand anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandNode {
    pub item_id: String,
    pub asset: String,
    pub visible: bool,
}

/// Hand anchor without a scene graph
#[derive(Debug, Default)]
pub struct HeadlessHand {
    nodes: BTreeMap<RepresentationId, HandNode>,
    next_id: u64,
    instantiated: usize,
    max_visible_seen: usize,
}

impl HeadlessHand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item ids of visible nodes
    pub fn visible_items(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.visible)
            .map(|n| n.item_id.as_str())
            .collect()
    }

    /// Nodes alive under the anchor, visible or not
    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total instantiations so far
    pub fn instantiated(&self) -> usize {
        self.instantiated
    }

    /// Highest number of simultaneously visible nodes ever observed
    pub fn max_visible_seen(&self) -> usize {
        self.max_visible_seen
    }

    pub fn node(&self, id: RepresentationId) -> Option<&HandNode> {
        self.nodes.get(&id)
    }
}

impl HandPresenter for HeadlessHand {
    fn instantiate(&mut self, item_id: &str, asset: &str) -> Option<RepresentationId> {
        self.next_id += 1;
        let id = RepresentationId(self.next_id);
        self.nodes.insert(
            id,
            HandNode {
                item_id: item_id.to_string(),
                asset: asset.to_string(),
                visible: false,
            },
        );
        self.instantiated += 1;
        Some(id)
    }

    fn show(&mut self, id: RepresentationId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = true;
        }
        let visible = self.nodes.values().filter(|n| n.visible).count();
        self.max_visible_seen = self.max_visible_seen.max(visible);
    }

    fn hide(&mut self, id: RepresentationId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = false;
        }
    }

    fn destroy(&mut self, id: RepresentationId) {
        self.nodes.remove(&id);
    }
}

/// A pickup entity living in the headless world
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPickup {
    pub item_id: String,
    pub count: u32,
    pub position: glam::Vec3,
    pub model: Option<String>,
}

impl WorldPickup {
    /// Candidate view for the pickup protocol
    pub fn candidate(&self, entity: WorldEntityId) -> PickupCandidate {
        PickupCandidate::new(entity, self.item_id.clone(), self.count).with_position(self.position)
    }
}

/// World without physics or rendering
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    pickups: BTreeMap<WorldEntityId, WorldPickup>,
    next_id: u64,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// All live pickups in spawn order
    pub fn pickups(&self) -> impl Iterator<Item = (WorldEntityId, &WorldPickup)> {
        self.pickups.iter().map(|(id, p)| (*id, p))
    }

    pub fn get(&self, entity: WorldEntityId) -> Option<&WorldPickup> {
        self.pickups.get(&entity)
    }

    /// Total units of an item lying in the world
    pub fn item_count(&self, item_id: &str) -> u32 {
        self.pickups
            .values()
            .filter(|p| p.item_id == item_id)
            .map(|p| p.count)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }
}

impl WorldBridge for HeadlessWorld {
    fn spawn_pickup(&mut self, request: SpawnRequest) -> WorldEntityId {
        self.next_id += 1;
        let entity = WorldEntityId(self.next_id);
        self.pickups.insert(
            entity,
            WorldPickup {
                item_id: request.item_id,
                count: request.count,
                position: request.position,
                model: request.model,
            },
        );
        entity
    }

    fn despawn_pickup(&mut self, entity: WorldEntityId) {
        self.pickups.remove(&entity);
    }

    fn update_pickup_count(&mut self, entity: WorldEntityId, count: u32) {
        if let Some(pickup) = self.pickups.get_mut(&entity) {
            pickup.count = count;
        }
    }
}
