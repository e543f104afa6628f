//! Pickup protocol for world items
//!
//! A candidate reported in range by the world is offered to the inventory
//! exactly once. Whether a partial fit splits the candidate or is refused
//! is decided by [`PickupOverflow`].

use crate::config::PickupOverflow;
use crate::inventory::Inventory;
use glam::Vec3;

/// World entity handle for spawned pickups
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldEntityId(pub u64);

/// A world item that can be absorbed into an inventory
#[derive(Debug, Clone, PartialEq)]
pub struct PickupCandidate {
    /// World entity
    pub entity: WorldEntityId,
    /// Item ID
    pub item_id: String,
    /// Quantity on the ground
    pub count: u32,
    /// World position
    pub position: Vec3,
    /// Set once fully collected, prevents double pickup
    pub picked: bool,
}

impl PickupCandidate {
    /// Create a new candidate
    pub fn new(entity: WorldEntityId, item_id: impl Into<String>, count: u32) -> Self {
        Self {
            entity,
            item_id: item_id.into(),
            count,
            position: Vec3::ZERO,
            picked: false,
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Check if a point is within `radius`
    pub fn in_range(&self, point: Vec3, radius: f32) -> bool {
        self.position.distance_squared(point) <= radius * radius
    }
}

/// Result of a pickup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupOutcome {
    /// Everything taken; the world entity should be removed
    Collected { item_id: String, count: u32 },
    /// Some taken; the candidate keeps the rest
    Partial { taken: u32, remaining: u32 },
    /// Nothing taken
    Rejected { remaining: u32 },
    /// Candidate was already collected
    AlreadyPicked,
}

impl PickupOutcome {
    /// Amount moved into the inventory
    pub fn taken(&self) -> u32 {
        match self {
            Self::Collected { count, .. } => *count,
            Self::Partial { taken, .. } => *taken,
            Self::Rejected { .. } | Self::AlreadyPicked => 0,
        }
    }

    /// Whether the world entity should be removed
    pub fn should_despawn(&self) -> bool {
        matches!(self, Self::Collected { .. })
    }
}

/// Converts pickup candidates into inventory contents
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupProtocol {
    overflow: PickupOverflow,
}

impl PickupProtocol {
    /// Create with an overflow policy
    pub fn new(overflow: PickupOverflow) -> Self {
        Self { overflow }
    }

    /// Overflow policy
    pub fn overflow(&self) -> PickupOverflow {
        self.overflow
    }

    /// Offer a candidate to the inventory
    ///
    /// Newly filled slots become selected.
    pub fn pickup(&self, candidate: &mut PickupCandidate, inventory: &mut Inventory) -> PickupOutcome {
        if candidate.picked {
            return PickupOutcome::AlreadyPicked;
        }

        if self.overflow == PickupOverflow::AllOrNothing
            && !inventory.can_add(&candidate.item_id, candidate.count)
        {
            log::warn!(
                "Inventory cannot hold '{}' x{}, leaving it in the world",
                candidate.item_id,
                candidate.count
            );
            return PickupOutcome::Rejected {
                remaining: candidate.count,
            };
        }

        let offered = candidate.count;
        let remainder = inventory.add_item(&candidate.item_id, offered, true);

        if remainder == 0 {
            candidate.picked = true;
            log::debug!("Picked up '{}' x{}", candidate.item_id, offered);
            return PickupOutcome::Collected {
                item_id: candidate.item_id.clone(),
                count: offered,
            };
        }

        candidate.count = remainder;
        let taken = offered - remainder;
        if taken == 0 {
            log::warn!("Inventory full, '{}' x{} stays in the world", candidate.item_id, remainder);
            PickupOutcome::Rejected { remaining: remainder }
        } else {
            log::warn!(
                "Picked up '{}' x{}, {} left in the world",
                candidate.item_id,
                taken,
                remainder
            );
            PickupOutcome::Partial {
                taken,
                remaining: remainder,
            }
        }
    }
}

/// Candidates currently inside the character's pickup trigger
#[derive(Debug, Clone, Default)]
pub struct PickupSensor {
    candidates: Vec<PickupCandidate>,
}

impl PickupSensor {
    /// Create an empty sensor
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger enter: track a candidate, ignoring collected ones
    pub fn on_enter(&mut self, candidate: PickupCandidate) -> bool {
        if candidate.picked {
            return false;
        }
        self.candidates.retain(|c| c.entity != candidate.entity);
        self.candidates.push(candidate);
        true
    }

    /// Trigger exit: stop tracking
    pub fn on_exit(&mut self, entity: WorldEntityId) -> Option<PickupCandidate> {
        let index = self.candidates.iter().position(|c| c.entity == entity)?;
        Some(self.candidates.remove(index))
    }

    /// Closest unpicked candidate within `radius` of `position`
    pub fn nearest(&self, position: Vec3, radius: f32) -> Option<WorldEntityId> {
        self.candidates
            .iter()
            .filter(|c| !c.picked && c.in_range(position, radius))
            .min_by(|a, b| {
                a.position
                    .distance_squared(position)
                    .total_cmp(&b.position.distance_squared(position))
            })
            .map(|c| c.entity)
    }

    /// Get a tracked candidate
    pub fn get(&self, entity: WorldEntityId) -> Option<&PickupCandidate> {
        self.candidates.iter().find(|c| c.entity == entity)
    }

    /// Get a tracked candidate mutably
    pub fn get_mut(&mut self, entity: WorldEntityId) -> Option<&mut PickupCandidate> {
        self.candidates.iter_mut().find(|c| c.entity == entity)
    }

    /// Number of tracked candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if nothing is in range
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
