//! Farming glue
//!
//! Which items go into the ground, where, and how harvested crops come back
//! out as world pickups.

use crate::catalog::ItemCatalog;
use crate::config::PlantingConfig;
use crate::drop::{ActorPose, SpawnRequest, WorldBridge};
use crate::pickup::WorldEntityId;
use glam::Vec3;
use std::collections::BTreeSet;

/// Height of the first harvested pickup above the crop
pub const HARVEST_BASE_LIFT: f32 = 0.1;
/// Extra height per additional pickup so they don't overlap
pub const HARVEST_STACK_LIFT: f32 = 0.02;

/// Planting rules
#[derive(Debug, Clone, PartialEq)]
pub struct PlantingRules {
    plantable: BTreeSet<String>,
    plant_distance: f32,
}

impl PlantingRules {
    /// Create rules for a set of plantable ids
    pub fn new<I, S>(plantable: I, plant_distance: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plantable: plantable.into_iter().map(Into::into).collect(),
            plant_distance,
        }
    }

    /// Build from config
    pub fn from_config(config: &PlantingConfig) -> Self {
        Self::new(config.plantable.iter().cloned(), config.plant_distance)
    }

    /// Check if an item can be planted
    pub fn can_plant(&self, item_id: &str) -> bool {
        self.plantable.contains(item_id)
    }

    /// Distance in front of the actor
    pub fn plant_distance(&self) -> f32 {
        self.plant_distance
    }

    /// Where a crop goes, at the actor's height
    ///
    /// The host snaps it to the terrain.
    pub fn plant_position(&self, pose: &ActorPose) -> Vec3 {
        pose.point_ahead(self.plant_distance, pose.position.y)
    }
}

impl Default for PlantingRules {
    fn default() -> Self {
        Self::from_config(&PlantingConfig::default())
    }
}

/// A finished crop's output
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestYield {
    /// Produced item
    pub item_id: String,
    /// Number of units
    pub count: u32,
    /// Crop position
    pub position: Vec3,
}

impl HarvestYield {
    pub fn new(item_id: impl Into<String>, count: u32, position: Vec3) -> Self {
        Self {
            item_id: item_id.into(),
            count,
            position,
        }
    }
}

/// Spawn one single-unit pickup per harvested item
///
/// Unknown item ids spawn nothing.
pub fn deposit_harvest<W>(harvest: &HarvestYield, catalog: &ItemCatalog, world: &mut W) -> Vec<WorldEntityId>
where
    W: WorldBridge + ?Sized,
{
    let Some(definition) = catalog.get(&harvest.item_id) else {
        log::warn!("Harvest produced unknown item '{}'", harvest.item_id);
        return Vec::new();
    };

    let spawned: Vec<WorldEntityId> = (0..harvest.count)
        .map(|i| {
            let lift = HARVEST_BASE_LIFT + i as f32 * HARVEST_STACK_LIFT;
            world.spawn_pickup(SpawnRequest {
                item_id: definition.id.clone(),
                count: 1,
                position: harvest.position + Vec3::Y * lift,
                model: definition.world_model.clone(),
            })
        })
        .collect();

    log::debug!("Harvested '{}' x{}", harvest.item_id, spawned.len());
    spawned
}
