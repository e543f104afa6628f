//! Inventory configuration
//!
//! # Example Config File
//!
//! ```toml
//! capacity = 20
//! pickup_overflow = "split"   # split, all_or_nothing
//! pickup_radius = 2.0
//! drop_distance = 1.0
//! ground_level = 0.0
//! use_reach = 1.5
//! ui_refresh_interval = 0.2
//!
//! [planting]
//! plantable = ["apple", "wheat_seed"]
//! plant_distance = 1.2
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shortest allowed UI polling interval, in seconds
pub const MIN_UI_REFRESH_INTERVAL: f32 = 0.05;

/// What a pickup does when the inventory cannot take the whole candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupOverflow {
    /// Take what fits, leave the rest in the world
    Split,
    /// Take nothing unless everything fits
    AllOrNothing,
}

impl Default for PickupOverflow {
    fn default() -> Self {
        Self::Split
    }
}

impl std::fmt::Display for PickupOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Split => write!(f, "split"),
            Self::AllOrNothing => write!(f, "all_or_nothing"),
        }
    }
}

/// Planting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantingConfig {
    /// Item ids that can be planted
    pub plantable: Vec<String>,
    /// Distance in front of the actor where crops go
    pub plant_distance: f32,
}

impl Default for PlantingConfig {
    fn default() -> Self {
        Self {
            plantable: vec!["apple".to_string()],
            plant_distance: 1.2,
        }
    }
}

/// Per-character inventory configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Number of slots
    pub capacity: usize,
    /// Partial pickup behavior
    pub pickup_overflow: PickupOverflow,
    /// Max distance for "pick up nearest"
    pub pickup_radius: f32,
    /// Distance in front of the actor where drops land
    pub drop_distance: f32,
    /// Height above ground for dropped items
    pub drop_height_offset: f32,
    /// World ground height
    pub ground_level: f32,
    /// Distance in front of the actor for tool hits and placement
    pub use_reach: f32,
    /// UI snapshot polling interval, in seconds
    pub ui_refresh_interval: f32,
    /// Planting
    pub planting: PlantingConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            pickup_overflow: PickupOverflow::default(),
            pickup_radius: 2.0,
            drop_distance: 1.0,
            drop_height_offset: 0.0,
            ground_level: 0.0,
            use_reach: 1.5,
            ui_refresh_interval: 0.2,
            planting: PlantingConfig::default(),
        }
    }
}

impl InventoryConfig {
    /// Parse and validate a TOML config
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Load from a file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded inventory config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default inventory config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if !(self.pickup_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pickup_radius must be non-negative, got {}",
                self.pickup_radius
            )));
        }
        if !(self.drop_distance >= 0.0)
            || !(self.use_reach >= 0.0)
            || !(self.planting.plant_distance >= 0.0)
        {
            return Err(ConfigError::Invalid("distances must be non-negative".into()));
        }
        Ok(())
    }

    /// Polling interval clamped to the supported minimum
    pub fn effective_refresh_interval(&self) -> f32 {
        self.ui_refresh_interval.max(MIN_UI_REFRESH_INTERVAL)
    }
}
