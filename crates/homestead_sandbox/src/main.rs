//! Homestead Sandbox
//!
//! Runs one scripted morning on the farm against the headless hand and
//! world: harvest, pick up, plant, build, eat, drop. Useful to eyeball
//! item tables and inventory settings without starting the game.
//!
//! Run with: cargo run -p homestead_sandbox
//!       or: cargo run --bin homestead-sandbox -- path/to/data

use glam::Vec3;
use homestead_inventory::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Frame time of the scripted run
const FRAME_DT: f32 = 1.0 / 60.0;

/// Game-side systems the items act on
#[derive(Debug)]
struct Farm {
    stamina: f32,
    crops: Vec<(String, Vec3)>,
    structures: Vec<(String, Vec3, f32)>,
    tilled: u32,
}

impl Farm {
    fn new() -> Self {
        Self {
            stamina: 60.0,
            crops: Vec::new(),
            structures: Vec::new(),
            tilled: 0,
        }
    }
}

impl ActionHost for Farm {
    fn stamina(&self) -> f32 {
        self.stamina
    }

    fn max_stamina(&self) -> f32 {
        100.0
    }

    fn recover_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina + amount).min(self.max_stamina());
        log::info!("Stamina {:.0}/{:.0}", self.stamina, self.max_stamina());
    }

    fn plant(&mut self, item_id: &str, position: Vec3) -> bool {
        if self.crops.iter().any(|(_, p)| p.distance(position) < 0.5) {
            log::info!("Something already grows here");
            return false;
        }
        log::info!("Planted {} at {:?}", item_id, position);
        self.crops.push((item_id.to_string(), position));
        true
    }

    fn use_tool(&mut self, item_id: &str, power: f32, target: Vec3) {
        self.tilled += 1;
        log::info!("{} hits {:?} with power {}", item_id, target, power);
    }

    fn place(&mut self, item_id: &str, model: &str, position: Vec3, yaw_degrees: f32) -> bool {
        log::info!("Built {} ({}) at {:?}, yaw {}", item_id, model, position, yaw_degrees);
        self.structures.push((item_id.to_string(), position, yaw_degrees));
        true
    }
}

fn data_dir() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn report(snapshot: &InventorySnapshot) {
    let slots: Vec<String> = snapshot
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let marker = if snapshot.selected == Some(i) { ">" } else { " " };
            match slot {
                Some(view) => format!("{}{} x{}", marker, view.display_name, view.count),
                None => format!("{}-", marker),
            }
        })
        .collect();
    log::info!("HUD [{}]", slots.join(" | "));
}

/// Feed every pickup within the trigger radius to the controller
fn sense_pickups<H: HandPresenter>(
    player: &mut InventoryController<H>,
    world: &HeadlessWorld,
    pose: &ActorPose,
) {
    let radius = player.config().pickup_radius;
    for (entity, pickup) in world.pickups() {
        let candidate = pickup.candidate(entity);
        if candidate.in_range(pose.position, radius) {
            player.on_pickup_enter(candidate);
        } else {
            player.on_pickup_exit(entity);
        }
    }
}

fn press<H: HandPresenter>(
    player: &mut InventoryController<H>,
    keys: &HotkeyMap,
    key: KeyPress,
    world: &mut HeadlessWorld,
    farm: &mut Farm,
    pose: &ActorPose,
) {
    let Some(command) = keys.resolve(&key) else {
        return;
    };
    let result = player.execute(command, world, farm, pose);
    log::info!("{:?} -> {:?}", command, result);

    if let Some(snapshot) = player.tick(FRAME_DT) {
        report(&snapshot);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = data_dir();
    let catalog = match ItemCatalog::load_from_file(dir.join("items.toml")) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            log::error!("Failed to load item table from {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    };
    let config = InventoryConfig::load_or_default(dir.join("inventory.toml"));

    let mut player = InventoryController::new(config, catalog.clone(), HeadlessHand::new());
    let mut world = HeadlessWorld::new();
    let mut farm = Farm::new();
    let keys = HotkeyMap::default();
    let mut pose = ActorPose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

    // Overnight the apple tree dropped fruit, and a supply crate was left
    deposit_harvest(&HarvestYield::new("apple", 4, Vec3::new(0.5, 0.0, -1.0)), &catalog, &mut world);
    for (item_id, count, position) in [
        ("wheat_seed", 12, Vec3::new(-1.0, 0.0, 0.5)),
        ("hoe", 1, Vec3::new(1.0, 0.0, 1.0)),
        ("fence", 6, Vec3::new(0.0, 0.0, 1.5)),
    ] {
        world.spawn_pickup(SpawnRequest {
            item_id: item_id.to_string(),
            count,
            position,
            model: catalog.get(item_id).and_then(|d| d.world_model.clone()),
        });
    }
    log::info!("{} pickups lying around", world.len());

    // Collect everything in reach
    sense_pickups(&mut player, &world, &pose);
    while !player.sensor().is_empty() {
        let before = player.sensor().len();
        press(&mut player, &keys, KeyPress::new(Key::E), &mut world, &mut farm, &pose);
        if player.sensor().len() == before {
            log::warn!("Inventory full, leaving the rest");
            break;
        }
    }

    // Till the bed, then sow
    if player.equip_by_id("hoe") {
        for _ in 0..2 {
            press(&mut player, &keys, KeyPress::new(Key::F), &mut world, &mut farm, &pose);
        }
    }
    if let Some(slot) = player.inventory().find_item("wheat_seed") {
        press(&mut player, &keys, KeyPress::new(Key::Digit(slot as u8 + 1)), &mut world, &mut farm, &pose);
        for step in 0..3 {
            pose.position.x = step as f32;
            press(&mut player, &keys, KeyPress::new(Key::F), &mut world, &mut farm, &pose);
        }
    }

    // Fence facing east, then snack
    pose.forward = Vec3::new(1.0, 0.0, -0.1);
    if player.equip_by_id("fence") {
        press(&mut player, &keys, KeyPress::new(Key::F), &mut world, &mut farm, &pose);
        press(&mut player, &keys, KeyPress::new(Key::F).repeated(), &mut world, &mut farm, &pose);
    }
    press(&mut player, &keys, KeyPress::new(Key::Tab), &mut world, &mut farm, &pose);
    if player.held_id() == Some("apple") {
        press(&mut player, &keys, KeyPress::new(Key::F), &mut world, &mut farm, &pose);
    }

    // Give one apple back to the ground
    press(&mut player, &keys, KeyPress::new(Key::PageDown), &mut world, &mut farm, &pose);
    press(&mut player, &keys, KeyPress::new(Key::Q), &mut world, &mut farm, &pose);

    // Crops come in
    for (item_id, position) in farm.crops.clone() {
        let produce = if item_id == "wheat_seed" { "wheat" } else { "apple" };
        deposit_harvest(&HarvestYield::new(produce, 2, position), &catalog, &mut world);
    }
    sense_pickups(&mut player, &world, &pose);
    while player
        .pickup_nearest(&mut world, &pose)
        .map_or(false, |outcome| outcome.should_despawn())
    {}

    for _ in 0..30 {
        if let Some(snapshot) = player.tick(FRAME_DT) {
            report(&snapshot);
        }
    }

    log::info!(
        "Done: {} crops, {} structures, {} tool hits, {} pickups left, holding {:?}",
        farm.crops.len(),
        farm.structures.len(),
        farm.tilled,
        world.len(),
        player.held_snapshot().held_id
    );
    player.shutdown();
}
