//! Game balance values
//!
//! Overridable through the key-value store as JSON; any missing field keeps its default.

use serde::{Deserialize, Serialize};

use crate::platform::storage::KeyValueStore;

/// Balance constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at round start (units per frame)
    pub base_speed: f32,
    /// Added to the scroll speed every frame
    pub speed_increment: f32,
    /// Passive score per frame is `floor(speed / passive_score_divisor)`
    pub passive_score_divisor: f32,

    /// Added to vertical velocity every airborne frame
    pub gravity: f32,
    /// Vertical velocity on jump (negative is up)
    pub jump_velocity: f32,

    /// Score for every obstacle that scrolls off the left edge
    pub obstacle_bonus: u64,
    /// Frames between spawns at round start
    pub initial_spawn_interval: u32,
    /// Frames between spawns never drop below this
    pub min_spawn_interval: u32,
    /// Interval reduction per difficulty step
    pub spawn_interval_step: u32,
    /// Score needed per difficulty step
    pub difficulty_score_step: u64,

    /// Character hit-box is shrunk by this much on every side
    pub hitbox_inset: f32,
    /// Horizontal distance to the second copy of a compound obstacle
    pub compound_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            speed_increment: 0.002,
            passive_score_divisor: 10.0,

            gravity: 0.8,
            jump_velocity: -15.0,

            obstacle_bonus: 10,
            initial_spawn_interval: 120,
            min_spawn_interval: 60,
            spawn_interval_step: 10,
            difficulty_score_step: 100,

            hitbox_inset: 5.0,
            compound_offset: 40.0,
        }
    }
}

impl Tuning {
    /// Storage key for the JSON override
    pub const STORAGE_KEY: &'static str = "gradleRunnerTuning";

    /// Parse a JSON override; fields absent from `json` keep their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => Some(tuning.sanitized()),
            Err(e) => {
                log::warn!("Ignoring malformed tuning override: {}", e);
                None
            }
        }
    }

    /// Load the override from `store`, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            if let Some(tuning) = Self::from_json(&json) {
                log::info!("Loaded tuning override");
                return tuning;
            }
        }
        Self::default()
    }

    /// Write this tuning to `store`
    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            if store.set(Self::STORAGE_KEY, &json) {
                log::info!("Tuning saved");
            }
        }
    }

    /// Clamp values that would break the spawn, scroll, jump or scoring math
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.base_speed.is_finite() || self.base_speed <= 0.0 {
            self.base_speed = defaults.base_speed;
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            self.gravity = defaults.gravity;
        }
        if !self.jump_velocity.is_finite() || self.jump_velocity >= 0.0 {
            self.jump_velocity = defaults.jump_velocity;
        }
        if !self.speed_increment.is_finite() {
            self.speed_increment = defaults.speed_increment;
        }
        self.min_spawn_interval = self.min_spawn_interval.max(1);
        self.initial_spawn_interval = self.initial_spawn_interval.max(self.min_spawn_interval);
        self.difficulty_score_step = self.difficulty_score_step.max(1);
        if !self.passive_score_divisor.is_finite() || self.passive_score_divisor <= 0.0 {
            self.passive_score_divisor = defaults.passive_score_divisor;
        }
        self.speed_increment = self.speed_increment.max(0.0);
        self
    }
}
