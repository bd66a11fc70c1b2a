//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per logical frame, no sub-stepping
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Collision, character_hitbox, first_collision};
pub use spawn::{roll_kind, spawn_interval_for_score, update_spawner};
pub use state::{
    Action, Arena, Character, GameEvent, GameState, Obstacle, ObstacleKind, ObstaclePreset,
    RoundPhase,
};
pub use tick::{TickInput, tick};
