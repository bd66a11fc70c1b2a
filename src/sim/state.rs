//! Round state and core simulation types
//!
//! Everything a round mutates lives in [`GameState`]; nothing here renders or touches
//! the platform.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Collision;
use crate::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Constructed, never started
    Idle,
    /// Ticking
    Running,
    /// Collided; frozen until restarted
    Terminal,
}

/// Logical player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Jump,
    Duck,
    Stand,
}

/// Play surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: MAX_ARENA_WIDTH,
            height: MAX_ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size the arena for a host viewport `viewport_width` wide
    pub fn fit(viewport_width: f32) -> Self {
        let width = (viewport_width - VIEWPORT_MARGIN).clamp(0.0, MAX_ARENA_WIDTH);
        let height = (width / 2.0).floor().min(MAX_ARENA_HEIGHT);
        Self { width, height }
    }

    /// y of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Top edge of the standing character
    pub fn character_base_y(&self) -> f32 {
        self.height - CHARACTER_BASE_OFFSET
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative is up)
    pub vel_y: f32,
    pub jumping: bool,
    pub ducking: bool,
    /// Standing top edge
    pub base_y: f32,
}

impl Character {
    pub fn new(base_y: f32) -> Self {
        Self {
            pos: Vec2::new(CHARACTER_X, base_y),
            size: Vec2::new(CHARACTER_WIDTH, STAND_HEIGHT),
            vel_y: 0.0,
            jumping: false,
            ducking: false,
            base_y,
        }
    }

    /// Back to standing on the baseline
    pub fn reset(&mut self) {
        *self = Self::new(self.base_y);
    }

    /// Launch upward. Refused while airborne or ducking.
    pub fn jump(&mut self, launch_velocity: f32) -> bool {
        if self.jumping || self.ducking {
            return false;
        }
        self.jumping = true;
        self.vel_y = launch_velocity;
        true
    }

    /// Crouch, keeping feet on the ground line. Refused while airborne.
    pub fn duck(&mut self) -> bool {
        if self.jumping || self.ducking {
            return false;
        }
        self.ducking = true;
        self.size.y = DUCK_HEIGHT;
        self.pos.y = self.base_y + (STAND_HEIGHT - DUCK_HEIGHT);
        true
    }

    /// Leave the crouch
    pub fn stand(&mut self) -> bool {
        if !self.ducking {
            return false;
        }
        self.ducking = false;
        self.size.y = STAND_HEIGHT;
        self.pos.y = self.base_y;
        true
    }

    /// Apply an action; returns whether it changed anything
    pub fn apply(&mut self, action: Action, tuning: &Tuning) -> bool {
        match action {
            Action::Jump => self.jump(tuning.jump_velocity),
            Action::Duck => self.duck(),
            Action::Stand => self.stand(),
        }
    }

    /// One explicit-Euler gravity step. Returns true on the frame it lands.
    pub fn integrate(&mut self, gravity: f32) -> bool {
        if !self.jumping {
            return false;
        }
        self.vel_y += gravity;
        self.pos.y += self.vel_y;

        if self.pos.y >= self.base_y {
            self.pos.y = self.base_y;
            self.jumping = false;
            self.vel_y = 0.0;
            return true;
        }
        false
    }

    /// Visual box
    pub fn bounds(&self) -> Rect {
        Rect {
            origin: self.pos,
            size: self.size,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Bug on the ground
    Ground,
    /// Error block in the air
    Flying,
    /// Gradle build block
    Tall,
    /// XML brackets
    Wide,
    /// Pair of Kotlin blocks
    Compound,
}

/// Geometry shared by every obstacle of a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePreset {
    pub width: f32,
    pub height: f32,
    /// Top edge sits this far above the ground line
    pub clearance: f32,
    /// Carries a second copy at the compound offset
    pub twin: bool,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Ground,
        ObstacleKind::Flying,
        ObstacleKind::Tall,
        ObstacleKind::Wide,
        ObstacleKind::Compound,
    ];

    pub fn preset(self) -> ObstaclePreset {
        match self {
            ObstacleKind::Ground => ObstaclePreset {
                width: 30.0,
                height: 30.0,
                clearance: 30.0,
                twin: false,
            },
            ObstacleKind::Flying => ObstaclePreset {
                width: 40.0,
                height: 20.0,
                clearance: 80.0,
                twin: false,
            },
            ObstacleKind::Tall => ObstaclePreset {
                width: 30.0,
                height: 50.0,
                clearance: 50.0,
                twin: false,
            },
            ObstacleKind::Wide => ObstaclePreset {
                width: 50.0,
                height: 25.0,
                clearance: 25.0,
                twin: false,
            },
            ObstacleKind::Compound => ObstaclePreset {
                width: 30.0,
                height: 30.0,
                clearance: 30.0,
                twin: true,
            },
        }
    }

    /// Short label used in logs
    pub fn label(self) -> &'static str {
        match self {
            ObstacleKind::Ground => "bug",
            ObstacleKind::Flying => "error",
            ObstacleKind::Tall => "gradle",
            ObstacleKind::Wide => "xml",
            ObstacleKind::Compound => "kotlin",
        }
    }
}

/// An obstacle scrolling toward the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner of the primary box
    pub pos: Vec2,
    pub size: Vec2,
    /// x offset of the second box, compound only
    pub twin_offset: Option<f32>,
}

impl Obstacle {
    /// Build an obstacle of `kind` with its left edge at `x`
    pub fn new(id: u32, kind: ObstacleKind, x: f32, ground_y: f32, compound_offset: f32) -> Self {
        let preset = kind.preset();
        Self {
            id,
            kind,
            pos: Vec2::new(x, ground_y - preset.clearance),
            size: Vec2::new(preset.width, preset.height),
            twin_offset: preset.twin.then_some(compound_offset),
        }
    }

    /// Scroll left by `speed`
    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    /// Right edge of the primary box
    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Primary box
    pub fn bounds(&self) -> Rect {
        Rect {
            origin: self.pos,
            size: self.size,
        }
    }

    /// Every box that can hit the character, primary first
    pub fn hitboxes(&self) -> impl Iterator<Item = Rect> + '_ {
        let primary = self.bounds();
        std::iter::once(primary).chain(self.twin_offset.map(|dx| primary.shifted_x(dx)))
    }
}

/// Things that happened during a tick (or a round transition)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    Ducked,
    Stood,
    Landed,
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    ObstacleCleared { id: u32, bonus: u64 },
    Collided(Collision),
    /// Emitted by the session once the best score has been settled
    RoundOver { score: u64, best: u64, new_best: bool },
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the obstacle RNG started from
    pub seed: u64,
    rng: Pcg32,
    pub arena: Arena,
    pub tuning: Tuning,
    pub phase: RoundPhase,
    pub score: u64,
    /// Scroll speed (units per frame)
    pub speed: f32,
    /// Frames since the last spawn
    pub spawn_timer: u32,
    /// Frames between spawns
    pub spawn_interval: u32,
    /// Frames ticked this round
    pub frame: u64,
    pub character: Character,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            phase: RoundPhase::Idle,
            score: 0,
            speed: tuning.base_speed,
            spawn_timer: 0,
            spawn_interval: tuning.initial_spawn_interval,
            frame: 0,
            character: Character::new(arena.character_base_y()),
            obstacles: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Reset every round field and begin running. Also used to restart.
    pub fn start(&mut self) {
        self.score = 0;
        self.speed = self.tuning.base_speed;
        self.spawn_timer = 0;
        self.spawn_interval = self.tuning.initial_spawn_interval;
        self.frame = 0;
        self.character.reset();
        self.obstacles.clear();
        self.next_id = 1;
        self.phase = RoundPhase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// HUD speed level, 1 at base speed and +1 every 2 units faster
    pub fn speed_level(&self) -> u32 {
        ((self.speed - self.tuning.base_speed) / 2.0).floor().max(0.0) as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_arena_fit() {
        assert_eq!(Arena::fit(1920.0), Arena::new(800.0, 400.0));
        assert_eq!(Arena::fit(661.0), Arena::new(601.0, 300.0));

        let arena = Arena::default();
        assert_eq!(arena.ground_y(), 290.0);
        assert_eq!(arena.character_base_y(), 250.0);
    }

    #[test]
    fn test_duck_keeps_feet_on_ground() {
        let mut c = Character::new(250.0);
        let feet = c.bounds().max().y;

        assert!(c.duck());
        assert_eq!(c.size.y, DUCK_HEIGHT);
        assert_eq!(c.bounds().max().y, feet);

        assert!(c.stand());
        assert_eq!(c.pos.y, 250.0);
        assert_eq!(c.size.y, STAND_HEIGHT);
        assert!(!c.stand());
    }

    #[test]
    fn test_jump_blocked_while_ducking_and_airborne() {
        let t = tuning();
        let mut c = Character::new(250.0);

        assert!(c.apply(Action::Duck, &t));
        assert!(!c.apply(Action::Jump, &t));
        assert!(!c.jumping);

        assert!(c.apply(Action::Stand, &t));
        assert!(c.apply(Action::Jump, &t));
        assert_eq!(c.vel_y, t.jump_velocity);
        assert!(!c.apply(Action::Jump, &t));
        assert!(!c.apply(Action::Duck, &t));
        assert!(!c.ducking);
    }

    #[test]
    fn test_gravity_convergence() {
        let t = tuning();
        let mut c = Character::new(250.0);
        c.jump(t.jump_velocity);

        let mut peak = c.pos.y;
        let mut frames = 0;
        while c.jumping {
            c.integrate(t.gravity);
            peak = peak.min(c.pos.y);
            frames += 1;
            assert!(frames < 1000, "never landed");
        }

        assert!(peak < 250.0);
        assert_eq!(c.pos.y, 250.0);
        assert_eq!(c.vel_y, 0.0);
        assert!(!c.integrate(t.gravity));
        assert_eq!(c.pos.y, 250.0);
    }

    #[test]
    fn test_compound_obstacle_has_twin_box() {
        let o = Obstacle::new(1, ObstacleKind::Compound, 300.0, 290.0, 40.0);
        let boxes: Vec<Rect> = o.hitboxes().collect();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1], Rect::new(340.0, 260.0, 30.0, 30.0));

        let single = Obstacle::new(2, ObstacleKind::Flying, 300.0, 290.0, 40.0);
        assert_eq!(single.hitboxes().count(), 1);
        assert_eq!(single.pos.y, 210.0);
    }

    #[test]
    fn test_speed_level() {
        let mut state = GameState::new(1, Arena::default(), tuning());
        assert_eq!(state.speed_level(), 1);
        state.speed = 6.99;
        assert_eq!(state.speed_level(), 1);
        state.speed = 7.0;
        assert_eq!(state.speed_level(), 2);
    }
}
