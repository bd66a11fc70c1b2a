//! Demo-mode driver
//!
//! Reads the state the way a player would and suggests one action per frame.

use super::collision::character_hitbox;
use super::state::{Action, GameState, Obstacle};
use crate::Rect;
use crate::consts::{DUCK_HEIGHT, STAND_HEIGHT};

/// Suggest an action for the coming frame, if any
pub fn suggest(state: &GameState) -> Option<Action> {
    let character = &state.character;
    if character.jumping {
        return None;
    }

    let inset = state.tuning.hitbox_inset;
    let hitbox = character_hitbox(character, inset);

    // Nearest obstacle not yet fully behind the character
    let next = state
        .obstacles
        .iter()
        .filter(|o| span(o).1 > hitbox.min().x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let Some(obstacle) = next else {
        return character.ducking.then_some(Action::Stand);
    };

    let (left, right) = span(obstacle);
    let distance = left - hitbox.max().x;

    // Frames from launch to apex; the obstacle should pass under mid-air
    let apex_frames = -state.tuning.jump_velocity / state.tuning.gravity;
    let danger_width = (right - left) + hitbox.size.x;
    let jump_at = state.speed * apex_frames - danger_width / 2.0;

    let standing = standing_hitbox(state, inset);
    let ducking = Rect::new(
        standing.min().x,
        standing.min().y + (STAND_HEIGHT - DUCK_HEIGHT),
        standing.size.x,
        standing.size.y - (STAND_HEIGHT - DUCK_HEIGHT),
    );
    let top = obstacle.pos.y;
    let bottom = obstacle.pos.y + obstacle.size.y;
    let hits = |r: &Rect| top < r.max().y && bottom > r.min().y;

    match (hits(&standing), hits(&ducking)) {
        (true, true) if distance <= jump_at => {
            if character.ducking {
                Some(Action::Stand)
            } else {
                Some(Action::Jump)
            }
        }
        (true, false) if !character.ducking && distance <= jump_at => Some(Action::Duck),
        (true, false) => None,
        _ if character.ducking => Some(Action::Stand),
        _ => None,
    }
}

/// Horizontal extent covered by every hit-box of the obstacle
fn span(obstacle: &Obstacle) -> (f32, f32) {
    obstacle
        .hitboxes()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.min().x), hi.max(r.max().x))
        })
}

/// Hit-box the character would have standing on the baseline
fn standing_hitbox(state: &GameState, inset: f32) -> Rect {
    let c = &state.character;
    Rect::new(c.pos.x, c.base_y, c.size.x, STAND_HEIGHT).inset(inset)
}
