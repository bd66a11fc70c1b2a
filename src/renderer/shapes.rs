//! Pixel-art segments for the character and obstacles

use crate::Rect;
use crate::sim::{Character, Obstacle, ObstacleKind};

pub const BODY_COLOR: &str = "#06a94d";
pub const LIMB_COLOR: &str = "#048a3d";
pub const EYE_COLOR: &str = "#ffffff";

/// One filled rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub rect: Rect,
    pub color: &'static str,
}

fn seg(x: f32, y: f32, w: f32, h: f32, color: &'static str) -> Segment {
    Segment {
        rect: Rect::new(x, y, w, h),
        color,
    }
}

/// Fill color for an obstacle kind
pub fn obstacle_color(kind: ObstacleKind) -> &'static str {
    match kind {
        ObstacleKind::Ground => "#ff4444",
        ObstacleKind::Flying => "#ff8844",
        ObstacleKind::Tall => "#44ff44",
        ObstacleKind::Wide => "#4488ff",
        ObstacleKind::Compound => "#ff44ff",
    }
}

/// Elephant segments for the current pose. `frame` drives the walk bob.
pub fn character_segments(character: &Character, frame: u64) -> Vec<Segment> {
    let (x, y) = (character.pos.x, character.pos.y);

    if character.ducking {
        return vec![
            seg(x, y, 40.0, 20.0, BODY_COLOR),
            // Trunk
            seg(x + 35.0, y + 5.0, 10.0, 10.0, LIMB_COLOR),
        ];
    }

    let mut segments = vec![
        // Body
        seg(x + 5.0, y + 10.0, 30.0, 25.0, BODY_COLOR),
        // Head
        seg(x + 10.0, y, 20.0, 15.0, BODY_COLOR),
        // Trunk
        seg(x + 30.0, y + 5.0, 10.0, 15.0, LIMB_COLOR),
    ];
    if !character.jumping {
        let bob = (frame as f32 * 0.3).sin() * 2.0;
        segments.push(seg(x + 8.0, y + 30.0, 8.0, 10.0, LIMB_COLOR));
        segments.push(seg(x + 24.0, y + 30.0 + bob, 8.0, 10.0, LIMB_COLOR));
    }
    segments.push(seg(x + 15.0, y + 5.0, 3.0, 3.0, EYE_COLOR));
    segments
}

/// Segments for an obstacle (both copies of a compound one)
pub fn obstacle_segments(obstacle: &Obstacle) -> Vec<Segment> {
    let color = obstacle_color(obstacle.kind);
    let (x, y) = (obstacle.pos.x, obstacle.pos.y);
    let (w, h) = (obstacle.size.x, obstacle.size.y);

    match obstacle.kind {
        ObstacleKind::Ground => vec![
            seg(x + 5.0, y, 20.0, 15.0, color),
            seg(x, y + 10.0, 30.0, 10.0, color),
            seg(x + 10.0, y + 20.0, 10.0, 10.0, color),
        ],
        ObstacleKind::Flying | ObstacleKind::Tall => vec![seg(x, y, w, h, color)],
        // Angle brackets
        ObstacleKind::Wide => vec![
            seg(x, y, 10.0, h, color),
            seg(x + w - 10.0, y, 10.0, h, color),
        ],
        ObstacleKind::Compound => obstacle
            .hitboxes()
            .map(|rect| Segment { rect, color })
            .collect(),
    }
}
