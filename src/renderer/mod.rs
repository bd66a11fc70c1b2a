//! 2D raster rendering
//!
//! Paints a frame onto anything implementing [`Surface`]: a browser canvas on web,
//! a command recorder for headless runs and tests.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::Rect;
use crate::sim::GameState;

const BACKGROUND: &str = "#0a0a0a";
const GROUND_COLOR: &str = "#2a2a2a";
const ACCENT: &str = "#4caf50";

/// Ground line dash pattern
const DASH_ON: f32 = 20.0;
const DASH_OFF: f32 = 10.0;
const DASH_THICKNESS: f32 = 2.0;

/// HUD text baselines
const SCORE_POS: (f32, f32) = (20.0, 30.0);
const SPEED_POS: (f32, f32) = (20.0, 55.0);

/// Minimal raster drawing surface
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: &str);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { rect: Rect, color: String },
    FillText { text: String, x: f32, y: f32 },
}

/// Surface that records calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Text drawn since the last clear
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, _color: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// The two HUD lines: score and speed level
pub fn hud_text(state: &GameState) -> [String; 2] {
    [
        format!("Score: {}", state.score),
        format!("Speed: {}x", state.speed_level()),
    ]
}

/// Paint the whole frame
pub fn render(state: &GameState, surface: &mut dyn Surface) {
    let (w, h) = (surface.width(), surface.height());
    let ground = state.arena.ground_y();

    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), BACKGROUND);
    surface.fill_rect(Rect::new(0.0, ground, w, h - ground), GROUND_COLOR);

    let mut x = 0.0;
    while x < w {
        let dash = DASH_ON.min(w - x);
        surface.fill_rect(
            Rect::new(x, ground - DASH_THICKNESS / 2.0, dash, DASH_THICKNESS),
            ACCENT,
        );
        x += DASH_ON + DASH_OFF;
    }

    for segment in shapes::character_segments(&state.character, state.frame) {
        surface.fill_rect(segment.rect, segment.color);
    }
    for obstacle in &state.obstacles {
        for segment in shapes::obstacle_segments(obstacle) {
            surface.fill_rect(segment.rect, segment.color);
        }
    }

    let [score, speed] = hud_text(state);
    surface.fill_text(&score, SCORE_POS.0, SCORE_POS.1, ACCENT);
    surface.fill_text(&speed, SPEED_POS.0, SPEED_POS.1, ACCENT);
}
