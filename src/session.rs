//! Per-page game context
//!
//! A [`Session`] owns one runner: its round state, best score, storage and the
//! observers interested in what happens. The host calls [`Session::frame`] once
//! per display refresh and keeps scheduling only while it returns
//! [`FrameOutcome::Continue`].

use crate::highscores::BestScore;
use crate::platform::input::{DeviceEvent, translate};
use crate::platform::storage::KeyValueStore;
use crate::renderer::{self, Surface};
use crate::sim::{Arena, GameEvent, GameState, RoundPhase, TickInput, autopilot, tick};
use crate::tuning::Tuning;

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame
    Continue,
    /// Paused; schedule nothing until resumed
    Suspended,
    /// Round over or stopped; schedule nothing
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    Stopped,
    Running,
    Paused,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    best: BestScore,
    store: S,
    input: TickInput,
    drive: Drive,
    autopilot: bool,
    /// Paused by the host going out of view, not by the player
    auto_paused: bool,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> Session<S> {
    /// Build a session, reading tuning and best score from `store`
    pub fn new(store: S, arena: Arena, seed: u64) -> Self {
        let tuning = Tuning::load(&store);
        let best = BestScore::load(&store);
        Self {
            state: GameState::new(seed, arena, tuning),
            best,
            store,
            input: TickInput::default(),
            drive: Drive::Stopped,
            autopilot: false,
            auto_paused: false,
            listeners: Vec::new(),
        }
    }

    /// Start a round from scratch (also restarts a finished one)
    pub fn start(&mut self) {
        self.state.start();
        self.input.clear();
        self.drive = Drive::Running;
        self.auto_paused = false;
        log::info!("Round started (best {})", self.best.value());
    }

    /// Stop driving. No frame ticks after this until the next start.
    pub fn stop(&mut self) {
        if self.drive != Drive::Stopped {
            log::info!("Runner stopped at score {}", self.state.score);
        }
        self.drive = Drive::Stopped;
        self.auto_paused = false;
        self.input.clear();
    }

    /// Freeze the drive loop; the round itself is untouched
    pub fn pause(&mut self) -> bool {
        if self.drive != Drive::Running {
            return false;
        }
        self.drive = Drive::Paused;
        log::info!("Paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.drive != Drive::Paused {
            return false;
        }
        self.drive = Drive::Running;
        self.auto_paused = false;
        log::info!("Resumed");
        true
    }

    /// Pause because the host went out of view
    pub fn auto_pause(&mut self) -> bool {
        if !self.pause() {
            return false;
        }
        self.auto_paused = true;
        true
    }

    /// Undo an [`auto_pause`](Self::auto_pause). A pause the player asked for stays.
    pub fn auto_resume(&mut self) -> bool {
        self.auto_paused && self.resume()
    }

    pub fn is_running(&self) -> bool {
        self.drive == Drive::Running
    }

    pub fn is_paused(&self) -> bool {
        self.drive == Drive::Paused
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
        self.autopilot
    }

    /// Register an observer for every game event
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Queue a device event for the next ticked frame. While paused the event waits
    /// for resume so a release is never lost.
    pub fn handle(&mut self, event: DeviceEvent) {
        if self.drive == Drive::Stopped {
            return;
        }
        if let Some(action) = translate(event, self.state.arena.height) {
            self.input.push(action);
        }
    }

    /// Advance one frame and paint it unless the round just ended
    pub fn frame(&mut self, surface: &mut dyn Surface) -> FrameOutcome {
        match self.drive {
            Drive::Stopped => return FrameOutcome::Finished,
            Drive::Paused => return FrameOutcome::Suspended,
            Drive::Running => {}
        }

        if self.autopilot {
            if let Some(action) = autopilot::suggest(&self.state) {
                self.input.push(action);
            }
        }

        let events = tick(&mut self.state, &self.input);
        self.input.clear();
        self.notify(&events);

        if self.state.phase == RoundPhase::Terminal {
            self.finish_round();
            return FrameOutcome::Finished;
        }

        renderer::render(&self.state, surface);
        FrameOutcome::Continue
    }

    fn finish_round(&mut self) {
        self.drive = Drive::Stopped;
        let score = self.state.score;
        let new_best = self.best.record(score, &mut self.store);
        log::info!(
            "Round over: score {} best {}{}",
            score,
            self.best.value(),
            if new_best { " (new best)" } else { "" }
        );
        self.notify(&[GameEvent::RoundOver {
            score,
            best: self.best.value(),
            new_best,
        }]);
    }

    fn notify(&mut self, events: &[GameEvent]) {
        for event in events {
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }
}
