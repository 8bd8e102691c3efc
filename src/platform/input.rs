//! Input collection
//!
//! Event handlers write into [`InputState`] at any time; the game loop reads
//! one [`TickInput`] per frame so changes land at the start of the next tick.

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Start/pause/resume
    Toggle,
    Mute,
}

impl Key {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" | "KeyP" => Some(Key::Toggle),
            "KeyM" => Some(Key::Mute),
            _ => None,
        }
    }
}

/// Horizontal direction for on-screen buttons and touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default)]
struct Hold {
    keyboard: bool,
    button: bool,
}

impl Hold {
    fn held(self) -> bool {
        self.keyboard || self.button
    }
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: Hold,
    right: Hold,
    pointer_x: Option<f32>,
    toggle: bool,
    restart: bool,
    mute: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh input for page load; queues the first toggle when auto-starting
    pub fn for_launch(auto_start: bool) -> Self {
        Self {
            toggle: auto_start,
            ..Self::default()
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left.keyboard = true,
            Key::Right => self.right.keyboard = true,
            Key::Toggle => self.toggle = true,
            Key::Mute => self.mute = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left.keyboard = false,
            Key::Right => self.right.keyboard = false,
            Key::Toggle | Key::Mute => {}
        }
    }

    /// On-screen button or touch hold
    pub fn set_button(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Left => self.left.button = held,
            Direction::Right => self.right.button = held,
        }
    }

    /// Pointer position in field coordinates
    pub fn pointer_moved(&mut self, x: f32) {
        if x.is_finite() {
            self.pointer_x = Some(x);
        }
    }

    pub fn request_toggle(&mut self) {
        self.toggle = true;
    }

    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Drop every hold (window blur loses key-up events)
    pub fn release_all(&mut self) {
        self.left = Hold::default();
        self.right = Hold::default();
    }

    /// Take the pending mute toggle
    pub fn take_mute(&mut self) -> bool {
        std::mem::take(&mut self.mute)
    }

    /// Snapshot for this frame; one-shot commands and the pointer are consumed
    pub fn frame_input(&mut self) -> TickInput {
        TickInput {
            left: self.left.held(),
            right: self.right.held(),
            pointer_x: self.pointer_x.take(),
            toggle: std::mem::take(&mut self.toggle),
            restart: std::mem::take(&mut self.restart),
        }
    }
}
