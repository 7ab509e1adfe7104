//! Pointer, touch and keyboard translation
//!
//! Raw events update a lateral target and a firing intent. The session drains
//! them into a [`TickInput`] once per frame.

use serde::{Deserialize, Serialize};

use crate::clamp_player_x;
use crate::sim::TickInput;

/// Lateral distance moved per arrow key press
pub const KEY_NUDGE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Space,
}

/// Input signals from the host, in play-field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    MouseMove { x: f32 },
    MouseDown,
    MouseUp,
    /// A click fires one shot immediately
    Click,
    TouchStart { x: f32 },
    TouchMove { x: f32 },
    TouchEnd,
    KeyDown(Key),
    KeyUp(Key),
}

/// Relative-drag anchor captured at touch start
#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchAnchor {
    touch_x: f32,
    player_x: f32,
}

/// Accumulates intent between ticks
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    target_x: Option<f32>,
    firing: bool,
    shoot: bool,
    touch: Option<TouchAnchor>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything (new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Absolute lateral target, clamped to the field. Non-finite targets
    /// are ignored.
    pub fn set_player_target(&mut self, x: f32) {
        if let Some(x) = clamp_player_x(x) {
            self.target_x = Some(x);
        }
    }

    pub fn set_firing_intent(&mut self, firing: bool) {
        self.firing = firing;
    }

    pub fn firing(&self) -> bool {
        self.firing
    }

    /// Apply one event. `player_x` is the ship's current position, used for
    /// relative touch drags and key nudges.
    pub fn handle(&mut self, event: InputEvent, player_x: f32) {
        match event {
            InputEvent::MouseMove { x } => self.set_player_target(x),
            InputEvent::MouseDown => self.firing = true,
            InputEvent::MouseUp => self.firing = false,
            InputEvent::Click => self.shoot = true,
            InputEvent::TouchStart { x } => {
                self.touch = Some(TouchAnchor {
                    touch_x: x,
                    player_x,
                });
                self.firing = true;
            }
            InputEvent::TouchMove { x } => {
                if let Some(anchor) = self.touch {
                    self.set_player_target(anchor.player_x + (x - anchor.touch_x));
                }
            }
            InputEvent::TouchEnd => {
                self.touch = None;
                self.firing = false;
            }
            InputEvent::KeyDown(Key::Left) => self.nudge(player_x, -KEY_NUDGE),
            InputEvent::KeyDown(Key::Right) => self.nudge(player_x, KEY_NUDGE),
            InputEvent::KeyDown(Key::Space) => self.firing = !self.firing,
            InputEvent::KeyUp(_) => {}
        }
    }

    fn nudge(&mut self, player_x: f32, step: f32) {
        let from = self.target_x.unwrap_or(player_x);
        self.set_player_target(from + step);
    }

    /// Input for the next tick. Clears the one-shot fire request.
    pub fn take_tick_input(&mut self, autopilot: bool) -> TickInput {
        TickInput {
            target_x: self.target_x,
            firing: self.firing,
            shoot: std::mem::take(&mut self.shoot),
            autopilot,
        }
    }
}
