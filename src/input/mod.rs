//! Directional input
//!
//! The simulation reads four pressed/released flags once per tick through
//! [`InputSource`]. The window host implements it over the keyboard; tests
//! and headless runs use [`ScriptedInput`].

use std::collections::VecDeque;

/// Pressed state of the four movement directions for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Nothing pressed
    pub const IDLE: InputState = InputState {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const UP: InputState = InputState { up: true, ..Self::IDLE };
    pub const DOWN: InputState = InputState { down: true, ..Self::IDLE };
    pub const LEFT: InputState = InputState { left: true, ..Self::IDLE };
    pub const RIGHT: InputState = InputState { right: true, ..Self::IDLE };

    /// Union of two states
    pub fn with(self, other: InputState) -> InputState {
        InputState {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Something that can report the current directional state
pub trait InputSource {
    /// Called exactly once per tick, before the Simulate phase
    fn poll(&mut self) -> InputState;
}

/// Plays back a fixed sequence of states, then reports idle forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputState>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = InputState>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Never presses anything
    pub fn idle() -> Self {
        Self::default()
    }

    /// `state` held for `ticks` ticks
    pub fn hold(state: InputState, ticks: usize) -> Self {
        Self::new(std::iter::repeat(state).take(ticks))
    }

    /// Ticks left before the script runs out
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputState {
        self.script.pop_front().unwrap_or(InputState::IDLE)
    }
}
