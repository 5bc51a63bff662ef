//! Input snapshot consumed by the simulation tick.
//!
//! Device handling lives outside the core: whatever captures keys and
//! pointer motion translates them into this snapshot and passes it into
//! the world tick explicitly. The core only understands three signals:
//! attack pressed/released, the cursor's world position, and a world-space
//! move command.

use serde::{Deserialize, Serialize};
use vanguard_common::Vec2;

/// Player input state for one or more frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Input {
    /// Whether the attack control is held
    attacking: bool,
    /// Cursor position in world space
    cursor_world: Vec2,
    /// Pending click-to-move command, consumed by the next tick
    move_command: Option<Vec2>,
}

impl Input {
    /// Creates a neutral input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals that the attack control was pressed.
    pub fn press_attack(&mut self) {
        self.attacking = true;
    }

    /// Signals that the attack control was released.
    pub fn release_attack(&mut self) {
        self.attacking = false;
    }

    /// Returns whether the attack control is held.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Updates the cursor's world-space position.
    pub fn set_cursor(&mut self, world_pos: Vec2) {
        self.cursor_world = world_pos;
    }

    /// Returns the cursor's world-space position.
    #[must_use]
    pub const fn cursor(&self) -> Vec2 {
        self.cursor_world
    }

    /// Issues a click-to-move command at a world position.
    ///
    /// A newer command replaces an unconsumed older one.
    pub fn command_move(&mut self, world_pos: Vec2) {
        self.move_command = Some(world_pos);
    }

    /// Takes the pending move command, leaving none.
    pub fn take_move_command(&mut self) -> Option<Vec2> {
        self.move_command.take()
    }
}
