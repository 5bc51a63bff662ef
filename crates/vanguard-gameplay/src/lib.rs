//! # Vanguard Gameplay
//!
//! Simulation core for Vanguard.
//!
//! This crate provides the per-frame simulation layer:
//! - Actors (player soldier, hostile raiders, static props)
//! - A compact rigid-body physics world with ray queries
//! - AI targeting and range-band movement
//! - Ray-based combat resolution with knockback and damage
//! - The world orchestrator: tick ordering, draw order, player attacks
//! - Input snapshot and event bus interfaces to the outside
//!
//! The renderer, input devices, and effect systems live elsewhere: they
//! feed an [`input::Input`] snapshot in and drain [`events::GameEvent`]s
//! out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod ai;
pub mod combat;
pub mod events;
pub mod input;
pub mod physics;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::ai::*;
    pub use crate::combat::*;
    pub use crate::events::*;
    pub use crate::input::*;
    pub use crate::physics::*;
    pub use crate::world::*;
}

pub use prelude::*;
