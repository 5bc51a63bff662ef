//! Actor data model with arena-based storage.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanguard_common::{BodyId, EntityId, Vec2};

/// Error types for actor operations.
#[derive(Debug, Error)]
pub enum ActorError {
    /// Actor not found
    #[error("Actor not found: {0:?}")]
    NotFound(EntityId),
    /// Actor already removed
    #[error("Actor already removed: {0:?}")]
    AlreadyRemoved(EntityId),
}

/// Result type for actor operations.
pub type ActorResult<T> = Result<T, ActorError>;

/// Behavioral mode of an actor. Modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorState {
    /// Standing still with no objective
    Idle,
    /// Walking toward a move target
    Moving,
    /// Engaging a target within attack range
    Attack,
    /// Health depleted; inert
    Dead,
}

/// Faction allegiance, checked by value for engagement decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Player-aligned soldiers
    Soldier,
    /// Hostile raiders
    Raider,
    /// Unaligned props (barrels, scenery bodies)
    Neutral,
}

impl Faction {
    /// Returns whether this faction engages actors of `other`.
    ///
    /// Raiders hunt soldiers; everything else holds fire.
    #[must_use]
    pub const fn is_hostile_to(self, other: Self) -> bool {
        matches!((self, other), (Self::Raider, Self::Soldier))
    }
}

/// Behavior capability selected at spawn.
///
/// Movement and combat logic dispatch on this tag; there is no
/// per-variant actor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Driven by input: click-to-move and attack commands
    PlayerControlled,
    /// AI-driven: acquires targets and closes into its attack band
    Hostile,
    /// No self-driven movement; participates in physics only
    Static,
}

/// Health component for actors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health
    current: f32,
    /// Maximum health
    max: f32,
}

impl Health {
    /// Creates a new health component at full health.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns current health.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Returns maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Applies damage, saturating at zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Applies healing, saturating at max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Checks if health is depleted.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Returns health as a fraction (0.0 to 1.0).
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }
}

/// Distance at which a move target counts as reached, in world units.
pub const MOVE_TARGET_TOLERANCE: f32 = 10.0;

/// An actor in the game world.
///
/// `position` mirrors the attached rigid body's position (plus the world's
/// ground-anchor offset) and is refreshed by the world every tick. The
/// engagement ranges form concentric thresholds:
/// `attack_range_min <= attack_range_max <= sight_range`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier
    id: EntityId,
    /// Faction allegiance
    pub faction: Faction,
    /// Behavior capability
    pub behavior: Behavior,
    /// World position (ground anchor)
    pub position: Vec2,
    /// Health
    pub health: Health,
    /// Current behavioral mode
    pub state: ActorState,
    /// Maximum distance at which targets can be acquired or retained
    pub sight_range: f32,
    /// Inner edge of the preferred attack band
    pub attack_range_min: f32,
    /// Outer edge of the preferred attack band; also the weapon reach
    pub attack_range_max: f32,
    /// Target currently being engaged; never self
    pub target: Option<EntityId>,
    /// World point currently being approached
    pub move_target: Option<Vec2>,
    /// Movement speed in world units per millisecond
    pub walk_speed: f32,
    /// Handle of the actor's rigid body in the physics world
    pub body: BodyId,
    /// Offset from the body's center to the actor's ground anchor
    pub ground_offset: Vec2,
    /// Offset from the ground anchor to the aimable point
    pub hit_offset: Vec2,
}

impl Actor {
    /// Creates a new actor with default ranges and health.
    #[must_use]
    pub fn new(faction: Faction, behavior: Behavior, position: Vec2, body: BodyId) -> Self {
        Self {
            id: EntityId::new(),
            faction,
            behavior,
            position,
            health: Health::new(100.0),
            state: ActorState::Idle,
            sight_range: 500.0,
            attack_range_min: 200.0,
            attack_range_max: 400.0,
            target: None,
            move_target: None,
            walk_speed: 0.1,
            body,
            ground_offset: Vec2::ZERO,
            hit_offset: Vec2::ZERO,
        }
    }

    /// Sets the engagement ranges.
    ///
    /// Values are clamped so that
    /// `attack_range_min <= attack_range_max <= sight_range` always holds.
    #[must_use]
    pub fn with_ranges(mut self, min: f32, max: f32, sight: f32) -> Self {
        self.sight_range = sight.max(0.0);
        self.attack_range_max = max.clamp(0.0, self.sight_range);
        self.attack_range_min = min.clamp(0.0, self.attack_range_max);
        self
    }

    /// Sets the walk speed (world units per millisecond).
    #[must_use]
    pub const fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Sets maximum health (starting at full).
    #[must_use]
    pub const fn with_health(mut self, max: f32) -> Self {
        self.health = Health::new(max);
        self
    }

    /// Sets the ground-anchor offset from the body center.
    #[must_use]
    pub const fn with_ground_offset(mut self, offset: Vec2) -> Self {
        self.ground_offset = offset;
        self
    }

    /// Sets the hit-point offset from the ground anchor.
    #[must_use]
    pub const fn with_hit_offset(mut self, offset: Vec2) -> Self {
        self.hit_offset = offset;
        self
    }

    /// Returns the actor's unique ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the aimable point: ground anchor plus hit offset.
    #[must_use]
    pub fn hit_position(&self) -> Vec2 {
        self.position + self.hit_offset
    }

    /// Returns the midpoint of the preferred attack band.
    #[must_use]
    pub fn band_midpoint(&self) -> f32 {
        self.attack_range_min + (self.attack_range_max - self.attack_range_min) / 2.0
    }

    /// Returns whether the actor is in attack state.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.state == ActorState::Attack
    }

    /// Returns whether the actor is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != ActorState::Dead
    }
}

/// Arena-based actor storage for efficient allocation and lookup.
///
/// Uses a free list for O(1) allocation and deallocation; lookup by ID
/// goes through a map for O(1) access.
#[derive(Debug, Default)]
pub struct ActorArena {
    /// Storage slots for actors
    actors: Vec<Option<Actor>>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Map from EntityId to slot index for fast lookup
    id_to_index: std::collections::HashMap<EntityId, usize>,
}

impl ActorArena {
    /// Creates a new empty actor arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            free_list: Vec::new(),
            id_to_index: std::collections::HashMap::new(),
        }
    }

    /// Creates a new actor arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actors: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            id_to_index: std::collections::HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    /// Returns true if there are no live actors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }

    /// Inserts an actor into the arena, returning its ID.
    pub fn insert(&mut self, actor: Actor) -> EntityId {
        let id = actor.id();

        let index = if let Some(free_index) = self.free_list.pop() {
            self.actors[free_index] = Some(actor);
            free_index
        } else {
            let index = self.actors.len();
            self.actors.push(Some(actor));
            index
        };

        self.id_to_index.insert(id, index);
        id
    }

    /// Removes an actor by ID, returning it on success.
    pub fn remove(&mut self, id: EntityId) -> ActorResult<Actor> {
        let index = self
            .id_to_index
            .remove(&id)
            .ok_or(ActorError::NotFound(id))?;

        let actor = self.actors[index]
            .take()
            .ok_or(ActorError::AlreadyRemoved(id))?;

        self.free_list.push(index);
        Ok(actor)
    }

    /// Gets a reference to an actor by ID.
    pub fn get(&self, id: EntityId) -> ActorResult<&Actor> {
        let index = self.id_to_index.get(&id).ok_or(ActorError::NotFound(id))?;

        self.actors[*index].as_ref().ok_or(ActorError::NotFound(id))
    }

    /// Gets a mutable reference to an actor by ID.
    pub fn get_mut(&mut self, id: EntityId) -> ActorResult<&mut Actor> {
        let index = self.id_to_index.get(&id).ok_or(ActorError::NotFound(id))?;

        self.actors[*index].as_mut().ok_or(ActorError::NotFound(id))
    }

    /// Checks if an actor with the given ID exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// Returns an iterator over all live actors.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter_map(|opt| opt.as_ref())
    }

    /// Returns a mutable iterator over all live actors.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut().filter_map(|opt| opt.as_mut())
    }

    /// Returns all actor IDs in slot order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(Actor::id).collect()
    }

    /// Clears all actors from the arena.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.free_list.clear();
        self.id_to_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_actor(position: Vec2) -> Actor {
        Actor::new(
            Faction::Raider,
            Behavior::Hostile,
            position,
            BodyId::from_raw(1),
        )
    }

    #[test]
    fn test_health_damage_saturates() {
        let mut health = Health::new(100.0);
        health.damage(30.0);
        assert_eq!(health.current(), 70.0);

        health.damage(1000.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_health_heal_saturates() {
        let mut health = Health::new(100.0);
        health.damage(50.0);
        health.heal(20.0);
        assert_eq!(health.current(), 70.0);

        health.heal(1000.0);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_health_percent() {
        let mut health = Health::new(200.0);
        health.damage(50.0);
        assert!((health.percent() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_faction_hostility() {
        assert!(Faction::Raider.is_hostile_to(Faction::Soldier));
        assert!(!Faction::Soldier.is_hostile_to(Faction::Raider));
        assert!(!Faction::Neutral.is_hostile_to(Faction::Soldier));
        assert!(!Faction::Raider.is_hostile_to(Faction::Raider));
    }

    #[test]
    fn test_range_invariant_clamped() {
        let actor = test_actor(Vec2::ZERO).with_ranges(600.0, 450.0, 500.0);
        assert!(actor.attack_range_min <= actor.attack_range_max);
        assert!(actor.attack_range_max <= actor.sight_range);
        assert_eq!(actor.sight_range, 500.0);
        assert_eq!(actor.attack_range_max, 450.0);
        assert_eq!(actor.attack_range_min, 450.0);
    }

    #[test]
    fn test_band_midpoint() {
        let actor = test_actor(Vec2::ZERO).with_ranges(200.0, 400.0, 500.0);
        assert_eq!(actor.band_midpoint(), 300.0);
    }

    #[test]
    fn test_hit_position() {
        let actor = test_actor(Vec2::new(10.0, 20.0)).with_hit_offset(Vec2::new(0.0, -40.0));
        assert_eq!(actor.hit_position(), Vec2::new(10.0, -20.0));
    }

    #[test]
    fn test_arena_insert_and_get() {
        let mut arena = ActorArena::new();

        let id = arena.insert(test_actor(Vec2::ZERO));
        assert_eq!(arena.len(), 1);

        let actor = arena.get(id).expect("actor should exist");
        assert_eq!(actor.faction, Faction::Raider);
    }

    #[test]
    fn test_arena_remove() {
        let mut arena = ActorArena::new();

        let id = arena.insert(test_actor(Vec2::ZERO));
        let actor = arena.remove(id).expect("remove should succeed");
        assert_eq!(actor.id(), id);
        assert_eq!(arena.len(), 0);
        assert!(arena.get(id).is_err());
    }

    #[test]
    fn test_arena_reuses_slots() {
        let mut arena = ActorArena::new();

        let id1 = arena.insert(test_actor(Vec2::ZERO));
        let _ = arena.remove(id1);

        let id2 = arena.insert(test_actor(Vec2::ZERO));
        assert_ne!(id1, id2);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.actors.len(), 1);
    }

    #[test]
    fn test_arena_get_mut() {
        let mut arena = ActorArena::new();

        let id = arena.insert(test_actor(Vec2::ZERO));
        arena.get_mut(id).expect("should exist").position = Vec2::new(5.0, 6.0);
        assert_eq!(
            arena.get(id).expect("should exist").position,
            Vec2::new(5.0, 6.0)
        );
    }

    #[test]
    fn test_arena_iter_and_contains() {
        let mut arena = ActorArena::new();

        let id1 = arena.insert(test_actor(Vec2::ZERO));
        let id2 = arena.insert(test_actor(Vec2::new(1.0, 1.0)));

        assert_eq!(arena.iter().count(), 2);
        assert!(arena.contains(id1));
        assert!(arena.contains(id2));
        assert!(!arena.contains(EntityId::NULL));

        let ids = arena.ids();
        assert_eq!(ids, vec![id1, id2]);
    }

    #[test]
    fn test_arena_remove_twice_fails() {
        let mut arena = ActorArena::new();

        let id = arena.insert(test_actor(Vec2::ZERO));
        assert!(arena.remove(id).is_ok());
        assert!(arena.remove(id).is_err());
    }

    #[test]
    fn test_arena_clear() {
        let mut arena = ActorArena::new();
        arena.insert(test_actor(Vec2::ZERO));
        arena.insert(test_actor(Vec2::ZERO));

        arena.clear();
        assert!(arena.is_empty());
    }
}
