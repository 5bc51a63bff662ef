//! Central world state and per-frame simulation orchestration.
//!
//! The `World` is the single source of truth for the running simulation:
//! it owns the actor set, the physics world, the body→actor side table,
//! the combat resolver, and the event bus. Everything mutates inside
//! `tick`, once per frame, in a fixed order: physics step → player command
//! intake → per-actor AI and movement → player attack resolution → draw
//! order.

use tracing::{debug, trace};
use vanguard_common::{BodyId, EntityId, Vec2};

use crate::actor::{Actor, ActorArena, ActorState, Behavior, Faction};
use crate::ai;
use crate::combat::{self, BodyOwners, CombatConfig, CombatResolver};
use crate::events::{EventBus, GameEvent};
use crate::input::Input;
use crate::physics::{BodyShape, PhysicsWorld};

/// Vertical offset from a humanoid body center to its ground anchor.
const HUMANOID_GROUND_OFFSET: Vec2 = Vec2::new(0.0, 20.0);

/// Vertical offset from a barrel body center to its ground anchor.
const BARREL_GROUND_OFFSET: Vec2 = Vec2::new(0.0, 25.0);

/// Offset from a humanoid ground anchor to its weapon-height aim point.
const HUMANOID_HIT_OFFSET: Vec2 = Vec2::new(0.0, -60.0);

/// Spawn parameters for an actor and its rigid body.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    /// Faction allegiance
    pub faction: Faction,
    /// Behavior capability
    pub behavior: Behavior,
    /// Body shape
    pub shape: BodyShape,
    /// Spawn position (ground anchor)
    pub position: Vec2,
    /// Walk speed in units per millisecond
    pub walk_speed: f32,
    /// Engagement ranges: (attack min, attack max, sight)
    pub ranges: (f32, f32, f32),
    /// Maximum health
    pub max_health: f32,
    /// Body-center → ground-anchor offset
    pub ground_offset: Vec2,
    /// Ground-anchor → aim-point offset
    pub hit_offset: Vec2,
}

impl SpawnSpec {
    /// A player-controllable soldier.
    #[must_use]
    pub fn soldier(position: Vec2) -> Self {
        Self {
            faction: Faction::Soldier,
            behavior: Behavior::PlayerControlled,
            shape: BodyShape::circle(20.0),
            position,
            walk_speed: 0.2,
            ranges: (200.0, 400.0, 500.0),
            max_health: 100.0,
            ground_offset: HUMANOID_GROUND_OFFSET,
            hit_offset: HUMANOID_HIT_OFFSET,
        }
    }

    /// A hostile raider.
    #[must_use]
    pub fn raider(position: Vec2) -> Self {
        Self {
            faction: Faction::Raider,
            behavior: Behavior::Hostile,
            shape: BodyShape::circle(20.0),
            position,
            walk_speed: 0.1,
            ranges: (200.0, 400.0, 500.0),
            max_health: 100.0,
            ground_offset: HUMANOID_GROUND_OFFSET,
            hit_offset: HUMANOID_HIT_OFFSET,
        }
    }

    /// A static barrel prop.
    #[must_use]
    pub fn barrel(position: Vec2) -> Self {
        Self {
            faction: Faction::Neutral,
            behavior: Behavior::Static,
            shape: BodyShape::rect(70.0, 30.0),
            position,
            walk_speed: 0.0,
            ranges: (0.0, 0.0, 0.0),
            max_health: 100.0,
            ground_offset: BARREL_GROUND_OFFSET,
            hit_offset: Vec2::ZERO,
        }
    }

    /// Overrides the engagement ranges.
    #[must_use]
    pub const fn with_ranges(mut self, min: f32, max: f32, sight: f32) -> Self {
        self.ranges = (min, max, sight);
        self
    }

    /// Overrides the walk speed.
    #[must_use]
    pub const fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Overrides the maximum health.
    #[must_use]
    pub const fn with_max_health(mut self, health: f32) -> Self {
        self.max_health = health;
        self
    }
}

/// The running simulation.
#[derive(Debug)]
pub struct World {
    /// All live actors
    actors: ActorArena,
    /// Physics backing
    physics: PhysicsWorld,
    /// Body→actor side table
    owners: BodyOwners,
    /// Attack resolution
    resolver: CombatResolver,
    /// Simulation event sink
    events: EventBus,
    /// The player-controlled actor, if any
    player: Option<EntityId>,
    /// Whether ticks are suspended
    paused: bool,
    /// Draw order from the last tick: actor IDs sorted by y ascending
    draw_order: Vec<EntityId>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with default combat parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_combat_config(CombatConfig::default())
    }

    /// Creates an empty world with the given combat parameters.
    #[must_use]
    pub fn with_combat_config(config: CombatConfig) -> Self {
        Self {
            actors: ActorArena::new(),
            physics: PhysicsWorld::new(),
            owners: BodyOwners::default(),
            resolver: CombatResolver::with_config(config),
            events: EventBus::default(),
            player: None,
            paused: false,
            draw_order: Vec::new(),
        }
    }

    /// Spawns an actor and its rigid body, returning the actor's ID.
    pub fn spawn(&mut self, spec: SpawnSpec) -> EntityId {
        let body = self
            .physics
            .add_body(spec.shape, spec.position - spec.ground_offset);

        let actor = Actor::new(spec.faction, spec.behavior, spec.position, body)
            .with_ranges(spec.ranges.0, spec.ranges.1, spec.ranges.2)
            .with_walk_speed(spec.walk_speed)
            .with_health(spec.max_health)
            .with_ground_offset(spec.ground_offset)
            .with_hit_offset(spec.hit_offset);

        let id = self.actors.insert(actor);
        self.owners.insert(body, id);

        debug!(entity = id.raw(), ?spec.faction, "actor spawned");
        self.events.publish(GameEvent::ActorSpawned {
            entity: id,
            position: spec.position,
        });
        id
    }

    /// Spawns an actor and registers it as the player.
    pub fn spawn_player(&mut self, spec: SpawnSpec) -> EntityId {
        let id = self.spawn(spec);
        self.player = Some(id);
        id
    }

    /// Removes an actor, its rigid body, and its side-table entry.
    pub fn despawn(&mut self, id: EntityId) {
        let Ok(actor) = self.actors.remove(id) else {
            return;
        };

        self.owners.remove(&actor.body);
        let _ = self.physics.remove_body(actor.body);
        if self.player == Some(id) {
            self.player = None;
        }

        debug!(entity = id.raw(), "actor despawned");
        self.events
            .publish(GameEvent::ActorDespawned { entity: id });
    }

    /// Returns the player's actor ID, if one is registered.
    #[must_use]
    pub const fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Resolves which actor owns a rigid body.
    #[must_use]
    pub fn actor_of_body(&self, body: BodyId) -> Option<EntityId> {
        self.owners.get(&body).copied()
    }

    /// Returns the actor set.
    #[must_use]
    pub const fn actors(&self) -> &ActorArena {
        &self.actors
    }

    /// Returns the physics world.
    #[must_use]
    pub const fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Returns the physics world mutably (forces, scripted motion).
    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Returns the event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the draw order computed by the last tick: actor IDs sorted
    /// by vertical position, painters-algorithm back to front.
    #[must_use]
    pub fn draw_order(&self) -> &[EntityId] {
        &self.draw_order
    }

    /// Returns whether the simulation is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sets the pause state.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Toggles the pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advances the simulation by one frame of `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f32, input: &mut Input) {
        if self.paused {
            return;
        }

        self.physics.step(dt_ms);

        self.intake_player_commands(input);

        for id in self.actors.ids() {
            self.update_actor(id, dt_ms);
        }

        self.resolve_player_attack(input);

        self.rebuild_draw_order();
    }

    /// Applies pending input to the player actor.
    fn intake_player_commands(&mut self, input: &mut Input) {
        let Some(player_id) = self.player else {
            return;
        };
        let Ok(player) = self.actors.get_mut(player_id) else {
            return;
        };
        if !player.is_alive() {
            return;
        }

        if let Some(goal) = input.take_move_command() {
            player.move_target = Some(goal);
        }

        player.state = if input.is_attacking() {
            ActorState::Attack
        } else if player.move_target.is_some() {
            ActorState::Moving
        } else {
            ActorState::Idle
        };
    }

    /// Runs one actor's mirror, AI, and movement for the tick.
    fn update_actor(&mut self, id: EntityId, dt_ms: f32) {
        let Ok(actor) = self.actors.get_mut(id) else {
            return;
        };

        // Mirror the ground anchor from the physics body. A live actor
        // without a body is a broken world invariant.
        let body_pos = self
            .physics
            .body(actor.body)
            .unwrap_or_else(|| panic!("actor {id:?} has no physics body {:?}", actor.body))
            .position;
        actor.position = body_pos + actor.ground_offset;

        if !actor.is_alive() {
            return;
        }

        match actor.behavior {
            Behavior::Hostile => {
                let view = actor.clone();
                let target = ai::acquire_target(&view, &self.actors);
                let target_pos =
                    target.and_then(|t| self.actors.get(t).ok().map(|a| a.position));

                let Ok(actor) = self.actors.get_mut(id) else {
                    return;
                };
                actor.target = target;
                if let Some(goal) = target_pos {
                    ai::update_engagement(actor, goal);
                } else if actor.move_target.is_none() {
                    actor.state = ActorState::Idle;
                }
                ai::move_into_range(actor, &mut self.physics, dt_ms);
            },
            Behavior::PlayerControlled => {
                ai::move_towards(actor, &mut self.physics, dt_ms);
            },
            Behavior::Static => {},
        }
    }

    /// Fires the player's weapon for this tick, if attacking.
    fn resolve_player_attack(&mut self, input: &Input) {
        let Some(player_id) = self.player else {
            return;
        };
        let Ok(player) = self.actors.get(player_id) else {
            return;
        };
        if !player.is_alive() || !player.is_attacking() {
            return;
        }

        let origin = player.position;
        let aim = input.cursor();
        let end = combat::range_clamped_aim(origin, aim, player.attack_range_max);

        self.events.publish(GameEvent::WeaponFired {
            attacker: player_id,
            from: origin,
            to: end,
        });

        let Some(hit) = self.resolver.resolve_attack(
            player_id,
            origin,
            aim,
            &mut self.actors,
            &mut self.physics,
            &self.owners,
        ) else {
            return;
        };

        trace!(
            target_id = hit.target.raw(),
            distance = hit.distance,
            "weapon hit"
        );
        self.events.publish(GameEvent::ActorHit {
            target: hit.target,
            source: player_id,
            point: hit.point,
            knockback: hit.knockback,
            damage: self.resolver.config.hit_damage,
        });

        if hit.lethal {
            debug!(entity = hit.target.raw(), "actor died");
            self.events.publish(GameEvent::ActorDied { entity: hit.target });
        }
    }

    /// Re-derives draw order from current vertical positions.
    fn rebuild_draw_order(&mut self) {
        let mut keyed: Vec<(EntityId, f32)> = self
            .actors
            .iter()
            .map(|actor| (actor.id(), actor.position.y))
            .collect();
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));

        self.draw_order.clear();
        self.draw_order.extend(keyed.into_iter().map(|(id, _)| id));
    }
}
