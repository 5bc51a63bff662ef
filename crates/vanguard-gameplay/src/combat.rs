//! Ray-based combat resolution.
//!
//! An attack is resolved by casting a range-clamped ray from the attacker
//! toward an aim point, selecting the nearest intersected body that is not
//! the attacker's own, and applying a knockback impulse plus hit damage to
//! the victim. One attack resolves against at most one victim.

use serde::{Deserialize, Serialize};
use vanguard_common::{BodyId, EntityId, Vec2};

use crate::actor::{ActorArena, ActorState};
use crate::physics::PhysicsWorld;

/// Map from a rigid body to the actor that owns it.
///
/// Owned by the world and maintained on spawn/despawn; bodies without an
/// entry (pure scenery) are invisible to combat.
pub type BodyOwners = ahash::AHashMap<BodyId, EntityId>;

/// Default ray tolerance band, in world units.
pub const DEFAULT_RAY_THICKNESS: f32 = 40.0;

/// Default knockback impulse magnitude per hit.
pub const DEFAULT_HIT_FORCE_SCALE: f32 = 0.1;

/// Default health lost per hit.
pub const DEFAULT_HIT_DAMAGE: f32 = 10.0;

/// Tunable combat parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Width of the tolerance band around the attack ray. 0.0 queries the
    /// exact line; wider values forgive near misses.
    pub ray_thickness: f32,
    /// Scale of the knockback impulse applied along the ray direction.
    pub hit_force_scale: f32,
    /// Flat damage applied to the victim's health per hit.
    pub hit_damage: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            ray_thickness: DEFAULT_RAY_THICKNESS,
            hit_force_scale: DEFAULT_HIT_FORCE_SCALE,
            hit_damage: DEFAULT_HIT_DAMAGE,
        }
    }
}

impl CombatConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ray tolerance band.
    #[must_use]
    pub const fn with_ray_thickness(mut self, thickness: f32) -> Self {
        self.ray_thickness = thickness;
        self
    }

    /// Sets the knockback impulse scale.
    #[must_use]
    pub const fn with_hit_force_scale(mut self, scale: f32) -> Self {
        self.hit_force_scale = scale;
        self
    }

    /// Sets the per-hit damage.
    #[must_use]
    pub const fn with_hit_damage(mut self, damage: f32) -> Self {
        self.hit_damage = damage;
        self
    }
}

/// Outcome of a resolved attack. Transient; not persisted anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Actor that was hit
    pub target: EntityId,
    /// The victim's rigid body
    pub body: BodyId,
    /// Entry point of the ray into the victim
    pub point: Vec2,
    /// Distance from the attack origin to the entry point
    pub distance: f32,
    /// Normalized attack direction
    pub direction: Vec2,
    /// Knockback impulse that was applied
    pub knockback: Vec2,
    /// Whether this hit reduced the victim's health to zero
    pub lethal: bool,
}

/// Clamps an aim point so the effective ray never exceeds `max_range`.
///
/// Returns the endpoint `origin + normalize(aim - origin) * min(|aim -
/// origin|, max_range)`. An aim point coinciding with the origin returns
/// the origin itself.
#[must_use]
pub fn range_clamped_aim(origin: Vec2, aim: Vec2, max_range: f32) -> Vec2 {
    let offset = aim - origin;
    let distance = offset.length();
    if distance <= 0.0 {
        return origin;
    }
    origin + offset.scale(distance.min(max_range.max(0.0)) / distance)
}

/// Resolves attacks against the physics world.
#[derive(Debug, Default, Clone)]
pub struct CombatResolver {
    /// Tunable parameters
    pub config: CombatConfig,
}

impl CombatResolver {
    /// Creates a resolver with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with the given parameters.
    #[must_use]
    pub const fn with_config(config: CombatConfig) -> Self {
        Self { config }
    }

    /// Resolves a single attack tick from `attacker`.
    ///
    /// Casts a ray from `origin` toward `aim`, clamped to the attacker's
    /// maximum attack range. Of all intersected bodies that belong to an
    /// actor other than the attacker, only the nearest is hit: it receives
    /// a knockback impulse of `direction * hit_force_scale` and loses
    /// `hit_damage` health, transitioning to `Dead` when depleted.
    ///
    /// Returns `None` when nothing was hit; this is not an error. A missing
    /// attacker or a zero-length ray resolves to `None` as well.
    pub fn resolve_attack(
        &self,
        attacker: EntityId,
        origin: Vec2,
        aim: Vec2,
        actors: &mut ActorArena,
        physics: &mut PhysicsWorld,
        owners: &BodyOwners,
    ) -> Option<RayHit> {
        let max_range = actors.get(attacker).ok()?.attack_range_max;

        let end = range_clamped_aim(origin, aim, max_range);
        let direction = (end - origin).normalized();
        if direction == Vec2::ZERO {
            return None;
        }

        let mut intersections = physics.query_ray(origin, end, self.config.ray_thickness);
        intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let (victim, hit) = intersections.into_iter().find_map(|hit| {
            let owner = owners.get(&hit.body).copied()?;
            if owner == attacker {
                // Mandatory self-hit exclusion.
                return None;
            }
            actors.contains(owner).then_some((owner, hit))
        })?;

        let knockback = direction.scale(self.config.hit_force_scale);
        // The owners table guarantees the body is live; a failure here is a
        // broken world invariant.
        physics
            .apply_impulse(hit.body, knockback)
            .unwrap_or_else(|_| panic!("victim {victim:?} lost its body {:?}", hit.body));

        let target = actors
            .get_mut(victim)
            .unwrap_or_else(|_| panic!("body owner {victim:?} missing from arena"));
        let was_alive = target.is_alive();
        target.health.damage(self.config.hit_damage);
        let lethal = was_alive && target.health.is_dead();
        if lethal {
            target.state = ActorState::Dead;
        }

        Some(RayHit {
            target: victim,
            body: hit.body,
            point: hit.point,
            distance: hit.distance,
            direction,
            knockback,
            lethal,
        })
    }
}
