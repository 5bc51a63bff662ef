//! AI targeting and range-band movement.
//!
//! Hostile actors acquire the nearest opposing actor within sight, then
//! hold a preferred distance band around it: they walk toward a point on
//! the ring at the band midpoint rather than toward the target itself,
//! which keeps ranged attackers from closing to point-blank and backs them
//! off when a target gets too close.
//!
//! Target acquisition is sticky: once engaged, a target is kept until it
//! dies, despawns, or moves out of sight range. "Who do I see" is decided
//! once; "should I disengage" is re-evaluated every tick.

use serde::{Deserialize, Serialize};
use vanguard_common::{EntityId, Vec2};

use crate::actor::{Actor, ActorArena, ActorState, MOVE_TARGET_TOLERANCE};
use crate::physics::PhysicsWorld;

/// Outcome of one engagement evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngagementDecision {
    /// Target in weapon reach: attack, while still sidling into the band
    Attack(Vec2),
    /// Target visible but out of reach: close into the band
    Chase(Vec2),
    /// Target out of sight range: drop it and go idle
    Disengage,
}

/// Finds the nearest live actor to `origin` strictly within `range`.
///
/// Ties are broken by iteration order. Returns `None` for an empty
/// candidate set or when nothing is in range.
pub fn nearest_actor<'a>(
    origin: Vec2,
    candidates: impl Iterator<Item = &'a Actor>,
    range: f32,
) -> Option<EntityId> {
    let mut nearest = None;
    let mut nearest_distance = f32::MAX;

    for candidate in candidates {
        let distance = candidate.position.distance(origin);
        if distance >= range {
            continue;
        }
        if distance < nearest_distance {
            nearest_distance = distance;
            nearest = Some(candidate.id());
        }
    }

    nearest
}

/// Selects the target `actor` should engage.
///
/// Sticky: a held target that is still alive is returned unchanged.
/// Otherwise the nearest living actor of an opposed faction strictly
/// within `sight_range` is chosen; with no candidate in range the result
/// is `None`. An actor never targets itself.
#[must_use]
pub fn acquire_target(actor: &Actor, arena: &ActorArena) -> Option<EntityId> {
    if let Some(held) = actor.target {
        if arena.get(held).is_ok_and(Actor::is_alive) {
            return Some(held);
        }
    }

    nearest_actor(
        actor.position,
        arena.iter().filter(|candidate| {
            candidate.id() != actor.id()
                && candidate.is_alive()
                && actor.faction.is_hostile_to(candidate.faction)
        }),
        actor.sight_range,
    )
}

/// Evaluates the engagement state machine for one tick.
///
/// Given the held target's position:
/// - within `attack_range_max` → [`EngagementDecision::Attack`]
/// - beyond `sight_range` → [`EngagementDecision::Disengage`]
/// - otherwise → [`EngagementDecision::Chase`]
///
/// Attack and Chase both carry the target position as the movement goal;
/// an attacking actor keeps correcting toward its band midpoint.
#[must_use]
pub fn plan_engagement(actor: &Actor, target_pos: Vec2) -> EngagementDecision {
    let distance = actor.position.distance(target_pos);

    if distance > actor.sight_range {
        EngagementDecision::Disengage
    } else if distance <= actor.attack_range_max {
        EngagementDecision::Attack(target_pos)
    } else {
        EngagementDecision::Chase(target_pos)
    }
}

/// Applies the engagement decision to the actor's state.
pub fn update_engagement(actor: &mut Actor, target_pos: Vec2) {
    match plan_engagement(actor, target_pos) {
        EngagementDecision::Attack(goal) => {
            actor.move_target = Some(goal);
            actor.state = ActorState::Attack;
        },
        EngagementDecision::Chase(goal) => {
            actor.move_target = Some(goal);
            actor.state = ActorState::Moving;
        },
        EngagementDecision::Disengage => {
            actor.target = None;
            actor.move_target = None;
            actor.state = ActorState::Idle;
        },
    }
}

/// Computes the point on the attack-band ring the actor walks toward.
///
/// `goal - direction * band_midpoint`, where `direction` points from the
/// actor to the goal. A goal coinciding with the actor's position returns
/// the goal itself.
#[must_use]
pub fn ideal_band_position(actor: &Actor, goal: Vec2) -> Vec2 {
    let direction = (goal - actor.position).normalized();
    goal - direction.scale(actor.band_midpoint())
}

/// Steps from `from` toward `to` by at most `max_step`, without overshoot.
fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance <= 0.0 {
        to
    } else {
        from + offset.scale(max_step / distance)
    }
}

/// Walks the actor one tick toward the band ring around its move target.
///
/// The move target is cleared once the actor is within
/// [`MOVE_TARGET_TOLERANCE`] of the ideal band position. No move target
/// means no movement.
pub fn move_into_range(actor: &mut Actor, physics: &mut PhysicsWorld, dt_ms: f32) {
    let Some(goal) = actor.move_target else {
        return;
    };

    let ideal = ideal_band_position(actor, goal);
    advance_to(actor, physics, ideal, dt_ms);
}

/// Walks the actor one tick straight at its move target.
///
/// Used for direct movement commands; same stepping and arrival tolerance
/// as [`move_into_range`], without the ring offset.
pub fn move_towards(actor: &mut Actor, physics: &mut PhysicsWorld, dt_ms: f32) {
    let Some(goal) = actor.move_target else {
        return;
    };

    advance_to(actor, physics, goal, dt_ms);
}

/// Shared stepping: arrive-check against `destination`, then one step.
fn advance_to(actor: &mut Actor, physics: &mut PhysicsWorld, destination: Vec2, dt_ms: f32) {
    if actor.position.distance(destination) <= MOVE_TARGET_TOLERANCE {
        actor.move_target = None;
        return;
    }

    let new_position = step_toward(actor.position, destination, actor.walk_speed * dt_ms);
    physics
        .set_position(actor.body, new_position - actor.ground_offset)
        .unwrap_or_else(|_| {
            panic!("actor {:?} has no physics body {:?}", actor.id(), actor.body)
        });
    actor.position = new_position;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Behavior, Faction};
    use crate::physics::BodyShape;
    use proptest::prelude::*;

    const DT: f32 = 16.0;

    fn raider_at(physics: &mut PhysicsWorld, position: Vec2) -> Actor {
        let body = physics.add_body(BodyShape::circle(20.0), position);
        Actor::new(Faction::Raider, Behavior::Hostile, position, body)
            .with_ranges(200.0, 400.0, 500.0)
    }

    fn soldier_at(physics: &mut PhysicsWorld, position: Vec2) -> Actor {
        let body = physics.add_body(BodyShape::circle(20.0), position);
        Actor::new(Faction::Soldier, Behavior::PlayerControlled, position, body)
            .with_ranges(200.0, 400.0, 500.0)
    }

    #[test]
    fn test_out_of_sight_target_not_acquired() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider = raider_at(&mut physics, Vec2::ZERO);
        let raider_id = arena.insert(raider);
        arena.insert(soldier_at(&mut physics, Vec2::new(1000.0, 0.0)));

        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), None);
        assert_eq!(raider.state, ActorState::Idle);
    }

    #[test]
    fn test_acquires_nearest_opposed() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider_id = arena.insert(raider_at(&mut physics, Vec2::ZERO));
        let _far = arena.insert(soldier_at(&mut physics, Vec2::new(400.0, 0.0)));
        let near = arena.insert(soldier_at(&mut physics, Vec2::new(0.0, 150.0)));

        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), Some(near));
    }

    #[test]
    fn test_never_targets_self_or_friends() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider_id = arena.insert(raider_at(&mut physics, Vec2::ZERO));
        arena.insert(raider_at(&mut physics, Vec2::new(50.0, 0.0)));
        let soldier = arena.insert(soldier_at(&mut physics, Vec2::new(300.0, 0.0)));

        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), Some(soldier));
    }

    #[test]
    fn test_soldiers_do_not_auto_acquire() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let soldier_id = arena.insert(soldier_at(&mut physics, Vec2::ZERO));
        arena.insert(raider_at(&mut physics, Vec2::new(100.0, 0.0)));

        let soldier = arena.get(soldier_id).expect("should exist");
        assert_eq!(acquire_target(soldier, &arena), None);
    }

    #[test]
    fn test_sticky_target_survives_closer_candidate() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider_id = arena.insert(raider_at(&mut physics, Vec2::ZERO));
        let first = arena.insert(soldier_at(&mut physics, Vec2::new(300.0, 0.0)));

        let target = acquire_target(arena.get(raider_id).expect("should exist"), &arena);
        arena.get_mut(raider_id).expect("should exist").target = target;
        assert_eq!(target, Some(first));

        // A closer soldier appears; the held target must not change.
        arena.insert(soldier_at(&mut physics, Vec2::new(50.0, 0.0)));
        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), Some(first));
    }

    #[test]
    fn test_dead_target_is_replaced() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider_id = arena.insert(raider_at(&mut physics, Vec2::ZERO));
        let first = arena.insert(soldier_at(&mut physics, Vec2::new(300.0, 0.0)));
        let second = arena.insert(soldier_at(&mut physics, Vec2::new(350.0, 0.0)));

        arena.get_mut(raider_id).expect("should exist").target = Some(first);
        arena.get_mut(first).expect("should exist").state = ActorState::Dead;

        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), Some(second));
    }

    #[test]
    fn test_empty_candidate_set_clears() {
        let mut physics = PhysicsWorld::new();
        let mut arena = ActorArena::new();

        let raider_id = arena.insert(raider_at(&mut physics, Vec2::ZERO));
        let raider = arena.get(raider_id).expect("should exist");
        assert_eq!(acquire_target(raider, &arena), None);
    }

    #[test]
    fn test_engagement_decisions() {
        let mut physics = PhysicsWorld::new();
        let raider = raider_at(&mut physics, Vec2::ZERO);

        // In weapon reach, at the boundary included.
        assert_eq!(
            plan_engagement(&raider, Vec2::new(400.0, 0.0)),
            EngagementDecision::Attack(Vec2::new(400.0, 0.0))
        );
        // Visible but out of reach, up to and including sight range.
        assert_eq!(
            plan_engagement(&raider, Vec2::new(500.0, 0.0)),
            EngagementDecision::Chase(Vec2::new(500.0, 0.0))
        );
        // Past sight range.
        assert_eq!(
            plan_engagement(&raider, Vec2::new(500.1, 0.0)),
            EngagementDecision::Disengage
        );
    }

    #[test]
    fn test_disengage_clears_state() {
        let mut physics = PhysicsWorld::new();
        let mut raider = raider_at(&mut physics, Vec2::ZERO);
        raider.target = Some(EntityId::from_raw(999));
        raider.move_target = Some(Vec2::new(1.0, 1.0));
        raider.state = ActorState::Moving;

        update_engagement(&mut raider, Vec2::new(2000.0, 0.0));

        assert_eq!(raider.target, None);
        assert_eq!(raider.move_target, None);
        assert_eq!(raider.state, ActorState::Idle);
    }

    #[test]
    fn test_ideal_position_centered_in_band() {
        // Attacker already at the band midpoint distance: the ideal point
        // is its own position and the move target clears immediately.
        let mut physics = PhysicsWorld::new();
        let mut raider = raider_at(&mut physics, Vec2::ZERO);

        let goal = Vec2::new(300.0, 0.0);
        assert_eq!(ideal_band_position(&raider, goal), Vec2::ZERO);

        raider.move_target = Some(goal);
        move_into_range(&mut raider, &mut physics, DT);
        assert_eq!(raider.move_target, None);
        assert_eq!(raider.position, Vec2::ZERO);
    }

    #[test]
    fn test_move_into_range_steps_by_walk_speed() {
        let mut physics = PhysicsWorld::new();
        let mut raider = raider_at(&mut physics, Vec2::ZERO).with_walk_speed(0.1);
        raider.move_target = Some(Vec2::new(1000.0, 0.0));

        // Goal is at 1000 with sight 500; movement itself does not care,
        // it just walks toward the ring point at 700.
        move_into_range(&mut raider, &mut physics, DT);

        let expected = 0.1 * DT;
        assert!((raider.position.x - expected).abs() < 1e-4);
        assert_eq!(raider.position.y, 0.0);
        // Body was driven along.
        let body = physics.body(raider.body).expect("should exist");
        assert_eq!(body.position, raider.position);
    }

    #[test]
    fn test_move_into_range_retreats_when_too_close() {
        let mut physics = PhysicsWorld::new();
        let mut raider = raider_at(&mut physics, Vec2::ZERO).with_walk_speed(0.1);
        // Target only 50 away: the ring point at band midpoint 300 lies
        // behind the raider, so it must back off.
        raider.move_target = Some(Vec2::new(50.0, 0.0));

        move_into_range(&mut raider, &mut physics, DT);
        assert!(raider.position.x < 0.0);
    }

    #[test]
    fn test_move_without_target_is_noop() {
        let mut physics = PhysicsWorld::new();
        let mut raider = raider_at(&mut physics, Vec2::ZERO);

        move_into_range(&mut raider, &mut physics, DT);
        move_towards(&mut raider, &mut physics, DT);
        assert_eq!(raider.position, Vec2::ZERO);
    }

    #[test]
    fn test_move_towards_reaches_and_clears() {
        let mut physics = PhysicsWorld::new();
        let mut soldier = soldier_at(&mut physics, Vec2::ZERO).with_walk_speed(0.2);
        let goal = Vec2::new(100.0, 0.0);
        soldier.move_target = Some(goal);

        for _ in 0..100 {
            move_towards(&mut soldier, &mut physics, DT);
            if soldier.move_target.is_none() {
                break;
            }
        }

        assert_eq!(soldier.move_target, None);
        assert!(soldier.position.distance(goal) <= MOVE_TARGET_TOLERANCE);
    }

    #[test]
    fn test_move_towards_no_ring_offset() {
        let mut physics = PhysicsWorld::new();
        let mut soldier = soldier_at(&mut physics, Vec2::ZERO).with_walk_speed(0.2);
        soldier.move_target = Some(Vec2::new(1000.0, 0.0));

        move_towards(&mut soldier, &mut physics, DT);
        // Straight at the goal, not at the band ring.
        assert!((soldier.position.x - 0.2 * DT).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_band_convergence(d in 201.0_f32..499.0, angle in 0.0_f32..std::f32::consts::TAU) {
            let mut physics = PhysicsWorld::new();
            let target_pos = Vec2::new(d * angle.cos(), d * angle.sin());

            let mut arena = ActorArena::new();
            let raider_id =
                arena.insert(raider_at(&mut physics, Vec2::ZERO).with_walk_speed(0.1));
            let soldier_id = arena.insert(soldier_at(&mut physics, target_pos));

            for _ in 0..2000 {
                let raider = arena.get_mut(raider_id).expect("should exist");
                raider.target = Some(soldier_id);
                update_engagement(raider, target_pos);
                move_into_range(raider, &mut physics, DT);
                if raider.move_target.is_none() && raider.state == ActorState::Attack {
                    break;
                }
            }

            let raider = arena.get(raider_id).expect("should exist");
            let final_distance = raider.position.distance(target_pos);
            let midpoint = raider.band_midpoint();
            // Converges to the band midpoint, not to the target and not to
            // the starting distance.
            prop_assert!((final_distance - midpoint).abs() <= MOVE_TARGET_TOLERANCE + 1e-3);
        }
    }
}
