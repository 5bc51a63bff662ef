//! Compact rigid-body physics world.
//!
//! This module provides the simulation's physics backing:
//! - Circular and rectangular bodies with velocity/force integration
//! - Air-friction damping normalized to a 60 Hz reference frame
//! - Pairwise overlap resolution so actors do not stack
//! - Segment ray queries with a configurable thickness band
//!
//! Time is measured in milliseconds throughout.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vanguard_common::{BodyId, Vec2};

/// Errors that can occur in the physics system.
#[derive(Debug, Clone, Error)]
pub enum PhysicsError {
    /// Body not found
    #[error("body not found: {0:?}")]
    BodyNotFound(BodyId),
}

/// Result type for physics operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Reference frame duration the air-friction coefficient is defined
/// against, in milliseconds.
const FRICTION_REFERENCE_MS: f32 = 1000.0 / 60.0;

/// Default per-reference-frame air friction.
pub const DEFAULT_AIR_FRICTION: f32 = 0.05;

/// Default body density (mass per unit area).
pub const DEFAULT_DENSITY: f32 = 0.1;

/// Shape of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Circular body.
    Circle {
        /// Radius in world units.
        radius: f32,
    },
    /// Axis-aligned rectangular body.
    Rect {
        /// Half-width in world units.
        half_width: f32,
        /// Half-height in world units.
        half_height: f32,
    },
}

impl BodyShape {
    /// Create a circular shape.
    #[must_use]
    pub const fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    /// Create a rectangular shape from full width and height.
    #[must_use]
    pub const fn rect(width: f32, height: f32) -> Self {
        Self::Rect {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    /// Get the area of the shape.
    #[must_use]
    pub fn area(&self) -> f32 {
        match self {
            Self::Circle { radius } => std::f32::consts::PI * radius * radius,
            Self::Rect {
                half_width,
                half_height,
            } => 4.0 * half_width * half_height,
        }
    }

    /// Get the bounding radius for broad-phase checks.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Circle { radius } => *radius,
            Self::Rect {
                half_width,
                half_height,
            } => (half_width * half_width + half_height * half_height).sqrt(),
        }
    }
}

/// A rigid body in the physics world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    /// Unique identifier
    id: BodyId,
    /// Collision shape
    pub shape: BodyShape,
    /// World position (center)
    pub position: Vec2,
    /// Velocity in world units per millisecond
    pub velocity: Vec2,
    /// Accumulated force, cleared each step
    pub force: Vec2,
    /// Per-reference-frame velocity damping (0.0 = none)
    pub air_friction: f32,
    /// Body mass, derived from density and shape area
    pub mass: f32,
}

impl RigidBody {
    /// Returns the body's unique ID.
    #[must_use]
    pub const fn id(&self) -> BodyId {
        self.id
    }
}

/// One body intersected by a ray query.
///
/// Produced transiently during combat resolution; ordering is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    /// Body that was intersected
    pub body: BodyId,
    /// Entry point of the ray into the (thickness-inflated) shape
    pub point: Vec2,
    /// Distance from the ray origin to the entry point
    pub distance: f32,
}

/// The physics world: a flat set of rigid bodies.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    /// Bodies in insertion order
    bodies: Vec<RigidBody>,
    /// Map from BodyId to index in `bodies`
    id_to_index: std::collections::HashMap<BodyId, usize>,
    /// Next body ID to allocate
    next_id: u64,
}

impl PhysicsWorld {
    /// Creates a new empty physics world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            id_to_index: std::collections::HashMap::new(),
            next_id: 1,
        }
    }

    /// Returns the number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the world has no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Adds a body and returns its ID.
    pub fn add_body(&mut self, shape: BodyShape, position: Vec2) -> BodyId {
        let id = BodyId::from_raw(self.next_id);
        self.next_id += 1;

        let body = RigidBody {
            id,
            shape,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            air_friction: DEFAULT_AIR_FRICTION,
            mass: DEFAULT_DENSITY * shape.area(),
        };

        self.id_to_index.insert(id, self.bodies.len());
        self.bodies.push(body);
        id
    }

    /// Removes a body from the world.
    pub fn remove_body(&mut self, id: BodyId) -> PhysicsResult<()> {
        let index = self
            .id_to_index
            .remove(&id)
            .ok_or(PhysicsError::BodyNotFound(id))?;

        self.bodies.swap_remove(index);
        if index < self.bodies.len() {
            let moved_id = self.bodies[index].id;
            self.id_to_index.insert(moved_id, index);
        }
        Ok(())
    }

    /// Gets a reference to a body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        let index = *self.id_to_index.get(&id)?;
        self.bodies.get(index)
    }

    /// Gets a mutable reference to a body.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let index = *self.id_to_index.get(&id)?;
        self.bodies.get_mut(index)
    }

    /// Teleports a body to a position, leaving velocity untouched.
    pub fn set_position(&mut self, id: BodyId, position: Vec2) -> PhysicsResult<()> {
        let body = self
            .body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?;
        body.position = position;
        Ok(())
    }

    /// Applies an instantaneous impulse (momentum change) to a body.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) -> PhysicsResult<()> {
        let body = self
            .body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?;
        if body.mass > 0.0 {
            body.velocity += impulse.scale(1.0 / body.mass);
        }
        Ok(())
    }

    /// Accumulates a force on a body, integrated on the next step.
    pub fn apply_force(&mut self, id: BodyId, force: Vec2) -> PhysicsResult<()> {
        let body = self
            .body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?;
        body.force += force;
        Ok(())
    }

    /// Advances the simulation by `dt_ms` milliseconds.
    ///
    /// Semi-implicit Euler: forces integrate into velocity, velocity into
    /// position, then air friction damps velocity. The damping exponent is
    /// normalized so the configured coefficient means the same thing at any
    /// frame rate.
    pub fn step(&mut self, dt_ms: f32) {
        if dt_ms <= 0.0 {
            return;
        }

        for body in &mut self.bodies {
            if body.mass > 0.0 {
                body.velocity += body.force.scale(dt_ms / body.mass);
            }
            body.force = Vec2::ZERO;

            body.position += body.velocity.scale(dt_ms);

            let damping = (1.0 - body.air_friction).powf(dt_ms / FRICTION_REFERENCE_MS);
            body.velocity = body.velocity.scale(damping);
        }

        self.resolve_overlaps();
    }

    /// Pushes overlapping bodies apart along the axis between their centers.
    fn resolve_overlaps(&mut self) {
        for a in 0..self.bodies.len() {
            for b in (a + 1)..self.bodies.len() {
                let (pos_a, shape_a) = (self.bodies[a].position, self.bodies[a].shape);
                let (pos_b, shape_b) = (self.bodies[b].position, self.bodies[b].shape);

                // Broad phase: bounding circles.
                let reach = shape_a.bounding_radius() + shape_b.bounding_radius();
                if pos_a.distance_squared(pos_b) > reach * reach {
                    continue;
                }

                let correction = match (shape_a, shape_b) {
                    (BodyShape::Circle { radius: ra }, BodyShape::Circle { radius: rb }) => {
                        circle_circle_pushout(pos_a, ra, pos_b, rb)
                    },
                    (BodyShape::Circle { radius }, BodyShape::Rect { .. }) => {
                        circle_rect_pushout(pos_a, radius, pos_b, shape_b)
                    },
                    (BodyShape::Rect { .. }, BodyShape::Circle { radius }) => {
                        circle_rect_pushout(pos_b, radius, pos_a, shape_a).map(|v| -v)
                    },
                    // Static props do not separate from each other.
                    (BodyShape::Rect { .. }, BodyShape::Rect { .. }) => None,
                };

                if let Some(push) = correction {
                    let half = push.scale(0.5);
                    self.bodies[a].position += half;
                    self.bodies[b].position -= half;
                }
            }
        }
    }

    /// Queries all bodies intersected by the segment `from`→`to`.
    ///
    /// `thickness` inflates every shape by that amount, giving the ray a
    /// tolerance band; 0.0 queries the exact line. Results are unordered.
    /// A zero-length segment yields no intersections.
    #[must_use]
    pub fn query_ray(&self, from: Vec2, to: Vec2, thickness: f32) -> Vec<RayIntersection> {
        let delta = to - from;
        if delta.length_squared() <= f32::EPSILON {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for body in &self.bodies {
            let t = match body.shape {
                BodyShape::Circle { radius } => {
                    segment_circle_entry(from, delta, body.position, radius + thickness)
                },
                BodyShape::Rect {
                    half_width,
                    half_height,
                } => segment_aabb_entry(
                    from,
                    delta,
                    body.position,
                    half_width + thickness,
                    half_height + thickness,
                ),
            };

            if let Some(t) = t {
                let point = from + delta.scale(t);
                hits.push(RayIntersection {
                    body: body.id,
                    point,
                    distance: point.distance(from),
                });
            }
        }
        hits
    }
}

/// Pushout vector moving circle `a` away from circle `b`, if they overlap.
fn circle_circle_pushout(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Vec2> {
    let axis = a - b;
    let dist = axis.length();
    let overlap = ra + rb - dist;
    if overlap <= 0.0 {
        return None;
    }
    // Coincident centers have no separation axis; pick one.
    let dir = if dist > 0.0 {
        axis.scale(1.0 / dist)
    } else {
        Vec2::RIGHT
    };
    Some(dir.scale(overlap))
}

/// Pushout vector moving a circle out of a rectangle, if they overlap.
fn circle_rect_pushout(center: Vec2, radius: f32, rect_pos: Vec2, shape: BodyShape) -> Option<Vec2> {
    let BodyShape::Rect {
        half_width,
        half_height,
    } = shape
    else {
        return None;
    };

    let local = center - rect_pos;
    let closest = Vec2::new(
        local.x.clamp(-half_width, half_width),
        local.y.clamp(-half_height, half_height),
    );
    let axis = local - closest;
    let dist = axis.length();
    if dist >= radius {
        return None;
    }
    if dist > 0.0 {
        Some(axis.scale((radius - dist) / dist))
    } else {
        // Center inside the rectangle: push out along the shallow axis.
        let dx = half_width - local.x.abs();
        let dy = half_height - local.y.abs();
        if dx < dy {
            Some(Vec2::new((radius + dx) * local.x.signum(), 0.0))
        } else {
            Some(Vec2::new(0.0, (radius + dy) * local.y.signum()))
        }
    }
}

/// Entry parameter `t` in [0, 1] of a segment into a circle, if any.
fn segment_circle_entry(origin: Vec2, delta: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let f = origin - center;
    let a = delta.dot(delta);
    let b = 2.0 * f.dot(delta);
    let c = f.dot(f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a <= 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t_entry = (-b - sqrt_d) / (2.0 * a);
    let t_exit = (-b + sqrt_d) / (2.0 * a);

    if (0.0..=1.0).contains(&t_entry) {
        Some(t_entry)
    } else if t_entry < 0.0 && t_exit >= 0.0 {
        // Origin starts inside the circle.
        Some(0.0)
    } else {
        None
    }
}

/// Entry parameter `t` in [0, 1] of a segment into an AABB, if any.
fn segment_aabb_entry(
    origin: Vec2,
    delta: Vec2,
    center: Vec2,
    half_width: f32,
    half_height: f32,
) -> Option<f32> {
    let min = center - Vec2::new(half_width, half_height);
    let max = center + Vec2::new(half_width, half_height);

    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for (o, d, lo, hi) in [
        (origin.x, delta.x, min.x, max.x),
        (origin.y, delta.y, min.y, max.y),
    ] {
        if d.abs() <= f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let (t1, t2) = ((lo - o) * inv, (hi - o) * inv);
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min)
}
