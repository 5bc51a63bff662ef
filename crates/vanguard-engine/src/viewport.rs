//! Scrolling camera viewport.
//!
//! The viewport maintains a world-to-screen offset and follows the
//! tracked point (the cursor) with edge scrolling: when the point nears a
//! screen edge, the view scrolls in that direction, eased quadratically by
//! how deep into the border zone the point is. The offset is clamped so
//! the world's edges, plus a fixed margin, are never scrolled past.

use vanguard_common::Vec2;

use crate::easing::quad_out;

/// Default width of the edge-scroll zone, in screen units.
pub const DEFAULT_BORDER: f32 = 100.0;

/// Default overscroll margin past the world edges, in world units.
pub const DEFAULT_MARGIN: f32 = 100.0;

/// Default scroll speed, in world units per millisecond.
pub const DEFAULT_SCROLL_SPEED: f32 = 0.5;

/// World-to-screen camera with edge scrolling.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// World-to-screen translation
    offset: Vec2,
    /// World extent
    world_size: Vec2,
    /// Screen extent
    screen_size: Vec2,
    /// Width of the edge zone that triggers scrolling
    border: f32,
    /// Overscroll allowance past the world edges
    margin: f32,
    /// Scroll speed at full border penetration
    scroll_speed: f32,
}

#[allow(dead_code)]
impl Viewport {
    /// Creates a viewport centered on the world.
    #[must_use]
    pub fn new(world_size: Vec2, screen_size: Vec2) -> Self {
        let offset = Vec2::new(
            -(world_size.x * 0.5 - screen_size.x * 0.5),
            -(world_size.y * 0.5 - screen_size.y * 0.5),
        );

        Self {
            offset,
            world_size,
            screen_size,
            border: DEFAULT_BORDER,
            margin: DEFAULT_MARGIN,
            scroll_speed: DEFAULT_SCROLL_SPEED,
        }
    }

    /// Overrides the edge-scroll border width.
    #[must_use]
    pub const fn with_border(mut self, border: f32) -> Self {
        self.border = border;
        self
    }

    /// Overrides the overscroll margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Overrides the scroll speed (world units per millisecond).
    #[must_use]
    pub const fn with_scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }

    /// Current world-to-screen offset.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Updates the screen extent (window resize).
    pub fn set_screen_size(&mut self, size: Vec2) {
        self.screen_size = size;
    }

    /// Converts a world position to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }

    /// Converts a screen position to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.offset
    }

    /// Follows the tracked point for one frame.
    ///
    /// `tracked` is in screen space. Each edge contributes motion scaled
    /// by an eased factor of how far into the border zone the point sits;
    /// the resulting offset is clamped to the world bounds plus margin.
    pub fn update(&mut self, tracked: Vec2, dt_ms: f32) {
        let velocity = self.scroll_speed * dt_ms;
        let mut movement = Vec2::ZERO;

        // Right edge scrolls the world left, and so on around.
        movement.x -= velocity * self.edge_factor(tracked.x - (self.screen_size.x - self.border));
        movement.x += velocity * self.edge_factor(self.border - tracked.x);
        movement.y += velocity * self.edge_factor(self.border - tracked.y);
        movement.y -= velocity * self.edge_factor(tracked.y - (self.screen_size.y - self.border));

        self.offset += movement;
        self.clamp_offset();
    }

    /// Eased scroll factor for a border penetration depth.
    fn edge_factor(&self, penetration: f32) -> f32 {
        if penetration <= 0.0 || self.border <= 0.0 {
            return 0.0;
        }
        quad_out((penetration / self.border).clamp(0.0, 1.0))
    }

    /// Clamps the offset so world edges plus margin stay on screen.
    fn clamp_offset(&mut self) {
        self.offset.x = self.offset.x.clamp(
            -(self.world_size.x - self.screen_size.x) - self.margin,
            self.margin,
        );
        self.offset.y = self.offset.y.clamp(
            -(self.world_size.y - self.screen_size.y) - self.margin,
            self.margin,
        );
    }
}
