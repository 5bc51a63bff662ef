//! Application lifecycle management.
//!
//! Owns the clock, the simulation world, the viewport, and the input
//! snapshot, and drives the per-frame sequence: clock tick → world tick →
//! event drain → camera follow.

use tracing::{debug, info, trace};
use vanguard_common::Vec2;
use vanguard_gameplay::events::GameEvent;
use vanguard_gameplay::input::Input;
use vanguard_gameplay::world::{SpawnSpec, World};

use crate::config::EngineConfig;
use crate::timing::GameClock;
use crate::viewport::Viewport;

/// Application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum AppMode {
    /// Normal gameplay
    #[default]
    Playing,
    /// Simulation suspended
    Paused,
    /// Main menu (not implemented)
    Menu,
}

/// Deterministic xorshift RNG for scene placement.
#[derive(Debug)]
struct SceneRng {
    state: u64,
}

impl SceneRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u64() as f32) / (u64::MAX as f32)
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Application state machine.
#[derive(Debug)]
pub struct App {
    /// Engine configuration
    config: EngineConfig,
    /// Frame timing
    clock: GameClock,
    /// The running simulation
    world: World,
    /// Scrolling camera
    viewport: Viewport,
    /// Player input snapshot
    input: Input,
    /// Application mode
    mode: AppMode,
}

#[allow(dead_code)]
impl App {
    /// Creates an application with the demo scene spawned.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::with_combat_config(config.combat_config());
        build_scene(&mut world, &config);
        world.set_paused(config.start_paused);

        let viewport = Viewport::new(
            Vec2::new(config.world_width, config.world_height),
            Vec2::new(config.screen_width, config.screen_height),
        )
        .with_border(config.camera_border)
        .with_margin(config.camera_margin)
        .with_scroll_speed(config.camera_scroll_speed);

        let mut input = Input::new();
        // Until a device layer moves it, the cursor rests on the player.
        input.set_cursor(Vec2::new(
            config.world_width / 2.0,
            config.world_height / 2.0,
        ));

        let mode = if config.start_paused {
            AppMode::Paused
        } else {
            AppMode::Playing
        };

        Self {
            config,
            clock: GameClock::new(),
            world,
            viewport,
            input,
            mode,
        }
    }

    /// Returns the current application mode.
    #[must_use]
    pub const fn mode(&self) -> AppMode {
        self.mode
    }

    /// Switches mode, pausing or resuming the simulation to match.
    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
        self.world.set_paused(mode != AppMode::Playing);
    }

    /// Returns the simulation world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Returns the input snapshot for the device layer to fill.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    /// Returns the viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Runs one wall-clock frame.
    pub fn frame(&mut self) {
        let delta_ms = self.clock.tick();
        self.advance(delta_ms);
    }

    /// Advances one frame with a fixed delta (scripted playback, tests).
    pub fn advance(&mut self, delta_ms: f32) {
        self.world.tick(delta_ms, &mut self.input);

        for event in self.world.events().drain() {
            match event {
                GameEvent::ActorDied { entity } => {
                    debug!(entity = entity.raw(), "casualty");
                },
                GameEvent::ActorHit { target, point, .. } => {
                    trace!(target_id = target.raw(), ?point, "hit effect");
                },
                GameEvent::WeaponFired { .. }
                | GameEvent::ActorSpawned { .. }
                | GameEvent::ActorDespawned { .. } => {},
            }
        }

        let tracked = self.viewport.world_to_screen(self.input.cursor());
        self.viewport.update(tracked, delta_ms);
    }

    /// Runs the configured number of headless demo frames.
    pub fn run(&mut self) {
        let frames = self.config.demo_frames;
        info!(frames, "running headless session");

        for _ in 0..frames {
            self.frame();
        }

        info!(
            actors = self.world.actors().len(),
            avg_frame_ms = self.clock.average_frame_ms(),
            "session finished"
        );
    }
}

/// Spawns the demo layout: the player soldier at world center, a ring of
/// raiders around it, and scattered barrels.
fn build_scene(world: &mut World, config: &EngineConfig) {
    let center = Vec2::new(config.world_width / 2.0, config.world_height / 2.0);
    let mut rng = SceneRng::new(config.scene_seed);

    world.spawn_player(SpawnSpec::soldier(center));

    for _ in 0..config.raider_count {
        let angle = rng.range(0.0, std::f32::consts::TAU);
        let distance = rng.range(600.0, 900.0);
        let position = center + Vec2::new(angle.cos(), angle.sin()).scale(distance);
        // Demo raiders get extended sight so they hunt the player from
        // their spawn ring.
        world.spawn(SpawnSpec::raider(position).with_ranges(200.0, 400.0, 1200.0));
    }

    for _ in 0..config.barrel_count {
        let position = center
            + Vec2::new(rng.range(-400.0, 400.0), rng.range(-400.0, 400.0));
        world.spawn(SpawnSpec::barrel(position));
    }
}
