//! Engine configuration.
//!
//! Configurable parameters for the world, camera, combat tuning, and the
//! demo scene. Configuration is loaded from a TOML file when present and
//! falls back to defaults otherwise; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};
use vanguard_gameplay::combat::CombatConfig;

/// Configuration file name.
pub const CONFIG_FILE: &str = "vanguard.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === World Settings ===
    /// World width in world units
    pub world_width: f32,
    /// World height in world units
    pub world_height: f32,

    // === Screen Settings ===
    /// Logical screen width
    pub screen_width: f32,
    /// Logical screen height
    pub screen_height: f32,

    // === Camera Settings ===
    /// Edge-scroll border width
    pub camera_border: f32,
    /// Overscroll margin past the world edges
    pub camera_margin: f32,
    /// Scroll speed in world units per millisecond
    pub camera_scroll_speed: f32,

    // === Combat Settings ===
    /// Attack ray tolerance band
    pub ray_thickness: f32,
    /// Knockback impulse scale per hit
    pub hit_force_scale: f32,
    /// Health removed per hit
    pub hit_damage: f32,

    // === Demo Scene ===
    /// Number of raiders to spawn
    pub raider_count: u32,
    /// Number of barrels to spawn
    pub barrel_count: u32,
    /// Seed for scene placement
    pub scene_seed: u64,
    /// Frames to simulate in a headless run
    pub demo_frames: u64,
    /// Start with the simulation paused
    pub start_paused: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // World
            world_width: 3000.0,
            world_height: 2000.0,

            // Screen
            screen_width: 1280.0,
            screen_height: 720.0,

            // Camera
            camera_border: 100.0,
            camera_margin: 100.0,
            camera_scroll_speed: 0.5,

            // Combat
            ray_thickness: 40.0,
            hit_force_scale: 0.1,
            hit_damage: 10.0,

            // Demo scene
            raider_count: 5,
            barrel_count: 3,
            scene_seed: 0x5eed,
            demo_frames: 600,
            start_paused: false,
        }
    }
}

#[allow(dead_code)]
impl EngineConfig {
    /// Loads configuration from a file, falling back to defaults.
    ///
    /// A missing file is normal (first run); a malformed file logs a
    /// warning and the defaults are used.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("loaded configuration from {}", path.display());
                    config
                },
                Err(err) => {
                    warn!("malformed config {}: {err}; using defaults", path.display());
                    Self::default()
                },
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                warn!("could not read {}: {err}; using defaults", path.display());
                Self::default()
            },
        }
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Combat parameters derived from this configuration.
    #[must_use]
    pub fn combat_config(&self) -> CombatConfig {
        CombatConfig::new()
            .with_ray_thickness(self.ray_thickness)
            .with_hit_force_scale(self.hit_force_scale)
            .with_hit_damage(self.hit_damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.world_width, 3000.0);
        assert_eq!(config.ray_thickness, 40.0);
        assert_eq!(config.raider_count, 5);
        assert!(!config.start_paused);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.raider_count = 12;
        config.hit_damage = 25.0;
        config.save(&path).expect("save should succeed");

        let loaded = EngineConfig::load(&path);
        assert_eq!(loaded.raider_count, 12);
        assert_eq!(loaded.hit_damage, 25.0);
        assert_eq!(loaded.world_width, config.world_width);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let config = EngineConfig::load(&dir.path().join("nope.toml"));
        assert_eq!(config.raider_count, EngineConfig::default().raider_count);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "raider_count = 9\n").expect("write should succeed");

        let config = EngineConfig::load(&path);
        assert_eq!(config.raider_count, 9);
        assert_eq!(config.hit_damage, EngineConfig::default().hit_damage);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "raider_count = \"many\"\n").expect("write should succeed");

        let config = EngineConfig::load(&path);
        assert_eq!(config.raider_count, EngineConfig::default().raider_count);
    }

    #[test]
    fn test_combat_config_derived() {
        let mut config = EngineConfig::default();
        config.ray_thickness = 0.0;
        config.hit_damage = 50.0;

        let combat = config.combat_config();
        assert_eq!(combat.ray_thickness, 0.0);
        assert_eq!(combat.hit_damage, 50.0);
        assert_eq!(combat.hit_force_scale, 0.1);
    }
}
