use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Largest accepted world side, in tiles.
const MAX_WORLD_SIDE: u32 = 1024;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config '{path}' at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value at {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RealmConfig {
    pub(crate) window: WindowSection,
    pub(crate) render: RenderSection,
    pub(crate) world: WorldSection,
    pub(crate) actor: ActorSection,
    pub(crate) debug: DebugSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowSection {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderSection {
    pub(crate) game_width: u32,
    pub(crate) game_height: u32,
    /// `0` disables the frame cap.
    pub(crate) max_fps: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) frame_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ActorSection {
    /// Tiles per second.
    pub(crate) speed: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DebugSection {
    pub(crate) collision_boxes: bool,
    pub(crate) hud: bool,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Pyso Realm".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            game_width: 1920,
            game_height: 1080,
            max_fps: 144,
        }
    }
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            frame_seed: 476,
        }
    }
}

impl Default for ActorSection {
    fn default() -> Self {
        Self { speed: 3.0 }
    }
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            collision_boxes: true,
            hud: true,
        }
    }
}

impl RealmConfig {
    /// Reads `path` if it exists; a missing file means all defaults.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config_not_found_using_defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse(path, &raw)?;
        info!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    pub(crate) fn parse(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: RealmConfig = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| {
                let location = error.path().to_string();
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    location,
                    source: error.into_inner(),
                }
            })?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.world.width < 3 {
            return Err(invalid("world.width", self.world.width, "at least 3"));
        }
        if self.world.height < 3 {
            return Err(invalid("world.height", self.world.height, "at least 3"));
        }
        // The per-frame cell scan only covers every cell of a square grid.
        if self.world.width != self.world.height {
            return Err(ConfigError::Invalid {
                field: "world",
                reason: format!(
                    "width and height must match, got {}x{}",
                    self.world.width, self.world.height
                ),
            });
        }
        if self.world.width > MAX_WORLD_SIDE {
            return Err(invalid(
                "world.width",
                self.world.width,
                &format!("at most {MAX_WORLD_SIDE}"),
            ));
        }
        if !self.actor.speed.is_finite() || self.actor.speed <= 0.0 {
            return Err(invalid("actor.speed", self.actor.speed, "a positive number"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: "width and height must be non-zero".to_string(),
            });
        }
        if self.render.game_width == 0 || self.render.game_height == 0 {
            return Err(ConfigError::Invalid {
                field: "render",
                reason: "game_width and game_height must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

fn invalid(field: &'static str, actual: impl std::fmt::Display, expected: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: format!("expected {expected}, got {actual}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<RealmConfig, ConfigError> {
        RealmConfig::parse(Path::new("realm.json"), raw)
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse("{}").expect("defaults");
        assert_eq!(config, RealmConfig::default());
        assert_eq!(config.world.frame_seed, 476);
        assert_eq!(config.actor.speed, 3.0);
        assert_eq!(config.render.max_fps, 144);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(r#"{ "world": { "frame_seed": 7 }, "debug": { "hud": false } }"#)
            .expect("partial config");
        assert_eq!(config.world.frame_seed, 7);
        assert_eq!(config.world.width, 12);
        assert_eq!(config.world.height, 12);
        assert!(!config.debug.hud);
        assert!(config.debug.collision_boxes);
    }

    #[test]
    fn unknown_field_is_rejected_with_location() {
        let error = parse(r#"{ "world": { "depth": 3 } }"#).expect_err("unknown field");
        match error {
            ConfigError::Parse { location, .. } => {
                assert!(location.starts_with("world"), "{location}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn type_mismatch_reports_path() {
        let error = parse(r#"{ "actor": { "speed": "fast" } }"#).expect_err("bad type");
        let message = error.to_string();
        assert!(message.contains("actor.speed"), "{message}");
    }

    #[test]
    fn tiny_world_is_invalid() {
        let error = parse(r#"{ "world": { "width": 2 } }"#).expect_err("too small");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "world.width",
                ..
            }
        ));
    }

    #[test]
    fn square_world_of_another_size_is_accepted() {
        let config =
            parse(r#"{ "world": { "width": 16, "height": 16 } }"#).expect("16x16 world");
        assert_eq!(config.world.width, 16);
        assert_eq!(config.world.height, 16);
    }

    #[test]
    fn non_square_world_is_invalid() {
        for raw in [
            r#"{ "world": { "width": 16 } }"#,
            r#"{ "world": { "width": 3, "height": 5 } }"#,
        ] {
            let error = parse(raw).expect_err("non-square world");
            assert!(
                matches!(error, ConfigError::Invalid { field: "world", .. }),
                "{raw}: {error}"
            );
        }
    }

    #[test]
    fn oversized_world_is_invalid() {
        let error = parse(r#"{ "world": { "width": 70000, "height": 70000 } }"#)
            .expect_err("oversized world");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "world.width",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_speed_is_invalid() {
        let error = parse(r#"{ "actor": { "speed": 0.0 } }"#).expect_err("zero speed");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "actor.speed",
                ..
            }
        ));
    }

    #[test]
    fn zero_resolution_is_invalid() {
        let error = parse(r#"{ "render": { "game_width": 0 } }"#).expect_err("zero width");
        assert!(matches!(error, ConfigError::Invalid { field: "render", .. }));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = RealmConfig::load(&dir.path().join("realm.json")).expect("defaults");
        assert_eq!(config, RealmConfig::default());
    }

    #[test]
    fn file_on_disk_is_parsed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("realm.json");
        fs::write(&path, r#"{ "window": { "title": "Test Realm" } }"#).expect("write config");

        let config = RealmConfig::load(&path).expect("config");
        assert_eq!(config.window.title, "Test Realm");
        assert_eq!(config.window.width, 1920);
    }
}
