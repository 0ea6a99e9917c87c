//! The isometric realm: tile mapping, input, world population, collision,
//! animation and the per-frame orchestration that ties them together.

mod actor;
mod animation;
mod catalog;
mod collision;
mod coords;
mod input;
mod rng;
mod scene;
mod session;
mod world;

use isorealm_engine::{AppPaths, Scene, Viewport};

use super::config::RealmConfig;
use scene::RealmScene;
use session::{SessionSettings, SessionState};
use world::WorldSize;

impl From<&RealmConfig> for SessionSettings {
    fn from(config: &RealmConfig) -> Self {
        Self {
            world: WorldSize {
                width: config.world.width,
                height: config.world.height,
            },
            frame_seed: config.world.frame_seed,
            speed: config.actor.speed,
            collision_boxes: config.debug.collision_boxes,
            render_size: Viewport {
                width: config.render.game_width,
                height: config.render.game_height,
            },
        }
    }
}

pub(crate) fn build_scene(config: &RealmConfig, paths: &AppPaths) -> Box<dyn Scene> {
    let session = SessionState::new(SessionSettings::from(config));
    Box::new(RealmScene::new(
        session,
        paths.scene_texture_dir.clone(),
        paths.character_texture_dir.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config_sections() {
        let mut config = RealmConfig::default();
        config.world.width = 16;
        config.world.frame_seed = 7;
        config.actor.speed = 4.5;
        config.debug.collision_boxes = false;
        config.render.game_width = 1280;
        config.render.game_height = 720;

        let settings = SessionSettings::from(&config);

        assert_eq!(
            settings.world,
            WorldSize {
                width: 16,
                height: 12
            }
        );
        assert_eq!(settings.frame_seed, 7);
        assert_eq!(settings.speed, 4.5);
        assert!(!settings.collision_boxes);
        assert_eq!(
            settings.render_size,
            Viewport {
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn default_session_spawns_in_the_middle_of_the_realm() {
        let session = SessionState::new(SessionSettings::from(&RealmConfig::default()));
        assert_eq!(session.actor.position, isorealm_engine::Vec2::new(5.5, 5.5));
    }
}
