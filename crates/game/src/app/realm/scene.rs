use std::path::{Path, PathBuf};

use isorealm_engine::{
    Canvas, InputSnapshot, Scene, SceneLoadError, TextureDirectory, TextureLoadError,
    TextureStore,
};
use tracing::{info, warn};

use super::catalog::TextureTable;
use super::session::SessionState;

/// The isometric realm as seen by the frame loop.
pub(crate) struct RealmScene {
    scene_texture_dir: PathBuf,
    character_texture_dir: PathBuf,
    session: SessionState,
    directories: Vec<TextureDirectory>,
    textures: TextureTable,
}

impl RealmScene {
    pub(crate) fn new(
        session: SessionState,
        scene_texture_dir: PathBuf,
        character_texture_dir: PathBuf,
    ) -> Self {
        Self {
            scene_texture_dir,
            character_texture_dir,
            session,
            directories: Vec::new(),
            textures: TextureTable::default(),
        }
    }
}

/// A missing directory leaves every texture in it unavailable; any other
/// failure aborts the load.
fn load_or_empty(
    store: &mut TextureStore,
    dir: &Path,
) -> Result<TextureDirectory, TextureLoadError> {
    match store.load_directory(dir) {
        Ok(directory) => Ok(directory),
        Err(TextureLoadError::DirectoryNotFound { path }) => {
            warn!(dir = %path.display(), "texture_directory_missing");
            Ok(TextureDirectory::empty(path))
        }
        Err(error) => Err(error),
    }
}

impl Scene for RealmScene {
    fn load(&mut self, textures: &mut TextureStore) -> Result<(), SceneLoadError> {
        let scene = load_or_empty(textures, &self.scene_texture_dir)?;
        let characters = load_or_empty(textures, &self.character_texture_dir)?;
        self.textures = TextureTable::resolve(&scene, &characters);
        self.directories = vec![scene, characters];
        info!(
            loaded = textures.loaded_count(),
            missing = self.textures.missing(),
            "realm_textures_ready"
        );
        Ok(())
    }

    fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        self.session.tick(dt_seconds, input);
    }

    fn render(&mut self, canvas: &mut dyn Canvas) {
        self.session.draw(canvas, &self.textures);
    }

    fn end_frame(&mut self, dt_seconds: f32) {
        self.session.end_frame(dt_seconds);
    }

    fn unload(&mut self, textures: &mut TextureStore) {
        let released: usize = self
            .directories
            .drain(..)
            .map(|directory| textures.unload_directory(&directory))
            .sum();
        self.textures = TextureTable::default();
        info!(released, "scene_unloaded");
    }

    fn debug_lines(&self) -> Vec<String> {
        self.session.debug_lines()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use isorealm_engine::{InputAction, RenderTarget, TextureHandle, Viewport};

    use super::*;
    use crate::app::realm::animation::CharacterPose;
    use crate::app::realm::input::Direction;
    use crate::app::realm::session::{SessionSettings, CLEAR_COLOR};
    use crate::app::realm::world::WorldSize;

    fn small_session() -> SessionState {
        SessionState::new(SessionSettings {
            world: WorldSize {
                width: 12,
                height: 12,
            },
            frame_seed: 476,
            speed: 3.0,
            collision_boxes: true,
            render_size: Viewport {
                width: 64,
                height: 36,
            },
        })
    }

    fn write_png(dir: &Path, name: &str) {
        RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]))
            .save(dir.join(name))
            .expect("write png");
    }

    fn asset_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let root = tempfile::tempdir().expect("tempdir");
        let scene = root.path().join("scene");
        let characters = root.path().join("characters");
        fs::create_dir_all(&scene).expect("scene dir");
        fs::create_dir_all(&characters).expect("character dir");
        (root, scene, characters)
    }

    #[test]
    fn load_resolves_present_textures_and_unload_releases_them() {
        let (_root, scene_dir, character_dir) = asset_dirs();
        write_png(&scene_dir, "stone_N.png");
        write_png(&scene_dir, "barrel_E.png");
        write_png(&character_dir, "Male_0_Idle0.png");
        let mut store = TextureStore::new();
        let mut scene = RealmScene::new(small_session(), scene_dir, character_dir);

        scene.load(&mut store).expect("load");

        assert_eq!(store.loaded_count(), 3);
        assert!(scene.textures.floor(0).is_loaded());
        assert!(scene.textures.scenery(1).is_loaded());
        assert!(scene
            .textures
            .character(Direction::North, CharacterPose::Idle)
            .is_loaded());
        assert_eq!(scene.textures.missing(), scene.textures.entry_count() - 3);

        scene.unload(&mut store);
        assert_eq!(store.loaded_count(), 0);
        assert_eq!(scene.textures.floor(0), TextureHandle::NOT_LOADED);
    }

    #[test]
    fn missing_directories_are_not_fatal() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut store = TextureStore::new();
        let mut scene = RealmScene::new(
            small_session(),
            root.path().join("no_scene"),
            root.path().join("no_characters"),
        );

        scene.load(&mut store).expect("load without assets");

        assert_eq!(store.loaded_count(), 0);
        assert_eq!(scene.textures.missing(), scene.textures.entry_count());
    }

    #[test]
    fn frame_without_assets_renders_clear_color() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut store = TextureStore::new();
        let mut scene = RealmScene::new(
            small_session(),
            root.path().join("scene"),
            root.path().join("characters"),
        );
        scene.load(&mut store).expect("load");

        let input = InputSnapshot::empty().with_debug_visible(false);
        scene.update(0.016, &input);
        let mut target = RenderTarget::new(64, 36);
        scene.render(&mut target.canvas(&store));
        scene.end_frame(0.016);

        assert!(target
            .rgba()
            .chunks_exact(4)
            .all(|px| px == CLEAR_COLOR.0.as_slice()));
    }

    #[test]
    fn update_and_debug_lines_go_through_the_session() {
        let mut scene = RealmScene::new(
            small_session(),
            PathBuf::from("scene"),
            PathBuf::from("characters"),
        );
        let input = InputSnapshot::empty()
            .with_debug_visible(true)
            .with_action_down(InputAction::Left, true);

        scene.update(0.0, &input);

        assert_eq!(scene.debug_lines()[0], "x:-1, y:-1");
    }
}
