use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
mod texture_keys;

pub use app::{
    letterbox, run_app, world_to_screen, AnalogStick, AppError, Camera2D, Canvas, Color,
    DestRect, GamepadSnapshot, InputAction, InputSnapshot, LoadedTexture, LoopConfig,
    LoopMetricsSnapshot, RenderTarget, Scene, SceneLoadError, TargetCanvas, TextureDirectory,
    TextureHandle, TextureLoadError, TextureStore, Vec2, Viewport,
};
pub use texture_keys::{validate_texture_name, TextureNameError};

pub const ROOT_ENV_VAR: &str = "REALM_ROOT";
pub const LOG_FILE_NAME: &str = "rpg_game.log";
pub const CONFIG_FILE_NAME: &str = "realm.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub scene_texture_dir: PathBuf,
    pub character_texture_dir: PathBuf,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let image_dir = root.join("res").join("image");
        Self {
            scene_texture_dir: image_dir.join("scene"),
            character_texture_dir: image_dir.join("characters"),
            config_file: root.join(CONFIG_FILE_NAME),
            log_file: root.join(LOG_FILE_NAME),
            root,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "REALM_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or res/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or res/.\n\
Set {env_var} explicitly, for example:\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\isorealm\"\n\
Bash/zsh: export {env_var}=\"/path/to/isorealm\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_res = path.join("res").is_dir();

    cargo_toml && (has_crates || has_res)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let cwd = env::current_dir().expect("cwd");
        assert!(!is_repo_marker(&cwd.join("definitely_not_a_marker")));
    }

    #[test]
    fn repo_marker_accepts_cargo_toml_with_res_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("write manifest");
        assert!(!is_repo_marker(dir.path()));

        fs::create_dir(dir.path().join("res")).expect("res dir");
        assert!(is_repo_marker(dir.path()));
    }

    #[test]
    fn app_paths_follow_resource_layout() {
        let paths = AppPaths::from_root(PathBuf::from("/game"));
        assert_eq!(
            paths.scene_texture_dir,
            PathBuf::from("/game/res/image/scene")
        );
        assert_eq!(
            paths.character_texture_dir,
            PathBuf::from("/game/res/image/characters")
        );
        assert_eq!(paths.config_file, PathBuf::from("/game/realm.json"));
        assert_eq!(paths.log_file, PathBuf::from("/game/rpg_game.log"));
    }
}
