use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use isorealm_engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use super::config::{ConfigError, RealmConfig};
use super::realm;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    let paths = resolve_app_paths();
    init_tracing(paths.as_ref().ok().map(|paths| paths.log_file.as_path()));
    let paths = paths?;
    info!(
        root = %paths.root.display(),
        version = env!("CARGO_PKG_VERSION"),
        "session_start"
    );

    let realm_config = RealmConfig::load(&paths.config_file)?;
    let config = loop_config(&realm_config);
    info!(
        width = realm_config.world.width,
        height = realm_config.world.height,
        seed = realm_config.world.frame_seed,
        "realm_configured"
    );

    Ok(AppWiring {
        config,
        scene: realm::build_scene(&realm_config, &paths),
    })
}

fn loop_config(realm_config: &RealmConfig) -> LoopConfig {
    let max_fps = realm_config.render.max_fps;
    LoopConfig {
        window_title: realm_config.window.title.clone(),
        window_width: realm_config.window.width,
        window_height: realm_config.window.height,
        game_width: realm_config.render.game_width,
        game_height: realm_config.render.game_height,
        max_render_fps: (max_fps > 0).then_some(max_fps),
        hud_enabled: realm_config.debug.hud,
        ..LoopConfig::default()
    }
}

/// Console output plus an appended plain-text log file. Without a usable
/// file only the console layer is installed.
fn init_tracing(log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .with_target(false)
        .with_thread_names(true)
        .compact();

    let mut open_error = None;
    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(error) => {
                open_error = Some((path.to_path_buf(), error));
                None
            }
        }
    });
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    if let Some((path, error)) = open_error {
        warn!(path = %path.display(), error = %error, "log_file_unavailable");
    }
}
