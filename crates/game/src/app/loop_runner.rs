use std::process::ExitCode;

use isorealm_engine::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(app.config, app.scene) {
        error!(error = %err, "session_failed");
        return ExitCode::FAILURE;
    }

    info!("session_exit");
    ExitCode::SUCCESS
}
