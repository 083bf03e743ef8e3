use std::io;
use std::path::PathBuf;

use engine::{resolve_app_paths, AppError, AppPaths, LoopConfig, Scene};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::controller::SessionController;
use super::session::SessionContext;

const SAVE_FILE_NAME: &str = "save.json";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("failed to start profile saver for {path}: {source}")]
    SpawnSaver {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    info!("=== Catpurrter Startup ===");

    let paths = resolve_app_paths().map_err(AppError::from)?;
    let save_path = paths.saves_dir.join(SAVE_FILE_NAME);
    info!(save_path = %save_path.display(), "save_location");

    let session =
        SessionContext::new(save_path.clone()).map_err(|source| BootstrapError::SpawnSaver {
            path: save_path,
            source,
        })?;

    Ok(AppWiring {
        config: LoopConfig::default(),
        paths,
        scene: Box::new(SessionController::new(session)),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
