//! Worker de téléchargement.
//!
//! Ce module regroupe:
//! - **types**: états du worker (`WorkerState`), notifications (`WorkerEvent`) et erreurs.
//! - **utils**: mise en forme de la vitesse et du temps restant.
//! - **manager**: `DownloadWorker`, la machine à états qui lance et surveille le thread.
mod types;
mod utils;
mod manager;

pub use manager::{
    DownloadWorker, DEFAULT_SHUTDOWN_TIMEOUT, STATUS_BUSY, STATUS_CANCELLED, STATUS_COMPLETE,
    STATUS_PREPARING, STATUS_STOPPING,
};
pub use types::{WorkerError, WorkerEvent, WorkerState};
pub use utils::{format_eta, format_speed};
