//! Configuration de l'application, lue depuis un fichier TOML optionnel.
//!
//! Emplacement: `$YTDLP_GUI_CONFIG`, sinon `<dossier de config>/ytdlp-gui/config.toml`.
//! Un fichier absent donne la configuration par défaut. Le fichier n'est jamais écrit:
//! les réglages du formulaire ne sont pas conservés d'une session à l'autre.
//!
//! ```toml
//! [engine]
//! binary = "/usr/local/bin/yt-dlp"
//! extra_args = []
//!
//! [download]
//! output_dir = "~/Videos"
//!
//! [worker]
//! shutdown_timeout_ms = 2000
//! ```
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use crate::engine::YtDlpEngine;
use crate::worker::DEFAULT_SHUTDOWN_TIMEOUT;

pub const CONFIG_ENV_VAR: &str = "YTDLP_GUI_CONFIG";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("lecture de {path} impossible: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("fichier de configuration invalide {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Exécutable yt-dlp, résolu via le PATH s'il n'est pas absolu
    pub binary: PathBuf,
    /// Arguments placés avant ceux générés à partir du formulaire
    pub extra_args: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Dossier utilisé quand le champ de sortie est vide
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    pub shutdown_timeout_ms: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub download: DownloadSettings,
    pub worker: WorkerSettings,
}

impl AppConfig {
    /// Chemin du fichier de configuration, s'il peut être déterminé
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("ytdlp-gui").join("config.toml"))
    }

    /// Charge la configuration depuis l'emplacement par défaut.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Charge `path`; un fichier absent n'est pas une erreur.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.worker.shutdown_timeout_ms)
    }

    /// Moteur yt-dlp configuré
    pub fn engine(&self) -> YtDlpEngine {
        YtDlpEngine::new(&self.engine.binary).with_extra_args(self.engine.extra_args.clone())
    }

    /// Dossier de sortie par défaut: configuré, sinon Téléchargements de l'utilisateur.
    pub fn default_output_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.download.output_dir {
            return expand_home(dir);
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Remplace un `~` initial par le dossier personnel.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
