use std::path::PathBuf;
use serde::Deserialize;

/// Étape rapportée par le moteur dans un événement de progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStatus {
    Downloading,
    Finished,
    Error,
    Other(String),
}

impl ProgressStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "downloading" => ProgressStatus::Downloading,
            "finished" => ProgressStatus::Finished,
            "error" => ProgressStatus::Error,
            other => ProgressStatus::Other(other.to_string()),
        }
    }
}

/// Événement de progression émis par le moteur pendant un téléchargement
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
    /// octets par seconde
    pub speed: Option<f64>,
    /// secondes restantes
    pub eta: Option<i64>,
}

impl ProgressEvent {
    /// Crée un événement « downloading » sans vitesse ni ETA
    pub fn downloading(downloaded: u64, total: Option<u64>) -> Self {
        Self {
            status: ProgressStatus::Downloading,
            downloaded_bytes: Some(downloaded),
            total_bytes: total,
            total_bytes_estimate: None,
            speed: None,
            eta: None,
        }
    }

    /// Pourcentage entier (tronqué) si une taille totale, exacte ou estimée, est connue.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_bytes.or(self.total_bytes_estimate).filter(|t| *t > 0)?;
        let downloaded = self.downloaded_bytes.unwrap_or(0);
        let percent = (downloaded as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
        Some(percent as u8)
    }
}

/// Métadonnées retournées par la phase d'extraction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub ext: Option<String>,
    pub filename: Option<String>,
    #[serde(rename = "_filename")]
    pub prepared_filename: Option<String>,
}

impl MediaInfo {
    /// Titre affichable, « video » à défaut
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("video")
    }

    /// Nom de fichier préparé par le moteur à partir du gabarit de sortie
    pub fn output_path(&self) -> Option<PathBuf> {
        self.filename
            .as_deref()
            .or(self.prepared_filename.as_deref())
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("impossible de lancer {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    /// Message d'erreur rapporté par le moteur lui-même
    #[error("{0}")]
    Failed(String),
    #[error("impossible d'extraire les informations de la vidéo")]
    NoInfo,
    #[error("réponse du moteur illisible: {0}")]
    Json(#[from] serde_json::Error),
    #[error("erreur io: {0}")]
    Io(#[from] std::io::Error),
    #[error("téléchargement arrêté par l'utilisateur")]
    Cancelled,
}

impl EngineError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}
