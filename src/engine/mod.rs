//! Liaison avec le moteur d'extraction/téléchargement externe.
//!
//! Le moteur est une boîte noire: extraction des métadonnées, négociation des formats,
//! transfert réseau et post-traitements lui sont entièrement délégués. Ce module expose:
//! - le trait `Engine`, point d'entrée utilisé par le worker;
//! - `YtDlpEngine`, l'implémentation qui pilote l'exécutable `yt-dlp`;
//! - les types échangés (`ProgressEvent`, `MediaInfo`, `EngineError`).
pub mod params;
pub mod progress;
pub mod ytdlp;

pub use params::{EngineError, MediaInfo, ProgressEvent, ProgressStatus};
pub use ytdlp::YtDlpEngine;

use std::path::PathBuf;
use futures::future::BoxFuture;
use crate::options::EngineConfig;

/// Callback appelé pour chaque événement de progression, dans l'ordre de production.
///
/// Retourner une erreur demande au moteur d'abandonner le téléchargement en cours;
/// cette erreur est alors renvoyée telle quelle par `Engine::download`.
pub type ProgressHook = Box<dyn FnMut(&ProgressEvent) -> Result<(), EngineError> + Send>;

/// Moteur de téléchargement vu par le worker
pub trait Engine: Send + Sync {
    /// Extrait les métadonnées de `url` sans rien télécharger.
    fn extract_info<'a>(
        &'a self,
        url: &'a str,
        config: &'a EngineConfig,
    ) -> BoxFuture<'a, Result<MediaInfo, EngineError>>;

    /// Télécharge `url` et applique les post-traitements de la configuration.
    /// Retourne le chemin final du fichier quand le moteur le communique.
    fn download<'a>(
        &'a self,
        url: &'a str,
        config: &'a EngineConfig,
        hook: ProgressHook,
    ) -> BoxFuture<'a, Result<Option<PathBuf>, EngineError>>;
}
