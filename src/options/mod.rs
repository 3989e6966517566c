//! Correspondance entre les choix de l'utilisateur et les options du moteur.
//!
//! Ce module regroupe:
//! - **types**: sélections du formulaire (`DownloadOptions`, `FormatChoice`, ...) et
//!   dictionnaire d'options moteur (`EngineConfig`).
//! - **mapper**: fonction pure `build_engine_config`, table des expressions de format.
//! - **args**: traduction de `EngineConfig` en arguments CLI pour yt-dlp.
mod types;
mod mapper;
mod args;

pub use args::engine_args;
pub use mapper::{
    build_engine_config, default_format_expression, fixed_format_expression, DEFAULT_AUDIO_EXT,
    DEFAULT_SPONSORBLOCK_SCOPE, DEFAULT_VIDEO_EXT, OUTPUT_TEMPLATE,
};
pub use types::{
    audio_quality_label, AudioFormat, DownloadOptions, DownloadRequest, EngineConfig, FormatChoice,
    PostProcessor, RemuxTarget, DEFAULT_AUDIO_QUALITY, MAX_AUDIO_QUALITY,
};

impl DownloadRequest {
    /// Configuration moteur de cette requête, reconstruite à chaque appel.
    pub fn engine_config(&self) -> EngineConfig {
        build_engine_config(&self.output_dir, &self.options)
    }
}
