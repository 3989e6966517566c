//! Types décrivant les sélections de l'utilisateur et la configuration moteur.
//!
//! Invariants principaux:
//! - Chaque libellé de `FormatChoice` correspond exactement au texte affiché dans la liste
//!   déroulante; `FormatChoice::from_label` est l'inverse de `FormatChoice::label`.
//! - `EngineConfig` se sérialise avec les noms de clés du dictionnaire d'options de yt-dlp.
//!   Les clés optionnelles non renseignées sont omises.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sélection de format proposée dans l'onglet « Basic »
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatChoice {
    #[default]
    BestVideoAudio,
    BestVideoOnly,
    BestAudioOnly,
    Up1440p,
    Up1080p,
    Up720p,
    Up480p,
    Up360p,
    WorstVideoAudio,
    Custom,
}

impl FormatChoice {
    /// Toutes les valeurs, dans l'ordre d'affichage
    pub const ALL: [FormatChoice; 10] = [
        FormatChoice::BestVideoAudio,
        FormatChoice::BestVideoOnly,
        FormatChoice::BestAudioOnly,
        FormatChoice::Up1440p,
        FormatChoice::Up1080p,
        FormatChoice::Up720p,
        FormatChoice::Up480p,
        FormatChoice::Up360p,
        FormatChoice::WorstVideoAudio,
        FormatChoice::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormatChoice::BestVideoAudio => "Best (video+audio)",
            FormatChoice::BestVideoOnly => "Best video only",
            FormatChoice::BestAudioOnly => "Best audio only",
            FormatChoice::Up1440p => "1440p",
            FormatChoice::Up1080p => "1080p",
            FormatChoice::Up720p => "720p",
            FormatChoice::Up480p => "480p",
            FormatChoice::Up360p => "360p",
            FormatChoice::WorstVideoAudio => "Worst (video+audio)",
            FormatChoice::Custom => "Custom format code...",
        }
    }

    /// Retrouve une sélection à partir de son libellé exact.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.label() == label)
    }

    /// Hauteur maximale pour les libellés de résolution (`1440p`, `1080p`, ...)
    pub fn max_height(&self) -> Option<u32> {
        match self {
            FormatChoice::Up1440p => Some(1440),
            FormatChoice::Up1080p => Some(1080),
            FormatChoice::Up720p => Some(720),
            FormatChoice::Up480p => Some(480),
            FormatChoice::Up360p => Some(360),
            _ => None,
        }
    }

    /// Vrai pour les sélections qui ne récupèrent que la piste audio
    #[inline]
    pub fn is_audio_only(&self) -> bool {
        matches!(self, FormatChoice::BestAudioOnly)
    }
}

/// Codec audio demandé au moteur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFormat {
    #[default]
    Best,
    Aac,
    Alac,
    Flac,
    M4a,
    Mp3,
    Opus,
    Vorbis,
    Wav,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 9] = [
        AudioFormat::Best,
        AudioFormat::Aac,
        AudioFormat::Alac,
        AudioFormat::Flac,
        AudioFormat::M4a,
        AudioFormat::Mp3,
        AudioFormat::Opus,
        AudioFormat::Vorbis,
        AudioFormat::Wav,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Best => "best",
            AudioFormat::Aac => "aac",
            AudioFormat::Alac => "alac",
            AudioFormat::Flac => "flac",
            AudioFormat::M4a => "m4a",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Opus => "opus",
            AudioFormat::Vorbis => "vorbis",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Conteneur cible du remuxage; `Default` laisse le moteur convertir en mp4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RemuxTarget {
    #[default]
    Default,
    Mp4,
    Mkv,
    Webm,
    Mov,
    Flv,
    Avi,
}

impl RemuxTarget {
    pub const ALL: [RemuxTarget; 7] = [
        RemuxTarget::Default,
        RemuxTarget::Mp4,
        RemuxTarget::Mkv,
        RemuxTarget::Webm,
        RemuxTarget::Mov,
        RemuxTarget::Flv,
        RemuxTarget::Avi,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RemuxTarget::Default => "Default",
            RemuxTarget::Mp4 => "mp4",
            RemuxTarget::Mkv => "mkv",
            RemuxTarget::Webm => "webm",
            RemuxTarget::Mov => "mov",
            RemuxTarget::Flv => "flv",
            RemuxTarget::Avi => "avi",
        }
    }

    /// Extension du conteneur si un remuxage explicite est demandé
    pub fn container(&self) -> Option<&'static str> {
        match self {
            RemuxTarget::Default => None,
            other => Some(other.label()),
        }
    }
}

/// Qualité audio VBR, de 0 (meilleure) à 10 (sans perte côté interface)
pub const MAX_AUDIO_QUALITY: u8 = 10;
pub const DEFAULT_AUDIO_QUALITY: u8 = 5;

/// Libellé affiché sous le curseur de qualité audio
pub fn audio_quality_label(quality: u8) -> String {
    if quality < MAX_AUDIO_QUALITY {
        format!("VBR {}", quality)
    } else {
        "Lossless".to_string()
    }
}

/// Ensemble des choix de l'utilisateur, tels que lus dans le formulaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub format: FormatChoice,
    /// Expression libre, utilisée seulement avec `FormatChoice::Custom`
    pub custom_format: String,
    pub audio_format: Option<AudioFormat>,
    pub audio_quality: u8,
    pub remux: RemuxTarget,
    pub subtitles: bool,
    pub thumbnail: bool,
    pub metadata: bool,
    pub chapters: bool,
    pub split_chapters: bool,
    pub playlist: bool,
    pub sponsorblock: bool,
    /// Catégories séparées par des virgules; vide signifie « all »
    pub sponsorblock_categories: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            format: FormatChoice::default(),
            custom_format: String::new(),
            audio_format: Some(AudioFormat::default()),
            audio_quality: DEFAULT_AUDIO_QUALITY,
            remux: RemuxTarget::default(),
            subtitles: false,
            thumbnail: false,
            metadata: false,
            chapters: false,
            split_chapters: false,
            playlist: false,
            sponsorblock: false,
            sponsorblock_categories: String::new(),
        }
    }
}

/// Requête de téléchargement créée à la soumission du formulaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub output_dir: PathBuf,
    pub options: DownloadOptions,
}

/// Étape de post-traitement confiée au moteur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key")]
pub enum PostProcessor {
    FFmpegExtractAudio {
        preferredcodec: String,
        preferredquality: String,
    },
    FFmpegVideoConvertor {
        // orthographe imposée par yt-dlp
        preferedformat: String,
    },
}

/// Dictionnaire d'options transmis au moteur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub format: String,
    pub outtmpl: String,
    pub quiet: bool,
    pub no_warnings: bool,
    pub ignoreerrors: bool,
    pub restrictfilenames: bool,
    pub merge_output_format: String,
    pub postprocessors: Vec<PostProcessor>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audioformat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub audioquality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remuxvideo: Option<String>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub writesubtitles: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subtitleslangs: Vec<String>,
    #[serde(skip_serializing_if = "is_false", default)]
    pub embedsubtitles: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub writethumbnail: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub embedthumbnail: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub addmetadata: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub embedchapters: bool,
    #[serde(skip_serializing_if = "is_false", default)]
    pub splitchapters: bool,
    pub noplaylist: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sponsorblock_remove: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
