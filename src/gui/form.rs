//! État des champs du formulaire (onglets « Basic » et « Advanced »).
//!
//! Les widgets lisent et écrivent directement ces champs; la conversion en requête
//! ne valide que la présence d'une URL.
use std::path::Path;
use crate::config::expand_home;
use crate::options::{
    AudioFormat, DownloadOptions, DownloadRequest, FormatChoice, RemuxTarget, DEFAULT_AUDIO_QUALITY,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Veuillez saisir une URL")]
    EmptyUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub url: String,
    pub format: FormatChoice,
    pub custom_format: String,
    pub audio_format: AudioFormat,
    pub audio_quality: u8,
    pub remux: RemuxTarget,
    pub playlist: bool,
    pub output_path: String,
    pub subtitles: bool,
    pub thumbnail: bool,
    pub metadata: bool,
    pub chapters: bool,
    pub split_chapters: bool,
    pub sponsorblock: bool,
    pub sponsorblock_categories: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            url: String::new(),
            format: FormatChoice::default(),
            custom_format: String::new(),
            audio_format: AudioFormat::default(),
            audio_quality: DEFAULT_AUDIO_QUALITY,
            remux: RemuxTarget::default(),
            playlist: false,
            output_path: String::new(),
            subtitles: false,
            thumbnail: false,
            metadata: false,
            chapters: false,
            split_chapters: false,
            sponsorblock: false,
            sponsorblock_categories: String::new(),
        }
    }
}

impl FormState {
    /// Le champ d'expression libre n'est visible qu'avec « Custom format code... »
    #[inline]
    pub fn shows_custom_format(&self) -> bool {
        self.format == FormatChoice::Custom
    }

    /// Lit l'ensemble des champs et construit la requête de téléchargement.
    ///
    /// Un dossier de sortie vide est remplacé par `default_output_dir`.
    pub fn to_request(&self, default_output_dir: &Path) -> Result<DownloadRequest, FormError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(FormError::EmptyUrl);
        }

        let output = self.output_path.trim();
        let output_dir = if output.is_empty() {
            default_output_dir.to_path_buf()
        } else {
            expand_home(Path::new(output))
        };

        let options = DownloadOptions {
            format: self.format,
            custom_format: if self.shows_custom_format() {
                self.custom_format.clone()
            } else {
                String::new()
            },
            audio_format: Some(self.audio_format),
            audio_quality: self.audio_quality,
            remux: self.remux,
            subtitles: self.subtitles,
            thumbnail: self.thumbnail,
            metadata: self.metadata,
            chapters: self.chapters,
            split_chapters: self.split_chapters,
            playlist: self.playlist,
            sponsorblock: self.sponsorblock,
            sponsorblock_categories: self.sponsorblock_categories.trim().to_string(),
        };

        Ok(DownloadRequest {
            url: url.to_string(),
            output_dir,
            options,
        })
    }
}
