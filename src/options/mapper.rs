//! Traduction des sélections du formulaire en configuration moteur.
//!
//! Fonction pure: aucune E/S, aucun état. Les expressions de format doivent rester
//! identiques caractère pour caractère à celles attendues par les utilisateurs existants.
use std::path::Path;
use crate::options::types::{DownloadOptions, EngineConfig, FormatChoice, PostProcessor};

/// Conteneur vidéo utilisé quand aucun remuxage n'est demandé
pub const DEFAULT_VIDEO_EXT: &str = "mp4";
/// Extension audio utilisée quand aucun format audio n'est fourni
pub const DEFAULT_AUDIO_EXT: &str = "m4a";
/// Portée SponsorBlock quand le champ des catégories est vide
pub const DEFAULT_SPONSORBLOCK_SCOPE: &str = "all";
/// Gabarit de nom de fichier: titre de la source + extension finale
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Expression par défaut, partagée par « Best (video+audio) » et un format personnalisé vide.
pub fn default_format_expression(video_ext: &str, audio_ext: &str) -> String {
    format!("bestvideo[ext={video_ext}]+bestaudio[ext={audio_ext}]/best[ext={video_ext}]/best")
}

/// Expression de format d'une sélection fixe, paramétrée par les extensions choisies.
///
/// `FormatChoice::Custom` retourne l'expression par défaut; l'expression libre est
/// appliquée par `format_expression`.
pub fn fixed_format_expression(choice: FormatChoice, video_ext: &str, audio_ext: &str) -> String {
    if let Some(height) = choice.max_height() {
        return format!(
            "bestvideo[height<={height}][ext={video_ext}]+bestaudio[ext={audio_ext}]/best[height<={height}][ext={video_ext}]"
        );
    }
    match choice {
        FormatChoice::BestVideoOnly => format!("bestvideo[ext={video_ext}]"),
        FormatChoice::BestAudioOnly => format!("bestaudio[ext={audio_ext}]"),
        FormatChoice::WorstVideoAudio => {
            format!("worstvideo[ext={video_ext}]+worstaudio[ext={audio_ext}]/worst[ext={video_ext}]")
        }
        _ => default_format_expression(video_ext, audio_ext),
    }
}

/// Expression finale: l'expression libre si elle est renseignée, sinon celle de la table.
pub fn format_expression(options: &DownloadOptions, video_ext: &str, audio_ext: &str) -> String {
    if options.format == FormatChoice::Custom {
        let custom = options.custom_format.trim();
        if !custom.is_empty() {
            // transmis tel quel; une expression invalide sera rejetée par le moteur
            return options.custom_format.clone();
        }
    }
    fixed_format_expression(options.format, video_ext, audio_ext)
}

/// Extension vidéo effective: le conteneur de remuxage, sinon mp4.
pub fn video_ext(options: &DownloadOptions) -> String {
    options
        .remux
        .container()
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_VIDEO_EXT.to_string())
}

/// Extension audio effective: le format choisi, sinon m4a.
pub fn audio_ext(options: &DownloadOptions) -> String {
    options
        .audio_format
        .map(|f| f.as_str().to_lowercase())
        .unwrap_or_else(|| DEFAULT_AUDIO_EXT.to_string())
}

/// Construit la configuration moteur pour un dossier de sortie et des options données.
///
/// Règles:
/// - Sélection audio seule: extraction audio avec le codec et la qualité choisis.
/// - Autres sélections: conversion vidéo vers le conteneur effectif.
/// - Remuxage explicite: aucune étape de post-traitement, `remuxvideo` renseigné.
/// - Liste de lecture désactivée: un seul élément (`noplaylist`).
/// - SponsorBlock: suppression des segments pour les catégories données (« all » si vide).
pub fn build_engine_config(output_dir: &Path, options: &DownloadOptions) -> EngineConfig {
    let video_ext = video_ext(options);
    let audio_ext = audio_ext(options);
    let quality = options.audio_quality.to_string();

    let mut postprocessors = Vec::with_capacity(1);
    if options.format.is_audio_only() {
        postprocessors.push(PostProcessor::FFmpegExtractAudio {
            preferredcodec: audio_ext.clone(),
            preferredquality: quality.clone(),
        });
    } else {
        postprocessors.push(PostProcessor::FFmpegVideoConvertor {
            preferedformat: video_ext.clone(),
        });
    }

    let remuxvideo = options.remux.container().map(str::to_string);
    if remuxvideo.is_some() {
        // le remuxage remplace toute conversion
        postprocessors.clear();
    }

    let sponsorblock_remove = options.sponsorblock.then(|| {
        let categories = options.sponsorblock_categories.trim();
        if categories.is_empty() {
            DEFAULT_SPONSORBLOCK_SCOPE.to_string()
        } else {
            categories.to_string()
        }
    });

    EngineConfig {
        format: format_expression(options, &video_ext, &audio_ext),
        outtmpl: output_dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned(),
        quiet: true,
        no_warnings: true,
        ignoreerrors: false,
        restrictfilenames: true,
        merge_output_format: video_ext,
        postprocessors,
        audioformat: options.audio_format.map(|f| f.as_str().to_string()),
        audioquality: options.audio_format.map(|_| quality),
        remuxvideo,
        writesubtitles: options.subtitles,
        subtitleslangs: if options.subtitles { vec!["all".to_string()] } else { Vec::new() },
        embedsubtitles: options.subtitles,
        writethumbnail: options.thumbnail,
        embedthumbnail: options.thumbnail,
        addmetadata: options.metadata,
        embedchapters: options.chapters,
        splitchapters: options.split_chapters,
        noplaylist: !options.playlist,
        sponsorblock_remove,
    }
}
