//! Conversion de `EngineConfig` en arguments de ligne de commande pour yt-dlp.
//!
//! Chaque clé du dictionnaire a son équivalent CLI; les clés sans effet en ligne de
//! commande (`audioformat`, `audioquality` hors extraction audio) sont ignorées.
use crate::options::types::{EngineConfig, PostProcessor};

/// Construit la liste d'arguments correspondant à la configuration.
/// L'URL et les options propres à une phase (`-J`, gabarit de progression) sont ajoutées par l'appelant.
pub fn engine_args(config: &EngineConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(32);

    let mut push = |flag: &str| args.push(flag.to_string());
    push("-f");
    push(&config.format);
    push("-o");
    push(&config.outtmpl);
    if config.quiet {
        push("--quiet");
    }
    if config.no_warnings {
        push("--no-warnings");
    }
    push(if config.ignoreerrors { "--ignore-errors" } else { "--abort-on-error" });
    if config.restrictfilenames {
        push("--restrict-filenames");
    }
    push("--merge-output-format");
    push(&config.merge_output_format);

    for pp in &config.postprocessors {
        match pp {
            PostProcessor::FFmpegExtractAudio { preferredcodec, preferredquality } => {
                push("-x");
                push("--audio-format");
                push(preferredcodec);
                push("--audio-quality");
                push(preferredquality);
            }
            PostProcessor::FFmpegVideoConvertor { preferedformat } => {
                push("--recode-video");
                push(preferedformat);
            }
        }
    }

    if let Some(ref target) = config.remuxvideo {
        push("--remux-video");
        push(target);
    }

    if config.writesubtitles {
        push("--write-subs");
        if !config.subtitleslangs.is_empty() {
            push("--sub-langs");
            push(&config.subtitleslangs.join(","));
        }
    }
    if config.embedsubtitles {
        push("--embed-subs");
    }
    if config.writethumbnail {
        push("--write-thumbnail");
    }
    if config.embedthumbnail {
        push("--embed-thumbnail");
    }
    if config.addmetadata {
        push("--embed-metadata");
    }
    if config.embedchapters {
        push("--embed-chapters");
    }
    if config.splitchapters {
        push("--split-chapters");
    }

    push(if config.noplaylist { "--no-playlist" } else { "--yes-playlist" });

    if let Some(ref categories) = config.sponsorblock_remove {
        push("--sponsorblock-remove");
        push(categories);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::mapper::build_engine_config;
    use crate::options::types::{AudioFormat, DownloadOptions, FormatChoice, RemuxTarget};
    use std::path::Path;

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_default_request_args() {
        let config = build_engine_config(Path::new("/dl"), &DownloadOptions::default());
        let args = engine_args(&config);

        assert_eq!(value_after(&args, "-f"), Some(config.format.as_str()));
        assert_eq!(value_after(&args, "-o"), Some(config.outtmpl.as_str()));
        assert_eq!(value_after(&args, "--recode-video"), Some("mp4"));
        assert_eq!(value_after(&args, "--merge-output-format"), Some("mp4"));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--restrict-filenames".to_string()));
        assert!(args.contains(&"--abort-on-error".to_string()));
        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.contains(&"--sponsorblock-remove".to_string()));
    }

    #[test]
    fn test_audio_extraction_args() {
        let opts = DownloadOptions {
            format: FormatChoice::BestAudioOnly,
            audio_format: Some(AudioFormat::Flac),
            audio_quality: 0,
            ..DownloadOptions::default()
        };
        let args = engine_args(&build_engine_config(Path::new("/dl"), &opts));
        assert!(args.contains(&"-x".to_string()));
        assert_eq!(value_after(&args, "--audio-format"), Some("flac"));
        assert_eq!(value_after(&args, "--audio-quality"), Some("0"));
        assert!(!args.contains(&"--recode-video".to_string()));
    }

    #[test]
    fn test_remux_and_feature_args() {
        let opts = DownloadOptions {
            remux: RemuxTarget::Mkv,
            subtitles: true,
            thumbnail: true,
            metadata: true,
            chapters: true,
            split_chapters: true,
            playlist: true,
            sponsorblock: true,
            sponsorblock_categories: "sponsor,intro".into(),
            ..DownloadOptions::default()
        };
        let args = engine_args(&build_engine_config(Path::new("/dl"), &opts));
        assert_eq!(value_after(&args, "--remux-video"), Some("mkv"));
        assert!(!args.contains(&"--recode-video".to_string()));
        assert_eq!(value_after(&args, "--sub-langs"), Some("all"));
        for flag in [
            "--write-subs",
            "--embed-subs",
            "--write-thumbnail",
            "--embed-thumbnail",
            "--embed-metadata",
            "--embed-chapters",
            "--split-chapters",
            "--yes-playlist",
        ] {
            assert!(args.contains(&flag.to_string()), "missing {flag}");
        }
        assert_eq!(value_after(&args, "--sponsorblock-remove"), Some("sponsor,intro"));
    }
}
