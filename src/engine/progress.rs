//! Lecture des lignes de progression produites via `--progress-template`.
//!
//! Le gabarit émet une ligne par mise à jour, préfixée par `PROGRESS_MARKER`, avec des
//! champs séparés par `|`. yt-dlp écrit `NA` pour un champ inconnu.
use crate::engine::params::{ProgressEvent, ProgressStatus};

pub const PROGRESS_MARKER: &str = "[ytdlp-gui]";

/// Gabarit passé à `--progress-template`
pub const PROGRESS_TEMPLATE: &str = "download:[ytdlp-gui]%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress.speed)s|%(progress.eta)s";

/// Parse une ligne de progression; `None` si la ligne n'en est pas une.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let fields: Vec<&str> = rest.split('|').collect();
    if fields.len() != 6 {
        return None;
    }

    Some(ProgressEvent {
        status: ProgressStatus::parse(fields[0]),
        downloaded_bytes: parse_number(fields[1]).map(|v| v as u64),
        total_bytes: parse_number(fields[2]).map(|v| v as u64),
        total_bytes_estimate: parse_number(fields[3]).map(|v| v as u64),
        speed: parse_number(fields[4]),
        eta: parse_number(fields[5]).map(|v| v as i64),
    })
}

fn parse_number(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() || field == "NA" || field == "None" {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
