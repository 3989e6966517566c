//! Mise en forme des valeurs de progression pour l'affichage.

/// Vitesse lisible: B/s, KB/s ou MB/s avec une décimale.
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec < 1024.0 {
        format!("{:.1} B/s", bytes_per_sec)
    } else if bytes_per_sec < 1024.0 * 1024.0 {
        format!("{:.1} KB/s", bytes_per_sec / 1024.0)
    } else {
        format!("{:.1} MB/s", bytes_per_sec / (1024.0 * 1024.0))
    }
}

/// Temps restant: `h:mm:ss` au-delà d'une heure, `mm:ss` sinon, `--:--` si négatif.
pub fn format_eta(seconds: i64) -> String {
    if seconds < 0 {
        return "--:--".to_string();
    }
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
