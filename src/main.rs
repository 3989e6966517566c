//! Point d'entrée: journalisation, configuration, puis fenêtre egui.
use anyhow::anyhow;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use ytdlp_gui::config::AppConfig;
use ytdlp_gui::gui::YtdlpGuiApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("configuration ignorée: {}", e);
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Video Downloader")
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            YtdlpGuiApp::install_style(&cc.egui_ctx);
            Ok(Box::new(YtdlpGuiApp::new(config)))
        }),
    )
    .map_err(|e| anyhow!("erreur de la fenêtre: {}", e))
}
