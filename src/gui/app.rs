//! Fenêtre principale: onglets, panneau de progression et sélecteur de dossier.
//!
//! Toute la logique de téléchargement passe par [`Shell`]; cette couche ne fait que
//! dessiner et relayer les clics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use egui::{CentralPanel, Color32, Context, RichText, TopBottomPanel, Visuals};
use tokio::sync::mpsc;
use tracing::{debug, info};
use crate::config::AppConfig;
use crate::gui::progress::{self, ProgressAction};
use crate::gui::shell::{Shell, SubmitError};
use crate::gui::{advanced, basic, ACCENT, ERROR_COLOR, GROUP_FILL, SUCCESS_COLOR};

/// Fréquence de rafraîchissement pendant un téléchargement
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Basic,
    Advanced,
}

impl Tab {
    fn name(&self) -> &'static str {
        match self {
            Tab::Basic => "Basic",
            Tab::Advanced => "Advanced",
        }
    }
}

/// État principal de l'application
pub struct YtdlpGuiApp {
    current_tab: Tab,
    shell: Shell,
    folder_tx: mpsc::UnboundedSender<PathBuf>,
    folder_rx: mpsc::UnboundedReceiver<PathBuf>,
}

impl YtdlpGuiApp {
    pub fn new(config: AppConfig) -> Self {
        let engine = Arc::new(config.engine());
        info!(binary = %engine.binary().display(), "moteur yt-dlp configuré");
        let shell = Shell::new(engine, config.default_output_dir(), config.shutdown_timeout());
        let (folder_tx, folder_rx) = mpsc::unbounded_channel();
        Self {
            current_tab: Tab::Basic,
            shell,
            folder_tx,
            folder_rx,
        }
    }

    /// Ouvre le sélecteur de dossier dans un thread séparé pour ne pas bloquer l'UI
    fn browse_for_folder(&self) {
        let tx = self.folder_tx.clone();
        let start_dir = if self.shell.form.output_path.trim().is_empty() {
            self.shell.default_output_dir().clone()
        } else {
            PathBuf::from(self.shell.form.output_path.trim())
        };

        std::thread::spawn(move || {
            if let Some(folder) = rfd::FileDialog::new().set_directory(&start_dir).pick_folder() {
                let _ = tx.send(folder);
            }
        });
    }

    fn process_folder_selections(&mut self) {
        while let Ok(folder) = self.folder_rx.try_recv() {
            self.shell.form.output_path = folder.to_string_lossy().to_string();
        }
    }

    fn start_download(&mut self) {
        match self.shell.submit() {
            Ok(()) => info!(url = %self.shell.form.url.trim(), "téléchargement soumis"),
            // déjà affiché dans le statut
            Err(SubmitError::Form(e)) => debug!("saisie invalide: {}", e),
            Err(SubmitError::Worker(e)) => debug!("soumission refusée: {}", e),
        }
    }

    /// Thème sombre de la fenêtre, appliqué une fois à la création.
    ///
    /// Les couleurs d'accent et d'erreur sont celles du panneau de progression, pour que
    /// la sélection, les curseurs et les messages d'erreur d'egui restent cohérents avec lui.
    pub fn install_style(ctx: &Context) {
        let mut style = (*ctx.style()).clone();

        let mut visuals = Visuals::dark();
        visuals.override_text_color = Some(Color32::from_gray(235));
        visuals.panel_fill = Color32::from_rgb(25, 25, 30);
        visuals.faint_bg_color = GROUP_FILL;
        visuals.extreme_bg_color = Color32::from_rgb(15, 15, 20);
        visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
        visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);
        visuals.error_fg_color = ERROR_COLOR;
        // le curseur de qualité audio se lit mieux rempli
        visuals.slider_trailing_fill = true;
        style.visuals = visuals;

        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.combo_width = 220.0;

        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(17.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(14.0, egui::FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}

impl eframe::App for YtdlpGuiApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_folder_selections();
        self.shell.pump_events();

        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🎬 Video Downloader");
                ui.separator();
                ui.selectable_value(&mut self.current_tab, Tab::Basic, Tab::Basic.name());
                ui.selectable_value(&mut self.current_tab, Tab::Advanced, Tab::Advanced.name());
            });
        });

        let mut action = ProgressAction::None;
        TopBottomPanel::bottom("progress_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            action = progress::show(ui, &self.shell.progress, self.shell.download_enabled());
            if let Some(output) = &self.shell.last_output {
                ui.label(
                    RichText::new(format!("📄 {}", output.display()))
                        .small()
                        .color(SUCCESS_COLOR),
                );
            }
            ui.add_space(6.0);
        });

        let mut browse = false;
        CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.current_tab {
                Tab::Basic => {
                    let enabled = self.shell.download_enabled();
                    browse = basic::show(ui, &mut self.shell.form, enabled).0;
                }
                Tab::Advanced => advanced::show(ui, &mut self.shell.form),
            });
        });

        if browse {
            self.browse_for_folder();
        }
        match action {
            ProgressAction::Start => self.start_download(),
            ProgressAction::Stop => self.shell.stop(),
            ProgressAction::None => {}
        }

        // les notifications du worker arrivent hors de la boucle egui
        if !self.shell.download_enabled() {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shell.shutdown();
    }
}
