//! Panneau de progression et boutons d'action, sous les onglets.
use egui::{Color32, ProgressBar, RichText, Ui};
use crate::gui::{ACCENT, ERROR_COLOR};
use crate::worker::WorkerEvent;

pub const STATUS_READY: &str = "Prêt";
pub const SPEED_PLACEHOLDER: &str = "Vitesse: -";
pub const ETA_PLACEHOLDER: &str = "ETA: -";
pub const STATUS_STOPPED: &str = "Téléchargement arrêté";

/// Valeurs affichées dans le panneau de progression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub status: String,
    pub speed: String,
    pub eta: String,
}

impl Default for ProgressView {
    fn default() -> Self {
        Self {
            percent: 0,
            status: STATUS_READY.to_string(),
            speed: SPEED_PLACEHOLDER.to_string(),
            eta: ETA_PLACEHOLDER.to_string(),
        }
    }
}

impl ProgressView {
    /// Remet la barre, la vitesse et l'ETA à zéro; le statut est conservé.
    pub fn reset(&mut self) {
        self.percent = 0;
        self.speed = SPEED_PLACEHOLDER.to_string();
        self.eta = ETA_PLACEHOLDER.to_string();
    }

    pub fn apply(&mut self, event: &WorkerEvent) {
        match event {
            WorkerEvent::Status(text) => self.status = text.clone(),
            WorkerEvent::Progress(percent) => self.percent = (*percent).min(100),
            WorkerEvent::Speed(text) => self.speed = text.clone(),
            WorkerEvent::Eta(text) => self.eta = text.clone(),
            WorkerEvent::Completed { .. } => self.percent = 100,
            WorkerEvent::Failed { message } => self.status = format!("Erreur: {}", message),
            WorkerEvent::Cancelled => self.status = STATUS_STOPPED.to_string(),
        }
    }
}

/// Bouton actionné dans le panneau
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressAction {
    None,
    Start,
    Stop,
}

pub fn show(ui: &mut Ui, view: &ProgressView, download_enabled: bool) -> ProgressAction {
    let mut action = ProgressAction::None;

    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(25, 25, 30))
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(50, 50, 60)))
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.heading("📊 Progression");
            ui.add_space(4.0);

            ui.add(
                ProgressBar::new(view.percent as f32 / 100.0)
                    .fill(ACCENT)
                    .show_percentage(),
            );
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let status_color = if view.status.starts_with("Erreur") {
                    ERROR_COLOR
                } else {
                    Color32::from_gray(220)
                };
                ui.label(RichText::new(&view.status).color(status_color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&view.eta).small().color(Color32::GRAY));
                    ui.separator();
                    ui.label(RichText::new(&view.speed).small().color(Color32::GRAY));
                });
            });
        });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(download_enabled, egui::Button::new(RichText::new("▶️ Démarrer le téléchargement").size(14.0)))
            .clicked()
        {
            action = ProgressAction::Start;
        }
        if ui
            .add_enabled(
                !download_enabled,
                egui::Button::new(RichText::new("⏹️ Arrêter").size(14.0).color(ERROR_COLOR)),
            )
            .clicked()
        {
            action = ProgressAction::Stop;
        }
        if !download_enabled {
            ui.spinner();
        }
    });

    action
}
