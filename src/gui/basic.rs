//! Onglet « Basic »: URL, choix du format et dossier de sortie.
use egui::{Color32, RichText, Ui};
use crate::gui::form::FormState;
use crate::gui::{GROUP_FILL, GROUP_STROKE};
use crate::options::{audio_quality_label, AudioFormat, FormatChoice, RemuxTarget, MAX_AUDIO_QUALITY};

/// Le bouton « Parcourir... » a été cliqué
pub struct BrowseRequested(pub bool);

fn group<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .fill(GROUP_FILL)
        .stroke(egui::Stroke::new(1.0, GROUP_STROKE))
        .rounding(egui::Rounding::same(8.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.heading(title);
            ui.add_space(8.0);
            add_contents(ui)
        })
        .inner
}

pub fn show(ui: &mut Ui, form: &mut FormState, inputs_enabled: bool) -> BrowseRequested {
    group(ui, "🔗 URL de la vidéo", |ui| {
        ui.add_enabled(
            inputs_enabled,
            egui::TextEdit::singleline(&mut form.url)
                .hint_text("https://www.youtube.com/watch?v=...")
                .desired_width(f32::INFINITY),
        );
    });

    ui.add_space(8.0);

    group(ui, "⚙️ Options de téléchargement", |ui| {
        egui::Grid::new("download_options_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Format:").strong());
                ui.add_enabled_ui(inputs_enabled, |ui| {
                    egui::ComboBox::from_id_source("format_combo")
                        .selected_text(form.format.label())
                        .width(220.0)
                        .show_ui(ui, |ui| {
                            for choice in FormatChoice::ALL {
                                ui.selectable_value(&mut form.format, choice, choice.label());
                            }
                        });
                });
                ui.end_row();

                if form.shows_custom_format() {
                    ui.label(RichText::new("Format personnalisé:").strong());
                    ui.add(
                        egui::TextEdit::singleline(&mut form.custom_format)
                            .hint_text("ex: bestvideo[height<=1080]+bestaudio/best")
                            .desired_width(f32::INFINITY),
                    );
                    ui.end_row();
                }

                ui.label(RichText::new("Format audio:").strong());
                egui::ComboBox::from_id_source("audio_format_combo")
                    .selected_text(form.audio_format.as_str())
                    .show_ui(ui, |ui| {
                        for audio in AudioFormat::ALL {
                            ui.selectable_value(&mut form.audio_format, audio, audio.as_str());
                        }
                    });
                ui.end_row();

                ui.label(RichText::new("Qualité audio:").strong());
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut form.audio_quality, 0..=MAX_AUDIO_QUALITY).show_value(false));
                    ui.label(RichText::new(audio_quality_label(form.audio_quality)).color(Color32::GRAY));
                });
                ui.end_row();

                ui.label(RichText::new("Format vidéo:").strong());
                egui::ComboBox::from_id_source("remux_combo")
                    .selected_text(form.remux.label())
                    .show_ui(ui, |ui| {
                        for target in RemuxTarget::ALL {
                            ui.selectable_value(&mut form.remux, target, target.label());
                        }
                    });
                ui.end_row();
            });

        ui.add_space(4.0);
        ui.checkbox(&mut form.playlist, "Télécharger toute la playlist");
    });

    ui.add_space(8.0);

    group(ui, "📁 Sortie", |ui| {
        ui.horizontal(|ui| {
            let browse = ui.button("📁 Parcourir...").clicked();
            ui.add(
                egui::TextEdit::singleline(&mut form.output_path)
                    .hint_text("Choisir le dossier de sortie...")
                    .desired_width(f32::INFINITY),
            );
            BrowseRequested(browse)
        })
        .inner
    })
}
