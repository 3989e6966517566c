//! Onglet « Advanced »: post-traitements et SponsorBlock.
use egui::{RichText, Ui};
use crate::gui::form::FormState;
use crate::gui::{GROUP_FILL, GROUP_STROKE};

pub fn show(ui: &mut Ui, form: &mut FormState) {
    egui::Frame::group(ui.style())
        .fill(GROUP_FILL)
        .stroke(egui::Stroke::new(1.0, GROUP_STROKE))
        .rounding(egui::Rounding::same(8.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.heading("🔧 Post-traitement");
            ui.add_space(8.0);

            ui.checkbox(&mut form.subtitles, "Télécharger les sous-titres");
            ui.checkbox(&mut form.thumbnail, "Télécharger la miniature");
            ui.checkbox(&mut form.metadata, "Intégrer les métadonnées");
            ui.checkbox(&mut form.chapters, "Intégrer les chapitres");
            ui.checkbox(&mut form.split_chapters, "Découper par chapitres");
            ui.checkbox(&mut form.sponsorblock, "Supprimer les segments sponsorisés");

            ui.add_space(8.0);
            ui.label(RichText::new("Catégories SponsorBlock:").strong());
            ui.add(
                egui::TextEdit::singleline(&mut form.sponsorblock_categories)
                    .hint_text("sponsor,intro,outro (vide pour toutes)")
                    .desired_width(f32::INFINITY),
            );
        });
}
