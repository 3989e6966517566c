//! Module d'interface graphique utilisateur avec egui.
//!
//! Architecture:
//! - `app.rs`: fenêtre principale, onglets et boucle egui
//! - `basic.rs` / `advanced.rs`: widgets des deux onglets
//! - `progress.rs`: panneau de progression et boutons d'action
//! - `form.rs`: état des champs et construction de la requête
//! - `shell.rs`: câblage formulaire → worker → progression, testable sans fenêtre

mod app;
mod advanced;
mod basic;
pub mod form;
pub mod progress;
pub mod shell;

pub use app::YtdlpGuiApp;

use egui::Color32;

/// Couleur des éléments actifs: barre de progression, sélection, survol
pub(crate) const ACCENT: Color32 = Color32::from_rgb(100, 200, 255);
/// Statut d'erreur et bouton « Arrêter »
pub(crate) const ERROR_COLOR: Color32 = Color32::from_rgb(255, 100, 100);
/// Chemin du fichier produit
pub(crate) const SUCCESS_COLOR: Color32 = Color32::from_rgb(100, 255, 100);
/// Fond et bordure des groupes de champs
pub(crate) const GROUP_FILL: Color32 = Color32::from_rgb(30, 30, 35);
pub(crate) const GROUP_STROKE: Color32 = Color32::from_rgb(60, 60, 70);
