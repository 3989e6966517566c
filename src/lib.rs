//! Interface graphique pour configurer et lancer des téléchargements yt-dlp.
//!
//! - `options`: choix de l'utilisateur → configuration du moteur
//! - `engine`: exécution de yt-dlp et lecture de sa progression
//! - `worker`: téléchargement en arrière-plan, annulation, notifications
//! - `gui`: fenêtre egui
//! - `config`: fichier de configuration TOML

pub mod config;
pub mod engine;
pub mod gui;
pub mod options;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;
