//! Câblage entre le formulaire, le worker et le panneau de progression.
//!
//! Aucune dépendance à egui: l'interface ne fait que lire et écrire ces champs, ce qui
//! permet de tester le cycle soumission → progression → issue finale sans fenêtre.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use crate::engine::Engine;
use crate::gui::form::{FormError, FormState};
use crate::gui::progress::ProgressView;
use crate::worker::{DownloadWorker, WorkerError, WorkerEvent};

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

pub struct Shell {
    pub form: FormState,
    pub progress: ProgressView,
    /// Chemin du dernier fichier produit, affiché après un succès
    pub last_output: Option<PathBuf>,
    download_enabled: bool,
    default_output_dir: PathBuf,
    shutdown_timeout: Duration,
    worker: DownloadWorker,
    events_rx: mpsc::UnboundedReceiver<WorkerEvent>,
    shut_down: bool,
}

impl Shell {
    pub fn new(engine: Arc<dyn Engine>, default_output_dir: PathBuf, shutdown_timeout: Duration) -> Self {
        let (worker, events_rx) = DownloadWorker::new(engine);
        Self {
            form: FormState::default(),
            progress: ProgressView::default(),
            last_output: None,
            download_enabled: true,
            default_output_dir,
            shutdown_timeout,
            worker,
            events_rx,
            shut_down: false,
        }
    }

    /// Vrai quand « Démarrer » et les champs URL/format sont actifs; « Arrêter » est l'inverse.
    #[inline]
    pub fn download_enabled(&self) -> bool {
        self.download_enabled
    }

    pub fn default_output_dir(&self) -> &PathBuf {
        &self.default_output_dir
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    fn set_download_state(&mut self, enabled: bool) {
        self.download_enabled = enabled;
    }

    /// Soumission du formulaire: valide l'URL, puis confie la requête au worker.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        let request = match self.form.to_request(&self.default_output_dir) {
            Ok(request) => request,
            Err(e) => {
                // erreur de saisie: affichée sur place, rien d'autre ne change
                self.progress.status = e.to_string();
                return Err(e.into());
            }
        };

        self.worker.start(request)?;
        self.last_output = None;
        self.set_download_state(false);
        self.progress.reset();
        Ok(())
    }

    /// Bouton « Arrêter »: demande d'annulation, l'issue arrive par `pump_events`.
    pub fn stop(&mut self) {
        if !self.worker.cancel() {
            debug!("arrêt demandé sans téléchargement actif");
        }
    }

    /// Applique toutes les notifications en attente, sans bloquer. Retourne leur nombre.
    pub fn pump_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            count += 1;
            self.progress.apply(&event);
            match event {
                WorkerEvent::Completed { output } => {
                    self.last_output = output;
                    self.set_download_state(true);
                }
                WorkerEvent::Failed { .. } | WorkerEvent::Cancelled => self.set_download_state(true),
                _ => {}
            }
        }
        count
    }

    /// Fermeture: annule et attend le worker au plus le délai configuré.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if self.worker.cleanup(self.shutdown_timeout) {
            info!("worker arrêté proprement");
        } else {
            warn!("fermeture sans attendre la fin du téléchargement");
        }
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::progress::STATUS_STOPPED;
    use crate::testing::{wait_until, FakeEngine};
    use crate::worker::STATUS_BUSY;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn shell(engine: FakeEngine) -> Shell {
        Shell::new(Arc::new(engine), PathBuf::from("/dl"), Duration::from_secs(2))
    }

    /// Pompe les notifications jusqu'à ce que les contrôles soient réactivés.
    fn pump_until_enabled(shell: &mut Shell) -> bool {
        wait_until(TIMEOUT, || {
            shell.pump_events();
            shell.download_enabled()
        })
    }

    #[test]
    fn test_empty_url_is_reported_inline_without_state_change() {
        let mut shell = shell(FakeEngine::quick());
        let result = shell.submit();
        assert!(matches!(result, Err(SubmitError::Form(FormError::EmptyUrl))));
        assert_eq!(shell.progress.status, "Veuillez saisir une URL");
        assert!(shell.download_enabled());
        assert!(!shell.is_running());
    }

    #[test]
    fn test_completed_download_reenables_controls() {
        let mut shell = shell(FakeEngine::quick());
        shell.form.url = "https://example.com/v".into();
        shell.submit().unwrap();
        assert!(!shell.download_enabled());

        assert!(pump_until_enabled(&mut shell));
        assert_eq!(shell.progress.percent, 100);
        assert_eq!(shell.progress.status, "Téléchargement terminé");
        assert_eq!(shell.last_output, Some(PathBuf::from("/dl/Demo.mp4")));
    }

    #[test]
    fn test_stop_reenables_controls_after_cancellation() {
        let engine = Arc::new(FakeEngine::slow());
        let mut shell = Shell::new(engine.clone(), PathBuf::from("/dl"), Duration::from_secs(2));
        shell.form.url = "https://example.com/v".into();
        shell.submit().unwrap();
        assert!(wait_until(TIMEOUT, || {
            engine.download_calls.load(std::sync::atomic::Ordering::SeqCst) == 1
        }));

        shell.stop();
        assert!(pump_until_enabled(&mut shell));
        assert_eq!(shell.progress.status, STATUS_STOPPED);
        assert_eq!(shell.last_output, None);
    }

    #[test]
    fn test_engine_failure_shows_message_and_reenables() {
        let mut shell = shell(FakeEngine::failing_extract("ERROR: Unable to extract uploader id"));
        shell.form.url = "https://example.com/v".into();
        shell.submit().unwrap();

        assert!(pump_until_enabled(&mut shell));
        assert_eq!(shell.progress.status, "Erreur: ERROR: Unable to extract uploader id");
    }

    #[test]
    fn test_second_submit_while_running_is_refused() {
        let engine = Arc::new(FakeEngine::slow());
        let mut shell = Shell::new(engine.clone(), PathBuf::from("/dl"), Duration::from_secs(2));
        shell.form.url = "https://example.com/first".into();
        shell.submit().unwrap();
        // une fois le transfert lancé, le worker n'émet plus que de la progression
        assert!(wait_until(TIMEOUT, || {
            engine.download_calls.load(std::sync::atomic::Ordering::SeqCst) == 1
        }));
        shell.pump_events();

        shell.form.url = "https://example.com/second".into();
        let result = shell.submit();
        assert!(matches!(result, Err(SubmitError::Worker(WorkerError::AlreadyRunning))));
        assert!(!shell.download_enabled());

        assert!(wait_until(TIMEOUT, || {
            shell.pump_events();
            shell.progress.status == STATUS_BUSY
        }));
        shell.stop();
        assert!(pump_until_enabled(&mut shell));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut shell = shell(FakeEngine::slow());
        shell.form.url = "https://example.com/v".into();
        shell.submit().unwrap();
        shell.shutdown();
        assert!(!shell.is_running());
        shell.shutdown();
    }
}
