//! Orchestration d'un téléchargement unique en arrière-plan.
//!
//! Rôle:
//! - Refuser un nouveau départ tant qu'un téléchargement est en cours (single-flight).
//! - Exécuter l'extraction puis le téléchargement sur un thread dédié, avec son propre
//!   runtime tokio, sans jamais bloquer le thread de l'interface.
//! - Relayer la progression et l'issue finale au shell par un canal.
//!
//! L'annulation est coopérative: le drapeau est vérifié à chaque callback de progression,
//! le moteur s'arrête donc au prochain événement qu'il rapporte, pas instantanément.
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use crate::engine::{Engine, EngineError, ProgressHook, ProgressStatus};
use crate::options::{DownloadRequest, EngineConfig};
use crate::worker::types::{WorkerError, WorkerEvent, WorkerState};
use crate::worker::utils::{format_eta, format_speed};

pub const STATUS_PREPARING: &str = "Préparation du téléchargement...";
pub const STATUS_BUSY: &str = "Un téléchargement est déjà en cours";
pub const STATUS_STOPPING: &str = "Arrêt du téléchargement...";
pub const STATUS_CANCELLED: &str = "Téléchargement annulé";
pub const STATUS_COMPLETE: &str = "Téléchargement terminé";

/// Délai d'attente par défaut du thread de téléchargement à la fermeture
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Worker de téléchargement: au plus une unité d'exécution active à la fois
pub struct DownloadWorker {
    engine: Arc<dyn Engine>,
    state: Arc<AtomicU8>,
    cancel_flag: Arc<AtomicBool>,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
    handle: Option<JoinHandle<()>>,
}

impl DownloadWorker {
    /// Crée un worker inactif et le récepteur de ses notifications.
    pub fn new(engine: Arc<dyn Engine>) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let worker = Self {
            engine,
            state: Arc::new(AtomicU8::new(WorkerState::Idle as u8)),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            events_tx,
            handle: None,
        };
        (worker, events_rx)
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    fn emit(&self, event: WorkerEvent) {
        // le récepteur peut avoir disparu pendant la fermeture
        let _ = self.events_tx.send(event);
    }

    /// Démarre `request` sur un thread dédié et retourne immédiatement.
    ///
    /// Si un téléchargement est déjà en cours, la requête est refusée: une notification
    /// est émise et l'état du téléchargement actif n'est pas modifié.
    ///
    /// Le job précédent publie son état terminal juste avant sa notification finale. Un
    /// appel dans cet intervalle est accepté, et cette notification peut alors arriver
    /// après les premières du nouveau job. Le shell n'appelle `start` qu'une fois l'issue
    /// reçue, ce qui exclut ce cas.
    pub fn start(&mut self, request: DownloadRequest) -> Result<(), WorkerError> {
        let claimed = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if WorkerState::from_u8(current).is_running() {
                    None
                } else {
                    Some(WorkerState::Running as u8)
                }
            });
        if claimed.is_err() {
            warn!(url = %request.url, "requête refusée: un téléchargement est déjà en cours");
            self.emit(WorkerEvent::Status(STATUS_BUSY.to_string()));
            return Err(WorkerError::AlreadyRunning);
        }

        // Le thread précédent a déjà publié son état terminal; on le récupère s'il a fini
        if let Some(previous) = self.handle.take() {
            if previous.is_finished() {
                let _ = previous.join();
            }
        }

        let config = request.engine_config();
        match serde_json::to_string(&config) {
            Ok(json) => debug!(config = %json, "configuration moteur"),
            Err(e) => debug!("configuration moteur non sérialisable: {}", e),
        }
        info!(url = %request.url, output = %request.output_dir.display(), "démarrage du téléchargement");

        // Drapeau propre à cette requête
        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.cancel_flag = cancel_flag.clone();

        let job = DownloadJob {
            engine: self.engine.clone(),
            url: request.url,
            config,
            cancel_flag,
            state: self.state.clone(),
            events_tx: self.events_tx.clone(),
        };

        let spawned = std::thread::Builder::new()
            .name("download-worker".to_string())
            .spawn(move || job.run());

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("impossible de lancer le thread de téléchargement: {}", e);
                self.state.store(WorkerState::Failed as u8, Ordering::Release);
                self.emit(WorkerEvent::Failed { message: e.to_string() });
                Err(WorkerError::Spawn(e))
            }
        }
    }

    /// Demande l'arrêt du téléchargement en cours.
    ///
    /// Retourne immédiatement après avoir émis la notification d'arrêt; l'issue `Cancelled`
    /// arrive plus tard, quand le moteur a rendu la main. Sans effet si rien ne tourne.
    pub fn cancel(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel_flag.store(true, Ordering::Release);
        info!("annulation demandée");
        self.emit(WorkerEvent::Status(STATUS_STOPPING.to_string()));
        true
    }

    /// Annule le téléchargement en cours et attend la fin du thread au plus `timeout`.
    ///
    /// Retourne `false` si le thread n'a pas terminé à temps; il est alors détaché.
    pub fn cleanup(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };
        self.cancel();

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!(?timeout, "le thread de téléchargement n'a pas terminé à temps");
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let _ = handle.join();
        true
    }
}

/// Issue finale d'une exécution
enum Outcome {
    Completed(Option<PathBuf>),
    Failed(String),
    Cancelled,
}

/// Tout ce dont le thread a besoin pour une requête; rien n'est partagé avec la suivante
struct DownloadJob {
    engine: Arc<dyn Engine>,
    url: String,
    config: EngineConfig,
    cancel_flag: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
    events_tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl DownloadJob {
    fn run(self) {
        let outcome = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => {
                let result = rt.block_on(AssertUnwindSafe(self.execute()).catch_unwind());
                match result {
                    Ok(Ok(output)) => Outcome::Completed(output),
                    Ok(Err(e)) if e.is_cancelled() || self.cancel_requested() => Outcome::Cancelled,
                    Ok(Err(e)) => Outcome::Failed(e.to_string()),
                    Err(panic) => Outcome::Failed(panic_message(panic)),
                }
            }
            Err(e) => Outcome::Failed(format!("impossible de créer le runtime: {}", e)),
        };
        self.finish(outcome);
    }

    fn cancel_requested(&self) -> bool {
        self.cancel_flag.load(Ordering::Acquire)
    }

    fn emit(&self, event: WorkerEvent) {
        let _ = self.events_tx.send(event);
    }

    async fn execute(&self) -> Result<Option<PathBuf>, EngineError> {
        self.emit(WorkerEvent::Status(STATUS_PREPARING.to_string()));

        let info = self.engine.extract_info(&self.url, &self.config).await?;
        if self.cancel_requested() {
            return Err(EngineError::Cancelled);
        }

        self.emit(WorkerEvent::Status(format!("Téléchargement: {}", info.display_title())));
        let hook = progress_hook(self.cancel_flag.clone(), self.events_tx.clone());
        let output = self.engine.download(&self.url, &self.config, hook).await?;

        if self.cancel_requested() {
            return Err(EngineError::Cancelled);
        }
        Ok(output.or_else(|| info.output_path()))
    }

    /// Publie l'état terminal avant la notification, pour qu'un nouveau départ soit accepté
    /// dès que le shell la reçoit.
    fn finish(self, outcome: Outcome) {
        match outcome {
            Outcome::Completed(output) => {
                info!(?output, "téléchargement terminé");
                self.state.store(WorkerState::Completed as u8, Ordering::Release);
                self.emit(WorkerEvent::Status(STATUS_COMPLETE.to_string()));
                self.emit(WorkerEvent::Completed { output });
            }
            Outcome::Failed(message) => {
                error!(url = %self.url, "échec du téléchargement: {}", message);
                self.state.store(WorkerState::Failed as u8, Ordering::Release);
                self.emit(WorkerEvent::Status(format!("Erreur: {}", message)));
                self.emit(WorkerEvent::Failed { message });
            }
            Outcome::Cancelled => {
                info!(url = %self.url, "téléchargement annulé");
                self.state.store(WorkerState::Cancelled as u8, Ordering::Release);
                self.emit(WorkerEvent::Status(STATUS_CANCELLED.to_string()));
                self.emit(WorkerEvent::Cancelled);
            }
        }
    }
}

/// Callback de progression: vérifie le drapeau d'annulation puis relaie les valeurs.
fn progress_hook(cancel_flag: Arc<AtomicBool>, events_tx: mpsc::UnboundedSender<WorkerEvent>) -> ProgressHook {
    Box::new(move |event| {
        if cancel_flag.load(Ordering::Acquire) {
            return Err(EngineError::Cancelled);
        }
        if event.status != ProgressStatus::Downloading {
            return Ok(());
        }
        if let Some(percent) = event.percent() {
            let _ = events_tx.send(WorkerEvent::Progress(percent));
        }
        if let Some(speed) = event.speed.filter(|s| *s > 0.0) {
            let _ = events_tx.send(WorkerEvent::Speed(format!("Vitesse: {}", format_speed(speed))));
        }
        if let Some(eta) = event.eta.filter(|e| *e != 0) {
            let _ = events_tx.send(WorkerEvent::Eta(format!("ETA: {}", format_eta(eta))));
        }
        Ok(())
    })
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "cause inconnue".to_string());
    format!("erreur interne du worker: {}", detail)
}
