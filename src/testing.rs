//! Moteurs factices et utilitaires partagés par les tests du worker et du shell.
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use futures::future::BoxFuture;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use crate::engine::{Engine, EngineError, MediaInfo, ProgressEvent, ProgressHook};
use crate::options::EngineConfig;
use crate::worker::WorkerEvent;

/// Moteur en mémoire: émet `steps` événements de progression espacés de `step_delay`.
pub(crate) struct FakeEngine {
    pub title: String,
    pub steps: u64,
    pub step_delay: Duration,
    pub extract_delay: Duration,
    pub extract_error: Option<String>,
    pub download_error: Option<String>,
    pub panic_on_download: bool,
    pub download_calls: AtomicUsize,
}

impl FakeEngine {
    pub fn quick() -> Self {
        Self {
            title: "Demo".to_string(),
            steps: 4,
            step_delay: Duration::ZERO,
            extract_delay: Duration::ZERO,
            extract_error: None,
            download_error: None,
            panic_on_download: false,
            download_calls: AtomicUsize::new(0),
        }
    }

    /// Téléchargement long, pour tester l'annulation et le refus d'un second départ
    pub fn slow() -> Self {
        Self {
            steps: 500,
            step_delay: Duration::from_millis(20),
            ..Self::quick()
        }
    }

    /// Extraction lente: l'annulation arrive avant le début du transfert
    pub fn slow_extract(delay: Duration) -> Self {
        Self {
            extract_delay: delay,
            ..Self::quick()
        }
    }

    pub fn failing_extract(message: &str) -> Self {
        Self {
            extract_error: Some(message.to_string()),
            ..Self::quick()
        }
    }

    pub fn failing_download(message: &str) -> Self {
        Self {
            download_error: Some(message.to_string()),
            ..Self::quick()
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_download: true,
            ..Self::quick()
        }
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("/dl/{}.mp4", self.title))
    }
}

impl Engine for FakeEngine {
    fn extract_info<'a>(
        &'a self,
        _url: &'a str,
        _config: &'a EngineConfig,
    ) -> BoxFuture<'a, Result<MediaInfo, EngineError>> {
        Box::pin(async move {
            if !self.extract_delay.is_zero() {
                tokio::time::sleep(self.extract_delay).await;
            }
            if let Some(ref message) = self.extract_error {
                return Err(EngineError::Failed(message.clone()));
            }
            Ok(MediaInfo {
                title: Some(self.title.clone()),
                ext: Some("mp4".to_string()),
                filename: None,
                prepared_filename: Some(self.output_path().to_string_lossy().into_owned()),
            })
        })
    }

    fn download<'a>(
        &'a self,
        _url: &'a str,
        _config: &'a EngineConfig,
        mut hook: ProgressHook,
    ) -> BoxFuture<'a, Result<Option<PathBuf>, EngineError>> {
        Box::pin(async move {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_download {
                panic!("engine exploded");
            }
            let total = self.steps * 1024;
            for step in 1..=self.steps {
                let mut event = ProgressEvent::downloading(step * 1024, Some(total));
                event.speed = Some(2048.0);
                event.eta = Some((self.steps - step) as i64);
                hook(&event)?;
                if !self.step_delay.is_zero() {
                    tokio::time::sleep(self.step_delay).await;
                }
            }
            if let Some(ref message) = self.download_error {
                return Err(EngineError::Failed(message.clone()));
            }
            Ok(Some(self.output_path()))
        })
    }
}

/// Lit les événements jusqu'au premier événement terminal (inclus) ou jusqu'au délai.
pub(crate) fn collect_until_terminal(
    rx: &mut UnboundedReceiver<WorkerEvent>,
    timeout: Duration,
) -> Vec<WorkerEvent> {
    let deadline = Instant::now() + timeout;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match rx.try_recv() {
            Ok(event) => {
                let done = event.is_terminal();
                events.push(event);
                if done {
                    break;
                }
            }
            Err(TryRecvError::Empty) => std::thread::sleep(Duration::from_millis(5)),
            Err(TryRecvError::Disconnected) => break,
        }
    }
    events
}

/// Attend qu'un prédicat devienne vrai, en sondant toutes les 5 ms.
pub(crate) fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    predicate()
}
