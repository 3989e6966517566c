use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use futures::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use crate::engine::params::{EngineError, MediaInfo};
use crate::engine::progress::{parse_progress_line, PROGRESS_TEMPLATE};
use crate::engine::{Engine, ProgressHook};
use crate::options::{engine_args, EngineConfig};

/// Moteur yt-dlp piloté en processus enfant
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    binary: PathBuf,
    extra_args: Vec<String>,
}

/// Origine d'une ligne lue sur le processus enfant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlpEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placés avant ceux de la configuration (ex: un script lancé par un interpréteur)
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    fn command(&self, config: &EngineConfig, phase_args: &[&str], url: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.extra_args)
            .args(engine_args(config))
            .args(phase_args)
            .arg("--")
            .arg(url);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Spawn {
            binary: self.binary.display().to_string(),
            source,
        }
    }

    async fn run_extract(&self, url: &str, config: &EngineConfig) -> Result<MediaInfo, EngineError> {
        let mut cmd = self.command(config, &["--dump-single-json"], url);
        debug!(binary = %self.binary.display(), url, "extraction des métadonnées");

        let output = cmd.output().await.map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<String> = stderr.lines().map(str::to_string).collect();
            return Err(exit_error(output.status, &lines));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let document = stdout.trim();
        if document.is_empty() || document == "null" {
            return Err(EngineError::NoInfo);
        }
        Ok(serde_json::from_str(document)?)
    }

    async fn run_download(
        &self,
        url: &str,
        config: &EngineConfig,
        mut hook: ProgressHook,
    ) -> Result<Option<PathBuf>, EngineError> {
        let mut cmd = self.command(
            config,
            &[
                "--newline",
                "--progress",
                "--progress-template",
                PROGRESS_TEMPLATE,
                "--no-simulate",
                "--print",
                "after_move:filepath",
            ],
            url,
        );

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        info!(binary = %self.binary.display(), url, pid = ?child.id(), "processus yt-dlp lancé");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Failed("impossible de prendre stdout de yt-dlp".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Failed("impossible de prendre stderr de yt-dlp".into()))?;

        // Les deux flux sont fusionnés; l'ordre est conservé pour chacun d'eux
        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<(Stream, String)>();
        let out_task = tokio::spawn(forward_lines(stdout, Stream::Stdout, line_tx.clone()));
        let err_task = tokio::spawn(forward_lines(stderr, Stream::Stderr, line_tx));

        let mut final_path: Option<PathBuf> = None;
        let mut stderr_lines: Vec<String> = Vec::new();

        while let Some((stream, line)) = line_rx.recv().await {
            if let Some(event) = parse_progress_line(&line) {
                if let Err(e) = hook(&event) {
                    info!(pid = ?child.id(), "interruption demandée par le callback, arrêt du processus");
                    let _ = child.kill().await;
                    out_task.abort();
                    err_task.abort();
                    return Err(e);
                }
                continue;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match stream {
                // `--print after_move:filepath` écrit le chemin final sur stdout
                Stream::Stdout => final_path = Some(PathBuf::from(line)),
                Stream::Stderr => {
                    debug!("[yt-dlp stderr] {}", line);
                    stderr_lines.push(line.to_string());
                }
            }
        }

        let status = child.wait().await?;
        if status.success() {
            info!(path = ?final_path, "yt-dlp terminé avec succès");
            Ok(final_path)
        } else {
            warn!(code = ?status.code(), "yt-dlp terminé en erreur");
            Err(exit_error(status, &stderr_lines))
        }
    }
}

impl Engine for YtDlpEngine {
    fn extract_info<'a>(
        &'a self,
        url: &'a str,
        config: &'a EngineConfig,
    ) -> BoxFuture<'a, Result<MediaInfo, EngineError>> {
        Box::pin(self.run_extract(url, config))
    }

    fn download<'a>(
        &'a self,
        url: &'a str,
        config: &'a EngineConfig,
        hook: ProgressHook,
    ) -> BoxFuture<'a, Result<Option<PathBuf>, EngineError>> {
        Box::pin(self.run_download(url, config, hook))
    }
}

/// Relaie chaque ligne de `reader`; une ligne qui n'est pas de l'UTF-8 valide est décodée
/// avec remplacement, la lecture continue.
async fn forward_lines<R>(reader: R, stream: Stream, tx: mpsc::UnboundedSender<(Stream, String)>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(256);
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(?stream, "lecture interrompue: {}", e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']).to_string();
        if tx.send((stream, line)).is_err() {
            break;
        }
    }
}

/// Description d'un échec à partir de la sortie d'erreur du moteur.
///
/// Priorité: dernière ligne `ERROR:`, puis dernière ligne non vide, puis le code de sortie.
pub fn describe_failure(code: Option<i32>, stderr_lines: &[String]) -> String {
    let last_error = stderr_lines
        .iter()
        .rev()
        .map(|l| l.trim())
        .find(|l| l.starts_with("ERROR:"));
    let last_line = stderr_lines.iter().rev().map(|l| l.trim()).find(|l| !l.is_empty());

    match last_error.or(last_line) {
        Some(line) => line.to_string(),
        None => match code {
            Some(code) => format!("yt-dlp s'est terminé avec le code {}", code),
            None => "yt-dlp a été interrompu par un signal".to_string(),
        },
    }
}

fn exit_error(status: ExitStatus, stderr_lines: &[String]) -> EngineError {
    EngineError::Failed(describe_failure(status.code(), stderr_lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::params::ProgressEvent;
    use crate::options::{build_engine_config, DownloadOptions};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Moteur de test: un script shell lancé par `sh`, qui ignore les arguments reçus.
    fn script_engine(dir: &TempDir, body: &str) -> YtDlpEngine {
        let script = dir.path().join("fake-ytdlp.sh");
        std::fs::write(&script, body).unwrap();
        YtDlpEngine::new("sh").with_extra_args(vec![script.to_string_lossy().into_owned()])
    }

    fn config(dir: &TempDir) -> EngineConfig {
        build_engine_config(dir.path(), &DownloadOptions::default())
    }

    #[test]
    fn test_describe_failure_prefers_error_line() {
        let lines = vec![
            "ERROR: [generic] first".to_string(),
            "WARNING: something".to_string(),
            "ERROR: [generic] Unsupported URL: https://example.com".to_string(),
            "trailing noise".to_string(),
        ];
        assert_eq!(
            describe_failure(Some(1), &lines),
            "ERROR: [generic] Unsupported URL: https://example.com"
        );
    }

    #[test]
    fn test_describe_failure_fallbacks() {
        assert_eq!(describe_failure(Some(2), &["boom".to_string(), "  ".to_string()]), "boom");
        assert_eq!(describe_failure(Some(2), &[]), "yt-dlp s'est terminé avec le code 2");
        assert_eq!(describe_failure(None, &[]), "yt-dlp a été interrompu par un signal");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let dir = TempDir::new().unwrap();
        let engine = YtDlpEngine::new(dir.path().join("does-not-exist"));
        let result = engine.extract_info("https://example.com/v", &config(&dir)).await;
        assert!(matches!(result, Err(EngineError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_info_parses_json() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(
            &dir,
            "echo '{\"title\": \"Demo\", \"ext\": \"mp4\", \"_filename\": \"/dl/Demo.mp4\"}'\n",
        );
        let info = engine.extract_info("https://example.com/v", &config(&dir)).await.unwrap();
        assert_eq!(info.display_title(), "Demo");
        assert_eq!(info.output_path(), Some(PathBuf::from("/dl/Demo.mp4")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_info_empty_output() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(&dir, "echo null\n");
        let result = engine.extract_info("https://example.com/v", &config(&dir)).await;
        assert!(matches!(result, Err(EngineError::NoInfo)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_failure_carries_engine_message() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(
            &dir,
            "echo 'ERROR: [generic] Unsupported URL: https://example.com/v' >&2\nexit 1\n",
        );
        let err = engine.extract_info("https://example.com/v", &config(&dir)).await.unwrap_err();
        assert_eq!(err.to_string(), "ERROR: [generic] Unsupported URL: https://example.com/v");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_forwards_progress_in_order() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(
            &dir,
            "echo '[ytdlp-gui]downloading|1024|4096|NA|512.0|6'\n\
             echo '[download] unrelated line' >&2\n\
             echo '[ytdlp-gui]downloading|4096|4096|NA|1024.0|0'\n\
             echo '[ytdlp-gui]finished|4096|4096|NA|NA|NA'\n\
             echo '/dl/Demo.mp4'\n",
        );

        let seen: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let hook: ProgressHook = Box::new(move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });

        let path = engine.download("https://example.com/v", &config(&dir), hook).await.unwrap();
        assert_eq!(path.as_deref(), Some(Path::new("/dl/Demo.mp4")));

        let seen = seen.lock().unwrap();
        let downloaded: Vec<_> = seen.iter().map(|e| e.downloaded_bytes).collect();
        assert_eq!(downloaded, vec![Some(1024), Some(4096), Some(4096)]);
        assert_eq!(seen[0].percent(), Some(25));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_hook_error_stops_engine() {
        let dir = TempDir::new().unwrap();
        // boucle longue: seul l'arrêt par le callback permet de terminer rapidement
        let engine = script_engine(
            &dir,
            "i=0\nwhile [ $i -lt 400 ]; do\n  echo \"[ytdlp-gui]downloading|$i|400|NA|NA|NA\"\n  sleep 0.05\n  i=$((i+1))\ndone\n",
        );

        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let hook: ProgressHook = Box::new(move |_| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            if *n >= 2 { Err(EngineError::Cancelled) } else { Ok(()) }
        });

        let started = std::time::Instant::now();
        let result = engine.download("https://example.com/v", &config(&dir), hook).await;
        assert!(matches!(result, Err(EngineError::Cancelled)));
        assert_eq!(*calls.lock().unwrap(), 2);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invalid_utf8_on_stderr_keeps_engine_message() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(
            &dir,
            "printf 'WARNING: titre \\351t\\351\\n' >&2\necho 'ERROR: real engine message' >&2\nexit 1\n",
        );
        let hook: ProgressHook = Box::new(|_| Ok(()));
        let err = engine.download("https://example.com/v", &config(&dir), hook).await.unwrap_err();
        assert_eq!(err.to_string(), "ERROR: real engine message");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invalid_utf8_on_stdout_keeps_progress_flowing() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(
            &dir,
            "echo '[ytdlp-gui]downloading|1|3|NA|NA|NA'\n\
             printf '\\377\\n'\n\
             echo '[ytdlp-gui]downloading|2|3|NA|NA|NA'\n\
             echo '[ytdlp-gui]downloading|3|3|NA|NA|NA'\n",
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let hook: ProgressHook = Box::new(move |event| {
            sink.lock().unwrap().push(event.downloaded_bytes);
            Ok(())
        });

        engine.download("https://example.com/v", &config(&dir), hook).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Some(1), Some(2), Some(3)]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_failure_exit_code() {
        let dir = TempDir::new().unwrap();
        let engine = script_engine(&dir, "echo 'ERROR: unable to download video data: HTTP Error 403' >&2\nexit 1\n");
        let hook: ProgressHook = Box::new(|_| Ok(()));
        let err = engine.download("https://example.com/v", &config(&dir), hook).await.unwrap_err();
        assert!(matches!(err, EngineError::Failed(_)));
        assert!(err.to_string().contains("HTTP Error 403"));
    }
}
