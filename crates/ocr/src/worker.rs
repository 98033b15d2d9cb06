use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};

use crate::pipeline::{ExtractionError, TextRecognizer};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ExtractionResult;

/// Uploads waiting for the engine before senders start to block.
const QUEUE_DEPTH: usize = 32;

struct Job {
    path: PathBuf,
    reply: oneshot::Sender<Result<ExtractionResult, ExtractionError>>,
}

/// Process-wide owner of the recognition engine.
///
/// The engine is built once, on a dedicated thread, and every extraction is
/// queued to that thread. Recognition is blocking and CPU-bound, so it never
/// runs on the async executor, and requests never touch the engine at the
/// same time.
pub struct OcrWorker {
    tx: mpsc::Sender<Job>,
    handle: Option<JoinHandle<()>>,
}

impl OcrWorker {
    /// Spawn the worker and build the backend with `init` on it. Returns once
    /// the backend is ready, or with the error `init` produced.
    pub fn start<B, F>(init: F) -> Result<Self, OcrError>
    where
        B: OcrBackend + 'static,
        F: FnOnce() -> Result<B, OcrError> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Job>(QUEUE_DEPTH);
        let (ready_tx, ready_rx) = std_mpsc::sync_channel::<Result<(), OcrError>>(1);

        let handle = std::thread::Builder::new()
            .name("ocr-worker".into())
            .spawn(move || {
                let backend = match init() {
                    Ok(backend) => backend,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let mut recognizer = TextRecognizer::new(backend);
                while let Some(job) = rx.blocking_recv() {
                    let result = recognizer.extract(&job.path);
                    // The requester may have gone away; nothing to do then.
                    let _ = job.reply.send(result);
                }
                tracing::debug!("ocr worker queue closed");
            })
            .map_err(|e| OcrError::Engine(format!("failed to spawn OCR worker: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                tracing::info!("ocr engine initialized");
                Ok(Self { tx, handle: Some(handle) })
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(OcrError::Engine("OCR worker exited during startup".into()))
            }
        }
    }

    /// Recognize the receipt at `path` and parse its amount and date.
    pub async fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job { path: path.to_path_buf(), reply })
            .await
            .map_err(|_| ExtractionError::WorkerStopped)?;
        rx.await.map_err(|_| ExtractionError::WorkerStopped)?
    }

    /// Close the queue, let queued jobs finish and release the engine.
    pub fn shutdown(self) {
        let OcrWorker { tx, handle } = self;
        drop(tx);
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("ocr worker panicked");
            }
        }
        tracing::info!("ocr engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::write_png;
    use crate::recognizer::{MockRecognizer, UnavailableRecognizer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn extract_returns_parsed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "receipt.png");
        let worker = OcrWorker::start(|| Ok(MockRecognizer::new(["Total ₹450.00", "Date: 2024-03-15"]))).unwrap();

        let result = worker.extract(&path).await.unwrap();
        assert_eq!(result.amount.as_deref(), Some("450.00"));
        assert_eq!(result.date.as_deref(), Some("2024-03-15"));
        worker.shutdown();
    }

    #[tokio::test]
    async fn missing_path_fails_without_killing_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let worker = OcrWorker::start(|| Ok(MockRecognizer::new(["1.00"]))).unwrap();

        let err = worker.extract(&dir.path().join("missing.png")).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));

        let path = write_png(dir.path(), "ok.png");
        assert_eq!(worker.extract(&path).await.unwrap().amount.as_deref(), Some("1.00"));
        worker.shutdown();
    }

    #[tokio::test]
    async fn backend_is_initialized_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "r.png");
        let inits = Arc::new(AtomicUsize::new(0));
        let counter = inits.clone();

        let worker = OcrWorker::start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(MockRecognizer::new(["x"]))
        })
        .unwrap();
        for _ in 0..5 {
            worker.extract(&path).await.unwrap();
        }
        worker.shutdown();
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_requests_are_all_answered() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Arc::new(OcrWorker::start(|| Ok(MockRecognizer::new(["9.99"]))).unwrap());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let path = write_png(dir.path(), &format!("r{i}.png"));
            let worker = worker.clone();
            tasks.push(tokio::spawn(async move { worker.extract(&path).await }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().amount.as_deref(), Some("9.99"));
        }
    }

    #[test]
    fn init_failure_is_reported_from_start() {
        let result = OcrWorker::start(|| Err::<UnavailableRecognizer, _>(OcrError::Engine("no tessdata".into())));
        assert!(matches!(result, Err(OcrError::Engine(msg)) if msg == "no tessdata"));
    }
}
