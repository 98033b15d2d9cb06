use std::sync::Arc;
use tally_ocr::{OcrError, OcrWorker, UnavailableRecognizer};
use tally_storage::DbPool;

use crate::config::{OcrBackendKind, OcrConfig};
use crate::uploads::UploadStore;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub ocr: Arc<OcrWorker>,
    pub uploads: UploadStore,
}

/// Bring up the process-wide recognition engine selected by `config`.
pub fn start_ocr_worker(config: &OcrConfig) -> Result<OcrWorker, OcrError> {
    match config.backend {
        OcrBackendKind::Disabled => {
            tracing::warn!("receipt scanning disabled; uploads will be rejected");
            OcrWorker::start(|| Ok(UnavailableRecognizer))
        }
        OcrBackendKind::Tesseract => start_tesseract(config),
    }
}

#[cfg(feature = "tesseract")]
fn start_tesseract(config: &OcrConfig) -> Result<OcrWorker, OcrError> {
    let language = config.language.clone();
    let tessdata = config
        .tessdata
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    tracing::info!(%language, "starting tesseract");
    OcrWorker::start(move || tally_ocr::TesseractRecognizer::new(tessdata.as_deref(), &language))
}

#[cfg(not(feature = "tesseract"))]
fn start_tesseract(_config: &OcrConfig) -> Result<OcrWorker, OcrError> {
    Err(OcrError::NotAvailable)
}
