use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Text recognition is not available in this build (enable the `tesseract` feature)")]
    NotAvailable,
}

/// Abstraction over a text-recognition engine.
///
/// Implementations receive a normalized PNG and return the text fragments
/// they detected, in whatever order the engine produces them. Backends are
/// owned by a single worker thread, so `&mut self` and no `Send` bound.
pub trait OcrBackend {
    fn recognize(&mut self, png: &[u8]) -> Result<Vec<String>, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns preset fragments regardless of the image.
pub struct MockRecognizer {
    pub fragments: Vec<String>,
}

impl MockRecognizer {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fragments: fragments.into_iter().map(Into::into).collect() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&mut self, _png: &[u8]) -> Result<Vec<String>, OcrError> {
        Ok(self.fragments.clone())
    }
}

// ── Placeholder for builds without an engine ──────────────────────────────────

/// Fails every request with [`OcrError::NotAvailable`]. Lets the server run
/// (expense tracking still works) on machines without Tesseract.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&mut self, _png: &[u8]) -> Result<Vec<String>, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    /// One engine instance, initialized once and reused for every image.
    pub struct TesseractRecognizer {
        engine: LepTess,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<&str>, lang: &str) -> Result<Self, OcrError> {
            let engine = LepTess::new(data_path, lang).map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(Self { engine })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&mut self, png: &[u8]) -> Result<Vec<String>, OcrError> {
            self.engine
                .set_image_from_mem(png)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = self
                .engine
                .get_utf8_text()
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect())
        }
    }
}
