use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parse::FieldParser;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ExtractionResult;

/// Receipt extraction failed. Fatal to that upload; the user may retry
/// with another image.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not read image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image could not be processed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("Text recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("OCR worker is not running")]
    WorkerStopped,
}

/// Orchestrates: read → preprocess → recognize → join → parse.
pub struct TextRecognizer<B: OcrBackend> {
    backend: B,
}

impl<B: OcrBackend> TextRecognizer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// All fragments the engine found in the image at `path`, joined with
    /// single spaces in engine order.
    pub fn recognize_file(&mut self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let png = preprocess::prepare_for_ocr(&bytes)?;
        let fragments = self.backend.recognize(&png)?;
        Ok(fragments.join(" "))
    }

    /// Recognize the image and pull the candidate amount and date out of it.
    pub fn extract(&mut self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let raw_text = self.recognize_file(path)?;
        let fields = FieldParser::parse(&raw_text);
        tracing::debug!(
            path = %path.display(),
            chars = raw_text.len(),
            amount = fields.amount.as_deref().unwrap_or("-"),
            date = fields.date.as_deref().unwrap_or("-"),
            "receipt extracted"
        );
        Ok(ExtractionResult::new(raw_text, fields))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma};
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    pub fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |x, _| Luma([if x % 2 == 0 { 30u8 } else { 220 }]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    pub fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, tiny_png()).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_png;
    use super::*;
    use crate::recognizer::{MockRecognizer, UnavailableRecognizer};

    #[test]
    fn fragments_are_joined_with_single_spaces_in_engine_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "r.png");
        let mut r = TextRecognizer::new(MockRecognizer::new(["Date: 2024-03-15", "Total", "₹450.00"]));
        assert_eq!(r.recognize_file(&path).unwrap(), "Date: 2024-03-15 Total ₹450.00");
    }

    #[test]
    fn no_fragments_gives_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "blank.png");
        let mut r = TextRecognizer::new(MockRecognizer::new(Vec::<String>::new()));
        let result = r.extract(&path).unwrap();
        assert_eq!(result.raw_text, "");
        assert_eq!((result.amount, result.date), (None, None));
    }

    #[test]
    fn extract_parses_recognized_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "r.png");
        let mut r = TextRecognizer::new(MockRecognizer::new(["Total ₹450.00", "Date: 2024-03-15"]));
        let result = r.extract(&path).unwrap();
        assert_eq!(result.raw_text, "Total ₹450.00 Date: 2024-03-15");
        assert_eq!(result.amount.as_deref(), Some("450.00"));
        assert_eq!(result.date.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = TextRecognizer::new(MockRecognizer::new(["Total 1.00"]));
        let err = r.extract(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }

    #[test]
    fn undecodable_file_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        let mut r = TextRecognizer::new(MockRecognizer::new(["Total 1.00"]));
        assert!(matches!(r.extract(&path), Err(ExtractionError::Preprocess(_))));
    }

    #[test]
    fn engine_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "r.png");
        let mut r = TextRecognizer::new(UnavailableRecognizer);
        assert!(matches!(
            r.extract(&path),
            Err(ExtractionError::Ocr(OcrError::NotAvailable))
        ));
    }
}
