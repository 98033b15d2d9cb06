pub mod parse;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod types;
pub mod worker;

pub use parse::FieldParser;
pub use pipeline::{ExtractionError, TextRecognizer};
pub use preprocess::{prepare_for_ocr, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use types::{ExtractionResult, ParsedFields};
pub use worker::OcrWorker;

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
