// Service exports
pub mod generator;
pub mod ocr;

pub use generator::{GeminiClient, GeneratorError, TextGenerator};
pub use ocr::{recognize_upload, OcrError, Recognition, TesseractCli, TextRecognizer};
