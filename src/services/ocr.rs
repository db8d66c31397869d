use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur while recognizing text in an image
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to start recognizer {binary}: {source}")]
    SpawnError {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Recognizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Best-effort text recovered from an image
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Empty when nothing was recognized
    pub text: String,
    /// `None` when the recognizer doesn't report one
    pub confidence: Option<f64>,
}

/// Image in, text out
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<Recognition, OcrError>;
}

/// Runs the `tesseract` command line tool
pub struct TesseractCli {
    binary: String,
    language: String,
}

impl TesseractCli {
    pub fn new(binary: String, language: String) -> Self {
        Self { binary, language }
    }
}

#[async_trait]
impl TextRecognizer for TesseractCli {
    async fn recognize(&self, image: &Path) -> Result<Recognition, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| OcrError::SpawnError {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!("Recognized {} characters from {}", text.len(), image.display());

        Ok(Recognition {
            text,
            confidence: None,
        })
    }
}

/// Recognize an uploaded image held in memory
///
/// The bytes are written to a temporary file that is removed when this
/// returns, whatever the outcome.
pub async fn recognize_upload(
    recognizer: &dyn TextRecognizer,
    image: &[u8],
) -> Result<Recognition, OcrError> {
    let mut upload = tempfile::Builder::new().prefix("survey-").tempfile()?;
    upload.write_all(image)?;
    upload.flush()?;

    recognizer.recognize(upload.path()).await
}
