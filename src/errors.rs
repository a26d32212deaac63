use std::path::PathBuf;
use thiserror::Error;

/// Problems with the input file, detected before the pipeline runs.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("File is empty: {}", path.display())]
    Empty { path: PathBuf },

    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read file metadata: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the text extraction collaborator.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{tool} is not available. Please install {tool} (e.g. 'apt-get install {package}')")]
    ToolMissing { tool: &'static str, package: &'static str },

    #[error("{tool} failed: {details}")]
    ToolFailed { tool: &'static str, details: String },

    #[error("Image OCR requires the 'ocr' feature (Tesseract)")]
    OcrUnavailable,

    #[error("OCR failed: {details}")]
    OcrFailed { details: String },

    #[error("No readable text found in {}", path.display())]
    NoReadableText { path: PathBuf },

    #[error("Unsupported MIME type: {mime_type}")]
    UnsupportedMimeType { mime_type: String },

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the generative-model collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("GEMINI_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model response contained no text")]
    EmptyResponse,

    #[error("Failed to parse JSON response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Gemini extraction failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    pub fn is_malformed_json(&self) -> bool {
        match self {
            LlmError::MalformedJson(_) => true,
            LlmError::RetriesExhausted { last, .. } => last.is_malformed_json(),
            _ => false,
        }
    }
}

/// The raw field blob did not have the expected shape.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Extracted data must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("Malformed extracted data: {0}")]
    Shape(#[from] serde_json::Error),
}
