use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ExtractionError;

#[cfg(feature = "ocr")]
use tesseract::Tesseract;

/// PDFs whose text layer is shorter than this are sent through OCR.
pub const MIN_PDF_TEXT_CHARS: usize = 100;

pub const METHOD_DIRECT_TEXT: &str = "direct_text";
pub const METHOD_DIRECT_EXTRACTION: &str = "direct_extraction";
pub const METHOD_OCR: &str = "ocr";
pub const METHOD_OCR_FALLBACK: &str = "ocr_fallback";
pub const METHOD_BYTE_SCAN: &str = "byte_scan";

static SIDECAR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Text pulled out of a document, with a label for how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub method: String,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>, method: &str) -> Self {
        Self {
            text: text.into(),
            method: method.to_string(),
        }
    }
}

/// Turns a document file into text. Short or empty text is a valid result.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError>;
}

/// Extracts text from W-2 PDFs, images and text files using external tools
/// (pdftotext, ocrmypdf) and Tesseract.
pub struct DocumentTextExtractor {
    temp_dir: String,
    lang: String,
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self {
            temp_dir: std::env::var("TEMP_DIR").unwrap_or_else(|_| "/tmp".to_string()),
            lang: "eng".to_string(),
        }
    }
}

impl DocumentTextExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            temp_dir: config.temp_dir.clone(),
            lang: "eng".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub async fn extract_text_from_image(&self, file_path: &Path) -> Result<String, ExtractionError> {
        #[cfg(feature = "ocr")]
        {
            let path = file_path
                .to_str()
                .ok_or_else(|| ExtractionError::OcrFailed {
                    details: format!("Path is not valid UTF-8: {}", file_path.display()),
                })?
                .to_string();
            let lang = self.lang.clone();

            let text = tokio::task::spawn_blocking(move || -> Result<String, ExtractionError> {
                let mut tesseract = Tesseract::new(None, Some(lang.as_str()))
                    .map_err(|e| ExtractionError::OcrFailed { details: e.to_string() })?
                    .set_image(&path)
                    .map_err(|e| ExtractionError::OcrFailed { details: e.to_string() })?;
                tesseract
                    .get_text()
                    .map_err(|e| ExtractionError::OcrFailed {
                        details: format!("Failed to extract text: {}", e),
                    })
            })
            .await
            .map_err(|e| ExtractionError::OcrFailed { details: e.to_string() })??;

            Ok(text.trim().to_string())
        }

        #[cfg(not(feature = "ocr"))]
        {
            debug!(
                "Cannot OCR {} (lang {}): built without the 'ocr' feature",
                file_path.display(),
                self.lang
            );
            Err(ExtractionError::OcrUnavailable)
        }
    }

    /// Text layer of a PDF via `pdftotext -layout`.
    async fn run_pdftotext(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let output = tokio::process::Command::new("pdftotext")
            .arg("-layout")
            .arg(file_path)
            .arg("-")
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ExtractionError::ToolMissing {
                    tool: "pdftotext",
                    package: "poppler-utils",
                },
                _ => ExtractionError::Io(e),
            })?;

        if !output.status.success() {
            return Err(ExtractionError::ToolFailed {
                tool: "pdftotext",
                details: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn sidecar_path(&self) -> PathBuf {
        let n = SIDECAR_COUNTER.fetch_add(1, Ordering::Relaxed);
        PathBuf::from(&self.temp_dir).join(format!("w2_ocr_{}_{}.txt", std::process::id(), n))
    }

    /// OCR a scanned PDF with `ocrmypdf --sidecar`.
    async fn run_ocrmypdf(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let sidecar = self.sidecar_path();

        let output = tokio::process::Command::new("ocrmypdf")
            .arg("--force-ocr")
            .arg("--sidecar")
            .arg(&sidecar)
            .arg(file_path)
            .arg("-")
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ExtractionError::ToolMissing {
                    tool: "ocrmypdf",
                    package: "ocrmypdf",
                },
                _ => ExtractionError::Io(e),
            })?;

        if !output.status.success() {
            let _ = tokio::fs::remove_file(&sidecar).await;
            return Err(ExtractionError::ToolFailed {
                tool: "ocrmypdf",
                details: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = tokio::fs::read_to_string(&sidecar).await;
        let _ = tokio::fs::remove_file(&sidecar).await;
        Ok(text?.trim().to_string())
    }

    /// Extract a PDF's text layer, switching to OCR when the layer is too
    /// thin and to a raw byte scan when no tool works.
    pub async fn extract_text_from_pdf(&self, file_path: &Path) -> Result<ExtractedText, ExtractionError> {
        match self.run_pdftotext(file_path).await {
            Ok(text) if text.trim().chars().count() >= MIN_PDF_TEXT_CHARS => {
                Ok(ExtractedText::new(text, METHOD_DIRECT_EXTRACTION))
            }
            Ok(text) => {
                info!(
                    "PDF text layer of {} is thin ({} chars), trying OCR",
                    file_path.display(),
                    text.trim().chars().count()
                );
                match self.run_ocrmypdf(file_path).await {
                    Ok(ocr_text) => Ok(ExtractedText::new(ocr_text, METHOD_OCR)),
                    Err(e) => {
                        warn!("OCR of {} failed, keeping text layer: {}", file_path.display(), e);
                        Ok(ExtractedText::new(text, METHOD_DIRECT_EXTRACTION))
                    }
                }
            }
            Err(e) => {
                warn!("pdftotext failed for {}: {}", file_path.display(), e);
                match self.run_ocrmypdf(file_path).await {
                    Ok(ocr_text) => Ok(ExtractedText::new(ocr_text, METHOD_OCR_FALLBACK)),
                    Err(ocr_error) => {
                        warn!("ocrmypdf failed for {}: {}", file_path.display(), ocr_error);
                        let text = self.extract_text_from_pdf_bytes(file_path).await?;
                        Ok(ExtractedText::new(text, METHOD_BYTE_SCAN))
                    }
                }
            }
        }
    }

    /// Last resort: extract readable text directly from PDF bytes
    async fn extract_text_from_pdf_bytes(&self, file_path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(file_path).await?;
        let text = printable_runs(&bytes);

        if text.trim().is_empty() {
            Err(ExtractionError::NoReadableText {
                path: file_path.to_path_buf(),
            })
        } else {
            Ok(text)
        }
    }

    pub async fn extract_with_mime_type(
        &self,
        file_path: &Path,
        mime_type: &str,
    ) -> Result<ExtractedText, ExtractionError> {
        match mime_type {
            "application/pdf" => self.extract_text_from_pdf(file_path).await,
            "image/png" | "image/jpeg" | "image/jpg" | "image/tiff" | "image/bmp" => {
                let text = self.extract_text_from_image(file_path).await?;
                Ok(ExtractedText::new(text, METHOD_OCR))
            }
            "text/plain" => {
                let text = tokio::fs::read_to_string(file_path).await?;
                Ok(ExtractedText::new(text, METHOD_DIRECT_TEXT))
            }
            _ => Err(ExtractionError::UnsupportedMimeType {
                mime_type: mime_type.to_string(),
            }),
        }
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        debug!("Extracting text from {} as {}", path.display(), mime);

        let extracted = self.extract_with_mime_type(path, mime.essence_str()).await?;
        info!(
            "Extracted {} chars from {} using {}",
            extracted.text.trim().chars().count(),
            path.display(),
            extracted.method
        );
        Ok(extracted)
    }
}

/// Printable ASCII runs longer than three characters, joined by spaces.
fn printable_runs(bytes: &[u8]) -> String {
    bytes
        .split(|byte| !(32..=126).contains(byte))
        .filter(|run| run.len() > 3)
        .flat_map(|run| String::from_utf8_lossy(run).split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|word| word.len() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}
