/*!
 * OCR Utility Functions
 *
 * Helper functions to decide how a W-2 file is turned into text, and to
 * reject files the pipeline cannot handle before any work starts.
 */

use std::path::Path;

use crate::errors::InputError;

/// Extensions that go through the OCR pipeline (images and scanned PDFs)
const OCR_EXTENSIONS: [&str; 6] = [".pdf", ".jpg", ".jpeg", ".png", ".tiff", ".bmp"];
/// Extensions read directly as text
const TEXT_EXTENSIONS: [&str; 1] = [".txt"];

/// Determine if a file requires OCR processing based on its filename/extension
pub fn file_needs_ocr(filename: &str) -> bool {
    let extension = extract_extension(filename);
    OCR_EXTENSIONS.contains(&extension.as_str())
}

/// Determine if a file can be read as plain text
pub fn file_is_plain_text(filename: &str) -> bool {
    let extension = extract_extension(filename);
    TEXT_EXTENSIONS.contains(&extension.as_str())
}

pub fn is_supported_w2_file(filename: &str) -> bool {
    file_needs_ocr(filename) || file_is_plain_text(filename)
}

/// Extract file extension from filename (lowercased, with the leading dot)
pub fn extract_extension(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    if let Some(pos) = name.rfind('.') {
        name[pos..].to_lowercase()
    } else {
        String::new()
    }
}

/// Check that `path` names an existing, non-empty file. Returns the file
/// size in bytes.
pub fn check_exists_non_empty(path: &Path) -> Result<u64, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound { path: path.to_path_buf() });
    }

    let size = std::fs::metadata(path)?.len();
    if size == 0 {
        return Err(InputError::Empty { path: path.to_path_buf() });
    }
    Ok(size)
}

/// Check that `path` names an existing, non-empty file of a supported type.
/// Returns the file size in bytes.
pub fn validate_input(path: &Path) -> Result<u64, InputError> {
    let size = check_exists_non_empty(path)?;

    let filename = path.to_string_lossy();
    if !is_supported_w2_file(&filename) {
        return Err(InputError::UnsupportedFormat {
            extension: extract_extension(&filename),
        });
    }

    Ok(size)
}
