/*!
 * Unit Tests for W-2 File Type Routing
 *
 * These tests verify the utility functions that decide whether a W-2 file
 * goes through OCR, is read as plain text, or is rejected up front.
 */

#[cfg(test)]
mod tests {
    use w2_analyzer::errors::InputError;
    use w2_analyzer::utils::ocr::{
        file_is_plain_text, file_needs_ocr, is_supported_w2_file, validate_input,
    };

    #[test]
    fn test_image_files_need_ocr() {
        // Image files SHOULD be routed to OCR
        assert!(file_needs_ocr("scan.png"), "PNG files should need OCR");
        assert!(file_needs_ocr("photo.jpg"), "JPG files should need OCR");
        assert!(file_needs_ocr("image.JPEG"), "JPEG files should need OCR (case insensitive)");
        assert!(file_needs_ocr("document.tiff"), "TIFF files should need OCR");
        assert!(file_needs_ocr("bitmap.bmp"), "BMP files should need OCR");
    }

    #[test]
    fn test_pdf_files_need_ocr() {
        // PDF files SHOULD be routed to OCR (they might be scanned forms)
        assert!(file_needs_ocr("w2.pdf"), "PDF files should need OCR");
        assert!(file_needs_ocr("W2_2023.PDF"), "PDF files should need OCR (case insensitive)");
    }

    #[test]
    fn test_text_files_dont_need_ocr() {
        assert!(!file_needs_ocr("w2.txt"), "TXT files should not need OCR");
        assert!(file_is_plain_text("w2.txt"), "TXT files should be read directly");
        assert!(file_is_plain_text("W2.TXT"), "TXT files should be read directly (case insensitive)");
    }

    #[test]
    fn test_unsupported_formats() {
        // Formats the W-2 pipeline has no extractor for
        assert!(!is_supported_w2_file("w2.docx"), "DOCX is not a supported W-2 format");
        assert!(!is_supported_w2_file("w2.gif"), "GIF is not a supported W-2 format");
        assert!(!is_supported_w2_file("w2.webp"), "WEBP is not a supported W-2 format");
        assert!(!is_supported_w2_file("README"), "Files without extension are not supported");
    }

    #[test]
    fn test_edge_cases() {
        // Edge cases
        assert!(!file_needs_ocr(""), "Empty filename should not need OCR");
        assert!(!file_needs_ocr("."), "Just a dot should not need OCR");
        assert!(!file_needs_ocr(".pdf.bak"), "Backup suffix should not need OCR");
        assert!(file_needs_ocr("w2.final.pdf"), "Multiple dots should use the last extension");
        assert!(file_needs_ocr("scans/2023/w2.png"), "Paths should use the file extension");
    }

    #[test]
    fn test_validate_input_rejects_unsupported_before_processing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("w2.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        match validate_input(&path) {
            Err(InputError::UnsupportedFormat { extension }) => assert_eq!(extension, ".gif"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }
}
