#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::ErrorCategory;
    use crate::models::UploadedFile;
    use bytes::Bytes;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) fn build_pdf(text: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    /// Text PDF whose trailer points at a standard security handler.
    pub(crate) fn build_encrypted_pdf() -> Vec<u8> {
        let mut doc = Document::load_mem(&build_pdf(Some("Secret notes"))).unwrap();
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 1,
            "R" => 2,
            "O" => Object::string_literal(vec![0u8; 32]),
            "U" => Object::string_literal(vec![0u8; 32]),
            "P" => -4,
        });
        doc.trailer.set("Encrypt", encrypt_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    pub(crate) fn build_png() -> Vec<u8> {
        let img = ::image::RgbImage::from_pixel(4, 4, ::image::Rgb([255, 255, 255]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        img.write_to(&mut cursor, ::image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    pub(crate) struct StubOcr {
        pub text: Option<String>,
        pub calls: AtomicUsize,
    }

    impl StubOcr {
        pub fn returning(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                text: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OcrEngine for StubOcr {
        async fn recognize(&self, _image: Bytes) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .clone()
                .ok_or_else(|| ExtractionError::Ocr("engine crashed".to_string()))
        }
    }

    fn upload(name: &str, data: impl Into<Bytes>) -> UploadedFile {
        UploadedFile::new(Some(name.to_string()), None, data)
    }

    mod plain_text_extractor_tests {
        use super::*;

        #[tokio::test]
        async fn test_plain_text_passthrough() {
            let extractor = PlainTextExtractor::new();
            let text = extractor
                .extract(&upload("notes.txt", "  The cat sat on the mat.\n"))
                .await
                .unwrap();

            assert_eq!(text, "The cat sat on the mat.");
            assert_eq!(extractor.content_type(), ContentType::PlainText);
        }

        #[tokio::test]
        async fn test_plain_text_strips_bom() {
            let extractor = PlainTextExtractor::new();
            let mut data = vec![0xEF, 0xBB, 0xBF];
            data.extend_from_slice("Ünïcode notes".as_bytes());

            let text = extractor.extract(&upload("notes.md", data)).await.unwrap();
            assert_eq!(text, "Ünïcode notes");
        }

        #[tokio::test]
        async fn test_plain_text_invalid_utf8() {
            let extractor = PlainTextExtractor::new();
            let result = extractor
                .extract(&upload("notes.txt", vec![0x66, 0x6f, 0xff, 0xfe, 0x6f]))
                .await;

            let err = result.unwrap_err();
            assert!(matches!(err, ExtractionError::Decode(_)));
            assert_eq!(err.category(), ErrorCategory::DecodeError);
        }
    }

    mod pdf_extractor_tests {
        use super::*;

        #[tokio::test]
        async fn test_pdf_with_text_layer() {
            let extractor = PdfExtractor::new();
            let text = extractor
                .extract(&upload("doc.pdf", build_pdf(Some("Hello World"))))
                .await
                .unwrap();

            assert!(text.contains("Hello"), "unexpected PDF text: {:?}", text);
        }

        #[tokio::test]
        async fn test_pdf_without_text_layer() {
            let extractor = PdfExtractor::new();
            let err = extractor
                .extract(&upload("scan.pdf", build_pdf(None)))
                .await
                .unwrap_err();

            assert!(matches!(err, ExtractionError::NoTextLayer), "got {:?}", err);
            assert_eq!(err.category(), ErrorCategory::ExtractionError);
        }

        #[tokio::test]
        async fn test_encrypted_pdf() {
            let extractor = PdfExtractor::new();
            let err = extractor
                .extract(&upload("locked.pdf", build_encrypted_pdf()))
                .await
                .unwrap_err();

            assert!(matches!(err, ExtractionError::EncryptedPdf), "got {:?}", err);
            assert_eq!(err.category(), ErrorCategory::ExtractionError);
            assert_eq!(err.public_message(), "PDF is encrypted");
        }

        #[tokio::test]
        async fn test_malformed_pdf() {
            let extractor = PdfExtractor::new();
            let err = extractor
                .extract(&upload("broken.pdf", "%PDF-1.4\nthis is not a pdf body"))
                .await
                .unwrap_err();

            assert!(matches!(err, ExtractionError::MalformedPdf(_)), "got {:?}", err);
            assert_eq!(err.public_message(), "PDF could not be parsed");
        }
    }

    mod image_extractor_tests {
        use super::*;

        #[tokio::test]
        async fn test_image_runs_ocr_and_normalizes() {
            let ocr = Arc::new(StubOcr::returning("Photosynthesis   \n\n\n\nConverts light\r\n"));
            let extractor = ImageExtractor::new(ocr.clone());

            let text = extractor.extract(&upload("board.png", build_png())).await.unwrap();

            assert_eq!(text, "Photosynthesis\n\nConverts light");
            assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_unsupported_image_format_skips_ocr() {
            let ocr = Arc::new(StubOcr::returning("never"));
            let extractor = ImageExtractor::new(ocr.clone());
            let gif = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;".to_vec();

            let err = extractor.extract(&upload("anim.gif", gif)).await.unwrap_err();

            assert!(matches!(err, ExtractionError::UnsupportedImage(_)), "got {:?}", err);
            assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_ocr_failure_is_extraction_error() {
            let extractor = ImageExtractor::new(Arc::new(StubOcr::failing()));
            let err = extractor.extract(&upload("board.png", build_png())).await.unwrap_err();

            assert!(matches!(err, ExtractionError::Ocr(_)));
            assert_eq!(err.category(), ErrorCategory::ExtractionError);
        }

        #[tokio::test]
        async fn test_tesseract_missing_binary() {
            let ocr = TesseractOcr::new("/nonexistent/tesseract-binary", "eng");
            let err = ocr.recognize(Bytes::from(build_png())).await.unwrap_err();

            match err {
                ExtractionError::Ocr(message) => assert!(message.contains("failed to run")),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  a  \r\nb\n\n\n\n\nc \t\n"), "a\nb\n\nc");
        assert_eq!(normalize_text("page one\u{000C}page two"), "page one\n\npage two");
        assert_eq!(normalize_text(" \n\t "), "");
    }
}
