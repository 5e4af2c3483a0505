#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{self, Request},
    Router,
};
use bytes::Bytes;
use lopdf::{dictionary, Document, Object, Stream};
use notecraft_node::{
    api::{self, AppState},
    extractors::{ExtractionError, ExtractorRegistry, OcrEngine},
    prompts::PromptBuilder,
    services::{LlmClient, LlmClientError, ProcessingService},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const BOUNDARY: &str = "notecraft-test-boundary";

pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn file_part<'a>(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "file",
        filename,
        content_type,
        data,
    }
}

pub fn mode_part(value: &str) -> Part<'_> {
    Part::Text { name: "mode", value }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn process_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(http::Method::POST)
        .uri("/api/process")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub enum Reply {
    Echo,
    Fixed(&'static str),
    Fail,
}

/// Completion client that records how often it was called.
pub struct StubLlm {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubLlm {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Echo => Ok(prompt.to_string()),
            Reply::Fixed(text) => Ok(text.to_string()),
            Reply::Fail => Err(LlmClientError::ApiStatus {
                status: 503,
                body: "internal provider detail".to_string(),
            }),
        }
    }
}

pub struct StubOcr {
    pub text: &'static str,
    calls: AtomicUsize,
}

impl StubOcr {
    pub fn new(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            text,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for StubOcr {
    async fn recognize(&self, _image: Bytes) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

pub fn service(llm: Arc<StubLlm>, ocr: Arc<StubOcr>) -> ProcessingService {
    ProcessingService::new(
        ExtractorRegistry::new(ocr, Duration::from_secs(10)),
        PromptBuilder::default(),
        llm,
        Duration::from_secs(10),
    )
}

pub fn app(llm: Arc<StubLlm>) -> Router {
    app_with(llm, StubOcr::new("recognized text"), 1024 * 1024)
}

pub fn app_with(llm: Arc<StubLlm>, ocr: Arc<StubOcr>, max_upload_bytes: usize) -> Router {
    api::create_router(AppState::new(service(llm, ocr), max_upload_bytes))
}

/// One-page PDF whose page has no text operators, like a scan without OCR.
pub fn blank_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => dictionary! {},
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

/// Blank PDF with an `Encrypt` entry in its trailer.
pub fn encrypted_pdf() -> Vec<u8> {
    let mut doc = Document::load_mem(&blank_pdf()).unwrap();
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

pub fn png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([250, 250, 250]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    cursor.into_inner()
}
