// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Request};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use toolbox::api::{create_router, AppState};
use toolbox::background::BackgroundProvider;
use toolbox::config::{
    BackgroundConfig, Config, EraserConfig, OcrConfig, ScratchConfig, ServerConfig,
};
use toolbox::convert::PdfToDocx;
use toolbox::error::ToolboxError;
use toolbox::imaging;
use toolbox::ocr::{OcrEngine, RecognizerFactory, TextRecognizer};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

const BOUNDARY: &str = "toolbox-integration-boundary";

/// A multipart part: field name, client filename, bytes.
pub type Part<'a> = (&'a str, &'a str, Vec<u8>);

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Failed to build multipart request")
}

pub fn test_config(scratch: &Path) -> Config {
    Config {
        server: ServerConfig::default(),
        scratch: ScratchConfig {
            dir: scratch.to_path_buf(),
        },
        background: BackgroundConfig::default(),
        ocr: OcrConfig::default(),
        eraser: EraserConfig::default(),
    }
}

/// Router with the real converter and inpainter; background removal is
/// unavailable and OCR is backed by `recognizer` when given.
pub fn test_router(scratch: &Path, recognizer: Option<Arc<dyn TextRecognizer>>) -> axum::Router {
    let config = test_config(scratch);
    let factory: RecognizerFactory = Arc::new(move || {
        recognizer
            .clone()
            .ok_or_else(|| ToolboxError::Recognition("no recognizer configured".to_string()))
    });
    let ocr = Arc::new(OcrEngine::with_factory(&config.ocr, factory));

    let state = AppState::with_providers(
        config,
        BackgroundProvider::unavailable("no model in tests"),
        ocr,
        Arc::new(PdfToDocx),
    );
    create_router(state)
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Response is not JSON")
}

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    imaging::encode_png(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb(color),
    )))
    .expect("Failed to encode PNG fixture")
}

/// `width`x`height` RGB image of `background` with a `color` square at
/// (`x`, `y`) of side `side`.
pub fn square_on_background(
    width: u32,
    height: u32,
    background: [u8; 3],
    color: [u8; 3],
    (x, y, side): (u32, u32, u32),
) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |px, py| {
        if px >= x && px < x + side && py >= y && py < y + side {
            Rgb(color)
        } else {
            Rgb(background)
        }
    });
    imaging::encode_png(&DynamicImage::ImageRgb8(image)).expect("Failed to encode PNG fixture")
}

/// Mask that is 255 inside the square and 0 elsewhere.
pub fn square_mask(width: u32, height: u32, (x, y, side): (u32, u32, u32)) -> Vec<u8> {
    let mask = GrayImage::from_fn(width, height, |px, py| {
        if px >= x && px < x + side && py >= y && py < y + side {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    imaging::encode_png(&DynamicImage::ImageLuma8(mask)).expect("Failed to encode mask fixture")
}

/// One PDF page per entry in `pages`, each showing its text in Courier.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let contents = pages
        .iter()
        .map(|text| {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        })
        .collect();
    pdf_with_contents(contents)
}

/// Single page that shows text before any font is selected.
pub fn pdf_without_font_selection() -> Vec<u8> {
    pdf_with_contents(vec![vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal("No font")]),
        Operation::new("ET", vec![]),
    ]])
}

/// One PDF page per content stream, sharing a Courier `F1` font resource.
fn pdf_with_contents(contents: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in contents {
        let content = Content { operations };
        let encoded = content.encode().expect("Failed to encode PDF content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to write PDF fixture");
    buffer
}

/// Paragraph texts of a DOCX package, in document order.
pub fn docx_paragraphs(bytes: &[u8]) -> Vec<String> {
    let docx = docx_rs::read_docx(bytes).expect("Failed to read DOCX");
    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for part in &paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = part {
                    for run_child in &run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }
    paragraphs
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

// Re-export commonly used crates for convenience
pub use tempfile;
