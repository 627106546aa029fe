pub(crate) mod health;
pub(crate) mod magic_eraser;
pub(crate) mod ocr;
pub(crate) mod pdf_to_word;
pub(crate) mod remove_bg;
pub(crate) mod status;

pub use health::health_check;
pub use magic_eraser::magic_eraser;
pub use ocr::recognize_text;
pub use pdf_to_word::pdf_to_word;
pub use remove_bg::remove_background;
pub use status::service_status;

use axum::http::header;
use axum::response::{IntoResponse, Response};

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], png).into_response()
}
