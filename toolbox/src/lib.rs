pub mod api;
pub mod background;
pub mod config;
pub mod convert;
pub mod error;
pub mod imaging;
pub mod inpaint;
pub mod ocr;
pub mod scratch;
