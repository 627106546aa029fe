use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub scratch: ScratchConfig,
    pub background: BackgroundConfig,
    pub ocr: OcrConfig,
    pub eraser: EraserConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request body, multipart framing included.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScratchConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundConfig {
    pub model_path: PathBuf,
    pub input_size: u32,
    pub intra_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language string, `+` separated.
    pub languages: String,
    pub tessdata_path: Option<String>,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EraserConfig {
    pub inpaint_radius: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("temp"),
        }
    }
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/u2net.onnx"),
            input_size: 320,
            intra_threads: 4,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "chi_sim+eng".to_string(),
            tessdata_path: None,
            timeout_secs: 60,
            max_image_dimension: 4096,
        }
    }
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self { inpaint_radius: 3 }
    }
}

impl Default for Config {
    fn default() -> Self {
        let server = ServerConfig::default();
        let scratch = ScratchConfig::default();
        let background = BackgroundConfig::default();
        let ocr = OcrConfig::default();
        let eraser = EraserConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("TOOLBOX_HOST").unwrap_or(server.host),
                port: parse_env_or("TOOLBOX_PORT", server.port),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", server.max_upload_bytes),
            },
            scratch: ScratchConfig {
                dir: env::var("SCRATCH_DIR").map(PathBuf::from).unwrap_or(scratch.dir),
            },
            background: BackgroundConfig {
                model_path: env::var("BACKGROUND_MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(background.model_path),
                input_size: parse_env_or("BACKGROUND_INPUT_SIZE", background.input_size),
                intra_threads: parse_env_or("BACKGROUND_THREADS", background.intra_threads),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr.languages),
                tessdata_path: env::var("OCR_TESSDATA_PATH").ok(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr.timeout_secs),
                max_image_dimension: parse_env_or("OCR_MAX_DIMENSION", ocr.max_image_dimension),
            },
            eraser: EraserConfig {
                // A zero radius would leave every masked pixel without neighbours.
                inpaint_radius: parse_env_or("ERASER_INPAINT_RADIUS", eraser.inpaint_radius)
                    .max(1),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
