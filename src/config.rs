use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for ayah-reel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Verse-data endpoint settings
    pub api: ApiConfig,

    /// Local surah index
    pub catalog: CatalogConfig,

    /// Font candidate locations
    pub fonts: FontConfig,

    /// Frame composition settings
    pub render: RenderConfig,

    /// External encoder settings
    pub encoder: EncoderConfig,

    /// Working directories
    pub paths: PathsConfig,

    /// Verse loop settings
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.render.validate()?;
        self.encoder.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Verse-data endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; requests go to `{base_url}/api/{surah}/{ayah}.json`
    pub base_url: String,

    /// Bounded wait for the verse-data request (seconds)
    pub timeout_secs: u64,

    /// Key of the audio bit-rate variant to download
    pub audio_variant: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quranapi.pages.dev".to_string(),
            timeout_secs: 10,
            audio_variant: "2".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(invalid("api.base_url", &self.base_url).into());
        }
        if self.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", self.timeout_secs).into());
        }
        if self.audio_variant.trim().is_empty() {
            return Err(invalid("api.audio_variant", &self.audio_variant).into());
        }
        Ok(())
    }
}

/// Surah index location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("surahs.json"),
        }
    }
}

/// Ordered font candidate lists plus the network fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Source-script (Arabic) font locations, checked in order
    pub source_candidates: Vec<PathBuf>,

    /// Where to fetch a source-script font when no candidate exists
    pub source_download_url: String,

    /// Destination of the downloaded font
    pub download_path: PathBuf,

    /// Translation-script font locations, checked in order
    pub translation_candidates: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            source_candidates: vec![PathBuf::from("assets/arabic_font.ttf")],
            source_download_url: "https://github.com/khaledhosny/amiri/raw/main/amiri-regular.ttf"
                .to_string(),
            download_path: PathBuf::from("assets/arabic_font.ttf"),
            translation_candidates: [
                "/usr/share/fonts/truetype/msttcorefonts/Georgia.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
                "/System/Library/Fonts/Georgia.ttf",
                "C:/Windows/Fonts/georgia.ttf",
                "C:/Windows/Fonts/times.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
                "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

/// Frame composition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,

    /// Horizontal space reserved for the border; text wraps at `width - text_margin`
    pub text_margin: u32,

    /// Footer line drawn at the bottom of every frame
    pub footer: String,

    pub particle_count: u32,
    pub ray_count: u32,

    /// Gaussian sigma of the background glow pass
    pub background_blur: f32,

    /// Contrast boost in percent
    pub contrast: f32,

    /// Gaussian sigma of the text glow
    pub glow_blur: f32,

    /// Brightness multiplier of the text glow
    pub glow_intensity: f32,

    /// Auto-fit never goes below this size
    pub min_font_size: f32,

    /// Auto-fit shrink step
    pub font_step: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            text_margin: 200,
            footer: "QuranIlm • Divine Words".to_string(),
            particle_count: 500,
            ray_count: 20,
            background_blur: 2.0,
            contrast: 20.0,
            glow_blur: 10.0,
            glow_intensity: 1.3,
            min_font_size: 10.0,
            font_step: 2.0,
        }
    }
}

impl RenderConfig {
    /// Ratio of this frame's height to the 1080p reference layout
    pub fn scale(&self) -> f32 {
        self.height as f32 / 1080.0
    }

    /// Width available to text once the border is accounted for
    pub fn text_width(&self) -> u32 {
        self.width.saturating_sub(self.text_margin).max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("render.dimensions", format!("{}x{}", self.width, self.height)).into());
        }
        if self.text_margin >= self.width {
            return Err(invalid("render.text_margin", self.text_margin).into());
        }
        let positive = [
            ("render.background_blur", self.background_blur),
            ("render.glow_blur", self.glow_blur),
            ("render.min_font_size", self.min_font_size),
            ("render.font_step", self.font_step),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(key, value).into());
            }
        }
        if !(self.glow_intensity.is_finite() && self.glow_intensity >= 0.0) {
            return Err(invalid("render.glow_intensity", self.glow_intensity).into());
        }
        if !self.contrast.is_finite() {
            return Err(invalid("render.contrast", self.contrast).into());
        }
        Ok(())
    }
}

/// External encoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub ffmpeg: String,
    pub ffprobe: String,

    /// Filter graph of the audio cleanup pass
    pub audio_filter: String,

    /// Bit rate of the cleaned audio
    pub enhanced_bitrate: String,

    /// Bit rate of the muxed AAC track
    pub mux_audio_bitrate: String,

    pub crf: u8,

    /// Duration used when probing the processed audio fails (seconds)
    pub default_duration: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            audio_filter: "acompressor=threshold=0.125:ratio=2:attack=25:release=250:makeup=1.5,\
                           highpass=f=80,lowpass=f=16000,loudnorm"
                .to_string(),
            enhanced_bitrate: "256k".to_string(),
            mux_audio_bitrate: "192k".to_string(),
            crf: 23,
            default_duration: 10.0,
        }
    }
}

impl EncoderConfig {
    fn validate(&self) -> Result<()> {
        if self.ffmpeg.trim().is_empty() {
            return Err(invalid("encoder.ffmpeg", &self.ffmpeg).into());
        }
        if self.ffprobe.trim().is_empty() {
            return Err(invalid("encoder.ffprobe", &self.ffprobe).into());
        }
        if self.crf > 51 {
            return Err(invalid("encoder.crf", self.crf).into());
        }
        if !(self.default_duration.is_finite() && self.default_duration > 0.0) {
            return Err(invalid("encoder.default_duration", self.default_duration).into());
        }
        Ok(())
    }
}

/// Working directories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Scratch space for the frame and audio intermediates
    pub temp_dir: PathBuf,

    /// Finished videos land here
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Verse loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between verses (seconds)
    pub pause_secs: u64,

    /// Stop after this many attempts; unlimited when absent
    pub max_verses: Option<u32>,

    /// Seed for verse selection; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pause_secs: 5,
            max_verses: None,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}
