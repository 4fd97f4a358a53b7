use thiserror::Error;

/// Main error type for the ayah-reel library
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Surah catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Verse fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Frame rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Encoder error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors loading the local surah index
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Surah index not found: {path}")]
    NotFound { path: String },

    #[error("Surah index is not valid JSON: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Surah index contains no surahs: {path}")]
    Empty { path: String },
}

/// Errors talking to the verse-data endpoint
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Request to {url} returned status {status}")]
    BadStatus { url: String, status: u16 },

    #[error("Malformed payload from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },

    #[error("Verse has no audio URL for variant '{variant}'")]
    MissingAudio { variant: String },
}

/// Frame composition errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Font could not be loaded: {path} - {reason}")]
    FontLoad { path: String, reason: String },

    #[error("Layer '{layer}' failed: {reason}")]
    LayerFailed { layer: String, reason: String },

    #[error("Failed to save frame to {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Frame file is missing or empty: {path}")]
    EmptyFrame { path: String },
}

/// External encoder errors
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Encoder program not available: {program}")]
    Unavailable { program: String },

    #[error("Encoder step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Could not determine audio duration: {reason}")]
    ProbeFailed { reason: String },

    #[error("Encoder produced no output at {path}")]
    EmptyOutput { path: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ReelError
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the session can move on to the next verse after this error.
    ///
    /// Catalog and configuration problems are startup failures; everything
    /// else only costs the verse being processed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Catalog(_) | Self::Config(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::NotFound { path }) => {
                format!("Surah index '{}' not found. Point [catalog].path at a JSON array of surahs.", path)
            }
            Self::Catalog(CatalogError::ParseFailed { path, .. }) => {
                format!("Surah index '{}' is not valid JSON.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Encode(EncodeError::Unavailable { program }) => {
                format!("'{}' is not installed or not on PATH.", program)
            }
            _ => self.to_string(),
        }
    }
}
