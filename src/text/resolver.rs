use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::FontConfig;
use crate::error::{FetchError, RenderError, Result};
use crate::text::font::TextFont;

/// Font files chosen for a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSet {
    /// Source-script (Arabic) face; `None` means the built-in fallback
    pub source: Option<PathBuf>,

    /// Translation-script face; defaults to the source face
    pub translation: Option<PathBuf>,
}

/// Picks font files from ordered candidate lists, downloading the
/// source-script face as a last resort
pub struct FontResolver {
    config: FontConfig,
    http: reqwest::Client,
}

impl FontResolver {
    pub fn new(config: FontConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub async fn resolve(&self) -> FontSet {
        let source = match first_existing(&self.config.source_candidates) {
            Some(path) => Some(path),
            None => {
                warn!("No source-script font found among {} candidates", self.config.source_candidates.len());
                match self.download_source().await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("Error downloading font: {}", e);
                        None
                    }
                }
            }
        };

        let translation = resolve_translation(&self.config.translation_candidates, source.as_deref());

        info!("Source font: {}", describe(source.as_deref()));
        info!("Translation font: {}", describe(translation.as_deref()));

        FontSet { source, translation }
    }

    async fn download_source(&self) -> Result<PathBuf> {
        let url = &self.config.source_download_url;
        info!("Downloading Arabic font from {}", url);

        let response = self.http.get(url).send().await.map_err(|e| FetchError::RequestFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(FetchError::BadStatus {
                url: url.clone(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::RequestFailed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        store_font(&self.config.download_path, &bytes)?;
        Ok(self.config.download_path.clone())
    }
}

/// First candidate that exists on disk
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

/// Translation face: first existing candidate, else the source face
pub fn resolve_translation(candidates: &[PathBuf], source: Option<&Path>) -> Option<PathBuf> {
    first_existing(candidates).or_else(|| {
        warn!("No English font found, using Arabic font for English text");
        source.map(Path::to_path_buf)
    })
}

/// Write downloaded font bytes, refusing anything that does not parse as a font
fn store_font(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let staging = path.with_extension("download");
    std::fs::write(&staging, bytes)?;

    if let Err(e) = TextFont::load(&staging) {
        let _ = std::fs::remove_file(&staging);
        return Err(RenderError::FontLoad {
            path: path.display().to_string(),
            reason: format!("downloaded file is not a usable font ({})", e),
        }
        .into());
    }

    std::fs::rename(&staging, path)?;
    Ok(())
}

fn describe(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in fallback".to_string())
}
