use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::quran::types::SurahRecord;

/// Read-only index of every surah, loaded once at startup
#[derive(Debug, Clone)]
pub struct SurahCatalog {
    surahs: Vec<SurahRecord>,
}

impl SurahCatalog {
    /// Build a catalog from records, numbering any that lack `surahNo` by position
    pub fn new(mut surahs: Vec<SurahRecord>) -> Self {
        for (index, surah) in surahs.iter_mut().enumerate() {
            surah.surah_no.get_or_insert(index as u32 + 1);
        }
        Self { surahs }
    }

    /// Load the JSON array at `path`.
    ///
    /// Missing file, invalid JSON, or an empty array are all fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let bytes = std::fs::read(path).map_err(|_| CatalogError::NotFound { path: path_str.clone() })?;
        let text = decode_text(&bytes, &path_str);

        let surahs: Vec<SurahRecord> = serde_json::from_str(&text).map_err(|e| CatalogError::ParseFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        if surahs.is_empty() {
            return Err(CatalogError::Empty { path: path_str }.into());
        }

        debug!("Loaded {} surahs from {}", surahs.len(), path_str);
        Ok(Self::new(surahs))
    }

    pub fn get(&self, index: usize) -> Option<&SurahRecord> {
        self.surahs.get(index)
    }

    pub fn len(&self) -> usize {
        self.surahs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surahs.is_empty()
    }
}

/// UTF-8 first; anything else is read as Latin-1
fn decode_text(bytes: &[u8], path: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(_) => {
            warn!("{} is not valid UTF-8, decoding as Latin-1", path);
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
