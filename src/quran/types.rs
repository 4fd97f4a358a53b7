use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One chapter of the local surah index
///
/// Every field is optional on the wire; the catalog fills in `surah_no`
/// from the record's position when the index omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahRecord {
    #[serde(default)]
    pub surah_no: Option<u32>,

    #[serde(default)]
    pub surah_name: Option<String>,

    #[serde(default)]
    pub surah_name_english: Option<String>,

    #[serde(default)]
    pub surah_name_arabic: Option<String>,

    #[serde(default)]
    pub surah_name_arabic_long: Option<String>,

    #[serde(default)]
    pub surah_name_translation: Option<String>,

    #[serde(default)]
    pub revelation_place: Option<String>,

    #[serde(default)]
    pub total_ayah: Option<u32>,
}

impl SurahRecord {
    /// Chapter number, 0 when the record was never numbered
    pub fn number(&self) -> u32 {
        self.surah_no.unwrap_or_default()
    }

    /// Number of verses; a missing count is treated as a single verse
    pub fn total_ayah(&self) -> u32 {
        self.total_ayah.unwrap_or(1).max(1)
    }
}

/// One bit-rate variant of the narration audio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioVariant {
    #[serde(default)]
    pub reciter: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub original_url: Option<String>,
}

/// A single verse as returned by `GET /api/{surah}/{ayah}.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    #[serde(default)]
    pub surah_no: Option<u32>,

    #[serde(default)]
    pub ayah_no: Option<u32>,

    #[serde(default)]
    pub surah_name: Option<String>,

    #[serde(default)]
    pub surah_name_arabic: Option<String>,

    #[serde(default)]
    pub surah_name_arabic_long: Option<String>,

    #[serde(default)]
    pub surah_name_translation: Option<String>,

    #[serde(default)]
    pub arabic1: Option<String>,

    #[serde(default)]
    pub arabic2: Option<String>,

    #[serde(default)]
    pub english: Option<String>,

    /// Bit-rate variant key ("1", "2", ...) to audio location
    #[serde(default)]
    pub audio: HashMap<String, AudioVariant>,
}

impl VerseRecord {
    /// Audio URL of the requested variant, if the payload carries a non-empty one
    pub fn audio_url(&self, variant: &str) -> Option<&str> {
        self.audio
            .get(variant)
            .and_then(|v| v.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_payload_parses() {
        let json = r#"{
            "surahName": "Al-Faatiha",
            "surahNo": 1,
            "ayahNo": 1,
            "arabic1": "بِسْمِ ٱللَّهِ",
            "english": "In the name of Allah",
            "audio": {
                "1": {"reciter": "Mishary", "url": "https://example.org/1.mp3", "originalUrl": "x"},
                "2": {"reciter": "Abu Bakr", "url": "https://example.org/1_1.mp3"}
            },
            "bengali": "ignored"
        }"#;

        let verse: VerseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(verse.surah_no, Some(1));
        assert_eq!(verse.ayah_no, Some(1));
        assert_eq!(verse.audio_url("2"), Some("https://example.org/1_1.mp3"));
        assert_eq!(verse.audio_url("3"), None);
    }

    #[test]
    fn test_blank_audio_url_is_absent() {
        let mut verse = VerseRecord::default();
        verse.audio.insert(
            "2".into(),
            AudioVariant {
                url: Some("  ".into()),
                ..Default::default()
            },
        );
        assert_eq!(verse.audio_url("2"), None);
    }

    #[test]
    fn test_surah_defaults() {
        let surah: SurahRecord = serde_json::from_str(r#"{"surahName": "Al-Ikhlaas"}"#).unwrap();
        assert_eq!(surah.number(), 0);
        assert_eq!(surah.total_ayah(), 1);
    }
}
