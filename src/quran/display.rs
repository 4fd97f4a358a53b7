//! Resolution of the strings drawn on a frame.
//!
//! Every fallback lives here so the renderer never has to guess.
//!
//! | Field         | Precedence                                                                    |
//! |---------------|-------------------------------------------------------------------------------|
//! | `title`       | `surahNameArabicLong` → `surahNameArabic` → `سورة N`, then ` - <surahNameTranslation>` if present |
//! | `verse_label` | `Verse <ayahNo>` → `Verse ?`                                                  |
//! | `source_text` | `arabic1` → empty (block skipped)                                             |
//! | `translation` | `english` with `˹` `˺` removed → `Translation not available`                  |
//! | `footer`      | configured footer                                                             |
//!
//! Surah names come from the local index; the verse payload is only used
//! when the index record lacks them.

use crate::quran::types::{SurahRecord, VerseRecord};

pub const MISSING_TRANSLATION: &str = "Translation not available";

/// The five text blocks of a frame, top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub title: String,
    pub verse_label: String,
    pub source_text: String,
    pub translation: String,
    pub footer: String,
}

impl DisplayFields {
    pub fn resolve(surah: &SurahRecord, verse: &VerseRecord, footer: &str) -> Self {
        let arabic_name = first_present([
            surah.surah_name_arabic_long.as_deref(),
            surah.surah_name_arabic.as_deref(),
            verse.surah_name_arabic_long.as_deref(),
            verse.surah_name_arabic.as_deref(),
        ])
        .map(str::to_string)
        .unwrap_or_else(|| format!("سورة {}", number_or_unknown(surah.surah_no.or(verse.surah_no))));

        let title = match first_present([
            surah.surah_name_translation.as_deref(),
            verse.surah_name_translation.as_deref(),
        ]) {
            Some(translation) => format!("{} - {}", arabic_name, translation),
            None => arabic_name,
        };

        let translation = verse
            .english
            .as_deref()
            .map(|text| text.replace(['˹', '˺'], ""))
            .unwrap_or_else(|| MISSING_TRANSLATION.to_string());

        Self {
            title,
            verse_label: format!("Verse {}", number_or_unknown(verse.ayah_no)),
            source_text: verse.arabic1.clone().unwrap_or_default(),
            translation,
            footer: footer.to_string(),
        }
    }
}

/// Name used in log lines: English name → transliteration → translation → `Surah N`
pub fn surah_label(surah: &SurahRecord, index: usize) -> String {
    first_present([
        surah.surah_name_english.as_deref(),
        surah.surah_name.as_deref(),
        surah.surah_name_translation.as_deref(),
    ])
    .map(str::to_string)
    .unwrap_or_else(|| format!("Surah {}", index + 1))
}

fn first_present<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn number_or_unknown(number: Option<u32>) -> String {
    number.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string())
}
