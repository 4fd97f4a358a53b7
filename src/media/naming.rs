/// Stem used whenever the source text yields nothing usable
pub const FALLBACK_STEM: &str = "quran_verse";

const MAX_WORDS: usize = 3;
const MAX_CHARS: usize = 50;
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

/// Derive a filesystem-safe stem from verse text
///
/// Keeps at most the first three whitespace-separated words, strips
/// characters that are invalid in file names on common platforms and caps
/// the result at fifty characters.
pub fn sanitize_filename(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return FALLBACK_STEM.to_string();
    }

    let stem: String = words[..words.len().min(MAX_WORDS)]
        .join(" ")
        .chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_CHARS)
        .collect();

    let stem = stem.trim();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// `<stem>_S<surah>_V<ayah>.mp4`
pub fn output_file_name(source_text: &str, surah: u32, ayah: u32) -> String {
    format!("{}_S{}_V{}.mp4", sanitize_filename(source_text), surah, ayah)
}
