//! # Verse Data
//!
//! Everything that comes from outside the process about the Quran itself:
//! the local surah index, the remote verse endpoint, and the rules that turn
//! those records into the strings drawn on a frame.

pub mod catalog;
pub mod client;
pub mod display;
pub mod types;

// Re-exports for convenience
pub use catalog::SurahCatalog;
pub use client::{QuranApiClient, VerseSource};
pub use display::DisplayFields;
pub use types::{AudioVariant, SurahRecord, VerseRecord};
