//! # Composition Engine
//!
//! The composition engine takes one fetched verse through frame rendering,
//! audio processing and muxing to a finished video file.

pub mod engine;

// Re-exports for convenience
pub use engine::{CompositionEngine, ProducedVideo};
