//! # Text Layout
//!
//! Font loading and shaping, greedy word wrap, and the auto-fit policy that
//! shrinks a block until it fits its box.

pub mod font;
pub mod layout;
pub mod resolver;
pub mod shaping;

// Re-exports for convenience
pub use font::{OutlineFace, SizedFont, TextExtent, TextFont};
pub use layout::{auto_fit, wrap, FitPolicy, FittedText};
pub use resolver::{FontResolver, FontSet};
pub use shaping::{PlacedGlyph, Shaper};
