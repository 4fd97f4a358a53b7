//! # Frame Composition
//!
//! Builds the still image shown for a verse by running a stack of
//! [`Layer`]s over a shared canvas:
//!
//! - **Backdrop**: vertical gradient, light particles, faint rays, blur and contrast
//! - **Border**: double frame with ringed corners and edge ornaments
//! - **Text**: auto-fitted, centred blocks with a drop shadow
//! - **Glow**: blurred halo around every drawn glyph
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ayah_reel::config::RenderConfig;
//! use ayah_reel::frame::{FrameCompositor, RenderSpec};
//!
//! let compositor = FrameCompositor::new(RenderConfig::default());
//! let frame = compositor.compose(&RenderSpec::default(), &mut rand::thread_rng()).unwrap();
//! frame.save_png("frame.png").unwrap();
//! ```

pub mod background;
pub mod border;
pub mod compositor;
pub mod glow;
pub mod text;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use compositor::FrameCompositor;
pub use traits::Layer;
pub use types::{Canvas, Frame, RenderSpec, TextBlock};
