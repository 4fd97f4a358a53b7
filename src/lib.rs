//! # Ayah-Reel
//!
//! Turn random Quranic verses into narrated still-image videos, one after
//! another, until interrupted.
//!
//! Each verse goes through the same pipeline: pick a surah and verse from
//! the local index, fetch the verse record, render a decorated frame with
//! the verse text and translation, download and clean up the recitation,
//! and mux frame and audio into an MP4 with an external encoder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ayah_reel::{
//!     composition::CompositionEngine,
//!     config::Config,
//!     media::FfmpegEncoder,
//!     quran::{QuranApiClient, SurahCatalog},
//!     session::{Session, ShutdownToken},
//!     text::FontSet,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let catalog = SurahCatalog::load(&config.catalog.path)?;
//!
//! let engine = CompositionEngine::new(
//!     config.clone(),
//!     FontSet::default(),
//!     QuranApiClient::new(&config.api)?,
//!     FfmpegEncoder::new(config.encoder.clone()),
//! );
//!
//! let report = Session::new(&catalog, &engine, ShutdownToken::new())
//!     .with_max_verses(Some(1))
//!     .run()
//!     .await;
//! println!("{} video(s) created", report.succeeded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`quran`] - Surah index, verse endpoint and display-string resolution
//! - [`text`] - Fonts, word wrap and auto-fit
//! - [`frame`] - Layered frame compositor
//! - [`media`] - Encoder wrapper, output naming and scratch files
//! - [`composition`] - Per-verse pipeline driver
//! - [`session`] - Verse selection loop and shutdown
//! - [`config`] - Configuration management
//!
//! ## Custom Layers
//!
//! The frame is built by [`Layer`](frame::Layer)s run over a shared canvas:
//!
//! ```rust,no_run
//! use ayah_reel::frame::{Canvas, Layer};
//! use ayah_reel::Result;
//! use rand::RngCore;
//!
//! struct Vignette;
//!
//! impl Layer for Vignette {
//!     fn name(&self) -> &str {
//!         "vignette"
//!     }
//!
//!     fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
//!         // Darken the canvas edges
//!         Ok(())
//!     }
//! }
//! ```

pub mod composition;
pub mod config;
pub mod error;
pub mod frame;
pub mod media;
pub mod quran;
pub mod session;
pub mod text;

// Re-export commonly used types for convenience
pub use crate::{
    composition::CompositionEngine,
    config::Config,
    error::{ReelError, Result},
    frame::{FrameCompositor, Layer},
    session::{Session, ShutdownToken},
};
