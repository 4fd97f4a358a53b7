//! Audio processing, muxing and output naming
//!
//! The external encoder is reached only through [`MediaEncoder`], so the
//! pipeline can be driven without ffmpeg installed.

pub mod encoder;
pub mod naming;
pub mod workspace;

pub use encoder::{FfmpegEncoder, MediaEncoder, MuxJob, MuxMode};
pub use naming::{output_file_name, sanitize_filename};
pub use workspace::{TempFiles, WorkPaths};
