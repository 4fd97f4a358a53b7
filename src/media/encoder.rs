use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tokio::task;
use tracing::debug;

use crate::config::EncoderConfig;
use crate::error::{EncodeError, Result};

/// A still image plus processed audio to be combined into a video
#[derive(Debug, Clone, PartialEq)]
pub struct MuxJob {
    pub image: PathBuf,
    pub audio: PathBuf,

    /// Length of the output video in seconds
    pub duration: f64,

    pub output: PathBuf,
}

/// Option set used for the mux
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxMode {
    /// Still-image tuning, explicit CRF and pixel format
    Full,

    /// Codec choice and bit rate only, for the single retry
    Simple,
}

/// The external audio/video encoder, seen as a black box
#[allow(async_fn_in_trait)]
pub trait MediaEncoder {
    /// Whether the encoder binary can be run at all
    async fn is_available(&self) -> bool;

    /// Normalise loudness and band-limit `input` into `output`
    async fn enhance_audio(&self, input: &Path, output: &Path) -> Result<()>;

    /// Duration of an audio file in seconds
    async fn probe_duration(&self, path: &Path) -> Result<f64>;

    /// Combine a still image and an audio track into `job.output`
    async fn mux(&self, job: &MuxJob, mode: MuxMode) -> Result<()>;
}

/// [`MediaEncoder`] driving the `ffmpeg` and `ffprobe` command-line tools
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    fn command(&self, program: &str, args: Vec<String>) -> Command {
        debug!("Running {} {}", program, args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        cmd
    }

    async fn run(&self, step: &str, mut cmd: Command) -> Result<Output> {
        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| EncodeError::StepFailed {
                step: step.to_string(),
                reason: format!("Failed to spawn encoder process: {}", e),
            })?
            .map_err(|e| EncodeError::StepFailed {
                step: step.to_string(),
                reason: format!("Encoder execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncodeError::StepFailed {
                step: step.to_string(),
                reason: format!("{} - {}", output.status, last_lines(&stderr, 5)),
            }
            .into());
        }

        Ok(output)
    }
}

impl MediaEncoder for FfmpegEncoder {
    async fn is_available(&self) -> bool {
        let cmd = self.command(&self.config.ffmpeg, vec!["-version".to_string()]);
        self.run("version probe", cmd).await.is_ok()
    }

    async fn enhance_audio(&self, input: &Path, output: &Path) -> Result<()> {
        let cmd = self.command(&self.config.ffmpeg, enhance_args(&self.config, input, output));
        self.run("audio enhance", cmd).await.map(|_| ())
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64> {
        let cmd = self.command(&self.config.ffprobe, probe_args(path));
        let output = self.run("duration probe", cmd).await.map_err(|e| EncodeError::ProbeFailed {
            reason: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration(&stdout).ok_or_else(|| {
            EncodeError::ProbeFailed {
                reason: format!("unexpected ffprobe output: {:?}", stdout.trim()),
            }
            .into()
        })
    }

    async fn mux(&self, job: &MuxJob, mode: MuxMode) -> Result<()> {
        let cmd = self.command(&self.config.ffmpeg, mux_args(&self.config, job, mode));
        self.run("video mux", cmd).await.map(|_| ())
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Arguments of the audio cleanup pass
pub fn enhance_args(config: &EncoderConfig, input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-af".to_string(),
        config.audio_filter.clone(),
        "-b:a".to_string(),
        config.enhanced_bitrate.clone(),
        path_arg(output),
    ]
}

/// Arguments of the ffprobe duration query
pub fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(path),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-v".to_string(),
        "quiet".to_string(),
        "-of".to_string(),
        "csv=p=0".to_string(),
    ]
}

/// Arguments of the still-image + audio mux
pub fn mux_args(config: &EncoderConfig, job: &MuxJob, mode: MuxMode) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-loop".into(),
        "1".into(),
        "-i".into(),
        path_arg(&job.image),
        "-i".into(),
        path_arg(&job.audio),
        "-c:v".into(),
        "libx264".into(),
    ];

    if mode == MuxMode::Full {
        args.extend(["-tune".into(), "stillimage".into(), "-crf".into(), config.crf.to_string()]);
    }

    args.extend(["-c:a".into(), "aac".into(), "-b:a".into(), config.mux_audio_bitrate.clone()]);

    if mode == MuxMode::Full {
        args.extend(["-pix_fmt".into(), "yuv420p".into()]);
    }

    args.extend([
        "-t".into(),
        format!("{:.3}", job.duration),
        "-shortest".into(),
        path_arg(&job.output),
    ]);
    args
}

/// Parse ffprobe's `csv=p=0` duration output
pub fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(count)..].join(" | ")
}
