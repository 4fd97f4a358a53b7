use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::task;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{EncodeError, FetchError, ReelError, RenderError, Result},
    frame::{FrameCompositor, RenderSpec},
    media::{output_file_name, MediaEncoder, MuxJob, MuxMode, TempFiles, WorkPaths},
    quran::{DisplayFields, SurahRecord, VerseRecord, VerseSource},
    text::FontSet,
};

/// A finished video for one verse
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedVideo {
    pub path: PathBuf,

    /// Seconds of audio the video was cut to
    pub duration: f64,

    pub file_size: u64,
    pub elapsed: Duration,
}

/// Drives one verse from record to MP4
///
/// The engine follows a clear pipeline:
/// 1. Display Fields - Resolve every string drawn on the frame
/// 2. Frame Rendering - Compose the still image and verify it on disk
/// 3. Audio Download - Fetch the narration for the configured variant
/// 4. Audio Enhancement - Clean up the audio, or copy it unchanged
/// 5. Duration Probe - Measure the audio, or fall back to a default
/// 6. Video Mux - Combine frame and audio, retrying once with fewer options
/// 7. Output Naming - Build the file name from the verse text
/// 8. Cleanup - Remove every scratch file, whatever happened
pub struct CompositionEngine<S, E> {
    config: Config,
    fonts: FontSet,
    source: S,
    encoder: E,
    compositor: FrameCompositor,
    paths: WorkPaths,
}

impl<S: VerseSource, E: MediaEncoder> CompositionEngine<S, E> {
    pub fn new(config: Config, fonts: FontSet, source: S, encoder: E) -> Self {
        let compositor = FrameCompositor::new(config.render.clone());
        let paths = WorkPaths::new(&config.paths);
        Self {
            config,
            fonts,
            source,
            encoder,
            compositor,
            paths,
        }
    }

    pub fn paths(&self) -> &WorkPaths {
        &self.paths
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Fetch the record for one verse of `surah`
    pub async fn fetch_verse(&self, surah: &SurahRecord, ayah: u32) -> Result<VerseRecord> {
        self.source.fetch_verse(surah.number(), ayah).await
    }

    /// Run the whole pipeline for a fetched verse
    ///
    /// Scratch files, the in-progress video included, are removed on every
    /// exit path. The video only reaches the output directory once it has
    /// been muxed and checked, so a failed verse leaves it untouched.
    pub async fn produce(&self, surah: &SurahRecord, ayah: u32, verse: &VerseRecord) -> Result<ProducedVideo> {
        let started = Instant::now();
        self.paths.ensure_dirs()?;
        let _cleanup = TempFiles::new(self.paths.scratch_files());

        // Pipeline Step 1: Display Fields
        let fields = DisplayFields::resolve(surah, verse, &self.config.render.footer);
        debug!("Title: {} / {}", fields.title, fields.verse_label);

        // Pipeline Step 2: Frame Rendering
        self.render_frame(&fields).await?;

        // Pipeline Step 3: Audio Download
        self.download_audio(verse).await?;

        // Pipeline Step 4: Audio Enhancement
        self.enhance_audio().await?;

        // Pipeline Step 5: Duration Probe
        let duration = self.probe_duration().await;

        // Pipeline Step 6: Video Mux, into scratch space first
        let job = MuxJob {
            image: self.paths.frame.clone(),
            audio: self.paths.enhanced_audio.clone(),
            duration,
            output: self.paths.video.clone(),
        };
        let file_size = self.mux_video(&job).await?;

        // Pipeline Step 7: Output Naming
        let surah_no = verse.surah_no.unwrap_or_else(|| surah.number());
        let ayah_no = verse.ayah_no.unwrap_or(ayah);
        let output = self
            .paths
            .publish(&output_file_name(&fields.source_text, surah_no, ayah_no))?;

        let elapsed = started.elapsed();
        info!("Video successfully created at {}", output.display());
        info!("Time taken: {:.2} seconds", elapsed.as_secs_f64());

        // Pipeline Step 8 happens when `_cleanup` drops
        Ok(ProducedVideo {
            path: output,
            duration,
            file_size,
            elapsed,
        })
    }

    // ==========================================
    // PIPELINE STEP 2: FRAME RENDERING
    // ==========================================

    async fn render_frame(&self, fields: &DisplayFields) -> Result<()> {
        info!("🖼️  Rendering frame...");

        let spec = RenderSpec::for_verse(fields, &self.fonts, self.compositor.config());
        let compositor = self.compositor.clone();
        let path = self.paths.frame.clone();

        task::spawn_blocking(move || {
            let mut rng = rand::thread_rng();
            compositor.compose_to_file(&spec, &path, &mut rng).map(|_| ())
        })
        .await
        .map_err(|e| ReelError::generic(format!("Frame render task failed: {}", e)))??;

        let size = file_size(&self.paths.frame);
        if size == 0 {
            return Err(RenderError::EmptyFrame {
                path: self.paths.frame.display().to_string(),
            }
            .into());
        }

        info!("Frame successfully saved to {} ({} bytes)", self.paths.frame.display(), size);
        Ok(())
    }

    // ==========================================
    // PIPELINE STEP 3: AUDIO DOWNLOAD
    // ==========================================

    async fn download_audio(&self, verse: &VerseRecord) -> Result<()> {
        let variant = &self.config.api.audio_variant;
        let url = verse.audio_url(variant).ok_or_else(|| FetchError::MissingAudio {
            variant: variant.clone(),
        })?;

        info!("🎵 Downloading audio...");
        let bytes = self.source.fetch_audio(url).await?;
        tokio::fs::write(&self.paths.raw_audio, &bytes).await?;

        debug!("Wrote {} bytes of audio to {}", bytes.len(), self.paths.raw_audio.display());
        Ok(())
    }

    // ==========================================
    // PIPELINE STEP 4: AUDIO ENHANCEMENT
    // ==========================================

    async fn enhance_audio(&self) -> Result<()> {
        let (raw, enhanced) = (&self.paths.raw_audio, &self.paths.enhanced_audio);

        if !self.encoder.is_available().await {
            warn!("Warning: Encoder not found, using original audio");
            tokio::fs::copy(raw, enhanced).await?;
            return Ok(());
        }

        if let Err(e) = self.encoder.enhance_audio(raw, enhanced).await {
            warn!("Error enhancing audio: {}; using original audio", e);
            tokio::fs::copy(raw, enhanced).await?;
        }
        Ok(())
    }

    // ==========================================
    // PIPELINE STEP 5: DURATION PROBE
    // ==========================================

    async fn probe_duration(&self) -> f64 {
        match self.encoder.probe_duration(&self.paths.enhanced_audio).await {
            Ok(duration) => {
                debug!("Audio duration: {:.2}s", duration);
                duration
            }
            Err(e) => {
                let fallback = self.config.encoder.default_duration;
                warn!("Error getting audio duration: {}; using {:.1}s", e, fallback);
                fallback
            }
        }
    }

    // ==========================================
    // PIPELINE STEP 6: VIDEO MUX
    // ==========================================

    /// Full option set first; on a failed exit or a missing/empty file,
    /// one retry with the simple option set.
    async fn mux_video(&self, job: &MuxJob) -> Result<u64> {
        info!("🎬 Creating video...");

        match self.try_mux(job, MuxMode::Full).await {
            Ok(size) => return Ok(size),
            Err(e) => warn!("Error creating video: {}", e),
        }

        info!("Retrying with simpler encoder command...");
        self.try_mux(job, MuxMode::Simple).await
    }

    async fn try_mux(&self, job: &MuxJob, mode: MuxMode) -> Result<u64> {
        self.encoder.mux(job, mode).await?;

        let size = file_size(&job.output);
        if size == 0 {
            return Err(EncodeError::EmptyOutput {
                path: job.output.display().to_string(),
            }
            .into());
        }
        Ok(size)
    }
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
