use std::time::Duration;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use crate::composition::{CompositionEngine, ProducedVideo};
use crate::error::{ReelError, Result};
use crate::media::MediaEncoder;
use crate::quran::display::surah_label;
use crate::quran::{SurahCatalog, VerseSource};
use crate::session::selector::pick_verse;
use crate::session::shutdown::{SessionState, ShutdownToken};

/// Totals for a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub attempted: u32,
    pub succeeded: u32,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl SessionReport {
    pub fn failed(&self) -> u32 {
        self.attempted - self.succeeded
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// The verse loop: pick, fetch, produce, pause, until told to stop
pub struct Session<'a, S, E> {
    catalog: &'a SurahCatalog,
    engine: &'a CompositionEngine<S, E>,
    shutdown: ShutdownToken,
    pause: Duration,
    max_verses: Option<u32>,
    rng: StdRng,
}

impl<'a, S: VerseSource, E: MediaEncoder> Session<'a, S, E> {
    pub fn new(catalog: &'a SurahCatalog, engine: &'a CompositionEngine<S, E>, shutdown: ShutdownToken) -> Self {
        Self {
            catalog,
            engine,
            shutdown,
            pause: Duration::from_secs(5),
            max_verses: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Stop after this many attempts, successful or not
    pub fn with_max_verses(mut self, max_verses: Option<u32>) -> Self {
        self.max_verses = max_verses;
        self
    }

    /// Make verse selection reproducible
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self
    }

    /// Run until a stop is requested or the attempt limit is reached.
    ///
    /// The stop flag is only read between verses, so a verse in flight
    /// always runs to completion. A failure that is not recoverable moves
    /// the session to stopping as if a stop had been requested.
    pub async fn run(mut self) -> SessionReport {
        let started_at = Local::now();
        let mut attempted = 0u32;
        let mut succeeded = 0u32;

        while self.shutdown.state() == SessionState::Running && !self.limit_reached(attempted) {
            attempted += 1;
            info!("===== Starting video #{} =====", succeeded + 1);

            match self.run_once().await {
                Ok(video) => {
                    succeeded += 1;
                    info!("✨ Video created successfully: {} ({} bytes)", video.path.display(), video.file_size);
                    info!("Total videos created: {}", succeeded);
                }
                Err(e) if e.is_recoverable() => error!("Failed to create video: {}", e.user_message()),
                Err(e) => {
                    error!("Stopping session: {}", e.user_message());
                    self.shutdown.request_stop();
                }
            }

            if self.shutdown.state() == SessionState::Stopping || self.limit_reached(attempted) {
                break;
            }

            info!("Waiting {} seconds before starting next video...", self.pause.as_secs());
            self.shutdown.pause(self.pause).await;
        }

        let report = SessionReport {
            attempted,
            succeeded,
            started_at,
            finished_at: Local::now(),
        };
        info!("Program completed. Total videos created: {}", report.succeeded);
        report
    }

    fn limit_reached(&self, attempted: u32) -> bool {
        self.max_verses.is_some_and(|max| attempted >= max)
    }

    async fn run_once(&mut self) -> Result<ProducedVideo> {
        let choice = pick_verse(self.catalog, &mut self.rng)
            .ok_or_else(|| ReelError::generic("surah catalog is empty"))?;

        let verse = self.engine.fetch_verse(choice.surah, choice.ayah).await?;

        info!(
            "Creating video for Surah {} verse {}...",
            surah_label(choice.surah, choice.index),
            choice.ayah
        );
        self.engine.produce(choice.surah, choice.ayah, &verse).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::engine::tests::{opening_surah, opening_verse, test_config, FakeEncoder, FakeSource};
    use crate::error::{ConfigError, FetchError};
    use crate::quran::VerseRecord;
    use crate::text::FontSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Requests a stop while the `stop_on`-th verse is being fetched
    struct InterruptingSource {
        verse: VerseRecord,
        token: ShutdownToken,
        stop_on: usize,
        fetches: AtomicUsize,
    }

    impl VerseSource for InterruptingSource {
        async fn fetch_verse(&self, _surah: u32, _ayah: u32) -> Result<VerseRecord> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.stop_on {
                self.token.request_stop();
            }
            Ok(self.verse.clone())
        }

        async fn fetch_audio(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(b"recitation".to_vec())
        }
    }

    /// Every verse fetch fails
    struct OfflineSource;

    impl VerseSource for OfflineSource {
        async fn fetch_verse(&self, surah: u32, ayah: u32) -> Result<VerseRecord> {
            Err(FetchError::RequestFailed {
                url: format!("https://example.org/api/{}/{}.json", surah, ayah),
                reason: "offline".into(),
            }
            .into())
        }

        async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>> {
            Err(FetchError::RequestFailed {
                url: url.to_string(),
                reason: "offline".into(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_interrupt_finishes_current_verse() {
        let dir = tempdir().unwrap();
        let token = ShutdownToken::new();
        let source = InterruptingSource {
            verse: opening_verse(true),
            token: token.clone(),
            stop_on: 2,
            fetches: AtomicUsize::new(0),
        };
        let engine = CompositionEngine::new(test_config(dir.path()), FontSet::default(), source, FakeEncoder::working());
        let catalog = SurahCatalog::new(vec![opening_surah()]);

        let report = Session::new(&catalog, &engine, token.clone())
            .with_pause(Duration::ZERO)
            .with_seed(Some(11))
            .run()
            .await;

        // The verse in flight when the stop arrived still completed
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(engine.encoder().mux_modes().len(), 2);
        assert!(report.finished_at >= report.started_at);
    }

    #[tokio::test]
    async fn test_stop_before_start_runs_nothing() {
        let dir = tempdir().unwrap();
        let token = ShutdownToken::new();
        token.request_stop();

        let engine = CompositionEngine::new(
            test_config(dir.path()),
            FontSet::default(),
            FakeSource::default(),
            FakeEncoder::working(),
        );
        let catalog = SurahCatalog::new(vec![opening_surah()]);

        let report = Session::new(&catalog, &engine, token).run().await;
        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let dir = tempdir().unwrap();
        let engine = CompositionEngine::new(test_config(dir.path()), FontSet::default(), OfflineSource, FakeEncoder::working());
        let catalog = SurahCatalog::new(vec![opening_surah()]);

        let report = Session::new(&catalog, &engine, ShutdownToken::new())
            .with_pause(Duration::ZERO)
            .with_max_verses(Some(3))
            .run()
            .await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed(), 3);
    }

    #[tokio::test]
    async fn test_max_verses_counts_successes() {
        let dir = tempdir().unwrap();
        let engine = CompositionEngine::new(
            test_config(dir.path()),
            FontSet::default(),
            FakeSource {
                verse: opening_verse(true),
                ..Default::default()
            },
            FakeEncoder::working(),
        );
        let catalog = SurahCatalog::new(vec![opening_surah()]);

        let report = Session::new(&catalog, &engine, ShutdownToken::new())
            .with_pause(Duration::ZERO)
            .with_max_verses(Some(2))
            .with_seed(Some(5))
            .run()
            .await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(engine.encoder().mux_modes().len(), 2);
    }

    /// Verse fetches fail with an error no later verse can recover from
    struct MisconfiguredSource {
        fetches: AtomicUsize,
    }

    impl VerseSource for MisconfiguredSource {
        async fn fetch_verse(&self, _surah: u32, _ayah: u32) -> Result<VerseRecord> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Err(ConfigError::InvalidValue {
                key: "api.base_url".into(),
                value: "not a url".into(),
            }
            .into())
        }

        async fn fetch_audio(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_unrecoverable_failure_stops_session() {
        let dir = tempdir().unwrap();
        let source = MisconfiguredSource {
            fetches: AtomicUsize::new(0),
        };
        let engine = CompositionEngine::new(test_config(dir.path()), FontSet::default(), source, FakeEncoder::working());
        let catalog = SurahCatalog::new(vec![opening_surah()]);
        let token = ShutdownToken::new();

        let report = Session::new(&catalog, &engine, token.clone())
            .with_pause(Duration::ZERO)
            .with_max_verses(Some(3))
            .run()
            .await;

        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(token.state(), SessionState::Stopping);
    }
}
