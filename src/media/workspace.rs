use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::PathsConfig;
use crate::error::Result;

/// Fixed per-verse scratch locations under the temp directory
///
/// Each verse reuses the same names, so only one verse may be in flight
/// per temp directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPaths {
    pub frame: PathBuf,
    pub raw_audio: PathBuf,
    pub enhanced_audio: PathBuf,

    /// Mux target; moved into `output_dir` once it checks out
    pub video: PathBuf,

    pub output_dir: PathBuf,
}

impl WorkPaths {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            frame: paths.temp_dir.join("frames").join("frame.png"),
            raw_audio: paths.temp_dir.join("audio_raw.mp3"),
            enhanced_audio: paths.temp_dir.join("audio_enhanced.mp3"),
            video: paths.temp_dir.join("video.mp4"),
            output_dir: paths.output_dir.clone(),
        }
    }

    /// Create the frame and output directories if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.frame.parent(), self.raw_audio.parent(), Some(self.output_dir.as_path())]
            .into_iter()
            .flatten()
        {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Everything that must not outlive a verse
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        vec![
            self.frame.clone(),
            self.raw_audio.clone(),
            self.enhanced_audio.clone(),
            self.video.clone(),
        ]
    }

    /// Move the finished scratch video to `output_dir/name`, replacing any
    /// earlier video of the same name
    pub fn publish(&self, name: &str) -> Result<PathBuf> {
        let target = self.output_dir.join(name);
        if let Err(e) = fs::rename(&self.video, &target) {
            // Temp and output may sit on different filesystems
            debug!("Rename into {} failed ({}), copying instead", target.display(), e);
            fs::copy(&self.video, &target)?;
            remove_quietly(&self.video);
        }
        Ok(target)
    }
}

/// Removes the listed files when dropped, whatever the outcome of the verse
#[derive(Debug)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            remove_quietly(path);
        }
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Warning: Could not delete temporary file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths_in(dir: &Path) -> WorkPaths {
        WorkPaths::new(&PathsConfig {
            temp_dir: dir.join("temp"),
            output_dir: dir.join("output"),
        })
    }

    #[test]
    fn test_layout() {
        let paths = WorkPaths::new(&PathsConfig::default());
        assert_eq!(paths.frame, PathBuf::from("temp/frames/frame.png"));
        assert_eq!(paths.raw_audio, PathBuf::from("temp/audio_raw.mp3"));
        assert_eq!(paths.enhanced_audio, PathBuf::from("temp/audio_enhanced.mp3"));
        assert_eq!(paths.video, PathBuf::from("temp/video.mp4"));
        assert_eq!(paths.scratch_files().len(), 4);
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        paths.ensure_dirs().unwrap();
        assert!(dir.path().join("temp/frames").is_dir());
        assert!(dir.path().join("output").is_dir());
    }

    #[test]
    fn test_guard_removes_existing_and_ignores_missing() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        paths.ensure_dirs().unwrap();
        fs::write(&paths.frame, b"png").unwrap();
        fs::write(&paths.raw_audio, b"mp3").unwrap();

        {
            let guard = TempFiles::new(paths.scratch_files());
            assert_eq!(guard.paths().len(), 4);
        }

        assert!(!paths.frame.exists());
        assert!(!paths.raw_audio.exists());
        assert!(!paths.enhanced_audio.exists());
    }

    #[test]
    fn test_publish_moves_video_and_replaces_same_name() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        paths.ensure_dirs().unwrap();
        fs::write(paths.output_dir.join("verse_S1_V1.mp4"), b"old").unwrap();
        fs::write(&paths.video, b"new").unwrap();

        let published = paths.publish("verse_S1_V1.mp4").unwrap();

        assert_eq!(published, paths.output_dir.join("verse_S1_V1.mp4"));
        assert_eq!(fs::read(&published).unwrap(), b"new");
        assert!(!paths.video.exists());
    }

    #[test]
    fn test_publish_without_video_fails() {
        let dir = tempdir().unwrap();
        let paths = paths_in(dir.path());
        paths.ensure_dirs().unwrap();

        assert!(paths.publish("missing.mp4").is_err());
        assert_eq!(fs::read_dir(&paths.output_dir).unwrap().count(), 0);
    }
}
