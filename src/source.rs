//! Landmark sources.
//!
//! A source delivers one [`LandmarkFrame`] per captured video frame. The
//! [`ReplaySource`] plays back a recorded session from YAML, which stands in
//! for a live camera in the binary, tests and benchmarks.

use crate::{landmarks::RawHand, Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, path::Path};

/// Hands detected in one video frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time relative to the start of the session
    pub at_ms: u64,
    /// Zero or more hands
    #[serde(default)]
    pub hands: Vec<RawHand>,
    /// Set when the tracker failed on this frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Supplier of per-frame hand landmarks
pub trait LandmarkSource {
    /// Begin frame delivery
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` when the capture device or tracking
    /// library cannot be used.
    fn start(&mut self) -> Result<()>;

    /// Next frame; `None` once the source is exhausted or stopped
    fn next_frame(&mut self) -> Option<Result<LandmarkFrame>>;

    /// Halt delivery and release the device; safe to call repeatedly
    fn stop(&mut self);

    /// Human-readable source name
    fn name(&self) -> &str;
}

/// A recorded sequence of frames
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Frames in capture order
    pub frames: Vec<LandmarkFrame>,
}

impl Session {
    /// Load a session from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if it
    /// does not parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::IoError(format!("{}: {e}", path.display())))?;
        let session: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse session: {e}")))?;
        log::info!("Loaded {} frames from {}", session.frames.len(), path.display());
        Ok(session)
    }

    /// Save the session as YAML
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if serialization fails and `IoError` if the
    /// file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::InvalidInput(format!("Failed to serialize session: {e}")))?;
        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))
    }

    /// Capture time of the last frame
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.frames.last().map_or(0, |f| f.at_ms)
    }
}

/// Plays back a recorded session
pub struct ReplaySource {
    name: String,
    session: Session,
    pending: VecDeque<LandmarkFrame>,
    running: bool,
    unavailable: Option<String>,
}

impl ReplaySource {
    /// Replay an in-memory session
    #[must_use]
    pub fn new(name: impl Into<String>, session: Session) -> Self {
        Self {
            name: name.into(),
            session,
            pending: VecDeque::new(),
            running: false,
            unavailable: None,
        }
    }

    /// Replay a session file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self::new(path.display().to_string(), Session::from_file(path)?))
    }

    /// Source whose `start` always fails, as when the camera is denied
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut source = Self::new("unavailable", Session::default());
        source.unavailable = Some(reason.into());
        source
    }

    /// Whether frames are being delivered
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

impl LandmarkSource for ReplaySource {
    fn start(&mut self) -> Result<()> {
        if let Some(reason) = &self.unavailable {
            return Err(Error::SourceUnavailable(reason.clone()));
        }
        self.pending = self.session.frames.iter().cloned().collect();
        self.running = true;
        log::debug!("Replay source {} started with {} frames", self.name, self.pending.len());
        Ok(())
    }

    fn next_frame(&mut self) -> Option<Result<LandmarkFrame>> {
        if !self.running {
            return None;
        }
        let frame = self.pending.pop_front()?;
        Some(match &frame.error {
            Some(message) => Err(Error::SourceFrame(format!("frame at {} ms: {message}", frame.at_ms))),
            None => Ok(frame),
        })
    }

    fn stop(&mut self) {
        if self.running {
            log::debug!("Replay source {} stopped", self.name);
        }
        self.running = false;
        self.pending.clear();
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"
frames:
  - at_ms: 0
    hands: []
  - at_ms: 33
    error: "tracker crashed"
  - at_ms: 66
"#;

    #[test]
    fn test_session_parses_with_defaults() {
        let session: Session = serde_yaml::from_str(SESSION).unwrap();
        assert_eq!(session.frames.len(), 3);
        assert!(session.frames[2].hands.is_empty());
        assert_eq!(session.duration_ms(), 66);
    }

    #[test]
    fn test_replay_yields_frames_and_errors() {
        let session: Session = serde_yaml::from_str(SESSION).unwrap();
        let mut source = ReplaySource::new("test", session);
        assert!(source.next_frame().is_none());

        source.start().unwrap();
        assert!(matches!(source.next_frame(), Some(Ok(_))));
        assert!(matches!(source.next_frame(), Some(Err(Error::SourceFrame(_)))));
        assert!(matches!(source.next_frame(), Some(Ok(f)) if f.at_ms == 66));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut source = ReplaySource::new("test", serde_yaml::from_str(SESSION).unwrap());
        source.start().unwrap();
        source.stop();
        source.stop();
        assert!(!source.is_running());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_unavailable_source_fails_to_start() {
        let mut source = ReplaySource::unavailable("permission denied");
        assert!(matches!(source.start(), Err(Error::SourceUnavailable(_))));
    }
}
