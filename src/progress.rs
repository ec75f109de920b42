//! Per-frame scan observation.
//!
//! A [`ScanProgress`] implementation receives a [`FrameScore`] snapshot for
//! scored frames while [`detect_boundaries`](crate::detect_boundaries) runs.
//! The command-line tool uses this for its `--verbose` trace and its
//! progress bar.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shotsegments::{FrameScore, ScanOptions, ScanProgress, ShotError, VideoSource};
//!
//! struct PrintCuts;
//!
//! impl ScanProgress for PrintCuts {
//!     fn on_frame(&self, frame: &FrameScore) {
//!         if frame.is_cut {
//!             println!("cut at frame {} (score {})", frame.frame_number, frame.score);
//!         }
//!     }
//! }
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! let options = ScanOptions::new().with_progress(Arc::new(PrintCuts));
//! let boundaries = source.detect_boundaries(&options)?;
//! # Ok::<(), ShotError>(())
//! ```

/// Scoring outcome for one frame.
///
/// Delivered to [`ScanProgress::on_frame`] at a cadence controlled by
/// [`ScanOptions::with_batch_size`](crate::ScanOptions::with_batch_size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameScore {
    /// Index of the scored frame in playback order (0-based).
    pub frame_number: u64,
    /// Mean absolute difference against the previous frame.
    pub score: u32,
    /// Absolute change of `score` relative to the previous frame's score.
    pub delta: u32,
    /// Whether this frame was recorded as a shot boundary.
    pub is_cut: bool,
}

/// Trait for observing a boundary scan.
///
/// Implementations must be [`Send`] and [`Sync`] so a single observer can be
/// shared through an `Arc` between the caller and the scan options.
///
/// Observers are infallible; they see every reported frame but cannot stop
/// the scan.
pub trait ScanProgress: Send + Sync {
    /// Called for reported frames during a scan.
    fn on_frame(&self, frame: &FrameScore);
}

/// Discards all notifications. This is the default observer.
pub(crate) struct NoOpProgress;

impl ScanProgress for NoOpProgress {
    fn on_frame(&self, _frame: &FrameScore) {}
}
