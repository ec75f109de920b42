//! Scan and report configuration.
//!
//! [`ScanOptions`] carries the detection threshold, image-export settings and
//! the progress observer into [`detect_boundaries`](crate::detect_boundaries).
//! [`ReportOptions`] carries the minimum segment duration and output format
//! into [`SegmentReporter`](crate::SegmentReporter).
//!
//! # Example
//!
//! ```
//! use shotsegments::{ReportFormat, ReportOptions, ScanOptions};
//!
//! let scan = ScanOptions::new().with_threshold(40).with_save_images(true);
//! let report = ReportOptions::new()
//!     .with_min_duration(250)
//!     .with_format(ReportFormat::Ffmpeg);
//! assert_eq!(scan.threshold(), 40);
//! assert_eq!(report.min_duration(), 250);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ffmpeg_next::format::Pixel;

use crate::progress::{NoOpProgress, ScanProgress};

/// Default per-pixel mean difference (and delta) a frame must exceed to count
/// as a cut.
pub const DEFAULT_THRESHOLD: u32 = 50;

/// Default minimum segment length, in frames, for a segment to be reported.
pub const DEFAULT_MIN_DURATION: u64 = 1000;

/// Pixel format frames are decoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGB (24 bpp). Boundary scans decode this and score its luma.
    Rgb8,
    /// 8-bit grayscale (8 bpp), the source's own luma plane. This is the default.
    #[default]
    Gray8,
}

impl PixelFormat {
    /// Map to the corresponding FFmpeg pixel format constant.
    pub(crate) fn to_ffmpeg_pixel(self) -> Pixel {
        match self {
            PixelFormat::Rgb8 => Pixel::RGB24,
            PixelFormat::Gray8 => Pixel::GRAY8,
        }
    }

    pub(crate) fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Settings for a boundary scan.
///
/// All fields have defaults matching the command-line tool: threshold 50,
/// no image export, images written to the current directory.
#[derive(Clone)]
pub struct ScanOptions {
    pub(crate) threshold: u32,
    pub(crate) save_images: bool,
    pub(crate) image_directory: PathBuf,
    /// Progress observer. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ScanProgress>,
    /// Report every N-th scored frame to the observer.
    pub(crate) batch_size: u64,
}

impl Debug for ScanOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ScanOptions")
            .field("threshold", &self.threshold)
            .field("save_images", &self.save_images)
            .field("image_directory", &self.image_directory)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            save_images: false,
            image_directory: PathBuf::from("."),
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the cut threshold.
    ///
    /// A frame is a cut when both its score and the change of its score
    /// relative to the previous frame are strictly greater than this value.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Export the frames on both sides of every boundary as JPEG images.
    #[must_use]
    pub fn with_save_images(mut self, save_images: bool) -> Self {
        self.save_images = save_images;
        self
    }

    /// Set the directory boundary images are written to.
    #[must_use]
    pub fn with_image_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.image_directory = directory.as_ref().to_path_buf();
        self
    }

    /// Attach a progress observer.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ScanProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Set how often the observer fires.
    ///
    /// A value of 1 means every scored frame; 10 means every 10th frame.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The cut threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether boundary images are exported.
    pub fn save_images(&self) -> bool {
        self.save_images
    }

    /// Directory boundary images are written to.
    pub fn image_directory(&self) -> &Path {
        &self.image_directory
    }
}

/// How surviving segments are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `N: start - end`, one line per segment.
    #[default]
    Plain,
    /// One `ffmpeg` stream-copy command per segment.
    Ffmpeg,
    /// A JSON array with one object per segment.
    Json,
}

/// Settings for rendering a segment report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub(crate) min_duration: u64,
    pub(crate) format: ReportFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportOptions {
    /// Create options with default settings: minimum duration 1000 frames,
    /// plain output.
    pub fn new() -> Self {
        Self {
            min_duration: DEFAULT_MIN_DURATION,
            format: ReportFormat::Plain,
        }
    }

    /// Set the minimum length, in frames, a segment needs to be reported.
    #[must_use]
    pub fn with_min_duration(mut self, frames: u64) -> Self {
        self.min_duration = frames;
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// The minimum segment length in frames.
    pub fn min_duration(&self) -> u64 {
        self.min_duration
    }

    /// The output format.
    pub fn format(&self) -> ReportFormat {
        self.format
    }
}
