//! # shotsegments
//!
//! Detect shot boundaries (hard cuts) in video files and split them into
//! segments.
//!
//! Every decoded frame is compared with its predecessor in grayscale. The
//! mean absolute pixel difference is the frame's *score*. A frame is a cut
//! when its score and the change from the previous score both exceed a
//! threshold. The cuts, together with the first and last frame, form a
//! [`Markers`] sequence. A [`SegmentReporter`] renders the segments between
//! adjacent markers as plain frame ranges, as `ffmpeg` stream-copy commands
//! or as JSON.
//!
//! Decoding is done with FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; grayscale
//! conversion and JPEG export use [`image`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::{io, path::Path};
//!
//! use shotsegments::{ReportFormat, ReportOptions, ScanOptions, SegmentReporter, VideoSource};
//!
//! let path = Path::new("input.mp4");
//! let mut source = VideoSource::open(path)?;
//! let boundaries = source.detect_boundaries(&ScanOptions::new().with_threshold(40))?;
//!
//! let options = ReportOptions::new()
//!     .with_min_duration(250)
//!     .with_format(ReportFormat::Ffmpeg);
//! SegmentReporter::new(path, source.frames_per_second(), options)
//!     .write_report(&mut io::stdout(), &boundaries.markers)?;
//! # Ok::<(), shotsegments::ShotError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
mod conversion;
pub mod detector;
pub mod error;
pub mod iterator;
pub mod markers;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod score;
pub mod sink;
pub mod source;
pub mod timecode;

pub use config::{
    DEFAULT_MIN_DURATION, DEFAULT_THRESHOLD, PixelFormat, ReportFormat, ReportOptions,
    ScanOptions,
};
pub use detector::{BoundaryDetector, ShotBoundaries, detect_boundaries};
pub use error::ShotError;
pub use iterator::FrameIterator;
pub use markers::{Markers, Segment};
pub use metadata::VideoMetadata;
pub use progress::{FrameScore, ScanProgress};
pub use report::{
    ExtractionCommand, NumberedSegment, SegmentReporter, segment_file_name, surviving_segments,
};
pub use score::{MAX_SCORE, frame_score};
pub use sink::{BoundaryRole, ImageSink, JpegDirectory, NoImages, boundary_image_name};
pub use source::VideoSource;
pub use timecode::Timecode;
