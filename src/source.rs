//! Video input.
//!
//! [`VideoSource`] opens a file with FFmpeg, locates the best video stream,
//! caches its [`VideoMetadata`] and hands out a [`FrameIterator`] that decodes
//! every frame in playback order.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    config::{PixelFormat, ScanOptions},
    detector::{ShotBoundaries, detect_boundaries},
    error::ShotError,
    iterator::FrameIterator,
    metadata::VideoMetadata,
    sink::{JpegDirectory, NoImages},
};

/// Decode format for boundary scans. Scoring derives luma from it whether or
/// not boundary images are exported, so export never changes the cuts.
const SCAN_PIXEL_FORMAT: PixelFormat = PixelFormat::Rgb8;

/// An opened video file.
///
/// # Example
///
/// ```no_run
/// use shotsegments::{ShotError, VideoSource};
///
/// let source = VideoSource::open("input.mp4")?;
/// println!("{} fps", source.frames_per_second());
/// # Ok::<(), ShotError>(())
/// ```
pub struct VideoSource {
    pub(crate) input_context: Input,
    pub(crate) video_stream_index: usize,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file.
    ///
    /// Initializes FFmpeg (idempotent), opens the file and reads the codec
    /// parameters of its best video stream.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::FileOpen`] if the file cannot be opened or its
    /// video decoder cannot be created, and [`ShotError::NoVideoStream`] if it
    /// has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShotError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init().map_err(|error| ShotError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ShotError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ShotError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                ShotError::FileOpen {
                    path: path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| ShotError::FileOpen {
                path: path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        // Prefer the average frame rate; fall back to the stream's base rate.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 && frame_rate.numerator() != 0 {
            f64::from(frame_rate.numerator()) / f64::from(frame_rate.denominator())
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                f64::from(rate.numerator()) / f64::from(rate.denominator())
            } else {
                0.0
            }
        };

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frame_count = match stream.frames() {
            frames if frames > 0 => frames as u64,
            _ if frames_per_second > 0.0 => (duration.as_secs_f64() * frames_per_second) as u64,
            _ => 0,
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            duration,
            codec,
            format: input_context.format().name().to_string(),
        };

        log::debug!(
            "Video stream {video_stream_index}: {}x{} @ {:.3} fps, ~{} frames [{}]",
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            metadata,
            path,
        })
    }

    /// Cached stream metadata.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Frame rate of the video stream, or `0.0` if the container does not
    /// declare one.
    pub fn frames_per_second(&self) -> f64 {
        self.metadata.frames_per_second
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode every frame from the start of the stream.
    ///
    /// The iterator borrows the source mutably; a source is meant to be
    /// scanned once.
    pub fn frames(&mut self, pixel_format: PixelFormat) -> Result<FrameIterator<'_>, ShotError> {
        FrameIterator::new(self, pixel_format)
    }

    /// Scan the whole video for shot boundaries.
    ///
    /// Frames are decoded as RGB and scored on their luma. Boundary images go
    /// to [`ScanOptions::image_directory`] when saving is enabled.
    pub fn detect_boundaries(&mut self, options: &ScanOptions) -> Result<ShotBoundaries, ShotError> {
        let frames = self.frames(SCAN_PIXEL_FORMAT)?;
        if options.save_images() {
            let mut sink = JpegDirectory::new(options.image_directory());
            detect_boundaries(frames, options, &mut sink)
        } else {
            detect_boundaries(frames, options, &mut NoImages)
        }
    }
}
