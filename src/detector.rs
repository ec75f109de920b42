//! Shot boundary detection.
//!
//! [`BoundaryDetector`] carries the state of a single pass over a frame
//! stream: the previous grayscale frame, the previous score, the index of the
//! next frame and the markers found so far. A frame is a cut when both its
//! score and the change of its score relative to the previous frame exceed
//! the threshold. Requiring the jump keeps a shot with sustained fast motion
//! from registering a new boundary on every frame.
//!
//! [`detect_boundaries`] drives a detector over any iterator of decoded
//! frames.
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, GrayImage, Luma};
//! use shotsegments::{NoImages, ScanOptions, ShotError, detect_boundaries};
//!
//! let levels = [0u8, 0, 0, 200, 200, 200];
//! let frames = levels
//!     .iter()
//!     .map(|&level| Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([level])))));
//!
//! let boundaries = detect_boundaries(frames, &ScanOptions::new(), &mut NoImages)?;
//! assert_eq!(&*boundaries.markers, &[0, 3, 5]);
//! # Ok::<(), ShotError>(())
//! ```

use image::{DynamicImage, GrayImage};

use crate::{
    config::ScanOptions,
    error::ShotError,
    markers::Markers,
    progress::FrameScore,
    score::frame_score,
    sink::{BoundaryRole, ImageSink},
};

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ShotBoundaries {
    /// Start sentinel, detected cuts and end sentinel, in frame order.
    pub markers: Markers,
    /// Number of frames decoded.
    pub frames_read: u64,
    /// Number of boundary images the sink failed to write.
    pub failed_image_writes: u64,
}

struct PreviousFrame {
    gray: GrayImage,
    /// Kept only when images are exported.
    image: Option<DynamicImage>,
}

/// Single-pass scoring state.
///
/// Feed frames in playback order with [`push_frame`](Self::push_frame), then
/// call [`finish`](Self::finish) once the stream ends.
pub struct BoundaryDetector<'a, S: ImageSink + ?Sized> {
    threshold: u32,
    save_images: bool,
    sink: &'a mut S,
    previous: Option<PreviousFrame>,
    previous_score: u32,
    /// Index the next pushed frame will get.
    frame_number: u64,
    markers: Markers,
    failed_image_writes: u64,
}

impl<'a, S: ImageSink + ?Sized> BoundaryDetector<'a, S> {
    /// Create a detector using the threshold and image settings of `options`.
    pub fn new(options: &ScanOptions, sink: &'a mut S) -> Self {
        Self {
            threshold: options.threshold(),
            save_images: options.save_images(),
            sink,
            previous: None,
            previous_score: 0,
            frame_number: 0,
            markers: Markers::new(),
            failed_image_writes: 0,
        }
    }

    /// Markers recorded so far.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Number of frames pushed so far.
    pub fn frames_read(&self) -> u64 {
        self.frame_number
    }

    /// Score the next frame of the stream.
    ///
    /// The first frame has nothing to be compared with: it opens the first
    /// segment and `None` is returned. Every later frame returns its score.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::FrameSizeMismatch`] if the frame's dimensions
    /// differ from the previous frame's.
    pub fn push_frame(&mut self, image: DynamicImage) -> Result<Option<FrameScore>, ShotError> {
        let (gray, image) = if self.save_images {
            (image.to_luma8(), Some(image))
        } else {
            (image.into_luma8(), None)
        };

        let Some(previous) = self.previous.take() else {
            self.markers.push(self.frame_number);
            if let Some(image) = &image {
                self.export(image, self.frame_number, BoundaryRole::In);
            }
            self.previous = Some(PreviousFrame { gray, image });
            self.frame_number += 1;
            return Ok(None);
        };

        let score = match frame_score(&gray, &previous.gray) {
            Ok(score) => score,
            Err(error) => {
                self.previous = Some(previous);
                return Err(error);
            }
        };
        let delta = score.abs_diff(self.previous_score);
        let frame_number = self.frame_number;
        let is_cut = score > self.threshold && delta > self.threshold;

        log::trace!("Frame {frame_number}: score={score} delta={delta}");

        if is_cut {
            log::debug!("Cut at frame {frame_number} (score={score}, delta={delta})");
            self.markers.push(frame_number);
            if let (Some(tail), Some(head)) = (&previous.image, &image) {
                self.export(tail, frame_number - 1, BoundaryRole::Out);
                self.export(head, frame_number, BoundaryRole::In);
            }
        }

        self.previous_score = score;
        self.previous = Some(PreviousFrame { gray, image });
        self.frame_number += 1;

        Ok(Some(FrameScore {
            frame_number,
            score,
            delta,
            is_cut,
        }))
    }

    /// Close the last segment and return the markers.
    ///
    /// The last frame index is appended as the end sentinel, unless a cut
    /// was detected on that very frame.
    ///
    /// # Errors
    ///
    /// Returns [`ShotError::StreamTooShort`] if fewer than two frames were
    /// pushed.
    pub fn finish(mut self) -> Result<ShotBoundaries, ShotError> {
        let frames_read = self.frame_number;
        if frames_read < 2 {
            return Err(ShotError::StreamTooShort { frames_read });
        }

        let last = frames_read - 1;
        self.markers.push(last);
        if let Some(tail) = self.previous.take().and_then(|previous| previous.image) {
            self.export(&tail, last, BoundaryRole::Out);
        }

        log::debug!(
            "Scan finished: {frames_read} frames, {} markers",
            self.markers.len()
        );

        Ok(ShotBoundaries {
            markers: self.markers,
            frames_read,
            failed_image_writes: self.failed_image_writes,
        })
    }

    fn export(&mut self, image: &DynamicImage, frame_number: u64, role: BoundaryRole) {
        if let Err(error) = self.sink.write_image(image, frame_number, role) {
            log::warn!("{error}");
            self.failed_image_writes += 1;
        }
    }
}

/// Run a full boundary scan over `frames`.
///
/// Scored frames are reported to the options' progress observer every
/// [`batch_size`](ScanOptions::with_batch_size) frames.
///
/// # Errors
///
/// Propagates the first decoding error from `frames`, returns
/// [`ShotError::FrameSizeMismatch`] if the frame size changes mid-stream and
/// [`ShotError::StreamTooShort`] if fewer than two frames were decoded. Image
/// export failures are not errors; see
/// [`ShotBoundaries::failed_image_writes`].
pub fn detect_boundaries<I, S>(
    frames: I,
    options: &ScanOptions,
    sink: &mut S,
) -> Result<ShotBoundaries, ShotError>
where
    I: IntoIterator<Item = Result<DynamicImage, ShotError>>,
    S: ImageSink + ?Sized,
{
    log::debug!(
        "Scanning for shot boundaries (threshold={}, save_images={})",
        options.threshold(),
        options.save_images()
    );

    let mut detector = BoundaryDetector::new(options, sink);
    for frame in frames {
        if let Some(frame_score) = detector.push_frame(frame?)? {
            if frame_score.frame_number % options.batch_size == 0 {
                options.progress.on_frame(&frame_score);
            }
        }
    }

    detector.finish()
}
