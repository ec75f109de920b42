//! Lazy, pull-based frame iterator.
//!
//! [`FrameIterator`] decodes frames on demand: each call to
//! [`next()`](Iterator::next) reads just enough packets to produce the next
//! frame in playback order. Only one decoded frame is alive at a time, which
//! is all a single-pass boundary scan needs.
//!
//! # Example
//!
//! ```no_run
//! use shotsegments::{PixelFormat, ShotError, VideoSource};
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! for (index, frame) in source.frames(PixelFormat::Gray8)?.enumerate() {
//!     let frame = frame?;
//!     println!("frame {index}: {}x{}", frame.width(), frame.height());
//! }
//! # Ok::<(), ShotError>(())
//! ```

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::DynamicImage;

use crate::{config::PixelFormat, error::ShotError, source::VideoSource};

/// Consecutive packet read failures tolerated before the stream is abandoned.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 32;

/// Counts packet read failures since the last successful read.
#[derive(Debug, Default)]
struct ReadErrors(u32);

impl ReadErrors {
    fn reset(&mut self) {
        self.0 = 0;
    }

    /// Record a failure. Returns `true` once the budget is exhausted.
    fn record(&mut self) -> bool {
        self.0 += 1;
        self.0 >= MAX_CONSECUTIVE_READ_ERRORS
    }
}

/// A lazy iterator over every decoded frame of a video stream.
///
/// The iterator borrows the underlying [`VideoSource`] mutably. After the
/// first error it yields `None`.
pub struct FrameIterator<'a> {
    source: &'a mut VideoSource,
    decoder: VideoDecoder,
    /// Built from the first decoded frame, whose pixel format may differ from
    /// what the codec parameters announce.
    scaler: Option<ScalingContext>,
    pixel_format: PixelFormat,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    read_errors: ReadErrors,
    eof_sent: bool,
    done: bool,
}

impl<'a> FrameIterator<'a> {
    pub(crate) fn new(
        source: &'a mut VideoSource,
        pixel_format: PixelFormat,
    ) -> Result<Self, ShotError> {
        let stream = source
            .input_context
            .stream(source.video_stream_index)
            .ok_or(ShotError::NoVideoStream)?;
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        Ok(Self {
            source,
            decoder,
            scaler: None,
            pixel_format,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            read_errors: ReadErrors::default(),
            eof_sent: false,
            done: false,
        })
    }

    /// Scale and convert the current `decoded_frame` to a `DynamicImage`.
    fn convert_current_frame(&mut self) -> Result<DynamicImage, ShotError> {
        let scaler = match self.scaler.take() {
            Some(scaler) => scaler,
            None => {
                let width = self.decoded_frame.width();
                let height = self.decoded_frame.height();
                ScalingContext::get(
                    self.decoded_frame.format(),
                    width,
                    height,
                    self.pixel_format.to_ffmpeg_pixel(),
                    width,
                    height,
                    ScalingFlags::BILINEAR,
                )?
            }
        };
        let scaler = self.scaler.insert(scaler);

        scaler.run(&self.decoded_frame, &mut self.scaled_frame)?;
        crate::conversion::frame_to_image(&self.scaled_frame, self.pixel_format)
    }

    fn fail(&mut self, error: ShotError) -> Option<Result<DynamicImage, ShotError>> {
        self.done = true;
        Some(Err(error))
    }
}

impl Iterator for FrameIterator<'_> {
    type Item = Result<DynamicImage, ShotError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return match self.convert_current_frame() {
                    Ok(image) => Some(Ok(image)),
                    Err(error) => self.fail(error),
                };
            }

            if self.eof_sent {
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.source.input_context) {
                Ok(()) => {
                    self.read_errors.reset();
                    if packet.stream() == self.source.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            return self.fail(ShotError::from(error));
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        return self.fail(ShotError::from(error));
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    if self.read_errors.record() {
                        return self.fail(ShotError::VideoDecodeError(format!(
                            "giving up after {MAX_CONSECUTIVE_READ_ERRORS} consecutive packet read errors, last: {error}"
                        )));
                    }
                    // A damaged packet is skipped, the next one may decode.
                    log::trace!("Skipping unreadable packet: {error}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_errors_allow_a_bounded_run() {
        let mut errors = ReadErrors::default();
        for _ in 1..MAX_CONSECUTIVE_READ_ERRORS {
            assert!(!errors.record());
        }
        assert!(errors.record());
    }

    #[test]
    fn successful_read_restores_the_budget() {
        let mut errors = ReadErrors::default();
        for _ in 0..MAX_CONSECUTIVE_READ_ERRORS {
            errors.record();
        }
        errors.reset();
        assert!(!errors.record());
    }
}
