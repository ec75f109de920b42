//! Error types for the `shotsegments` crate.
//!
//! This module defines [`ShotError`], the unified error type returned by all
//! fallible operations in the crate. Fatal conditions (the input cannot be
//! opened, the stream is too short to score) and non-fatal ones (a boundary
//! image could not be written) share the same enum; the caller decides which
//! to abort on.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `shotsegments` operations.
///
/// Every public method that can fail returns `Result<T, ShotError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShotError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// Fewer than two frames were decoded, so no frame pair could be scored.
    #[error("Stream too short: need at least 2 frames, read {frames_read}")]
    StreamTooShort {
        /// Number of frames that were decoded before the stream ended.
        frames_read: u64,
    },

    /// Two frames handed to the scorer have different dimensions.
    #[error(
        "Frame size mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    FrameSizeMismatch {
        /// `(width, height)` of the previous frame.
        expected: (u32, u32),
        /// `(width, height)` of the current frame.
        actual: (u32, u32),
    },

    /// A boundary image could not be written.
    ///
    /// The detector treats this as non-fatal: it is logged and counted, and
    /// the scan carries on.
    #[error("Failed to write image {path}: {reason}")]
    ImageWrite {
        /// Destination path of the image.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// Timecodes were requested with a frame rate that cannot convert frames
    /// to seconds.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A string could not be parsed as an `HH:MM:SS` timecode.
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    /// An I/O error occurred while writing a report.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// JSON report serialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

impl From<FfmpegError> for ShotError {
    fn from(error: FfmpegError) -> Self {
        ShotError::FfmpegError(error.to_string())
    }
}
